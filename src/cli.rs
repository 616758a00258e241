//! Command-line interface
//!
//! One sub-command per stage plus `pipeline`. The stage flags keep their historical
//! single-dash spellings (`-stopWords`, `-caseSensitive`, `-descending`) next to the
//! usual double-dash ones.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::PipelineConfig;
use crate::engine::JobReport;
use crate::error::Result;
use crate::stages::{
    PipelineOptions, SwapOptions, WordFrequencyOptions, pipeline, product_filter, sort_by_year,
    swap_word_count, word_count, word_frequency, word_totals,
};

/// Long flags that are also accepted with a single dash
const SINGLE_DASH_FLAGS: [&str; 3] = ["-stopWords", "-caseSensitive", "-descending"];

/// Turn NEISS injury records into per-word frequency data
#[derive(Parser, Debug)]
#[command(name = "neiss-tf")]
#[command(about = "neiss-tf - NEISS description term-frequency pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding Gender.dat, Race.dat, ... and StopWords.dat
    #[arg(long, value_name = "DIR", global = true)]
    pub reference_dir: Option<PathBuf>,

    /// Number of reduce tasks for stages without a fixed partition count
    #[arg(long, value_name = "N", global = true)]
    pub reduce_tasks: Option<usize>,

    /// Hide the map and reduce progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Input and output directories of a single stage
#[derive(Args, Debug, Clone)]
pub struct StageDirs {
    /// Directory of input partitions
    pub input_dir: PathBuf,
    /// Directory receiving the part files
    pub output_dir: PathBuf,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WordFrequencyFlags {
    /// Drop the words listed in StopWords.dat
    #[arg(long = "stopWords")]
    pub stop_words: bool,

    /// Keep the case of description words
    #[arg(long = "caseSensitive")]
    pub case_sensitive: bool,
}

impl From<WordFrequencyFlags> for WordFrequencyOptions {
    fn from(flags: WordFrequencyFlags) -> Self {
        Self::new()
            .with_stop_words(flags.stop_words)
            .with_case_sensitive(flags.case_sensitive)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Keep amusement-attraction records and expand their codes
    #[command(name = "product-filter")]
    ProductFilter(StageDirs),

    /// Count description words per record
    #[command(name = "word-frequency")]
    WordFrequency {
        #[command(flatten)]
        dirs: StageDirs,
        #[command(flatten)]
        flags: WordFrequencyFlags,
    },

    /// Set each word count against its record's total
    #[command(name = "word-count")]
    WordCount(StageDirs),

    /// Bucket enriched records by treatment year
    #[command(name = "sort-by-year")]
    SortByYear(StageDirs),

    /// Sum word counts over every record
    #[command(name = "word-totals")]
    WordTotals(StageDirs),

    /// Rank words by count
    #[command(name = "swap-word-count")]
    SwapWordCount {
        #[command(flatten)]
        dirs: StageDirs,

        /// Highest counts first
        #[arg(long)]
        descending: bool,
    },

    /// Run every stage under one working directory
    #[command(name = "pipeline")]
    Pipeline {
        /// Directory of raw NEISS partitions
        input_dir: PathBuf,
        /// Directory receiving one sub-directory per stage
        work_dir: PathBuf,
        #[command(flatten)]
        flags: WordFrequencyFlags,

        /// Rank the highest counts first
        #[arg(long)]
        descending: bool,
    },
}

impl Command {
    /// Sub-command name, as typed on the command line
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProductFilter(_) => "product-filter",
            Self::WordFrequency { .. } => "word-frequency",
            Self::WordCount(_) => "word-count",
            Self::SortByYear(_) => "sort-by-year",
            Self::WordTotals(_) => "word-totals",
            Self::SwapWordCount { .. } => "swap-word-count",
            Self::Pipeline { .. } => "pipeline",
        }
    }
}

impl Cli {
    /// Parse arguments, accepting the single-dash stage flags
    pub fn try_parse_normalized<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Job configuration from the environment, overridden by the global flags
    #[must_use]
    pub fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new().with_progress(!self.no_progress);
        if let Some(dir) = &self.reference_dir {
            config = config.with_reference_dir(dir);
        }
        if let Some(reduce_tasks) = self.reduce_tasks {
            config = config.with_reduce_tasks(reduce_tasks);
        }
        config
    }
}

/// Rewrite `-stopWords`-style flags to their double-dash form
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str() {
            Some(flag) if SINGLE_DASH_FLAGS.contains(&flag) => OsString::from(format!("-{flag}")),
            _ => arg,
        })
        .collect()
}

/// Run the job(s) a command names
pub fn execute(command: &Command, config: &PipelineConfig) -> Result<Vec<JobReport>> {
    let report = match command {
        Command::ProductFilter(dirs) => {
            product_filter::run(&dirs.input_dir, &dirs.output_dir, config)?
        }
        Command::WordFrequency { dirs, flags } => {
            word_frequency::run(&dirs.input_dir, &dirs.output_dir, config, &(*flags).into())?
        }
        Command::WordCount(dirs) => word_count::run(&dirs.input_dir, &dirs.output_dir, config)?,
        Command::SortByYear(dirs) => sort_by_year::run(&dirs.input_dir, &dirs.output_dir, config)?,
        Command::WordTotals(dirs) => word_totals::run(&dirs.input_dir, &dirs.output_dir, config)?,
        Command::SwapWordCount { dirs, descending } => {
            let options = SwapOptions::new().with_descending(*descending);
            swap_word_count::run(&dirs.input_dir, &dirs.output_dir, config, &options)?
        }
        Command::Pipeline {
            input_dir,
            work_dir,
            flags,
            descending,
        } => {
            let options = PipelineOptions::new()
                .with_word_frequency((*flags).into())
                .with_swap(SwapOptions::new().with_descending(*descending));
            return Ok(pipeline::run(input_dir, work_dir, config, &options)?.jobs);
        }
    };
    Ok(vec![report])
}
