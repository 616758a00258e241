//! Word extractor
//!
//! Tokenizes the description of every enriched record, discards tokens that can't be
//! words, and counts each remaining word per record. The record is identified by its case
//! number and the partition it was read from, so identical case numbers in different
//! partitions stay apart.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use regex::Regex;

use crate::broadcast::{STOP_WORDS_FILE, StopWords};
use crate::config::PipelineConfig;
use crate::engine::{InputSplit, JobReport, MapReduceJob, Mapper, TaskContext};
use crate::error::{PipelineError, Result};
use crate::models::incident::{ENRICHED_VALUE_FIELDS, TAB_DELIMITER};
use crate::models::{RecordKey, WordKey};
use crate::stages::sum::SumReducer;

/// Job name used in logs and reports
pub const JOB_NAME: &str = "WordFrequency against the NEISS Descriptions";

pub const TOTAL_RECORDS_PROCESSED: &str = "TOTAL_RECORDS_PROCESSED";
pub const TOTAL_REJECTED_WORDS: &str = "TOTAL_REJECTED_WORDS";
pub const NUM_REJECTED_ZEROWORDS: &str = "NUM_REJECTED_ZEROWORDS";
pub const NUM_REJECTED_STOPWORDS: &str = "NUM_REJECTED_STOPWORDS";
pub const NUM_REJECTED_DIGITS: &str = "NUM_REJECTED_DIGITS";
pub const NUM_REJECTED_NONCHARS: &str = "NUM_REJECTED_NONCHARS";
pub const NUM_VALID_WORDS: &str = "NUM_VALID_WORDS";
pub const MALFORMED_RECORDS: &str = "MALFORMED_RECORDS";

/// Whitespace runs around a word boundary
const WORD_BOUNDARY: &str = r"\s*\b\s*";

/// Token starting with a decimal digit (general category `Nd`)
const LEADING_DIGIT: &str = r"^\p{Nd}";

/// Token starting with a letter (general category `L`)
const LEADING_LETTER: &str = r"^\p{L}";

/// Options of the word extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct WordFrequencyOptions {
    /// Drop words listed in the stop-word reference file
    pub use_stop_words: bool,
    /// Keep the description's case instead of lower-casing it
    pub case_sensitive: bool,
}

impl WordFrequencyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stop_words(mut self, use_stop_words: bool) -> Self {
        self.use_stop_words = use_stop_words;
        self
    }

    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// Splits text at whitespace runs around word boundaries
///
/// Every boundary match ends a token, including a zero-width match right after the
/// previous one, so `"pt fell"` splits into `["pt", "", "fell"]`. A zero-width match at
/// the start produces no leading token and trailing empty tokens are dropped. Text
/// without any boundary is returned whole, so `""` yields `[""]`.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    boundary: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let boundary = Regex::new(WORD_BOUNDARY)
            .map_err(|e| PipelineError::Config(format!("Invalid word boundary pattern: {e}")))?;
        Ok(Self { boundary })
    }

    /// Split `text` into tokens
    #[must_use]
    pub fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut tokens = Vec::new();
        let mut index = 0;
        let mut search = 0;

        while let Some(m) = self.boundary.find_at(text, search) {
            let empty = m.start() == m.end();
            if !(index == 0 && m.start() == 0 && empty) {
                tokens.push(&text[index..m.start()]);
                index = m.end();
            }

            search = if empty {
                match text[m.end()..].chars().next() {
                    Some(c) => m.end() + c.len_utf8(),
                    None => break,
                }
            } else {
                m.end()
            };
        }

        if index == 0 {
            return vec![text];
        }

        tokens.push(&text[index..]);
        while tokens.last().is_some_and(|token| token.is_empty()) {
            tokens.pop();
        }
        tokens
    }
}

/// Why a token was kept or dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    ZeroWord,
    Digit,
    NonChar,
    StopWord,
    Valid,
}

impl TokenClass {
    /// Counter recording tokens of this class
    #[must_use]
    pub const fn counter(self) -> &'static str {
        match self {
            Self::ZeroWord => NUM_REJECTED_ZEROWORDS,
            Self::Digit => NUM_REJECTED_DIGITS,
            Self::NonChar => NUM_REJECTED_NONCHARS,
            Self::StopWord => NUM_REJECTED_STOPWORDS,
            Self::Valid => NUM_VALID_WORDS,
        }
    }
}

/// Sorts tokens into their [`TokenClass`] by the first character's general category
///
/// Only decimal digits (`Nd`) count as digits and only letters (`L`) as word starts;
/// letter-like numerals such as `Ⅻ` or `²` are non-characters.
#[derive(Debug, Clone)]
pub struct TokenClassifier {
    digit: Regex,
    letter: Regex,
}

impl TokenClassifier {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                PipelineError::Config(format!("Invalid token class pattern {pattern}: {e}"))
            })
        };
        Ok(Self {
            digit: compile(LEADING_DIGIT)?,
            letter: compile(LEADING_LETTER)?,
        })
    }

    /// Classify a token; checks run in the order of the variants
    #[must_use]
    pub fn classify(&self, token: &str, stop_words: &StopWords) -> TokenClass {
        if token.is_empty() {
            TokenClass::ZeroWord
        } else if self.digit.is_match(token) {
            TokenClass::Digit
        } else if !self.letter.is_match(token) {
            TokenClass::NonChar
        } else if stop_words.contains(token) {
            TokenClass::StopWord
        } else {
            TokenClass::Valid
        }
    }
}

/// Mapper emitting `(word, case@partition) -> 1` for every accepted word
pub struct WordFrequencyMapper {
    tokenizer: Tokenizer,
    classifier: TokenClassifier,
    stop_words: Arc<StopWords>,
    case_sensitive: bool,
}

impl WordFrequencyMapper {
    pub fn new(stop_words: Arc<StopWords>, case_sensitive: bool) -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new()?,
            classifier: TokenClassifier::new()?,
            stop_words,
            case_sensitive,
        })
    }
}

impl Mapper for WordFrequencyMapper {
    type Key = WordKey;
    type Value = u64;

    fn map(&self, line: &str, split: &InputSplit, ctx: &mut TaskContext<WordKey, u64>) {
        ctx.increment(TOTAL_RECORDS_PROCESSED, 1);

        let (case_number, value) = line.split_once(TAB_DELIMITER).unwrap_or((line, ""));
        let value = if self.case_sensitive {
            Cow::Borrowed(value)
        } else {
            Cow::Owned(value.to_lowercase())
        };

        let mut fields = value.splitn(ENRICHED_VALUE_FIELDS, TAB_DELIMITER);
        let Some(description) = fields.nth(ENRICHED_VALUE_FIELDS - 1) else {
            ctx.increment(MALFORMED_RECORDS, 1);
            warn!("Skipping record without a description in {}: \"{line}\"", split.name);
            return;
        };

        let record = RecordKey::new(case_number, split.name.as_str());
        for token in self.tokenizer.split(description) {
            let class = self.classifier.classify(token, &self.stop_words);
            ctx.increment(class.counter(), 1);
            if class == TokenClass::Valid {
                ctx.write(WordKey::new(token, record.clone()), 1);
            } else {
                ctx.increment(TOTAL_REJECTED_WORDS, 1);
            }
        }
    }
}

/// Stop words a run with `options` filters on
///
/// The stop-word file is only read when stop words are requested; failing to load it
/// then fails the run. Otherwise the set is empty.
pub fn load_stop_words(
    config: &PipelineConfig,
    options: &WordFrequencyOptions,
) -> Result<StopWords> {
    if options.use_stop_words {
        StopWords::load(&config.reference_file(STOP_WORDS_FILE), options.case_sensitive)
    } else {
        Ok(StopWords::empty())
    }
}

/// Run the word extractor over product filter output
pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    options: &WordFrequencyOptions,
) -> Result<JobReport> {
    let stop_words = Arc::new(load_stop_words(config, options)?);
    run_with_stop_words(input_dir, output_dir, config, options, stop_words)
}

/// Run the word extractor with a stop-word set that is already loaded
pub fn run_with_stop_words(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    options: &WordFrequencyOptions,
    stop_words: Arc<StopWords>,
) -> Result<JobReport> {
    if options.case_sensitive {
        info!("Enabled case sensitivity while processing the incident Description words");
    }

    let mapper = WordFrequencyMapper::new(stop_words, options.case_sensitive)?;
    let reducer = SumReducer::<WordKey>::new();
    MapReduceJob::new(JOB_NAME, &mapper, &reducer)
        .with_combiner(&reducer)
        .with_reduce_tasks(config.reduce_tasks)
        .run(input_dir, output_dir, config)
}
