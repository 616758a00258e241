//! Code lookup tables for the coded NEISS dimensions

use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::error::util::safe_open_file;
use crate::error::{PipelineError, Result};
use crate::utils::logging::log_skipped_line;

/// A coded categorical field of a raw record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Gender,
    Race,
    Diagnosis,
    BodyPart,
    Disposition,
    Location,
}

impl Dimension {
    /// Every dimension, in enriched-record order
    pub const ALL: [Self; 6] = [
        Self::Gender,
        Self::Race,
        Self::Diagnosis,
        Self::BodyPart,
        Self::Disposition,
        Self::Location,
    ];

    /// Name of the reference file holding this dimension's table
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Gender => "Gender.dat",
            Self::Race => "Race.dat",
            Self::Diagnosis => "Diagnosis.dat",
            Self::BodyPart => "BodyPart.dat",
            Self::Disposition => "Disposition.dat",
            Self::Location => "Location.dat",
        }
    }

    /// Code substituted when the field is empty or can't be decoded
    #[must_use]
    pub const fn unknown_code(self) -> i32 {
        match self {
            Self::Gender | Self::Race | Self::Location => 0,
            Self::Diagnosis => 70,
            Self::BodyPart => 87,
            Self::Disposition => 9,
        }
    }

    /// Code whose text is followed by the record's free-text detail field
    #[must_use]
    pub const fn other_code(self) -> Option<i32> {
        match self {
            Self::Race => Some(3),
            Self::Diagnosis => Some(71),
            _ => None,
        }
    }

    /// Counter bumped when a value of this dimension falls back to the unknown code
    #[must_use]
    pub const fn bad_value_counter(self) -> &'static str {
        match self {
            Self::Gender => "BAD_GENDER",
            Self::Race => "BAD_RACE",
            Self::Diagnosis => "BAD_DIAGNOSIS",
            Self::BodyPart => "BAD_BODY_PART",
            Self::Disposition => "BAD_DISPOSITION",
            Self::Location => "BAD_LOCATION",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gender => "Gender",
            Self::Race => "Race",
            Self::Diagnosis => "Diagnosis",
            Self::BodyPart => "BodyPart",
            Self::Disposition => "Disposition",
            Self::Location => "Location",
        };
        f.write_str(name)
    }
}

/// Integer code to description text for one dimension
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    entries: FxHashMap<i32, String>,
}

impl CodeTable {
    /// Load a `<code>\t<text>` reference file
    ///
    /// Lines that don't hold a numeric code and a text are skipped with a warning.
    ///
    /// # Arguments
    /// * `dimension` - The dimension the table describes (for error context)
    /// * `path` - The reference file
    ///
    /// # Returns
    /// * `Result<CodeTable>` - The table, or a reference error if the file can't be read
    ///   or holds no usable entry
    pub fn load(dimension: Dimension, path: &Path) -> Result<Self> {
        let what = format!("{dimension} Description data");
        let file = safe_open_file(path, dimension.file_name())
            .map_err(|e| PipelineError::reference(&what, path, e.to_string()))?;

        let mut entries = FxHashMap::default();
        for (line_number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| PipelineError::reference(&what, path, e.to_string()))?;
            match parse_entry(&line) {
                Some((code, text)) => {
                    entries.insert(code, text.to_string());
                }
                None => log_skipped_line(path, line_number + 1, &line),
            }
        }

        if entries.is_empty() {
            return Err(PipelineError::reference(what, path, "no entries loaded"));
        }

        info!("{} entries loaded from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Build a table from in-memory pairs
    #[must_use]
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(code, text)| (code, text.into())).collect(),
        }
    }

    /// Text for a code
    #[must_use]
    pub fn describe(&self, code: i32) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// Number of codes in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no codes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(line: &str) -> Option<(i32, &str)> {
    let mut parts = line.split('\t');
    let code = parts.next()?.trim().parse::<i32>().ok()?;
    let text = parts.next()?;
    Some((code, text))
}

/// The lookup tables of every dimension
#[derive(Debug, Clone)]
pub struct CodeTables {
    tables: FxHashMap<Dimension, CodeTable>,
}

impl CodeTables {
    /// Load all six tables from a reference directory
    ///
    /// Fails on the first table that is missing, unreadable or empty; the product filter
    /// must not run with a dimension it can't decode.
    pub fn load(reference_dir: &Path) -> Result<Self> {
        let mut tables = FxHashMap::default();
        for dimension in Dimension::ALL {
            let path = reference_dir.join(dimension.file_name());
            debug!("Loading {dimension} codes from {}", path.display());
            tables.insert(dimension, CodeTable::load(dimension, &path)?);
        }
        Ok(Self { tables })
    }

    /// Assemble tables built in memory
    ///
    /// # Errors
    /// Returns a configuration error naming the first dimension without a table.
    pub fn from_tables(tables: impl IntoIterator<Item = (Dimension, CodeTable)>) -> Result<Self> {
        let tables: FxHashMap<Dimension, CodeTable> = tables.into_iter().collect();
        if let Some(missing) = Dimension::ALL.iter().find(|d| !tables.contains_key(*d)) {
            return Err(PipelineError::Config(format!("No code table for dimension {missing}")));
        }
        Ok(Self { tables })
    }

    /// Text for a code of a dimension
    #[must_use]
    pub fn describe(&self, dimension: Dimension, code: i32) -> Option<&str> {
        self.tables.get(&dimension).and_then(|table| table.describe(code))
    }
}
