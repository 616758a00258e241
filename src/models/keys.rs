//! Composite keys and values passed between stages
//!
//! All intermediate data is text. Keys are built by concatenation with four literal
//! delimiters: `\t` between fields, `=` between a label and its value, `@` between a case
//! number and the partition it came from, and `/` between a count and its total.

use std::fmt;
use std::str::FromStr;

/// Separator between fields of a key or value
pub const FIELD_DELIMITER: char = '\t';

/// Separator between a label and its value
pub const EQUALS_DELIMITER: char = '=';

/// Separator between a case number and its source partition
pub const PROVENANCE_DELIMITER: char = '@';

/// Separator between a word count and the record total
pub const RATIO_DELIMITER: char = '/';

/// A record identity that survives regrouping: case number plus source partition name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub case_number: String,
    pub partition: String,
}

impl RecordKey {
    #[must_use]
    pub fn new(case_number: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            case_number: case_number.into(),
            partition: partition.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.case_number, PROVENANCE_DELIMITER, self.partition)
    }
}

impl FromStr for RecordKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_once(PROVENANCE_DELIMITER)
            .map(|(case_number, partition)| Self::new(case_number, partition))
            .ok_or_else(|| format!("Missing '{PROVENANCE_DELIMITER}' in record key: {s}"))
    }
}

/// One word of one record; the key of the word extractor
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordKey {
    pub word: String,
    pub record: RecordKey,
}

impl WordKey {
    #[must_use]
    pub fn new(word: impl Into<String>, record: RecordKey) -> Self {
        Self {
            word: word.into(),
            record,
        }
    }

    /// Read a `word\tcase@partition\tcount` line written by the word extractor
    #[must_use]
    pub fn parse_counted_line(line: &str) -> Option<(Self, u64)> {
        let mut parts = line.splitn(3, FIELD_DELIMITER);
        let word = parts.next()?;
        let record = parts.next()?.parse::<RecordKey>().ok()?;
        let count = parts.next()?.trim().parse::<u64>().ok()?;
        if word.is_empty() {
            return None;
        }
        Some((Self::new(word, record), count))
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.word, FIELD_DELIMITER, self.record)
    }
}

/// A word with its count inside one record, rendered `word=count`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl WordCount {
    #[must_use]
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.word, EQUALS_DELIMITER, self.count)
    }
}

/// A word's count in a record against the record's total word count, rendered
/// `count/total`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermFrequency {
    pub count: u64,
    pub total: u64,
}

impl fmt::Display for TermFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.count, RATIO_DELIMITER, self.total)
    }
}
