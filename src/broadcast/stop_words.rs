//! Stop-word set for the word extractor

use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;
use rustc_hash::FxHashSet;

use crate::error::util::safe_open_file;
use crate::error::{PipelineError, Result};

/// Name of the stop-word reference file
pub const STOP_WORDS_FILE: &str = "StopWords.dat";

/// Words excluded from the extracted vocabulary
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: FxHashSet<String>,
}

impl StopWords {
    /// An empty set; nothing is filtered
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load one word per line, lower-casing each unless `case_sensitive` is set
    ///
    /// Blank lines are ignored. An empty file yields an empty set.
    pub fn load(path: &Path, case_sensitive: bool) -> Result<Self> {
        let what = "Stop Word data";
        let file = safe_open_file(path, STOP_WORDS_FILE)
            .map_err(|e| PipelineError::reference(what, path, e.to_string()))?;

        let mut words = FxHashSet::default();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| PipelineError::reference(what, path, e.to_string()))?;
            if line.is_empty() {
                continue;
            }
            words.insert(if case_sensitive { line } else { line.to_lowercase() });
        }

        info!("{} stop words loaded from {}", words.len(), path.display());
        Ok(Self { words })
    }

    /// Build a set from in-memory words, taken as given
    #[must_use]
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `word` is a stop word
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
