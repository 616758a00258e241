//! Named task counters
//!
//! Every map, combine and reduce task fills its own `Counters` and hands it back with its
//! output; the job merges them once all tasks are done. Counters are telemetry only,
//! nothing downstream depends on their values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Records read by map tasks
pub const MAP_INPUT_RECORDS: &str = "MAP_INPUT_RECORDS";
/// Records emitted by map tasks (before any combiner)
pub const MAP_OUTPUT_RECORDS: &str = "MAP_OUTPUT_RECORDS";
/// Records left after the combiner ran
pub const COMBINE_OUTPUT_RECORDS: &str = "COMBINE_OUTPUT_RECORDS";
/// Distinct keys seen by reduce tasks
pub const REDUCE_INPUT_GROUPS: &str = "REDUCE_INPUT_GROUPS";
/// Records written by reduce tasks
pub const REDUCE_OUTPUT_RECORDS: &str = "REDUCE_OUTPUT_RECORDS";
/// Records a partitioner routed outside `[0, partitions)`
pub const ILLEGAL_PARTITION: &str = "ILLEGAL_PARTITION";

/// A set of named counters, kept in name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counters {
    values: BTreeMap<String, u64>,
}

impl Counters {
    /// Create an empty counter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to a counter, creating it at zero first if needed
    pub fn increment(&mut self, counter: impl AsRef<str>, delta: u64) {
        let name = counter.as_ref();
        if let Some(value) = self.values.get_mut(name) {
            *value += delta;
        } else {
            self.values.insert(name.to_string(), delta);
        }
    }

    /// Current value of a counter; counters never incremented read as zero
    #[must_use]
    pub fn get(&self, counter: impl AsRef<str>) -> u64 {
        self.values.get(counter.as_ref()).copied().unwrap_or(0)
    }

    /// Fold another task's counters into this set
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in &other.values {
            self.increment(name, *value);
        }
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Whether no counter was ever incremented
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
