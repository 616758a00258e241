//! Task-facing traits: what a stage implements to run on the substrate.

use std::path::PathBuf;

use crate::engine::counters::Counters;

/// One input partition, handed to every `map` call of the task reading it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSplit {
    /// Position of the partition in the sorted input listing
    pub index: usize,
    /// Full path of the partition file
    pub path: PathBuf,
    /// File name of the partition; this is the provenance recorded in composite keys
    pub name: String,
}

impl InputSplit {
    /// Create a split from a partition path
    #[must_use]
    pub fn new(index: usize, path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { index, path, name }
    }
}

/// Output collector and counter side-channel for a single task
#[derive(Debug)]
pub struct TaskContext<K, V> {
    output: Vec<(K, V)>,
    counters: Counters,
}

impl<K, V> Default for TaskContext<K, V> {
    fn default() -> Self {
        Self {
            output: Vec::new(),
            counters: Counters::new(),
        }
    }
}

impl<K, V> TaskContext<K, V> {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one key/value pair
    pub fn write(&mut self, key: K, value: V) {
        self.output.push((key, value));
    }

    /// Add `delta` to a named counter
    pub fn increment(&mut self, counter: impl AsRef<str>, delta: u64) {
        self.counters.increment(counter, delta);
    }

    /// Pairs emitted so far, in emission order
    #[must_use]
    pub fn output(&self) -> &[(K, V)] {
        &self.output
    }

    /// Counters recorded so far
    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Split the context into its output and counters
    #[must_use]
    pub fn into_parts(self) -> (Vec<(K, V)>, Counters) {
        (self.output, self.counters)
    }
}

/// Per-line map function
///
/// A mapper is shared by every map task of a job, so any reference data it holds must be
/// immutable after construction.
pub trait Mapper: Send + Sync {
    /// Intermediate key type
    type Key: Send;
    /// Intermediate value type
    type Value: Send;

    /// Process one input line of `split`
    fn map(&self, line: &str, split: &InputSplit, ctx: &mut TaskContext<Self::Key, Self::Value>);
}

/// Per-key reduce function
pub trait Reducer: Send + Sync {
    /// Key type delivered by the shuffle
    type InKey;
    /// Value type delivered by the shuffle
    type InValue;
    /// Output key type
    type OutKey;
    /// Output value type
    type OutValue;

    /// Process every value of one key
    fn reduce(
        &self,
        key: &Self::InKey,
        values: Vec<Self::InValue>,
        ctx: &mut TaskContext<Self::OutKey, Self::OutValue>,
    );
}

/// Map-side pre-aggregation
///
/// The substrate may run a combiner zero, one or many times per key, so a combiner must
/// be an associative, commutative merge. Any reducer whose output types equal its input
/// types can serve as one.
pub trait Combiner<K, V>: Send + Sync {
    /// Merge the values of one key into fewer values
    fn combine(&self, key: &K, values: Vec<V>, ctx: &mut TaskContext<K, V>);
}

impl<R> Combiner<R::InKey, R::InValue> for R
where
    R: Reducer<OutKey = <R as Reducer>::InKey, OutValue = <R as Reducer>::InValue>,
{
    fn combine(
        &self,
        key: &R::InKey,
        values: Vec<R::InValue>,
        ctx: &mut TaskContext<R::InKey, R::InValue>,
    ) {
        self.reduce(key, values, ctx);
    }
}
