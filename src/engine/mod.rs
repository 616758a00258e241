//! Local batch execution substrate.
//!
//! Runs a job as parallel map tasks (one per input file), an optional map-side combiner,
//! a partitioned and sorted shuffle, and parallel reduce tasks (one per partition). Only
//! the contracts the stages rely on are implemented: grouping of all values of a key in
//! one reduce task, keys in comparator order, and counters returned per task.

pub mod counters;
pub mod job;
pub mod policy;
pub mod task;

pub use counters::Counters;
pub use job::{JobReport, MapOnlyJob, MapReduceJob};
pub use policy::{
    DescendingOrder, HashPartitioner, KeyOrder, NaturalOrder, Partitioner, SinglePartitioner,
};
pub use task::{Combiner, InputSplit, Mapper, Reducer, TaskContext};
