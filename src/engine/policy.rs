//! Partitioning and key-ordering policies
//!
//! These are the customization points of the shuffle: a partition function choosing the
//! reduce task for each record, and a comparator fixing the key order each reduce task
//! sees.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Chooses the reduce partition for a record
pub trait Partitioner<K, V>: Send + Sync {
    /// Partition index in `[0, num_partitions)`; with zero partitions, always 0
    fn partition(&self, key: &K, value: &V, num_partitions: usize) -> usize;
}

/// Orders keys within a reduce partition
pub trait KeyOrder<K>: Send + Sync {
    /// Compare two keys
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Routes records by a stable hash of the key
#[derive(Debug, Clone, Copy, Default)]
pub struct HashPartitioner;

impl<K: Hash, V> Partitioner<K, V> for HashPartitioner {
    fn partition(&self, key: &K, _value: &V, num_partitions: usize) -> usize {
        if num_partitions == 0 {
            return 0;
        }
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() % num_partitions as u64) as usize
    }
}

/// Routes every record to partition 0, for jobs needing one global order
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePartitioner;

impl<K, V> Partitioner<K, V> for SinglePartitioner {
    fn partition(&self, _key: &K, _value: &V, _num_partitions: usize) -> usize {
        0
    }
}

/// Ascending key order
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<K: Ord> KeyOrder<K> for NaturalOrder {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Descending key order
#[derive(Debug, Clone, Copy, Default)]
pub struct DescendingOrder;

impl<K: Ord> KeyOrder<K> for DescendingOrder {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}
