//! Integer summing reducer, used both as combiner and reducer

use std::marker::PhantomData;

use crate::engine::{Reducer, TaskContext};

/// Sums every count of a key
///
/// Summation is associative and commutative, so the same reducer serves as the map-side
/// combiner.
#[derive(Debug)]
pub struct SumReducer<K> {
    _key: PhantomData<fn() -> K>,
}

impl<K> SumReducer<K> {
    #[must_use]
    pub fn new() -> Self {
        Self { _key: PhantomData }
    }
}

impl<K> Default for SumReducer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Reducer for SumReducer<K> {
    type InKey = K;
    type InValue = u64;
    type OutKey = K;
    type OutValue = u64;

    fn reduce(&self, key: &K, values: Vec<u64>, ctx: &mut TaskContext<K, u64>) {
        ctx.write(key.clone(), values.into_iter().sum());
    }
}
