//! Job execution: map phase, shuffle, reduce phase and output.

use std::fmt::Display;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::engine::counters::{
    COMBINE_OUTPUT_RECORDS, Counters, ILLEGAL_PARTITION, MAP_INPUT_RECORDS, MAP_OUTPUT_RECORDS,
    REDUCE_INPUT_GROUPS, REDUCE_OUTPUT_RECORDS,
};
use crate::engine::policy::{HashPartitioner, KeyOrder, NaturalOrder, Partitioner};
use crate::engine::task::{Combiner, InputSplit, Mapper, Reducer, TaskContext};
use crate::error::{PipelineError, Result};
use crate::utils::io::{
    COUNTERS_FILE, LineWriter, SUCCESS_MARKER, find_input_partitions, part_file_name,
    prepare_output_dir, read_lines,
};
use crate::utils::logging::{
    create_phase_progress_bar, finish_progress_bar, log_counters, log_job_complete, log_job_start,
};

/// Summary of a finished job
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Job name, as used in logs
    pub name: String,
    /// Merged counters of every task
    pub counters: Counters,
    /// Number of map tasks (input partitions)
    pub map_tasks: usize,
    /// Number of reduce tasks; zero for map-only jobs
    pub reduce_tasks: usize,
    /// Part files written, in partition order
    pub output_files: Vec<PathBuf>,
    /// Lines written across all part files
    pub output_records: usize,
    /// Wall-clock duration of the job
    pub elapsed: Duration,
}

impl JobReport {
    /// Log the job's counters, one line each
    pub fn log_counters(&self) {
        log_counters(&self.name, &self.counters);
    }
}

/// A job with no reduce phase: each map task writes its own part file in emission order
pub struct MapOnlyJob<'a, M> {
    name: String,
    mapper: &'a M,
}

impl<'a, M> MapOnlyJob<'a, M>
where
    M: Mapper,
    M::Key: Display,
    M::Value: Display,
{
    /// Create a map-only job
    #[must_use]
    pub fn new(name: impl Into<String>, mapper: &'a M) -> Self {
        Self {
            name: name.into(),
            mapper,
        }
    }

    /// Run the job over every partition of `input_dir`, writing into `output_dir`
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        config: &PipelineConfig,
    ) -> Result<JobReport> {
        let start = Instant::now();
        log_job_start(&self.name, input_dir);

        let splits = discover_splits(input_dir)?;
        prepare_output_dir(output_dir)?;

        let pb = create_phase_progress_bar(splits.len() as u64, Some("map"), config.show_progress);
        let results: Vec<Result<(PathBuf, usize, Counters)>> = splits
            .par_iter()
            .map(|split| {
                let result = self.run_map_task(split, output_dir);
                pb.inc(1);
                result
            })
            .collect();
        finish_progress_bar(&pb, Some("map complete"));

        let mut counters = Counters::new();
        let mut output_files = Vec::with_capacity(splits.len());
        let mut output_records = 0;
        for result in results {
            let (path, written, task_counters) = result?;
            counters.merge(&task_counters);
            output_files.push(path);
            output_records += written;
        }

        finish_job(
            JobReport {
                name: self.name.clone(),
                counters,
                map_tasks: splits.len(),
                reduce_tasks: 0,
                output_files,
                output_records,
                elapsed: start.elapsed(),
            },
            output_dir,
            config,
        )
    }

    fn run_map_task(
        &self,
        split: &InputSplit,
        output_dir: &Path,
    ) -> Result<(PathBuf, usize, Counters)> {
        let ctx = map_split(self.mapper, split)?;
        let (records, counters) = ctx.into_parts();

        let path = output_dir.join(part_file_name(false, split.index));
        let mut writer = LineWriter::create(&path)?;
        for (key, value) in &records {
            writer.write_line(&format!("{key}\t{value}"))?;
        }
        let written = writer.finish()?;
        debug!("Map task {} wrote {} records to {}", split.index, written, path.display());

        Ok((path, written, counters))
    }
}

/// A job with a shuffle and reduce phase
pub struct MapReduceJob<'a, M: Mapper, R> {
    name: String,
    mapper: &'a M,
    reducer: &'a R,
    combiner: Option<&'a dyn Combiner<M::Key, M::Value>>,
    partitioner: Box<dyn Partitioner<M::Key, M::Value> + 'a>,
    order: Box<dyn KeyOrder<M::Key> + 'a>,
    reduce_tasks: usize,
}

/// Output of one map task, already split into reduce partitions
struct MapTaskOutput<K, V> {
    partitions: Vec<Vec<(K, V)>>,
    counters: Counters,
}

impl<'a, M, R> MapReduceJob<'a, M, R>
where
    M: Mapper,
    M::Key: Ord + Hash + Clone + Sync + 'a,
    M::Value: Ord + Sync + 'a,
    R: Reducer<InKey = M::Key, InValue = M::Value>,
    R::OutKey: Display + Send,
    R::OutValue: Display + Send,
{
    /// Create a job with hash partitioning, ascending key order, no combiner and a
    /// single reduce task
    #[must_use]
    pub fn new(name: impl Into<String>, mapper: &'a M, reducer: &'a R) -> Self {
        Self {
            name: name.into(),
            mapper,
            reducer,
            combiner: None,
            partitioner: Box::new(HashPartitioner),
            order: Box::new(NaturalOrder),
            reduce_tasks: 1,
        }
    }

    /// Run `combiner` over each map task's output before the shuffle
    #[must_use]
    pub fn with_combiner(mut self, combiner: &'a dyn Combiner<M::Key, M::Value>) -> Self {
        self.combiner = Some(combiner);
        self
    }

    /// Replace the partition function
    #[must_use]
    pub fn with_partitioner(
        mut self,
        partitioner: impl Partitioner<M::Key, M::Value> + 'a,
    ) -> Self {
        self.partitioner = Box::new(partitioner);
        self
    }

    /// Replace the key comparator
    #[must_use]
    pub fn with_order(mut self, order: impl KeyOrder<M::Key> + 'a) -> Self {
        self.order = Box::new(order);
        self
    }

    /// Set the number of reduce partitions
    ///
    /// Zero is passed through to the partitioner as-is; the job still runs one reduce
    /// task so every record lands somewhere.
    #[must_use]
    pub fn with_reduce_tasks(mut self, reduce_tasks: usize) -> Self {
        self.reduce_tasks = reduce_tasks;
        self
    }

    /// Run the job over every partition of `input_dir`, writing into `output_dir`
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        config: &PipelineConfig,
    ) -> Result<JobReport> {
        let start = Instant::now();
        log_job_start(&self.name, input_dir);

        let splits = discover_splits(input_dir)?;
        prepare_output_dir(output_dir)?;
        let slots = self.reduce_tasks.max(1);

        // Map phase
        let pb = create_phase_progress_bar(splits.len() as u64, Some("map"), config.show_progress);
        let map_results: Vec<Result<MapTaskOutput<M::Key, M::Value>>> = splits
            .par_iter()
            .map(|split| {
                let result = self.run_map_task(split, slots);
                pb.inc(1);
                result
            })
            .collect();
        finish_progress_bar(&pb, Some("map complete"));

        // Shuffle: concatenate every map task's share of each partition, in split order
        let mut counters = Counters::new();
        let mut partitions: Vec<Vec<(M::Key, M::Value)>> = (0..slots).map(|_| Vec::new()).collect();
        for result in map_results {
            let output = result?;
            counters.merge(&output.counters);
            for (target, records) in partitions.iter_mut().zip(output.partitions) {
                target.extend(records);
            }
        }

        // Reduce phase
        let pb = create_phase_progress_bar(slots as u64, Some("reduce"), config.show_progress);
        let reduce_results: Vec<Result<(PathBuf, usize, Counters)>> = partitions
            .into_par_iter()
            .enumerate()
            .map(|(index, records)| {
                let result = self.run_reduce_task(index, records, output_dir);
                pb.inc(1);
                result
            })
            .collect();
        finish_progress_bar(&pb, Some("reduce complete"));

        let mut output_files = Vec::with_capacity(slots);
        let mut output_records = 0;
        for result in reduce_results {
            let (path, written, task_counters) = result?;
            counters.merge(&task_counters);
            output_files.push(path);
            output_records += written;
        }

        finish_job(
            JobReport {
                name: self.name.clone(),
                counters,
                map_tasks: splits.len(),
                reduce_tasks: slots,
                output_files,
                output_records,
                elapsed: start.elapsed(),
            },
            output_dir,
            config,
        )
    }

    fn run_map_task(
        &self,
        split: &InputSplit,
        slots: usize,
    ) -> Result<MapTaskOutput<M::Key, M::Value>> {
        let ctx = map_split(self.mapper, split)?;
        let (mut records, mut counters) = ctx.into_parts();

        if let Some(combiner) = self.combiner {
            let mut combined = TaskContext::new();
            for (key, values) in sort_and_group(records, self.order.as_ref()) {
                combiner.combine(&key, values, &mut combined);
            }
            let (combined_records, combine_counters) = combined.into_parts();
            counters.merge(&combine_counters);
            counters.increment(COMBINE_OUTPUT_RECORDS, combined_records.len() as u64);
            records = combined_records;
        }

        let mut partitions: Vec<Vec<(M::Key, M::Value)>> = (0..slots).map(|_| Vec::new()).collect();
        for (key, value) in records {
            let mut index = self.partitioner.partition(&key, &value, self.reduce_tasks);
            if index >= slots {
                counters.increment(ILLEGAL_PARTITION, 1);
                index %= slots;
            }
            if let Some(partition) = partitions.get_mut(index) {
                partition.push((key, value));
            }
        }

        Ok(MapTaskOutput { partitions, counters })
    }

    fn run_reduce_task(
        &self,
        index: usize,
        records: Vec<(M::Key, M::Value)>,
        output_dir: &Path,
    ) -> Result<(PathBuf, usize, Counters)> {
        let mut ctx = TaskContext::new();
        let groups = sort_and_group(records, self.order.as_ref());
        ctx.increment(REDUCE_INPUT_GROUPS, groups.len() as u64);
        for (key, values) in groups {
            self.reducer.reduce(&key, values, &mut ctx);
        }

        let (output, mut counters) = ctx.into_parts();
        counters.increment(REDUCE_OUTPUT_RECORDS, output.len() as u64);

        let path = output_dir.join(part_file_name(true, index));
        let mut writer = LineWriter::create(&path)?;
        for (key, value) in &output {
            writer.write_line(&format!("{key}\t{value}"))?;
        }
        let written = writer.finish()?;
        debug!("Reduce task {} wrote {} records to {}", index, written, path.display());

        Ok((path, written, counters))
    }
}

/// List the input partitions of a job as splits
fn discover_splits(input_dir: &Path) -> Result<Vec<InputSplit>> {
    let splits: Vec<InputSplit> = find_input_partitions(input_dir)?
        .into_iter()
        .enumerate()
        .map(|(index, path)| InputSplit::new(index, path))
        .collect();

    if splits.is_empty() {
        log::warn!("No input partitions found in {}", input_dir.display());
    }
    Ok(splits)
}

/// Run a mapper over every line of one split
fn map_split<M: Mapper>(mapper: &M, split: &InputSplit) -> Result<TaskContext<M::Key, M::Value>> {
    let lines = read_lines(&split.path)?;
    let mut ctx = TaskContext::new();
    for line in &lines {
        mapper.map(line, split, &mut ctx);
    }
    ctx.increment(MAP_INPUT_RECORDS, lines.len() as u64);
    let emitted = ctx.output().len() as u64;
    ctx.increment(MAP_OUTPUT_RECORDS, emitted);
    Ok(ctx)
}

/// Sort records by key order (values ascending within a key) and group equal keys
///
/// Sorting values as well as keys makes reduce input independent of map task timing, so
/// re-running a job yields byte-identical output.
pub(crate) fn sort_and_group<K, V>(
    mut records: Vec<(K, V)>,
    order: &dyn KeyOrder<K>,
) -> Vec<(K, Vec<V>)>
where
    K: Clone + PartialEq,
    V: Ord,
{
    records.sort_by(|a, b| order.compare(&a.0, &b.0).then_with(|| a.1.cmp(&b.1)));

    let chunks = records.into_iter().chunk_by(|(key, _)| key.clone());
    let mut groups = Vec::new();
    for (key, chunk) in &chunks {
        groups.push((key, chunk.map(|(_, value)| value).collect()));
    }
    groups
}

/// Write the job markers and log the summary
fn finish_job(report: JobReport, output_dir: &Path, config: &PipelineConfig) -> Result<JobReport> {
    if config.write_markers {
        let counters_path = output_dir.join(COUNTERS_FILE);
        let json = serde_json::to_string_pretty(&report.counters)?;
        fs::write(&counters_path, json).map_err(|e| {
            PipelineError::path_with_source(&counters_path, "Failed to write counter report", e)
        })?;

        let marker_path = output_dir.join(SUCCESS_MARKER);
        fs::write(&marker_path, b"").map_err(|e| {
            PipelineError::path_with_source(&marker_path, "Failed to write success marker", e)
        })?;
    }

    log_job_complete(&report.name, output_dir, report.output_records, report.elapsed);
    info!(
        "Job \"{}\": {} map tasks, {} reduce tasks",
        report.name, report.map_tasks, report.reduce_tasks
    );
    Ok(report)
}
