use std::fs;
use std::path::{Path, PathBuf};

use neiss_tf::stages::pipeline::{
    self, FILTERED_DIR, RANKED_DIR, SORTED_BY_YEAR_DIR, WORD_COUNT_DIR, WORD_FREQUENCY_DIR,
    WORD_TOTALS_DIR,
};
use neiss_tf::stages::product_filter;
use neiss_tf::{PipelineError, PipelineOptions, SwapOptions, WordFrequencyOptions};

use crate::utils::{
    part_files, raw_line, read_output_lines, test_config, write_partition, write_reference_dir,
};

const STAGE_DIRS: [&str; 6] = [
    FILTERED_DIR,
    WORD_FREQUENCY_DIR,
    WORD_COUNT_DIR,
    SORTED_BY_YEAR_DIR,
    WORD_TOTALS_DIR,
    RANKED_DIR,
];

fn write_raw_input(root: &Path) -> PathBuf {
    let input = root.join("raw");
    write_partition(
        &input,
        "neiss_2005.tsv",
        &[
            raw_line("90101", "01/15/2005", ("1242", "0"), "PT FELL OFF SLIDE"),
            raw_line("90102", "01/16/2005", ("9999", "8888"), "PT FELL OFF BIKE"),
        ],
    );
    write_partition(
        &input,
        "neiss_2010.tsv",
        &[raw_line("90103", "06/30/2010", ("1293", "0"), "KID FELL FROM RIDE")],
    );
    input
}

fn options() -> PipelineOptions {
    PipelineOptions::new()
        .with_word_frequency(WordFrequencyOptions::new().with_stop_words(true))
        .with_swap(SwapOptions::new().with_descending(true))
}

#[test]
fn test_runs_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = write_raw_input(dir.path());
    let work = dir.path().join("work");

    let report = pipeline::run(&input, &work, &test_config(&reference, 2), &options()).unwrap();

    assert_eq!(report.jobs.len(), 6);
    for stage in STAGE_DIRS {
        assert!(work.join(stage).join("_SUCCESS").exists(), "{stage} has no success marker");
    }
    let filter_counters = report.counters(product_filter::JOB_NAME).unwrap();
    assert_eq!(filter_counters.get(product_filter::NUM_AMUSEMENTS), 2);
    assert_eq!(filter_counters.get(product_filter::NUM_REJECTED), 1);

    assert_eq!(
        read_output_lines(&work.join(RANKED_DIR)),
        vec!["2\tfell", "1\tfrom", "1\tkid", "1\tpt", "1\tride", "1\tslide"]
    );
    assert_eq!(part_files(&work.join(SORTED_BY_YEAR_DIR)).len(), 17);

    let mut counts = read_output_lines(&work.join(WORD_COUNT_DIR));
    counts.sort();
    assert!(counts.contains(&"slide=000090101@part-m-00000\t1/3".to_string()));
    assert!(counts.contains(&"ride=000090103@part-m-00001\t1/4".to_string()));
}

#[test]
fn test_reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = write_raw_input(dir.path());
    let config = test_config(&reference, 3);

    let first = dir.path().join("first");
    let second = dir.path().join("second");
    pipeline::run(&input, &first, &config, &options()).unwrap();
    pipeline::run(&input, &second, &config, &options()).unwrap();

    for stage in STAGE_DIRS {
        let left = part_files(&first.join(stage));
        let right = part_files(&second.join(stage));
        assert_eq!(left.len(), right.len());
        for (a, b) in left.iter().zip(&right) {
            assert_eq!(a.file_name(), b.file_name());
            assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap(), "{} differs", a.display());
        }
    }
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());

    let err = pipeline::run(
        &dir.path().join("missing"),
        &dir.path().join("work"),
        &test_config(&reference, 1),
        &PipelineOptions::new(),
    )
    .unwrap_err();

    assert!(matches!(err, PipelineError::PathIo { .. }));
    assert!(!dir.path().join("work").exists());
}

#[test]
fn test_missing_reference_dir_leaves_no_work_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_raw_input(dir.path());
    let work = dir.path().join("work");

    let err = pipeline::run(
        &input,
        &work,
        &test_config(&dir.path().join("nowhere"), 1),
        &PipelineOptions::new(),
    )
    .unwrap_err();

    assert!(matches!(err, PipelineError::Reference { .. }));
    assert!(!work.exists());
}

#[test]
fn test_missing_stop_words_fails_before_any_stage() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    fs::remove_file(reference.join("StopWords.dat")).unwrap();
    let input = write_raw_input(dir.path());
    let work = dir.path().join("work");

    let err = pipeline::run(&input, &work, &test_config(&reference, 1), &options()).unwrap_err();

    assert!(matches!(err, PipelineError::Reference { .. }));
    assert!(!work.exists());

    pipeline::run(&input, &work, &test_config(&reference, 1), &PipelineOptions::new()).unwrap();
    assert!(work.join(RANKED_DIR).join("_SUCCESS").exists());
}
