use std::fs;

use neiss_tf::stages::word_frequency::{
    self, NUM_REJECTED_STOPWORDS, NUM_VALID_WORDS, TOTAL_RECORDS_PROCESSED,
};
use neiss_tf::{PipelineError, WordFrequencyOptions};

use crate::utils::{
    enriched_line, read_output_lines, test_config, write_partition, write_reference_dir,
};

#[test]
fn test_case_insensitive_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("filtered");
    let line = enriched_line("000000001", "01/01/2010", "Slide SLIDE slide");
    write_partition(&input, "part-m-00000", &[line]);

    let output = dir.path().join("frequency");
    let config = test_config(&reference, 1);
    let options = WordFrequencyOptions::new();
    let report = word_frequency::run(&input, &output, &config, &options).unwrap();

    assert_eq!(read_output_lines(&output), vec!["slide\t000000001@part-m-00000\t3"]);
    assert_eq!(report.counters.get(TOTAL_RECORDS_PROCESSED), 1);
    assert_eq!(report.counters.get(NUM_VALID_WORDS), 3);
}

#[test]
fn test_case_sensitive_keeps_variants_apart() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("filtered");
    let line = enriched_line("000000001", "01/01/2010", "Slide SLIDE slide");
    write_partition(&input, "part-m-00000", &[line]);

    let output = dir.path().join("frequency");
    let options = WordFrequencyOptions::new().with_case_sensitive(true);
    word_frequency::run(&input, &output, &test_config(&reference, 1), &options).unwrap();

    assert_eq!(
        read_output_lines(&output),
        vec![
            "SLIDE\t000000001@part-m-00000\t1",
            "Slide\t000000001@part-m-00000\t1",
            "slide\t000000001@part-m-00000\t1",
        ]
    );
}

#[test]
fn test_stop_words_are_dropped_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("filtered");
    write_partition(
        &input,
        "part-m-00000",
        &[enriched_line("000000001", "01/01/2010", "THE KID FELL OFF THE SLIDE")],
    );

    let output = dir.path().join("frequency");
    let options = WordFrequencyOptions::new().with_stop_words(true);
    let config = test_config(&reference, 1);
    let report = word_frequency::run(&input, &output, &config, &options).unwrap();

    let words: Vec<String> = read_output_lines(&output)
        .iter()
        .map(|line| line.split('\t').next().unwrap().to_string())
        .collect();
    assert_eq!(words, vec!["fell", "kid", "slide"]);
    assert_eq!(report.counters.get(NUM_REJECTED_STOPWORDS), 3);
}

#[test]
fn test_missing_stop_words_only_fatal_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    fs::remove_file(reference.join("StopWords.dat")).unwrap();
    let input = dir.path().join("filtered");
    write_partition(&input, "part-m-00000", &[enriched_line("000000001", "01/01/2010", "SLIDE")]);
    let config = test_config(&reference, 1);

    let err = word_frequency::run(
        &input,
        &dir.path().join("with-stop-words"),
        &config,
        &WordFrequencyOptions::new().with_stop_words(true),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Reference { .. }));

    let plain = dir.path().join("plain");
    word_frequency::run(&input, &plain, &config, &WordFrequencyOptions::new()).unwrap();
}

#[test]
fn test_empty_description_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("filtered");
    write_partition(
        &input,
        "part-m-00000",
        &[
            enriched_line("000000001", "01/01/2010", ""),
            enriched_line("000000002", "01/01/2010", "SLIDE"),
        ],
    );

    let output = dir.path().join("frequency");
    let config = test_config(&reference, 1);
    word_frequency::run(&input, &output, &config, &WordFrequencyOptions::new()).unwrap();

    assert_eq!(read_output_lines(&output), vec!["slide\t000000002@part-m-00000\t1"]);
}

#[test]
fn test_same_case_number_in_two_partitions_stays_apart() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("filtered");
    write_partition(&input, "part-m-00000", &[enriched_line("000000001", "01/01/2010", "SLIDE")]);
    write_partition(&input, "part-m-00001", &[enriched_line("000000001", "01/01/2011", "SLIDE")]);

    let output = dir.path().join("frequency");
    let config = test_config(&reference, 1);
    word_frequency::run(&input, &output, &config, &WordFrequencyOptions::new()).unwrap();

    assert_eq!(
        read_output_lines(&output),
        vec!["slide\t000000001@part-m-00000\t1", "slide\t000000001@part-m-00001\t1"]
    );
}
