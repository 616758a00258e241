use std::collections::BTreeMap;
use std::fs;

use neiss_tf::PipelineError;
use neiss_tf::stages::product_filter::{self, BAD_RECORD, NUM_AMUSEMENTS, NUM_REJECTED};

use crate::utils::{
    DECODED, raw_line, read_output_lines, test_config, write_partition, write_reference_dir,
};

#[test]
fn test_filters_and_enriches_amusement_records() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("raw");
    write_partition(
        &input,
        "neiss_2005.tsv",
        &[
            raw_line("90101", "01/15/2005", ("1242", "9999"), "PT FELL OFF SLIDE"),
            raw_line("90102", "01/16/2005", ("9999", "8888"), "PT FELL OFF BIKE"),
            raw_line("123456789", "01/17/2005", ("9999", "3295"), "WATER SLIDE"),
            "garbage without tabs".to_string(),
        ],
    );

    let output = dir.path().join("filtered");
    let report = product_filter::run(&input, &output, &test_config(&reference, 1)).unwrap();

    assert_eq!(
        read_output_lines(&output),
        vec![
            format!("000090101\t01/15/2005\t{DECODED}\t1242 9999\tPT FELL OFF SLIDE"),
            format!("123456789\t01/17/2005\t{DECODED}\t9999 3295\tWATER SLIDE"),
        ]
    );
    assert_eq!(report.map_tasks, 1);
    assert_eq!(report.reduce_tasks, 0);
    assert_eq!(report.counters.get(NUM_AMUSEMENTS), 2);
    assert_eq!(report.counters.get(NUM_REJECTED), 1);
    assert_eq!(report.counters.get(BAD_RECORD), 1);
    assert!(output.join("part-m-00000").exists());
}

#[test]
fn test_writes_markers_and_counter_report() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("raw");
    write_partition(&input, "a.tsv", &[raw_line("1", "01/01/2000", ("1200", "0"), "SLIDE")]);

    let output = dir.path().join("filtered");
    product_filter::run(&input, &output, &test_config(&reference, 1)).unwrap();

    assert!(output.join("_SUCCESS").exists());
    let counters: BTreeMap<String, u64> =
        serde_json::from_str(&fs::read_to_string(output.join("_COUNTERS.json")).unwrap()).unwrap();
    assert_eq!(counters.get(NUM_AMUSEMENTS), Some(&1));
}

#[test]
fn test_every_case_number_is_nine_characters() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("raw");
    let lines: Vec<String> = ["1", "42", "90101", "12345678", "123456789"]
        .iter()
        .map(|case| raw_line(case, "01/01/2010", ("1293", "0"), "RIDE"))
        .collect();
    write_partition(&input, "a.tsv", &lines);

    let output = dir.path().join("filtered");
    product_filter::run(&input, &output, &test_config(&reference, 1)).unwrap();

    let keys: Vec<String> = read_output_lines(&output)
        .iter()
        .map(|line| line.split('\t').next().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["000000001", "000000042", "000090101", "012345678", "123456789"]);
}

#[test]
fn test_missing_reference_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    fs::remove_file(reference.join("Location.dat")).unwrap();
    let input = dir.path().join("raw");
    write_partition(&input, "a.tsv", &[raw_line("1", "01/01/2000", ("1242", "0"), "SLIDE")]);

    let output = dir.path().join("filtered");
    let err = product_filter::run(&input, &output, &test_config(&reference, 1)).unwrap_err();

    assert!(matches!(err, PipelineError::Reference { .. }));
    assert!(!output.exists());
}

#[test]
fn test_empty_reference_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    fs::write(reference.join("Gender.dat"), "").unwrap();
    let input = dir.path().join("raw");
    write_partition(&input, "a.tsv", &[raw_line("1", "01/01/2000", ("1242", "0"), "SLIDE")]);

    let output = dir.path().join("filtered");
    let err = product_filter::run(&input, &output, &test_config(&reference, 1)).unwrap_err();
    assert!(err.to_string().contains("Gender"));
}

#[test]
fn test_refuses_to_overwrite_output() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("raw");
    write_partition(&input, "a.tsv", &[raw_line("1", "01/01/2000", ("1242", "0"), "SLIDE")]);
    let output = dir.path().join("filtered");
    let config = test_config(&reference, 1);

    product_filter::run(&input, &output, &config).unwrap();
    let err = product_filter::run(&input, &output, &config).unwrap_err();
    assert!(matches!(err, PipelineError::OutputExists(_)));
}
