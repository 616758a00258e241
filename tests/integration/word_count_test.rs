use neiss_tf::WordFrequencyOptions;
use neiss_tf::stages::word_count::{self, TOTAL_RECORDS_GENERATED};
use neiss_tf::stages::word_frequency;

use crate::utils::{
    enriched_line, read_output_lines, test_config, write_partition, write_reference_dir,
};

#[test]
fn test_counts_against_record_total() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let filtered = dir.path().join("filtered");
    write_partition(
        &filtered,
        "part-m-00000",
        &[
            enriched_line("000000001", "01/01/2010", "the cat the the"),
            enriched_line("000000002", "01/01/2010", "slide"),
        ],
    );
    let config = test_config(&reference, 3);

    let frequencies = dir.path().join("frequency");
    word_frequency::run(&filtered, &frequencies, &config, &WordFrequencyOptions::new()).unwrap();
    let output = dir.path().join("count");
    let report = word_count::run(&frequencies, &output, &config).unwrap();

    let mut lines = read_output_lines(&output);
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "cat=000000001@part-m-00000\t1/4",
            "slide=000000002@part-m-00000\t1/1",
            "the=000000001@part-m-00000\t3/4",
        ]
    );
    assert_eq!(report.reduce_tasks, 3);
    assert_eq!(report.counters.get(TOTAL_RECORDS_GENERATED), 3);
}

#[test]
fn test_record_totals_sum_to_total() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let filtered = dir.path().join("filtered");
    write_partition(
        &filtered,
        "part-m-00000",
        &[enriched_line("000000007", "01/01/2010", "KID FELL OFF SLIDE AND FELL ON SLIDE LADDER")],
    );
    let config = test_config(&reference, 2);

    let frequencies = dir.path().join("frequency");
    word_frequency::run(&filtered, &frequencies, &config, &WordFrequencyOptions::new()).unwrap();
    let output = dir.path().join("count");
    word_count::run(&frequencies, &output, &config).unwrap();

    let lines = read_output_lines(&output);
    let mut sum = 0;
    for line in &lines {
        let (_, ratio) = line.split_once('\t').unwrap();
        let (count, total) = ratio.split_once('/').unwrap();
        assert_eq!(total, "9");
        sum += count.parse::<u64>().unwrap();
    }
    assert_eq!(sum, 9);
    assert_eq!(lines.len(), 7);
}
