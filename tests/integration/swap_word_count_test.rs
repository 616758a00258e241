use std::fs;

use neiss_tf::SwapOptions;
use neiss_tf::stages::swap_word_count;

use crate::utils::{part_files, test_config, write_partition, write_reference_dir};

fn ranked(descending: bool) -> String {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let totals = dir.path().join("totals");
    write_partition(&totals, "part-r-00000", &["a\t5".to_string(), "b\t2".to_string()]);
    write_partition(&totals, "part-r-00001", &["c\t9".to_string()]);

    let output = dir.path().join("ranked");
    let options = SwapOptions::new().with_descending(descending);
    let config = test_config(&reference, 24);
    let report = swap_word_count::run(&totals, &output, &config, &options).unwrap();

    assert_eq!(report.reduce_tasks, 1);
    let files = part_files(&output);
    assert_eq!(files.len(), 1);
    fs::read_to_string(&files[0]).unwrap()
}

#[test]
fn test_descending_ranking() {
    assert_eq!(ranked(true), "9\tc\n5\ta\n2\tb\n");
}

#[test]
fn test_ascending_ranking() {
    assert_eq!(ranked(false), "2\tb\n5\ta\n9\tc\n");
}

#[test]
fn test_ties_list_words_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let totals = dir.path().join("totals");
    write_partition(
        &totals,
        "part-r-00000",
        &["slide\t3".to_string(), "fell\t3".to_string(), "kid\t1".to_string(), "oops".to_string()],
    );

    let output = dir.path().join("ranked");
    let options = SwapOptions::new().with_descending(true);
    let config = test_config(&reference, 1);
    let report = swap_word_count::run(&totals, &output, &config, &options).unwrap();

    let ranked = fs::read_to_string(&part_files(&output)[0]).unwrap();
    assert_eq!(ranked, "3\tfell\n3\tslide\n1\tkid\n");
    assert_eq!(report.counters.get(swap_word_count::MALFORMED_RECORDS), 1);
}
