use std::path::Path;
use std::process::{Command, Output};

use crate::utils::{
    enriched_line, raw_line, read_output_lines, write_partition, write_reference_dir,
};

fn neiss_tf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_neiss-tf"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_help_exits_zero() {
    let output = neiss_tf(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("word-frequency"));
}

#[test]
fn test_missing_arguments_is_a_usage_error() {
    let output = neiss_tf(&["word-count"]);
    assert_eq!(output.status.code(), Some(255));
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_missing_reference_dir_fails_the_job() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw");
    write_partition(&input, "a.tsv", &[raw_line("1", "01/01/2000", ("1242", "0"), "SLIDE")]);
    let output_dir = dir.path().join("filtered");

    let output = neiss_tf(&[
        "--no-progress",
        "--reference-dir",
        path(&dir.path().join("nowhere")),
        "product-filter",
        path(&input),
        path(&output_dir),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!output_dir.exists());
}

#[test]
fn test_single_dash_stage_flags() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let input = dir.path().join("filtered");
    let line = enriched_line("000000001", "01/01/2010", "The Slide");
    write_partition(&input, "part-m-00000", &[line]);
    let output_dir = dir.path().join("frequency");

    let output = neiss_tf(&[
        "word-frequency",
        path(&input),
        path(&output_dir),
        "-stopWords",
        "-caseSensitive",
        "--reference-dir",
        path(&reference),
        "--no-progress",
    ]);

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        read_output_lines(&output_dir),
        vec!["Slide\t000000001@part-m-00000\t1", "The\t000000001@part-m-00000\t1"]
    );
}
