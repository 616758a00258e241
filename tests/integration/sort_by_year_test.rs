use std::fs;

use neiss_tf::stages::sort_by_year::{self, BAD_DATE, TOTAL_YEARS_OF_DATA};

use crate::utils::{enriched_line, part_files, test_config, write_partition, write_reference_dir};

#[test]
fn test_one_partition_per_year_in_case_order() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let filtered = dir.path().join("filtered");
    write_partition(
        &filtered,
        "part-m-00000",
        &[
            enriched_line("000000003", "03/01/2013", "C"),
            enriched_line("000000002", "02/01/1997", "B"),
            enriched_line("000000001", "01/01/2013", "A"),
            enriched_line("000000004", "04/01/2005", "D"),
        ],
    );

    let output = dir.path().join("sorted");
    let report = sort_by_year::run(&filtered, &output, &test_config(&reference, 5)).unwrap();

    assert_eq!(report.reduce_tasks, TOTAL_YEARS_OF_DATA);
    let files = part_files(&output);
    assert_eq!(files.len(), 17);

    let first = fs::read_to_string(&files[0]).unwrap();
    assert_eq!(first, format!("{}\n", enriched_line("000000002", "02/01/1997", "B")));

    let year_2005 = fs::read_to_string(&files[8]).unwrap();
    assert!(year_2005.starts_with("000000004\t04/01/2005"));

    let last: Vec<String> =
        fs::read_to_string(&files[16]).unwrap().lines().map(str::to_string).collect();
    assert_eq!(
        last,
        vec![
            enriched_line("000000001", "01/01/2013", "A"),
            enriched_line("000000003", "03/01/2013", "C"),
        ]
    );
    assert!(fs::read_to_string(&files[1]).unwrap().is_empty());
}

#[test]
fn test_unreadable_date_goes_to_first_partition() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_reference_dir(dir.path());
    let filtered = dir.path().join("filtered");
    write_partition(&filtered, "part-m-00000", &[enriched_line("000000009", "2010-01-01", "X")]);

    let output = dir.path().join("sorted");
    let report = sort_by_year::run(&filtered, &output, &test_config(&reference, 1)).unwrap();

    assert_eq!(report.counters.get(BAD_DATE), 1);
    assert!(fs::read_to_string(&part_files(&output)[0]).unwrap().starts_with("000000009"));
}
