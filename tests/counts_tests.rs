use diffsel_rs::counts;
use polars::prelude::*;

#[test]
fn test_read_counts() {
    let df = counts::read_counts("tests/data/sel_counts.csv").unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 6);

    // test file does not exist
    let result = counts::read_counts("tests/data/nonexistent.csv");
    assert!(result.is_err());
}

#[test]
fn test_write_counts() {
    let path = "tests/data/test_counts_out.csv";
    let df: DataFrame = df!(
        "site" => &[1i64, 2],
        "wildtype" => &["A", "C"],
        "A" => &[10i64, 0],
        "C" => &[1i64, 12],
        "G" => &[2i64, 3],
        "T" => &[0i64, 1],
    )
    .unwrap();

    counts::write_counts(&df, path).unwrap();

    let df_out = counts::read_counts(path).unwrap();
    assert_eq!(df_out.height(), 2);
    assert_eq!(df_out.width(), 6);

    // clean up
    std::fs::remove_file(path).unwrap();
}
