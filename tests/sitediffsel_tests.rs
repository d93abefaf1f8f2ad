use diffsel_rs::constants::NUCLEOTIDES;
use diffsel_rs::diffsel::{compute_mut_diffsel, mut_to_site_diffsel};
use diffsel_rs::error::DiffSelError;
use polars::prelude::*;

fn stat(df: &DataFrame, site: i64, name: &str) -> f64 {
    let sites = df.column("site").unwrap().i64().unwrap();
    let vals = df.column(name).unwrap().f64().unwrap();
    for i in 0..df.height() {
        if sites.get(i) == Some(site) {
            return vals.get(i).unwrap();
        }
    }
    panic!("site {} not found", site);
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

#[test]
fn test_site_summaries() {
    // null marks the wildtype position at each site
    let mutdiffsel = df!(
        "site" => &[1i64, 1, 1, 1, 2, 2, 2, 2],
        "wildtype" => &["A", "A", "A", "A", "C", "C", "C", "C"],
        "mutation" => &["A", "C", "G", "T", "A", "C", "G", "T"],
        "mutdiffsel" => &[None, Some(-0.2), Some(3.2), Some(-0.2), Some(4.1), None, Some(0.1), Some(0.0)],
    )
    .unwrap();

    let sitediffsel = mut_to_site_diffsel(&mutdiffsel).unwrap();
    assert_eq!(
        sitediffsel.get_column_names_str(),
        vec![
            "site",
            "abs_diffsel",
            "positive_diffsel",
            "negative_diffsel",
            "max_diffsel",
            "min_diffsel"
        ]
    );
    let sites: Vec<i64> = sitediffsel
        .column("site")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    assert_eq!(sites, [1, 2]);

    assert_close(stat(&sitediffsel, 1, "abs_diffsel"), 3.6);
    assert_close(stat(&sitediffsel, 1, "positive_diffsel"), 3.2);
    assert_close(stat(&sitediffsel, 1, "negative_diffsel"), -0.4);
    assert_close(stat(&sitediffsel, 1, "max_diffsel"), 3.2);
    assert_close(stat(&sitediffsel, 1, "min_diffsel"), -0.2);

    // the exact zero at site 2 lands in both the positive and negative sums
    assert_close(stat(&sitediffsel, 2, "abs_diffsel"), 4.2);
    assert_close(stat(&sitediffsel, 2, "positive_diffsel"), 4.2);
    assert_close(stat(&sitediffsel, 2, "negative_diffsel"), 0.0);
    assert_close(stat(&sitediffsel, 2, "max_diffsel"), 4.1);
    assert_close(stat(&sitediffsel, 2, "min_diffsel"), 0.0);
}

#[test]
fn test_all_null_site_reports_zeros() {
    let mutdiffsel = df!(
        "site" => &[7i64, 7, 7, 7],
        "wildtype" => &["G", "G", "G", "G"],
        "mutation" => &["A", "C", "G", "T"],
        "mutdiffsel" => &[None::<f64>, None, None, None],
    )
    .unwrap();

    let sitediffsel = mut_to_site_diffsel(&mutdiffsel).unwrap();
    assert_eq!(sitediffsel.height(), 1);
    for name in [
        "abs_diffsel",
        "positive_diffsel",
        "negative_diffsel",
        "max_diffsel",
        "min_diffsel",
    ] {
        assert_close(stat(&sitediffsel, 7, name), 0.0);
    }
}

#[test]
fn test_abs_equals_positive_minus_negative() {
    let sel = df!(
        "site" => &[1i64, 2, 3],
        "wildtype" => &["A", "C", "G"],
        "A" => &[100i64, 15, 25],
        "C" => &[10i64, 160, 25],
        "G" => &[20i64, 15, 120],
        "T" => &[70i64, 10, 30],
    )
    .unwrap();
    let mock = df!(
        "site" => &[1i64, 2, 3],
        "wildtype" => &["A", "C", "G"],
        "A" => &[150i64, 20, 30],
        "C" => &[30i64, 140, 20],
        "G" => &[10i64, 25, 130],
        "T" => &[10i64, 15, 20],
    )
    .unwrap();

    let mutdiffsel = compute_mut_diffsel(&sel, &mock, &NUCLEOTIDES, 5.0, false, None, 0).unwrap();
    let sitediffsel = mut_to_site_diffsel(&mutdiffsel).unwrap();

    for site in [1, 2, 3] {
        let abs = stat(&sitediffsel, site, "abs_diffsel");
        let pos = stat(&sitediffsel, site, "positive_diffsel");
        let neg = stat(&sitediffsel, site, "negative_diffsel");
        assert_close(abs, pos - neg);
    }
}

#[test]
fn test_missing_columns_are_fatal() {
    let bad = df!(
        "site" => &[1i64],
        "wildtype" => &["A"],
    )
    .unwrap();

    let result = mut_to_site_diffsel(&bad);
    assert!(matches!(result, Err(DiffSelError::Schema { .. })));
}
