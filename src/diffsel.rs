use crate::constants::{CODONS, CODON_TO_AA};
use crate::error::{DiffSelError, Result};
use crate::types::{CountTable, MutDiffSelTable, SiteDiffSelTable};
use polars::lazy::dsl::*;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Long-form counts for one sample: one entry per (site, mutation) pair,
/// site-major with mutations in alphabetical order, plus the per-site total
/// recomputed from the melted counts.
struct MeltedSample {
    n: Vec<f64>,
    n_total: Vec<f64>,
}

/// Computes mutation differential selection.
///
/// For every (site, mutation) pair this is the log2 ratio of the mutation's
/// relative frequency in the selected sample versus the mock sample, each
/// normalized by the wildtype frequency in that sample. Counts are optionally
/// corrected with an error-control sample and regularized with a pseudocount
/// scaled by the ratio of the two samples' per-site depths.
///
/// # Arguments
/// * `sel` - Counts for the selected sample, with columns `site`, `wildtype`,
///   and every character in `characters`
/// * `mock` - Counts for the mock-selected sample, same schema as `sel`
/// * `characters` - All count characters (e.g. codons or nucleotides)
/// * `pseudocount` - Pseudocount added to counts, must be > 0
/// * `translate_to_aa` - Translate codon counts to amino-acid counts before
///   computing differential selection; requires `characters` to be the 64 codons
/// * `err` - Optional error-control counts, same schema as `sel`
/// * `mincount` - Mutations where both `sel` and `mock` have fewer counts than
///   this are reported as null
///
/// # Returns
/// * `Result<MutDiffSelTable>` - A DataFrame with columns `site`, `wildtype`,
///   `mutation`, `mutdiffsel`, sorted by site then mutation. `mutdiffsel` is
///   null at the wildtype character and at mutations suppressed by `mincount`.
///
/// # Errors
/// * `DiffSelError::InvalidParameter` - If `pseudocount` is not > 0
/// * `DiffSelError::Schema` - If a table's columns are not exactly
///   `site`, `wildtype`, and `characters`
/// * `DiffSelError::Alignment` - If sites or wildtypes differ between tables
/// * `DiffSelError::DegenerateControl` - If `err` has a zero count at a
///   wildtype position
/// * `DiffSelError::AlphabetMismatch` - If `translate_to_aa` is set but
///   `characters` is not the codon alphabet
///
/// # Example
/// ```ignore
/// use diffsel_rs::constants::NUCLEOTIDES;
/// use diffsel_rs::diffsel::compute_mut_diffsel;
///
/// let mutdiffsel = compute_mut_diffsel(&sel, &mock, &NUCLEOTIDES, 10.0, false, None, 0).unwrap();
/// println!("{:?}", mutdiffsel);
/// ```
pub fn compute_mut_diffsel(
    sel: &CountTable,
    mock: &CountTable,
    characters: &[&str],
    pseudocount: f64,
    translate_to_aa: bool,
    err: Option<&CountTable>,
    mincount: u64,
) -> Result<MutDiffSelTable> {
    if !(pseudocount > 0.0 && pseudocount.is_finite()) {
        return Err(DiffSelError::invalid_parameter(
            "pseudocount",
            pseudocount,
            "must be a finite number > 0",
        ));
    }
    if translate_to_aa {
        let want: HashSet<&str> = CODONS.iter().copied().collect();
        let got: HashSet<&str> = characters.iter().copied().collect();
        if want != got {
            return Err(DiffSelError::AlphabetMismatch(
                "count characters are not the 64 codons".into(),
            ));
        }
    }

    check_columns(sel, characters, "sel")?;
    check_columns(mock, characters, "mock")?;

    let sel = sort_by_site(sel)?;
    let mock = sort_by_site(mock)?;
    let sites = site_values(&sel, "sel")?;
    let wildtypes = wildtype_values(&sel, "sel")?;
    check_sites_unique(&sites, "sel")?;
    check_wildtypes_in_alphabet(&sites, &wildtypes, characters, "sel")?;
    check_alignment(&sites, &wildtypes, &mock, "sel", "mock")?;

    let err = match err {
        Some(e) => {
            check_columns(e, characters, "err")?;
            let e = sort_by_site(e)?;
            check_alignment(&sites, &wildtypes, &e, "sel", "err")?;
            Some(e)
        }
        None => None,
    };

    // melt each sample to long form, site-major with mutations alphabetical
    let mut chars: Vec<&str> = characters.to_vec();
    chars.sort_unstable();
    let melted_sel = melt_sample(&sel, &chars, "sel")?;
    let melted_mock = melt_sample(&mock, &chars, "mock")?;
    let melted_err = match &err {
        Some(e) => Some(melt_sample(e, &chars, "err")?),
        None => None,
    };

    let nrows = sites.len() * chars.len();
    let mut site_col = Vec::with_capacity(nrows);
    let mut wt_col = Vec::with_capacity(nrows);
    let mut mut_col = Vec::with_capacity(nrows);
    for (i, &site) in sites.iter().enumerate() {
        for &c in &chars {
            site_col.push(site);
            wt_col.push(wildtypes[i].clone());
            mut_col.push(c.to_string());
        }
    }

    if let Some(me) = &melted_err {
        for i in 0..nrows {
            if mut_col[i] == wt_col[i] && me.n[i] <= 0.0 {
                return Err(DiffSelError::DegenerateControl { site: site_col[i] });
            }
        }
    }

    let mut columns = vec![
        Column::new("site".into(), site_col),
        Column::new("wildtype".into(), wt_col),
        Column::new("mutation".into(), mut_col),
        Column::new("nsel".into(), melted_sel.n),
        Column::new("Nsel".into(), melted_sel.n_total),
        Column::new("nmock".into(), melted_mock.n),
        Column::new("Nmock".into(), melted_mock.n_total),
    ];
    if let Some(me) = melted_err {
        columns.push(Column::new("nerr".into(), me.n));
        columns.push(Column::new("Nerr".into(), me.n_total));
    }
    let mut m = DataFrame::new(columns).map_err(|e| DiffSelError::Data(e.to_string()))?;

    if err.is_some() {
        m = correct_counts(m)?;
    }

    if translate_to_aa {
        m = translate_counts(&m)?;
    }

    // pseudocounts scaled by relative depth, then the wildtype-normalized
    // enrichment ratio, masking the wildtype row and low-evidence mutations
    let scaled_sel = max_horizontal([lit(1.0), col("Nsel") / col("Nmock")])
        .map_err(|e| DiffSelError::Data(e.to_string()))?;
    let scaled_mock = max_horizontal([lit(1.0), col("Nmock") / col("Nsel")])
        .map_err(|e| DiffSelError::Data(e.to_string()))?;
    let enough_counts = col("nsel")
        .gt_eq(lit(mincount as f64))
        .or(col("nmock").gt_eq(lit(mincount as f64)));
    let enrichment =
        (col("nselP") / col("nselPwt")) / (col("nmockP") / col("nmockPwt"));
    m.lazy()
        .with_columns([
            (col("nsel") + lit(pseudocount) * scaled_sel).alias("nselP"),
            (col("nmock") + lit(pseudocount) * scaled_mock).alias("nmockP"),
        ])
        .with_columns([
            col("nselP")
                .filter(col("mutation").eq(col("wildtype")))
                .first()
                .over([col("site")])
                .alias("nselPwt"),
            col("nmockP")
                .filter(col("mutation").eq(col("wildtype")))
                .first()
                .over([col("site")])
                .alias("nmockPwt"),
        ])
        .with_column(
            when(col("mutation").neq(col("wildtype")).and(enough_counts))
                .then(enrichment.log(2.0))
                .otherwise(lit(NULL))
                .alias("mutdiffsel"),
        )
        .select([
            col("site"),
            col("wildtype"),
            col("mutation"),
            col("mutdiffsel"),
        ])
        .collect()
        .map_err(|e| DiffSelError::Data(e.to_string()))
}

/// Computes site differential selection from mutation differential selection.
///
/// Null `mutdiffsel` values count as 0, so a site with no qualifying mutations
/// reports 0 for every summary. Mutations with a value of exactly 0 contribute
/// to both `positive_diffsel` and `negative_diffsel`.
///
/// # Arguments
/// * `mutdiffsel` - DataFrame as returned by [`compute_mut_diffsel`]
///
/// # Returns
/// * `Result<SiteDiffSelTable>` - A DataFrame with one row per site, sorted by
///   site, and columns:
///   - `abs_diffsel`: sum of absolute values of mutdiffsel at the site
///   - `positive_diffsel`: sum of mutdiffsel values >= 0
///   - `negative_diffsel`: sum of mutdiffsel values <= 0
///   - `max_diffsel`, `min_diffsel`: largest and smallest mutdiffsel
///
/// # Errors
/// * `DiffSelError::Schema` - If `site`, `mutation`, or `mutdiffsel` is missing
pub fn mut_to_site_diffsel(mutdiffsel: &MutDiffSelTable) -> Result<SiteDiffSelTable> {
    let found: HashSet<&str> = mutdiffsel
        .get_column_names()
        .iter()
        .map(|s| s.as_str())
        .collect();
    let missing: Vec<String> = ["site", "mutation", "mutdiffsel"]
        .iter()
        .filter(|c| !found.contains(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DiffSelError::Schema {
            table: "mutdiffsel".into(),
            missing,
            unexpected: vec![],
        });
    }

    let v = col("mutdiffsel").fill_null(lit(0.0));
    mutdiffsel
        .clone()
        .lazy()
        .group_by([col("site")])
        .agg([
            v.clone().abs().sum().alias("abs_diffsel"),
            v.clone()
                .filter(v.clone().gt_eq(lit(0.0)))
                .sum()
                .alias("positive_diffsel"),
            v.clone()
                .filter(v.clone().lt_eq(lit(0.0)))
                .sum()
                .alias("negative_diffsel"),
            v.clone().max().alias("max_diffsel"),
            v.min().alias("min_diffsel"),
        ])
        .sort(["site"], SortMultipleOptions::default())
        .collect()
        .map_err(|e| DiffSelError::Data(e.to_string()))
}

fn check_columns(df: &DataFrame, characters: &[&str], table: &str) -> Result<()> {
    let expected: HashSet<&str> = ["site", "wildtype"]
        .into_iter()
        .chain(characters.iter().copied())
        .collect();
    let found: HashSet<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    if expected != found {
        let mut missing: Vec<String> = expected
            .difference(&found)
            .map(|s| s.to_string())
            .collect();
        let mut unexpected: Vec<String> = found
            .difference(&expected)
            .map(|s| s.to_string())
            .collect();
        missing.sort();
        unexpected.sort();
        return Err(DiffSelError::Schema {
            table: table.into(),
            missing,
            unexpected,
        });
    }
    Ok(())
}

fn sort_by_site(df: &DataFrame) -> Result<DataFrame> {
    df.sort(["site"], SortMultipleOptions::default())
        .map_err(|e| DiffSelError::Data(e.to_string()))
}

fn site_values(df: &DataFrame, table: &str) -> Result<Vec<i64>> {
    let s = df
        .column("site")
        .map_err(|e| DiffSelError::Data(e.to_string()))?
        .as_materialized_series()
        .cast(&DataType::Int64)
        .map_err(|_| {
            DiffSelError::InvalidInput(format!("non-integer site column in {}", table))
        })?;
    let ca = s.i64().map_err(|e| DiffSelError::Data(e.to_string()))?;
    ca.into_iter()
        .map(|v| v.ok_or_else(|| DiffSelError::InvalidInput(format!("null site in {}", table))))
        .collect()
}

fn wildtype_values(df: &DataFrame, table: &str) -> Result<Vec<String>> {
    let column = df
        .column("wildtype")
        .map_err(|e| DiffSelError::Data(e.to_string()))?;
    let ca = column.str().map_err(|_| {
        DiffSelError::InvalidInput(format!("non-string wildtype column in {}", table))
    })?;
    ca.into_iter()
        .map(|v| {
            v.map(|s| s.to_string())
                .ok_or_else(|| DiffSelError::InvalidInput(format!("null wildtype in {}", table)))
        })
        .collect()
}

fn check_sites_unique(sites: &[i64], table: &str) -> Result<()> {
    // sites are sorted by now, so duplicates are adjacent
    for w in sites.windows(2) {
        if w[0] == w[1] {
            return Err(DiffSelError::InvalidInput(format!(
                "duplicate site {} in {}",
                w[0], table
            )));
        }
    }
    Ok(())
}

fn check_wildtypes_in_alphabet(
    sites: &[i64],
    wildtypes: &[String],
    characters: &[&str],
    table: &str,
) -> Result<()> {
    let alphabet: HashSet<&str> = characters.iter().copied().collect();
    for (site, wt) in sites.iter().zip(wildtypes) {
        if !alphabet.contains(wt.as_str()) {
            return Err(DiffSelError::InvalidInput(format!(
                "wildtype {:?} at site {} in {} is not a count character",
                wt, site, table
            )));
        }
    }
    Ok(())
}

/// Verifies that `right` assigns the same sites and wildtypes as the
/// already-extracted reference sequences, in sorted order.
fn check_alignment(
    sites: &[i64],
    wildtypes: &[String],
    right: &DataFrame,
    left_name: &str,
    right_name: &str,
) -> Result<()> {
    let rsites = site_values(right, right_name)?;
    let rwts = wildtype_values(right, right_name)?;
    if rsites.len() != sites.len() {
        return Err(DiffSelError::InvalidInput(format!(
            "{} and {} have different numbers of sites",
            left_name, right_name
        )));
    }
    for (i, (&l, &r)) in sites.iter().zip(&rsites).enumerate() {
        if l != r {
            return Err(DiffSelError::Alignment {
                what: "sites".into(),
                left: left_name.into(),
                right: right_name.into(),
                site: sites[i],
            });
        }
    }
    for (i, (l, r)) in wildtypes.iter().zip(&rwts).enumerate() {
        if l != r {
            return Err(DiffSelError::Alignment {
                what: "wildtypes".into(),
                left: left_name.into(),
                right: right_name.into(),
                site: sites[i],
            });
        }
    }
    Ok(())
}

/// Reshapes a wide count table to long form and recomputes the per-site total
/// from the melted counts.
fn melt_sample(df: &DataFrame, chars_sorted: &[&str], table: &str) -> Result<MeltedSample> {
    let nrows = df.height();
    let mut per_char: Vec<Vec<f64>> = Vec::with_capacity(chars_sorted.len());
    for &c in chars_sorted {
        let s = df
            .column(c)
            .map_err(|e| DiffSelError::Data(e.to_string()))?
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|_| {
                DiffSelError::InvalidInput(format!("non-numeric counts for {} in {}", c, table))
            })?;
        let ca = s.f64().map_err(|e| DiffSelError::Data(e.to_string()))?;
        let vals: Vec<f64> = ca
            .into_iter()
            .map(|v| {
                v.ok_or_else(|| {
                    DiffSelError::InvalidInput(format!("null count for {} in {}", c, table))
                })
            })
            .collect::<Result<_>>()?;
        per_char.push(vals);
    }

    let mut n = Vec::with_capacity(nrows * chars_sorted.len());
    let mut n_total = Vec::with_capacity(nrows * chars_sorted.len());
    for i in 0..nrows {
        let total: f64 = per_char.iter().map(|v| v[i]).sum();
        for v in &per_char {
            n.push(v[i]);
            n_total.push(total);
        }
    }
    Ok(MeltedSample { n, n_total })
}

/// Subtracts the error-control rate from the sel and mock counts.
///
/// At the wildtype character the raw count is rescaled by the site's estimated
/// correct-call rate instead of using the subtractive formula, which would
/// divide by zero there. Corrected counts are floored at zero and the per-site
/// totals are recomputed from the corrected counts.
fn correct_counts(m: DataFrame) -> Result<DataFrame> {
    let corrected = |ncol: &str, total: &str| -> Result<Expr> {
        let floored = max_horizontal([
            lit(0.0),
            col(total) * (col(ncol) / col(total) - col("epsilon")),
        ])
        .map_err(|e| DiffSelError::Data(e.to_string()))?;
        Ok(when(col("mutation").eq(col("wildtype")))
            .then(col(ncol) / col("epsilon"))
            .otherwise(floored)
            .alias(ncol))
    };
    m.lazy()
        .with_column((col("nerr") / col("Nerr")).alias("epsilon"))
        .with_columns([corrected("nsel", "Nsel")?, corrected("nmock", "Nmock")?])
        .with_columns([
            col("nsel").sum().over([col("site")]).alias("Nsel"),
            col("nmock").sum().over([col("site")]).alias("Nmock"),
        ])
        .collect()
        .map_err(|e| DiffSelError::Data(e.to_string()))
}

/// Translates codon counts to amino-acid counts, summing the counts of all
/// codons at a site that encode the same amino acid. Synonymous codons
/// collapse into the wildtype amino acid's own row.
fn translate_counts(m: &DataFrame) -> Result<DataFrame> {
    let sites = site_values(m, "melted")?;
    let wts = wildtype_values(m, "melted")?;
    let muts = m
        .column("mutation")
        .map_err(|e| DiffSelError::Data(e.to_string()))?
        .str()
        .map_err(|e| DiffSelError::Data(e.to_string()))?;
    let numeric = |name: &str| -> Result<Vec<f64>> {
        m.column(name)
            .map_err(|e| DiffSelError::Data(e.to_string()))?
            .f64()
            .map_err(|e| DiffSelError::Data(e.to_string()))?
            .into_iter()
            .map(|v| v.ok_or_else(|| DiffSelError::data(format!("null {} in melted counts", name))))
            .collect()
    };
    let nsel = numeric("nsel")?;
    let n_sel_tot = numeric("Nsel")?;
    let nmock = numeric("nmock")?;
    let n_mock_tot = numeric("Nmock")?;

    let translate = |codon: &str| -> Result<&'static str> {
        CODON_TO_AA
            .get(codon)
            .copied()
            .ok_or_else(|| DiffSelError::AlphabetMismatch(format!("unknown codon {:?}", codon)))
    };

    // (site, wildtype aa, mutation aa) -> summed counts; the per-site totals
    // are unchanged by the grouping since every codon lands in some group
    let mut grouped: BTreeMap<(i64, &'static str, &'static str), (f64, f64)> = BTreeMap::new();
    let mut totals: HashMap<i64, (f64, f64)> = HashMap::new();
    for i in 0..m.height() {
        let mutation = muts
            .get(i)
            .ok_or_else(|| DiffSelError::data("null mutation in melted counts"))?;
        let key = (sites[i], translate(&wts[i])?, translate(mutation)?);
        let entry = grouped.entry(key).or_insert((0.0, 0.0));
        entry.0 += nsel[i];
        entry.1 += nmock[i];
        totals.insert(sites[i], (n_sel_tot[i], n_mock_tot[i]));
    }

    let nrows = grouped.len();
    let mut site_col = Vec::with_capacity(nrows);
    let mut wt_col = Vec::with_capacity(nrows);
    let mut mut_col = Vec::with_capacity(nrows);
    let mut nsel_col = Vec::with_capacity(nrows);
    let mut n_sel_tot_col = Vec::with_capacity(nrows);
    let mut nmock_col = Vec::with_capacity(nrows);
    let mut n_mock_tot_col = Vec::with_capacity(nrows);
    for ((site, wt, mutation), (nsel, nmock)) in grouped {
        let (sel_tot, mock_tot) = totals[&site];
        site_col.push(site);
        wt_col.push(wt);
        mut_col.push(mutation);
        nsel_col.push(nsel);
        n_sel_tot_col.push(sel_tot);
        nmock_col.push(nmock);
        n_mock_tot_col.push(mock_tot);
    }
    DataFrame::new(vec![
        Column::new("site".into(), site_col),
        Column::new("wildtype".into(), wt_col),
        Column::new("mutation".into(), mut_col),
        Column::new("nsel".into(), nsel_col),
        Column::new("Nsel".into(), n_sel_tot_col),
        Column::new("nmock".into(), nmock_col),
        Column::new("Nmock".into(), n_mock_tot_col),
    ])
    .map_err(|e| DiffSelError::Data(e.to_string()))
}
