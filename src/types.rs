use polars::prelude::*;

/// Per-site count table for one sample
/// Stored as a DataFrame with columns `site`, `wildtype`, and one column per character
pub type CountTable = DataFrame;

/// Mutation differential selection
/// Stored as a DataFrame with columns `site`, `wildtype`, `mutation`, `mutdiffsel`
pub type MutDiffSelTable = DataFrame;

/// Site differential selection summaries
/// Stored as a DataFrame with columns `site`, `abs_diffsel`, `positive_diffsel`,
/// `negative_diffsel`, `max_diffsel`, `min_diffsel`
pub type SiteDiffSelTable = DataFrame;
