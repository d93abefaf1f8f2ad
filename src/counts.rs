use crate::error::{DiffSelError, Result};
use crate::types::CountTable;
use polars::prelude::*;
use std::fs::File;

/// Reads a per-site count table from a CSV file into a Polars DataFrame.
///
/// # Arguments
/// * `filename` - Path to the CSV file, with a header row naming `site`,
///   `wildtype`, and one column per count character
///
/// # Returns
/// * `Result<CountTable>` - The count table, one row per site
///
/// # Errors
/// * Returns `DiffSelError::Data` if the file cannot be parsed
/// * Returns `DiffSelError::InvalidInput` if the table has no rows
pub fn read_counts(filename: &str) -> Result<CountTable> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(filename.into()))
        .map_err(|e| DiffSelError::Data(e.to_string()))?
        .finish()
        .map_err(|e| DiffSelError::Data(e.to_string()))?;

    if df.height() == 0 {
        return Err(DiffSelError::InvalidInput(format!(
            "no count rows found in {}",
            filename
        )));
    }

    Ok(df)
}

/// Writes a table to a CSV file with a header row.
///
/// # Arguments
/// * `df` - Table to write, e.g. a count table or a diffsel table
/// * `filename` - Path where the CSV file should be written
///
/// # Returns
/// * `Result<()>` - Unit type if successful
///
/// # Errors
/// * Returns `DiffSelError::Io` for file writing issues
/// * Returns `DiffSelError::Data` if serialization fails
pub fn write_counts(df: &DataFrame, filename: &str) -> Result<()> {
    let mut file = File::create(filename).map_err(DiffSelError::Io)?;
    let mut df = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| DiffSelError::Data(e.to_string()))?;
    Ok(())
}
