// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::SegprepError;

/// Write a table to a CSV file
///
/// # Examples
///
/// ```no_run
/// use polars::prelude::*;
/// use segprep_core::io::write_table_csv;
///
/// let column = vec![Column::new("pixel_count".into(), [120u64, 64, 16])];
/// let mut df: DataFrame = DataFrame::new(column).unwrap();
///
/// write_table_csv(&mut df, "statistics.csv", true).unwrap()
/// ```
pub fn write_table_csv<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    header: bool,
) -> Result<(), SegprepError> {
    let mut output: File = File::create(&path).map_err(|_| {
        SegprepError::TableWriteError(format!(
            "Failed to create CSV file: {}",
            path.as_ref().display()
        ))
    })?;

    CsvWriter::new(&mut output)
        .include_header(header)
        .finish(df)
        .map_err(|_| SegprepError::TableWriteError("Failed to write CSV file".to_string()))
}

/// Write a table to a TSV file
pub fn write_table_tsv<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    header: bool,
) -> Result<(), SegprepError> {
    let mut output: File = File::create(&path).map_err(|_| {
        SegprepError::TableWriteError(format!(
            "Failed to create TSV file: {}",
            path.as_ref().display()
        ))
    })?;

    CsvWriter::new(&mut output)
        .include_header(header)
        .with_separator(b'\t')
        .finish(df)
        .map_err(|_| SegprepError::TableWriteError("Failed to write TSV file".to_string()))
}

/// Write a table to disk, dispatching on the file extension
///
/// # Examples
///
/// ```no_run
/// use polars::prelude::*;
/// use segprep_core::io::write_table;
///
/// let column = vec![Column::new("percentage".into(), [92.5, 6.1, 1.4])];
/// let mut df: DataFrame = DataFrame::new(column).unwrap();
///
/// write_table(&mut df, "statistics.csv").unwrap()
/// ```
pub fn write_table<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), SegprepError> {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("csv") => write_table_csv(df, path, true),
        Some("tsv") | Some("txt") => write_table_tsv(df, path, true),
        _ => Err(SegprepError::TableWriteError(
            "Table path must end with one of: csv, tsv, txt".to_string(),
        )),
    }
}
