//! Dataset loading and basic exploratory display.
//!
//! The core pipeline treats loading as a collaborator that produces a
//! tabular dataset given a source identifier; this module is the CSV
//! implementation of that collaborator.

use std::path::Path;

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::info;

use crate::error::{AnalysisError, Result};

/// Load a headered CSV dataset into a `DataFrame`.
///
/// Fails with a not-found IO error when the path does not exist; parse
/// failures propagate unmodified.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnalysisError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("dataset file not found: {}", path.display()),
        )));
    }

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(1000))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    info!(
        "loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(df)
}

/// Print a basic exploration of the dataset: head, columns and dtypes.
///
/// Uses `println!` intentionally; this is the user-facing output of the
/// first pipeline stage, visible regardless of the log level.
pub fn show_basic_eda(df: &DataFrame) {
    println!("\n--- HEAD (first 5 rows) ---");
    println!("{}", df.head(Some(5)));

    println!("\n--- COLUMNS ---");
    let names: Vec<&str> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.as_str())
        .collect();
    println!("{:?}", names);

    println!("\n--- INFO ---");
    println!("shape: {} rows x {} columns", df.height(), df.width());
    for (name, dtype) in df.schema().iter() {
        let nulls = df
            .column(name)
            .map(|column| column.null_count())
            .unwrap_or(0);
        println!("  {:<30} {:<12} {} nulls", name, format!("{}", dtype), nulls);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_dataset("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_dataset_reads_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.csv");
        std::fs::write(&path, "academic_year,performance_rate\n19-20,0.9\n20-21,0.8\n")
            .unwrap();

        let df = load_dataset(&path).unwrap();
        assert_eq!(df.shape(), (2, 2));

        let rate = df
            .column("performance_rate")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert!((rate - 0.9).abs() < 1e-9);
    }
}
