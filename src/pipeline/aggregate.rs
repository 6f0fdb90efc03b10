//! Grouped aggregation of a dataset to the seven-field grouping key.

use polars::prelude::*;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::schema::GROUP_COLS;

/// Collapse a table to one row per distinct grouping key, replacing the
/// value column by the arithmetic mean over each bucket.
///
/// Grouping uses whichever of the seven canonical key columns are present
/// in the input. Rows with a null in a key field are retained as their own
/// group; dropping them would silently shrink coverage. Output column
/// order is the key fields in canonical order followed by the value column,
/// sorted by key for deterministic output.
///
/// # Errors
///
/// Returns [`AnalysisError::MissingColumn`] if `value_col` is absent.
pub fn aggregate_by_branch(df: &DataFrame, value_col: &str) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    if !names.iter().any(|name| name == value_col) {
        return Err(AnalysisError::MissingColumn(value_col.to_string()));
    }

    let key_cols: Vec<&str> = GROUP_COLS
        .iter()
        .copied()
        .filter(|key| names.iter().any(|name| name == key))
        .collect();
    let key_exprs: Vec<Expr> = key_cols.iter().map(|key| col(*key)).collect();

    let ordered: Vec<Expr> = key_cols
        .iter()
        .map(|key| col(*key))
        .chain(std::iter::once(col(value_col)))
        .collect();

    let aggregated = df
        .clone()
        .lazy()
        .group_by(key_exprs.clone())
        .agg([col(value_col).mean()])
        .select(ordered)
        .sort_by_exprs(key_exprs, SortMultipleOptions::default())
        .collect()?;

    debug!(
        "aggregated '{}': {} rows -> {} buckets",
        value_col,
        df.height(),
        aggregated.height()
    );

    Ok(aggregated)
}
