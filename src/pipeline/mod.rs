//! The clean/aggregate/merge pipeline.
//!
//! Stage 2 of the run: harmonize the dropout dataset's schema onto the
//! canonical vocabulary, drop irrelevant columns, aggregate both datasets
//! to the seven-field grouping key, and inner-join the results.

mod aggregate;
mod harmonize;
mod merge;

pub use aggregate::aggregate_by_branch;
pub use harmonize::{drop_unused_columns, rename_dropout_columns};
pub use merge::merge_datasets;

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::schema::{DROPOUT_RATE, PERFORMANCE_RATE};

/// Full stage-2 orchestration: rename, drop, aggregate both datasets, merge.
///
/// Neither input is mutated. The merged dataset carries both value columns
/// for every grouping key present in *both* aggregated tables.
pub fn build_merged_dataset(df_perf: &DataFrame, df_drop: &DataFrame) -> Result<DataFrame> {
    let renamed = rename_dropout_columns(df_drop)?;
    let (perf, dropout) = drop_unused_columns(df_perf, &renamed);

    let perf_agg = aggregate_by_branch(&perf, PERFORMANCE_RATE)?;
    let drop_agg = aggregate_by_branch(&dropout, DROPOUT_RATE)?;

    let merged = merge_datasets(&perf_agg, &drop_agg)?;
    info!(
        "merged dataset: {} rows, {} columns",
        merged.height(),
        merged.width()
    );

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_merged_dataset_end_to_end() {
        let perf = df!(
            "academic_year" => &["19-20", "19-20"],
            "university_type" => &["public", "public"],
            "university_code" => &["UB", "UB"],
            "study_type" => &["degree", "degree"],
            "branch" => &["Sciences", "Sciences"],
            "sex" => &["female", "female"],
            "integrated" => &["yes", "yes"],
            "performance_rate" => &[0.8f64, 1.0],
            "university" => &["University of Barcelona", "University of Barcelona"],
            "credits_passed" => &[110.0f64, 120.0],
            "credits_enrolled" => &[140.0f64, 150.0],
        )
        .unwrap();

        let dropout = df!(
            "academic_year" => &["19-20"],
            "responsible_university_type" => &["public"],
            "university_code" => &["UB"],
            "study_type" => &["degree"],
            "branch" => &["Sciences"],
            "student_sex" => &["female"],
            "center_type" => &["yes"],
            "first_year_dropout_rate" => &[0.1f64],
            "responsible_university" => &["University of Barcelona"],
            "unit" => &["Faculty of Science"],
        )
        .unwrap();

        let merged = build_merged_dataset(&perf, &dropout).unwrap();

        assert_eq!(merged.height(), 1);
        let perf_rate = merged
            .column("performance_rate")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        let drop_rate = merged
            .column("first_year_dropout_rate")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert!((perf_rate - 0.9).abs() < 1e-9);
        assert!((drop_rate - 0.1).abs() < 1e-9);
    }
}
