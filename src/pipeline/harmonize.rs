//! Schema harmonization between the two source datasets.
//!
//! The dropout dataset names four of the grouping-key fields differently
//! from the performance dataset. Renaming them first means every later
//! stage can speak the canonical vocabulary from [`crate::schema`].

use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::schema::{DROPOUT_RENAMES, PERFORMANCE_ONLY_DROP_COLS, SHARED_DROP_COLS};

/// Rename the dropout dataset's key columns to the canonical vocabulary.
///
/// Renames are no-ops for columns that are not present. The input frame is
/// never mutated; a renamed copy is returned.
pub fn rename_dropout_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut renamed = df.clone();

    for (from, to) in DROPOUT_RENAMES {
        let present = renamed
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == from);
        if present {
            renamed.rename(from, PlSmallStr::from_static(to))?;
            debug!("renamed column '{}' -> '{}'", from, to);
        }
    }

    Ok(renamed)
}

/// Drop columns that play no role in the aggregation or the analysis.
///
/// The university name and organizational unit go from both tables; the two
/// credit-count columns go from the performance table only. Absent columns
/// are silently skipped.
pub fn drop_unused_columns(df_perf: &DataFrame, df_drop: &DataFrame) -> (DataFrame, DataFrame) {
    let shared: Vec<PlSmallStr> = SHARED_DROP_COLS
        .iter()
        .map(|name| PlSmallStr::from_static(name))
        .collect();

    let perf = df_perf
        .drop_many(shared.clone())
        .drop_many(
            PERFORMANCE_ONLY_DROP_COLS
                .iter()
                .map(|name| PlSmallStr::from_static(name)),
        );
    let dropout = df_drop.drop_many(shared);

    (perf, dropout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dropout_frame() -> DataFrame {
        df!(
            "academic_year" => &["19-20"],
            "responsible_university_type" => &["public"],
            "responsible_university" => &["University of Barcelona"],
            "student_sex" => &["female"],
            "center_type" => &["yes"],
            "first_year_dropout_rate" => &[0.1f64],
        )
        .unwrap()
    }

    #[test]
    fn test_rename_dropout_columns() {
        let df = dropout_frame();
        let renamed = rename_dropout_columns(&df).unwrap();

        let names: Vec<String> = renamed
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        assert!(names.contains(&"university_type".to_string()));
        assert!(names.contains(&"university".to_string()));
        assert!(names.contains(&"sex".to_string()));
        assert!(names.contains(&"integrated".to_string()));
        assert!(!names.contains(&"student_sex".to_string()));
    }

    #[test]
    fn test_rename_does_not_mutate_input() {
        let df = dropout_frame();
        let _ = rename_dropout_columns(&df).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        assert!(names.contains(&"student_sex".to_string()));
    }

    #[test]
    fn test_rename_skips_absent_columns() {
        let df = df!(
            "academic_year" => &["19-20"],
            "first_year_dropout_rate" => &[0.1f64],
        )
        .unwrap();

        let renamed = rename_dropout_columns(&df).unwrap();
        assert_eq!(renamed.width(), 2);
    }

    #[test]
    fn test_drop_unused_columns() {
        let perf = df!(
            "academic_year" => &["19-20"],
            "university" => &["University of Barcelona"],
            "unit" => &["Faculty of Science"],
            "credits_passed" => &[120.0f64],
            "credits_enrolled" => &[150.0f64],
            "performance_rate" => &[0.8f64],
        )
        .unwrap();
        let dropout = df!(
            "academic_year" => &["19-20"],
            "university" => &["University of Barcelona"],
            "credits_passed" => &[120.0f64],
            "first_year_dropout_rate" => &[0.1f64],
        )
        .unwrap();

        let (perf_out, dropout_out) = drop_unused_columns(&perf, &dropout);

        let perf_names: Vec<String> = perf_out
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(perf_names, vec!["academic_year", "performance_rate"]);

        // Credit columns are only dropped from the performance table.
        let dropout_names: Vec<String> = dropout_out
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            dropout_names,
            vec!["academic_year", "credits_passed", "first_year_dropout_rate"]
        );
    }

    #[test]
    fn test_drop_skips_absent_columns() {
        let perf = df!("performance_rate" => &[0.8f64]).unwrap();
        let dropout = df!("first_year_dropout_rate" => &[0.1f64]).unwrap();

        let (perf_out, dropout_out) = drop_unused_columns(&perf, &dropout);
        assert_eq!(perf_out.width(), 1);
        assert_eq!(dropout_out.width(), 1);
    }
}
