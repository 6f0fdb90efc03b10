//! University Performance & Dropout Analysis Pipeline
//!
//! A staged, single-analyst pipeline built with Rust and Polars. It ingests
//! two tabular datasets (student performance rates and first-year dropout
//! rates), harmonizes their schemas, aggregates both to a common grouping
//! key, inner-joins them, and derives per-branch statistics, dropout trend
//! classifications and rankings into a JSON report plus a trend chart.
//!
//! # Overview
//!
//! The pipeline runs in four stages:
//!
//! 1. **Load + EDA**: read a CSV dataset and print a basic exploration.
//! 2. **Clean + merge**: rename the dropout dataset's columns onto the
//!    canonical vocabulary, drop irrelevant columns, aggregate each dataset
//!    to the seven-field grouping key by averaging its value column, and
//!    inner-join the two aggregated tables.
//! 3. **Plot**: render per-branch time trends of both metrics to a PNG.
//! 4. **Report**: compute global and per-branch statistics, classify each
//!    branch's dropout trend by the slope of an OLS fit, rank branches, and
//!    write the result as JSON.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use uni_analytics::{analyze_dataset, build_merged_dataset, load_dataset};
//!
//! let perf = load_dataset("data/student_performance.csv")?;
//! let dropout = load_dataset("data/first_year_dropout.csv")?;
//!
//! let merged = build_merged_dataset(&perf, &dropout)?;
//! let report = analyze_dataset(&merged, "outputs/analysis_report.json")?;
//!
//! println!("{} records analyzed", report.metadata.record_count);
//! ```
//!
//! Statistical insufficiency (fewer than 2 valid pairs for the correlation,
//! fewer than 2 distinct years for a trend) is never an error: the affected
//! values are absent from the report and serialize as `null`.

pub mod analysis;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod plot;
pub mod schema;

// Re-exports for convenient access
pub use analysis::{
    analyze_dataset, build_report, AnalysisReport, BranchAnalysis, BranchStatistics,
    CorrelationSummary, DropoutRanking, DropoutTrend, GlobalStatistics, PerformanceRanking,
    Rankings, ReportMetadata,
};
pub use error::{AnalysisError, Result, ResultExt};
pub use loader::{load_dataset, show_basic_eda};
pub use pipeline::{
    aggregate_by_branch, build_merged_dataset, drop_unused_columns, merge_datasets,
    rename_dropout_columns,
};
pub use plot::plot_time_trends;
pub use schema::{GroupColumn, DROPOUT_RATE, GROUP_COLS, PERFORMANCE_RATE};
