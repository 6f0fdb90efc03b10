//! Trend & ranking analysis of the merged dataset.
//!
//! Builds the [`AnalysisReport`] from the merged dataset: metadata, global
//! statistics (means plus Pearson correlation between the two metrics),
//! per-branch descriptive statistics with a dropout trend classification,
//! and cross-branch rankings. The report serializes to plain JSON: every
//! number is a plain decimal and every absent value is a `null`, never a
//! NaN literal.

pub(crate) mod stats;
pub(crate) mod trend;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::schema::{GroupColumn, DROPOUT_RATE, PERFORMANCE_RATE};
use self::stats::{linear_fit_positions, mean, pearson, sample_std};
use self::trend::{per_year_means, trend_label};

/// The full analysis report. Built once per run, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub global_statistics: GlobalStatistics,
    /// Branch name -> per-branch analysis, keys in ascending order.
    pub per_branch_analysis: BTreeMap<String, BranchAnalysis>,
    pub rankings: Rankings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Analysis date as `YYYY-MM-DD`. The only non-deterministic field.
    pub analysis_date: String,
    pub record_count: usize,
    /// Sorted distinct academic-year labels present in the merged dataset.
    pub time_period: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatistics {
    pub performance_rate_mean: Option<f64>,
    pub dropout_rate_mean: Option<f64>,
    pub dropout_performance_correlation: CorrelationSummary,
}

/// Pearson correlation summary; both fields absent with fewer than 2 valid
/// pairs (an "insufficient data" signal, not a failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    pub pearson_corr: Option<f64>,
    pub p_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchAnalysis {
    pub statistics: BranchStatistics,
    pub trend: DropoutTrend,
}

/// Descriptive statistics restricted to one branch's rows.
///
/// Standard deviations are sample (n-1) and absent when a branch has fewer
/// than 2 valid values for the metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchStatistics {
    pub dropout_mean: Option<f64>,
    pub dropout_std: Option<f64>,
    pub performance_mean: Option<f64>,
    pub performance_std: Option<f64>,
}

/// Dropout trend of a branch over its academic years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropoutTrend {
    pub slope: Option<f64>,
    /// "increasing", "decreasing" or "stable"; defaults to "stable" when
    /// fewer than 2 distinct years exist.
    pub classification: String,
    pub r_value: Option<f64>,
    pub p_value: Option<f64>,
    pub std_err: Option<f64>,
    /// The ordered academic years the fit was computed over.
    pub periods: Vec<String>,
}

/// Cross-branch rankings over branch-level metric means.
///
/// Each entry is absent when no branch has a valid value for the metric
/// (e.g. an empty merged dataset). Ties resolve to the lexically smallest
/// branch name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub best_performance: Option<PerformanceRanking>,
    pub worst_performance: Option<PerformanceRanking>,
    pub highest_dropout: Option<DropoutRanking>,
    pub lowest_dropout: Option<DropoutRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRanking {
    pub branch: String,
    pub performance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropoutRanking {
    pub branch: String,
    pub dropout_rate: f64,
}

/// Extract a column as `Vec<Option<f64>>`, casting to Float64.
pub(crate) fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Extract a column as `Vec<Option<String>>`, casting to String.
pub(crate) fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn distinct_sorted(values: &[Option<String>]) -> Vec<String> {
    let set: BTreeSet<&str> = values.iter().flatten().map(|s| s.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Branch with the extreme mean, scanning in ascending branch-name order.
/// Only a strictly better value replaces the current pick, so ties resolve
/// to the lexically smallest branch.
fn extreme_branch(groups: &BTreeMap<String, Vec<f64>>, highest: bool) -> Option<(String, f64)> {
    let mut best: Option<(String, f64)> = None;
    for (branch, values) in groups {
        let Some(group_mean) = mean(values) else {
            continue;
        };
        let better = match &best {
            None => true,
            Some((_, current)) => {
                if highest {
                    group_mean > *current
                } else {
                    group_mean < *current
                }
            }
        };
        if better {
            best = Some((branch.clone(), group_mean));
        }
    }
    best
}

/// Build the analysis report from the merged dataset.
pub fn build_report(merged: &DataFrame) -> Result<AnalysisReport> {
    let years = string_column(merged, GroupColumn::AcademicYear.as_str())?;
    let branches = string_column(merged, GroupColumn::Branch.as_str())?;
    let performance = numeric_column(merged, PERFORMANCE_RATE)?;
    let dropout = numeric_column(merged, DROPOUT_RATE)?;

    let metadata = ReportMetadata {
        analysis_date: Local::now().format("%Y-%m-%d").to_string(),
        record_count: merged.height(),
        time_period: distinct_sorted(&years),
    };

    // Global statistics: means skip nulls; the correlation excludes rows
    // pairwise, not dataset-wide.
    let perf_valid: Vec<f64> = performance.iter().flatten().copied().collect();
    let drop_valid: Vec<f64> = dropout.iter().flatten().copied().collect();
    let (pair_drop, pair_perf): (Vec<f64>, Vec<f64>) = dropout
        .iter()
        .zip(performance.iter())
        .filter_map(|(d, p)| match (d, p) {
            (Some(d), Some(p)) => Some((*d, *p)),
            _ => None,
        })
        .unzip();
    let correlation = pearson(&pair_drop, &pair_perf);

    let global_statistics = GlobalStatistics {
        performance_rate_mean: mean(&perf_valid),
        dropout_rate_mean: mean(&drop_valid),
        dropout_performance_correlation: CorrelationSummary {
            pearson_corr: correlation.map(|c| c.r),
            p_value: correlation.map(|c| c.p_value),
        },
    };

    // Per-branch statistics and dropout trend.
    let mut per_branch_analysis = BTreeMap::new();
    for branch in distinct_sorted(&branches) {
        let rows: Vec<usize> = branches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.as_deref() == Some(branch.as_str()))
            .map(|(i, _)| i)
            .collect();

        let branch_perf: Vec<f64> = rows.iter().filter_map(|&i| performance[i]).collect();
        let branch_drop: Vec<f64> = rows.iter().filter_map(|&i| dropout[i]).collect();

        let statistics = BranchStatistics {
            dropout_mean: mean(&branch_drop),
            dropout_std: sample_std(&branch_drop),
            performance_mean: mean(&branch_perf),
            performance_std: sample_std(&branch_perf),
        };

        let branch_years: Vec<Option<String>> = rows.iter().map(|&i| years[i].clone()).collect();
        let branch_drop_opt: Vec<Option<f64>> = rows.iter().map(|&i| dropout[i]).collect();
        let yearly = per_year_means(&branch_years, &branch_drop_opt);
        let periods: Vec<String> = yearly.iter().map(|(year, _)| year.clone()).collect();
        let yearly_means: Vec<f64> = yearly.iter().map(|(_, value)| *value).collect();

        let trend = match linear_fit_positions(&yearly_means) {
            Some(fit) => DropoutTrend {
                slope: Some(fit.slope),
                classification: trend_label(fit.slope).to_string(),
                r_value: Some(fit.r_value),
                p_value: Some(fit.p_value),
                std_err: Some(fit.std_err),
                periods,
            },
            // fewer than 2 distinct years: explicit fallback to "stable"
            None => DropoutTrend {
                slope: None,
                classification: "stable".to_string(),
                r_value: None,
                p_value: None,
                std_err: None,
                periods,
            },
        };

        per_branch_analysis.insert(branch, BranchAnalysis { statistics, trend });
    }

    // Rankings over branch-level means of the full merged dataset.
    let mut perf_groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut drop_groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (i, branch) in branches.iter().enumerate() {
        let Some(branch) = branch else { continue };
        if let Some(value) = performance[i] {
            perf_groups.entry(branch.clone()).or_default().push(value);
        }
        if let Some(value) = dropout[i] {
            drop_groups.entry(branch.clone()).or_default().push(value);
        }
    }

    let rankings = Rankings {
        best_performance: extreme_branch(&perf_groups, true).map(|(branch, value)| {
            PerformanceRanking {
                branch,
                performance_rate: value,
            }
        }),
        worst_performance: extreme_branch(&perf_groups, false).map(|(branch, value)| {
            PerformanceRanking {
                branch,
                performance_rate: value,
            }
        }),
        highest_dropout: extreme_branch(&drop_groups, true).map(|(branch, value)| {
            DropoutRanking {
                branch,
                dropout_rate: value,
            }
        }),
        lowest_dropout: extreme_branch(&drop_groups, false).map(|(branch, value)| {
            DropoutRanking {
                branch,
                dropout_rate: value,
            }
        }),
    };

    Ok(AnalysisReport {
        metadata,
        global_statistics,
        per_branch_analysis,
        rankings,
    })
}

/// Build the report and write it as pretty-printed UTF-8 JSON.
///
/// Parent directories are created as needed. The file is written to a
/// temporary sibling and renamed into place, so a failing run never leaves
/// a partially written report behind.
pub fn analyze_dataset(merged: &DataFrame, output_path: impl AsRef<Path>) -> Result<AnalysisReport> {
    let report = build_report(merged)?;
    write_report(&report, output_path.as_ref())?;
    Ok(report)
}

fn write_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(report)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes())?;
    fs::rename(&tmp, path)?;

    info!("Report saved: {}", path.display());
    Ok(())
}
