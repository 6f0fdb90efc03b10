//! Trend chart rendering for the merged dataset.
//!
//! Stage 3 of the run: two stacked line charts, one line per branch, of
//! the per-year mean dropout rate and performance rate. Consumes the
//! merged dataset and produces a PNG artifact.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use tracing::info;

use crate::analysis::trend::per_year_means;
use crate::analysis::{numeric_column, string_column};
use crate::error::{AnalysisError, Result};
use crate::schema::{GroupColumn, DROPOUT_RATE, PERFORMANCE_RATE};

/// Render the per-branch time trends of both metrics to a PNG file.
///
/// Parent directories are created as needed. Years are ordered by the
/// starting year parsed from labels like "19-20"; unparsable labels keep
/// their relative order at the end.
pub fn plot_time_trends(merged: &DataFrame, output_path: impl AsRef<Path>) -> Result<()> {
    let path = output_path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let year_col = string_column(merged, GroupColumn::AcademicYear.as_str())?;
    let branch_col = string_column(merged, GroupColumn::Branch.as_str())?;
    let dropout = numeric_column(merged, DROPOUT_RATE)?;
    let performance = numeric_column(merged, PERFORMANCE_RATE)?;

    let mut years: Vec<String> = {
        let mut distinct: Vec<String> = year_col.iter().flatten().cloned().collect();
        distinct.sort();
        distinct.dedup();
        distinct
    };
    years = sort_academic_years(years);

    let mut branches: Vec<String> = branch_col.iter().flatten().cloned().collect();
    branches.sort();
    branches.dedup();

    let dropout_series = branch_year_series(&branches, &branch_col, &year_col, &dropout, &years);
    let performance_series =
        branch_year_series(&branches, &branch_col, &year_col, &performance, &years);

    let root = BitMapBackend::new(path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (upper, lower) = root.split_vertically(500);

    draw_metric_chart(
        &upper,
        "First-year dropout rate by academic year",
        DROPOUT_RATE,
        &years,
        &dropout_series,
    )?;
    draw_metric_chart(
        &lower,
        "Performance rate by academic year",
        PERFORMANCE_RATE,
        &years,
        &performance_series,
    )?;

    root.present().map_err(plot_err)?;
    info!("Figure saved: {}", path.display());

    Ok(())
}

/// Per-branch polylines of (year index, per-year mean value).
///
/// Years with no valid observations for a branch are skipped, so lines
/// bridge over gaps instead of breaking.
fn branch_year_series(
    branches: &[String],
    branch_col: &[Option<String>],
    year_col: &[Option<String>],
    values: &[Option<f64>],
    years: &[String],
) -> Vec<(String, Vec<(f64, f64)>)> {
    let year_index: HashMap<&str, usize> = years
        .iter()
        .enumerate()
        .map(|(i, year)| (year.as_str(), i))
        .collect();

    branches
        .iter()
        .map(|branch| {
            let rows: Vec<usize> = branch_col
                .iter()
                .enumerate()
                .filter(|(_, b)| b.as_deref() == Some(branch.as_str()))
                .map(|(i, _)| i)
                .collect();
            let branch_years: Vec<Option<String>> =
                rows.iter().map(|&i| year_col[i].clone()).collect();
            let branch_values: Vec<Option<f64>> = rows.iter().map(|&i| values[i]).collect();

            let mut points: Vec<(f64, f64)> = per_year_means(&branch_years, &branch_values)
                .into_iter()
                .filter_map(|(year, value)| {
                    year_index.get(year.as_str()).map(|&i| (i as f64, value))
                })
                .collect();
            points.sort_by(|a, b| a.0.total_cmp(&b.0));

            (branch.clone(), points)
        })
        .collect()
}

fn draw_metric_chart(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    y_desc: &str,
    years: &[String],
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<()> {
    let x_max = years.len().saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = value_bounds(series);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(plot_err)?;

    let labels: Vec<String> = years.to_vec();
    chart
        .configure_mesh()
        .x_labels(years.len().max(2).min(15))
        .x_label_formatter(&move |x| {
            let i = x.round() as usize;
            labels.get(i).cloned().unwrap_or_default()
        })
        .y_desc(y_desc.to_string())
        .draw()
        .map_err(plot_err)?;

    for (i, (branch, points)) in series.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = Palette99::pick(i).mix(0.9);
        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(plot_err)?
            .label(branch.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
    }

    if series.iter().any(|(_, points)| !points.is_empty()) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    Ok(())
}

fn value_bounds(series: &[(String, Vec<(f64, f64)>)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, points) in series {
        for (_, value) in points {
            min = min.min(*value);
            max = max.max(*value);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(0.01);
    (min - pad, max + pad)
}

/// Order academic-year labels like "18-19", "19-20" by their starting year.
fn sort_academic_years(mut years: Vec<String>) -> Vec<String> {
    years.sort_by_key(|year| {
        year.split('-')
            .next()
            .and_then(|prefix| prefix.parse::<i32>().ok())
            .unwrap_or(i32::MAX)
    });
    years
}

fn plot_err(error: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Plot(error.to_string())
}
