//! CLI entry point for the staged analysis pipeline.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use uni_analytics::{analysis, loader, pipeline, plot};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "University performance and first-year dropout analysis pipeline",
    long_about = "Staged analysis of university student performance and first-year dropout\n\
                  rates.\n\n\
                  STAGES:\n  \
                  1  load the performance dataset and print a basic EDA\n  \
                  2  clean, aggregate and merge both datasets\n  \
                  3  render per-branch trend charts\n  \
                  4  compute statistics and write the JSON report\n\n\
                  EXAMPLES:\n  \
                  # Run everything\n  \
                  uni-analytics\n\n  \
                  # Only load and explore\n  \
                  uni-analytics -e 1\n\n  \
                  # Custom inputs\n  \
                  uni-analytics --performance perf.csv --dropout dropout.csv"
)]
struct Args {
    /// Run stages 1..N in order
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u8).range(1..=4))]
    exercise: u8,

    /// Path to the student performance CSV
    #[arg(long, default_value = "data/student_performance.csv")]
    performance: String,

    /// Path to the first-year dropout CSV
    #[arg(long, default_value = "data/first_year_dropout.csv")]
    dropout: String,

    /// Output path for the trend chart (stage 3)
    #[arg(long, default_value = "outputs/trends_by_branch.png")]
    plot_output: String,

    /// Output path for the JSON report (stage 4)
    #[arg(long, default_value = "outputs/analysis_report.json")]
    report_output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    info!("Running stages 1..{}", args.exercise);

    // Stage 1: load + EDA
    info!("[stage 1] loading dataset: {}", args.performance);
    let df_perf = loader::load_dataset(&args.performance)?;
    loader::show_basic_eda(&df_perf);

    if args.exercise < 2 {
        return Ok(());
    }

    // Stage 2: clean + aggregate + merge
    info!("[stage 2] clean, aggregate and merge");
    let df_drop = loader::load_dataset(&args.dropout)?;
    let merged = pipeline::build_merged_dataset(&df_perf, &df_drop)?;
    info!("merged shape: {:?}", merged.shape());

    // Stage 3: trend charts
    if args.exercise >= 3 {
        info!("[stage 3] rendering trend charts");
        plot::plot_time_trends(&merged, &args.plot_output)?;
        info!("figure saved to {}", args.plot_output);
    }

    // Stage 4: statistical report
    if args.exercise >= 4 {
        info!("[stage 4] statistical analysis");
        let report = analysis::analyze_dataset(&merged, &args.report_output)?;
        info!(
            "report saved to {} ({} records, {} branches)",
            args.report_output,
            report.metadata.record_count,
            report.per_branch_analysis.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_defaults_to_all_stages() {
        let args = Args::try_parse_from(["uni-analytics"]).unwrap();
        assert_eq!(args.exercise, 4);
    }

    #[test]
    fn test_exercise_accepts_range_bounds() {
        let args = Args::try_parse_from(["uni-analytics", "-e", "1"]).unwrap();
        assert_eq!(args.exercise, 1);
        let args = Args::try_parse_from(["uni-analytics", "-e", "4"]).unwrap();
        assert_eq!(args.exercise, 4);
    }

    #[test]
    fn test_exercise_rejects_out_of_range() {
        assert!(Args::try_parse_from(["uni-analytics", "-e", "0"]).is_err());
        assert!(Args::try_parse_from(["uni-analytics", "-e", "5"]).is_err());
    }
}
