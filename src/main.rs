//! NEO Insights - Near-Earth Asteroid CSV Analysis & Static Charts
//!
//! Loads the NASA close-approach CSV, keeps approaches from 2000 onward,
//! prints four descriptive insights and renders four PNG charts.

mod charts;
mod data;
mod stats;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

use charts::{ChartError, StaticChartRenderer};
use data::{DataLoader, DataProcessor, DatasetSummary, ErrorKind, LoaderError};
use stats::{InsightCalculator, Insights, StatsError};

#[derive(Parser, Debug)]
#[command(name = "neo_insights")]
#[command(about = "Analyze near-Earth asteroid close approaches from a NASA CSV export", long_about = None)]
struct Cli {
    /// CSV file to analyze
    #[arg(value_name = "INPUT", default_value = "nasa.csv")]
    input: PathBuf,

    /// Directory the chart images are written to
    #[arg(short, long, default_value = "charts")]
    output_dir: PathBuf,

    /// Print the dataset summary and insights as JSON
    #[arg(long)]
    json: bool,

    /// Open each rendered chart with the system image viewer
    #[arg(long)]
    show: bool,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: &'a DatasetSummary,
    insights: &'a Insights,
    charts: &'a [PathBuf],
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    log::info!("loading {}", cli.input.display());
    let raw = DataLoader::load_csv(&cli.input)
        .with_context(|| format!("cannot load '{}'", cli.input.display()))?;
    log::info!("loaded {} rows", raw.len());
    if !cli.json {
        println!("{}", raw.frame);
    }

    let clean = DataProcessor::clean(raw).context("cleaning failed")?;
    let summary = clean.summary();
    log::info!("analyzing {} close approaches", clean.len());
    if !cli.json {
        println!("{}", clean.frame);
        println!("\n{summary}");
    }

    let insights = InsightCalculator::compute_all(&clean.records).context("analysis failed")?;
    if !cli.json {
        println!("{insights}");
    }

    let charts = if cli.no_charts {
        Vec::new()
    } else {
        StaticChartRenderer::render_all(&clean.records, &cli.output_dir)
            .context("chart rendering failed")?
    };

    if cli.json {
        let report = Report {
            summary: &summary,
            insights: &insights,
            charts: &charts,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for path in &charts {
            println!("Chart written: {}", path.display());
        }
    }

    if cli.show {
        charts.iter().for_each(|path| show_chart(path));
    }

    Ok(())
}

fn show_chart(path: &Path) {
    if let Err(e) = open::that(path) {
        log::warn!("could not open {}: {e}", path.display());
    }
}

/// 2: input path, 3: input format, 4: empty dataset, 1: anything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(loader) = err.downcast_ref::<LoaderError>() {
        return match loader.kind() {
            ErrorKind::Path => 2,
            ErrorKind::Format => 3,
        };
    }
    let empty = matches!(err.downcast_ref::<StatsError>(), Some(StatsError::EmptyDataset(_)))
        || matches!(err.downcast_ref::<ChartError>(), Some(ChartError::EmptyDataset(_)));
    if empty {
        4
    } else {
        1
    }
}
