//! Report generation for parsed benchmark runs.
//!
//! This crate persists what [`benchplot_core`] produces: the parsed run as
//! JSON, a markdown summary and one SVG bar chart per category and metric.
//!
//! # Quick Start
//!
//! ```no_run
//! use benchplot_core::{split, Aggregator, FamilyRegistry};
//! use benchplot_report::{io::OutputLayout, write_all_outputs, BenchRun};
//!
//! let registry = FamilyRegistry::parquet_encoding();
//! let text = std::fs::read_to_string("bench_results/latest.txt").unwrap();
//! let records = Aggregator::new(registry.clone()).aggregate(&text).unwrap();
//!
//! let run = BenchRun::new(&records);
//! let groups = split(&records, &registry);
//! let artifacts = write_all_outputs(&OutputLayout::default(), &run, &groups).unwrap();
//! println!("{}", artifacts.results_json.display());
//! ```
//!
//! # Modules
//!
//! - [`result`] - The persisted `BenchRun` document
//! - [`io`] - Reading and writing artifacts
//! - [`markdown`] - Markdown summary generation
//! - [`svg`] - SVG chart rendering

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod format;
pub mod io;
pub mod markdown;
pub mod result;
pub mod svg;

pub use error::{ReportError, Result};
pub use result::{file_stamp, BenchRun, BenchmarkEntry};

use benchplot_core::{sort_ascending, CategoryGroup, ChartData, ValueSelector};
use std::path::PathBuf;

/// A chart to be rendered for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChart {
    /// Category label.
    pub category: String,
    /// Chart title.
    pub title: String,
    /// Dataset, sorted ascending by value.
    pub data: ChartData,
}

/// Choose the charts for each category.
///
/// Every category gets a median-time chart; categories where at least one
/// record has a size also get a size chart, and their time chart carries the
/// size as secondary value.
pub fn charts_for(groups: &[CategoryGroup]) -> Vec<CategoryChart> {
    let mut charts = Vec::new();

    for group in groups {
        let has_size = group.records.iter().any(|r| r.size.is_some());

        let mut by_time = group.records.clone();
        sort_ascending(&mut by_time, ValueSelector::MedianTime);
        let mut time = ChartData::build(&by_time, ValueSelector::MedianTime);
        if has_size {
            time = time.with_secondary(&by_time, ValueSelector::Size);
        }
        charts.push(CategoryChart {
            category: group.label.clone(),
            title: format!("{} median time", group.label),
            data: time,
        });

        if has_size {
            let mut by_size = group.records.clone();
            sort_ascending(&mut by_size, ValueSelector::Size);
            charts.push(CategoryChart {
                category: group.label.clone(),
                title: format!("{} file size", group.label),
                data: ChartData::build(&by_size, ValueSelector::Size),
            });
        }
    }

    charts
}

/// Paths of everything written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Parsed results JSON.
    pub results_json: PathBuf,
    /// Markdown summary.
    pub summary: PathBuf,
    /// Rendered charts.
    pub charts: Vec<PathBuf>,
}

/// Write the parsed results, summary and charts of `run`.
///
/// # Errors
///
/// Returns a [`ReportError`] if writing or rendering fails.
pub fn write_all_outputs(
    layout: &io::OutputLayout,
    run: &BenchRun,
    groups: &[CategoryGroup],
) -> Result<Artifacts> {
    layout.ensure_output_dir()?;

    let results_json = layout.write_results_json(run)?;
    let summary = layout.write_summary(run, groups)?;

    let stamp = run.file_stamp();
    let mut charts = Vec::new();
    for chart in charts_for(groups) {
        let metric = chart.data.selector.metric();
        let path = layout.chart_path(&stamp, &chart.category, metric);
        svg::render_bar_chart(&chart.data, &chart.title, &path)?;
        std::fs::copy(&path, layout.latest_chart_path(&chart.category, metric))?;
        tracing::info!(path = %path.display(), log_scale = chart.data.log_scale, "Wrote chart");
        charts.push(path);
    }

    Ok(Artifacts {
        results_json,
        summary,
        charts,
    })
}
