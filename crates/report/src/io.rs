//! I/O operations for benchmark runs.
//!
//! This module reads and writes raw captures, parsed results, summaries and
//! charts below a single output directory. Every timestamped artifact is
//! also mirrored to a `latest*` file.

use crate::error::{ReportError, Result};
use crate::markdown;
use crate::result::BenchRun;
use benchplot_core::CategoryGroup;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default output directory path.
pub const OUTPUT_DIR: &str = "bench_results";

/// Raw capture of the most recent run.
pub const LATEST_RAW: &str = "latest.txt";

/// Parsed results of the most recent run.
pub const LATEST_JSON: &str = "latest.json";

/// Summary file name.
pub const SUMMARY_FILE: &str = "summary.md";

/// File layout below an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(OUTPUT_DIR)
    }
}

impl OutputLayout {
    /// Create a layout rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensure the output directory exists.
    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Path of the most recent raw capture.
    pub fn latest_raw_path(&self) -> PathBuf {
        self.dir.join(LATEST_RAW)
    }

    /// Path of the summary file.
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    /// Path of a chart for `category` and `metric` in the run stamped `stamp`.
    pub fn chart_path(&self, stamp: &str, category: &str, metric: &str) -> PathBuf {
        self.dir
            .join(format!("bench_{}_{}_{}.svg", stamp, sanitize(category), metric))
    }

    /// Path of the `latest` copy of a chart.
    pub fn latest_chart_path(&self, category: &str, metric: &str) -> PathBuf {
        self.dir
            .join(format!("latest_{}_{}.svg", sanitize(category), metric))
    }

    /// Write the raw capture as `bench_<stamp>.txt` and `latest.txt`.
    pub fn write_raw(&self, raw: &str, stamp: &str) -> Result<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.dir.join(format!("bench_{}.txt", stamp));
        fs::write(&path, raw)?;
        fs::write(self.latest_raw_path(), raw)?;
        info!(path = %path.display(), "Wrote raw output");
        Ok(path)
    }

    /// Read the most recent raw capture.
    pub fn read_latest_raw(&self) -> Result<String> {
        read_raw(self.latest_raw_path())
    }

    /// Write parsed results as `bench_<stamp>.json` and `latest.json`.
    pub fn write_results_json(&self, run: &BenchRun) -> Result<PathBuf> {
        self.ensure_output_dir()?;
        let json = serde_json::to_string_pretty(run)?;
        let path = self.dir.join(format!("bench_{}.json", run.file_stamp()));
        fs::write(&path, &json)?;
        fs::write(self.dir.join(LATEST_JSON), &json)?;
        info!(path = %path.display(), benchmarks = run.benchmarks.len(), "Wrote parsed results");
        Ok(path)
    }

    /// Write the markdown summary.
    pub fn write_summary(&self, run: &BenchRun, groups: &[CategoryGroup]) -> Result<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.summary_path();
        fs::write(&path, markdown::generate_summary(run, groups))?;
        Ok(path)
    }
}

/// Read a raw capture from `path`.
pub fn read_raw(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReportError::MissingRaw(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Read parsed results from a JSON file.
pub fn read_results_json(path: impl AsRef<Path>) -> Result<BenchRun> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Make a category label safe for use in a file name.
fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
