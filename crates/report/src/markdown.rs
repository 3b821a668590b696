//! Markdown output generation for benchmark runs.
//!
//! This module renders a parsed run as one table per category.

use crate::format::{format_kb, format_micros};
use crate::result::BenchRun;
use benchplot_core::CategoryGroup;
use std::fmt::Write;

/// Generate a markdown summary of `run`, grouped as in `groups`.
pub fn generate_summary(run: &BenchRun, groups: &[CategoryGroup]) -> String {
    let mut output = String::new();

    writeln!(output, "# Benchmark Summary").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", run.timestamp.to_rfc3339()).unwrap();
    writeln!(output).unwrap();

    for group in groups {
        writeln!(output, "## {}", group.label).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Benchmark | Median | Min | Max | Size |").unwrap();
        writeln!(output, "|-----------|--------|-----|-----|------|").unwrap();

        for record in &group.records {
            let size = record
                .size_kb()
                .map(format_kb)
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                record.display_name,
                format_micros(record.timing.median_us),
                format_micros(record.timing.min_us),
                format_micros(record.timing.max_us),
                size
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    writeln!(output, "---").unwrap();
    writeln!(output, "Total benchmarks: {}", run.benchmarks.len()).unwrap();

    output
}
