//! Human-readable and JSON reports

use crate::bench::TrialOutcome;
use crate::common::constants::CURRENT_MARKER;
use crate::common::error::Result;
use crate::common::helper::percent_of;
use crate::orchestrator::{AdvisorRun, ColumnReport, Resolution};

const HEADERS: [&str; 6] = ["Column", "Compression", "Level", "Size", "Diff", "Current"];

/// Renders per-column comparison tables
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    /// Comparison table for one column plus its verdict
    pub fn render_column(&self, report: &ColumnReport) -> String {
        let column = report.column();
        let mut results = report.benchmark.results();
        results.sort_by_key(|r| r.size_bytes);

        let marker = report.outcome().and_then(|o| o.current_marker.as_ref());
        let reference = marker
            .or_else(|| results.first())
            .map(|r| r.size_bytes)
            .unwrap_or(0);

        let mut rows: Vec<Vec<String>> = results
            .iter()
            .map(|result| {
                vec![
                    column.name.clone(),
                    result.variant.compression_type.to_string(),
                    result.variant.level.to_string(),
                    result.size_human.clone(),
                    percent_of(result.size_bytes, reference)
                        .map(|p| format!("{:.2} %", p))
                        .unwrap_or_default(),
                    if marker == Some(result) {
                        CURRENT_MARKER.to_string()
                    } else {
                        String::new()
                    },
                ]
            })
            .collect();

        for trial in &report.benchmark.trials {
            if let TrialOutcome::Failed { variant, .. } = trial {
                rows.push(vec![
                    column.name.clone(),
                    variant.compression_type.to_string(),
                    variant.level.to_string(),
                    "FAILED".to_string(),
                    String::new(),
                    String::new(),
                ]);
            }
        }

        let mut output = if rows.is_empty() {
            String::new()
        } else {
            render_table(&HEADERS, &rows)
        };

        for (variant, reason) in report.benchmark.failures() {
            output.push_str(&format!("  failed {}: {}\n", variant, reason));
        }

        match &report.resolution {
            Resolution::Resolved(outcome) => output.push_str(&format!(
                "Chosen for {}: {} ({})\n",
                column.name, outcome.chosen_variant.variant, outcome.chosen_variant.size_human
            )),
            Resolution::Unresolved { reason } => {
                output.push_str(&format!("UNRESOLVED {}: {}\n", column.name, reason))
            }
        }
        output
    }

    /// All column tables, in attribute order
    pub fn render_run(&self, run: &AdvisorRun) -> String {
        run.columns
            .iter()
            .map(|report| self.render_column(report))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The complete run as pretty JSON
    pub fn render_json(&self, run: &AdvisorRun) -> Result<String> {
        Ok(serde_json::to_string_pretty(run)?)
    }
}

/// Box-drawn table
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = |left: char, mid: char, right: char| {
        let mut line = String::new();
        line.push(left);
        for (i, width) in widths.iter().enumerate() {
            line.push_str(&"─".repeat(width + 2));
            line.push(if i < widths.len() - 1 { mid } else { right });
        }
        line.push('\n');
        line
    };
    let line = |cells: Vec<&str>| {
        let mut line = String::from("│");
        for (cell, width) in cells.iter().zip(&widths) {
            let pad = width - cell.chars().count();
            line.push_str(&format!(" {}{} │", cell, " ".repeat(pad)));
        }
        line.push('\n');
        line
    };

    let mut output = border('┌', '┬', '┐');
    output.push_str(&line(headers.to_vec()));
    output.push_str(&border('├', '┼', '┤'));
    for row in rows {
        output.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    output.push_str(&border('└', '┴', '┘'));
    output
}
