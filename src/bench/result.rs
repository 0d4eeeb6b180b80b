//! Benchmark results

use serde::Serialize;

use crate::column::ColumnDescriptor;
use crate::variant::CompressionVariant;

/// Measured footprint of one column under one variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub column_name: String,
    pub ordinal: i32,
    pub variant: CompressionVariant,
    pub size_bytes: u64,
    pub size_human: String,
}

/// Outcome of a single variant trial
///
/// A failed trial never carries a size, so it cannot pass for a zero-byte table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialOutcome {
    Measured(BenchmarkResult),
    Failed {
        variant: CompressionVariant,
        reason: String,
    },
}

impl TrialOutcome {
    pub fn variant(&self) -> &CompressionVariant {
        match self {
            TrialOutcome::Measured(result) => &result.variant,
            TrialOutcome::Failed { variant, .. } => variant,
        }
    }

    pub fn measured(&self) -> Option<&BenchmarkResult> {
        match self {
            TrialOutcome::Measured(result) => Some(result),
            TrialOutcome::Failed { .. } => None,
        }
    }
}

/// All trials for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnBenchmark {
    pub column: ColumnDescriptor,
    /// One entry per attempted variant, in registry order
    pub trials: Vec<TrialOutcome>,
    /// Set when the column's session could not be opened
    pub session_error: Option<String>,
}

impl ColumnBenchmark {
    pub fn new(column: ColumnDescriptor, trials: Vec<TrialOutcome>) -> Self {
        Self {
            column,
            trials,
            session_error: None,
        }
    }

    /// The column could not be benchmarked at all
    pub fn unavailable(column: ColumnDescriptor, reason: impl Into<String>) -> Self {
        Self {
            column,
            trials: Vec::new(),
            session_error: Some(reason.into()),
        }
    }

    pub fn ordinal(&self) -> i32 {
        self.column.ordinal
    }

    /// Successful measurements, registry order
    pub fn results(&self) -> Vec<BenchmarkResult> {
        self.trials
            .iter()
            .filter_map(TrialOutcome::measured)
            .cloned()
            .collect()
    }

    /// Failed trials as (variant, reason)
    pub fn failures(&self) -> Vec<(&CompressionVariant, &str)> {
        self.trials
            .iter()
            .filter_map(|trial| match trial {
                TrialOutcome::Failed { variant, reason } => Some((variant, reason.as_str())),
                TrialOutcome::Measured(_) => None,
            })
            .collect()
    }
}
