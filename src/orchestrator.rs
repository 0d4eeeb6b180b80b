//! Run orchestration
//!
//! One task per column runs on a fixed-size worker pool, each with its own
//! session. The pool is joined before anything is selected, results are put
//! back into attribute order, and the rebuild script is assembled from the
//! per-column choices.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bench::{BenchSettings, BenchmarkEngine, ColumnBenchmark};
use crate::catalog::fetch_columns;
use crate::column::ColumnDescriptor;
use crate::common::error::{AdvisorError, Result};
use crate::config::AdvisorConfig;
use crate::script::RebuildScript;
use crate::selection::{SelectionOutcome, SelectionPolicy};
use crate::session::SessionFactory;
use crate::variant::{CostModel, VariantCatalog};

/// Selection state of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(SelectionOutcome),
    /// No variant could be measured; the column keeps the table default
    Unresolved { reason: String },
}

/// Benchmark and selection for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub benchmark: ColumnBenchmark,
    pub resolution: Resolution,
}

impl ColumnReport {
    /// Applies the policy to a finished benchmark
    pub fn resolve(benchmark: ColumnBenchmark, policy: &SelectionPolicy) -> Self {
        let results = benchmark.results();
        let resolution = match policy.select(&results, benchmark.column.original_variant.as_ref()) {
            Some(outcome) => Resolution::Resolved(outcome),
            None => Resolution::Unresolved {
                reason: match &benchmark.session_error {
                    Some(err) => err.clone(),
                    None => format!(
                        "no variant could be measured ({} trials failed)",
                        benchmark.failures().len()
                    ),
                },
            },
        };
        Self {
            benchmark,
            resolution,
        }
    }

    pub fn column(&self) -> &ColumnDescriptor {
        &self.benchmark.column
    }

    pub fn outcome(&self) -> Option<&SelectionOutcome> {
        match &self.resolution {
            Resolution::Resolved(outcome) => Some(outcome),
            Resolution::Unresolved { .. } => None,
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorRun {
    pub schema: String,
    pub table: String,
    pub tradeoff_threshold_percent: u8,
    /// Attribute order of the source table
    pub columns: Vec<ColumnReport>,
    pub script: String,
}

impl AdvisorRun {
    pub fn unresolved(&self) -> Vec<&ColumnReport> {
        self.columns
            .iter()
            .filter(|report| report.outcome().is_none())
            .collect()
    }
}

/// Drives catalog lookup, the column fan-out, selection and script assembly
pub struct Orchestrator<F: SessionFactory> {
    config: AdvisorConfig,
    factory: F,
    cost_model: Arc<dyn CostModel>,
}

impl<F: SessionFactory> Orchestrator<F> {
    pub fn new(config: AdvisorConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            cost_model: Arc::new(VariantCatalog),
        }
    }

    /// Replaces the fixed weight table
    pub fn with_cost_model(mut self, cost_model: Arc<dyn CostModel>) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Runs the whole benchmark; catalog and pool errors abort, column failures do not
    pub fn run(&self) -> Result<AdvisorRun> {
        self.config.validate()?;
        let started = Instant::now();

        let columns = self.describe_columns()?;
        info!(
            schema = %self.config.schema,
            table = %self.config.table,
            columns = columns.len(),
            workers = self.config.worker_count,
            "benchmarking columns"
        );

        let benchmarks = self.benchmark_columns(&columns)?;

        let policy = SelectionPolicy::with_cost_model(
            self.config.tradeoff_threshold_percent,
            Arc::clone(&self.cost_model),
        );
        let reports: Vec<ColumnReport> = benchmarks
            .into_iter()
            .map(|benchmark| ColumnReport::resolve(benchmark, &policy))
            .collect();

        for report in &reports {
            match &report.resolution {
                Resolution::Resolved(outcome) => debug!(
                    column = %report.column().name,
                    chosen = %outcome.chosen_variant.variant,
                    size_bytes = outcome.chosen_variant.size_bytes,
                    "selected encoding"
                ),
                Resolution::Unresolved { reason } => {
                    warn!(column = %report.column().name, "column unresolved: {}", reason)
                }
            }
        }

        let script = RebuildScript::new(
            self.config.schema.clone(),
            self.config.table.clone(),
            self.config.table_default,
        )
        .build(&reports, Utc::now());

        info!(elapsed_ms = started.elapsed().as_millis() as u64, "run complete");
        Ok(AdvisorRun {
            schema: self.config.schema.clone(),
            table: self.config.table.clone(),
            tradeoff_threshold_percent: policy.threshold_percent(),
            columns: reports,
            script,
        })
    }

    /// Reads and normalizes the source table's columns
    pub fn describe_columns(&self) -> Result<Vec<ColumnDescriptor>> {
        let mut session = self.factory.connect()?;
        let raw = fetch_columns(session.as_mut(), &self.config.schema, &self.config.table)?;
        Ok(raw.into_iter().map(ColumnDescriptor::from_raw).collect())
    }

    /// Benchmarks every column on the worker pool; returned in ordinal order
    pub fn benchmark_columns(&self, columns: &[ColumnDescriptor]) -> Result<Vec<ColumnBenchmark>> {
        let engine = BenchmarkEngine::new(BenchSettings::from(&self.config));
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_count)
            .thread_name(|i| format!("bench-worker-{}", i))
            .build()
            .map_err(|e| AdvisorError::WorkerPool(e.to_string()))?;

        // blocks until every column task has finished
        let mut benchmarks: Vec<ColumnBenchmark> = pool.install(|| {
            columns
                .par_iter()
                .with_max_len(1)
                .map(|column| self.bench_task(&engine, column))
                .collect()
        });

        benchmarks.sort_by_key(ColumnBenchmark::ordinal);
        Ok(benchmarks)
    }

    /// One column on its own session; a connection failure only affects this column
    fn bench_task(&self, engine: &BenchmarkEngine, column: &ColumnDescriptor) -> ColumnBenchmark {
        match self.factory.connect() {
            Ok(mut session) => engine.bench_column(session.as_mut(), column),
            Err(e) => {
                warn!(column = %column.name, "could not open session: {}", e);
                ColumnBenchmark::unavailable(column.clone(), e.to_string())
            }
        }
    }
}
