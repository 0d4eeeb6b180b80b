//! Per-column storage benchmark
//!
//! For each column, every registry variant is materialized as a small
//! append-optimized, column-oriented sample table, its on-disk size is
//! measured, and the table is dropped again. Variant trials for one column
//! run sequentially on that column's own session.

pub mod engine;
pub mod result;

pub use engine::{sample_table_name, BenchSettings, BenchmarkEngine};
pub use result::{BenchmarkResult, ColumnBenchmark, TrialOutcome};
