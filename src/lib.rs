//! aoco-advisor - encoding advisor for append-optimized column tables
//!
//! Measures how large a sample of each column becomes under every supported
//! compression type and level, picks an encoding per column that balances
//! size against decompression cost, and emits a script that rebuilds the table
//! with those encodings.
//!
pub mod bench;
pub mod catalog;
pub mod column;
pub mod common;
pub mod config;
pub mod orchestrator;
pub mod report;
pub mod script;
pub mod selection;
pub mod session;
pub mod variant;

// Re-export common types for convenience
pub use common::{AdvisorError, AdvisorResult};

pub use bench::{BenchSettings, BenchmarkEngine, BenchmarkResult, ColumnBenchmark, TrialOutcome};
pub use column::{ColumnDescriptor, RawColumn};
pub use config::{AdvisorConfig, ConnectionConfig};
pub use orchestrator::{AdvisorRun, ColumnReport, Orchestrator, Resolution};
pub use report::ReportRenderer;
pub use script::RebuildScript;
pub use selection::{SelectionOutcome, SelectionPolicy};
pub use session::{PgSessionFactory, Row, Session, SessionFactory, SqlValue};
pub use variant::{CompressionType, CompressionVariant, CostModel, VariantCatalog};

/// Writes the rebuild script to a file
pub fn write_script<P: AsRef<std::path::Path>>(path: P, script: &str) -> AdvisorResult<()> {
    std::fs::write(path, script)?;
    Ok(())
}
