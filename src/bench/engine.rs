//! Benchmark engine
//!
//! Each trial creates `compression_test_<table>_<column>`, reads its size and
//! drops it. The name depends only on the source table and column, so columns
//! benchmarked concurrently never touch each other's sample table, and a
//! leftover from an interrupted run is simply replaced.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::bench::result::{BenchmarkResult, ColumnBenchmark, TrialOutcome};
use crate::column::ColumnDescriptor;
use crate::common::constants::{MAX_IDENTIFIER_LENGTH, SAMPLE_TABLE_PREFIX};
use crate::common::error::{AdvisorError, Result};
use crate::common::helper::{qualified_name, quote_ident, quote_literal};
use crate::config::AdvisorConfig;
use crate::measurement_err;
use crate::session::Session;
use crate::variant::{CompressionVariant, VariantCatalog};

/// Settings the engine needs from the run configuration
#[derive(Debug, Clone)]
pub struct BenchSettings {
    pub schema: String,
    pub table: String,
    pub sample_row_limit: u64,
    pub scratch_schema: Option<String>,
    pub column_deadline: Option<Duration>,
}

impl From<&AdvisorConfig> for BenchSettings {
    fn from(config: &AdvisorConfig) -> Self {
        Self {
            schema: config.schema.clone(),
            table: config.table.clone(),
            sample_row_limit: config.sample_row_limit,
            scratch_schema: config.scratch_schema.clone(),
            column_deadline: config.column_deadline,
        }
    }
}

/// Sample table name for a column
///
/// Names past the identifier limit are cut and suffixed with a hash of the full
/// name, otherwise two long column names could truncate to the same table.
pub fn sample_table_name(table: &str, column: &str) -> String {
    let name = format!("{}_{}_{}", SAMPLE_TABLE_PREFIX, table, column);
    if name.len() <= MAX_IDENTIFIER_LENGTH {
        return name;
    }

    let suffix = format!("_{:016x}", twox_hash::XxHash64::oneshot(0, name.as_bytes()));
    let mut cut = MAX_IDENTIFIER_LENGTH - suffix.len();
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &name[..cut], suffix)
}

/// Runs every variant trial for a column
#[derive(Debug, Clone)]
pub struct BenchmarkEngine {
    settings: BenchSettings,
    variants: Vec<CompressionVariant>,
}

impl BenchmarkEngine {
    pub fn new(settings: BenchSettings) -> Self {
        Self {
            settings,
            variants: VariantCatalog::all_variants(),
        }
    }

    pub fn variants(&self) -> &[CompressionVariant] {
        &self.variants
    }

    /// Quoted, optionally schema-qualified sample table for a column
    pub fn sample_table_ref(&self, column: &str) -> String {
        let name = sample_table_name(&self.settings.table, column);
        match &self.settings.scratch_schema {
            Some(schema) => qualified_name(schema, &name),
            None => quote_ident(&name),
        }
    }

    /// CTAS statement materializing the sampled column under `variant`
    pub fn create_sql(&self, column: &str, variant: &CompressionVariant) -> String {
        format!(
            "CREATE TABLE {}
WITH (
  appendonly=true,
  orientation=column,
  compresstype={},
  compresslevel={}
)
AS (SELECT {} FROM {} LIMIT {})",
            self.sample_table_ref(column),
            variant.compression_type,
            variant.level,
            quote_ident(column),
            qualified_name(&self.settings.schema, &self.settings.table),
            self.settings.sample_row_limit
        )
    }

    /// Query returning `size` (bytes) and `size_h` (pretty) of a column's sample table
    pub fn size_sql(&self, column: &str) -> String {
        let relation = quote_literal(&self.sample_table_ref(column));
        format!(
            "SELECT pg_size_pretty(pg_relation_size({rel}::regclass))::text AS size_h,
       pg_relation_size({rel}::regclass)::int8 AS size",
            rel = relation
        )
    }

    /// Benchmarks `column` under every variant, in registry order
    ///
    /// A failing trial is recorded and the remaining variants still run.
    pub fn bench_column(&self, session: &mut dyn Session, column: &ColumnDescriptor) -> ColumnBenchmark {
        let started = Instant::now();
        let mut trials = Vec::with_capacity(self.variants.len());

        for variant in &self.variants {
            if let Some(deadline) = self.settings.column_deadline {
                if started.elapsed() >= deadline {
                    let err = AdvisorError::DeadlineExceeded(format!(
                        "column {} exceeded {:?} before {}",
                        column.name, deadline, variant
                    ));
                    trials.push(TrialOutcome::Failed {
                        variant: *variant,
                        reason: err.to_string(),
                    });
                    continue;
                }
            }

            match self.run_trial(session, column, variant) {
                Ok(result) => {
                    debug!(
                        column = %column.name,
                        variant = %variant,
                        size_bytes = result.size_bytes,
                        "measured sample table"
                    );
                    trials.push(TrialOutcome::Measured(result));
                }
                Err(e) => {
                    warn!(column = %column.name, variant = %variant, "trial failed: {}", e);
                    trials.push(TrialOutcome::Failed {
                        variant: *variant,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            column = %column.name,
            trials = trials.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "column benchmarked"
        );
        ColumnBenchmark::new(column.clone(), trials)
    }

    fn run_trial(
        &self,
        session: &mut dyn Session,
        column: &ColumnDescriptor,
        variant: &CompressionVariant,
    ) -> Result<BenchmarkResult> {
        let mut sample = SampleTable::prepare(session, self.sample_table_ref(&column.name))?;

        let measured = sample
            .create(&self.create_sql(&column.name, variant))
            .and_then(|_| sample.measure(&self.size_sql(&column.name)));

        // the next trial drops leftovers again before creating
        if let Err(e) = sample.release() {
            warn!(column = %column.name, variant = %variant, "failed to drop sample table: {}", e);
        }

        let (size_bytes, size_human) = measured?;
        Ok(BenchmarkResult {
            column_name: column.name.clone(),
            ordinal: column.ordinal,
            variant: *variant,
            size_bytes,
            size_human,
        })
    }
}

/// Sample table dropped on every exit path
struct SampleTable<'s> {
    session: &'s mut dyn Session,
    table_ref: String,
    released: bool,
}

impl<'s> SampleTable<'s> {
    /// Clears a stale table of the same name
    fn prepare(session: &'s mut dyn Session, table_ref: String) -> Result<Self> {
        session.execute(&format!("DROP TABLE IF EXISTS {}", table_ref))?;
        Ok(Self {
            session,
            table_ref,
            released: false,
        })
    }

    fn create(&mut self, create_sql: &str) -> Result<()> {
        self.session.execute(create_sql)
    }

    fn measure(&mut self, size_sql: &str) -> Result<(u64, String)> {
        let rows = self.session.query(size_sql)?;
        let row = rows
            .first()
            .ok_or_else(|| measurement_err!("no size returned for {}", self.table_ref))?;

        let size = row.get_i64("size")?;
        let size_bytes = u64::try_from(size)
            .map_err(|_| measurement_err!("negative size {} for {}", size, self.table_ref))?;
        Ok((size_bytes, row.get_text("size_h")?))
    }

    fn release(mut self) -> Result<()> {
        self.released = true;
        self.session
            .execute(&format!("DROP TABLE IF EXISTS {}", self.table_ref))
    }
}

impl Drop for SampleTable<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self
            .session
            .execute(&format!("DROP TABLE IF EXISTS {}", self.table_ref))
        {
            warn!(table = %self.table_ref, "failed to drop sample table: {}", e);
        }
    }
}
