//! Advisor configuration
//!
//! Settings are validated up front so a bad threshold or a missing table name
//! fails before any session is opened.

use std::time::Duration;

use serde::Serialize;

use crate::common::constants::*;
use crate::common::error::{AdvisorError, Result};
use crate::variant::{CompressionType, CompressionVariant};

/// Connection settings for every session the run opens
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub database: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: None,
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

/// Run configuration
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorConfig {
    pub connection: ConnectionConfig,
    /// Schema of the source table
    pub schema: String,
    /// Source table
    pub table: String,
    /// Rows copied from the source into each sample table
    pub sample_row_limit: u64,
    /// Columns benchmarked concurrently
    pub worker_count: usize,
    /// Minimum percentage of the smallest size a competitor must reach
    pub tradeoff_threshold_percent: u8,
    /// Schema for sample tables; the session search path when absent
    pub scratch_schema: Option<String>,
    /// Wall-clock budget for benchmarking one column
    pub column_deadline: Option<Duration>,
    /// Table-level encoding of the rebuilt table
    pub table_default: CompressionVariant,
}

impl AdvisorConfig {
    /// Configuration for a table with every other setting at its default
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            ..Default::default()
        }
    }

    /// Checks required fields and ranges
    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(AdvisorError::Configuration("table is required".to_string()));
        }
        if self.schema.trim().is_empty() {
            return Err(AdvisorError::Configuration("schema is required".to_string()));
        }
        if !(MIN_TRADEOFF_THRESHOLD..=MAX_TRADEOFF_THRESHOLD)
            .contains(&self.tradeoff_threshold_percent)
        {
            return Err(AdvisorError::Configuration(format!(
                "tradeoff threshold must be between {} and {}, got {}",
                MIN_TRADEOFF_THRESHOLD, MAX_TRADEOFF_THRESHOLD, self.tradeoff_threshold_percent
            )));
        }
        if self.worker_count == 0 {
            return Err(AdvisorError::Configuration(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.sample_row_limit == 0 {
            return Err(AdvisorError::Configuration(
                "sample row limit must be at least 1".to_string(),
            ));
        }
        if matches!(&self.scratch_schema, Some(s) if s.trim().is_empty()) {
            return Err(AdvisorError::Configuration(
                "scratch schema must not be empty".to_string(),
            ));
        }
        if self.column_deadline == Some(Duration::ZERO) {
            return Err(AdvisorError::Configuration(
                "column deadline must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            connection: ConnectionConfig::default(),
            schema: String::new(),
            table: String::new(),
            sample_row_limit: DEFAULT_SAMPLE_ROW_LIMIT,
            worker_count: DEFAULT_WORKER_COUNT,
            tradeoff_threshold_percent: DEFAULT_TRADEOFF_THRESHOLD,
            scratch_schema: None,
            column_deadline: None,
            table_default: CompressionVariant::new(CompressionType::RleType, 3),
        }
    }
}
