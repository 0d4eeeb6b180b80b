//! PostgreSQL / Greenplum session backed by sqlx
//!
//! sqlx is async; each session owns a current-thread tokio runtime and blocks
//! on it, so a benchmark worker thread drives exactly one connection.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, ConnectOptions, Connection, Row as SqlxRow, TypeInfo};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::common::error::{AdvisorError, Result};
use crate::config::ConnectionConfig;
use crate::session::{Row, Session, SessionFactory, SqlValue};

/// Auto-commit session over a single connection
pub struct PgSession {
    /// Taken on drop so the connection can be closed with a Terminate message
    conn: Option<PgConnection>,
    runtime: Runtime,
}

impl PgSession {
    /// Opens a connection; `statement_timeout` is applied server-side when given
    pub fn connect(config: &ConnectionConfig, statement_timeout: Option<Duration>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AdvisorError::Connection(format!("Failed to start session runtime: {}", e)))?;

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.database)
            .application_name(env!("CARGO_PKG_NAME"));
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let conn = runtime.block_on(options.connect()).map_err(|e| {
            AdvisorError::Connection(format!(
                "{}@{}:{}/{}: {}",
                config.user, config.host, config.port, config.database, e
            ))
        })?;
        debug!(host = %config.host, database = %config.database, "session opened");

        let mut session = Self {
            conn: Some(conn),
            runtime,
        };
        if let Some(timeout) = statement_timeout {
            session.execute(&format!("SET statement_timeout = {}", timeout.as_millis()))?;
        }
        Ok(session)
    }
}

impl Session for PgSession {
    fn execute(&mut self, sql: &str) -> Result<()> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| AdvisorError::Connection("session is closed".to_string()))?;
        self.runtime.block_on(sqlx::raw_sql(sql).execute(conn))?;
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| AdvisorError::Connection("session is closed".to_string()))?;
        let rows = self
            .runtime
            .block_on(sqlx::query(sql).persistent(false).fetch_all(conn))?;
        rows.iter().map(decode_row).collect()
    }
}

impl Drop for PgSession {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = self.runtime.block_on(conn.close()) {
                debug!("session did not close cleanly: {}", e);
            }
        }
    }
}

/// Converts a driver row into a named row, decoding by column type
fn decode_row(row: &PgRow) -> Result<Row> {
    let mut out = Row::new();
    for (i, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name().to_uppercase();
        let value = match type_name.as_str() {
            "INT2" => row.try_get::<Option<i16>, _>(i)?.map(|v| SqlValue::Int(v as i64)),
            "INT4" => row.try_get::<Option<i32>, _>(i)?.map(|v| SqlValue::Int(v as i64)),
            "INT8" => row.try_get::<Option<i64>, _>(i)?.map(SqlValue::Int),
            "TEXT[]" | "VARCHAR[]" | "NAME[]" => {
                row.try_get::<Option<Vec<String>>, _>(i)?.map(SqlValue::TextArray)
            }
            _ => row.try_get::<Option<String>, _>(i)?.map(SqlValue::Text),
        };
        out.push(column.name(), value.unwrap_or(SqlValue::Null));
    }
    Ok(out)
}

/// Opens a fresh [`PgSession`] per call
#[derive(Debug, Clone)]
pub struct PgSessionFactory {
    connection: ConnectionConfig,
    statement_timeout: Option<Duration>,
}

impl PgSessionFactory {
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            statement_timeout: None,
        }
    }

    pub fn with_statement_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.statement_timeout = timeout;
        self
    }
}

impl SessionFactory for PgSessionFactory {
    fn connect(&self) -> Result<Box<dyn Session>> {
        let session = PgSession::connect(&self.connection, self.statement_timeout)?;
        Ok(Box::new(session))
    }
}
