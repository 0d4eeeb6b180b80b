//! Database session abstraction
//!
//! The advisor only needs two things from a database: run a statement, and run
//! a query returning rows. Every benchmark task opens its own session through a
//! [`SessionFactory`], so sessions are never shared between threads.

pub mod postgres;

use crate::common::error::{AdvisorError, Result};

pub use postgres::{PgSession, PgSessionFactory};

/// A single cell of a result row
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
    TextArray(Vec<String>),
}

/// A named result row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append of a named cell
    pub fn with(mut self, name: impl Into<String>, value: SqlValue) -> Self {
        self.columns.push((name.into(), value));
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.columns.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Integer cell; NULL and missing columns are errors
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(SqlValue::Int(v)) => Ok(*v),
            Some(SqlValue::Text(s)) => s.trim().parse::<i64>().map_err(|e| {
                AdvisorError::Query(format!("Column {} is not an integer ({}): {}", name, s, e))
            }),
            Some(other) => Err(AdvisorError::Query(format!(
                "Column {} has unexpected value {:?}",
                name, other
            ))),
            None => Err(AdvisorError::Query(format!("Column {} missing from row", name))),
        }
    }

    /// Text cell; NULL and missing columns are errors
    pub fn get_text(&self, name: &str) -> Result<String> {
        match self.get(name) {
            Some(SqlValue::Text(s)) => Ok(s.clone()),
            Some(SqlValue::Int(v)) => Ok(v.to_string()),
            Some(other) => Err(AdvisorError::Query(format!(
                "Column {} has unexpected value {:?}",
                name, other
            ))),
            None => Err(AdvisorError::Query(format!("Column {} missing from row", name))),
        }
    }

    /// Nullable text array cell
    pub fn get_text_array(&self, name: &str) -> Result<Option<Vec<String>>> {
        match self.get(name) {
            Some(SqlValue::TextArray(items)) => Ok(Some(items.clone())),
            Some(SqlValue::Null) => Ok(None),
            Some(other) => Err(AdvisorError::Query(format!(
                "Column {} has unexpected value {:?}",
                name, other
            ))),
            None => Err(AdvisorError::Query(format!("Column {} missing from row", name))),
        }
    }
}

/// Synchronous, auto-commit database session
pub trait Session: Send {
    /// Executes a statement that returns no rows (DDL)
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Executes a query and collects its rows
    fn query(&mut self, sql: &str) -> Result<Vec<Row>>;
}

/// Opens new sessions; shared by all worker threads
pub trait SessionFactory: Send + Sync {
    fn connect(&self) -> Result<Box<dyn Session>>;
}

impl<F> SessionFactory for F
where
    F: Fn() -> Result<Box<dyn Session>> + Send + Sync,
{
    fn connect(&self) -> Result<Box<dyn Session>> {
        self()
    }
}
