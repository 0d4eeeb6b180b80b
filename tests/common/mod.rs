//! Scripted in-memory database for driving the advisor without a server
//!
//! Understands exactly the statements the advisor issues: the catalog query,
//! sample table CREATE / DROP, and the size query. Tracks which sample tables
//! exist so tests can check nothing is left behind.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use aoco_advisor::{AdvisorError, AdvisorResult, CompressionType, Row, Session, SessionFactory, SqlValue};

pub const DEFAULT_SIZE: i64 = 10_000;

#[derive(Default)]
struct State {
    catalog: Vec<Row>,
    /// table ref -> (column, variant key)
    live_tables: HashMap<String, (String, String)>,
    statements: Vec<String>,
    sizes: HashMap<(String, String), i64>,
    fail_create: HashSet<(String, String)>,
    fail_measure: HashSet<(String, String)>,
    fail_drop: bool,
    fail_connect: HashSet<usize>,
    delays: HashMap<String, Duration>,
    created_order: Vec<String>,
}

#[derive(Default)]
pub struct MockDatabase {
    state: Mutex<State>,
    connects: AtomicUsize,
    open_sessions: AtomicUsize,
    peak_sessions: AtomicUsize,
}

pub fn key(ty: CompressionType, level: u8) -> String {
    format!("{}_{}", ty.name(), level)
}

impl MockDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds a column to the catalog result
    pub fn add_column(&self, name: &str, attnum: i64, options: Option<&[&str]>) {
        let opts = match options {
            Some(opts) => SqlValue::TextArray(opts.iter().map(|o| o.to_string()).collect()),
            None => SqlValue::Null,
        };
        self.state.lock().catalog.push(
            Row::new()
                .with("column_name", SqlValue::Text(name.to_string()))
                .with("col_opts", opts)
                .with("attnum", SqlValue::Int(attnum)),
        );
    }

    pub fn set_size(&self, column: &str, ty: CompressionType, level: u8, size: i64) {
        self.state
            .lock()
            .sizes
            .insert((column.to_string(), key(ty, level)), size);
    }

    /// Same size for every variant of a column
    pub fn set_all_sizes(&self, column: &str, size: i64) {
        for variant in aoco_advisor::VariantCatalog::all_variants() {
            self.set_size(column, variant.compression_type, variant.level, size);
        }
    }

    pub fn fail_create(&self, column: &str, ty: CompressionType, level: u8) {
        self.state
            .lock()
            .fail_create
            .insert((column.to_string(), key(ty, level)));
    }

    pub fn fail_measure(&self, column: &str, ty: CompressionType, level: u8) {
        self.state
            .lock()
            .fail_measure
            .insert((column.to_string(), key(ty, level)));
    }

    pub fn fail_all_drops(&self) {
        self.state.lock().fail_drop = true;
    }

    /// Fails the n-th connection attempt (0-based; the catalog lookup is 0)
    pub fn fail_connect(&self, attempt: usize) {
        self.state.lock().fail_connect.insert(attempt);
    }

    /// Slows down every CREATE for a column
    pub fn delay_column(&self, column: &str, delay: Duration) {
        self.state.lock().delays.insert(column.to_string(), delay);
    }

    /// Pretends an earlier run left a sample table behind
    pub fn leave_stale_table(&self, table_ref: &str) {
        self.state
            .lock()
            .live_tables
            .insert(table_ref.to_string(), ("stale".to_string(), "NONE_1".to_string()));
    }

    pub fn live_tables(&self) -> Vec<String> {
        self.state.lock().live_tables.keys().cloned().collect()
    }

    pub fn statements(&self) -> Vec<String> {
        self.state.lock().statements.clone()
    }

    /// Variant keys in the order their sample tables were created for a column
    pub fn created_for(&self, column: &str) -> Vec<String> {
        let prefix = format!("{}:", column);
        self.state
            .lock()
            .created_order
            .iter()
            .filter_map(|entry| entry.strip_prefix(&prefix).map(String::from))
            .collect()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn peak_sessions(&self) -> usize {
        self.peak_sessions.load(Ordering::SeqCst)
    }

    pub fn open_session(self: &Arc<Self>) -> AdvisorResult<Box<dyn Session>> {
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst);
        if self.state.lock().fail_connect.contains(&attempt) {
            return Err(AdvisorError::Connection(format!(
                "connection attempt {} refused",
                attempt
            )));
        }
        let open = self.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_sessions.fetch_max(open, Ordering::SeqCst);
        Ok(Box::new(MockSession { db: Arc::clone(self) }))
    }

    pub fn factory(self: &Arc<Self>) -> impl SessionFactory {
        let db = Arc::clone(self);
        move || db.open_session()
    }

    fn create(&self, sql: &str) -> AdvisorResult<()> {
        let table_ref = between(sql, "CREATE TABLE ", "\n").unwrap_or_default().trim().to_string();
        let column = between(sql, "SELECT \"", "\" FROM").unwrap_or_default().to_string();
        let ty = between(sql, "compresstype=", ",").unwrap_or_default().to_string();
        let level = between(sql, "compresslevel=", "\n").unwrap_or_default().trim().to_string();
        let variant = format!("{}_{}", ty, level);

        let delay = self.state.lock().delays.get(&column).copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let mut state = self.state.lock();
        if state.fail_create.contains(&(column.clone(), variant.clone())) {
            return Err(AdvisorError::Query(format!("could not create {}", table_ref)));
        }
        if state.live_tables.contains_key(&table_ref) {
            return Err(AdvisorError::Query(format!("relation {} already exists", table_ref)));
        }
        state.created_order.push(format!("{}:{}", column, variant));
        state.live_tables.insert(table_ref, (column, variant));
        Ok(())
    }

    fn size_rows(&self, sql: &str) -> AdvisorResult<Vec<Row>> {
        let table_ref = between(sql, "pg_relation_size('", "'::regclass").unwrap_or_default();
        let state = self.state.lock();
        let (column, variant) = state
            .live_tables
            .get(table_ref)
            .cloned()
            .ok_or_else(|| AdvisorError::Query(format!("relation {} does not exist", table_ref)))?;
        if state.fail_measure.contains(&(column.clone(), variant.clone())) {
            return Err(AdvisorError::Query("could not read relation size".to_string()));
        }

        let size = state
            .sizes
            .get(&(column, variant))
            .copied()
            .unwrap_or(DEFAULT_SIZE);
        Ok(vec![Row::new()
            .with("size_h", SqlValue::Text(format!("{} bytes", size)))
            .with("size", SqlValue::Int(size))])
    }
}

struct MockSession {
    db: Arc<MockDatabase>,
}

impl Session for MockSession {
    fn execute(&mut self, sql: &str) -> AdvisorResult<()> {
        self.db.state.lock().statements.push(sql.to_string());

        if let Some(table_ref) = sql.strip_prefix("DROP TABLE IF EXISTS ") {
            let mut state = self.db.state.lock();
            if state.fail_drop {
                return Err(AdvisorError::Query("drop refused".to_string()));
            }
            state.live_tables.remove(table_ref.trim());
            return Ok(());
        }
        if sql.starts_with("CREATE TABLE ") {
            return self.db.create(sql);
        }
        Err(AdvisorError::Query(format!("unexpected statement: {}", sql)))
    }

    fn query(&mut self, sql: &str) -> AdvisorResult<Vec<Row>> {
        self.db.state.lock().statements.push(sql.to_string());

        if sql.contains("pg_attribute") {
            return Ok(self.db.state.lock().catalog.clone());
        }
        if sql.contains("pg_relation_size") {
            return self.db.size_rows(sql);
        }
        Err(AdvisorError::Query(format!("unexpected query: {}", sql)))
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.db.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let to = text[from..].find(end)? + from;
    Some(&text[from..to])
}
