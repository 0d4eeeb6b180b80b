//! aoco-advisor - Main Entry Point
//!
//! Benchmarks every column of a table and prints the comparison tables
//! followed by the suggested rebuild script.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use aoco_advisor::common::constants::*;
use aoco_advisor::{write_script, AdvisorConfig, ConnectionConfig, Orchestrator, PgSessionFactory, ReportRenderer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "aoco-advisor")]
#[command(about = "Find the best compression encoding for each column of an append-optimized table")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Database host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Database port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Database user
    #[arg(long, default_value = DEFAULT_USER)]
    user: String,

    /// Database password
    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database name
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: String,

    /// Table to analyze
    #[arg(short, long)]
    table: String,

    /// Schema of the table
    #[arg(short, long)]
    schema: String,

    /// Rows to examine per sample table
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_ROW_LIMIT)]
    lines: u64,

    /// Columns benchmarked in parallel
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    threads: usize,

    /// Size tradeoff threshold in percent of the smallest result
    #[arg(
        long,
        alias = "tradeoff_treshold",
        default_value_t = DEFAULT_TRADEOFF_THRESHOLD,
        value_parser = clap::value_parser!(u8).range(MIN_TRADEOFF_THRESHOLD as i64..=MAX_TRADEOFF_THRESHOLD as i64)
    )]
    tradeoff_threshold: u8,

    /// Schema for the temporary sample tables
    #[arg(long)]
    scratch_schema: Option<String>,

    /// Per-column time budget in seconds
    #[arg(long)]
    column_timeout: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,

    /// Also write the rebuild script to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> AdvisorConfig {
        AdvisorConfig {
            connection: ConnectionConfig {
                host: self.host.clone(),
                port: self.port,
                user: self.user.clone(),
                password: self.password.clone(),
                database: self.database.clone(),
            },
            schema: self.schema.clone(),
            table: self.table.clone(),
            sample_row_limit: self.lines,
            worker_count: self.threads,
            tradeoff_threshold_percent: self.tradeoff_threshold,
            scratch_schema: self.scratch_schema.clone(),
            column_deadline: self.column_timeout.map(Duration::from_secs),
            ..Default::default()
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.to_config();
    config.validate()?;
    tracing::debug!(config = %serde_json::to_string(&config)?, "effective configuration");

    let factory = PgSessionFactory::new(config.connection.clone())
        .with_statement_timeout(config.column_deadline);
    let advisor = Orchestrator::new(config, factory);
    let run = advisor
        .run()
        .with_context(|| format!("benchmark of {}.{} failed", cli.schema, cli.table))?;

    let renderer = ReportRenderer;
    match cli.format {
        ReportFormat::Table => {
            println!("{}", renderer.render_run(&run));
            println!("{}", run.script);
        }
        ReportFormat::Json => println!("{}", renderer.render_json(&run)?),
    }

    if let Some(path) = &cli.output {
        write_script(path, &run.script)
            .with_context(|| format!("failed to write script to {}", path.display()))?;
    }

    let unresolved = run.unresolved();
    if !unresolved.is_empty() {
        eprintln!(
            "{} column(s) could not be benchmarked: {}",
            unresolved.len(),
            unresolved
                .iter()
                .map(|r| r.column().name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["aoco-advisor", "-t", "orders", "-s", "sales"]);
        let config = cli.to_config();
        assert_eq!(config.table, "orders");
        assert_eq!(config.schema, "sales");
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.tradeoff_threshold_percent, 90);
        assert_eq!(config.sample_row_limit, 10_000_000);
        assert!(config.column_deadline.is_none());
    }

    #[test]
    fn test_cli_threshold_range() {
        assert!(Cli::try_parse_from(["aoco-advisor", "-t", "o", "-s", "s", "--tradeoff-threshold", "100"]).is_err());
        assert!(Cli::try_parse_from(["aoco-advisor", "-t", "o", "-s", "s", "--tradeoff-threshold", "0"]).is_err());

        let cli = Cli::try_parse_from(["aoco-advisor", "-t", "o", "-s", "s", "--tradeoff_treshold", "75"]).unwrap();
        assert_eq!(cli.tradeoff_threshold, 75);
    }

    #[test]
    fn test_cli_requires_table_and_schema() {
        assert!(Cli::try_parse_from(["aoco-advisor", "-s", "sales"]).is_err());
        assert!(Cli::try_parse_from(["aoco-advisor", "-t", "orders"]).is_err());
    }
}
