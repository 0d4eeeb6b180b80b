//! Rebuild script generation
//!
//! The script is only text: it creates a shadow table with per-column
//! encodings, copies the rows, analyzes it, and swaps it in for the original.
//! Nothing here is ever executed against the database.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::common::constants::{RETIRED_TABLE_SUFFIX, SHADOW_TABLE_SUFFIX};
use crate::common::helper::{qualified_name, quote_ident};
use crate::orchestrator::{ColumnReport, Resolution};
use crate::variant::CompressionVariant;

/// `COLUMN "<name>" ENCODING (...)` clause for a chosen variant
pub fn column_clause(column: &str, variant: &CompressionVariant) -> String {
    format!(
        "COLUMN {} ENCODING (compresstype={}, COMPRESSLEVEL={})",
        quote_ident(column),
        variant.compression_type,
        variant.level
    )
}

/// Builder for the table rebuild script
#[derive(Debug, Clone)]
pub struct RebuildScript {
    schema: String,
    table: String,
    table_default: CompressionVariant,
}

impl RebuildScript {
    pub fn new(schema: impl Into<String>, table: impl Into<String>, table_default: CompressionVariant) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            table_default,
        }
    }

    pub fn shadow_table(&self) -> String {
        format!("{}{}", self.table, SHADOW_TABLE_SUFFIX)
    }

    /// Renders the script; unresolved columns get no override and are called out in comments
    pub fn build(&self, columns: &[ColumnReport], generated_at: DateTime<Utc>) -> String {
        let source = qualified_name(&self.schema, &self.table);
        let shadow = qualified_name(&self.schema, &self.shadow_table());

        let mut out = String::new();
        out.push_str(&format!(
            "-- Rebuild of {} generated by {} {} at {}\n",
            source,
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));

        let mut clauses = vec![format!("LIKE {}", source)];
        for report in columns {
            match &report.resolution {
                Resolution::Resolved(outcome) => {
                    clauses.push(column_clause(&report.column().name, &outcome.chosen_variant.variant));
                }
                Resolution::Unresolved { reason } => {
                    out.push_str(&format!(
                        "-- UNRESOLVED column {} keeps the table default encoding: {}\n",
                        quote_ident(&report.column().name),
                        reason.replace(['\n', '\r'], " ")
                    ));
                }
            }
        }
        out.push('\n');

        out.push_str(&format!("CREATE TABLE {} (\n    ", shadow));
        out.push_str(&clauses.join(",\n    "));
        out.push_str("\n)\n");
        out.push_str(&format!(
            "WITH (\n    appendonly=true,\n    orientation=column,\n    compresstype={},\n    COMPRESSLEVEL={}\n);\n\n",
            self.table_default.compression_type, self.table_default.level
        ));

        out.push_str(&format!("INSERT INTO {} SELECT * FROM {};\n", shadow, source));
        out.push_str(&format!("ANALYZE {};\n\n", shadow));

        out.push_str("BEGIN;\n");
        out.push_str(&format!(
            "ALTER TABLE {} RENAME TO {};\n",
            source,
            quote_ident(&format!("{}{}", self.table, RETIRED_TABLE_SUFFIX))
        ));
        out.push_str(&format!(
            "ALTER TABLE {} RENAME TO {};\n",
            shadow,
            quote_ident(&self.table)
        ));
        out.push_str("COMMIT;\n");
        out
    }
}
