//! Catalog lookup of the source table's columns

use tracing::debug;

use crate::column::RawColumn;
use crate::common::error::{AdvisorError, Result};
use crate::common::helper::quote_literal;
use crate::session::Session;

/// Query listing live, user-visible columns with their encoding options, by attnum
pub fn columns_query(schema: &str, table: &str) -> String {
    format!(
        "SELECT a.attname::text AS column_name,
       e.attoptions::text[] AS col_opts,
       a.attnum::int4 AS attnum
FROM pg_catalog.pg_attribute a
LEFT JOIN pg_catalog.pg_attribute_encoding e ON e.attrelid = a.attrelid AND e.attnum = a.attnum
LEFT JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
LEFT JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE a.attnum > 0
  AND NOT a.attisdropped
  AND c.relname = {}
  AND n.nspname = {}
ORDER BY a.attnum",
        quote_literal(table),
        quote_literal(schema)
    )
}

/// Fetches the columns of `schema.table`; a table without columns is an error
pub fn fetch_columns(session: &mut dyn Session, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let rows = session.query(&columns_query(schema, table))?;
    if rows.is_empty() {
        return Err(AdvisorError::Catalog(format!(
            "table {}.{} not found or has no columns",
            schema, table
        )));
    }

    let mut columns = rows
        .iter()
        .map(|row| {
            Ok(RawColumn {
                name: row.get_text("column_name")?,
                ordinal: i32::try_from(row.get_i64("attnum")?)
                    .map_err(|e| AdvisorError::Catalog(format!("attnum out of range: {}", e)))?,
                options: row.get_text_array("col_opts")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    columns.sort_by_key(|c| c.ordinal);

    debug!(schema = %schema, table = %table, count = columns.len(), "fetched column metadata");
    Ok(columns)
}
