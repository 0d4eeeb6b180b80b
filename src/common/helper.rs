//! Helper utilities for building SQL text

/// Quotes an identifier, doubling embedded double quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a string literal, doubling embedded single quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Schema-qualified, quoted relation name
pub fn qualified_name(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

/// Percentage of `value` relative to `reference`, None when the reference is zero
pub fn percent_of(value: u64, reference: u64) -> Option<f64> {
    if reference == 0 {
        None
    } else {
        Some(100.0 * value as f64 / reference as f64)
    }
}
