//! Column descriptors
//!
//! Normalizes raw catalog metadata (name, attribute number, encoding option
//! strings such as `compresstype=zstd`) into what the benchmark needs.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::variant::{CompressionType, CompressionVariant, VariantCatalog};

/// Column metadata as returned by the catalog query
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub ordinal: i32,
    /// `key=value` strings, None when the column carries no encoding options
    pub options: Option<Vec<String>>,
}

/// A column to benchmark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Attribute number in the source table
    pub ordinal: i32,
    /// Encoding applied today; None means the table default applies
    pub original_variant: Option<CompressionVariant>,
    /// All encoding options, keys and values lower-cased
    pub encoding_options: BTreeMap<String, String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, ordinal: i32) -> Self {
        Self {
            name: name.into(),
            ordinal,
            original_variant: None,
            encoding_options: BTreeMap::new(),
        }
    }

    pub fn with_original(mut self, variant: CompressionVariant) -> Self {
        self.original_variant = Some(variant);
        self
    }

    /// Parses encoding options into the descriptor
    pub fn from_raw(raw: RawColumn) -> Self {
        let mut descriptor = Self::new(raw.name, raw.ordinal);
        let Some(options) = raw.options else {
            return descriptor;
        };

        for option in &options {
            match option.split_once('=') {
                Some((key, value)) => {
                    descriptor.encoding_options.insert(
                        key.trim().to_lowercase(),
                        value.trim().to_lowercase(),
                    );
                }
                None => warn!(column = %descriptor.name, option = %option, "skipping malformed encoding option"),
            }
        }

        descriptor.original_variant = original_variant(&descriptor.name, &descriptor.encoding_options);
        descriptor
    }
}

/// Reads `compresstype` / `compresslevel`; a missing level means level 1
fn original_variant(column: &str, options: &BTreeMap<String, String>) -> Option<CompressionVariant> {
    let compression_type = match options.get("compresstype")?.parse::<CompressionType>() {
        Ok(ty) => ty,
        Err(e) => {
            debug!(column = %column, "current encoding not benchmarked: {}", e);
            return None;
        }
    };

    let level = match options.get("compresslevel") {
        Some(level) => match level.parse::<u8>() {
            Ok(level) => level,
            Err(_) => {
                warn!(column = %column, level = %level, "unparseable compresslevel");
                return None;
            }
        },
        None => 1,
    };

    let variant = CompressionVariant::new(compression_type, level);
    if !VariantCatalog::contains(&variant) {
        debug!(column = %column, variant = %variant, "current encoding is not one of the benchmarked levels");
    }
    Some(variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(options: Option<Vec<&str>>) -> RawColumn {
        RawColumn {
            name: "amount".to_string(),
            ordinal: 2,
            options: options.map(|o| o.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_no_options() {
        let column = ColumnDescriptor::from_raw(raw(None));
        assert_eq!(column.name, "amount");
        assert_eq!(column.ordinal, 2);
        assert_eq!(column.original_variant, None);
        assert!(column.encoding_options.is_empty());
    }

    #[test]
    fn test_options_are_normalized() {
        let column = ColumnDescriptor::from_raw(raw(Some(vec![
            "compresstype=ZSTD",
            "compresslevel=10",
            "blocksize=32768",
        ])));

        assert_eq!(
            column.original_variant,
            Some(CompressionVariant::new(CompressionType::Zstd, 10))
        );
        assert_eq!(column.encoding_options.get("compresstype").unwrap(), "zstd");
        assert_eq!(column.encoding_options.get("blocksize").unwrap(), "32768");
    }

    #[test]
    fn test_missing_level_defaults_to_one() {
        let column = ColumnDescriptor::from_raw(raw(Some(vec!["compresstype=zlib"])));
        assert_eq!(
            column.original_variant,
            Some(CompressionVariant::new(CompressionType::Zlib, 1))
        );
    }

    #[test]
    fn test_unbenchmarked_level_is_kept() {
        // zlib level 3 is valid on the server but never measured
        let column = ColumnDescriptor::from_raw(raw(Some(vec!["compresstype=zlib", "compresslevel=3"])));
        let variant = CompressionVariant::new(CompressionType::Zlib, 3);
        assert!(!VariantCatalog::contains(&variant));
        assert_eq!(column.original_variant, Some(variant));
    }

    #[test]
    fn test_unknown_type_and_malformed_options() {
        let column = ColumnDescriptor::from_raw(raw(Some(vec![
            "compresstype=quicklz",
            "compresslevel=1",
            "garbage",
        ])));
        assert_eq!(column.original_variant, None);
        assert_eq!(column.encoding_options.len(), 2);
    }

    #[test]
    fn test_bad_level() {
        let column = ColumnDescriptor::from_raw(raw(Some(vec![
            "compresstype=zlib",
            "compresslevel=high",
        ])));
        assert_eq!(column.original_variant, None);
    }
}
