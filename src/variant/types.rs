/// Compression types supported by append-optimized column storage
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::error::AdvisorError;

/// Compression algorithm identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompressionType {
    /// No compression
    None,

    /// Run-length encoding; levels above 1 layer zlib over the runs
    RleType,

    /// zlib deflate
    Zlib,

    /// Zstandard
    Zstd,
}

impl CompressionType {
    /// All types in registry order
    pub const ALL: [CompressionType; 4] = [
        CompressionType::None,
        CompressionType::RleType,
        CompressionType::Zlib,
        CompressionType::Zstd,
    ];

    /// Returns the name used in storage options and DDL
    pub fn name(&self) -> &'static str {
        match self {
            CompressionType::None => "NONE",
            CompressionType::RleType => "RLE_TYPE",
            CompressionType::Zlib => "ZLIB",
            CompressionType::Zstd => "ZSTD",
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionType {
    type Err = AdvisorError;

    /// Case-insensitive, matching how catalog options are stored (`compresstype=zstd`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompressionType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AdvisorError::Catalog(format!("Unknown compression type: {}", s)))
    }
}

/// A candidate encoding: compression type plus level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressionVariant {
    #[serde(rename = "compresstype")]
    pub compression_type: CompressionType,
    #[serde(rename = "compresslevel")]
    pub level: u8,
}

impl CompressionVariant {
    pub fn new(compression_type: CompressionType, level: u8) -> Self {
        Self {
            compression_type,
            level,
        }
    }

    /// Key into the cost weight table, e.g. `ZLIB_5`
    pub fn weight_key(&self) -> String {
        format!("{}_{}", self.compression_type.name(), self.level)
    }
}

impl fmt::Display for CompressionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} level {}", self.compression_type, self.level)
    }
}
