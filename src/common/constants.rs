//! Constants used throughout the advisor

/// Default number of source rows copied into each sample table
pub const DEFAULT_SAMPLE_ROW_LIMIT: u64 = 10_000_000;

/// Default number of column benchmarks running at once
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Default tradeoff threshold, in percent of the smallest measured size
pub const DEFAULT_TRADEOFF_THRESHOLD: u8 = 90;

/// Accepted tradeoff threshold range (inclusive)
pub const MIN_TRADEOFF_THRESHOLD: u8 = 1;
pub const MAX_TRADEOFF_THRESHOLD: u8 = 99;

/// Weight used for variants missing from the cost table
pub const DEFAULT_COST_WEIGHT: u32 = 5;

/// Prefix of every ephemeral sample table
pub const SAMPLE_TABLE_PREFIX: &str = "compression_test";

/// Identifier length limit (NAMEDATALEN - 1)
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Suffix of the shadow table created by the rebuild script
pub const SHADOW_TABLE_SUFFIX: &str = "_new_type";

/// Suffix the original table is renamed to by the rebuild script
pub const RETIRED_TABLE_SUFFIX: &str = "_old";

/// Marker printed next to the row matching the column's current encoding
pub const CURRENT_MARKER: &str = "<<<";

/// Default connection settings
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_USER: &str = "gpadmin";
pub const DEFAULT_DATABASE: &str = "adb";
