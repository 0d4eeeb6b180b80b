/// Compression variants for append-optimized column tables
///
/// A variant is a (compression type, level) pair that can be applied to a
/// column-oriented table. This module owns the fixed registry of variants the
/// benchmark tries, and the decompression-cost weights used to break near-ties
/// in measured size.
///
/// ## Registry:
///
/// - **NONE**: level 1
/// - **RLE_TYPE**: levels 1-4 (run-length, levels 2-4 add zlib on top)
/// - **ZLIB**: levels 1, 5, 9
/// - **ZSTD**: levels 1, 10, 19
///
/// ## Usage Example:
///
/// ```ignore
/// use aoco_advisor::variant::*;
///
/// for variant in VariantCatalog::all_variants() {
///     println!("{} -> weight {}", variant, VariantCatalog::cost_weight(&variant));
/// }
/// ```

pub mod catalog;
pub mod traits;
pub mod types;

pub use catalog::VariantCatalog;
pub use traits::CostModel;
pub use types::{CompressionType, CompressionVariant};
