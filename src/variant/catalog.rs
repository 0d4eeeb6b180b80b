/// Variant registry and decompression-cost weights
///
/// The weights are a hand-tuned ranking, not measured CPU cost. RLE tiers
/// combine a base run-length cost with the cost of the zlib level layered on
/// top of it.
use crate::common::constants::DEFAULT_COST_WEIGHT;
use crate::variant::traits::CostModel;
use crate::variant::types::{CompressionType, CompressionVariant};

const ZLIB_1: u32 = 2;
const ZLIB_5: u32 = 3;
const ZLIB_9: u32 = 4;

const RLE_TYPE_1: u32 = 3;
const RLE_TYPE_2: u32 = RLE_TYPE_1 + ZLIB_1;
const RLE_TYPE_3: u32 = RLE_TYPE_1 + ZLIB_5;
const RLE_TYPE_4: u32 = RLE_TYPE_1 + ZLIB_9;

/// Weight table keyed by `{type}_{level}`
const WEIGHTS: &[(&str, u32)] = &[
    ("ZLIB_1", ZLIB_1),
    ("ZLIB_5", ZLIB_5),
    ("ZLIB_9", ZLIB_9),
    ("RLE_TYPE_1", RLE_TYPE_1),
    ("RLE_TYPE_2", RLE_TYPE_2),
    ("RLE_TYPE_3", RLE_TYPE_3),
    ("RLE_TYPE_4", RLE_TYPE_4),
];

/// Static registry of compression variants under test
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantCatalog;

impl VariantCatalog {
    /// Allowed levels for a compression type, ascending
    pub fn variants_for(compression_type: CompressionType) -> &'static [u8] {
        match compression_type {
            CompressionType::None => &[1],
            CompressionType::RleType => &[1, 2, 3, 4],
            CompressionType::Zlib => &[1, 5, 9],
            CompressionType::Zstd => &[1, 10, 19],
        }
    }

    /// Every variant in benchmark order: NONE, RLE_TYPE, ZLIB, ZSTD, each by ascending level
    pub fn all_variants() -> Vec<CompressionVariant> {
        CompressionType::ALL
            .iter()
            .flat_map(|&ty| {
                Self::variants_for(ty)
                    .iter()
                    .map(move |&level| CompressionVariant::new(ty, level))
            })
            .collect()
    }

    /// Whether the registry contains this exact (type, level)
    pub fn contains(variant: &CompressionVariant) -> bool {
        Self::variants_for(variant.compression_type).contains(&variant.level)
    }

    /// Relative decompression cost; unknown combinations fall back to the default weight
    pub fn cost_weight(variant: &CompressionVariant) -> u32 {
        let key = variant.weight_key();
        WEIGHTS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, weight)| *weight)
            .unwrap_or(DEFAULT_COST_WEIGHT)
    }
}

impl CostModel for VariantCatalog {
    fn cost(&self, variant: &CompressionVariant) -> u32 {
        Self::cost_weight(variant)
    }

    fn name(&self) -> &'static str {
        "weight-table"
    }
}
