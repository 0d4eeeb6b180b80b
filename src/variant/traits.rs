/// Cost model trait
///
/// Selection ranks near-equal candidates by an estimated decompression cost.
/// Any model implementing this trait can be plugged into the selection policy,
/// e.g. one fed by measured decompression latency instead of fixed weights.
use crate::variant::types::CompressionVariant;

/// Relative decompression cost of a variant; lower is cheaper to read
pub trait CostModel: Send + Sync {
    fn cost(&self, variant: &CompressionVariant) -> u32;

    /// Name used in logs
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> CostModel for F
where
    F: Fn(&CompressionVariant) -> u32 + Send + Sync,
{
    fn cost(&self, variant: &CompressionVariant) -> u32 {
        self(variant)
    }
}
