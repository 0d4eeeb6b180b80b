//! Cost-aware encoding selection
//!
//! The smallest measured variant is not always the best pick: heavy RLE/zlib
//! levels often save a few percent of space for a lot more CPU on every read.
//! Alternatives whose size is within the tradeoff threshold of the smallest
//! ("competitors") are ranked by decompression cost and the cheapest one wins.
//! Every competitor is compared against the single smallest result, never
//! against each other.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::bench::BenchmarkResult;
use crate::variant::{CompressionVariant, CostModel, VariantCatalog};

/// Chosen encoding for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOutcome {
    pub column_name: String,
    pub chosen_variant: BenchmarkResult,
    /// Row matching the column's current encoding, for display only
    pub current_marker: Option<BenchmarkResult>,
    /// Smallest measured result
    pub best: BenchmarkResult,
}

/// Picks one variant per column from its measured results
#[derive(Clone)]
pub struct SelectionPolicy {
    threshold_percent: u8,
    cost_model: Arc<dyn CostModel>,
}

impl fmt::Debug for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionPolicy")
            .field("threshold_percent", &self.threshold_percent)
            .field("cost_model", &self.cost_model.name())
            .finish()
    }
}

impl SelectionPolicy {
    /// Policy using the fixed weight table
    pub fn new(threshold_percent: u8) -> Self {
        Self::with_cost_model(threshold_percent, Arc::new(VariantCatalog))
    }

    pub fn with_cost_model(threshold_percent: u8, cost_model: Arc<dyn CostModel>) -> Self {
        Self {
            threshold_percent,
            cost_model,
        }
    }

    pub fn threshold_percent(&self) -> u8 {
        self.threshold_percent
    }

    /// Results other than the smallest that are within the threshold, ascending by size
    pub fn competitors<'a>(&self, results: &'a [BenchmarkResult]) -> Vec<&'a BenchmarkResult> {
        let sorted = sorted_by_size(results);
        let Some((best, rest)) = sorted.split_first() else {
            return Vec::new();
        };

        rest.iter()
            .copied()
            .filter(|candidate| size_ratio(best.size_bytes, candidate.size_bytes) >= self.threshold_percent as f64)
            .collect()
    }

    /// Selects the winning result; None when nothing was measured
    pub fn select(
        &self,
        results: &[BenchmarkResult],
        original_variant: Option<&CompressionVariant>,
    ) -> Option<SelectionOutcome> {
        let best = *sorted_by_size(results).first()?;

        let mut competitors = self.competitors(results);
        // stable: equal weights keep ascending size
        competitors.sort_by_key(|candidate| self.cost_model.cost(&candidate.variant));
        let chosen = competitors.first().copied().unwrap_or(best);

        Some(SelectionOutcome {
            column_name: best.column_name.clone(),
            chosen_variant: chosen.clone(),
            current_marker: current_marker(results, original_variant).cloned(),
            best: best.clone(),
        })
    }
}

/// Result measured under the column's current encoding, if it was benchmarked
pub fn current_marker<'a>(
    results: &'a [BenchmarkResult],
    original_variant: Option<&CompressionVariant>,
) -> Option<&'a BenchmarkResult> {
    let original = original_variant?;
    results.iter().find(|result| result.variant == *original)
}

/// Stable ascending sort; equal sizes keep registry order
fn sorted_by_size(results: &[BenchmarkResult]) -> Vec<&BenchmarkResult> {
    let mut sorted: Vec<&BenchmarkResult> = results.iter().collect();
    sorted.sort_by_key(|result| result.size_bytes);
    sorted
}

/// `100 * best / candidate`; two empty tables are equally good
fn size_ratio(best: u64, candidate: u64) -> f64 {
    if candidate == 0 {
        100.0
    } else {
        100.0 * best as f64 / candidate as f64
    }
}
