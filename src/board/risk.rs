//! Risk tier payout tables
//!
//! Each tier carries a multiplier curve and a matching color ramp, authored
//! for the canonical 8-row board (9 bins). Curves are palindromes with the
//! cheap bins in the center and the jackpots at the edges, mirroring how
//! rarely a ball reaches the outer bins.
//!
//! Boards with other row counts map the table onto their bins through a
//! `MultiplierPolicy`. The shipped `CyclicPolicy` resamples modulo the
//! table length, which does not preserve the edge bias; callers wanting
//! authored curves per row count can substitute their own policy.

use crate::config::RiskTier;
use crate::consts::CANONICAL_ROWS;

/// Bin count the tier tables are authored for
pub const CANONICAL_BINS: usize = CANONICAL_ROWS as usize + 1;

/// One tier's payout curve, left to right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierTable {
    pub multipliers: &'static [f32],
    pub colors: &'static [&'static str],
}

const LOW: TierTable = TierTable {
    multipliers: &[1.5, 1.1, 1.0, 0.8, 0.5, 0.8, 1.0, 1.1, 1.5],
    colors: &[
        "#6495ED", "#7FDBFF", "#ADD8E6", "#B0E0E6", "#B0C4DE", "#B0E0E6", "#ADD8E6", "#7FDBFF",
        "#6495ED",
    ],
};

const MEDIUM: TierTable = TierTable {
    multipliers: &[5.0, 2.0, 1.1, 0.5, 0.3, 0.5, 1.1, 2.0, 5.0],
    colors: &[
        "#DE3163", "#FF7F50", "#FFBF00", "#CCCCFF", "#DDA0DD", "#CCCCFF", "#FFBF00", "#FF7F50",
        "#DE3163",
    ],
};

const HIGH: TierTable = TierTable {
    multipliers: &[26.0, 5.0, 1.5, 0.3, 0.1, 0.3, 1.5, 5.0, 26.0],
    colors: &[
        "#DC143C", "#FF4500", "#FF8C00", "#FFD700", "#FFE4B5", "#FFD700", "#FF8C00", "#FF4500",
        "#DC143C",
    ],
};

impl RiskTier {
    /// Canonical payout table for this tier
    pub fn table(&self) -> &'static TierTable {
        match self {
            RiskTier::Low => &LOW,
            RiskTier::Medium => &MEDIUM,
            RiskTier::High => &HIGH,
        }
    }
}

/// Maps a canonical tier table onto an arbitrary bin count
pub trait MultiplierPolicy {
    /// Multiplier and color for each bin, left to right; must return
    /// exactly `bin_count` entries
    fn assign(&self, table: &TierTable, bin_count: usize) -> Vec<(f32, &'static str)>;
}

/// Default policy: direct assignment when the bin count matches the table,
/// cyclic resampling (`i % len`) otherwise
///
/// The cyclic path flattens the authored curve (bin 9 of an 11-bin board
/// wraps back to the jackpot entry), so taking it is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CyclicPolicy;

impl MultiplierPolicy for CyclicPolicy {
    fn assign(&self, table: &TierTable, bin_count: usize) -> Vec<(f32, &'static str)> {
        let len = table.multipliers.len();
        debug_assert_eq!(len, table.colors.len());
        if bin_count != len {
            log::warn!(
                "payout table has {} entries for {} bins; resampling cyclically",
                len,
                bin_count
            );
        }
        (0..bin_count)
            .map(|i| (table.multipliers[i % len], table.colors[i % len]))
            .collect()
    }
}
