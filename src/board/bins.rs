//! Payout bin strip
//!
//! The bottom 10% of the board is divided into rows + 1 equal slots. Each
//! slot owns a physical bin body slightly narrower than the slot (95%),
//! leaving a small visual gap between neighbors. The gap is a few pixels,
//! well under the ball diameter, so balls cannot slip between bins.

use glam::Vec2;
use serde::Serialize;

use super::layout::{self, Peg};
use super::risk::{CyclicPolicy, MultiplierPolicy};
use crate::config::{BoardConfig, RiskTier};
use crate::consts::{BIN_BODY_FRAC, BIN_HEIGHT_FRAC};

/// One payout bin
///
/// `x_min..x_max` is the full slot; the collider body is `body_width()`
/// wide, centered in the slot. Colors are static UI tokens, so this type
/// serializes but is never parsed back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    /// Position in the strip, left to right
    pub index: usize,
    pub x_min: f32,
    pub x_max: f32,
    /// Center height of the bin body
    pub y: f32,
    pub height: f32,
    /// Payout multiplier applied to the bet
    pub multiplier: f32,
    /// Render color for the front end
    pub color: &'static str,
}

impl Bin {
    /// Full slot width
    #[inline]
    pub fn slot_width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Width of the physical bin body
    #[inline]
    pub fn body_width(&self) -> f32 {
        self.slot_width() * BIN_BODY_FRAC
    }

    /// Center of the bin body
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.x_min + self.x_max) / 2.0, self.y)
    }

    /// Whether an x coordinate falls inside this slot
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x_min && x < self.x_max
    }
}

/// Generate the bin strip for a board, left to right
///
/// Slots tile `[0, width]` exactly. Multipliers and colors come from the
/// tier table through `policy`.
pub fn generate_bins(
    rows: u32,
    risk: RiskTier,
    width: f32,
    height: f32,
    policy: &dyn MultiplierPolicy,
) -> Vec<Bin> {
    let count = rows as usize + 1;
    let slot = width / count as f32;
    let bin_height = height * BIN_HEIGHT_FRAC;
    let y = height - bin_height / 2.0;

    let payout = policy.assign(risk.table(), count);
    debug_assert_eq!(payout.len(), count);

    payout
        .into_iter()
        .enumerate()
        .map(|(index, (multiplier, color))| Bin {
            index,
            x_min: index as f32 * slot,
            x_max: (index + 1) as f32 * slot,
            y,
            height: bin_height,
            multiplier,
            color,
        })
        .collect()
}

/// Generated static geometry for one configuration
///
/// Pure data: the session turns this into fixed physics bodies, a front
/// end draws it directly.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub config: BoardConfig,
    pub pegs: Vec<Peg>,
    pub bins: Vec<Bin>,
}

impl Board {
    /// Generate pegs and bins with the default multiplier policy
    pub fn generate(config: BoardConfig) -> Self {
        Self::generate_with(config, &CyclicPolicy)
    }

    /// Generate with a substituted multiplier policy
    pub fn generate_with(config: BoardConfig, policy: &dyn MultiplierPolicy) -> Self {
        let pegs = layout::generate_pegs(config.rows, config.width, config.height);
        let bins = generate_bins(config.rows, config.risk, config.width, config.height, policy);
        Self { config, pegs, bins }
    }

    /// The top row's pegs (spawn anchors)
    pub fn first_row(&self) -> &[Peg] {
        layout::first_row(&self.pegs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_RADIUS;

    fn medium_board(rows: u32) -> Board {
        let config = BoardConfig::new(rows, RiskTier::Medium, 600.0, 800.0).unwrap();
        Board::generate(config)
    }

    #[test]
    fn test_eight_rows_make_nine_bins() {
        let board = medium_board(8);
        assert_eq!(board.bins.len(), 9);
        let expected = [5.0, 2.0, 1.1, 0.5, 0.3, 0.5, 1.1, 2.0, 5.0];
        for (bin, want) in board.bins.iter().zip(expected) {
            assert_eq!(bin.multiplier, want);
        }
    }

    #[test]
    fn test_slots_tile_the_full_width() {
        for rows in 8..=16 {
            let board = medium_board(rows);
            assert_eq!(board.bins.len(), rows as usize + 1);
            assert_eq!(board.bins[0].x_min, 0.0);
            let last = board.bins.last().unwrap();
            assert!((last.x_max - 600.0).abs() < 1e-3);
            // No gap and no overlap between neighboring slots
            for pair in board.bins.windows(2) {
                assert_eq!(pair[0].x_max, pair[1].x_min);
            }
        }
    }

    #[test]
    fn test_bin_bodies_sit_in_the_bottom_strip() {
        let board = medium_board(8);
        for bin in &board.bins {
            assert!((bin.height - 80.0).abs() < 1e-3);
            assert!((bin.y - 760.0).abs() < 1e-3);
            assert!((bin.body_width() - bin.slot_width() * 0.95).abs() < 1e-3);
        }
    }

    #[test]
    fn test_gap_between_bins_is_narrower_than_a_ball() {
        // A ball must never fit through the visual gap between bin bodies
        for rows in 8..=16 {
            let board = medium_board(rows);
            let bin = &board.bins[0];
            let gap = bin.slot_width() - bin.body_width();
            assert!(
                gap < 2.0 * BALL_RADIUS,
                "rows={} gap {} exceeds ball diameter",
                rows,
                gap
            );
        }
    }

    #[test]
    fn test_ten_rows_resample_the_table_cyclically() {
        let board = medium_board(10);
        assert_eq!(board.bins.len(), 11);
        // Both outer bins land on the jackpot entry; bin 10 wraps to entry 1
        assert_eq!(board.bins[0].multiplier, 5.0);
        assert_eq!(board.bins[9].multiplier, 5.0);
        assert_eq!(board.bins[10].multiplier, 2.0);
    }

    #[test]
    fn test_contains_x_covers_slots_without_overlap() {
        let board = medium_board(8);
        for x in [0.0, 33.0, 299.9, 300.0, 599.0] {
            let owners = board.bins.iter().filter(|b| b.contains_x(x)).count();
            assert_eq!(owners, 1, "x={} owned by {} bins", x, owners);
        }
    }

    #[test]
    fn test_board_generation_is_deterministic() {
        let config = BoardConfig::new(12, RiskTier::High, 640.0, 900.0).unwrap();
        let a = Board::generate(config);
        let b = Board::generate(config);
        assert_eq!(a.pegs, b.pegs);
        assert_eq!(a.bins, b.bins);
    }

    #[test]
    fn test_lattice_clears_the_bin_strip() {
        for rows in 8..=16 {
            let board = medium_board(rows);
            let lowest_peg = board
                .pegs
                .iter()
                .map(|p| p.position.y)
                .fold(f32::MIN, f32::max);
            let bin_top = board.bins[0].y - board.bins[0].height / 2.0;
            assert!(
                lowest_peg + 2.0 * BALL_RADIUS < bin_top,
                "rows={} lowest peg {} too close to bins at {}",
                rows,
                lowest_peg,
                bin_top
            );
        }
    }
}
