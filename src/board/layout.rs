//! Peg lattice generation
//!
//! Row r (counting from the top) holds r + 3 pegs: 3 across the first row,
//! rows + 2 across the last. All rows share one horizontal pitch sized for
//! the widest row and every row is centered, which yields the classic
//! triangle with a half-pitch stagger between neighboring rows.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LATTICE_HEIGHT_FRAC, LATTICE_TOP_FRAC, MAX_ROWS, MIN_ROWS, PEG_RADIUS};

/// A static lattice peg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub position: Vec2,
    pub radius: f32,
}

/// Pegs in row `row`, counting from the top
#[inline]
pub fn pegs_in_row(row: u32) -> u32 {
    row + 3
}

/// Total pegs a `rows`-row lattice holds
#[inline]
pub fn total_pegs(rows: u32) -> usize {
    // sum of (r + 3) for r in 0..rows
    (rows * (rows + 5) / 2) as usize
}

/// Generate the lattice for a validated configuration
///
/// Pegs come out top row first, each row left to right. The lattice spans
/// the middle band of the board: first row at 15% of the height, last row
/// at the bottom of a 70% tall slab, leaving room for the bin strip.
pub fn generate_pegs(rows: u32, width: f32, height: f32) -> Vec<Peg> {
    debug_assert!((MIN_ROWS..=MAX_ROWS).contains(&rows));

    let spacing = width / (rows + 3) as f32;
    let vertical = height * LATTICE_HEIGHT_FRAC / rows as f32;
    let top = height * LATTICE_TOP_FRAC;

    let mut pegs = Vec::with_capacity(total_pegs(rows));
    for row in 0..rows {
        let count = pegs_in_row(row);
        let y = top + row as f32 * vertical;
        let start_x = (width - (count - 1) as f32 * spacing) / 2.0;
        for i in 0..count {
            pegs.push(Peg {
                position: Vec2::new(start_x + i as f32 * spacing, y),
                radius: PEG_RADIUS,
            });
        }
    }
    pegs
}

/// The top row's pegs, the anchors the spawn window is derived from
pub fn first_row(pegs: &[Peg]) -> &[Peg] {
    &pegs[..pegs.len().min(3)]
}
