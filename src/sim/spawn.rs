//! Ball spawn policy
//!
//! Balls enter above the board inside a horizontal window derived from the
//! top peg row: a little beyond the outer two of its three pegs, clamped
//! away from the walls. Keeping the window over the first row guarantees
//! the ball meets the lattice instead of falling straight through a gap.

use glam::Vec2;
use rand::Rng;

use crate::board::Peg;
use crate::consts::{BALL_RADIUS, PEG_RADIUS, SPAWN_HEIGHT};

/// Horizontal spawn window `(min_x, max_x)` for a board
///
/// A degenerate first row never comes out of a validated board, but the
/// window stays sensible anyway: with fewer than three pegs it widens
/// around whatever pegs exist, with none it falls back to the middle fifth
/// of the board.
pub fn spawn_range(first_row: &[Peg], width: f32) -> (f32, f32) {
    let (min_x, max_x) = match first_row {
        [first, _, third, ..] => (
            first.position.x - PEG_RADIUS * 2.0,
            third.position.x + PEG_RADIUS * 2.0,
        ),
        [first, .., last] => (
            first.position.x - PEG_RADIUS * 4.0,
            last.position.x + PEG_RADIUS * 4.0,
        ),
        [only] => (
            only.position.x - PEG_RADIUS * 4.0,
            only.position.x + PEG_RADIUS * 4.0,
        ),
        [] => (width * 0.4, width * 0.6),
    };
    // Keep a full ball diameter clear of each wall
    (min_x.max(BALL_RADIUS * 2.0), max_x.min(width - BALL_RADIUS * 2.0))
}

/// Pick a spawn position: uniform x inside the window, above the board
pub fn spawn_position<R: Rng + ?Sized>(rng: &mut R, first_row: &[Peg], width: f32) -> Vec2 {
    let (min_x, max_x) = spawn_range(first_row, width);
    let x = if max_x > min_x {
        rng.random_range(min_x..=max_x)
    } else {
        // Clamps crossed on a toy-sized board; collapse to the midpoint
        0.5 * (min_x + max_x)
    };
    Vec2::new(x, SPAWN_HEIGHT)
}
