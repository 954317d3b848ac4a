//! Static board generation
//!
//! Pure functions from a validated configuration to geometry. Nothing here
//! touches the physics engine:
//! - Deterministic output for a given configuration
//! - Board-local pixel coordinates, y growing downward
//! - The session turns this geometry into fixed rapier bodies

pub mod bins;
pub mod layout;
pub mod risk;

pub use bins::{Bin, Board, generate_bins};
pub use layout::{Peg, first_row, generate_pegs, pegs_in_row, total_pegs};
pub use risk::{CANONICAL_BINS, CyclicPolicy, MultiplierPolicy, TierTable};
