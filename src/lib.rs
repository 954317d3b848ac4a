//! Plinko simulation core
//!
//! A ball drops through a triangular peg lattice and lands in one of a row
//! of payout bins. Gravity, bounces and contact detection are delegated to
//! rapier2d; this crate generates the static stage, spawns balls and turns
//! the engine's collision events into bet outcomes.
//!
//! Core modules:
//! - `config`: validated board configuration (rows, risk tier, dimensions)
//! - `board`: pure geometry generators (peg lattice, bin strip, payouts)
//! - `sim`: owned physics session, ball lifecycle, collision resolution

pub mod board;
pub mod config;
pub mod sim;

pub use board::{Bin, Board, Peg};
pub use config::{BoardConfig, ConfigError, RiskTier};
pub use sim::{BallId, Outcome, SimulationSession};

/// Game configuration constants
pub mod consts {
    /// Fewest peg rows a board may have
    pub const MIN_ROWS: u32 = 8;
    /// Most peg rows a board may have
    pub const MAX_ROWS: u32 = 16;
    /// Row count the shipped payout tables are authored for
    pub const CANONICAL_ROWS: u32 = 8;

    /// Peg defaults
    pub const PEG_RADIUS: f32 = 5.0;
    pub const PEG_RESTITUTION: f32 = 0.5;
    pub const PEG_FRICTION: f32 = 0.1;

    /// Ball defaults - slightly larger than a peg so it cannot wedge
    /// between lattice neighbors
    pub const BALL_RADIUS: f32 = 7.0;
    pub const BALL_RESTITUTION: f32 = 0.5;
    pub const BALL_FRICTION: f32 = 0.05;

    /// Downward gravity (pixels/s^2)
    pub const GRAVITY: f32 = 800.0;
    /// Spawn height above the board top edge (board space grows downward)
    pub const SPAWN_HEIGHT: f32 = -20.0;

    /// Seconds a landed ball stays visible in its bin before removal
    pub const SETTLE_DELAY: f32 = 0.5;

    /// Boundary slab thickness outside the board edges
    pub const WALL_THICKNESS: f32 = 50.0;

    /// Fraction of board height the peg lattice spans
    pub const LATTICE_HEIGHT_FRAC: f32 = 0.7;
    /// Fraction of board height above the first peg row
    pub const LATTICE_TOP_FRAC: f32 = 0.15;
    /// Fraction of board height the bin strip occupies
    pub const BIN_HEIGHT_FRAC: f32 = 0.1;
    /// Fraction of a bin slot filled by its physical body
    pub const BIN_BODY_FRAC: f32 = 0.95;
}
