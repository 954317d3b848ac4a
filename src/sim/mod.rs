//! Runtime simulation module
//!
//! The session owns the physics engine and is the only place that talks to
//! it; everything else stays engine-free:
//! - `spawn`: pure drop-position policy over the board's first peg row
//! - `resolver`: collision pairs to at-most-one landing per ball
//! - `state`: ball lifecycle records and collider tagging
//! - `session`: the rapier world, stepped at a fixed timestep

pub mod resolver;
pub mod session;
pub mod spawn;
pub mod state;

pub use resolver::{Landing, process_pairs, resolve_pair};
pub use session::SimulationSession;
pub use spawn::{spawn_position, spawn_range};
pub use state::{Ball, BallId, BallState, BodyTag, Outcome};
