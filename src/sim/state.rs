//! Ball lifecycle and body tagging
//!
//! Pure state types shared by the resolver and the session. Nothing here
//! steps physics; the session owns the engine and mutates these records
//! from its collision events.

use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
use serde::{Deserialize, Serialize};

/// Identifier for one dropped ball, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u64);

/// Lifecycle of a dropped ball
///
/// Transitions only move forward: `Falling -> Landed -> Removed`. A ball
/// never returns to `Falling`, which is what makes its payout fire exactly
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    /// In flight, owned by the physics engine
    Falling,
    /// Frozen in its bin, counting down to removal
    Landed { settle_steps: u32 },
    /// Body taken out of the world
    Removed,
}

/// A ball tracked by the session
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub id: BallId,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub state: BallState,
}

impl Ball {
    /// Whether the ball still has a body in the physics world
    pub fn in_world(&self) -> bool {
        !matches!(self.state, BallState::Removed)
    }
}

/// Role of a collider in the physics world
///
/// Packed into rapier's collider `user_data` so a collision event can be
/// classified from its two handles alone, without side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Ball(BallId),
    /// Bin body, carrying its index in the strip
    Bin(u32),
    Peg,
    Wall,
}

const TAG_BALL: u128 = 1;
const TAG_BIN: u128 = 2;
const TAG_PEG: u128 = 3;
const TAG_WALL: u128 = 4;

impl BodyTag {
    /// Pack into collider user data: discriminant above bit 64, payload in
    /// the low 64 bits. Zero stays reserved for untagged colliders.
    pub fn encode(self) -> u128 {
        match self {
            BodyTag::Ball(BallId(id)) => (TAG_BALL << 64) | id as u128,
            BodyTag::Bin(index) => (TAG_BIN << 64) | index as u128,
            BodyTag::Peg => TAG_PEG << 64,
            BodyTag::Wall => TAG_WALL << 64,
        }
    }

    /// Decode collider user data; `None` for anything this crate did not tag
    pub fn decode(data: u128) -> Option<BodyTag> {
        let payload = data as u64;
        match data >> 64 {
            TAG_BALL => Some(BodyTag::Ball(BallId(payload))),
            TAG_BIN => Some(BodyTag::Bin(payload as u32)),
            TAG_PEG => Some(BodyTag::Peg),
            TAG_WALL => Some(BodyTag::Wall),
            _ => None,
        }
    }
}

/// Resolved result of one ball's drop, emitted by `SimulationSession::step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub ball: BallId,
    /// Index of the bin the ball landed in, left to right
    pub bin: usize,
    /// Payout multiplier attached to that bin
    pub multiplier: f32,
}
