//! Terminal collision resolution
//!
//! Turns the engine's collision-start reports into at most one landing per
//! ball. Works on decoded body tags only, so it can be exercised without a
//! live physics world.

use super::state::{Ball, BallId, BallState, BodyTag};

/// A landing detected in one step: which ball reached which bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub ball: BallId,
    pub bin: usize,
}

/// Classify one collision pair
///
/// Only ball-bin contact is terminal; peg bounces, wall hits and
/// ball-on-ball contact return `None`. Order of the pair does not matter,
/// the engine reports handles in arbitrary order.
pub fn resolve_pair(a: BodyTag, b: BodyTag) -> Option<Landing> {
    match (a, b) {
        (BodyTag::Ball(ball), BodyTag::Bin(bin)) | (BodyTag::Bin(bin), BodyTag::Ball(ball)) => {
            Some(Landing {
                ball,
                bin: bin as usize,
            })
        }
        _ => None,
    }
}

/// Apply one step's collision pairs to the ball table
///
/// The first pair naming a `Falling` ball wins and moves it to `Landed`;
/// later pairs naming the same ball, in this batch or any later one, are
/// no-ops. Pairs naming a ball the table no longer tracks (removed, or
/// torn down by a reconfiguration) are silently dropped.
pub fn process_pairs(
    pairs: impl IntoIterator<Item = (BodyTag, BodyTag)>,
    balls: &mut [Ball],
    settle_steps: u32,
) -> Vec<Landing> {
    let mut landings = Vec::new();
    for (a, b) in pairs {
        let Some(landing) = resolve_pair(a, b) else {
            continue;
        };
        let Some(ball) = balls.iter_mut().find(|ball| ball.id == landing.ball) else {
            continue;
        };
        if ball.state != BallState::Falling {
            continue;
        }
        ball.state = BallState::Landed { settle_steps };
        landings.push(landing);
    }
    landings
}
