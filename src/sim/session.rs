//! Owned physics session
//!
//! One `SimulationSession` owns the whole rapier world for one board
//! configuration: the static stage (pegs, bin bodies, boundary slabs),
//! every in-flight ball, the collision event channel and the per-ball
//! settle countdowns. Reconfiguration tears everything down and rebuilds
//! before returning, so a caller never observes a half-built stage.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rapier2d::crossbeam::channel::{self, Receiver};
use rapier2d::prelude::*;

use super::resolver;
use super::spawn;
use super::state::{Ball, BallId, BallState, BodyTag, Outcome};
use crate::board::{Bin, Board, Peg};
use crate::config::BoardConfig;
use crate::consts::*;

/// Fixed-step physics world plus ball bookkeeping
///
/// Advance it with [`step`](Self::step) once per frame; landings come back
/// as [`Outcome`] values instead of callbacks, so the betting layer stays
/// decoupled from the physics tick.
pub struct SimulationSession {
    board: Board,
    balls: Vec<Ball>,
    next_ball: u64,
    rng: Pcg32,
    /// Steps a landed ball waits in its bin before removal
    settle_steps: u32,

    gravity: rapier2d::na::Vector2<f32>,
    integration: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    collision_events: Receiver<CollisionEvent>,
    _force_events: Receiver<ContactForceEvent>,
    event_handler: ChannelEventCollector,
}

impl SimulationSession {
    /// Build a session seeded from OS entropy
    pub fn new(config: BoardConfig) -> Self {
        Self::with_seed(config, rand::rng().random())
    }

    /// Build a session with an explicit spawn-RNG seed (reproducible drops)
    pub fn with_seed(config: BoardConfig, seed: u64) -> Self {
        let (collision_send, collision_recv) = channel::unbounded();
        let (force_send, force_recv) = channel::unbounded();

        let integration = IntegrationParameters::default();
        let settle_steps = (SETTLE_DELAY / integration.dt).round() as u32;

        let mut session = Self {
            board: Board::generate(config),
            balls: Vec::new(),
            next_ball: 1,
            rng: Pcg32::seed_from_u64(seed),
            settle_steps,
            gravity: vector![0.0, GRAVITY],
            integration,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            collision_events: collision_recv,
            _force_events: force_recv,
            event_handler: ChannelEventCollector::new(collision_send, force_send),
        };
        session.build_stage();
        session
    }

    /// Insert the static stage for the current board
    fn build_stage(&mut self) {
        let config = self.board.config;
        let (w, h) = (config.width, config.height);
        let half = WALL_THICKNESS / 2.0;

        // Boundary slabs centered just outside the edges: floor under the
        // bins plus both side walls
        let slabs = [
            (vector![w / 2.0, h + half], w / 2.0, half),
            (vector![-half, h / 2.0], half, h / 2.0),
            (vector![w + half, h / 2.0], half, h / 2.0),
        ];
        for (center, hx, hy) in slabs {
            let body = RigidBodyBuilder::fixed().translation(center).build();
            let handle = self.bodies.insert(body);
            let collider = ColliderBuilder::cuboid(hx, hy)
                .user_data(BodyTag::Wall.encode())
                .build();
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }

        for peg in &self.board.pegs {
            let body = RigidBodyBuilder::fixed()
                .translation(vector![peg.position.x, peg.position.y])
                .build();
            let handle = self.bodies.insert(body);
            let collider = ColliderBuilder::ball(peg.radius)
                .restitution(PEG_RESTITUTION)
                .friction(PEG_FRICTION)
                .user_data(BodyTag::Peg.encode())
                .build();
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }

        for bin in &self.board.bins {
            let center = bin.center();
            let body = RigidBodyBuilder::fixed()
                .translation(vector![center.x, center.y])
                .build();
            let handle = self.bodies.insert(body);
            let collider = ColliderBuilder::cuboid(bin.body_width() / 2.0, bin.height / 2.0)
                .user_data(BodyTag::Bin(bin.index as u32).encode())
                .build();
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }

        log::info!(
            "Built {}x{} board: {} rows, {} pegs, {} bins, risk {}",
            w,
            h,
            config.rows,
            self.board.pegs.len(),
            self.board.bins.len(),
            config.risk.as_str()
        );
    }

    /// Drop one ball for a bet; its outcome arrives from a later `step`
    pub fn drop_ball(&mut self) -> BallId {
        let id = BallId(self.next_ball);
        self.next_ball += 1;

        let pos = spawn::spawn_position(
            &mut self.rng,
            self.board.first_row(),
            self.board.config.width,
        );
        // CCD: near terminal speed a ball moves over twice a peg radius per
        // step, enough to tunnel a peg without it
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![pos.x, pos.y])
            .linvel(vector![0.0, 0.0])
            .ccd_enabled(true)
            .build();
        let body_handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(BALL_RADIUS)
            .restitution(BALL_RESTITUTION)
            .friction(BALL_FRICTION)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(BodyTag::Ball(id).encode())
            .build();
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        self.balls.push(Ball {
            id,
            body: body_handle,
            collider: collider_handle,
            state: BallState::Falling,
        });
        log::debug!("Ball {} dropped at x={:.1}", id.0, pos.x);
        id
    }

    /// Advance the world one fixed step and resolve any landings
    ///
    /// Returns at most one outcome per ball over the ball's whole life,
    /// in the order the engine reported the contacts.
    pub fn step(&mut self) -> Vec<Outcome> {
        self.pipeline.step(
            &self.gravity,
            &self.integration,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.event_handler,
        );

        let pairs = self.drain_event_pairs();
        let outcomes = self.apply_pairs(pairs);
        self.tick_settled();
        outcomes
    }

    /// Decode this step's collision-start events into tag pairs
    ///
    /// Events naming colliders this crate never tagged decode to `None`
    /// and are dropped.
    fn drain_event_pairs(&mut self) -> Vec<(BodyTag, BodyTag)> {
        self.collision_events
            .try_iter()
            .filter_map(|event| match event {
                CollisionEvent::Started(a, b, _) => {
                    let tag_a = BodyTag::decode(self.colliders.get(a)?.user_data)?;
                    let tag_b = BodyTag::decode(self.colliders.get(b)?.user_data)?;
                    Some((tag_a, tag_b))
                }
                CollisionEvent::Stopped(..) => None,
            })
            .collect()
    }

    /// Land balls named by terminal pairs and emit their outcomes
    fn apply_pairs(&mut self, pairs: Vec<(BodyTag, BodyTag)>) -> Vec<Outcome> {
        let landings = resolver::process_pairs(pairs, &mut self.balls, self.settle_steps);

        let mut outcomes = Vec::with_capacity(landings.len());
        for landing in landings {
            self.freeze_ball(landing.ball);
            // Bin tags are only ever built from generated bins
            let Some(bin) = self.board.bins.get(landing.bin) else {
                continue;
            };
            log::info!(
                "Ball {} landed in bin {} (x{})",
                landing.ball.0,
                bin.index,
                bin.multiplier
            );
            outcomes.push(Outcome {
                ball: landing.ball,
                bin: bin.index,
                multiplier: bin.multiplier,
            });
        }
        outcomes
    }

    /// Pin a landed ball in place so it cannot bounce back out of its bin
    fn freeze_ball(&mut self, id: BallId) {
        let Some(ball) = self.balls.iter().find(|ball| ball.id == id) else {
            return;
        };
        let Some(body) = self.bodies.get_mut(ball.body) else {
            return;
        };
        body.set_linvel(vector![0.0, 0.0], false);
        body.set_angvel(0.0, false);
        body.set_body_type(RigidBodyType::Fixed, true);
    }

    /// Count down landed balls and take the expired ones out of the world
    fn tick_settled(&mut self) {
        let mut expired = Vec::new();
        for ball in &mut self.balls {
            if let BallState::Landed { settle_steps } = &mut ball.state {
                if *settle_steps > 0 {
                    *settle_steps -= 1;
                } else {
                    expired.push(ball.id);
                }
            }
        }
        for id in expired {
            self.remove_ball(id);
        }
        self.balls.retain(|ball| ball.state != BallState::Removed);
    }

    /// Remove a ball's body and collider; a no-op if already gone
    fn remove_ball(&mut self, id: BallId) {
        let Some(ball) = self.balls.iter_mut().find(|ball| ball.id == id) else {
            return;
        };
        if ball.state == BallState::Removed {
            return;
        }
        let body = ball.body;
        ball.state = BallState::Removed;
        self.bodies.remove(
            body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        log::debug!("Ball {} removed after settling", id.0);
    }

    /// Tear the world down and rebuild it for a new configuration
    ///
    /// Synchronous: every peg, bin, wall and in-flight ball (along with its
    /// pending settle countdown) is gone before this returns. Outcomes for
    /// balls that never landed are never emitted. Ball ids keep counting
    /// up, so an id from before the rebuild can never alias a new ball.
    pub fn reconfigure(&mut self, config: BoardConfig) {
        log::info!(
            "Reconfiguring: {} rows, risk {}",
            config.rows,
            config.risk.as_str()
        );
        let seed = self.rng.random();
        let next_ball = self.next_ball;
        *self = Self::with_seed(config, seed);
        self.next_ball = next_ball;
    }

    /// The generated static geometry for the active configuration
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> BoardConfig {
        self.board.config
    }

    /// Peg geometry, for renderers
    pub fn pegs(&self) -> &[Peg] {
        &self.board.pegs
    }

    /// Bin strip with payout metadata, for renderers and bet display
    pub fn bins(&self) -> &[Bin] {
        &self.board.bins
    }

    /// Balls still tracked this step (falling or settling)
    pub fn balls_in_flight(&self) -> usize {
        self.balls.iter().filter(|ball| ball.in_world()).count()
    }

    /// Current position of a ball's body
    ///
    /// `None` once the ball is removed or after a reconfiguration; stale
    /// ids are not an error.
    pub fn ball_position(&self, id: BallId) -> Option<Vec2> {
        let ball = self.balls.iter().find(|ball| ball.id == id)?;
        let body = self.bodies.get(ball.body)?;
        let t = body.translation();
        Some(Vec2::new(t.x, t.y))
    }

    /// Lifecycle state of a ball; `None` for ids no longer tracked
    pub fn ball_state(&self, id: BallId) -> Option<BallState> {
        self.balls.iter().find(|ball| ball.id == id).map(|b| b.state)
    }

    /// Fixed timestep one `step` call advances, in seconds
    pub fn dt(&self) -> f32 {
        self.integration.dt
    }

    /// Steps a landed ball waits before removal
    pub fn settle_steps(&self) -> u32 {
        self.settle_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskTier;

    fn medium_config() -> BoardConfig {
        let _ = env_logger::builder().is_test(true).try_init();
        BoardConfig::new(8, RiskTier::Medium, 600.0, 800.0).unwrap()
    }

    fn stage_body_count(session: &SimulationSession) -> usize {
        session.board.pegs.len() + session.board.bins.len() + 3
    }

    #[test]
    fn test_stage_has_one_body_per_feature() {
        let session = SimulationSession::with_seed(medium_config(), 1);
        // 52 pegs + 9 bins + 3 boundary slabs
        assert_eq!(session.bodies.len(), 64);
        assert_eq!(session.colliders.len(), 64);
        assert_eq!(stage_body_count(&session), 64);
    }

    #[test]
    fn test_drop_adds_a_falling_ball() {
        let mut session = SimulationSession::with_seed(medium_config(), 2);
        let before = session.bodies.len();
        let id = session.drop_ball();

        assert_eq!(session.balls_in_flight(), 1);
        assert_eq!(session.bodies.len(), before + 1);
        assert_eq!(session.ball_state(id), Some(BallState::Falling));

        let pos = session.ball_position(id).unwrap();
        assert_eq!(pos.y, SPAWN_HEIGHT);
        let (min_x, max_x) = spawn::spawn_range(session.board.first_row(), 600.0);
        assert!(pos.x >= min_x && pos.x <= max_x);
    }

    #[test]
    fn test_same_seed_drops_at_the_same_spot() {
        let mut a = SimulationSession::with_seed(medium_config(), 7);
        let mut b = SimulationSession::with_seed(medium_config(), 7);
        for _ in 0..5 {
            let ia = a.drop_ball();
            let ib = b.drop_ball();
            assert_eq!(a.ball_position(ia), b.ball_position(ib));
        }
    }

    #[test]
    fn test_ball_falls_under_gravity() {
        let mut session = SimulationSession::with_seed(medium_config(), 3);
        let id = session.drop_ball();
        for _ in 0..60 {
            session.step();
        }
        // One second in: past the first peg rows, still above the floor,
        // still between the walls
        let pos = session.ball_position(id).unwrap();
        assert!(pos.y > 0.0, "ball did not fall: y={}", pos.y);
        assert!(pos.y < 800.0);
        assert!(pos.x > 0.0 && pos.x < 600.0);
    }

    #[test]
    fn test_synthetic_landing_pays_once() {
        let mut session = SimulationSession::with_seed(medium_config(), 4);
        let id = session.drop_ball();

        let pair = vec![(BodyTag::Ball(id), BodyTag::Bin(4))];
        let outcomes = session.apply_pairs(pair.clone());
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].ball, id);
        assert_eq!(outcomes[0].bin, 4);
        assert_eq!(outcomes[0].multiplier, 0.3);

        // Repeated contact reports pay nothing further
        assert!(session.apply_pairs(pair).is_empty());
        assert!(
            session
                .apply_pairs(vec![(BodyTag::Ball(id), BodyTag::Bin(5))])
                .is_empty()
        );
    }

    #[test]
    fn test_landed_ball_is_frozen() {
        let mut session = SimulationSession::with_seed(medium_config(), 5);
        let id = session.drop_ball();
        session.apply_pairs(vec![(BodyTag::Ball(id), BodyTag::Bin(0))]);

        let ball = session.balls.iter().find(|b| b.id == id).unwrap();
        assert!(session.bodies.get(ball.body).unwrap().is_fixed());
        assert!(matches!(
            session.ball_state(id),
            Some(BallState::Landed { .. })
        ));
    }

    #[test]
    fn test_settled_ball_is_removed_after_the_delay() {
        let mut session = SimulationSession::with_seed(medium_config(), 6);
        let stage = session.bodies.len();
        let id = session.drop_ball();
        session.apply_pairs(vec![(BodyTag::Ball(id), BodyTag::Bin(2))]);

        for _ in 0..=session.settle_steps() {
            session.step();
        }

        assert_eq!(session.balls_in_flight(), 0);
        assert_eq!(session.ball_position(id), None);
        assert_eq!(session.ball_state(id), None);
        assert_eq!(session.bodies.len(), stage);

        // Late contact reports for the dead id stay no-ops
        assert!(
            session
                .apply_pairs(vec![(BodyTag::Ball(id), BodyTag::Bin(2))])
                .is_empty()
        );
    }

    #[test]
    fn test_settle_delay_matches_half_a_second() {
        let session = SimulationSession::with_seed(medium_config(), 8);
        let delay = session.settle_steps() as f32 * session.dt();
        assert!((delay - SETTLE_DELAY).abs() < 1e-3);
    }

    #[test]
    fn test_outcome_multiplier_matches_the_bin_table() {
        let mut session = SimulationSession::with_seed(medium_config(), 9);
        let expected = [5.0, 2.0, 1.1, 0.5, 0.3, 0.5, 1.1, 2.0, 5.0];
        for (bin, want) in expected.iter().enumerate() {
            let id = session.drop_ball();
            let outcomes =
                session.apply_pairs(vec![(BodyTag::Bin(bin as u32), BodyTag::Ball(id))]);
            assert_eq!(outcomes[0].multiplier, *want, "bin {}", bin);
        }
    }

    #[test]
    fn test_non_terminal_pairs_pay_nothing() {
        let mut session = SimulationSession::with_seed(medium_config(), 10);
        let id = session.drop_ball();
        let pairs = vec![
            (BodyTag::Ball(id), BodyTag::Peg),
            (BodyTag::Ball(id), BodyTag::Wall),
            (BodyTag::Peg, BodyTag::Bin(1)),
        ];
        assert!(session.apply_pairs(pairs).is_empty());
        assert_eq!(session.ball_state(id), Some(BallState::Falling));
    }

    #[test]
    fn test_reconfigure_rebuilds_the_stage() {
        let mut session = SimulationSession::with_seed(medium_config(), 11);
        let a = session.drop_ball();
        let b = session.drop_ball();
        assert_eq!(session.balls_in_flight(), 2);

        let next = BoardConfig::new(10, RiskTier::High, 600.0, 800.0).unwrap();
        session.reconfigure(next);

        assert_eq!(session.balls_in_flight(), 0);
        assert_eq!(session.ball_position(a), None);
        assert_eq!(session.ball_position(b), None);
        assert_eq!(session.board().bins.len(), 11);
        assert_eq!(session.config().rows, 10);
        // 10 rows: 75 pegs + 11 bins + 3 slabs
        assert_eq!(session.bodies.len(), 89);

        // Drops keep working against the new stage, and ids never reuse
        // the torn-down balls' ids
        let c = session.drop_ball();
        assert_eq!(session.ball_state(c), Some(BallState::Falling));
        assert!(c > b && b > a);
    }

    #[test]
    fn test_two_balls_resolve_independently() {
        let mut session = SimulationSession::with_seed(medium_config(), 12);
        let a = session.drop_ball();
        let b = session.drop_ball();

        let outcomes = session.apply_pairs(vec![
            (BodyTag::Ball(a), BodyTag::Bin(0)),
            (BodyTag::Ball(b), BodyTag::Bin(8)),
        ]);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].multiplier, 5.0);
        assert_eq!(outcomes[1].multiplier, 5.0);
        assert_ne!(outcomes[0].ball, outcomes[1].ball);
    }
}
