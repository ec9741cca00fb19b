/// The simulation engine: state machine, physics tick, spawning, collision
/// resolution, and the cue/event stream the audio glue consumes.
///
/// All randomness comes through an injected `Rng` handle so callers control
/// determinism (seeded RNGs in tests).  No I/O happens here; rendering reads
/// the accessors and audio drains the cue queue once per frame.

use std::time::Duration;

use rand::Rng;

use crate::config::{GameConfig, MAX_FRAME_DELTA};
use crate::entities::{Bird, Obstacle, ObstacleKind, Phase};
use crate::fade::{FadeController, FadeDirection, FadeMode, FadeTarget};
use crate::resources::{ImageKey, ResourceBundle};
use crate::scheduler::{Scheduler, TimerId};

/// Fire-and-forget audio triggers, drained by the caller each frame.
///
/// `Hit` and `Victory` are part of the loaded cue set but the engine never
/// emits them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Wing,
    Point,
    Hit,
    Die,
    Swoosh,
    Victory,
    BgNormalOn,
    BgNormalOff,
    BgInvertedOn,
    BgInvertedOff,
}

pub struct GameSimulation {
    config: GameConfig,
    phase: Phase,
    bird: Bird,
    obstacles: Vec<Obstacle>,
    spawn_counter: u32,
    score: f64,
    best_score: f64,
    gravity_inverted: bool,
    gravity: f64,
    velocity: f64,
    displacement: f64,
    scheduler: Scheduler,
    fades: FadeController,
    cues: Vec<Cue>,
}

impl GameSimulation {
    /// Build a fresh simulation in the `Open` phase.  Requires a loaded
    /// resource bundle: construction is gated on every handle resolving.
    pub fn new(config: GameConfig, _resources: &ResourceBundle) -> Self {
        let bird = Bird::new(
            config.bird_start_x,
            config.bird_start_y,
            config.bird_width,
            config.bird_height,
            vec![ImageKey::BirdA, ImageKey::BirdB, ImageKey::BirdC],
        );
        let fades = FadeController::new(config.fade_step, config.fade_interval);
        Self {
            gravity: config.gravity_accel,
            velocity: 0.0,
            displacement: config.flap_displacement,
            config,
            phase: Phase::Open,
            bird,
            obstacles: Vec::new(),
            spawn_counter: 0,
            score: 0.0,
            best_score: 0.0,
            gravity_inverted: false,
            scheduler: Scheduler::new(),
            fades,
            cues: Vec::new(),
        }
    }

    // ── Frame driver ─────────────────────────────────────────────────────────

    /// Advance the simulation by one frame's worth of wall time.  Fades run
    /// at their own cadence; the physics/spawn/animation timers only fire
    /// while armed (i.e. in `Playing`).
    pub fn frame(&mut self, dt: Duration, rng: &mut impl Rng) {
        let dt = if dt > MAX_FRAME_DELTA {
            log::warn!(
                "frame took {}ms, clamping to {}ms",
                dt.as_millis(),
                MAX_FRAME_DELTA.as_millis()
            );
            MAX_FRAME_DELTA
        } else {
            dt
        };

        self.fades.advance(dt);

        if self.phase == Phase::Open {
            // Tutorial pulse: re-arm a one-shot fade away from whichever
            // bound the opacity last reached.  Idempotent start makes this
            // a ping-pong.
            if self.fades.opacity(FadeTarget::GameTute) < 1.0 {
                self.fades
                    .start(FadeTarget::GameTute, FadeDirection::In, FadeMode::OneShot);
            } else {
                self.fades
                    .start(FadeTarget::GameTute, FadeDirection::Out, FadeMode::OneShot);
            }
        }

        for fire in self.scheduler.advance(dt) {
            // A fire earlier in this frame may have ended the session;
            // anything still queued is stale and dropped.
            if self.phase != Phase::Playing {
                break;
            }
            match fire {
                TimerId::Physics => self.step_world(),
                TimerId::Spawn => self.spawn_pipes(rng),
                TimerId::BirdAnim => self.bird.next_frame(),
            }
        }
    }

    /// The single abstract input action: start, flap, or restart depending
    /// on the current phase.
    pub fn activate(&mut self) {
        match self.phase {
            Phase::Open => self.start_game(),
            Phase::Playing => self.flap(),
            Phase::Over => self.reset_game(),
        }
    }

    /// Drain the cues emitted since the last call.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    fn start_game(&mut self) {
        log::info!("game start");
        self.phase = Phase::Playing;
        self.fades.stop(FadeTarget::GameTute, Some(1.0));
        self.fades
            .start(FadeTarget::GameTute, FadeDirection::Out, FadeMode::OneShot);
        self.arm_timers();
        self.emit(Cue::BgNormalOn);
        self.emit(Cue::BgInvertedOff);
    }

    fn reset_game(&mut self) {
        log::info!("game reset");
        self.scheduler.cancel_all();
        self.fades.stop(FadeTarget::GameOver, Some(0.0));
        self.fades.stop(FadeTarget::GameTute, Some(1.0));

        self.gravity = self.config.gravity_accel;
        self.velocity = 0.0;
        self.displacement = self.config.flap_displacement;
        self.obstacles.clear();
        self.spawn_counter = 0;
        self.score = 0.0;
        self.gravity_inverted = false;
        self.bird
            .reset(self.config.bird_start_x, self.config.bird_start_y);

        self.phase = Phase::Playing;
        self.fades
            .start(FadeTarget::GameTute, FadeDirection::Out, FadeMode::OneShot);
        self.arm_timers();
        self.emit(Cue::BgNormalOn);
        self.emit(Cue::BgInvertedOff);
    }

    fn flap(&mut self) {
        self.emit(Cue::Wing);
        self.velocity = self.displacement;
    }

    fn game_over(&mut self) {
        log::info!("game over, score {}", self.score.floor());
        self.phase = Phase::Over;
        self.emit(Cue::Die);
        // Cancel before anything else so no stale tick can follow.
        self.scheduler.cancel_all();

        if self.score > self.best_score {
            self.best_score = self.score;
        }

        self.fades.stop(FadeTarget::GameOver, Some(0.0));
        self.fades
            .start(FadeTarget::GameOver, FadeDirection::In, FadeMode::Oscillate);
    }

    fn arm_timers(&mut self) {
        self.scheduler.arm(TimerId::Physics, self.config.tick_period);
        self.scheduler.arm(TimerId::Spawn, self.config.spawn_period);
        self.scheduler
            .arm(TimerId::BirdAnim, self.config.bird_anim_period);
    }

    // ── Physics tick ─────────────────────────────────────────────────────────

    /// One physics tick: bounds check, integrate, scroll, score, collide,
    /// prune.  A tick outside `Playing` is a no-op.
    pub fn step_world(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }

        if self.bird.is_out_of_bounds(self.config.board_height) {
            self.game_over();
            return;
        }

        self.velocity += self.gravity;
        self.bird.apply_velocity(self.velocity);

        for obstacle in &mut self.obstacles {
            obstacle.shift(self.config.scroll_speed);
        }

        for i in 0..self.obstacles.len() {
            match self.obstacles[i].kind {
                ObstacleKind::Pipe => {
                    if !self.obstacles[i].is_passed() && self.bird.has_passed(&self.obstacles[i]) {
                        self.obstacles[i].mark_passed();
                        self.score += 0.5;
                        self.emit(Cue::Point);
                    }
                    if self.bird.collides_with(&self.obstacles[i]) {
                        // Abort the tick: nothing after this pipe runs.
                        self.game_over();
                        return;
                    }
                }
                ObstacleKind::GravityInverter => {
                    if !self.obstacles[i].is_passed() && self.bird.collides_with(&self.obstacles[i])
                    {
                        self.obstacles[i].mark_passed();
                        self.emit(Cue::Swoosh);
                        self.invert_gravity();
                    }
                }
            }
        }

        self.obstacles.retain(|o| !o.is_out_of_bounds());
    }

    fn invert_gravity(&mut self) {
        self.gravity_inverted = !self.gravity_inverted;
        let sign = if self.gravity_inverted { -1.0 } else { 1.0 };
        self.gravity = sign * self.config.gravity_accel;
        self.displacement = sign * self.config.flap_displacement;

        if self.gravity_inverted {
            self.emit(Cue::BgNormalOff);
            self.emit(Cue::BgInvertedOn);
        } else {
            self.emit(Cue::BgInvertedOff);
            self.emit(Cue::BgNormalOn);
        }
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    /// One spawn cycle: a top/bottom pipe pair sharing a random gap offset,
    /// plus a gravity inverter centered in the gap on every 10th cycle.
    pub fn spawn_pipes(&mut self, rng: &mut impl Rng) {
        if self.phase != Phase::Playing {
            return;
        }
        let c = &self.config;
        let offset = rng.gen_range(c.pipe_min_y..c.pipe_max_y);

        self.obstacles.push(Obstacle::new(
            c.board_width,
            offset,
            c.pipe_width,
            c.pipe_height,
            ObstacleKind::Pipe,
            ImageKey::PipeTop,
        ));
        self.obstacles.push(Obstacle::new(
            c.board_width,
            offset + c.pipe_height + c.pipe_opening,
            c.pipe_width,
            c.pipe_height,
            ObstacleKind::Pipe,
            ImageKey::PipeBot,
        ));

        if self.spawn_counter % 10 == 9 {
            let inverter_y =
                offset + c.pipe_height + c.pipe_opening / 2.0 - c.inverter_height / 2.0;
            self.obstacles.push(Obstacle::new(
                c.board_width,
                inverter_y,
                c.inverter_width,
                c.inverter_height,
                ObstacleKind::GravityInverter,
                ImageKey::GravityInverter,
            ));
        }

        self.spawn_counter += 1;
    }

    fn emit(&mut self, cue: Cue) {
        log::debug!("cue {:?}", cue);
        self.cues.push(cue);
    }

    // ── Read-only snapshot for rendering and tests ───────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    pub fn tute_opacity(&self) -> f64 {
        self.fades.opacity(FadeTarget::GameTute)
    }

    pub fn over_opacity(&self) -> f64 {
        self.fades.opacity(FadeTarget::GameOver)
    }

    pub fn gravity_inverted(&self) -> bool {
        self.gravity_inverted
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn spawn_counter(&self) -> u32 {
        self.spawn_counter
    }

    pub fn timer_armed(&self, id: TimerId) -> bool {
        self.scheduler.is_armed(id)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
