use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use gravity_bird::config::GameConfig;
use gravity_bird::entities::{ObstacleKind, Phase};
use gravity_bird::resources::ResourceBundle;
use gravity_bird::scheduler::TimerId;
use gravity_bird::sim::{Cue, GameSimulation};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Board geometry chosen so spawned pipes sit entirely off the board
/// vertically (top pipe above it, bottom pipe below it): the bird can never
/// hit a pipe, and every pipe pair is passed cleanly.  The inverter lands at
/// offset + 906, i.e. around y = 406, in the falling bird's path.
fn corridor_config() -> GameConfig {
    GameConfig {
        board_width: 450.0,
        board_height: 800.0,
        scroll_speed: -50.0,
        flap_displacement: -12.5,
        gravity_accel: 0.625,
        bird_width: 40.0,
        bird_height: 30.0,
        bird_start_x: 100.0,
        bird_start_y: 400.0,
        pipe_width: 56.25,
        pipe_height: 1.0,
        pipe_min_y: -500.0,
        pipe_max_y: -499.0,
        pipe_opening: 1860.0,
        inverter_width: 50.0,
        inverter_height: 50.0,
        spawn_period: ms(1800),
        tick_period: ms(66),
        bird_anim_period: ms(100),
        fade_step: 0.05,
        fade_interval: ms(50),
    }
}

/// Like `corridor_config` but the pipe spans the whole board vertically, so
/// the first pipe pair to reach the bird kills it.
fn wall_config() -> GameConfig {
    GameConfig {
        pipe_height: 2000.0,
        pipe_min_y: -600.0,
        pipe_max_y: -599.0,
        ..corridor_config()
    }
}

fn make_sim(config: GameConfig) -> GameSimulation {
    let bundle = ResourceBundle::load().unwrap();
    GameSimulation::new(config, &bundle)
}

// ── Initial state ─────────────────────────────────────────────────────────────

#[test]
fn new_simulation_opens_idle() {
    let sim = make_sim(corridor_config());
    assert_eq!(sim.phase(), Phase::Open);
    assert_eq!(sim.score(), 0.0);
    assert_eq!(sim.best_score(), 0.0);
    assert!(sim.obstacles().is_empty());
    assert_eq!(sim.velocity(), 0.0);
    assert!(!sim.gravity_inverted());
    assert_eq!(sim.tute_opacity(), 0.0);
    assert!(!sim.timer_armed(TimerId::Physics));
    assert!(!sim.timer_armed(TimerId::Spawn));
    assert!(!sim.timer_armed(TimerId::BirdAnim));
}

#[test]
fn world_is_frozen_before_start() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.step_world();
    sim.spawn_pipes(&mut rng);
    for _ in 0..5 {
        sim.frame(ms(66), &mut rng);
    }
    assert_eq!(sim.velocity(), 0.0);
    assert_eq!(sim.bird().y, 400.0);
    assert!(sim.obstacles().is_empty());
}

// ── Activation ────────────────────────────────────────────────────────────────

#[test]
fn activate_from_open_starts_playing() {
    let mut sim = make_sim(corridor_config());
    sim.activate();
    assert_eq!(sim.phase(), Phase::Playing);
    assert!(sim.timer_armed(TimerId::Physics));
    assert!(sim.timer_armed(TimerId::Spawn));
    assert!(sim.timer_armed(TimerId::BirdAnim));
    assert_eq!(sim.drain_cues(), vec![Cue::BgNormalOn, Cue::BgInvertedOff]);
}

#[test]
fn activate_while_playing_flaps() {
    let mut sim = make_sim(corridor_config());
    sim.activate();
    sim.drain_cues();
    sim.activate();
    assert_eq!(sim.velocity(), -12.5); // flap displacement
    assert_eq!(sim.drain_cues(), vec![Cue::Wing]);
}

#[test]
fn drain_cues_empties_the_queue() {
    let mut sim = make_sim(corridor_config());
    sim.activate();
    assert!(!sim.drain_cues().is_empty());
    assert!(sim.drain_cues().is_empty());
}

// ── Physics tick ──────────────────────────────────────────────────────────────

#[test]
fn gravity_accelerates_the_bird() {
    let mut sim = make_sim(corridor_config());
    sim.activate();
    sim.step_world();
    assert_eq!(sim.velocity(), 0.625);
    assert_eq!(sim.bird().y, 400.625);
    sim.step_world();
    assert_eq!(sim.velocity(), 1.25);
    assert_eq!(sim.bird().y, 401.875);
}

#[test]
fn bird_falls_out_of_bounds_without_input() {
    let mut sim = make_sim(corridor_config());
    sim.activate();
    sim.drain_cues();

    let mut ticks = 0;
    while sim.phase() == Phase::Playing && ticks < 100 {
        sim.step_world();
        ticks += 1;
    }
    assert_eq!(sim.phase(), Phase::Over);
    assert!(sim.drain_cues().contains(&Cue::Die));
    assert!(!sim.timer_armed(TimerId::Physics));
    assert!(!sim.timer_armed(TimerId::Spawn));
    assert!(!sim.timer_armed(TimerId::BirdAnim));
}

#[test]
fn ticks_are_inert_after_game_over() {
    let mut sim = make_sim(corridor_config());
    sim.activate();
    while sim.phase() == Phase::Playing {
        sim.step_world();
    }
    let y = sim.bird().y;
    let mut rng = seeded_rng();
    sim.step_world();
    sim.spawn_pipes(&mut rng);
    assert_eq!(sim.bird().y, y);
    assert!(sim.obstacles().is_empty());
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[test]
fn passing_a_pipe_pair_scores_one_point() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();
    sim.drain_cues();
    sim.spawn_pipes(&mut rng);
    assert_eq!(sim.obstacles().len(), 2);

    // Pipes spawn at x=450 and scroll -50/tick; the bird at x=100 is
    // strictly ahead of them from tick 8 (x=50) on.
    for _ in 0..8 {
        sim.step_world();
    }
    assert_eq!(sim.score(), 1.0); // 0.5 per pipe, both passed together
    let points = sim
        .drain_cues()
        .iter()
        .filter(|&&c| c == Cue::Point)
        .count();
    assert_eq!(points, 2);
    assert!(sim.obstacles().iter().all(|o| o.is_passed()));
}

#[test]
fn best_score_commits_at_game_over() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();
    sim.spawn_pipes(&mut rng);

    let mut ticks = 0;
    while sim.phase() == Phase::Playing && ticks < 100 {
        sim.step_world();
        ticks += 1;
    }
    assert_eq!(sim.phase(), Phase::Over);
    assert_eq!(sim.score(), 1.0);
    assert_eq!(sim.best_score(), 1.0);
    assert!(sim.obstacles().is_empty()); // passed pipes were pruned off-board
}

// ── Collision ─────────────────────────────────────────────────────────────────

#[test]
fn pipe_collision_ends_the_game_unscored() {
    let mut sim = make_sim(wall_config());
    let mut rng = seeded_rng();
    sim.activate();
    sim.drain_cues();
    sim.spawn_pipes(&mut rng);

    // Wall reaches the bird on tick 7 (x = 450 - 7*50 = 100), well before
    // the bird could fall out of bounds.
    let mut ticks = 0;
    while sim.phase() == Phase::Playing && ticks < 20 {
        sim.step_world();
        ticks += 1;
    }
    assert_eq!(ticks, 7);
    assert_eq!(sim.phase(), Phase::Over);
    assert_eq!(sim.score(), 0.0); // died before passing
    assert!(sim.drain_cues().contains(&Cue::Die));
}

// ── Reset ─────────────────────────────────────────────────────────────────────

#[test]
fn activate_from_over_restarts_cleanly() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();
    sim.spawn_pipes(&mut rng);
    while sim.phase() == Phase::Playing {
        sim.step_world();
    }
    assert_eq!(sim.best_score(), 1.0);
    sim.drain_cues();

    sim.activate();
    assert_eq!(sim.phase(), Phase::Playing);
    assert_eq!(sim.score(), 0.0);
    assert_eq!(sim.best_score(), 1.0); // survives the reset
    assert!(sim.obstacles().is_empty());
    assert_eq!(sim.spawn_counter(), 0);
    assert_eq!(sim.velocity(), 0.0);
    assert_eq!(sim.bird().y, 400.0);
    assert!(!sim.gravity_inverted());
    assert!(sim.timer_armed(TimerId::Physics));
    assert_eq!(sim.drain_cues(), vec![Cue::BgNormalOn, Cue::BgInvertedOff]);
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn every_tenth_spawn_includes_an_inverter() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();

    for _ in 0..9 {
        sim.spawn_pipes(&mut rng);
    }
    assert_eq!(sim.obstacles().len(), 18);
    assert!(sim
        .obstacles()
        .iter()
        .all(|o| o.kind == ObstacleKind::Pipe));

    sim.spawn_pipes(&mut rng);
    assert_eq!(sim.spawn_counter(), 10);
    let inverters = sim
        .obstacles()
        .iter()
        .filter(|o| o.kind == ObstacleKind::GravityInverter)
        .count();
    assert_eq!(inverters, 1);
}

#[test]
fn pipe_pair_shares_one_gap_offset() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();
    sim.spawn_pipes(&mut rng);

    let obstacles = sim.obstacles();
    let top = &obstacles[0];
    let bottom = &obstacles[1];
    assert_eq!(top.x, 450.0);
    assert_eq!(bottom.x, 450.0);
    assert!(top.y >= -500.0 && top.y < -499.0);
    // Gap is exactly pipe_height + pipe_opening below the top pipe's origin
    assert_eq!(bottom.y, top.y + 1.0 + 1860.0);
}

// ── Gravity inversion ─────────────────────────────────────────────────────────

#[test]
fn inverter_contact_flips_gravity() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();
    sim.drain_cues();
    for _ in 0..10 {
        sim.spawn_pipes(&mut rng);
    }

    let mut ticks = 0;
    while !sim.gravity_inverted() && ticks < 20 {
        sim.step_world();
        ticks += 1;
    }
    assert!(sim.gravity_inverted());
    assert_eq!(sim.gravity(), -0.625);
    assert_eq!(sim.displacement(), 12.5);
    let cues = sim.drain_cues();
    assert!(cues.contains(&Cue::Swoosh));
    assert!(cues.contains(&Cue::BgNormalOff));
    assert!(cues.contains(&Cue::BgInvertedOn));
    assert_eq!(sim.phase(), Phase::Playing); // inverters never kill
}

#[test]
fn second_inverter_flips_gravity_back() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();
    for _ in 0..10 {
        sim.spawn_pipes(&mut rng);
    }
    let mut ticks = 0;
    while !sim.gravity_inverted() && ticks < 20 {
        sim.step_world();
        ticks += 1;
    }
    assert!(sim.gravity_inverted());
    sim.drain_cues();

    // Second batch: the bird decelerates upward after the flip and hovers
    // around y = 430, back inside the next inverter's path.
    for _ in 0..10 {
        sim.spawn_pipes(&mut rng);
    }
    ticks = 0;
    while sim.gravity_inverted() && ticks < 20 {
        sim.step_world();
        ticks += 1;
    }
    assert!(!sim.gravity_inverted());
    assert_eq!(sim.gravity(), 0.625);
    assert_eq!(sim.displacement(), -12.5);
    let cues = sim.drain_cues();
    assert!(cues.contains(&Cue::BgInvertedOff));
    assert!(cues.contains(&Cue::BgNormalOn));
}

#[test]
fn inverter_fires_only_once() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();
    for _ in 0..10 {
        sim.spawn_pipes(&mut rng);
    }
    let mut ticks = 0;
    while !sim.gravity_inverted() && ticks < 20 {
        sim.step_world();
        ticks += 1;
    }
    // Keep ticking; the marked inverter must not flip gravity again even
    // while still overlapping or on later ticks.
    for _ in 0..3 {
        sim.step_world();
    }
    assert!(sim.gravity_inverted());
}

// ── Frame driver ──────────────────────────────────────────────────────────────

#[test]
fn frame_fires_armed_timers() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();

    sim.frame(ms(66), &mut rng); // one physics period exactly
    assert_eq!(sim.velocity(), 0.625);
    assert_eq!(sim.bird().frame_index(), 0); // anim period is 100ms

    sim.frame(ms(34), &mut rng); // 100ms total: anim fires
    assert_eq!(sim.bird().frame_index(), 1);
}

#[test]
fn frame_clamps_runaway_deltas() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();

    // 5s is clamped to 250ms: 3 physics ticks, 2 anim frames, no spawn.
    sim.frame(Duration::from_secs(5), &mut rng);
    assert_eq!(sim.velocity(), 1.875);
    assert_eq!(sim.bird().frame_index(), 2);
    assert!(sim.obstacles().is_empty());
}

#[test]
fn spawn_timer_fires_every_period() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();

    // 8 clamp-sized frames accumulate 2000ms, crossing the 1800ms spawn
    // period once.
    for _ in 0..8 {
        sim.frame(ms(250), &mut rng);
    }
    assert_eq!(sim.spawn_counter(), 1);
    assert_eq!(sim.obstacles().len(), 2);
}

// ── Overlay fades ─────────────────────────────────────────────────────────────

#[test]
fn tutorial_pulses_while_open() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();

    let mut peak: f64 = 0.0;
    for _ in 0..30 {
        sim.frame(ms(50), &mut rng);
        peak = peak.max(sim.tute_opacity());
    }
    assert_eq!(peak, 1.0); // reached the top bound
    assert!(sim.tute_opacity() < 1.0); // and turned back down
    assert_eq!(sim.phase(), Phase::Open); // pulsing never starts the game
}

#[test]
fn tutorial_fades_out_after_start() {
    let mut sim = make_sim(corridor_config());
    let mut rng = seeded_rng();
    sim.activate();
    assert_eq!(sim.tute_opacity(), 1.0); // snapped to full before fading

    for _ in 0..25 {
        sim.frame(ms(50), &mut rng);
    }
    assert_eq!(sim.tute_opacity(), 0.0);
}

#[test]
fn game_over_overlay_oscillates() {
    let mut sim = make_sim(wall_config());
    let mut rng = seeded_rng();
    sim.activate();
    sim.spawn_pipes(&mut rng);

    let mut frames = 0;
    while sim.phase() == Phase::Playing && frames < 20 {
        sim.frame(ms(66), &mut rng);
        frames += 1;
    }
    assert_eq!(sim.phase(), Phase::Over);
    assert_eq!(sim.over_opacity(), 0.0); // restarted from invisible

    let mut peak: f64 = 0.0;
    for _ in 0..25 {
        sim.frame(ms(50), &mut rng);
        peak = peak.max(sim.over_opacity());
    }
    assert_eq!(peak, 1.0);
    assert!(sim.over_opacity() < 1.0); // bounced off the bound, still going
}
