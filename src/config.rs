/// Tunable constants and the derived board geometry.
///
/// Everything here is fixed at startup; nothing is runtime input. The
/// geometric fields are all derived from the board height and a 9:16
/// aspect ratio, so a single number controls the scale of the whole world.

use std::time::Duration;

// ── Tunables ─────────────────────────────────────────────────────────────────

/// Milliseconds between pipe spawn cycles.
pub const SPAWN_PERIOD_MS: u64 = 1800;

/// Physics ticks per second.
pub const TICK_RATE: u64 = 15;

/// Milliseconds between bird animation frames.
pub const BIRD_ANIM_PERIOD_MS: u64 = 100;

/// Opacity change per fade step.
pub const FADE_STEP: f64 = 0.05;

/// Milliseconds between fade steps.
pub const FADE_INTERVAL_MS: u64 = 50;

/// Board width : height.
pub const ASPECT_RATIO: f64 = 9.0 / 16.0;

/// Default board height in board units.
pub const DEFAULT_BOARD_HEIGHT: f64 = 800.0;

/// Frame deltas above this are clamped so a stalled terminal cannot make
/// the timers fire a huge burst of catch-up ticks.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

// ── Derived geometry ─────────────────────────────────────────────────────────

/// All world geometry and physics coefficients, derived from the board
/// height.  Widths scale off the board width, heights off the board height,
/// matching the proportions the sprites were drawn for.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub board_width: f64,
    pub board_height: f64,

    /// Horizontal obstacle displacement per physics tick (negative: leftward).
    pub scroll_speed: f64,
    /// Velocity assigned to the bird on flap (negative: upward) before any
    /// gravity inversion.
    pub flap_displacement: f64,
    /// Velocity change per physics tick (positive: downward) before any
    /// gravity inversion.
    pub gravity_accel: f64,

    pub bird_width: f64,
    pub bird_height: f64,
    pub bird_start_x: f64,
    pub bird_start_y: f64,

    pub pipe_width: f64,
    pub pipe_height: f64,
    /// Lowest vertical pipe offset (inclusive).  Negative: the top pipe
    /// extends above the board so only its lower end is visible.
    pub pipe_min_y: f64,
    /// Highest vertical pipe offset (exclusive).
    pub pipe_max_y: f64,
    /// Vertical size of the gap between a top and bottom pipe.
    pub pipe_opening: f64,

    pub inverter_width: f64,
    pub inverter_height: f64,

    pub spawn_period: Duration,
    pub tick_period: Duration,
    pub bird_anim_period: Duration,
    pub fade_step: f64,
    pub fade_interval: Duration,
}

impl GameConfig {
    pub fn new(board_height: f64) -> Self {
        let board_width = board_height * ASPECT_RATIO;
        let pipe_width = board_width * 0.125;
        Self {
            board_width,
            board_height,

            scroll_speed: -board_width / 150.0,
            flap_displacement: -board_height / 64.0,
            gravity_accel: board_height / 1280.0,

            bird_width: board_width * 0.1,
            bird_height: board_height * 0.0375,
            bird_start_x: board_width * 0.125,
            bird_start_y: board_height * 0.5,

            pipe_width,
            pipe_height: board_height * 0.78125,
            pipe_min_y: board_height * -0.75,
            pipe_max_y: board_height * -0.0625,
            pipe_opening: board_height / 4.0,

            inverter_width: pipe_width * 0.8,
            inverter_height: pipe_width * 0.8,

            spawn_period: Duration::from_millis(SPAWN_PERIOD_MS),
            tick_period: Duration::from_millis(1000 / TICK_RATE),
            bird_anim_period: Duration::from_millis(BIRD_ANIM_PERIOD_MS),
            fade_step: FADE_STEP,
            fade_interval: Duration::from_millis(FADE_INTERVAL_MS),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_HEIGHT)
    }
}
