/// Game entity types and their geometry operations.
///
/// Coordinates are board-space f64: x grows rightward, y grows downward.
/// Entities hold no I/O and no timers; everything here is a total operation
/// on plain data.

use crate::resources::ImageKey;

// ── Phase ────────────────────────────────────────────────────────────────────

/// The authoritative game state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Tutorial overlay pulsing, world frozen.
    Open,
    /// Physics, spawning, and scoring active.
    Playing,
    /// Terminal until an activate resets back into Playing.
    Over,
}

// ── Obstacles ────────────────────────────────────────────────────────────────

/// Closed set of obstacle behaviors; dispatch happens on this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Pipe,
    GravityInverter,
}

/// A leftward-moving axis-aligned rectangle.  Size is fixed after
/// construction; `passed` goes false→true at most once per game.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: ObstacleKind,
    pub image: ImageKey,
    passed: bool,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64, kind: ObstacleKind, image: ImageKey) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
            image,
            passed: false,
        }
    }

    /// Translate horizontally.  Obstacles only ever move leftward (dx < 0).
    pub fn shift(&mut self, dx: f64) {
        self.x += dx;
    }

    /// True once the right edge has moved past the left board boundary.
    pub fn is_out_of_bounds(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }

    /// Idempotent after the first call.
    pub fn mark_passed(&mut self) {
        self.passed = true;
    }
}

// ── Bird ─────────────────────────────────────────────────────────────────────

/// The player entity.  Horizontal position is fixed; the world scrolls
/// instead.  `frames` is non-empty and `current_frame` always indexes it.
#[derive(Clone, Debug)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    frames: Vec<ImageKey>,
    current_frame: usize,
}

impl Bird {
    pub fn new(x: f64, y: f64, width: f64, height: f64, frames: Vec<ImageKey>) -> Self {
        debug_assert!(!frames.is_empty());
        Self {
            x,
            y,
            width,
            height,
            frames,
            current_frame: 0,
        }
    }

    /// Vertical translation by the current velocity.
    pub fn apply_velocity(&mut self, velocity: f64) {
        self.y += velocity;
    }

    /// Terminal collision with the implicit ground/ceiling.  y = 0 and
    /// y = board_height are still in bounds.
    pub fn is_out_of_bounds(&self, board_height: f64) -> bool {
        self.y < 0.0 || self.y > board_height
    }

    /// Strict AABB overlap: rectangles that only share an edge do not
    /// collide.
    pub fn collides_with(&self, obstacle: &Obstacle) -> bool {
        self.x < obstacle.x + obstacle.width
            && self.x + self.width > obstacle.x
            && self.y < obstacle.y + obstacle.height
            && self.y + self.height > obstacle.y
    }

    /// True once the obstacle sits strictly behind the bird's fixed x,
    /// regardless of vertical alignment.
    pub fn has_passed(&self, obstacle: &Obstacle) -> bool {
        self.x > obstacle.x
    }

    /// Advance the animation cyclically.
    pub fn next_frame(&mut self) {
        self.current_frame = (self.current_frame + 1) % self.frames.len();
    }

    pub fn frame_image(&self) -> ImageKey {
        self.frames[self.current_frame]
    }

    pub fn frame_index(&self) -> usize {
        self.current_frame
    }

    /// Back to the spawn position with the animation rewound.  Called only
    /// on full game reset.
    pub fn reset(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.current_frame = 0;
    }
}
