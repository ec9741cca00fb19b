/// Time-stepped opacity animation.
///
/// Each fade target owns one record in a fixed table: current value, the
/// direction of travel, a mode, and an interval accumulator.  Starting a
/// fade on a target that is already fading is a no-op, so at most one
/// logical timer ever runs per target.  Targets advance fully independently
/// from a single `advance(dt)` call driven by the frame loop.

use std::time::Duration;

/// The opacity values the game animates.  Indexes the controller's table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeTarget {
    GameTute,
    GameOver,
}

const TARGET_COUNT: usize = 2;

impl FadeTarget {
    fn index(self) -> usize {
        match self {
            FadeTarget::GameTute => 0,
            FadeTarget::GameOver => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeDirection {
    /// Toward 1.0.
    In,
    /// Toward 0.0.
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeMode {
    /// Stop on reaching the bound; `advance` reports the completion.
    OneShot,
    /// Reverse direction at each bound and keep going until stopped.
    Oscillate,
}

#[derive(Clone, Debug)]
struct FadeState {
    value: f64,
    step: f64,
    interval: Duration,
    accumulator: Duration,
    direction: FadeDirection,
    mode: FadeMode,
    running: bool,
}

impl FadeState {
    fn new(step: f64, interval: Duration) -> Self {
        Self {
            value: 0.0,
            step,
            interval,
            accumulator: Duration::ZERO,
            direction: FadeDirection::In,
            mode: FadeMode::OneShot,
            running: false,
        }
    }

    /// Apply one step; returns true when a one-shot just finished.
    fn apply_step(&mut self) -> bool {
        match self.direction {
            FadeDirection::In => {
                self.value = (self.value + self.step).min(1.0);
                if self.value >= 1.0 {
                    return self.reached_bound();
                }
            }
            FadeDirection::Out => {
                self.value = (self.value - self.step).max(0.0);
                if self.value <= 0.0 {
                    return self.reached_bound();
                }
            }
        }
        false
    }

    fn reached_bound(&mut self) -> bool {
        match self.mode {
            FadeMode::OneShot => {
                self.running = false;
                self.accumulator = Duration::ZERO;
                true
            }
            FadeMode::Oscillate => {
                self.direction = match self.direction {
                    FadeDirection::In => FadeDirection::Out,
                    FadeDirection::Out => FadeDirection::In,
                };
                false
            }
        }
    }
}

/// The fixed table of fade records, one per `FadeTarget`.
#[derive(Clone, Debug)]
pub struct FadeController {
    states: [FadeState; TARGET_COUNT],
}

impl FadeController {
    pub fn new(step: f64, interval: Duration) -> Self {
        Self {
            states: [
                FadeState::new(step, interval),
                FadeState::new(step, interval),
            ],
        }
    }

    /// Begin fading a target.  No-op when that target is already fading.
    pub fn start(&mut self, target: FadeTarget, direction: FadeDirection, mode: FadeMode) {
        let state = &mut self.states[target.index()];
        if state.running {
            return;
        }
        state.direction = direction;
        state.mode = mode;
        state.accumulator = Duration::ZERO;
        state.running = true;
    }

    /// Cancel a target's fade, optionally forcing a final opacity.
    pub fn stop(&mut self, target: FadeTarget, final_opacity: Option<f64>) {
        let state = &mut self.states[target.index()];
        state.running = false;
        state.accumulator = Duration::ZERO;
        if let Some(value) = final_opacity {
            state.value = value.clamp(0.0, 1.0);
        }
    }

    /// Advance every running fade by `dt`, applying as many interval steps
    /// as elapsed.  Returns the targets whose one-shot fade completed.
    pub fn advance(&mut self, dt: Duration) -> Vec<FadeTarget> {
        let mut completed = Vec::new();
        for target in [FadeTarget::GameTute, FadeTarget::GameOver] {
            let state = &mut self.states[target.index()];
            if !state.running {
                continue;
            }
            state.accumulator += dt;
            while state.running && state.accumulator >= state.interval {
                state.accumulator -= state.interval;
                if state.apply_step() {
                    completed.push(target);
                }
            }
        }
        completed
    }

    pub fn opacity(&self, target: FadeTarget) -> f64 {
        self.states[target.index()].value
    }

    pub fn is_running(&self, target: FadeTarget) -> bool {
        self.states[target.index()].running
    }

    /// Set a target's opacity directly without touching its timer.
    pub fn set_opacity(&mut self, target: FadeTarget, value: f64) {
        self.states[target.index()].value = value.clamp(0.0, 1.0);
    }
}
