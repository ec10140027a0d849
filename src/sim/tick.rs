//! Per-frame simulation tick
//!
//! One call per display refresh. Commands from the input are applied first,
//! then the oscillator (while playing), debris, bursts and settle pulses are
//! advanced by the clamped frame delta.

use super::oscillator::oscillate;
use super::state::{RunPhase, SimState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a run (from idle or game over)
    pub start: bool,
    /// Abandon the current run and start over
    pub reset: bool,
    /// Drop the active block
    pub drop: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - drops are timed automatically
    pub autoplay: bool,
}

/// Clamp a raw frame delta into `[0, max_dt]`; garbage becomes zero
#[inline]
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, max_dt) } else { 0.0 }
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    let dt = clamp_dt(dt, state.tuning.max_dt);

    if input.reset {
        state.reset_run();
    } else if input.start {
        state.start_run();
    }

    if input.pause {
        match state.phase {
            RunPhase::Playing => state.pause(),
            RunPhase::Paused => state.resume(),
            _ => {}
        }
    }

    if input.drop || (input.autoplay && autoplay_wants_drop(state, dt)) {
        state.trigger_drop();
    }

    state.time += dt;

    if state.phase == RunPhase::Playing {
        let speed = state.tuning.speed_at(state.tower.score);
        let axis = state.tower.axis;
        if let Some((active, support)) = state.tower.active_and_support_mut() {
            oscillate(active, support, axis, speed, &state.tuning, dt);
        }
    }

    state.debris.update(&state.tuning.debris, dt);
    state.bursts.update(&state.tuning.burst, dt);
    state.tower.decay_pulses(dt);
}

/// Aim offset from the support center for the demo driver.
/// Sways with the score so runs mix perfect and partial drops.
fn autoplay_aim(score: u32) -> f32 {
    let s = score as f32;
    (s * 0.9).sin() * 0.35 + (s * 0.37).sin() * 0.15
}

/// True when the active block reaches or crosses the aim point this frame
fn autoplay_wants_drop(state: &SimState, dt: f32) -> bool {
    if state.phase != RunPhase::Playing {
        return false;
    }
    let axis = state.tower.axis;
    let (Some(active), Some(support)) = (state.tower.active(), state.tower.support()) else {
        return false;
    };
    let aim = support.center(axis) + autoplay_aim(state.tower.score);
    let pos = active.center(axis);
    let next = pos + active.direction * state.tuning.speed_at(state.tower.score) * dt;
    let before = pos - aim;
    let after = next - aim;
    before == 0.0 || before.signum() != after.signum()
}
