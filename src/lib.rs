//! Stack Tower - a block-stacking arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (oscillator, drop geometry, tower, debris, bursts)
//! - `tuning`: Data-driven game balance
//! - `stats`: Session statistics folded from simulation events
//! - `renderer`: Projection of simulation snapshots into GPU instance records

pub mod renderer;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use stats::SessionStats;
pub use tuning::{BurstTuning, DebrisTuning, Tuning, TuningError};

use serde::{Deserialize, Serialize};

/// Default balance constants
pub mod consts {
    /// Largest step a single tick may advance (seconds)
    pub const MAX_DT: f32 = 0.033;

    /// Tower geometry
    pub const BLOCK_HEIGHT: f32 = 0.5;
    pub const INITIAL_SIZE_X: f32 = 3.2;
    pub const INITIAL_SIZE_Z: f32 = 3.2;
    pub const MIN_BLOCK_SIZE: f32 = 0.6;
    /// Distance behind the support at which a new block appears
    pub const SPAWN_OFFSET: f32 = 5.2;

    /// Oscillator
    pub const BASE_SPEED: f32 = 2.25;
    pub const SPEED_INCREASE_PER_SCORE: f32 = 0.03;
    pub const MOVEMENT_RANGE_PADDING: f32 = 1.1;
    pub const MOVEMENT_RANGE_EXTRA: f32 = 2.0;

    /// Drop resolution
    pub const PERFECT_TOLERANCE: f32 = 0.08;
    /// Overlaps at or below this count as a miss
    pub const OVERLAP_EPSILON: f32 = 0.0001;

    /// Growth on sustained perfect streaks
    pub const PERFECT_GROW_EVERY: u32 = 3;
    pub const GROW_AMOUNT: f32 = 0.16;

    /// Settle pulse after a placement (seconds)
    pub const PULSE_DURATION: f32 = 0.12;

    /// Block colour progression (hue in 0..1)
    pub const INITIAL_HUE: f32 = 0.58;
    pub const HUE_STEP: f32 = 0.055;

    /// Debris physics
    pub const GRAVITY: f32 = 20.0;
    pub const DEBRIS_FLOOR_Y: f32 = -14.0;
    pub const DEBRIS_KICK: f32 = 2.2;
    pub const DEBRIS_LIFT: f32 = 2.0;
    pub const DEBRIS_SPIN: [f32; 3] = [2.2, 1.4, 2.2];

    /// Particle bursts
    pub const BURST_PARTICLES: usize = 46;
    pub const BURST_MAX_AGE: f32 = 0.8;
    pub const BURST_FADE_AGE: f32 = 0.7;
    pub const BURST_OPACITY: f32 = 0.9;
    pub const BURST_DROP: f32 = 2.6;
    /// Bursts spawn this far above the block center
    pub const BURST_HEIGHT: f32 = 0.35;
    pub const PERFECT_BURST_COLOR: u32 = 0x111111;
    pub const GROW_BURST_COLOR: u32 = 0xc8a100;
}

/// A centered interval on one horizontal axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub center: f32,
    pub size: f32,
}

impl Span {
    pub const fn new(center: f32, size: f32) -> Self {
        Self { center, size }
    }

    /// Build a span from its two edges
    #[inline]
    pub fn from_edges(min: f32, max: f32) -> Self {
        Self {
            center: (min + max) / 2.0,
            size: max - min,
        }
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.center - self.size / 2.0
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.center + self.size / 2.0
    }

    /// Signed length of the intersection (negative when disjoint)
    #[inline]
    pub fn overlap(&self, other: &Span) -> f32 {
        self.max().min(other.max()) - self.min().max(other.min())
    }
}
