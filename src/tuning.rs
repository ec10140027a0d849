//! Data-driven game balance
//!
//! Every knob the simulation reads lives here. A `Tuning` is fixed when a
//! simulation is constructed and never changes mid-run. Partial JSON
//! documents override only the fields they name.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Falling debris parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisTuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Pieces below this height are discarded
    pub floor_y: f32,
    /// Horizontal speed away from the kept footprint
    pub kick: f32,
    /// Initial upward speed
    pub lift: f32,
    /// Max angular speed per axis (x, y, z), sampled in ±value
    pub spin: [f32; 3],
}

impl Default for DebrisTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            floor_y: DEBRIS_FLOOR_Y,
            kick: DEBRIS_KICK,
            lift: DEBRIS_LIFT,
            spin: DEBRIS_SPIN,
        }
    }
}

/// Particle burst parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstTuning {
    pub particles: usize,
    /// Bursts are removed once they reach this age (seconds)
    pub max_age: f32,
    /// Opacity reaches zero at this age
    pub fade_age: f32,
    pub opacity: f32,
    /// Quadratic downward term applied to particle arcs
    pub drop: f32,
    /// Spawn height above the block center
    pub height: f32,
    pub upward: (f32, f32),
    pub radial: (f32, f32),
    pub lifetime: (f32, f32),
    pub perfect_color: u32,
    pub grow_color: u32,
}

impl Default for BurstTuning {
    fn default() -> Self {
        Self {
            particles: BURST_PARTICLES,
            max_age: BURST_MAX_AGE,
            fade_age: BURST_FADE_AGE,
            opacity: BURST_OPACITY,
            drop: BURST_DROP,
            height: BURST_HEIGHT,
            upward: (0.6, 2.2),
            radial: (0.7, 2.1),
            lifetime: (0.45, 0.70),
            perfect_color: PERFECT_BURST_COLOR,
            grow_color: GROW_BURST_COLOR,
        }
    }
}

/// Complete balance sheet for one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub block_height: f32,
    pub initial_size_x: f32,
    pub initial_size_z: f32,
    /// Lower clamp applied when a block grows
    pub min_block_size: f32,
    pub spawn_offset: f32,
    pub base_speed: f32,
    pub speed_increase_per_score: f32,
    pub movement_range_padding: f32,
    pub movement_range_extra: f32,
    pub perfect_tolerance: f32,
    pub overlap_epsilon: f32,
    pub perfect_grow_every: u32,
    pub grow_amount: f32,
    pub pulse_duration: f32,
    pub initial_hue: f32,
    pub hue_step: f32,
    pub max_dt: f32,
    pub debris: DebrisTuning,
    pub burst: BurstTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            block_height: BLOCK_HEIGHT,
            initial_size_x: INITIAL_SIZE_X,
            initial_size_z: INITIAL_SIZE_Z,
            min_block_size: MIN_BLOCK_SIZE,
            spawn_offset: SPAWN_OFFSET,
            base_speed: BASE_SPEED,
            speed_increase_per_score: SPEED_INCREASE_PER_SCORE,
            movement_range_padding: MOVEMENT_RANGE_PADDING,
            movement_range_extra: MOVEMENT_RANGE_EXTRA,
            perfect_tolerance: PERFECT_TOLERANCE,
            overlap_epsilon: OVERLAP_EPSILON,
            perfect_grow_every: PERFECT_GROW_EVERY,
            grow_amount: GROW_AMOUNT,
            pulse_duration: PULSE_DURATION,
            initial_hue: INITIAL_HUE,
            hue_step: HUE_STEP,
            max_dt: MAX_DT,
            debris: DebrisTuning::default(),
            burst: BurstTuning::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: "must be a finite positive number",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: "must be a finite non-negative number",
        })
    }
}

fn ordered(field: &'static str, (lo, hi): (f32, f32)) -> Result<(), TuningError> {
    if lo.is_finite() && hi.is_finite() && lo <= hi {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: "range must be finite with min <= max",
        })
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Check that the simulation invariants can hold under these values
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("block_height", self.block_height)?;
        positive("initial_size_x", self.initial_size_x)?;
        positive("initial_size_z", self.initial_size_z)?;
        positive("min_block_size", self.min_block_size)?;
        if self.min_block_size > self.initial_size_x.min(self.initial_size_z) {
            return Err(TuningError::Invalid {
                field: "min_block_size",
                reason: "must not exceed the initial block size",
            });
        }
        non_negative("spawn_offset", self.spawn_offset)?;
        positive("base_speed", self.base_speed)?;
        non_negative("speed_increase_per_score", self.speed_increase_per_score)?;
        non_negative("movement_range_padding", self.movement_range_padding)?;
        non_negative("movement_range_extra", self.movement_range_extra)?;
        non_negative("perfect_tolerance", self.perfect_tolerance)?;
        non_negative("overlap_epsilon", self.overlap_epsilon)?;
        if self.perfect_grow_every == 0 {
            return Err(TuningError::Invalid {
                field: "perfect_grow_every",
                reason: "must be at least 1",
            });
        }
        non_negative("grow_amount", self.grow_amount)?;
        positive("pulse_duration", self.pulse_duration)?;
        non_negative("initial_hue", self.initial_hue)?;
        non_negative("hue_step", self.hue_step)?;
        positive("max_dt", self.max_dt)?;

        non_negative("debris.gravity", self.debris.gravity)?;
        if !self.debris.floor_y.is_finite() {
            return Err(TuningError::Invalid {
                field: "debris.floor_y",
                reason: "must be finite",
            });
        }
        non_negative("debris.kick", self.debris.kick)?;
        non_negative("debris.lift", self.debris.lift)?;
        for spin in self.debris.spin {
            non_negative("debris.spin", spin)?;
        }

        if self.burst.particles == 0 {
            return Err(TuningError::Invalid {
                field: "burst.particles",
                reason: "must be at least 1",
            });
        }
        positive("burst.max_age", self.burst.max_age)?;
        positive("burst.fade_age", self.burst.fade_age)?;
        non_negative("burst.opacity", self.burst.opacity)?;
        non_negative("burst.drop", self.burst.drop)?;
        ordered("burst.upward", self.burst.upward)?;
        ordered("burst.radial", self.burst.radial)?;
        ordered("burst.lifetime", self.burst.lifetime)?;
        Ok(())
    }

    /// Oscillator speed at a given score
    #[inline]
    pub fn speed_at(&self, score: u32) -> f32 {
        self.base_speed + score as f32 * self.speed_increase_per_score
    }
}
