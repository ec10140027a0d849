//! Simulation context and core record types
//!
//! `SimState` owns everything the core mutates: the tower, the debris and
//! burst fields, the run phase and the pending event queue. Collaborators
//! drive it through the command methods below and `tick`, and read it
//! through `snapshot`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::burst::{BurstField, ParticleBurst};
use super::debris::{DebrisField, DebrisPiece};
use super::drop::{DropOutcome, resolve_drop};
use super::tower::Tower;
use crate::Span;
use crate::tuning::Tuning;

/// Horizontal axis the active block travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Z,
}

impl Axis {
    /// The other horizontal axis
    pub fn flip(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

/// Run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Before the first run
    #[default]
    Idle,
    /// Oscillator and drops active
    Playing,
    /// Run suspended; effects keep animating
    Paused,
    /// Missed drop; tower frozen until the next start/reset
    GameOver,
}

/// A placed or active cuboid on the tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub size_x: f32,
    pub size_z: f32,
    pub center_x: f32,
    pub center_z: f32,
    /// Height level (a multiple of the block height)
    pub y: f32,
    pub is_moving: bool,
    /// +1.0 or -1.0 while moving
    pub direction: f32,
    /// Remaining settle-pulse time (seconds)
    pub pulse: f32,
    /// Colour hue in 0..1
    pub hue: f32,
}

impl Block {
    pub fn center(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.center_x,
            Axis::Z => self.center_z,
        }
    }

    pub fn size(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.size_x,
            Axis::Z => self.size_z,
        }
    }

    pub fn span(&self, axis: Axis) -> Span {
        Span::new(self.center(axis), self.size(axis))
    }

    pub fn set_center(&mut self, axis: Axis, center: f32) {
        match axis {
            Axis::X => self.center_x = center,
            Axis::Z => self.center_z = center,
        }
    }

    pub fn set_span(&mut self, axis: Axis, span: Span) {
        match axis {
            Axis::X => {
                self.center_x = span.center;
                self.size_x = span.size;
            }
            Axis::Z => {
                self.center_z = span.center;
                self.size_z = span.size;
            }
        }
    }

    /// Count down the settle pulse
    pub fn decay_pulse(&mut self, dt: f32) {
        if self.pulse > 0.0 {
            self.pulse = (self.pulse - dt).max(0.0);
        }
    }

    /// Vertical scale factor for the settle animation (1.0 when at rest)
    pub fn pulse_scale(&self, duration: f32) -> f32 {
        if self.pulse <= 0.0 || duration <= 0.0 {
            return 1.0;
        }
        let t = (self.pulse / duration).min(1.0);
        1.0 + 0.06 * ((1.0 - t) * std::f32::consts::PI).sin()
    }
}

/// Outcome events for external reducers (challenges, stats, audio)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// A fresh run began; any run in progress was discarded
    RunStart,
    /// A drop was committed (perfect or partial)
    PlacedBlock,
    /// A perfect drop was committed
    Perfect { streak: u32 },
    /// The run ended on a miss
    RunEnd { score: u32 },
}

/// Read-only view for rendering and UI
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: RunPhase,
    pub score: u32,
    pub perfect_streak: u32,
    pub axis: Axis,
    pub blocks: &'a [Block],
    pub debris: &'a [DebrisPiece],
    pub bursts: &'a [ParticleBurst],
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct SimState {
    pub tuning: Tuning,
    /// Seed every run restarts its RNG from
    pub seed: u64,
    pub phase: RunPhase,
    pub tower: Tower,
    pub debris: DebrisField,
    pub bursts: BurstField,
    /// Seconds simulated since construction
    pub time: f32,
    rng: Pcg32,
    events: Vec<SimEvent>,
}

impl SimState {
    /// Create an idle simulation with a populated tower
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tower = Tower::new(&tuning);
        Self {
            tuning,
            seed,
            phase: RunPhase::Idle,
            tower,
            debris: DebrisField::default(),
            bursts: BurstField::default(),
            time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Idle/GameOver -> Playing with a fresh tower. No-op otherwise.
    pub fn start_run(&mut self) {
        match self.phase {
            RunPhase::Idle | RunPhase::GameOver => self.reset_run(),
            RunPhase::Playing | RunPhase::Paused => {}
        }
    }

    /// Discard the current run unconditionally and start playing a fresh one
    pub fn reset_run(&mut self) {
        self.tower.reset(&self.tuning);
        self.debris.clear();
        self.bursts.clear();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.phase = RunPhase::Playing;
        self.events.push(SimEvent::RunStart);
        log::info!("Run started (seed {})", self.seed);
    }

    pub fn pause(&mut self) {
        if self.phase == RunPhase::Playing {
            self.phase = RunPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == RunPhase::Paused {
            self.phase = RunPhase::Playing;
        }
    }

    /// Resolve the active block against its support and commit the result.
    /// Ignored unless playing.
    pub fn trigger_drop(&mut self) {
        if self.phase != RunPhase::Playing {
            return;
        }
        let axis = self.tower.axis;
        let (active, support) = match (self.tower.active(), self.tower.support()) {
            (Some(active), Some(support)) => (active.span(axis), support.span(axis)),
            _ => return,
        };

        let outcome = resolve_drop(
            active,
            support,
            self.tuning.perfect_tolerance,
            self.tuning.overlap_epsilon,
        );

        if outcome == DropOutcome::Miss {
            self.phase = RunPhase::GameOver;
            self.events.push(SimEvent::RunEnd {
                score: self.tower.score,
            });
            log::info!("Run over: score {}", self.tower.score);
            return;
        }

        let Some(placement) = self.tower.commit(&outcome, &self.tuning) else {
            return;
        };
        let placed = &placement.block;
        let burst_origin = glam::Vec3::new(
            placed.center_x,
            placed.y + self.tuning.burst.height,
            placed.center_z,
        );

        self.events.push(SimEvent::PlacedBlock);
        match outcome {
            DropOutcome::Perfect { .. } => {
                self.events.push(SimEvent::Perfect {
                    streak: self.tower.perfect_streak,
                });
                self.bursts.spawn(
                    burst_origin,
                    self.tuning.burst.perfect_color,
                    &self.tuning.burst,
                    &mut self.rng,
                );
            }
            DropOutcome::Partial { remainder, .. } => {
                self.debris
                    .spawn_remainder(placed, axis, remainder, &self.tuning, &mut self.rng);
            }
            DropOutcome::Miss => {}
        }

        if placement.grew {
            self.bursts.spawn(
                burst_origin,
                self.tuning.burst.grow_color,
                &self.tuning.burst,
                &mut self.rng,
            );
        }

        log::debug!(
            "Placed block {}: {:?} score={} streak={}",
            placement.index,
            outcome,
            self.tower.score,
            self.tower.perfect_streak
        );
    }

    /// Drain pending events in emission order
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    /// Events emitted since the last drain
    pub fn pending_events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.tower.score,
            perfect_streak: self.tower.perfect_streak,
            axis: self.tower.axis,
            blocks: &self.tower.blocks,
            debris: self.debris.pieces(),
            bursts: self.bursts.bursts(),
        }
    }
}
