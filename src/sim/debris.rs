//! Falling debris: severed overhangs under constant gravity
//!
//! A fixed kinematic integrator, not a rigid-body solver. Pieces never
//! collide with anything; they spin freely and are dropped once they sink
//! below the floor threshold.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Axis, Block};
use crate::Span;
use crate::tuning::{DebrisTuning, Tuning};

/// Remainders thinner than this are not worth simulating
const MIN_DEBRIS_SIZE: f32 = 0.001;

/// A severed cuboid in free fall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisPiece {
    pub pos: Vec3,
    /// Full extents (x, height, z)
    pub size: Vec3,
    pub vel: Vec3,
    /// Euler angles (radians)
    pub rotation: Vec3,
    pub angular_vel: Vec3,
    /// Inherited from the block it was cut from
    pub hue: f32,
}

impl DebrisPiece {
    /// Semi-implicit Euler step
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.vel.y -= gravity * dt;
        self.pos += self.vel * dt;
        self.rotation += self.angular_vel * dt;
    }
}

/// All live debris pieces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebrisField {
    pieces: Vec<DebrisPiece>,
}

impl DebrisField {
    pub fn pieces(&self) -> &[DebrisPiece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    /// Turn the cut-away part of `placed` into a falling piece.
    ///
    /// `remainder` is the severed span on `axis`; the other axis keeps the
    /// placed block's footprint. The piece is kicked away from the kept part.
    pub fn spawn_remainder<R: Rng>(
        &mut self,
        placed: &Block,
        axis: Axis,
        remainder: Span,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        if remainder.size <= MIN_DEBRIS_SIZE {
            return;
        }

        let mut cut = placed.clone();
        cut.set_span(axis, remainder);
        let kick = if placed.center(axis) - remainder.center > 0.0 {
            -tuning.debris.kick
        } else {
            tuning.debris.kick
        };

        let vel = match axis {
            Axis::X => Vec3::new(kick, tuning.debris.lift, 0.0),
            Axis::Z => Vec3::new(0.0, tuning.debris.lift, kick),
        };
        let [sx, sy, sz] = tuning.debris.spin;
        let angular_vel = Vec3::new(
            sx * rng.random_range(-1.0f32..=1.0),
            sy * rng.random_range(-1.0f32..=1.0),
            sz * rng.random_range(-1.0f32..=1.0),
        );

        log::trace!(
            "Debris {:.2} wide at {:.2} on {:?}",
            remainder.size,
            remainder.center,
            axis
        );
        self.pieces.push(DebrisPiece {
            pos: Vec3::new(cut.center_x, cut.y, cut.center_z),
            size: Vec3::new(cut.size_x, tuning.block_height, cut.size_z),
            vel,
            rotation: Vec3::ZERO,
            angular_vel,
            hue: placed.hue,
        });
    }

    /// Integrate every piece and drop the ones below the floor
    pub fn update(&mut self, tuning: &DebrisTuning, dt: f32) {
        for piece in &mut self.pieces {
            piece.integrate(tuning.gravity, dt);
        }
        self.pieces.retain(|p| p.pos.y > tuning.floor_y);
    }
}
