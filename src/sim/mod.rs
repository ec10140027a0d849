//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Clamped frame delta, no sub-stepping
//! - No rendering, audio or persistence dependencies

pub mod burst;
pub mod debris;
pub mod drop;
pub mod oscillator;
pub mod state;
pub mod tick;
pub mod tower;

pub use burst::{BurstField, Particle, ParticleBurst};
pub use debris::{DebrisField, DebrisPiece};
pub use drop::{DropOutcome, resolve_drop};
pub use oscillator::{movement_range, oscillate};
pub use state::{Axis, Block, RunPhase, SimEvent, SimState, Snapshot};
pub use tick::{TickInput, clamp_dt, tick};
pub use tower::{Placement, Tower};
