//! Render projection
//!
//! Maps committed simulation state into flat, GPU-ready instance records.
//! Strictly one-directional: nothing here is read back by the simulation.

pub mod instance;

pub use instance::{BlockInstance, Frame, ParticleVertex, colors, project};
