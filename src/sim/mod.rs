//! Per-dot spring-damper simulation.

/// Retarget bursts and multiplier bounds.
pub mod burst;
/// Physics constants.
pub mod config;
/// Dot state and per-dot motion terms.
pub mod dot;
/// The simulation itself.
pub mod engine;
/// Lifecycle phase machine.
pub mod phase;

pub use burst::{Burst, Multipliers, RetargetMode, RetargetOptions};
pub use config::SimConfig;
pub use dot::Dot;
pub use engine::Simulation;
pub use phase::{Phase, PhaseMachine};
