//! Shared primitives: geometry re-exports, errors, math helpers and the seeded RNG.

/// Geometry and frame types.
pub mod core;
/// Error type and result alias.
pub mod error;
/// Scalar and point interpolation helpers.
pub mod math;
/// Deterministic string-keyed random streams.
pub mod rng;
