//! # Differential drive library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the drive crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Velocity limiter module - keeps body velocity commands within the drive's speed and force
/// capabilities
pub mod vel_limiter;
