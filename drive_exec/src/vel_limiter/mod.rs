//! Velocity limiter module
//!
//! Limits a body-frame velocity command (forward speed `x`, turn rate `th`) for
//! a differential drive so that it respects the maximum wheel speed, the
//! maximum turn rate and the force each wheel can apply when speeding up or
//! slowing down. Limiting is done by proportional downscaling so the curvature
//! of the commanded path is kept.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;
mod vector;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;
pub use vector::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Effective mass of the rover.
///
/// The force model is normalised so only the ratio of force to mass matters,
/// hence this is a unit constant rather than a parameter.
pub const MASS: f64 = 1.0;

/// Smallest timestep used by the acceleration limit stage. Smaller (or
/// non-positive) timesteps are raised to this value.
///
/// Units: seconds
pub const MIN_DT_S: f64 = 1e-6;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during VelLimiter operation.
#[derive(Debug, thiserror::Error)]
pub enum VelLimiterError {
    #[error("Could not load the parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("The wheel separation must be positive, found {0}")]
    InvalidWheelSeparation(f64),

    #[error("The enabled limits are inconsistent: {0:#?}")]
    InvalidParams(Params),

    #[error("The timestep must be positive and finite, found {0}")]
    InvalidTimestep(f64),

    #[error("Velocity commands must be finite, found {0:?}")]
    NonFiniteCmd(Vector),

    #[error("The limited command was not finite: {0:?}")]
    NonFiniteOutput(Vector),
}
