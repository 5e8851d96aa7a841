//! Parameters structure for VelLimiter

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the velocity limiter.
///
/// Only the limits of enabled stages need to be given, the others are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Distance between the left and right drive wheels.
    ///
    /// Units: meters
    pub wheel_separation_m: f64,

    // ---- ENABLES ----

    /// If true commands are limited to the maximum speeds.
    #[serde(default)]
    pub has_velocity_limits: bool,

    /// If true changes in command are limited to the maximum wheel forces.
    #[serde(default)]
    pub has_acceleration_limits: bool,

    // ---- VELOCITY LIMITS ----

    /// Maximum forward speed of the body and of each wheel.
    ///
    /// Units: meters/second
    #[serde(default)]
    pub vel_x_max_ms: f64,

    /// Maximum turn rate of the body. Defaults to no limit.
    ///
    /// Units: radians/second
    #[serde(default = "no_limit")]
    pub vel_th_max_rads: f64,

    // ---- ACCELERATION LIMITS ----

    /// Maximum forward acceleration (positive).
    ///
    /// Units: meters/second^2
    #[serde(default)]
    pub acc_x_max_mss: f64,

    /// Maximum forward deceleration (negative).
    ///
    /// Units: meters/second^2
    #[serde(default)]
    pub acc_x_min_mss: f64,

    /// Maximum angular acceleration (positive).
    ///
    /// Units: radians/second^2
    #[serde(default)]
    pub acc_th_max_radss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            wheel_separation_m: 0.0,
            has_velocity_limits: false,
            has_acceleration_limits: false,
            vel_x_max_ms: 0.0,
            vel_th_max_rads: no_limit(),
            acc_x_max_mss: 0.0,
            acc_x_min_mss: 0.0,
            acc_th_max_radss: 0.0,
        }
    }
}

impl Params {

    /// Determine if the limits of the enabled stages are consistent.
    ///
    /// The acceleration limits must also be finite, as they set the wheel
    /// force bounds and the effective inertia. The turn rate limit may be
    /// infinite (no limit).
    ///
    /// The wheel separation is not checked here, it is required whichever
    /// stages are enabled and is checked when the limiter is configured.
    pub fn is_valid(&self) -> bool {
        let acc_valid = !self.has_acceleration_limits || (
            self.acc_x_max_mss > 0.0
            && self.acc_x_min_mss < 0.0
            && self.acc_th_max_radss > 0.0
            && self.acc_x_max_mss.is_finite()
            && self.acc_x_min_mss.is_finite()
            && self.acc_th_max_radss.is_finite()
        );

        let vel_valid = !self.has_velocity_limits || (
            self.vel_x_max_ms > 0.0
            && self.vel_th_max_rads > 0.0
        );

        acc_valid && vel_valid
    }
}

/// The turn rate limit used when none is given.
fn no_limit() -> f64 {
    std::f64::INFINITY
}
