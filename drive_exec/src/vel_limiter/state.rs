//! Implementations for the VelLimiter state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use serde::Serialize;
use std::path::PathBuf;

// Internal
use super::{
    Params,
    Vector, WheelPair,
    VelLimiterError,
    MASS, MIN_DT_S};
use util::{
    params,
    maths::{clip_both, clip_both_sym},
    module::State,
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Velocity limiter module state.
///
/// Holds only constants derived from the parameters, so limiting a command is
/// a pure function of its inputs. A default limiter has both stages disabled
/// and passes every command through.
#[derive(Debug, Clone, Default)]
pub struct VelLimiter {
    params: Params,

    /// Force bound of a wheel that is speeding up.
    ///
    /// Units: newtons (per unit mass)
    f_wheel_max: f64,

    /// Force bound of a wheel that is slowing down, negative.
    ///
    /// Units: newtons (per unit mass)
    f_wheel_min: f64,

    /// Effective rotational inertia, relating the force difference between
    /// the wheels to angular acceleration.
    inertia: f64,
}

/// Input data to the velocity limiter.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputData {
    /// The command to be limited.
    pub vel_cmd: Vector,

    /// The command output by the limiter on the previous cycle.
    pub vel_cmd_prev: Vector,

    /// Time elapsed since `vel_cmd_prev` was output.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Output command from the velocity limiter, to be sent to the drive.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct OutputData {
    pub vel_cmd: Vector,
}

/// Status report for velocity limiter processing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// The command was a stop and was passed through unlimited.
    pub emergency_stop: bool,

    /// The velocity stage reduced the command.
    pub vel_limited: bool,

    /// The acceleration stage reduced the change in command.
    pub acc_limited: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Where the limiter's parameters come from during `State::init`.
#[derive(Clone, Debug)]
pub enum ParamSource {
    /// A parameter file relative to the `params` directory in the software
    /// root.
    SwRoot(String),

    /// A parameter file at an explicit path.
    Path(PathBuf),

    /// Parameters which have already been loaded.
    Params(Params),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for VelLimiter {
    type InitData = ParamSource;
    type InitError = VelLimiterError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = VelLimiterError;

    /// Initialise the VelLimiter module.
    ///
    /// On any error the limiter keeps its previous configuration.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        let params = match init_data {
            ParamSource::SwRoot(p) => params::load(&p),
            ParamSource::Path(p) => params::load_path(p),
            ParamSource::Params(p) => Ok(p)
        }.map_err(VelLimiterError::ParamLoadError)?;

        self.configure(params)
    }

    /// Perform cyclic processing of the velocity limiter.
    ///
    /// Inputs which would make the limited command meaningless (non-finite
    /// commands, or a non-positive timestep while the acceleration stage is
    /// enabled) are rejected rather than limited.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let InputData { vel_cmd, vel_cmd_prev, dt_s } = *input_data;

        for v in [vel_cmd, vel_cmd_prev].iter() {
            if !v.is_finite() {
                warn!("VelLimiter rejected non-finite command {:?}", v);
                return Err(VelLimiterError::NonFiniteCmd(*v));
            }
        }

        if self.params.has_acceleration_limits && !(dt_s > 0.0 && dt_s.is_finite()) {
            warn!("VelLimiter rejected timestep of {} s", dt_s);
            return Err(VelLimiterError::InvalidTimestep(dt_s));
        }

        let (limited, report) = self.limit_with_report(vel_cmd, vel_cmd_prev, dt_s);

        if !limited.is_finite() {
            warn!("VelLimiter output non-finite command {:?} for {:?}", limited, input_data);
            return Err(VelLimiterError::NonFiniteOutput(limited));
        }

        trace!("VelLimiter output:\n    cmd: {:?}\n    out: {:?}\n    {:?}",
            vel_cmd,
            limited,
            report);

        Ok((OutputData { vel_cmd: limited }, report))
    }
}

impl VelLimiter {

    /// Create a new limiter from the given parameters.
    pub fn new(params: Params) -> Result<Self, VelLimiterError> {
        let mut limiter = Self::default();
        limiter.configure(params)?;
        Ok(limiter)
    }

    /// Validate the parameters and derive the limiter's constants from them.
    ///
    /// Either the whole configuration is accepted or, on error, the limiter is
    /// left exactly as it was.
    pub fn configure(&mut self, params: Params) -> Result<(), VelLimiterError> {
        let sep = params.wheel_separation_m;

        if !(sep > 0.0 && sep.is_finite()) {
            warn!("VelLimiter rejected wheel separation of {} m", sep);
            return Err(VelLimiterError::InvalidWheelSeparation(sep));
        }

        if !params.is_valid() {
            warn!("VelLimiter rejected parameters: {:?}", params);
            return Err(VelLimiterError::InvalidParams(params));
        }

        let mut derived = VelLimiter {
            params,
            ..Default::default()
        };

        if params.has_acceleration_limits {
            derived.f_wheel_max = 0.5 * MASS * params.acc_x_max_mss;
            derived.f_wheel_min = 0.5 * MASS * params.acc_x_min_mss;

            // J * acc_th_max = 2 * f_wheel_max * (sep / 2)
            derived.inertia = sep * derived.f_wheel_max / params.acc_th_max_radss;
        }

        debug!(
            "VelLimiter configured: vel limits {}, acc limits {}, \
            f_wheel = [{}, {}], inertia = {}",
            params.has_velocity_limits,
            params.has_acceleration_limits,
            derived.f_wheel_min,
            derived.f_wheel_max,
            derived.inertia
        );

        *self = derived;

        Ok(())
    }

    /// The parameters the limiter is currently configured with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Limit the command to the enabled limits.
    ///
    /// `vel_cmd_prev` must be the command output on the previous cycle, and
    /// `dt_s` the time since it was output, which must be positive.
    pub fn limit(&self, vel_cmd: Vector, vel_cmd_prev: Vector, dt_s: f64) -> Vector {
        self.limit_with_report(vel_cmd, vel_cmd_prev, dt_s).0
    }

    /// As `limit`, also reporting which stages changed the command.
    pub fn limit_with_report(
        &self,
        vel_cmd: Vector,
        vel_cmd_prev: Vector,
        dt_s: f64
    ) -> (Vector, StatusReport) {
        let mut report = StatusReport::default();

        // A stop is never delayed by the acceleration limits
        if vel_cmd.is_zero() {
            report.emergency_stop = true;
            return (vel_cmd, report);
        }

        let mut cmd = vel_cmd;

        if self.params.has_velocity_limits {
            let (limited, clipped) = self.limit_vel(cmd);
            cmd = limited;
            report.vel_limited = clipped;
        }

        if self.params.has_acceleration_limits {
            let (limited, clipped) = self.limit_acc(cmd, vel_cmd_prev, dt_s);
            cmd = limited;
            report.acc_limited = clipped;
        }

        (cmd, report)
    }

    /// Limit the command to the maximum turn rate and wheel speeds.
    ///
    /// Returns the limited command and whether any clipping happened.
    fn limit_vel(&self, vel_cmd: Vector) -> (Vector, bool) {
        let sep = self.params.wheel_separation_m;
        let vel_x_max = self.params.vel_x_max_ms;
        let vel_th_max = self.params.vel_th_max_rads;

        // Initial downscaling into the body speed limits
        let mut body = vel_cmd;
        let body_scale = clip_both(
            &mut body.x, (-vel_x_max, vel_x_max),
            &mut body.th, (-vel_th_max, vel_th_max)
        );

        // Differential steering can still push one wheel over the limit.
        // Saturating keeps the wheel ratio for turn rates which overflow.
        let mut wheels = body.to_wheels(sep).saturate();
        let wheel_scale = clip_both_sym(
            &mut wheels.left, &mut wheels.right, (-vel_x_max, vel_x_max)
        );

        if wheel_scale == 1.0 {
            return (body, body_scale != 1.0);
        }

        (wheels.to_body(sep), true)
    }

    /// Limit the change from the previous command to the available wheel
    /// forces.
    ///
    /// Returns the limited command and whether any clipping happened.
    fn limit_acc(&self, vel_cmd: Vector, vel_cmd_prev: Vector, dt_s: f64) -> (Vector, bool) {
        debug_assert!(dt_s > 0.0, "VelLimiter timestep must be positive, got {}", dt_s);
        let dt_s = sanitise_dt(dt_s);

        let sep = self.params.wheel_separation_m;

        let acc = ((vel_cmd - vel_cmd_prev) / dt_s).saturate();

        // Wheel forces
        let mut force = WheelPair {
            left: 0.5 * MASS * acc.x - self.inertia * acc.th / sep,
            right: 0.5 * MASS * acc.x + self.inertia * acc.th / sep,
        }.saturate();

        // A wheel whose force acts along its current velocity is speeding up,
        // one at rest counts as speeding up.
        let vel_prev = vel_cmd_prev.to_wheels(sep).saturate();
        let left_mag = self.force_magnitude(force.left * vel_prev.left >= 0.0);
        let right_mag = self.force_magnitude(force.right * vel_prev.right >= 0.0);

        let scale = clip_both(
            &mut force.left, (-left_mag, left_mag),
            &mut force.right, (-right_mag, right_mag)
        );

        if scale == 1.0 {
            return (vel_cmd, false);
        }

        let acc = Vector {
            x: (force.left + force.right) / MASS,
            th: 0.5 * sep / self.inertia * (force.right - force.left),
        };

        (vel_cmd_prev + acc * dt_s, true)
    }

    /// The force bound of a wheel that is speeding up or slowing down.
    fn force_magnitude(&self, accelerating: bool) -> f64 {
        if accelerating {
            self.f_wheel_max
        }
        else {
            -self.f_wheel_min
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Raise the timestep to at least `MIN_DT_S`, with non-finite timesteps
/// replaced by `MIN_DT_S`.
fn sanitise_dt(dt_s: f64) -> f64 {
    if dt_s.is_finite() {
        dt_s.max(MIN_DT_S)
    }
    else {
        MIN_DT_S
    }
}
