//! Drive executable entry point.
//!
//! # Architecture
//!
//! Runs the velocity limiter against a step demand over a number of simulated
//! cycles, so that its behaviour with a given parameter file can be inspected
//! without a rover:
//!
//!     - Initialise the session, logging and the velocity limiter
//!     - Main loop, once per cycle:
//!         - Demand the step command, or a stop once the stop time is reached
//!         - Velocity limiter processing, fed its own previous output
//!         - Archive the demand, output and status report
//!
//! The archive is written to `arch/vel_limiter.csv` in the session directory.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use drive_lib::vel_limiter::{InputData, ParamSource, VelLimiter, Vector};
use util::{
    archive::Archiver,
    logger::{logger_init_with, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "drive_exec",
    about = "Run the velocity limiter against a step demand",
    setting = structopt::clap::AppSettings::AllowNegativeNumbers
)]
struct Opts {
    /// Forward speed demand in meters/second.
    speed_ms: f64,

    /// Turn rate demand in radians/second, positive to the left.
    turn_rate_rads: f64,

    /// Parameter file, relative to the params directory in the software root.
    #[structopt(long, default_value = "vel_limiter.toml")]
    params: String,

    /// Explicit path to the parameter file, overrides `--params`.
    #[structopt(long, parse(from_os_str))]
    params_path: Option<PathBuf>,

    /// Period of one cycle in seconds.
    #[structopt(long, default_value = "0.1")]
    period_s: f64,

    /// Total simulated time in seconds.
    #[structopt(long, default_value = "5.0")]
    duration_s: f64,

    /// Time at which the demand switches to a stop. By default the demand is
    /// held for the whole run.
    #[structopt(long)]
    stop_s: Option<f64>,

    /// Sleep between cycles to run at the cycle period.
    #[structopt(long)]
    realtime: bool,
}

/// One cycle of the archive.
#[derive(Serialize)]
struct CycleRecord {
    time_s: f64,
    dem_x_ms: f64,
    dem_th_rads: f64,
    out_x_ms: f64,
    out_th_rads: f64,
    emergency_stop: bool,
    vel_limited: bool,
    acc_limited: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "drive_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger, the limiter's configuration is logged at debug
    logger_init_with(
        LevelFilter::Info,
        &[("drive_lib::vel_limiter", LevelFilter::Debug)],
        &session
    ).wrap_err("Failed to initialise logging")?;

    info!("Differential Drive Velocity Limiter\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opts);

    let cycle_period = parse_cycle_period(opts.period_s)?;
    if !(opts.duration_s >= 0.0 && opts.duration_s.is_finite()) {
        return Err(eyre!("The duration must not be negative, found {}", opts.duration_s));
    }

    // ---- MODULE INIT ----

    let param_source = match opts.params_path {
        Some(ref p) => ParamSource::Path(p.clone()),
        None => ParamSource::SwRoot(opts.params.clone())
    };

    let mut vel_limiter = VelLimiter::default();
    vel_limiter.init(param_source, &session)
        .wrap_err("Failed to initialise VelLimiter")?;
    info!("VelLimiter init complete");
    info!("    {:#?}", vel_limiter.params());

    let mut archiver = Archiver::from_path(&session, "vel_limiter.csv")
        .wrap_err("Failed to create the VelLimiter archive")?;

    // ---- MAIN LOOP ----

    let demand = Vector::new(opts.speed_ms, opts.turn_rate_rads);
    let stop_s = opts.stop_s.unwrap_or(std::f64::INFINITY);
    let num_cycles = (opts.duration_s / opts.period_s).ceil() as u64;

    info!(
        "Running {} cycles of {} s with demand {:?}, stopping at {} s\n",
        num_cycles, opts.period_s, demand, stop_s
    );

    let mut vel_cmd_prev = Vector::ZERO;
    let mut num_limited_cycles = 0u64;

    for cycle in 0..num_cycles {
        let cycle_start = Instant::now();
        let time_s = cycle as f64 * opts.period_s;

        let vel_cmd = if time_s < stop_s {
            demand
        }
        else {
            Vector::ZERO
        };

        let (output, report) = vel_limiter
            .proc(&InputData {
                vel_cmd,
                vel_cmd_prev,
                dt_s: opts.period_s
            })
            .wrap_err_with(|| format!("VelLimiter processing failed on cycle {}", cycle))?;

        if report.vel_limited || report.acc_limited {
            num_limited_cycles += 1;
        }

        archiver.serialise(CycleRecord {
            time_s,
            dem_x_ms: vel_cmd.x,
            dem_th_rads: vel_cmd.th,
            out_x_ms: output.vel_cmd.x,
            out_th_rads: output.vel_cmd.th,
            emergency_stop: report.emergency_stop,
            vel_limited: report.vel_limited,
            acc_limited: report.acc_limited,
        }).wrap_err("Failed to archive the cycle")?;

        // The output is the next cycle's previous command
        vel_cmd_prev = output.vel_cmd;

        if opts.realtime {
            match cycle_period.checked_sub(cycle_start.elapsed()) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Cycle {} overran by {:.06} s",
                    cycle,
                    (cycle_start.elapsed() - cycle_period).as_secs_f64()
                )
            }
        }
    }

    info!("Final command: {:?}", vel_cmd_prev);
    info!("{} of {} cycles were limited", num_limited_cycles, num_cycles);
    info!("End of execution");

    Ok(())
}

/// Convert the cycle period option into a `Duration`, which must be positive
/// and representable.
fn parse_cycle_period(period_s: f64) -> Result<Duration, Report> {
    if !(period_s > 0.0) {
        return Err(eyre!("The cycle period must be positive, found {}", period_s));
    }

    Duration::try_from_secs_f64(period_s)
        .map_err(|e| eyre!("Invalid cycle period of {} s: {}", period_s, e))
}
