//! Host platform (linux for example) utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable holding the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "DIFF_DRIVE_SW_ROOT";

/// Get the root directory of the software, as set by the `DIFF_DRIVE_SW_ROOT`
/// environment variable.
///
/// Parameter files are found under `<root>/params`, and sessions are created
/// under `<root>/<sessions_dir>`.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
