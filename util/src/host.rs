//! Host platform (linux for example) utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;
use uname;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Retrieve uname information.
pub fn get_uname() -> std::io::Result<uname::Info> {
    uname::uname()
}

/// Get the root directory of the ground control software.
///
/// The root is read from the `ROVER_OPS_ROOT` environment variable, which
/// must point at the directory containing `params` and `sessions`.
pub fn get_ops_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var("ROVER_OPS_ROOT").map(PathBuf::from)
}
