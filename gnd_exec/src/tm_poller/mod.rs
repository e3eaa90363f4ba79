//! Telemetry poller module
//!
//! Two independent pull loops, one per telemetry endpoint, each on its own
//! fixed-interval timer for the lifetime of the executable. A failed pull
//! clears that stream's displayed snapshot and never stops either timer;
//! the streams cannot affect each other or any other module.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use rover_if::net::{RoverClient, RoverClientError};
use rover_if::tm::{MotionTm, PoseTm};

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Source of telemetry snapshots.
///
/// The rover client implements this against the backend; tests implement it
/// with canned snapshots.
pub trait TmFetch {
    fn motion_tm(&self) -> Result<MotionTm, RoverClientError>;

    fn pose_tm(&self) -> Result<PoseTm, RoverClientError>;
}

impl TmFetch for RoverClient {
    fn motion_tm(&self) -> Result<MotionTm, RoverClientError> {
        self.get_motion_tm()
    }

    fn pose_tm(&self) -> Result<PoseTm, RoverClientError> {
        self.get_pose_tm()
    }
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during telemetry poller operation.
#[derive(Debug, thiserror::Error)]
pub enum TmPollerError {
    #[error("Failed to load the poller parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Failed to create a telemetry archive: {0}")]
    ArchiveInitError(String),
}
