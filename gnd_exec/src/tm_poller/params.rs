//! Parameters structure for the telemetry poller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the telemetry poller.
#[derive(Debug, Deserialize)]
pub struct Params {
    /// Interval between motion telemetry pulls.
    ///
    /// Units: milliseconds
    pub motion_interval_ms: u64,

    /// Interval between pose telemetry pulls.
    ///
    /// Units: milliseconds
    pub pose_interval_ms: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            motion_interval_ms: 200,
            pose_interval_ms: 200,
        }
    }
}
