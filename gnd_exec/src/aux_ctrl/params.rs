//! Parameters structure for the panel controls

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the panel controls.
#[derive(Debug, Deserialize)]
pub struct Params {
    /// Step applied by the speed up/down controls.
    ///
    /// Units: percent
    pub speed_step_pct: i32,

    /// Step applied by the tilt up/down controls.
    ///
    /// Units: degrees
    pub tilt_step_deg: i32,

    /// Angle commanded by the tilt centre control.
    ///
    /// Units: degrees
    pub tilt_centre_deg: i32,

    /// Speed displayed and pushed to the backend on startup.
    ///
    /// Units: percent
    pub initial_speed_pct: i32,

    /// Tilt angle displayed and pushed to the backend on startup.
    ///
    /// Units: degrees
    pub initial_tilt_deg: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            speed_step_pct: 5,
            tilt_step_deg: 5,
            tilt_centre_deg: 90,
            initial_speed_pct: 50,
            initial_tilt_deg: 90,
        }
    }
}
