//! Panel control module
//!
//! Owns the camera tilt angle, the global PWM speed, and the photo trigger.
//! Tilt and photo stay live in both control modes; the speed controls are
//! hidden, and therefore dead, while automation runs.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lowest commandable camera tilt angle.
///
/// Units: degrees
pub const TILT_MIN_DEG: i32 = 0;

/// Highest commandable camera tilt angle.
///
/// Units: degrees
pub const TILT_MAX_DEG: i32 = 180;

/// Lowest commandable global speed.
///
/// Units: percent
pub const SPEED_MIN_PCT: i32 = 0;

/// Highest commandable global speed.
///
/// Units: percent
pub const SPEED_MAX_PCT: i32 = 100;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during panel control operation.
#[derive(Debug, thiserror::Error)]
pub enum AuxCtrlError {
    #[error("Failed to load the panel control parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Parameter '{0}' is outside its allowed range")]
    ParamOutOfRange(&'static str),
}
