//! Parameters structure for the console

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Key bindings claimed by the console.
///
/// Any key not bound here is forwarded to the command input mapper, which
/// carries its own drive bindings.
#[derive(Debug, Deserialize)]
pub struct Params {
    /// Tilt the camera up by one step
    pub tilt_up_key: char,

    /// Tilt the camera down by one step
    pub tilt_down_key: char,

    /// Return the camera tilt to its centre angle
    pub tilt_centre_key: char,

    /// Raise the global speed by one step
    pub speed_up_key: char,

    /// Lower the global speed by one step
    pub speed_down_key: char,

    /// Open the direct speed entry prompt
    pub speed_set_key: char,

    /// Capture a photo
    pub photo_key: char,

    /// Toggle automation mode
    pub mode_toggle_key: char,

    /// Quit the console
    pub quit_key: char,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            tilt_up_key: 'q',
            tilt_down_key: 'e',
            tilt_centre_key: 'c',
            speed_up_key: ']',
            speed_down_key: '[',
            speed_set_key: 'v',
            photo_key: 'p',
            mode_toggle_key: 'm',
            quit_key: 'x',
        }
    }
}
