//! Drive surface events passed into the command input mapper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use rover_if::cmd::Cmd;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A raw activation/deactivation event on one of the drive control surfaces.
///
/// Key events carry the pressed character so the mapper can apply its own
/// bindings. Pointer events carry the command of the on-screen button they
/// hit, since the console owns the button layout.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DriveEvent {
    /// A key went down. `repeat` is true when the terminal flagged the
    /// event as keyboard auto-repeat rather than a fresh press.
    KeyDown { key: char, repeat: bool },

    /// A key was released.
    KeyUp { key: char },

    /// The pointer pressed an on-screen drive button.
    PointerDown { cmd: Cmd },

    /// The pointer button was released.
    PointerUp,

    /// The pointer left the pressed button while still held.
    PointerLeave,
}
