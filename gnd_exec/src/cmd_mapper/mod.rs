//! Command input mapper module
//!
//! Translates raw activation/deactivation events on the drive control
//! surfaces (bound keys and on-screen buttons) into rover command tokens.
//!
//! The mapper guarantees:
//! - one activation transmission per physical hold, however many down
//!   events the terminal delivers for it,
//! - exactly one `stop` per hold on release, however many release events
//!   fire for it,
//! - silence while the mode gate has manual control disabled.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod events;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use events::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during command input mapper operation.
#[derive(Debug, thiserror::Error)]
pub enum CmdMapperError {
    #[error("Failed to load the mapper parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Drive key '{0}' is bound to more than one surface")]
    DuplicateBinding(char),
}
