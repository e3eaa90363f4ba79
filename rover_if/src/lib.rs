//! # Rover interface crate.
//!
//! Provides the command, telemetry, and network interfaces between the
//! ground control software and the rover's control backend.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod cmd;

/// Telemetry snapshot definitions
pub mod tm;

/// Network module
pub mod net;
