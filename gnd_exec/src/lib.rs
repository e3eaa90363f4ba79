//! Ground control library
//!
//! Processing modules for the ground control executable. The executable's
//! main loop wires these together; everything here is plain state that can
//! be driven (and tested) without a terminal or a backend.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Panel controls (camera tilt, global speed, photo)
pub mod aux_ctrl;

/// Command input mapper
pub mod cmd_mapper;

/// Terminal console (input translation and dashboard rendering)
pub mod console;

/// Global data store for the executable
pub mod data_store;

/// Manual/automation mode gate
pub mod mode_gate;

/// Telemetry poller
pub mod tm_poller;
