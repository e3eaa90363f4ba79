//! # Rover telemetry definitions
//!
//! Snapshots pulled from the backend's two read-only telemetry endpoints.
//! Both are plain JSON objects of numbers, refreshed by the backend from the
//! encoder serial stream and the odometry integrator.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Motion telemetry snapshot returned by `/get_encoder_data`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionTm {
    /// Left side wheel rate.
    ///
    /// Units: revolutions/minute
    pub rpm1: f64,

    /// Left side ground speed.
    ///
    /// Units: meters/second
    pub speed1: f64,

    /// Right side wheel rate.
    ///
    /// Units: revolutions/minute
    pub rpm2: f64,

    /// Right side ground speed.
    ///
    /// Units: meters/second
    pub speed2: f64,

    /// IMU pitch angle.
    ///
    /// Units: degrees
    pub pitch: f64,

    /// IMU roll angle.
    ///
    /// Units: degrees
    pub roll: f64,
}

/// Odometry pose snapshot returned by `/get_pose`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseTm {
    /// Position along the odometry frame's x axis.
    ///
    /// Units: meters
    pub x: f64,

    /// Position along the odometry frame's y axis.
    ///
    /// Units: meters
    pub y: f64,

    /// Heading in the odometry frame.
    ///
    /// Units: degrees
    pub theta: f64,

    /// Total absolute distance travelled since the backend started.
    ///
    /// Units: meters
    pub distance: f64,
}
