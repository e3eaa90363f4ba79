//! # Rover command definitions
//!
//! This module provides the command tokens understood by the rover's
//! `/send_command` endpoint, along with the mission target data sent when
//! arming the automation system.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command token accepted by the rover's control backend.
///
/// The backend treats movement commands as continuous: a movement token
/// starts the corresponding manouvre and the rover keeps executing it until
/// a `Stop` is received.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cmd {
    /// Drive forwards at the current global speed.
    Forward,

    /// Drive backwards at the current global speed.
    Backward,

    /// Skid-steer turn to the left.
    Left,

    /// Skid-steer turn to the right.
    Right,

    /// Stop all drive motors.
    Stop,

    /// Begin the automated mission using the previously sent targets.
    StartAutomation,

    /// Abort the automated mission and return control to the operator.
    StopAutomation,
}

/// Possible mission target validation errors.
#[derive(Debug, Error)]
pub enum MissionTargetError {
    #[error("Mission distance must be a non-negative number of meters (got {0})")]
    InvalidDistance(f64),

    #[error("Mission direction must be between 0 and 360 degrees (got {0})")]
    InvalidDirection(f64),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Targets for an automated mission, captured at the moment automation is
/// armed.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionTarget {
    /// The distance the rover should cover.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// The heading the rover should travel along.
    ///
    /// Units: degrees, in [0, 360]
    pub direction_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Cmd {
    /// The wire token for this command, exactly as the backend expects it.
    pub fn as_token(&self) -> &'static str {
        match self {
            Cmd::Forward => "forward",
            Cmd::Backward => "backward",
            Cmd::Left => "left",
            Cmd::Right => "right",
            Cmd::Stop => "stop",
            Cmd::StartAutomation => "start_automation",
            Cmd::StopAutomation => "stop_automation",
        }
    }

    /// Determine if the command is one of the four directional drive
    /// commands.
    pub fn is_movement(&self) -> bool {
        match self {
            Cmd::Forward | Cmd::Backward | Cmd::Left | Cmd::Right => true,
            _ => false,
        }
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

impl MissionTarget {
    /// Determine if the target is valid (i.e. within the accepted ranges).
    ///
    /// Distance must be finite and non-negative, direction must be finite
    /// and within [0, 360] degrees.
    pub fn validate(&self) -> Result<(), MissionTargetError> {
        if !self.distance_m.is_finite() || self.distance_m < 0.0 {
            return Err(MissionTargetError::InvalidDistance(self.distance_m));
        }

        if !self.direction_deg.is_finite()
            || self.direction_deg < 0.0
            || self.direction_deg > 360.0
        {
            return Err(MissionTargetError::InvalidDirection(self.direction_deg));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wire_tokens() {
        assert_eq!(Cmd::Forward.as_token(), "forward");
        assert_eq!(Cmd::StartAutomation.as_token(), "start_automation");
        assert_eq!(Cmd::StopAutomation.as_token(), "stop_automation");

        // Serde must produce the same tokens as as_token, since both end up
        // on the wire
        for cmd in [
            Cmd::Forward, Cmd::Backward, Cmd::Left, Cmd::Right,
            Cmd::Stop, Cmd::StartAutomation, Cmd::StopAutomation
        ].iter() {
            assert_eq!(
                serde_json::to_value(cmd).unwrap(),
                serde_json::Value::String(cmd.as_token().into())
            );
        }
    }

    #[test]
    fn test_movement_cmds() {
        assert!(Cmd::Forward.is_movement());
        assert!(Cmd::Right.is_movement());
        assert!(!Cmd::Stop.is_movement());
        assert!(!Cmd::StartAutomation.is_movement());
    }

    #[test]
    fn test_mission_target_validation() {
        assert!(MissionTarget { distance_m: 2.5, direction_deg: 90.0 }
            .validate()
            .is_ok());
        assert!(MissionTarget { distance_m: 0.0, direction_deg: 0.0 }
            .validate()
            .is_ok());
        assert!(MissionTarget { distance_m: 0.0, direction_deg: 360.0 }
            .validate()
            .is_ok());

        assert!(matches!(
            MissionTarget { distance_m: -1.0, direction_deg: 90.0 }.validate(),
            Err(MissionTargetError::InvalidDistance(_))
        ));
        assert!(matches!(
            MissionTarget { distance_m: 1.0, direction_deg: 361.0 }.validate(),
            Err(MissionTargetError::InvalidDirection(_))
        ));
        assert!(matches!(
            MissionTarget {
                distance_m: f64::NAN,
                direction_deg: 90.0
            }
            .validate(),
            Err(MissionTargetError::InvalidDistance(_))
        ));
    }
}
