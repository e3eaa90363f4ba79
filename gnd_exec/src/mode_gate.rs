//! Mode gate module
//!
//! The gate owns the manual/automation switch. While automation runs, the
//! command input mapper and the speed controls are disabled; the backend
//! drives itself towards the mission targets captured when the gate opened.
//!
//! There is exactly one trigger, the operator's toggle. No timeout or
//! backend condition flips the gate back, only another explicit toggle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use thiserror::Error;

// Internal
use rover_if::cmd::{Cmd, MissionTarget, MissionTargetError};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The two operator input modes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ControlMode {
    /// Drive surfaces and panel controls feed the rover directly.
    Manual,

    /// The rover runs its automated mission; drive input is gated off.
    Automation,
}

/// A transition produced by a toggle request.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Automation was armed with the given mission target.
    Entered { target: MissionTarget },

    /// Automation was disarmed and manual control restored.
    Exited,
}

/// An outbound request demanded by a mode transition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GateRequest {
    /// Mission distance target. Units: meters
    Distance(f64),

    /// Mission direction target. Units: degrees
    Direction(f64),

    /// A plain command token.
    Cmd(Cmd),
}

/// Possible errors that can occur during mode gate operation.
#[derive(Debug, Error)]
pub enum ModeGateError {
    #[error("Cannot arm automation: {0}")]
    InvalidTarget(#[from] MissionTargetError),

    #[error("Cannot arm automation without mission targets")]
    NoTarget,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Mode gate state.
#[derive(Default)]
pub struct ModeGate {
    mode: ControlMode,

    /// Target of the running mission, kept for the console's mission rows
    mission: Option<MissionTarget>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ControlMode {
    fn default() -> Self {
        ControlMode::Manual
    }
}

impl Transition {
    /// The outbound requests this transition requires, in transmission
    /// order.
    ///
    /// Arming sends the distance target, then the direction target, then
    /// the start command; the backend latches the targets before the start
    /// token arrives.
    pub fn requests(&self) -> Vec<GateRequest> {
        match self {
            Transition::Entered { target } => vec![
                GateRequest::Distance(target.distance_m),
                GateRequest::Direction(target.direction_deg),
                GateRequest::Cmd(Cmd::StartAutomation),
            ],
            Transition::Exited => vec![GateRequest::Cmd(Cmd::StopAutomation)],
        }
    }
}

impl ModeGate {
    /// The current control mode.
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Target of the running mission, `None` while in manual mode.
    pub fn mission(&self) -> Option<MissionTarget> {
        self.mission
    }

    /// Process an operator toggle request.
    ///
    /// Arming requires a mission target, which is validated before the
    /// transition happens; a rejected target leaves the gate in Manual with
    /// nothing transmitted. Disarming needs no data.
    pub fn request_toggle(
        &mut self,
        target: Option<MissionTarget>,
    ) -> Result<Transition, ModeGateError> {
        match self.mode {
            ControlMode::Manual => {
                let target = match target {
                    Some(t) => t,
                    None => return Err(ModeGateError::NoTarget),
                };

                // Validation failure aborts the transition before anything
                // is transmitted
                target.validate()?;

                self.mode = ControlMode::Automation;
                self.mission = Some(target);

                info!(
                    "Automation armed: distance {} m, direction {} deg",
                    target.distance_m, target.direction_deg
                );

                Ok(Transition::Entered { target })
            }
            ControlMode::Automation => {
                self.mode = ControlMode::Manual;
                self.mission = None;

                info!("Automation disarmed, manual control restored");

                Ok(Transition::Exited)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn target(distance_m: f64, direction_deg: f64) -> MissionTarget {
        MissionTarget {
            distance_m,
            direction_deg,
        }
    }

    #[test]
    fn test_initial_mode_is_manual() {
        let gate = ModeGate::default();
        assert_eq!(gate.mode(), ControlMode::Manual);
        assert!(gate.mission().is_none());
    }

    #[test]
    fn test_invalid_distance_aborts_arming() {
        let mut gate = ModeGate::default();

        let result = gate.request_toggle(Some(target(-1.0, 90.0)));

        assert!(result.is_err());
        assert_eq!(gate.mode(), ControlMode::Manual);
        assert!(gate.mission().is_none());
    }

    #[test]
    fn test_invalid_direction_aborts_arming() {
        let mut gate = ModeGate::default();

        let result = gate.request_toggle(Some(target(1.0, 361.0)));

        assert!(result.is_err());
        assert_eq!(gate.mode(), ControlMode::Manual);
    }

    #[test]
    fn test_arming_without_target_is_rejected() {
        let mut gate = ModeGate::default();

        assert!(matches!(
            gate.request_toggle(None),
            Err(ModeGateError::NoTarget)
        ));
        assert_eq!(gate.mode(), ControlMode::Manual);
    }

    #[test]
    fn test_arming_request_order() {
        let mut gate = ModeGate::default();

        let transition = gate.request_toggle(Some(target(2.5, 90.0))).unwrap();

        assert_eq!(gate.mode(), ControlMode::Automation);
        assert_eq!(
            transition.requests(),
            vec![
                GateRequest::Distance(2.5),
                GateRequest::Direction(90.0),
                GateRequest::Cmd(Cmd::StartAutomation),
            ]
        );
    }

    #[test]
    fn test_disarming() {
        let mut gate = ModeGate::default();

        gate.request_toggle(Some(target(2.5, 90.0))).unwrap();
        let transition = gate.request_toggle(None).unwrap();

        assert_eq!(gate.mode(), ControlMode::Manual);
        assert!(gate.mission().is_none());
        assert_eq!(
            transition.requests(),
            vec![GateRequest::Cmd(Cmd::StopAutomation)]
        );
    }

    #[test]
    fn test_boundary_targets_accepted() {
        let mut gate = ModeGate::default();

        // Zero distance and the full-circle direction are both inside the
        // accepted ranges
        let transition = gate.request_toggle(Some(target(0.0, 360.0)));
        assert!(transition.is_ok());
        assert_eq!(gate.mode(), ControlMode::Automation);
    }
}
