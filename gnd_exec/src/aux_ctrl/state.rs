//! Implementations for the panel control state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{
    AuxCtrlError, Params, SPEED_MAX_PCT, SPEED_MIN_PCT, TILT_MAX_DEG, TILT_MIN_DEG,
};
use crate::mode_gate::ControlMode;
use util::{maths::step_clamped, module::State, params, session::Session};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A panel action arriving from the console.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AuxEvent {
    /// Tilt the camera up by one step
    TiltUp,

    /// Tilt the camera down by one step
    TiltDown,

    /// Return the camera tilt to its centre angle
    TiltCentre,

    /// Raise the global speed by one step
    SpeedUp,

    /// Lower the global speed by one step
    SpeedDown,

    /// Direct speed entry from the console's prompt. Units: percent
    SetSpeed(i32),

    /// Capture a photo
    Photo,
}

/// An outbound request produced by the panel controls.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AuxRequest {
    /// New camera tilt angle demand. Units: degrees
    Angle(i32),

    /// New global speed demand. Units: percent
    Speed(i32),

    /// Photo capture request
    Photo,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Panel control module state
#[derive(Default)]
pub struct AuxCtrl {
    pub(crate) params: Params,

    report: StatusReport,

    /// Displayed global PWM speed. Units: percent
    speed_pct: i32,

    /// Displayed camera tilt angle. Units: degrees
    tilt_deg: i32,
}

/// Input data to the panel controls.
#[derive(Default)]
pub struct InputData {
    /// The current control mode; speed actions are dead under Automation.
    pub mode: ControlMode,

    /// The cycle's panel actions, in arrival order.
    pub events: Vec<AuxEvent>,
}

/// Output data from the panel controls.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OutputData {
    /// Requests to transmit this cycle, in order.
    pub requests: Vec<AuxRequest>,
}

/// Status report for panel control processing.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusReport {
    /// A direct speed entry rejected this cycle, with the offending value.
    /// The displayed speed keeps its previous value.
    pub rejected_speed: Option<i32>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for AuxCtrl {
    type InitData = &'static str;
    type InitError = AuxCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = AuxCtrlError;

    /// Initialise the panel controls.
    ///
    /// Expected init data is the name of the parameter file.
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        self.params = params::load(init_data)?;

        if self.params.speed_step_pct <= 0 {
            return Err(AuxCtrlError::ParamOutOfRange("speed_step_pct"));
        }
        if self.params.tilt_step_deg <= 0 {
            return Err(AuxCtrlError::ParamOutOfRange("tilt_step_deg"));
        }
        if self.params.tilt_centre_deg < TILT_MIN_DEG
            || self.params.tilt_centre_deg > TILT_MAX_DEG
        {
            return Err(AuxCtrlError::ParamOutOfRange("tilt_centre_deg"));
        }
        if self.params.initial_speed_pct < SPEED_MIN_PCT
            || self.params.initial_speed_pct > SPEED_MAX_PCT
        {
            return Err(AuxCtrlError::ParamOutOfRange("initial_speed_pct"));
        }
        if self.params.initial_tilt_deg < TILT_MIN_DEG
            || self.params.initial_tilt_deg > TILT_MAX_DEG
        {
            return Err(AuxCtrlError::ParamOutOfRange("initial_tilt_deg"));
        }

        self.speed_pct = self.params.initial_speed_pct;
        self.tilt_deg = self.params.initial_tilt_deg;

        Ok(())
    }

    /// Perform cyclic processing of the panel controls.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        self.report = StatusReport::default();

        let mut output = OutputData::default();

        for event in input_data.events.iter() {
            match *event {
                AuxEvent::TiltUp => {
                    self.tilt_deg = step_clamped(
                        self.tilt_deg,
                        self.params.tilt_step_deg,
                        TILT_MIN_DEG,
                        TILT_MAX_DEG,
                    );
                    output.requests.push(AuxRequest::Angle(self.tilt_deg));
                }
                AuxEvent::TiltDown => {
                    self.tilt_deg = step_clamped(
                        self.tilt_deg,
                        -self.params.tilt_step_deg,
                        TILT_MIN_DEG,
                        TILT_MAX_DEG,
                    );
                    output.requests.push(AuxRequest::Angle(self.tilt_deg));
                }
                AuxEvent::TiltCentre => {
                    self.tilt_deg = self.params.tilt_centre_deg;
                    output.requests.push(AuxRequest::Angle(self.tilt_deg));
                }
                AuxEvent::SpeedUp => {
                    if input_data.mode == ControlMode::Manual {
                        self.speed_pct = step_clamped(
                            self.speed_pct,
                            self.params.speed_step_pct,
                            SPEED_MIN_PCT,
                            SPEED_MAX_PCT,
                        );
                        output.requests.push(AuxRequest::Speed(self.speed_pct));
                    }
                }
                AuxEvent::SpeedDown => {
                    if input_data.mode == ControlMode::Manual {
                        self.speed_pct = step_clamped(
                            self.speed_pct,
                            -self.params.speed_step_pct,
                            SPEED_MIN_PCT,
                            SPEED_MAX_PCT,
                        );
                        output.requests.push(AuxRequest::Speed(self.speed_pct));
                    }
                }
                AuxEvent::SetSpeed(value) => {
                    if input_data.mode == ControlMode::Manual {
                        if (SPEED_MIN_PCT..=SPEED_MAX_PCT).contains(&value) {
                            self.speed_pct = value;
                            output.requests.push(AuxRequest::Speed(self.speed_pct));
                        } else {
                            // The displayed value stays put, the console
                            // tells the operator why
                            self.report.rejected_speed = Some(value);
                        }
                    }
                }
                AuxEvent::Photo => {
                    output.requests.push(AuxRequest::Photo);
                }
            }
        }

        Ok((output, self.report))
    }
}

impl AuxCtrl {
    /// The displayed global PWM speed. Units: percent
    pub fn speed_pct(&self) -> i32 {
        self.speed_pct
    }

    /// The displayed camera tilt angle. Units: degrees
    pub fn tilt_deg(&self) -> i32 {
        self.tilt_deg
    }

    /// Zero the displayed speed after a drive stop.
    ///
    /// Nothing is transmitted, the backend's stop already zeroes the drive.
    pub fn reset_speed(&mut self) {
        self.speed_pct = 0;
    }

    /// The angle/speed push made once on startup to synchronise the backend
    /// with the displayed values.
    pub fn initial_requests(&self) -> Vec<AuxRequest> {
        vec![
            AuxRequest::Angle(self.tilt_deg),
            AuxRequest::Speed(self.speed_pct),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn proc(
        ctrl: &mut AuxCtrl,
        mode: ControlMode,
        events: Vec<AuxEvent>,
    ) -> (OutputData, StatusReport) {
        let (output, report) = ctrl.proc(&InputData { mode, events }).unwrap();
        (output, report)
    }

    fn ctrl_at(speed_pct: i32, tilt_deg: i32) -> AuxCtrl {
        let mut ctrl = AuxCtrl::default();
        ctrl.speed_pct = speed_pct;
        ctrl.tilt_deg = tilt_deg;
        ctrl
    }

    #[test]
    fn test_speed_steps_clamp() {
        let mut ctrl = ctrl_at(98, 90);

        let (output, _) = proc(&mut ctrl, ControlMode::Manual, vec![AuxEvent::SpeedUp]);
        assert_eq!(ctrl.speed_pct(), 100);
        assert_eq!(output.requests, vec![AuxRequest::Speed(100)]);

        let mut ctrl = ctrl_at(2, 90);

        let (output, _) = proc(&mut ctrl, ControlMode::Manual, vec![AuxEvent::SpeedDown]);
        assert_eq!(ctrl.speed_pct(), 0);
        assert_eq!(output.requests, vec![AuxRequest::Speed(0)]);
    }

    #[test]
    fn test_tilt_steps_clamp() {
        let mut ctrl = ctrl_at(50, 178);

        let (output, _) = proc(&mut ctrl, ControlMode::Manual, vec![AuxEvent::TiltUp]);
        assert_eq!(ctrl.tilt_deg(), 180);
        assert_eq!(output.requests, vec![AuxRequest::Angle(180)]);

        let mut ctrl = ctrl_at(50, 2);

        let (output, _) = proc(&mut ctrl, ControlMode::Manual, vec![AuxEvent::TiltDown]);
        assert_eq!(ctrl.tilt_deg(), 0);
        assert_eq!(output.requests, vec![AuxRequest::Angle(0)]);
    }

    #[test]
    fn test_tilt_centre_always_sets_90() {
        for start in [0, 37, 90, 180].iter() {
            let mut ctrl = ctrl_at(50, *start);

            let (output, _) =
                proc(&mut ctrl, ControlMode::Manual, vec![AuxEvent::TiltCentre]);
            assert_eq!(ctrl.tilt_deg(), 90);
            assert_eq!(output.requests, vec![AuxRequest::Angle(90)]);
        }
    }

    #[test]
    fn test_direct_speed_entry_validation() {
        let mut ctrl = ctrl_at(50, 90);

        let (output, report) = proc(
            &mut ctrl,
            ControlMode::Manual,
            vec![AuxEvent::SetSpeed(101)],
        );
        assert!(output.requests.is_empty());
        assert_eq!(report.rejected_speed, Some(101));
        // The displayed value is restored, i.e. untouched
        assert_eq!(ctrl.speed_pct(), 50);

        let (output, report) =
            proc(&mut ctrl, ControlMode::Manual, vec![AuxEvent::SetSpeed(75)]);
        assert_eq!(output.requests, vec![AuxRequest::Speed(75)]);
        assert!(report.rejected_speed.is_none());
        assert_eq!(ctrl.speed_pct(), 75);
    }

    #[test]
    fn test_automation_gates_speed_only() {
        let mut ctrl = ctrl_at(50, 90);

        let (output, _) = proc(
            &mut ctrl,
            ControlMode::Automation,
            vec![
                AuxEvent::SpeedUp,
                AuxEvent::SetSpeed(80),
                AuxEvent::TiltUp,
                AuxEvent::Photo,
            ],
        );

        // Tilt and photo stay live in automation, speed actions are dead
        assert_eq!(
            output.requests,
            vec![AuxRequest::Angle(95), AuxRequest::Photo]
        );
        assert_eq!(ctrl.speed_pct(), 50);
    }

    #[test]
    fn test_speed_reset_is_display_only() {
        let mut ctrl = ctrl_at(60, 90);

        ctrl.reset_speed();

        assert_eq!(ctrl.speed_pct(), 0);
    }
}
