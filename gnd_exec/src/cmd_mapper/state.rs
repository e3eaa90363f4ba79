//! Implementations for the command input mapper state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use std::collections::HashSet;

// Internal
use super::{CmdMapperError, DriveEvent, Params};
use crate::mode_gate::ControlMode;
use rover_if::cmd::Cmd;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command input mapper module state
#[derive(Default)]
pub struct CmdMapper {
    pub(crate) params: Params,

    report: StatusReport,

    /// Drive commands whose keys are currently held down
    held_keys: HashSet<Cmd>,

    /// The on-screen button currently pressed by the pointer
    pointer_held: Option<Cmd>,

    /// The most recently activated drive command, shown highlighted on the
    /// console
    active_cmd: Option<Cmd>,
}

/// Input data to the command input mapper.
#[derive(Default)]
pub struct InputData {
    /// The current control mode; drive surfaces are dead under Automation.
    pub mode: ControlMode,

    /// The cycle's drive surface events, in arrival order.
    pub events: Vec<DriveEvent>,
}

/// Output data from the command input mapper.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OutputData {
    /// Command tokens to transmit this cycle, in order.
    pub cmds: Vec<Cmd>,

    /// True when a stop was emitted. The displayed global speed resets to
    /// zero with the stop; activations leave it alone.
    pub speed_reset: bool,
}

/// Status report for command input mapper processing.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusReport {
    /// The drive command currently shown as active on the console
    pub active_cmd: Option<Cmd>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for CmdMapper {
    type InitData = &'static str;
    type InitError = CmdMapperError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = CmdMapperError;

    /// Initialise the command input mapper.
    ///
    /// Expected init data is the name of the parameter file.
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        self.params = params::load(init_data)?;

        // A key bound twice would make the key-up path ambiguous, reject it
        // here rather than misbehave at drive time
        let keys = [
            self.params.forward_key,
            self.params.backward_key,
            self.params.left_key,
            self.params.right_key,
            self.params.stop_key,
        ];

        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(CmdMapperError::DuplicateBinding(*key));
            }
        }

        Ok(())
    }

    /// Perform cyclic processing of the command input mapper.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut output = OutputData::default();

        // Under automation the drive surfaces are dead: no transmission and
        // no visual change. Held state was cleared by `reset` when the gate
        // closed, so nothing here can go stale.
        if input_data.mode == ControlMode::Automation {
            self.report = StatusReport::default();
            return Ok((output, self.report));
        }

        for event in input_data.events.iter() {
            match *event {
                DriveEvent::KeyDown { key, repeat } => {
                    self.handle_key_down(key, repeat, &mut output)
                }
                DriveEvent::KeyUp { key } => self.handle_key_up(key, &mut output),
                DriveEvent::PointerDown { cmd } => {
                    self.handle_pointer_down(cmd, &mut output)
                }
                DriveEvent::PointerUp | DriveEvent::PointerLeave => {
                    self.handle_pointer_release(&mut output)
                }
            }
        }

        self.report = StatusReport {
            active_cmd: self.active_cmd,
        };

        Ok((output, self.report))
    }
}

impl CmdMapper {
    /// Map a key to the drive command it is bound to.
    pub fn map_key(&self, key: char) -> Option<Cmd> {
        if key == self.params.forward_key {
            Some(Cmd::Forward)
        } else if key == self.params.backward_key {
            Some(Cmd::Backward)
        } else if key == self.params.left_key {
            Some(Cmd::Left)
        } else if key == self.params.right_key {
            Some(Cmd::Right)
        } else if key == self.params.stop_key {
            Some(Cmd::Stop)
        } else {
            None
        }
    }

    /// Clear all held state.
    ///
    /// Called when the mode gate disables manual control, so that a key held
    /// across the transition cannot leave a phantom hold behind.
    pub fn reset(&mut self) {
        self.held_keys.clear();
        self.pointer_held = None;
        self.active_cmd = None;
        self.report = StatusReport::default();
    }

    fn handle_key_down(&mut self, key: char, repeat: bool, output: &mut OutputData) {
        let cmd = match self.map_key(key) {
            Some(c) => c,
            None => return,
        };

        // The stop key behaves like the on-screen stop button: one stop,
        // every hold released
        if cmd == Cmd::Stop {
            self.held_keys.clear();
            self.pointer_held = None;
            self.active_cmd = None;
            self.emit_stop(output);
            return;
        }

        // Key auto-repeat must not re-trigger, either via the terminal's
        // repeat flag or as duplicate down events on terminals that don't
        // report one
        if repeat || self.held_keys.contains(&cmd) {
            trace!("Suppressed repeat activation of '{}'", cmd);
            return;
        }

        self.held_keys.insert(cmd);
        self.active_cmd = Some(cmd);
        output.cmds.push(cmd);
    }

    fn handle_key_up(&mut self, key: char, output: &mut OutputData) {
        let cmd = match self.map_key(key) {
            Some(c) => c,
            None => return,
        };

        // Releasing the stop key sends nothing, its stop fired on the press
        if cmd == Cmd::Stop {
            return;
        }

        // One stop per physical hold: only a key we saw go down may emit it
        if self.held_keys.remove(&cmd) {
            if self.active_cmd == Some(cmd) {
                self.active_cmd = None;
            }
            self.emit_stop(output);
        }
    }

    fn handle_pointer_down(&mut self, cmd: Cmd, output: &mut OutputData) {
        self.pointer_held = Some(cmd);

        // The stop button activates nothing on press, its stop fires on
        // release like every other button
        if cmd.is_movement() {
            self.active_cmd = Some(cmd);
            output.cmds.push(cmd);
        }
    }

    fn handle_pointer_release(&mut self, output: &mut OutputData) {
        // Mouse-up and leaving the button area both land here; whichever
        // arrives first takes the press with it, so one stop per press
        if self.pointer_held.take().is_some() {
            self.active_cmd = None;
            self.emit_stop(output);
        }
    }

    fn emit_stop(&mut self, output: &mut OutputData) {
        output.cmds.push(Cmd::Stop);
        output.speed_reset = true;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn proc(
        mapper: &mut CmdMapper,
        mode: ControlMode,
        events: Vec<DriveEvent>,
    ) -> OutputData {
        mapper.proc(&InputData { mode, events }).unwrap().0
    }

    fn down(key: char) -> DriveEvent {
        DriveEvent::KeyDown { key, repeat: false }
    }

    fn up(key: char) -> DriveEvent {
        DriveEvent::KeyUp { key }
    }

    #[test]
    fn test_single_activation_per_press() {
        let mut mapper = CmdMapper::default();

        let output = proc(&mut mapper, ControlMode::Manual, vec![down('w')]);
        assert_eq!(output.cmds, vec![Cmd::Forward]);
        assert!(!output.speed_reset);

        // Auto-repeat flagged by the terminal transmits nothing further
        let output = proc(
            &mut mapper,
            ControlMode::Manual,
            vec![DriveEvent::KeyDown { key: 'w', repeat: true }],
        );
        assert!(output.cmds.is_empty());

        // Terminals without repeat flags deliver plain duplicate downs,
        // which the held set suppresses
        let output = proc(&mut mapper, ControlMode::Manual, vec![down('w')]);
        assert!(output.cmds.is_empty());
    }

    #[test]
    fn test_key_release_stops_once() {
        let mut mapper = CmdMapper::default();

        proc(&mut mapper, ControlMode::Manual, vec![down('w')]);

        let output = proc(&mut mapper, ControlMode::Manual, vec![up('w')]);
        assert_eq!(output.cmds, vec![Cmd::Stop]);
        assert!(output.speed_reset);

        // A stray second release has no hold left to stop
        let output = proc(&mut mapper, ControlMode::Manual, vec![up('w')]);
        assert!(output.cmds.is_empty());
        assert!(!output.speed_reset);
    }

    #[test]
    fn test_pointer_release_and_leave_stop_once() {
        let mut mapper = CmdMapper::default();

        let output = proc(
            &mut mapper,
            ControlMode::Manual,
            vec![DriveEvent::PointerDown { cmd: Cmd::Left }],
        );
        assert_eq!(output.cmds, vec![Cmd::Left]);

        // Both release events arrive for the same press; only one stop goes
        // out
        let output = proc(
            &mut mapper,
            ControlMode::Manual,
            vec![DriveEvent::PointerUp, DriveEvent::PointerLeave],
        );
        assert_eq!(output.cmds, vec![Cmd::Stop]);

        // Same when the leave fires first
        let output = proc(
            &mut mapper,
            ControlMode::Manual,
            vec![
                DriveEvent::PointerDown { cmd: Cmd::Right },
                DriveEvent::PointerLeave,
                DriveEvent::PointerUp,
            ],
        );
        assert_eq!(output.cmds, vec![Cmd::Right, Cmd::Stop]);
    }

    #[test]
    fn test_stop_button_press() {
        let mut mapper = CmdMapper::default();

        // Pressing the on-screen stop button activates nothing
        let output = proc(
            &mut mapper,
            ControlMode::Manual,
            vec![DriveEvent::PointerDown { cmd: Cmd::Stop }],
        );
        assert!(output.cmds.is_empty());

        // Its release sends the stop
        let output = proc(&mut mapper, ControlMode::Manual, vec![DriveEvent::PointerUp]);
        assert_eq!(output.cmds, vec![Cmd::Stop]);
        assert!(output.speed_reset);
    }

    #[test]
    fn test_stop_key_releases_everything() {
        let mut mapper = CmdMapper::default();

        proc(&mut mapper, ControlMode::Manual, vec![down('w')]);

        let output = proc(&mut mapper, ControlMode::Manual, vec![down(' ')]);
        assert_eq!(output.cmds, vec![Cmd::Stop]);
        assert!(output.speed_reset);

        // The forward hold was cleared by the stop, so its release is inert,
        // and releasing the stop key itself sends nothing
        let output = proc(&mut mapper, ControlMode::Manual, vec![up('w'), up(' ')]);
        assert!(output.cmds.is_empty());
    }

    #[test]
    fn test_second_direction_while_held() {
        let mut mapper = CmdMapper::default();

        let output = proc(&mut mapper, ControlMode::Manual, vec![down('w'), down('a')]);
        assert_eq!(output.cmds, vec![Cmd::Forward, Cmd::Left]);

        let (_, report) = mapper
            .proc(&InputData {
                mode: ControlMode::Manual,
                events: vec![],
            })
            .unwrap();
        assert_eq!(report.active_cmd, Some(Cmd::Left));

        // Each physical hold still owns exactly one stop
        let output = proc(&mut mapper, ControlMode::Manual, vec![up('w')]);
        assert_eq!(output.cmds, vec![Cmd::Stop]);

        let output = proc(&mut mapper, ControlMode::Manual, vec![up('a')]);
        assert_eq!(output.cmds, vec![Cmd::Stop]);
    }

    #[test]
    fn test_automation_gates_all_input() {
        let mut mapper = CmdMapper::default();

        let output = proc(
            &mut mapper,
            ControlMode::Automation,
            vec![
                down('w'),
                DriveEvent::PointerDown { cmd: Cmd::Forward },
                up('w'),
                DriveEvent::PointerUp,
            ],
        );

        assert!(output.cmds.is_empty());
        assert!(!output.speed_reset);
        assert!(mapper.report.active_cmd.is_none());
    }

    #[test]
    fn test_reset_clears_held_state() {
        let mut mapper = CmdMapper::default();

        proc(&mut mapper, ControlMode::Manual, vec![down('w')]);
        mapper.reset();

        // The release of the pre-reset hold must not produce a stop
        let output = proc(&mut mapper, ControlMode::Manual, vec![up('w')]);
        assert!(output.cmds.is_empty());
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut mapper = CmdMapper::default();

        let output = proc(&mut mapper, ControlMode::Manual, vec![down('z'), up('z')]);
        assert!(output.cmds.is_empty());
    }
}
