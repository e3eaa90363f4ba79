//! Console module
//!
//! The console owns the terminal: it translates key and mouse events into
//! typed module events, runs the one-line entry prompt for mission targets
//! and direct speed entry, and renders the dashboard.
//!
//! Keys bound in the console parameters (tilt, speed, photo, automation,
//! quit) are claimed here; every other key event flows through untouched as
//! a drive event for the command input mapper, which applies its own
//! bindings.
//!
//! Where the terminal supports keyboard enhancement the console asks for
//! key release reporting, giving the mapper true hold semantics. Without it
//! releases never arrive and driving degrades to press-then-stop-key, which
//! is logged at startup.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod render;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use crossterm::{cursor, event, execute, terminal};
use log::warn;
use std::io::{Stdout, Write};
use std::time::Duration;

// Internal
pub use params::*;

use crate::aux_ctrl::AuxEvent;
use crate::cmd_mapper::DriveEvent;
use crate::mode_gate::ControlMode;
use rover_if::cmd::{Cmd, MissionTarget};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An operator action produced by the console's input translation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// A drive surface event for the command input mapper
    Drive(DriveEvent),

    /// A panel action for the panel controls
    Aux(AuxEvent),

    /// A toggle request for the mode gate, with mission targets when arming
    ToggleAutomation { target: Option<MissionTarget> },

    /// The operator asked to quit
    Quit,
}

/// Possible errors that can occur during console operation.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Failed to load the console parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Terminal error: {0}")]
    TerminalError(#[from] std::io::Error),
}

/// Which value the entry prompt is collecting.
#[derive(Debug, Copy, Clone, PartialEq)]
enum EntryKind {
    Mission,
    Speed,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An on-screen drive button and its hit box.
pub(crate) struct Button {
    pub cmd: Cmd,
    pub label: &'static str,
    pub col: u16,
    pub row: u16,
}

/// The one-line entry prompt.
struct Entry {
    kind: EntryKind,
    fields: Vec<EntryField>,
    active: usize,
}

struct EntryField {
    label: &'static str,
    value: String,
}

/// Terminal console state.
pub struct Console {
    pub(crate) params: Params,

    /// On-screen drive buttons with their hit boxes
    pub(crate) buttons: Vec<Button>,

    /// Index into `buttons` of the button the pointer is holding
    pressed_button: Option<usize>,

    /// True when the terminal reports key release events
    pub(crate) enhanced_keys: bool,

    /// Active entry prompt
    entry: Option<Entry>,

    /// Error from the last entry submission, shown beside the prompt
    entry_error: Option<String>,

    out: Stdout,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl Button {
    fn contains(&self, col: u16, row: u16) -> bool {
        row == self.row && col >= self.col && col < self.col + self.label.len() as u16
    }
}

impl Console {
    /// Create a new instance of the console, taking over the terminal.
    ///
    /// Expected init data is the name of the parameter file. The terminal is
    /// restored when the console is dropped.
    pub fn new(param_file: &'static str) -> Result<Self, ConsoleError> {
        let params: Params = util::params::load(param_file)?;

        let mut out = std::io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide
        )?;

        // Ask for key release reporting where the terminal can give it
        let enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            execute!(
                out,
                event::PushKeyboardEnhancementFlags(
                    event::KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        } else {
            warn!(
                "Terminal does not report key releases, hold-to-drive degrades to \
                 press-to-drive; use the stop key to halt"
            );
        }

        Ok(Self {
            params,
            buttons: render::drive_buttons(),
            pressed_button: None,
            enhanced_keys,
            entry: None,
            entry_error: None,
            out,
        })
    }

    /// Drain and translate all pending terminal events.
    pub fn poll_events(
        &mut self,
        mode: ControlMode,
    ) -> Result<Vec<ConsoleEvent>, ConsoleError> {
        let mut events = Vec::new();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                event::Event::Key(key) => self.handle_key(key, mode, &mut events),
                event::Event::Mouse(mouse) => self.handle_mouse(mouse, mode, &mut events),
                // The dashboard is fully redrawn every cycle, so there is
                // nothing to do for a resize
                _ => (),
            }
        }

        Ok(events)
    }

    fn handle_key(
        &mut self,
        key: event::KeyEvent,
        mode: ControlMode,
        events: &mut Vec<ConsoleEvent>,
    ) {
        // Ctrl+C always quits, entry prompt or not
        if key.modifiers.contains(event::KeyModifiers::CONTROL)
            && key.code == event::KeyCode::Char('c')
        {
            events.push(ConsoleEvent::Quit);
            return;
        }

        let ch = match key.code {
            event::KeyCode::Char(c) => Some(c.to_ascii_lowercase()),
            _ => None,
        };

        // An open entry prompt captures presses, but releases still reach
        // the mapper so a drive key held when the prompt opened can deliver
        // its stop
        if self.entry.is_some() {
            match key.kind {
                event::KeyEventKind::Release => {
                    if let Some(c) = ch {
                        if !self.is_console_key(c) {
                            events.push(ConsoleEvent::Drive(DriveEvent::KeyUp {
                                key: c,
                            }));
                        }
                    }
                }
                _ => self.handle_entry_key(key.code, events),
            }
            return;
        }

        match key.kind {
            event::KeyEventKind::Press | event::KeyEventKind::Repeat => {
                let repeat = key.kind == event::KeyEventKind::Repeat;

                let c = match ch {
                    Some(c) => c,
                    None => return,
                };

                if c == self.params.quit_key {
                    if !repeat {
                        events.push(ConsoleEvent::Quit);
                    }
                } else if c == self.params.mode_toggle_key {
                    if !repeat {
                        match mode {
                            ControlMode::Manual => self.open_mission_entry(),
                            ControlMode::Automation => events.push(
                                ConsoleEvent::ToggleAutomation { target: None },
                            ),
                        }
                    }
                } else if c == self.params.tilt_up_key {
                    // Tilt keys step on auto-repeat as well, holding the key
                    // sweeps the camera
                    events.push(ConsoleEvent::Aux(AuxEvent::TiltUp));
                } else if c == self.params.tilt_down_key {
                    events.push(ConsoleEvent::Aux(AuxEvent::TiltDown));
                } else if c == self.params.tilt_centre_key {
                    events.push(ConsoleEvent::Aux(AuxEvent::TiltCentre));
                } else if c == self.params.photo_key {
                    if !repeat {
                        events.push(ConsoleEvent::Aux(AuxEvent::Photo));
                    }
                } else if c == self.params.speed_up_key {
                    // The speed group is hidden while automation runs
                    if mode == ControlMode::Manual {
                        events.push(ConsoleEvent::Aux(AuxEvent::SpeedUp));
                    }
                } else if c == self.params.speed_down_key {
                    if mode == ControlMode::Manual {
                        events.push(ConsoleEvent::Aux(AuxEvent::SpeedDown));
                    }
                } else if c == self.params.speed_set_key {
                    if !repeat && mode == ControlMode::Manual {
                        self.open_speed_entry();
                    }
                } else {
                    // Everything else belongs to the drive mapper
                    events.push(ConsoleEvent::Drive(DriveEvent::KeyDown {
                        key: c,
                        repeat,
                    }));
                }
            }
            event::KeyEventKind::Release => {
                if let Some(c) = ch {
                    // Console-owned keys have no release behaviour
                    if !self.is_console_key(c) {
                        events.push(ConsoleEvent::Drive(DriveEvent::KeyUp { key: c }));
                    }
                }
            }
        }
    }

    fn handle_mouse(
        &mut self,
        mouse: event::MouseEvent,
        mode: ControlMode,
        events: &mut Vec<ConsoleEvent>,
    ) {
        match mouse.kind {
            event::MouseEventKind::Down(event::MouseButton::Left) => {
                // The drive buttons only exist on the manual dashboard;
                // releases below are always processed so a press already in
                // flight can deliver its stop
                if mode == ControlMode::Automation || self.entry.is_some() {
                    return;
                }

                if let Some(idx) = self.hit_test(mouse.column, mouse.row) {
                    self.pressed_button = Some(idx);
                    events.push(ConsoleEvent::Drive(DriveEvent::PointerDown {
                        cmd: self.buttons[idx].cmd,
                    }));
                }
            }
            event::MouseEventKind::Up(event::MouseButton::Left) => {
                if self.pressed_button.take().is_some() {
                    events.push(ConsoleEvent::Drive(DriveEvent::PointerUp));
                }
            }
            event::MouseEventKind::Drag(event::MouseButton::Left)
            | event::MouseEventKind::Moved => {
                if let Some(idx) = self.pressed_button {
                    if !self.buttons[idx].contains(mouse.column, mouse.row) {
                        // Dragging off the pressed button releases it, the
                        // later mouse-up then has nothing left to release
                        self.pressed_button = None;
                        events.push(ConsoleEvent::Drive(DriveEvent::PointerLeave));
                    }
                }
            }
            _ => (),
        }
    }

    fn handle_entry_key(&mut self, code: event::KeyCode, events: &mut Vec<ConsoleEvent>) {
        match code {
            event::KeyCode::Esc => {
                self.entry = None;
                self.entry_error = None;
            }
            event::KeyCode::Tab => {
                if let Some(ref mut entry) = self.entry {
                    entry.active = (entry.active + 1) % entry.fields.len();
                }
            }
            event::KeyCode::Backspace => {
                if let Some(ref mut entry) = self.entry {
                    entry.fields[entry.active].value.pop();
                }
            }
            event::KeyCode::Enter => self.submit_entry(events),
            event::KeyCode::Char(c) => {
                if let Some(ref mut entry) = self.entry {
                    if entry.fields[entry.active].value.len() < 12 {
                        entry.fields[entry.active].value.push(c);
                    }
                }
            }
            _ => (),
        }
    }

    fn submit_entry(&mut self, events: &mut Vec<ConsoleEvent>) {
        let (kind, values) = match self.entry {
            Some(ref entry) => (
                entry.kind,
                entry
                    .fields
                    .iter()
                    .map(|f| f.value.trim().to_string())
                    .collect::<Vec<_>>(),
            ),
            None => return,
        };

        match kind {
            EntryKind::Mission => {
                let distance = values[0].parse::<f64>();
                let direction = values[1].parse::<f64>();

                match (distance, direction) {
                    (Ok(distance_m), Ok(direction_deg)) => {
                        self.entry = None;
                        self.entry_error = None;
                        events.push(ConsoleEvent::ToggleAutomation {
                            target: Some(MissionTarget {
                                distance_m,
                                direction_deg,
                            }),
                        });
                    }
                    // Range checks belong to the mode gate, this is only
                    // about unparseable text
                    _ => {
                        self.entry_error =
                            Some(String::from("mission targets must be numbers"));
                    }
                }
            }
            EntryKind::Speed => match values[0].parse::<i32>() {
                Ok(value) => {
                    self.entry = None;
                    self.entry_error = None;
                    events.push(ConsoleEvent::Aux(AuxEvent::SetSpeed(value)));
                }
                Err(_) => {
                    self.entry_error = Some(String::from("speed must be a whole number"));
                }
            },
        }
    }

    fn open_mission_entry(&mut self) {
        self.entry = Some(Entry {
            kind: EntryKind::Mission,
            fields: vec![
                EntryField {
                    label: "distance m",
                    value: String::from("1.0"),
                },
                EntryField {
                    label: "direction deg",
                    value: String::from("0"),
                },
            ],
            active: 0,
        });
        self.entry_error = None;
    }

    fn open_speed_entry(&mut self) {
        self.entry = Some(Entry {
            kind: EntryKind::Speed,
            fields: vec![EntryField {
                label: "speed %",
                value: String::new(),
            }],
            active: 0,
        });
        self.entry_error = None;
    }

    fn hit_test(&self, col: u16, row: u16) -> Option<usize> {
        self.buttons.iter().position(|b| b.contains(col, row))
    }

    fn is_console_key(&self, c: char) -> bool {
        [
            self.params.tilt_up_key,
            self.params.tilt_down_key,
            self.params.tilt_centre_key,
            self.params.speed_up_key,
            self.params.speed_down_key,
            self.params.speed_set_key,
            self.params.photo_key,
            self.params.mode_toggle_key,
            self.params.quit_key,
        ]
        .contains(&c)
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        // Best effort teardown, the terminal is unusable anyway if these
        // fail
        if self.enhanced_keys {
            execute!(self.out, event::PopKeyboardEnhancementFlags).ok();
        }
        execute!(
            self.out,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )
        .ok();
        terminal::disable_raw_mode().ok();
    }
}
