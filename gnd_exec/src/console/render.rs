//! Dashboard rendering for the console
//!
//! The dashboard is fully redrawn every cycle; at console sizes that is far
//! cheaper than tracking damage, and it makes resizes free.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{self, Clear, ClearType},
};
use std::io::Write;

// Internal
use super::{Button, Console, ConsoleError, EntryKind};
use crate::data_store::DataStore;
use crate::mode_gate::ControlMode;
use rover_if::cmd::Cmd;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

// Dashboard layout rows
const HEADER_ROW: u16 = 0;
const RULE_ROW: u16 = 1;
const BTN_TOP_ROW: u16 = 3;
const BTN_MID_ROW: u16 = 5;
const BTN_BOT_ROW: u16 = 7;
const MOTION_ROW: u16 = 9;
const MOTION_ROW_2: u16 = 10;
const POSE_ROW: u16 = 11;
const STATUS_ROW: u16 = 13;
const ENTRY_ROW: u16 = 15;
const NOTICE_ROW: u16 = 16;
const HELP_ROW: u16 = 18;

/// Column the speed/tilt panel starts at
const PANEL_COL: u16 = 46;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The on-screen drive buttons and their positions on the manual dashboard.
pub(crate) fn drive_buttons() -> Vec<Button> {
    vec![
        Button {
            cmd: Cmd::Forward,
            label: "[ FORWARD ]",
            col: 15,
            row: BTN_TOP_ROW,
        },
        Button {
            cmd: Cmd::Left,
            label: "[ LEFT ]",
            col: 2,
            row: BTN_MID_ROW,
        },
        Button {
            cmd: Cmd::Stop,
            label: "[ STOP ]",
            col: 16,
            row: BTN_MID_ROW,
        },
        Button {
            cmd: Cmd::Right,
            label: "[ RIGHT ]",
            col: 30,
            row: BTN_MID_ROW,
        },
        Button {
            cmd: Cmd::Backward,
            label: "[ BACKWARD ]",
            col: 14,
            row: BTN_BOT_ROW,
        },
    ]
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl Console {
    /// Redraw the dashboard from the current data store.
    pub fn render(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        let mode = ds.mode_gate.mode();

        // Clear the whole working area, then draw into it. Everything is
        // queued and flushed once so no half-drawn frame is ever visible.
        for row in 0..=HELP_ROW {
            queue!(self.out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
        }

        self.draw_header(ds)?;

        match mode {
            ControlMode::Manual => {
                self.draw_buttons(ds)?;
                self.draw_panel(ds)?;
            }
            ControlMode::Automation => self.draw_mission(ds)?,
        }

        self.draw_telemetry(ds)?;
        self.draw_status(ds)?;
        self.draw_entry()?;
        self.draw_notice(ds)?;
        self.draw_help(ds)?;

        self.out.flush()?;

        Ok(())
    }

    fn draw_header(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        queue!(
            self.out,
            MoveTo(0, HEADER_ROW),
            Print("ROVER GROUND CONTROL")
        )?;

        queue!(self.out, MoveTo(PANEL_COL, HEADER_ROW), Print("Link "))?;
        if ds.tm_poller.link_ok() {
            queue!(self.out, PrintStyledContent("UP  ".green()))?;
        } else {
            queue!(self.out, PrintStyledContent("DOWN".red()))?;
        }

        queue!(self.out, Print("   Mode "))?;
        match ds.mode_gate.mode() {
            ControlMode::Manual => {
                queue!(self.out, PrintStyledContent("MANUAL".cyan()))?
            }
            ControlMode::Automation => {
                queue!(self.out, PrintStyledContent("AUTOMATION".yellow().bold()))?
            }
        }

        let width = terminal::size().map(|s| s.0).unwrap_or(80);
        queue!(
            self.out,
            MoveTo(0, RULE_ROW),
            Print("-".repeat(width as usize))
        )?;

        Ok(())
    }

    fn draw_buttons(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        let active = ds.cmd_mapper_status_rpt.active_cmd;

        for i in 0..self.buttons.len() {
            let (cmd, label, col, row) = {
                let button = &self.buttons[i];
                (button.cmd, button.label, button.col, button.row)
            };

            queue!(self.out, MoveTo(col, row))?;

            if active == Some(cmd) {
                queue!(self.out, PrintStyledContent(label.reverse()))?;
            } else {
                queue!(self.out, Print(label))?;
            }
        }

        Ok(())
    }

    fn draw_panel(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        queue!(
            self.out,
            MoveTo(PANEL_COL, BTN_TOP_ROW),
            Print(format!("Speed {:>3} %", ds.aux_ctrl.speed_pct())),
            MoveTo(PANEL_COL, BTN_TOP_ROW + 1),
            Print(format!("Tilt  {:>3} deg", ds.aux_ctrl.tilt_deg()))
        )?;

        Ok(())
    }

    fn draw_mission(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        queue!(
            self.out,
            MoveTo(2, BTN_TOP_ROW),
            PrintStyledContent("AUTOMATION RUNNING".yellow().bold())
        )?;

        if let Some(mission) = ds.mode_gate.mission() {
            queue!(
                self.out,
                MoveTo(2, BTN_MID_ROW),
                Print(format!(
                    "Mission  distance {:.2} m   direction {:.1} deg",
                    mission.distance_m, mission.direction_deg
                ))
            )?;
        }

        queue!(
            self.out,
            MoveTo(2, BTN_BOT_ROW),
            Print("Drive input is gated off until automation is stopped")
        )?;

        Ok(())
    }

    fn draw_telemetry(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        let motion = ds.tm_poller.latest_motion();
        let pose = ds.tm_poller.latest_pose();

        queue!(
            self.out,
            MoveTo(0, MOTION_ROW),
            Print(format!(
                "Motion   rpm1 {:>10}   speed1 {:>10}   rpm2 {:>10}   speed2 {:>10}",
                fmt_field(motion.map(|t| t.rpm1), 2),
                fmt_field(motion.map(|t| t.speed1), 2),
                fmt_field(motion.map(|t| t.rpm2), 2),
                fmt_field(motion.map(|t| t.speed2), 2),
            )),
            MoveTo(0, MOTION_ROW_2),
            Print(format!(
                "         pitch {:>9}   roll {:>12}",
                fmt_field(motion.map(|t| t.pitch), 2),
                fmt_field(motion.map(|t| t.roll), 2),
            )),
            MoveTo(0, POSE_ROW),
            Print(format!(
                "Pose     x {:>13}   y {:>13}   theta {:>9}   distance {:>8}",
                fmt_field(pose.map(|t| t.x), 3),
                fmt_field(pose.map(|t| t.y), 3),
                fmt_field(pose.map(|t| t.theta), 1),
                fmt_field(pose.map(|t| t.distance), 3),
            ))
        )?;

        Ok(())
    }

    fn draw_status(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        if ds.mode_gate.mode() == ControlMode::Manual {
            let token = ds
                .cmd_mapper_status_rpt
                .active_cmd
                .map(|c| c.as_token())
                .unwrap_or("-");

            queue!(
                self.out,
                MoveTo(0, STATUS_ROW),
                Print(format!("Active command: {}", token))
            )?;
        }

        Ok(())
    }

    fn draw_entry(&mut self) -> Result<(), ConsoleError> {
        let entry = match self.entry {
            Some(ref e) => e,
            None => return Ok(()),
        };

        let mut line = String::from("> ");
        match entry.kind {
            EntryKind::Mission => line.push_str("Mission targets:  "),
            EntryKind::Speed => line.push_str("Set speed:  "),
        }

        for (i, field) in entry.fields.iter().enumerate() {
            let marker = if i == entry.active { '*' } else { ' ' };
            line.push_str(&format!("{}{} [{}]  ", marker, field.label, field.value));
        }
        line.push_str("(Tab next field, Enter apply, Esc cancel)");

        queue!(self.out, MoveTo(0, ENTRY_ROW), Print(line))?;

        if let Some(ref error) = self.entry_error {
            queue!(
                self.out,
                Print("  "),
                PrintStyledContent(error.as_str().red())
            )?;
        }

        Ok(())
    }

    fn draw_notice(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        if let Some(ref notice) = ds.notice {
            queue!(
                self.out,
                MoveTo(0, NOTICE_ROW),
                PrintStyledContent(notice.text.as_str().yellow())
            )?;
        }

        Ok(())
    }

    fn draw_help(&mut self, ds: &DataStore) -> Result<(), ConsoleError> {
        let drive = &ds.cmd_mapper.params;

        let help = match ds.mode_gate.mode() {
            ControlMode::Manual => format!(
                "keys: {}{}{}{} drive | {} stop | {}/{} tilt | {} centre | {}/{} speed | \
                 {} set speed | {} photo | {} automation | {} quit",
                drive.forward_key,
                drive.left_key,
                drive.backward_key,
                drive.right_key,
                key_name(drive.stop_key),
                self.params.tilt_up_key,
                self.params.tilt_down_key,
                self.params.tilt_centre_key,
                self.params.speed_down_key,
                self.params.speed_up_key,
                self.params.speed_set_key,
                self.params.photo_key,
                self.params.mode_toggle_key,
                self.params.quit_key,
            ),
            ControlMode::Automation => format!(
                "keys: {}/{} tilt | {} centre | {} photo | {} stop automation | {} quit",
                self.params.tilt_up_key,
                self.params.tilt_down_key,
                self.params.tilt_centre_key,
                self.params.photo_key,
                self.params.mode_toggle_key,
                self.params.quit_key,
            ),
        };

        queue!(
            self.out,
            MoveTo(0, HELP_ROW),
            PrintStyledContent(help.dim())
        )?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Format a telemetry field to the given number of decimal places, or the
/// literal "N/A" when the snapshot is absent.
fn fmt_field(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => String::from("N/A"),
    }
}

/// Printable name for a bound key.
fn key_name(key: char) -> String {
    match key {
        ' ' => String::from("space"),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fmt_field() {
        assert_eq!(fmt_field(Some(1.23456), 2), "1.23");
        assert_eq!(fmt_field(Some(90.0), 1), "90.0");

        // An absent snapshot renders the literal N/A in every field
        assert_eq!(fmt_field(None, 3), "N/A");
    }

    #[test]
    fn test_key_name() {
        assert_eq!(key_name(' '), "space");
        assert_eq!(key_name('w'), "w");
    }
}
