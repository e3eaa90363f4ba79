//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::collections::VecDeque;

// Internal
use crate::{aux_ctrl, cmd_mapper, mode_gate::ModeGate, tm_poller::TmPoller};
use util::session;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum number of records kept in the command history.
const MAX_CMD_HISTORY: usize = 10_000;

/// Time a notice stays on the console's notice line.
///
/// Units: seconds
const NOTICE_DURATION_S: f64 = 4.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A short operator-facing notice shown on the console's notice line.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,

    /// Session-elapsed time the notice was raised at. Units: seconds
    pub raised_s: f64,
}

/// One transmitted request, recorded into the session's command history.
#[derive(Debug, Clone, Serialize)]
pub struct CmdRecord {
    /// Session-elapsed transmission time. Units: seconds
    pub time_s: f64,

    /// Human-readable description of the request
    pub request: String,
}

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    // Mode gate
    pub mode_gate: ModeGate,

    // Command input mapper
    pub cmd_mapper: cmd_mapper::CmdMapper,
    pub cmd_mapper_input: cmd_mapper::InputData,
    pub cmd_mapper_output: cmd_mapper::OutputData,
    pub cmd_mapper_status_rpt: cmd_mapper::StatusReport,

    // Panel controls
    pub aux_ctrl: aux_ctrl::AuxCtrl,
    pub aux_ctrl_input: aux_ctrl::InputData,
    pub aux_ctrl_output: aux_ctrl::OutputData,
    pub aux_ctrl_status_rpt: aux_ctrl::StatusReport,

    // Telemetry
    pub tm_poller: TmPoller,

    /// Operator-facing notice line
    pub notice: Option<Notice>,

    /// Record of this session's transmissions, oldest dropped first
    pub cmd_history: VecDeque<CmdRecord>,

    // Monitoring counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the per-cycle module inputs and outputs and retires an expired
    /// notice.
    pub fn cycle_start(&mut self) {
        self.cmd_mapper_input = cmd_mapper::InputData::default();
        self.cmd_mapper_output = cmd_mapper::OutputData::default();
        self.cmd_mapper_status_rpt = cmd_mapper::StatusReport::default();

        self.aux_ctrl_input = aux_ctrl::InputData::default();
        self.aux_ctrl_output = aux_ctrl::OutputData::default();
        self.aux_ctrl_status_rpt = aux_ctrl::StatusReport::default();

        if let Some(ref notice) = self.notice {
            if session::get_elapsed_seconds() - notice.raised_s > NOTICE_DURATION_S {
                self.notice = None;
            }
        }
    }

    /// Put a notice on the console's notice line, replacing any current one.
    pub fn raise_notice<S: Into<String>>(&mut self, text: S) {
        self.notice = Some(Notice {
            text: text.into(),
            raised_s: session::get_elapsed_seconds(),
        });
    }

    /// Record a transmitted request into the bounded command history.
    pub fn record_tx(&mut self, request: String) {
        if self.cmd_history.len() >= MAX_CMD_HISTORY {
            self.cmd_history.pop_front();
        }

        self.cmd_history.push_back(CmdRecord {
            time_s: session::get_elapsed_seconds(),
            request,
        });
    }
}
