//! Ground control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Operator input acquisition from the console
//!         - Mode gate processing
//!         - Command input mapper processing
//!         - Panel control processing
//!         - Request transmission to the backend
//!         - Telemetry polling
//!         - Dashboard rendering
//!
//! # Modules
//!
//! All cyclic modules (e.g. `cmd_mapper`) shall meet the following
//! requirements:
//!     1. Provide a public struct implementing the `util::module::State`
//!        trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use gnd_lib::{
    aux_ctrl::AuxRequest,
    cmd_mapper,
    console::{Console, ConsoleEvent},
    data_store::DataStore,
    mode_gate::{GateRequest, Transition},
    tm_poller::TmPoller,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, error, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use rover_if::net::{NetParams, RoverClient};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.05;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("gnd_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger. The console owns the terminal, so records go to the
    // session log file only.
    logger_init(LevelFilter::Trace, &session, false)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Rover Ground Control Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let mut net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    // An optional single argument overrides the backend URL, useful when
    // moving between the bench rover and the field one
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() == 2 {
        info!("Using backend URL override \"{}\"", &args[1]);
        net_params.base_url = args[1].clone();
    } else if args.len() > 2 {
        return Err(eyre!(
            "Expected either zero or one argument, found {}",
            args.len() - 1
        ));
    }

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.cmd_mapper
        .init("cmd_mapper.toml", &session)
        .wrap_err("Failed to initialise CmdMapper")?;
    info!("CmdMapper init complete");

    ds.aux_ctrl
        .init("aux_ctrl.toml", &session)
        .wrap_err("Failed to initialise AuxCtrl")?;
    info!("AuxCtrl init complete");

    ds.tm_poller = TmPoller::new("tm_poller.toml", &session)
        .wrap_err("Failed to initialise TmPoller")?;
    info!("TmPoller init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    let client = RoverClient::new(&net_params);
    info!("RoverClient initialised for {:?}", net_params.base_url);

    // ---- INITIALISE CONSOLE ----

    let mut console =
        Console::new("console.toml").wrap_err("Failed to initialise the console")?;
    info!("Console initialised");

    // ---- INITIAL BACKEND SYNC ----

    // Push the displayed tilt angle and speed so the backend starts from
    // what the operator sees
    info!("Synchronising panel values with the backend");
    for request in ds.aux_ctrl.initial_requests() {
        send_aux_request(&client, &mut ds, request);
    }

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- INPUT ACQUISITION ----

        let events = console
            .poll_events(ds.mode_gate.mode())
            .wrap_err("Failed to read operator input")?;

        let mut quit = false;
        let mut drive_events = Vec::new();
        let mut aux_events = Vec::new();

        for event in events {
            match event {
                ConsoleEvent::Quit => quit = true,
                ConsoleEvent::Drive(e) => drive_events.push(e),
                ConsoleEvent::Aux(e) => aux_events.push(e),

                // ---- MODE GATE PROCESSING ----
                ConsoleEvent::ToggleAutomation { target } => {
                    match ds.mode_gate.request_toggle(target) {
                        Ok(transition) => {
                            // Close the mapper before automation takes over
                            // so no stale hold survives the gate
                            if let Transition::Entered { .. } = transition {
                                ds.cmd_mapper.reset();
                            }

                            exec_transition(&client, &mut ds, &transition);

                            match transition {
                                Transition::Entered { .. } => ds.raise_notice(
                                    "Automation mode activated, mission started",
                                ),
                                Transition::Exited => ds.raise_notice(
                                    "Automation mode deactivated, manual control restored",
                                ),
                            }
                        }
                        Err(e) => {
                            warn!("Automation toggle rejected: {}", e);
                            ds.raise_notice(e.to_string());
                        }
                    }
                }
            }
        }

        if quit {
            info!("Operator requested quit");
            break;
        }

        let mode = ds.mode_gate.mode();

        // ---- COMMAND MAPPER PROCESSING ----

        ds.cmd_mapper_input = cmd_mapper::InputData {
            mode,
            events: drive_events,
        };

        match ds.cmd_mapper.proc(&ds.cmd_mapper_input) {
            Ok((o, r)) => {
                ds.cmd_mapper_output = o;
                ds.cmd_mapper_status_rpt = r;
            }
            Err(e) => warn!("Error during CmdMapper processing: {}", e),
        };

        // Fire and forget: drive commands stream at press/release rate, a
        // failure is logged and the next command simply follows it
        let cmds = ds.cmd_mapper_output.cmds.clone();
        for cmd in cmds {
            if let Err(e) = client.send_cmd(cmd) {
                debug!("Could not send '{}': {}", cmd, e);
            }
            ds.record_tx(format!("command {}", cmd));
        }

        if ds.cmd_mapper_output.speed_reset {
            ds.aux_ctrl.reset_speed();
        }

        // ---- PANEL CONTROL PROCESSING ----

        ds.aux_ctrl_input = gnd_lib::aux_ctrl::InputData {
            mode,
            events: aux_events,
        };

        match ds.aux_ctrl.proc(&ds.aux_ctrl_input) {
            Ok((o, r)) => {
                ds.aux_ctrl_output = o;
                ds.aux_ctrl_status_rpt = r;
            }
            Err(e) => warn!("Error during AuxCtrl processing: {}", e),
        };

        if let Some(value) = ds.aux_ctrl_status_rpt.rejected_speed {
            ds.raise_notice(format!(
                "Speed must be between 0 and 100 (got {})",
                value
            ));
        }

        let requests = ds.aux_ctrl_output.requests.clone();
        for request in requests {
            send_aux_request(&client, &mut ds, request);
        }

        // ---- TELEMETRY ----

        ds.tm_poller.poll(&client, Instant::now());

        // ---- RENDER ----

        console
            .render(&ds)
            .wrap_err("Failed to render the console")?;

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64()
                        - Duration::from_secs_f64(CYCLE_PERIOD_S).as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    // Drop the console first so the terminal is restored before the final
    // log lines and session save happen
    drop(console);

    session.save("cmd_history.json", ds.cmd_history.clone());

    info!("End of execution");

    session.exit();

    Ok(())
}

/// Transmit the requests demanded by a mode transition, in order.
///
/// A failed transmission is surfaced but does not abort the rest of the
/// sequence; the requests are independent on the backend and skipping the
/// tail would desynchronise more than continuing.
fn exec_transition(client: &RoverClient, ds: &mut DataStore, transition: &Transition) {
    for request in transition.requests() {
        match request {
            GateRequest::Distance(distance_m) => {
                ds.record_tx(format!("distance {}", distance_m));
                if let Err(e) = client.send_distance(distance_m) {
                    error!("Failed to set distance: {}", e);
                    ds.raise_notice(format!("Failed to set distance: {}", e));
                }
            }
            GateRequest::Direction(direction_deg) => {
                ds.record_tx(format!("direction {}", direction_deg));
                if let Err(e) = client.send_direction(direction_deg) {
                    error!("Failed to set direction: {}", e);
                    ds.raise_notice(format!("Failed to set direction: {}", e));
                }
            }
            GateRequest::Cmd(cmd) => {
                ds.record_tx(format!("command {}", cmd));
                // Command tokens follow the drive command policy: logged,
                // never alerted
                if let Err(e) = client.send_cmd(cmd) {
                    warn!("Could not send '{}': {}", cmd, e);
                }
            }
        }
    }
}

/// Transmit a panel request, surfacing failures to the operator.
fn send_aux_request(client: &RoverClient, ds: &mut DataStore, request: AuxRequest) {
    match request {
        AuxRequest::Angle(angle_deg) => {
            ds.record_tx(format!("angle {}", angle_deg));
            if let Err(e) = client.send_angle(angle_deg) {
                error!("Failed to set angle: {}", e);
                ds.raise_notice(format!("Failed to set angle: {}", e));
            }
        }
        AuxRequest::Speed(speed_pct) => {
            ds.record_tx(format!("speed {}", speed_pct));
            if let Err(e) = client.set_global_speed(speed_pct) {
                error!("Failed to set speed: {}", e);
                ds.raise_notice(format!("Failed to set speed: {}", e));
            }
        }
        AuxRequest::Photo => {
            ds.record_tx(String::from("photo"));
            match client.take_photo() {
                Ok(()) => ds.raise_notice("Photo taken!"),
                Err(e) => {
                    error!("Failed to take photo: {}", e);
                    ds.raise_notice(format!("Failed to take photo: {}", e));
                }
            }
        }
    }
}
