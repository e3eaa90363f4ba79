//! Implementations for the telemetry poller state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;
use std::time::{Duration, Instant};

// Internal
use super::{Params, TmFetch, TmPollerError};
use rover_if::tm::{MotionTm, PoseTm};
use util::archive::Archiver;
use util::session::{self, Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Telemetry poller state
#[derive(Default)]
pub struct TmPoller {
    params: Params,

    /// Time of the last motion pull attempt
    last_motion_poll: Option<Instant>,

    /// Time of the last pose pull attempt
    last_pose_poll: Option<Instant>,

    /// Outcome of the last motion pull, `None` before the first attempt.
    /// Kept for edge-triggered logging and the link indicator.
    motion_ok: Option<bool>,

    pose_ok: Option<bool>,

    /// Latest displayed snapshots; `None` renders as "N/A"
    latest_motion: Option<MotionTm>,

    latest_pose: Option<PoseTm>,

    motion_arch: Archiver,

    pose_arch: Archiver,

    /// Archiving needs a live session, tests run without one
    archive_enabled: bool,
}

/// One archived motion telemetry row.
#[derive(Serialize)]
struct MotionRecord {
    time_s: f64,
    rpm1: f64,
    speed1: f64,
    rpm2: f64,
    speed2: f64,
    pitch: f64,
    roll: f64,
}

/// One archived pose telemetry row.
#[derive(Serialize)]
struct PoseRecord {
    time_s: f64,
    x: f64,
    y: f64,
    theta: f64,
    distance: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TmPoller {
    /// Create a new instance of the telemetry poller.
    ///
    /// Loads the poller parameters and opens the session's telemetry
    /// archives.
    pub fn new(
        param_file: &'static str,
        session: &Session,
    ) -> Result<Self, TmPollerError> {
        let params: Params = util::params::load(param_file)?;

        let motion_arch = Archiver::from_path(session, "motion_tm.csv")
            .map_err(|e| TmPollerError::ArchiveInitError(e.to_string()))?;
        let pose_arch = Archiver::from_path(session, "pose_tm.csv")
            .map_err(|e| TmPollerError::ArchiveInitError(e.to_string()))?;

        Ok(Self {
            params,
            motion_arch,
            pose_arch,
            archive_enabled: true,
            ..Default::default()
        })
    }

    /// Run both poll timers, pulling whichever streams are due.
    ///
    /// Failures are absorbed here: the affected stream's snapshot is
    /// cleared, the edge is logged, and both timers keep running.
    pub fn poll<C: TmFetch>(&mut self, client: &C, now: Instant) {
        if due(self.last_motion_poll, self.params.motion_interval_ms, now) {
            self.last_motion_poll = Some(now);
            self.poll_motion(client);
        }

        if due(self.last_pose_poll, self.params.pose_interval_ms, now) {
            self.last_pose_poll = Some(now);
            self.poll_pose(client);
        }
    }

    /// Latest motion snapshot, `None` while the stream is failing.
    pub fn latest_motion(&self) -> Option<MotionTm> {
        self.latest_motion
    }

    /// Latest pose snapshot, `None` while the stream is failing.
    pub fn latest_pose(&self) -> Option<PoseTm> {
        self.latest_pose
    }

    /// True while at least one telemetry stream is being answered, which is
    /// as good a liveness signal as the backend offers.
    pub fn link_ok(&self) -> bool {
        self.motion_ok == Some(true) || self.pose_ok == Some(true)
    }

    fn poll_motion<C: TmFetch>(&mut self, client: &C) {
        match client.motion_tm() {
            Ok(tm) => {
                if self.motion_ok != Some(true) {
                    info!("Motion telemetry stream up");
                }
                self.motion_ok = Some(true);
                self.latest_motion = Some(tm);

                if self.archive_enabled {
                    let record = MotionRecord {
                        time_s: session::get_elapsed_seconds(),
                        rpm1: tm.rpm1,
                        speed1: tm.speed1,
                        rpm2: tm.rpm2,
                        speed2: tm.speed2,
                        pitch: tm.pitch,
                        roll: tm.roll,
                    };
                    if let Err(e) = self.motion_arch.serialise(record) {
                        debug!("Could not archive motion telemetry: {}", e);
                    }
                }
            }
            Err(e) => {
                // Log the edge loudly, the steady state quietly; at 5 Hz a
                // dead backend would otherwise flood the session log
                if self.motion_ok != Some(false) {
                    warn!("Motion telemetry pull failed: {}", e);
                } else {
                    debug!("Motion telemetry still failing: {}", e);
                }
                self.motion_ok = Some(false);
                self.latest_motion = None;
            }
        }
    }

    fn poll_pose<C: TmFetch>(&mut self, client: &C) {
        match client.pose_tm() {
            Ok(tm) => {
                if self.pose_ok != Some(true) {
                    info!("Pose telemetry stream up");
                }
                self.pose_ok = Some(true);
                self.latest_pose = Some(tm);

                if self.archive_enabled {
                    let record = PoseRecord {
                        time_s: session::get_elapsed_seconds(),
                        x: tm.x,
                        y: tm.y,
                        theta: tm.theta,
                        distance: tm.distance,
                    };
                    if let Err(e) = self.pose_arch.serialise(record) {
                        debug!("Could not archive pose telemetry: {}", e);
                    }
                }
            }
            Err(e) => {
                if self.pose_ok != Some(false) {
                    warn!("Pose telemetry pull failed: {}", e);
                } else {
                    debug!("Pose telemetry still failing: {}", e);
                }
                self.pose_ok = Some(false);
                self.latest_pose = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Determine if a poll timer is due at `now`. A timer that has never fired
/// is immediately due.
fn due(last: Option<Instant>, interval_ms: u64, now: Instant) -> bool {
    match last {
        Some(t) => now.duration_since(t) >= Duration::from_millis(interval_ms),
        None => true,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rover_if::net::RoverClientError;
    use std::cell::Cell;

    /// Canned telemetry source counting how often each stream is pulled.
    struct MockFetch {
        motion_fails: bool,
        pose_fails: bool,
        motion_pulls: Cell<u32>,
        pose_pulls: Cell<u32>,
    }

    impl MockFetch {
        fn new(motion_fails: bool, pose_fails: bool) -> Self {
            Self {
                motion_fails,
                pose_fails,
                motion_pulls: Cell::new(0),
                pose_pulls: Cell::new(0),
            }
        }
    }

    impl TmFetch for MockFetch {
        fn motion_tm(&self) -> Result<MotionTm, RoverClientError> {
            self.motion_pulls.set(self.motion_pulls.get() + 1);

            if self.motion_fails {
                Err(RoverClientError::Rejected(String::from("mock failure")))
            } else {
                Ok(MotionTm {
                    rpm1: 1.0,
                    speed1: 0.1,
                    rpm2: 2.0,
                    speed2: 0.2,
                    pitch: 3.0,
                    roll: -3.0,
                })
            }
        }

        fn pose_tm(&self) -> Result<PoseTm, RoverClientError> {
            self.pose_pulls.set(self.pose_pulls.get() + 1);

            if self.pose_fails {
                Err(RoverClientError::Rejected(String::from("mock failure")))
            } else {
                Ok(PoseTm {
                    x: 1.5,
                    y: -0.5,
                    theta: 90.0,
                    distance: 4.2,
                })
            }
        }
    }

    #[test]
    fn test_poll_intervals() {
        let mut poller = TmPoller::default();
        let fetch = MockFetch::new(false, false);

        let t0 = Instant::now();

        // A fresh poller pulls both streams straight away
        poller.poll(&fetch, t0);
        assert_eq!(fetch.motion_pulls.get(), 1);
        assert_eq!(fetch.pose_pulls.get(), 1);

        // Half an interval later nothing is due
        poller.poll(&fetch, t0 + Duration::from_millis(100));
        assert_eq!(fetch.motion_pulls.get(), 1);
        assert_eq!(fetch.pose_pulls.get(), 1);

        // A full interval later both are
        poller.poll(&fetch, t0 + Duration::from_millis(200));
        assert_eq!(fetch.motion_pulls.get(), 2);
        assert_eq!(fetch.pose_pulls.get(), 2);
    }

    #[test]
    fn test_failure_clears_snapshot_and_keeps_polling() {
        let mut poller = TmPoller::default();
        let fetch = MockFetch::new(true, false);

        let t0 = Instant::now();

        poller.poll(&fetch, t0);
        assert!(poller.latest_motion().is_none());

        // The next tick still fires despite the failure
        poller.poll(&fetch, t0 + Duration::from_millis(200));
        poller.poll(&fetch, t0 + Duration::from_millis(400));
        assert_eq!(fetch.motion_pulls.get(), 3);
        assert!(poller.latest_motion().is_none());
    }

    #[test]
    fn test_stream_independence() {
        let mut poller = TmPoller::default();
        let fetch = MockFetch::new(true, false);

        poller.poll(&fetch, Instant::now());

        // The motion failure must not touch the pose stream
        assert!(poller.latest_motion().is_none());
        assert_eq!(
            poller.latest_pose(),
            Some(PoseTm {
                x: 1.5,
                y: -0.5,
                theta: 90.0,
                distance: 4.2,
            })
        );
        assert!(poller.link_ok());
    }

    #[test]
    fn test_recovery_restores_snapshot() {
        let mut poller = TmPoller::default();
        let t0 = Instant::now();

        poller.poll(&MockFetch::new(true, true), t0);
        assert!(!poller.link_ok());

        poller.poll(
            &MockFetch::new(false, false),
            t0 + Duration::from_millis(200),
        );
        assert!(poller.latest_motion().is_some());
        assert!(poller.latest_pose().is_some());
        assert!(poller.link_ok());
    }
}
