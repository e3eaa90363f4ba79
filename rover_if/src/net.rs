//! # Network Module
//!
//! This module provides the HTTP client used to reach the rover's control
//! backend. Every command is a POST of a small JSON body and every telemetry
//! pull is a GET, matching the backend's endpoint contract.
//!
//! The client is deliberately policy-free: it reports transport failures and
//! backend rejections as errors and leaves retry/alerting decisions to the
//! caller, since movement commands and panel actions handle failure very
//! differently.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::cmd::Cmd;
use crate::tm::{MotionTm, PoseTm};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Network parameters for the rover client.
#[derive(Debug, Clone, Deserialize)]
pub struct NetParams {
    /// Base URL of the control backend, for example `http://rover:5000`.
    pub base_url: String,

    /// Maximum time to wait for a connection to be established.
    ///
    /// Units: milliseconds
    pub connect_timeout_ms: u64,

    /// Maximum time to wait for a whole request to complete.
    ///
    /// Units: milliseconds
    pub request_timeout_ms: u64,
}

/// Response convention shared by every command endpoint.
///
/// `status` is `"error"` to signal failure, in which case `message` carries a
/// human-readable description for the operator. Any other status is success.
#[derive(Debug, Deserialize)]
pub struct CmdResponse {
    pub status: String,

    #[serde(default)]
    pub message: Option<String>,
}

/// HTTP client for the rover's control backend.
pub struct RoverClient {
    agent: ureq::Agent,

    base_url: String,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RoverClientError {
    #[error("Could not reach the backend: {0}")]
    Transport(Box<ureq::Error>),

    #[error("{0}")]
    Rejected(String),

    #[error("Could not decode the backend's response: {0}")]
    ResponseDecode(std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CmdResponse {
    /// True unless the backend flagged this response as an error.
    pub fn ok(&self) -> bool {
        self.status != "error"
    }
}

impl RoverClient {
    /// Create a new instance of the rover client.
    ///
    /// This function does not touch the network, the first request does.
    pub fn new(params: &NetParams) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(params.connect_timeout_ms))
            .timeout(Duration::from_millis(params.request_timeout_ms))
            .build();

        Self {
            agent,
            base_url: params.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send a single command token to `/send_command`.
    pub fn send_cmd(&self, cmd: Cmd) -> Result<(), RoverClientError> {
        self.post_json("/send_command", json!({ "command": cmd }))
    }

    /// Demand a new camera tilt angle.
    ///
    /// Units: degrees, in [0, 180]
    pub fn send_angle(&self, angle_deg: i32) -> Result<(), RoverClientError> {
        self.post_json("/send_angle", json!({ "angle": angle_deg }))
    }

    /// Demand a new global PWM speed.
    ///
    /// Units: percent, in [0, 100]
    pub fn set_global_speed(&self, speed_pct: i32) -> Result<(), RoverClientError> {
        self.post_json("/set_global_speed", json!({ "speed": speed_pct }))
    }

    /// Set the mission distance target.
    ///
    /// Units: meters
    pub fn send_distance(&self, distance_m: f64) -> Result<(), RoverClientError> {
        self.post_json("/send_distance", json!({ "distance": distance_m }))
    }

    /// Set the mission direction target.
    ///
    /// Units: degrees
    pub fn send_direction(&self, direction_deg: f64) -> Result<(), RoverClientError> {
        self.post_json("/send_direction", json!({ "direction": direction_deg }))
    }

    /// Ask the backend to capture a photo with the onboard camera.
    pub fn take_photo(&self) -> Result<(), RoverClientError> {
        self.post_json("/take_photo", json!({}))
    }

    /// Pull the current motion telemetry snapshot.
    pub fn get_motion_tm(&self) -> Result<MotionTm, RoverClientError> {
        self.get_json("/get_encoder_data")
    }

    /// Pull the current odometry pose snapshot.
    pub fn get_pose_tm(&self) -> Result<PoseTm, RoverClientError> {
        self.get_json("/get_pose")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and decode the standard command response.
    fn post_json(
        &self,
        path: &str,
        body: serde_json::Value
    ) -> Result<(), RoverClientError> {
        trace!("POST {} {}", path, body);

        let response = match self.agent.post(&self.url(path)).send_json(body) {
            Ok(r) => r,
            // The backend signals application failures in the response body,
            // sometimes on a non-2xx status. Pull the body out of status
            // errors so the message still reaches the operator.
            Err(ureq::Error::Status(_, r)) => r,
            Err(e) => return Err(RoverClientError::Transport(Box::new(e))),
        };

        let response: CmdResponse = response
            .into_json()
            .map_err(|e| RoverClientError::ResponseDecode(e))?;

        match response.ok() {
            true => Ok(()),
            false => Err(RoverClientError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| String::from("no message given")),
            )),
        }
    }

    /// GET a JSON document and decode it into the given snapshot type.
    fn get_json<T>(&self, path: &str) -> Result<T, RoverClientError>
    where
        T: serde::de::DeserializeOwned
    {
        trace!("GET {}", path);

        let response = self
            .agent
            .get(&self.url(path))
            .call()
            .map_err(|e| RoverClientError::Transport(Box::new(e)))?;

        response
            .into_json()
            .map_err(|e| RoverClientError::ResponseDecode(e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cmd_response_convention() {
        let ok: CmdResponse =
            serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(ok.ok());
        assert!(ok.message.is_none());

        let err: CmdResponse = serde_json::from_str(
            r#"{"status": "error", "message": "servo fault"}"#
        )
        .unwrap();
        assert!(!err.ok());
        assert_eq!(err.message.as_deref(), Some("servo fault"));
    }

    #[test]
    fn test_base_url_normalisation() {
        let client = RoverClient::new(&NetParams {
            base_url: String::from("http://rover:5000/"),
            connect_timeout_ms: 1000,
            request_timeout_ms: 1000,
        });

        assert_eq!(
            client.url("/send_command"),
            "http://rover:5000/send_command"
        );
    }
}
