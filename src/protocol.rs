/// JSON message protocol between the workflow and a host controller.
///
/// All messages are newline-delimited JSON (NDJSON).
/// Uses `heapless` types for no_std/no-alloc operation.
use heapless::String;
use serde::{Deserialize, Serialize};

use crate::config::Band;
use crate::fsm::WorkflowState;
use crate::policy::Permission;
use crate::text::{DeviceClass, ProtocolTag, ReasonText};

/// Messages sent from the device to the host
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum DeviceMessage<'a> {
    /// Workflow status snapshot
    #[serde(rename = "status")]
    Status {
        state: WorkflowState,
        prev: WorkflowState,
        band: Band,
        /// Milliseconds spent in the current state
        in_state_ms: u64,
        signals: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        selected: Option<u8>,
        errors: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_error: Option<&'static str>,
        /// A transmit confirmation is waiting for the user
        pending: bool,
        dry_run: bool,
        version: &'static str,
    },
    /// One captured signal, sent after analysis
    #[serde(rename = "signal")]
    Signal {
        index: u8,
        freq: f32,
        rssi: i8,
        samples: u16,
        valid: bool,
        protocol: &'a ProtocolTag,
        class: &'a DeviceClass,
    },
    /// Analysis summary
    #[serde(rename = "analysis")]
    Analysis {
        count: u16,
        valid: u16,
        unique: u16,
        rssi_min: i8,
        rssi_max: i8,
        rssi_mean: i8,
        span_ms: u64,
        summary: &'a String<96>,
    },
    /// One audit record
    #[serde(rename = "audit")]
    Audit {
        ts: u64,
        freq: f32,
        dur: u32,
        allowed: bool,
        permission: Permission,
        note: &'a ReasonText,
    },
    /// Command accepted
    #[serde(rename = "ack")]
    Ack { cmd: &'static str },
    /// Command refused; workflow state unchanged
    #[serde(rename = "rejected")]
    Rejected { cmd: &'static str, reason: &'a ReasonText },
}

/// Commands sent from the host to the device.
///
/// Deserialized manually via [`RawCommand`] in `comm::parse_command()` because
/// `serde_json_core` does not support internally tagged enums (`deserialize_any`).
#[derive(Debug, PartialEq)]
pub enum HostCommand {
    /// Begin a session
    Start,
    /// Emergency stop
    Abort,
    /// Trigger analysis
    Analyze,
    /// Select a captured signal for replay
    Select { index: u8 },
    /// Confirm the pending transmission
    Confirm,
    /// Withdraw confirmation / end the session from READY
    Cancel,
    /// READY back to LISTENING
    Continue,
    /// Request current status
    GetStatus,
    /// Update the transmit rate limit
    SetRate { per_minute: u8 },
    /// Update the confirmation lifetime
    SetConfirmTimeout { ms: u32 },
    /// Block a frequency (MHz)
    BlacklistAdd { freq: f32 },
}

impl HostCommand {
    /// Wire name, echoed in acks.
    pub fn name(&self) -> &'static str {
        match self {
            HostCommand::Start => "start",
            HostCommand::Abort => "abort",
            HostCommand::Analyze => "analyze",
            HostCommand::Select { .. } => "select",
            HostCommand::Confirm => "confirm",
            HostCommand::Cancel => "cancel",
            HostCommand::Continue => "continue",
            HostCommand::GetStatus => "status",
            HostCommand::SetRate { .. } => "set_rate",
            HostCommand::SetConfirmTimeout { .. } => "set_confirm_timeout",
            HostCommand::BlacklistAdd { .. } => "blacklist_add",
        }
    }
}

/// Wire format for host commands, a flat struct that `serde_json_core` can
/// deserialize without `deserialize_any`. Converted to [`HostCommand`] in
/// `comm::parse_command()`.
#[derive(Deserialize)]
pub(crate) struct RawCommand {
    pub cmd: heapless::String<24>,
    #[serde(default)]
    pub index: Option<u8>,
    #[serde(default)]
    pub per_minute: Option<u8>,
    #[serde(default)]
    pub ms: Option<u32>,
    #[serde(default)]
    pub freq: Option<f32>,
}

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum size of a serialized JSON message
pub const MAX_MSG_LEN: usize = 512;
