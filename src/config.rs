/// Runtime configuration for the workflow and the policy engine.
///
/// Both structs are plain data with `const fn new()` defaults so they can
/// live in statics on firmware targets. Values may be changed between
/// sessions; the policy engine also exposes setters for live adjustment.
use serde::{Deserialize, Serialize};

use crate::defaults;

/// Radio band the session captures and replays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    /// CC1101-class OOK/ASK receiver around 433.92 MHz.
    #[serde(rename = "433mhz")]
    SubGhz433,
    /// 2.4 GHz packet radio (Wi-Fi / ESP-NOW frames).
    #[serde(rename = "2.4ghz")]
    Ism2400,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::SubGhz433 => "433 MHz",
            Band::Ism2400 => "2.4 GHz",
        }
    }
}

/// Maximum dwell per state before a TIMEOUT routes to CLEANUP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTimeouts {
    pub init_ms: u32,
    pub listening_ms: u32,
    pub analyzing_ms: u32,
    pub ready_ms: u32,
    pub tx_gated_ms: u32,
    pub transmit_ms: u32,
    pub cleanup_ms: u32,
}

impl StateTimeouts {
    pub const fn new() -> Self {
        Self {
            init_ms: defaults::INIT_TIMEOUT_MS,
            listening_ms: defaults::LISTENING_TIMEOUT_MS,
            analyzing_ms: defaults::ANALYZE_TIMEOUT_MS,
            ready_ms: defaults::READY_TIMEOUT_MS,
            tx_gated_ms: defaults::TX_GATE_TIMEOUT_MS,
            transmit_ms: defaults::TRANSMIT_TIMEOUT_MS,
            cleanup_ms: defaults::CLEANUP_TIMEOUT_MS,
        }
    }
}

impl Default for StateTimeouts {
    fn default() -> Self {
        Self::new()
    }
}

/// Workflow session configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowConfig {
    pub band: Band,
    /// No analysis before this much listening.
    pub listen_min_ms: u32,
    /// Forced analysis after this much listening.
    pub listen_max_ms: u32,
    pub timeouts: StateTimeouts,
    /// Skip only the physical emit call.
    pub dry_run: bool,
    /// Signal slots used per session (at most `MAX_SIGNALS`).
    pub buffer_size: u16,
    /// Valid replay pulse widths for the 433 MHz band gate (microseconds).
    pub pulse_min_us: u16,
    pub pulse_max_us: u16,
    /// Recoverable errors tolerated before CLEANUP is forced.
    pub error_threshold: u16,
    /// Zero the error counter when CLEANUP completes.
    pub reset_errors_on_cleanup: bool,
    pub deterministic_logging: bool,
    pub event_log_capacity: usize,
}

impl WorkflowConfig {
    pub const fn new() -> Self {
        Self {
            band: Band::SubGhz433,
            listen_min_ms: defaults::LISTEN_MIN_MS,
            listen_max_ms: defaults::LISTEN_MAX_MS,
            timeouts: StateTimeouts::new(),
            dry_run: false,
            buffer_size: defaults::SIGNAL_BUFFER_SIZE,
            pulse_min_us: defaults::PULSE_MIN_US,
            pulse_max_us: defaults::PULSE_MAX_US,
            error_threshold: defaults::ERROR_THRESHOLD,
            reset_errors_on_cleanup: true,
            deterministic_logging: true,
            event_log_capacity: defaults::EVENT_LOG_CAPACITY,
        }
    }

    pub const fn with_band(mut self, band: Band) -> Self {
        self.band = band;
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Policy engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct PolicyConfig {
    pub require_confirmation: bool,
    pub confirmation_timeout_ms: u32,
    pub max_transmit_ms: u32,
    pub rate_limit_per_minute: u8,
    pub audit_capacity: usize,
    /// Seed the blacklist from `defaults::FREQUENCY_BLACKLIST`.
    pub default_blacklist: bool,
}

impl PolicyConfig {
    pub const fn new() -> Self {
        Self {
            require_confirmation: true,
            confirmation_timeout_ms: defaults::CONFIRMATION_TIMEOUT_MS,
            max_transmit_ms: defaults::MAX_TRANSMIT_DURATION_MS,
            rate_limit_per_minute: defaults::RATE_LIMIT_PER_MINUTE,
            audit_capacity: defaults::AUDIT_LOG_CAPACITY,
            default_blacklist: true,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::new()
    }
}
