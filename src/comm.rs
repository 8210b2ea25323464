/// Host command transport: serial NDJSON in, NDJSON replies out.
///
/// The platform binary feeds serial bytes through a [`LineReader`], parses
/// complete lines with [`parse_command`], applies them with
/// [`handle_command`] and writes back whatever [`Reply`] asks for.
use crate::analysis::SpectrumStats;
use crate::clock::Clock;
use crate::policy::AuditEntry;
use crate::protocol::{DeviceMessage, HostCommand, RawCommand, MAX_MSG_LEN, VERSION};
use crate::signal::CapturedSignal;
use crate::text::{format_bounded, ReasonText};
use crate::workflow::Workflow;

// ── Serialization helpers ──────────────────────────────────────────────

/// Serialize a DeviceMessage to JSON bytes and write to the output buffer.
/// Returns the number of bytes written, or None if serialization failed.
pub fn serialize_message(msg: &DeviceMessage, buf: &mut [u8]) -> Option<usize> {
    match serde_json_core::to_slice(msg, buf) {
        Ok(len) => {
            // Append newline for NDJSON
            if len < buf.len() {
                buf[len] = b'\n';
                Some(len + 1)
            } else {
                Some(len)
            }
        }
        Err(_) => None,
    }
}

/// Deserialize a HostCommand from a JSON byte slice.
pub fn parse_command(data: &[u8]) -> Option<HostCommand> {
    let trimmed = trim_trailing_whitespace(data);
    if trimmed.is_empty() {
        return None;
    }
    let (raw, _) = serde_json_core::from_slice::<RawCommand>(trimmed).ok()?;
    let cmd = match raw.cmd.as_str() {
        "start" => HostCommand::Start,
        "abort" => HostCommand::Abort,
        "analyze" => HostCommand::Analyze,
        "select" => HostCommand::Select { index: raw.index? },
        "confirm" => HostCommand::Confirm,
        "cancel" => HostCommand::Cancel,
        "continue" => HostCommand::Continue,
        "status" => HostCommand::GetStatus,
        "set_rate" => HostCommand::SetRate {
            per_minute: raw.per_minute?,
        },
        "set_confirm_timeout" => HostCommand::SetConfirmTimeout { ms: raw.ms? },
        "blacklist_add" => HostCommand::BlacklistAdd { freq: raw.freq? },
        other => {
            log::warn!("Unknown host command: {}", other);
            return None;
        }
    };
    Some(cmd)
}

/// Outcome of one host command.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Ack(&'static str),
    Rejected { cmd: &'static str, reason: ReasonText },
    /// Caller should send [`status_message`].
    Status,
}

impl Reply {
    /// Message for `Ack` and `Rejected`; `None` for `Status`.
    pub fn message(&self) -> Option<DeviceMessage<'_>> {
        match self {
            Reply::Ack(cmd) => Some(DeviceMessage::Ack { cmd: *cmd }),
            Reply::Rejected { cmd, reason } => Some(DeviceMessage::Rejected { cmd: *cmd, reason }),
            Reply::Status => None,
        }
    }
}

/// Apply a host command to the workflow.
pub fn handle_command<C: Clock>(cmd: HostCommand, workflow: &mut Workflow<C>) -> Reply {
    let name = cmd.name();
    let result: Result<(), ReasonText> = match cmd {
        HostCommand::Start => workflow.start().map_err(reason),
        HostCommand::Abort => {
            workflow.emergency_stop();
            Ok(())
        }
        HostCommand::Analyze => workflow.trigger_analysis().map_err(reason),
        HostCommand::Select { index } => workflow.select_signal(usize::from(index)).map_err(reason),
        HostCommand::Confirm => workflow.confirm_transmission().map_err(reason),
        HostCommand::Cancel => workflow.cancel_transmission().map_err(reason),
        HostCommand::Continue => workflow.continue_observation().map_err(reason),
        HostCommand::GetStatus => return Reply::Status,
        HostCommand::SetRate { per_minute } => {
            workflow.policy_mut().set_rate_limit(per_minute);
            log::info!("Rate limit set to {}/min by host", workflow.policy().rate_limit());
            Ok(())
        }
        HostCommand::SetConfirmTimeout { ms } => {
            workflow.policy_mut().set_transmit_timeout(ms);
            log::info!("Confirmation timeout set to {} ms by host", ms);
            Ok(())
        }
        HostCommand::BlacklistAdd { freq } => {
            if workflow.policy_mut().add_frequency_to_blacklist(freq) {
                Ok(())
            } else {
                Err(format_bounded(format_args!("{:.3} MHz already listed or list full", freq)))
            }
        }
    };

    match result {
        Ok(()) => Reply::Ack(name),
        Err(reason) => Reply::Rejected { cmd: name, reason },
    }
}

fn reason<E: core::fmt::Display>(err: E) -> ReasonText {
    format_bounded(format_args!("{}", err))
}

// ── Message builders ───────────────────────────────────────────────────

pub fn status_message<C: Clock>(workflow: &Workflow<C>) -> DeviceMessage<'static> {
    let now = workflow.time_in_state_ms();
    DeviceMessage::Status {
        state: workflow.state(),
        prev: workflow.previous_state(),
        band: workflow.config().band,
        in_state_ms: now,
        signals: workflow.signals().len() as u8,
        selected: workflow.selected_index().map(|i| i as u8),
        errors: workflow.error_count(),
        last_error: workflow.last_error().map(|e| e.as_str()),
        pending: workflow.is_confirmation_pending(),
        dry_run: workflow.config().dry_run,
        version: VERSION,
    }
}

pub fn signal_message(index: usize, signal: &CapturedSignal) -> DeviceMessage<'_> {
    DeviceMessage::Signal {
        index: index as u8,
        freq: signal.frequency_mhz,
        rssi: signal.rssi,
        samples: signal.sample_count() as u16,
        valid: signal.is_valid,
        protocol: &signal.protocol,
        class: &signal.device_class,
    }
}

pub fn analysis_message(stats: &SpectrumStats) -> DeviceMessage<'_> {
    DeviceMessage::Analysis {
        count: stats.signal_count,
        valid: stats.valid_count,
        unique: stats.unique_patterns,
        rssi_min: stats.rssi_min,
        rssi_max: stats.rssi_max,
        rssi_mean: stats.rssi_mean,
        span_ms: stats.capture_span_ms,
        summary: &stats.summary,
    }
}

pub fn audit_message(entry: &AuditEntry) -> DeviceMessage<'_> {
    DeviceMessage::Audit {
        ts: entry.timestamp_ms,
        freq: entry.frequency_mhz,
        dur: entry.duration_ms,
        allowed: entry.allowed,
        permission: entry.permission,
        note: &entry.note,
    }
}

// ── Serial NDJSON reader ───────────────────────────────────────────────

/// Serial NDJSON reader state machine.
/// Accumulates bytes until a newline is found, then yields the line.
pub struct LineReader {
    buf: [u8; MAX_MSG_LEN],
    pos: usize,
}

impl LineReader {
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_MSG_LEN],
            pos: 0,
        }
    }

    /// Feed a byte into the reader. Returns a complete line (without newline)
    /// when one is detected.
    pub fn feed(&mut self, byte: u8) -> Option<&[u8]> {
        if byte == b'\n' || byte == b'\r' {
            if self.pos > 0 {
                let line = &self.buf[..self.pos];
                self.pos = 0;
                Some(line)
            } else {
                None
            }
        } else if self.pos < self.buf.len() {
            self.buf[self.pos] = byte;
            self.pos += 1;
            None
        } else {
            // Overflow, discard and reset
            self.pos = 0;
            None
        }
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_trailing_whitespace(data: &[u8]) -> &[u8] {
    let mut end = data.len();
    while end > 0 && matches!(data[end - 1], b' ' | b'\n' | b'\r' | b'\t') {
        end -= 1;
    }
    &data[..end]
}
