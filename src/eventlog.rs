/// Deterministic event log.
///
/// Sequence-numbered, timestamped record of every state change, user action
/// and error, independent of the policy audit trail. Fixed capacity; the
/// oldest entry is dropped on overflow. Sequence numbers are never reused,
/// not even across [`EventLog::clear`].
///
/// Export renders the whole buffer in insertion order either as
/// `{"workflow_logs":[...]}` JSON or as CSV, into any `fmt::Write` sink.
use alloc::string::String;
use core::fmt::{self, Write};

use serde::Serialize;

use crate::error::ExportError;
use crate::fsm::WorkflowState;
use crate::ring::BoundedRing;
use crate::text::{bounded, DataText, EventId, ReasonText};

/// Upper bound for the event ring; `WorkflowConfig::event_log_capacity`
/// selects the effective size.
pub const MAX_EVENT_ENTRIES: usize = 256;

/// Serialization scratch per JSON entry.
const ENTRY_JSON_MAX: usize = 512;

pub const CSV_HEADER: &str = "sequence,timestamp_ms,timestamp_us,event_type,state,prev_state,event,reason,data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    StateEntry,
    StateExit,
    Transition,
    Error,
    UserAction,
    Timeout,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::StateEntry => "STATE_ENTRY",
            EventKind::StateExit => "STATE_EXIT",
            EventKind::Transition => "TRANSITION",
            EventKind::Error => "ERROR",
            EventKind::UserAction => "USER_ACTION",
            EventKind::Timeout => "TIMEOUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub seq: u64,
    pub timestamp_ms: u64,
    pub timestamp_us: u64,
    pub event_type: EventKind,
    pub state: WorkflowState,
    pub prev_state: WorkflowState,
    pub event: EventId,
    pub reason: ReasonText,
    pub data: DataText,
}

pub struct EventLog {
    ring: BoundedRing<LogEntry, MAX_EVENT_ENTRIES>,
    next_seq: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: BoundedRing::new(capacity),
            next_seq: 0,
        }
    }

    /// Append one entry stamped with `now_us`. Returns its sequence number.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        kind: EventKind,
        state: WorkflowState,
        prev_state: WorkflowState,
        event: &str,
        reason: &str,
        data: &str,
        now_us: u64,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.ring.push(LogEntry {
            seq,
            timestamp_ms: now_us / 1000,
            timestamp_us: now_us,
            event_type: kind,
            state,
            prev_state,
            event: bounded(event),
            reason: bounded(reason),
            data: bounded(data),
        });
        seq
    }

    /// Drop all entries. The sequence counter keeps counting.
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Entry `index` in insertion order.
    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.ring.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.ring.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.ring.newest()
    }

    /// Sequence number the next entry will get.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    // ── Export ──────────────────────────────────────────────────────

    pub fn write_json<W: Write>(&self, out: &mut W) -> Result<(), ExportError> {
        out.write_str("{\"workflow_logs\":[")?;
        let mut buf = [0u8; ENTRY_JSON_MAX];
        for (i, entry) in self.ring.iter().enumerate() {
            if i > 0 {
                out.write_char(',')?;
            }
            let len = serde_json_core::to_slice(entry, &mut buf)
                .map_err(|_| ExportError::EntryTooLarge { seq: entry.seq })?;
            let json = core::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?;
            out.write_str(json)?;
        }
        out.write_str("]}")?;
        Ok(())
    }

    pub fn write_csv<W: Write>(&self, out: &mut W) -> Result<(), ExportError> {
        out.write_str(CSV_HEADER)?;
        out.write_char('\n')?;
        for e in self.ring.iter() {
            write!(
                out,
                "{},{},{},{},{},{},",
                e.seq,
                e.timestamp_ms,
                e.timestamp_us,
                e.event_type.as_str(),
                e.state,
                e.prev_state
            )?;
            write_csv_field(out, &e.event)?;
            out.write_char(',')?;
            write_csv_field(out, &e.reason)?;
            out.write_char(',')?;
            write_csv_field(out, &e.data)?;
            out.write_char('\n')?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        let mut s = String::new();
        self.write_json(&mut s)?;
        Ok(s)
    }

    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut s = String::new();
        self.write_csv(&mut s)?;
        Ok(s)
    }
}

/// Quote fields containing separators, doubling embedded quotes.
fn write_csv_field<W: Write>(out: &mut W, field: &str) -> fmt::Result {
    if !field.contains([',', '"', '\n', '\r']) {
        return out.write_str(field);
    }
    out.write_char('"')?;
    for (i, part) in field.split('"').enumerate() {
        if i > 0 {
            out.write_str("\"\"")?;
        }
        out.write_str(part)?;
    }
    out.write_char('"')
}
