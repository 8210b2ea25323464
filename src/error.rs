/// Error taxonomy.
///
/// - [`WorkflowError`]: failures inside a session. Gate and validation
///   failures are resolved locally (transition + log entry); only
///   initialization failure and error-threshold breach are surfaced through
///   `Workflow::last_error()`.
/// - [`ActionRejected`]: a user action refused without changing state.
/// - [`BackendError`]: a back end could not honor a disable request. Logged,
///   never allowed to block the return to IDLE.
/// - [`ExportError`]: deterministic log could not be rendered.
use thiserror::Error;

use crate::fsm::WorkflowState;
use crate::policy::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("initialization failed: {0}")]
    InitFailed(&'static str),

    #[error("hardware failure")]
    HardwareFailure,

    #[error("signal buffer overflow")]
    BufferOverflow,

    #[error("timeout in state {0}")]
    Timeout(WorkflowState),

    #[error("invalid signal")]
    InvalidSignal,

    #[error("transmission failed")]
    TransmissionFailed,

    #[error("transmission gate denied: {0}")]
    GateDenied(Permission),

    #[error("error threshold exceeded ({0} errors)")]
    ErrorThresholdExceeded(u16),
}

impl WorkflowError {
    /// Short stable name for log records.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowError::InitFailed(_) => "INIT_FAILED",
            WorkflowError::HardwareFailure => "HARDWARE_FAILURE",
            WorkflowError::BufferOverflow => "BUFFER_OVERFLOW",
            WorkflowError::Timeout(_) => "TIMEOUT",
            WorkflowError::InvalidSignal => "INVALID_SIGNAL",
            WorkflowError::TransmissionFailed => "TRANSMISSION_FAILED",
            WorkflowError::GateDenied(_) => "GATE_DENIED",
            WorkflowError::ErrorThresholdExceeded(_) => "ERROR_THRESHOLD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("action not valid in state {actual}")]
    WrongState { actual: WorkflowState },

    #[error("minimum listen time not reached ({remaining_ms} ms remaining)")]
    TooEarly { remaining_ms: u64 },

    #[error("signal index {index} out of range ({count} captured)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("signal {0} failed validation")]
    InvalidSignal(usize),

    #[error("no back end attached for the configured band")]
    NoBackend,

    #[error("confirmation expired or not pending")]
    ConfirmationExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("radio did not acknowledge")]
    NoAck,

    #[error("radio bus error")]
    Bus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("output sink rejected write")]
    Sink(#[from] core::fmt::Error),

    #[error("entry {seq} does not fit the serialization buffer")]
    EntryTooLarge { seq: u64 },
}
