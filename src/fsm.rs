/// Workflow state machine as data.
///
/// [`transition`] is a pure function of `(state, trigger)`; [`entry_effects`]
/// lists what must happen on entering a state and [`timeout_for`] gives each
/// state's maximum dwell. The workflow in `crate::workflow` feeds triggers in
/// and performs the effects; nothing here reads a clock or touches hardware.
use core::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::StateTimeouts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Idle,
    Init,
    Listening,
    Analyzing,
    Ready,
    TxGated,
    Transmit,
    Cleanup,
}

impl WorkflowState {
    pub const ALL: [WorkflowState; 8] = [
        WorkflowState::Idle,
        WorkflowState::Init,
        WorkflowState::Listening,
        WorkflowState::Analyzing,
        WorkflowState::Ready,
        WorkflowState::TxGated,
        WorkflowState::Transmit,
        WorkflowState::Cleanup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "IDLE",
            WorkflowState::Init => "INIT",
            WorkflowState::Listening => "LISTENING",
            WorkflowState::Analyzing => "ANALYZING",
            WorkflowState::Ready => "READY",
            WorkflowState::TxGated => "TX_GATED",
            WorkflowState::Transmit => "TRANSMIT",
            WorkflowState::Cleanup => "CLEANUP",
        }
    }

    /// States an abort (timeout, emergency stop, error threshold, cancel)
    /// can route out of.
    pub fn is_abortable(&self) -> bool {
        !matches!(self, WorkflowState::Idle | WorkflowState::Cleanup)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Start,
    InitOk,
    InitFailed,
    /// User asked for analysis after the minimum dwell.
    AnalysisRequested,
    ListenMaxReached,
    BufferFull,
    AnalysisDone,
    /// READY back to LISTENING for more capture.
    ContinueObservation,
    SignalSelected,
    GatesPassed,
    GateDenied,
    TransmitDone,
    Timeout,
    EmergencyStop,
    ErrorThreshold,
    Cancel,
    CleanupDone,
}

impl Trigger {
    pub const ALL: [Trigger; 17] = [
        Trigger::Start,
        Trigger::InitOk,
        Trigger::InitFailed,
        Trigger::AnalysisRequested,
        Trigger::ListenMaxReached,
        Trigger::BufferFull,
        Trigger::AnalysisDone,
        Trigger::ContinueObservation,
        Trigger::SignalSelected,
        Trigger::GatesPassed,
        Trigger::GateDenied,
        Trigger::TransmitDone,
        Trigger::Timeout,
        Trigger::EmergencyStop,
        Trigger::ErrorThreshold,
        Trigger::Cancel,
        Trigger::CleanupDone,
    ];

    /// Event identifier written to the deterministic log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Start => "START",
            Trigger::InitOk => "INIT_OK",
            Trigger::InitFailed => "INIT_FAILED",
            Trigger::AnalysisRequested => "ANALYSIS_REQUESTED",
            Trigger::ListenMaxReached => "LISTEN_MAX",
            Trigger::BufferFull => "BUFFER_FULL",
            Trigger::AnalysisDone => "ANALYSIS_DONE",
            Trigger::ContinueObservation => "CONTINUE",
            Trigger::SignalSelected => "SIGNAL_SELECTED",
            Trigger::GatesPassed => "GATES_PASSED",
            Trigger::GateDenied => "GATE_DENIED",
            Trigger::TransmitDone => "TRANSMIT_DONE",
            Trigger::Timeout => "TIMEOUT",
            Trigger::EmergencyStop => "EMERGENCY_STOP",
            Trigger::ErrorThreshold => "ERROR_THRESHOLD",
            Trigger::Cancel => "CANCEL",
            Trigger::CleanupDone => "CLEANUP_DONE",
        }
    }

    fn is_abort(&self) -> bool {
        matches!(
            self,
            Trigger::Timeout | Trigger::EmergencyStop | Trigger::ErrorThreshold | Trigger::Cancel
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no transition from {from} on {trigger:?}")]
pub struct InvalidTransition {
    pub from: WorkflowState,
    pub trigger: Trigger,
}

/// Side effect owed on entering a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    DisableTransmit,
    DisableReceive,
    ReleaseSignals,
    ClearConfirmation,
    ClearObserved,
    RequestConfirmation,
}

/// Next state for `trigger` in `state`.
///
/// CLEANUP is the only way into IDLE and every non-idle state can abort
/// into CLEANUP. TRANSMIT is only reachable from TX_GATED, and READY →
/// LISTENING is the single backward edge.
pub fn transition(state: WorkflowState, trigger: Trigger) -> Result<WorkflowState, InvalidTransition> {
    use Trigger as T;
    use WorkflowState as S;

    let next = match (state, trigger) {
        (S::Idle, T::Start) => S::Init,
        (S::Init, T::InitOk) => S::Listening,
        (S::Init, T::InitFailed) => S::Cleanup,
        (S::Listening, T::AnalysisRequested | T::ListenMaxReached | T::BufferFull) => S::Analyzing,
        (S::Analyzing, T::AnalysisDone) => S::Ready,
        (S::Ready, T::SignalSelected) => S::TxGated,
        (S::Ready, T::ContinueObservation) => S::Listening,
        (S::TxGated, T::GatesPassed) => S::Transmit,
        (S::TxGated, T::GateDenied) => S::Cleanup,
        (S::Transmit, T::TransmitDone) => S::Cleanup,
        (S::Cleanup, T::CleanupDone) => S::Idle,
        (s, t) if t.is_abort() && s.is_abortable() => S::Cleanup,
        (from, trigger) => return Err(InvalidTransition { from, trigger }),
    };
    Ok(next)
}

/// Effects the workflow performs when entering `state`.
pub fn entry_effects(state: WorkflowState) -> &'static [Effect] {
    match state {
        WorkflowState::Init | WorkflowState::Listening => &[Effect::DisableTransmit],
        WorkflowState::TxGated => &[Effect::RequestConfirmation],
        WorkflowState::Cleanup => &[
            Effect::DisableTransmit,
            Effect::DisableReceive,
            Effect::ReleaseSignals,
            Effect::ClearConfirmation,
            Effect::ClearObserved,
        ],
        WorkflowState::Idle | WorkflowState::Analyzing | WorkflowState::Ready | WorkflowState::Transmit => &[],
    }
}

/// `transition` plus the effects of the state it lands in.
pub fn step(state: WorkflowState, trigger: Trigger) -> Result<(WorkflowState, &'static [Effect]), InvalidTransition> {
    let next = transition(state, trigger)?;
    Ok((next, entry_effects(next)))
}

/// Maximum dwell in `state`; IDLE has none.
pub fn timeout_for(state: WorkflowState, timeouts: &StateTimeouts) -> Option<u32> {
    match state {
        WorkflowState::Idle => None,
        WorkflowState::Init => Some(timeouts.init_ms),
        WorkflowState::Listening => Some(timeouts.listening_ms),
        WorkflowState::Analyzing => Some(timeouts.analyzing_ms),
        WorkflowState::Ready => Some(timeouts.ready_ms),
        WorkflowState::TxGated => Some(timeouts.tx_gated_ms),
        WorkflowState::Transmit => Some(timeouts.transmit_ms),
        WorkflowState::Cleanup => Some(timeouts.cleanup_ms),
    }
}
