/// RF capture/replay workflow.
///
/// Drives one session through
/// IDLE → INIT → LISTENING → ANALYZING → READY → TX_GATED → TRANSMIT → CLEANUP → IDLE.
/// Each call to [`Workflow::poll`] takes at most one step; nothing blocks.
/// Waiting (listen dwell, pending confirmation, per-state timeouts) is an
/// elapsed-time check against the injected [`Clock`].
///
/// Order of checks on every poll: emergency stop, error threshold, state
/// timeout, then the state's own processing. Every transition writes an
/// exit/transition/entry triple to the deterministic log.
use alloc::boxed::Box;

use heapless::Vec;

use crate::analysis::{self, SpectrumStats};
use crate::backend::{DryRunBackend, RadioBackend};
use crate::clock::Clock;
use crate::config::{Band, WorkflowConfig};
use crate::error::{ActionRejected, BackendError, WorkflowError};
use crate::eventlog::{EventKind, EventLog};
use crate::fsm::{self, Effect, Trigger, WorkflowState};
use crate::ism::{self, ObservedAddresses};
use crate::policy::{Permission, PolicyEngine, TransmitRequest};
use crate::signal::CapturedSignal;
use crate::subghz;
use crate::text::{format_bounded, format_mac, DataText, EventId, ReasonText};

/// Signal slots available to a session.
pub const MAX_SIGNALS: usize = 100;

/// Transmission gates, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Policy,
    Confirmation,
    RateLimit,
    Band,
}

impl Gate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gate::Policy => "policy",
            Gate::Confirmation => "confirmation",
            Gate::RateLimit => "rate_limit",
            Gate::Band => "band",
        }
    }
}

pub struct Workflow<C: Clock> {
    config: WorkflowConfig,
    policy: PolicyEngine,
    log: EventLog,
    clock: C,
    subghz: Option<Box<dyn RadioBackend>>,
    ism: Option<Box<dyn RadioBackend>>,

    state: WorkflowState,
    prev_state: WorkflowState,
    state_entered_ms: u64,

    signals: Vec<CapturedSignal, MAX_SIGNALS>,
    observed: ObservedAddresses,
    stats: SpectrumStats,
    selected: Option<usize>,
    request: Option<TransmitRequest>,
    last_denial: Option<(Gate, Permission)>,

    error_count: u16,
    last_error: Option<WorkflowError>,
    emergency: bool,
    transmit_count: u32,
}

impl<C: Clock> Workflow<C> {
    pub fn new(config: WorkflowConfig, policy: PolicyEngine, clock: C) -> Self {
        let now = clock.now_ms();
        Self {
            log: EventLog::new(config.event_log_capacity),
            config,
            policy,
            clock,
            subghz: None,
            ism: None,
            state: WorkflowState::Idle,
            prev_state: WorkflowState::Idle,
            state_entered_ms: now,
            signals: Vec::new(),
            observed: ObservedAddresses::new(),
            stats: SpectrumStats::default(),
            selected: None,
            request: None,
            last_denial: None,
            error_count: 0,
            last_error: None,
            emergency: false,
            transmit_count: 0,
        }
    }

    /// Attach the radio for `band`, replacing any previous one. In dry-run
    /// configuration the radio's emit call is substituted.
    pub fn attach_backend(&mut self, band: Band, backend: Box<dyn RadioBackend>) {
        let backend: Box<dyn RadioBackend> = if self.config.dry_run {
            Box::new(DryRunBackend::new(backend))
        } else {
            backend
        };
        match band {
            Band::SubGhz433 => self.subghz = Some(backend),
            Band::Ism2400 => self.ism = Some(backend),
        }
        log::info!("{} back end attached{}", band.as_str(), if self.config.dry_run { " (dry run)" } else { "" });
    }

    /// Hand back the radio for `band`, e.g. when the platform powers it
    /// down. Selections on that band are refused until one is attached.
    pub fn detach_backend(&mut self, band: Band) -> Option<Box<dyn RadioBackend>> {
        let backend = match band {
            Band::SubGhz433 => self.subghz.take(),
            Band::Ism2400 => self.ism.take(),
        };
        if backend.is_some() {
            log::info!("{} back end detached", band.as_str());
        }
        backend
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn previous_state(&self) -> WorkflowState {
        self.prev_state
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn policy(&self) -> &PolicyEngine {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut PolicyEngine {
        &mut self.policy
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    pub fn event_log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    pub fn signals(&self) -> &[CapturedSignal] {
        &self.signals
    }

    pub fn stats(&self) -> &SpectrumStats {
        &self.stats
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn observed_addresses(&self) -> &ObservedAddresses {
        &self.observed
    }

    pub fn error_count(&self) -> u16 {
        self.error_count
    }

    /// Initialization failure or error-threshold breach of the most recent
    /// session. Cleared by the next successful `start`.
    pub fn last_error(&self) -> Option<WorkflowError> {
        self.last_error
    }

    /// Gate and verdict of the most recent denial.
    pub fn last_denial(&self) -> Option<(Gate, Permission)> {
        self.last_denial
    }

    pub fn transmit_count(&self) -> u32 {
        self.transmit_count
    }

    pub fn time_in_state_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.state_entered_ms)
    }

    /// An unconfirmed transmit request is waiting and has not expired.
    pub fn is_confirmation_pending(&self) -> bool {
        self.policy.is_confirmation_pending(self.clock.now_ms())
    }

    pub fn is_emergency_stopped(&self) -> bool {
        self.emergency
    }

    pub fn reset_errors(&mut self) {
        self.error_count = 0;
    }

    // ── User actions ────────────────────────────────────────────────

    /// Begin a session. Fails without changing state if a session is
    /// already active or no back end is attached for the configured band.
    pub fn start(&mut self) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Idle {
            log::warn!("Start ignored, session active in {}", self.state);
            return Err(WorkflowError::InitFailed("session already active"));
        }
        if self.backend().is_none() {
            let err = WorkflowError::InitFailed("no back end for band");
            self.last_error = Some(err);
            self.raise(err, "band=none");
            return Err(err);
        }

        self.last_error = None;
        self.last_denial = None;
        self.emergency = false;
        self.signals.clear();
        self.observed.clear();
        self.stats = SpectrumStats::default();
        self.selected = None;
        self.request = None;

        let band = self.config.band.as_str();
        self.user_action("START", "Session start", band);
        self.go(Trigger::Start, "Start requested");
        Ok(())
    }

    /// Ask for analysis once the minimum dwell has passed.
    pub fn trigger_analysis(&mut self) -> Result<(), ActionRejected> {
        self.expect_state(WorkflowState::Listening)?;
        let elapsed = self.time_in_state_ms();
        let min = u64::from(self.config.listen_min_ms);
        if elapsed < min {
            log::info!("Analysis refused, {} ms of minimum listen left", min - elapsed);
            return Err(ActionRejected::TooEarly {
                remaining_ms: min - elapsed,
            });
        }
        self.capture();
        self.user_action("TRIGGER_ANALYSIS", "User requested analysis", "");
        self.go(Trigger::AnalysisRequested, "User trigger");
        Ok(())
    }

    /// Pick a captured signal for replay.
    pub fn select_signal(&mut self, index: usize) -> Result<(), ActionRejected> {
        self.expect_state(WorkflowState::Ready)?;
        let signal = self.signals.get(index).ok_or(ActionRejected::IndexOutOfRange {
            index,
            count: self.signals.len(),
        })?;
        if !signal.is_valid {
            return Err(ActionRejected::InvalidSignal(index));
        }
        if self.backend().is_none() {
            return Err(ActionRejected::NoBackend);
        }

        let duration_ms = match self.config.band {
            Band::SubGhz433 => subghz::estimate_duration_ms(signal.pulses()),
            Band::Ism2400 => ism::estimate_duration_ms(signal),
        };
        let reason: ReasonText = format_bounded(format_args!("Replay signal {}", index));
        self.request = Some(TransmitRequest::new(signal.frequency_mhz, duration_ms, &reason, index));
        self.selected = Some(index);

        let data: DataText = format_bounded(format_args!("index={} duration_ms={}", index, duration_ms));
        self.user_action("SELECT_SIGNAL", "Signal selected", &data);
        self.go(Trigger::SignalSelected, "Signal selected");
        Ok(())
    }

    /// Confirm the pending transmission. Gates run on the next poll.
    pub fn confirm_transmission(&mut self) -> Result<(), ActionRejected> {
        self.expect_state(WorkflowState::TxGated)?;
        let now = self.clock.now_ms();
        if !self.policy.confirm_pending(now) {
            return Err(ActionRejected::ConfirmationExpired);
        }
        if let Some(request) = self.request.as_mut() {
            request.confirmed = true;
        }
        self.user_action("CONFIRM", "User confirmed transmission", "");
        Ok(())
    }

    /// In READY, end the session. In TX_GATED, withdraw the pending
    /// confirmation so the gates deny on the next poll.
    pub fn cancel_transmission(&mut self) -> Result<(), ActionRejected> {
        match self.state {
            WorkflowState::Ready => {
                self.user_action("CANCEL", "User cancelled", "");
                self.go(Trigger::Cancel, "User cancelled");
                Ok(())
            }
            WorkflowState::TxGated => {
                self.policy.cancel_confirmation();
                if let Some(request) = self.request.as_mut() {
                    request.confirmed = false;
                }
                self.user_action("CANCEL", "User withdrew confirmation", "");
                Ok(())
            }
            actual => Err(ActionRejected::WrongState { actual }),
        }
    }

    /// READY back to LISTENING to capture more.
    pub fn continue_observation(&mut self) -> Result<(), ActionRejected> {
        self.expect_state(WorkflowState::Ready)?;
        self.user_action("CONTINUE", "Continue observation", "");
        self.go(Trigger::ContinueObservation, "More observation requested");
        Ok(())
    }

    /// Latch the emergency stop. The next poll routes to CLEANUP ahead of
    /// any other logic.
    pub fn emergency_stop(&mut self) {
        if !self.state.is_abortable() {
            return;
        }
        log::warn!("Emergency stop in {}", self.state);
        self.emergency = true;
        self.user_action("EMERGENCY_STOP", "Emergency stop", "");
    }

    // ── Processing ──────────────────────────────────────────────────

    /// Advance by at most one step.
    pub fn poll(&mut self) {
        if self.state == WorkflowState::Idle {
            return;
        }

        if self.emergency && self.state.is_abortable() {
            self.go(Trigger::EmergencyStop, "Emergency stop");
            return;
        }

        if self.state.is_abortable() && self.error_count >= self.config.error_threshold {
            let err = WorkflowError::ErrorThresholdExceeded(self.error_count);
            log::error!("{}", err);
            self.last_error = Some(err);
            let data: DataText = format_bounded(format_args!("errors={}", self.error_count));
            self.record(EventKind::Error, err.as_str(), "Error threshold reached", &data);
            self.go(Trigger::ErrorThreshold, "Error threshold exceeded");
            return;
        }

        // An expired confirmation is a gate verdict, not a state timeout.
        if self.state == WorkflowState::TxGated && self.policy.is_confirmation_expired(self.clock.now_ms()) {
            self.process_gates();
            return;
        }

        if self.state.is_abortable() {
            if let Some(limit) = fsm::timeout_for(self.state, &self.config.timeouts) {
                let elapsed = self.time_in_state_ms();
                if elapsed >= u64::from(limit) {
                    let err = WorkflowError::Timeout(self.state);
                    log::warn!("{} after {} ms", err, elapsed);
                    self.error_count = self.error_count.saturating_add(1);
                    let data: DataText = format_bounded(format_args!("elapsed_ms={}", elapsed));
                    self.record(EventKind::Timeout, err.as_str(), "State timeout", &data);
                    // Still waiting on the user: the confirmation gate fails
                    if self.state == WorkflowState::TxGated {
                        if let Some(request) = self.request.take() {
                            let now = self.clock.now_ms();
                            self.deny(&request, Gate::Confirmation, Permission::DeniedTimeout, now);
                        }
                    }
                    self.go(Trigger::Timeout, "State timeout");
                    return;
                }
            }
        }

        match self.state {
            WorkflowState::Idle => {}
            WorkflowState::Init => self.process_init(),
            WorkflowState::Listening => self.process_listening(),
            WorkflowState::Analyzing => self.process_analyzing(),
            WorkflowState::Ready => {}
            WorkflowState::TxGated => self.process_gates(),
            WorkflowState::Transmit => self.process_transmit(),
            WorkflowState::Cleanup => self.process_cleanup(),
        }
    }

    fn process_init(&mut self) {
        if self.backend().is_some_and(|b| b.is_ready()) {
            self.go(Trigger::InitOk, "Initialization complete");
        } else {
            let err = WorkflowError::InitFailed("back end not ready");
            self.last_error = Some(err);
            self.raise(err, self.config.band.as_str());
            self.go(Trigger::InitFailed, "Init failed");
        }
    }

    fn process_listening(&mut self) {
        self.capture();

        let elapsed = self.time_in_state_ms();
        if elapsed < u64::from(self.config.listen_min_ms) {
            return;
        }
        let capacity = self.capacity();
        if self.signals.len() * 100 >= capacity * usize::from(crate::defaults::BUFFER_FULL_PERCENT) {
            self.go(Trigger::BufferFull, "Buffer full");
        } else if elapsed >= u64::from(self.config.listen_max_ms) {
            self.go(Trigger::ListenMaxReached, "Maximum listen time reached");
        }
    }

    fn process_analyzing(&mut self) {
        self.stats = analysis::analyze(&mut self.signals, self.config.band);
        log::info!("Analysis: {}", self.stats.summary);
        let reason: ReasonText = format_bounded(format_args!(
            "Analysis complete, {} of {} valid",
            self.stats.valid_count, self.stats.signal_count
        ));
        self.go(Trigger::AnalysisDone, &reason);
    }

    /// Waits while a confirmation is pending, then evaluates all four gates
    /// exactly once.
    fn process_gates(&mut self) {
        let now = self.clock.now_ms();
        if self.policy.is_confirmation_pending(now) {
            return;
        }
        let Some(request) = self.request.take() else {
            self.raise(WorkflowError::InvalidSignal, "no request");
            self.go(Trigger::GateDenied, "No transmit request");
            return;
        };

        match self.evaluate_gates(&request, now) {
            Ok(()) => {
                log::info!("All gates passed for {:.2} MHz", request.frequency_mhz);
                self.policy.log_transmit_attempt(&request, true, Permission::Allowed, now);
                self.policy.cancel_confirmation();
                self.request = Some(request);
                self.go(Trigger::GatesPassed, "All gates passed");
            }
            Err((gate, permission)) => {
                self.deny(&request, gate, permission, now);
                let reason: ReasonText = format_bounded(format_args!("Gate denied: {}", permission));
                self.go(Trigger::GateDenied, &reason);
            }
        }
    }

    /// Audit and log a refused transmission. The caller transitions.
    fn deny(&mut self, request: &TransmitRequest, gate: Gate, permission: Permission, now: u64) {
        let err = WorkflowError::GateDenied(permission);
        log::warn!("Gate {} failed: {}", gate.as_str(), err);
        self.policy.log_transmit_attempt(request, false, permission, now);
        self.policy.cancel_confirmation();
        self.last_denial = Some((gate, permission));

        let target = match gate {
            Gate::Band => self.signals.get(request.signal_index).and_then(|s| s.destination),
            _ => None,
        };
        let data: DataText = match target {
            Some(dst) => format_bounded(format_args!("gate={} dst={}", gate.as_str(), format_mac(&dst))),
            None => format_bounded(format_args!("gate={}", gate.as_str())),
        };
        self.record(EventKind::Error, err.as_str(), permission.as_str(), &data);
    }

    /// Policy, confirmation, rate limit, band; first failure wins.
    fn evaluate_gates(&mut self, request: &TransmitRequest, now: u64) -> Result<(), (Gate, Permission)> {
        let Some(signal) = self.signals.get(request.signal_index) else {
            return Err((Gate::Policy, Permission::DeniedPolicy));
        };

        if !signal.is_valid {
            return Err((Gate::Policy, Permission::DeniedPolicy));
        }
        if self.policy.is_frequency_blacklisted(request.frequency_mhz) {
            return Err((Gate::Policy, Permission::DeniedBlacklist));
        }
        if request.duration_ms > self.policy.max_transmit_duration() {
            return Err((Gate::Policy, Permission::DeniedPolicy));
        }

        let confirmation = self.policy.check_confirmation(request, now);
        if !confirmation.is_allowed() {
            return Err((Gate::Confirmation, confirmation));
        }

        if !self.policy.is_rate_limit_ok(now) {
            return Err((Gate::RateLimit, Permission::DeniedRateLimit));
        }

        let band_ok = match self.config.band {
            Band::SubGhz433 => subghz::pulse_gate(signal.pulses(), self.config.pulse_min_us, self.config.pulse_max_us),
            Band::Ism2400 => ism::destination_gate(signal, &self.observed),
        };
        if !band_ok {
            return Err((Gate::Band, Permission::DeniedPolicy));
        }
        Ok(())
    }

    fn process_transmit(&mut self) {
        let cap = self.policy.max_transmit_duration();
        let target = self
            .request
            .as_ref()
            .map(|r| (r.signal_index, r.duration_ms.min(cap)));

        let backend = match self.config.band {
            Band::SubGhz433 => self.subghz.as_deref_mut(),
            Band::Ism2400 => self.ism.as_deref_mut(),
        };
        let emitted = match (target, backend) {
            (Some((index, duration_ms)), Some(backend)) => match self.signals.get(index) {
                Some(signal) => {
                    log::info!("Transmitting {:.2} MHz for {} ms", signal.frequency_mhz, duration_ms);
                    backend.transmit(signal, duration_ms)
                }
                None => false,
            },
            _ => false,
        };

        if emitted {
            self.transmit_count += 1;
            self.go(Trigger::TransmitDone, "Transmission complete");
        } else {
            self.raise(WorkflowError::TransmissionFailed, "");
            self.go(Trigger::TransmitDone, "Transmission failed");
        }
    }

    fn process_cleanup(&mut self) {
        // CLEANUP never stalls; an overrun is recorded and cleanup still completes.
        if let Some(limit) = fsm::timeout_for(WorkflowState::Cleanup, &self.config.timeouts) {
            let elapsed = self.time_in_state_ms();
            if elapsed >= u64::from(limit) {
                let err = WorkflowError::Timeout(WorkflowState::Cleanup);
                log::warn!("{} after {} ms", err, elapsed);
                self.error_count = self.error_count.saturating_add(1);
                let data: DataText = format_bounded(format_args!("elapsed_ms={}", elapsed));
                self.record(EventKind::Timeout, err.as_str(), "Cleanup overran", &data);
            }
        }
        if self.config.reset_errors_on_cleanup {
            self.error_count = 0;
        }
        self.emergency = false;
        self.go(Trigger::CleanupDone, "Cleanup complete");
    }

    /// Pull everything the radio has queued into the signal buffer. Sources
    /// of 2.4 GHz frames are remembered for the destination gate.
    fn capture(&mut self) {
        let capacity = self.capacity();
        let band = self.config.band;
        let backend = match band {
            Band::SubGhz433 => self.subghz.as_deref_mut(),
            Band::Ism2400 => self.ism.as_deref_mut(),
        };
        let Some(backend) = backend else {
            return;
        };

        let mut dropped = 0u16;
        let mut lost = false;
        let mut budget = MAX_SIGNALS;
        while budget > 0 && backend.is_signal_available() {
            budget -= 1;
            let Some(signal) = backend.receive_signal() else {
                // Radio reported a signal it could not deliver
                lost = true;
                break;
            };
            if let (Band::Ism2400, Some(source)) = (band, signal.source) {
                self.observed.record(source);
            }
            log::debug!(
                "Captured {:.2} MHz, {} dBm, {} samples",
                signal.frequency_mhz,
                signal.rssi,
                signal.sample_count()
            );
            if self.signals.len() < capacity {
                let _ = self.signals.push(signal);
            } else {
                dropped += 1;
            }
        }

        if lost {
            self.raise(WorkflowError::HardwareFailure, "receive returned nothing");
        }
        if dropped > 0 {
            let data: DataText = format_bounded(format_args!("dropped={}", dropped));
            self.raise(WorkflowError::BufferOverflow, &data);
        }
    }

    // ── Transitions ─────────────────────────────────────────────────

    fn go(&mut self, trigger: Trigger, reason: &str) {
        let from = self.state;
        let (to, effects) = match fsm::step(from, trigger) {
            Ok(step) => step,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };

        let exit: EventId = format_bounded(format_args!("EXIT_{}", from));
        let enter: EventId = format_bounded(format_args!("ENTER_{}", to));
        let data: DataText = format_bounded(format_args!("from={} to={}", from, to));
        self.record_as(EventKind::StateExit, from, from, &exit, reason, "");
        self.record_as(EventKind::Transition, to, from, trigger.as_str(), reason, &data);
        self.record_as(EventKind::StateEntry, to, from, &enter, reason, "");

        log::info!("{} -> {}: {}", from, to, reason);
        self.prev_state = from;
        self.state = to;
        self.state_entered_ms = self.clock.now_ms();

        for &effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::DisableTransmit => self.disable_all(Effect::DisableTransmit),
            Effect::DisableReceive => self.disable_all(Effect::DisableReceive),
            Effect::ReleaseSignals => {
                if !self.signals.is_empty() {
                    log::info!("Releasing {} captured signals", self.signals.len());
                }
                self.signals.clear();
                self.selected = None;
                self.request = None;
            }
            Effect::ClearConfirmation => self.policy.cancel_confirmation(),
            Effect::ClearObserved => self.observed.clear(),
            Effect::RequestConfirmation => {
                if let Some(request) = &self.request {
                    if self.policy.config().require_confirmation {
                        let now = self.clock.now_ms();
                        self.policy.request_user_confirmation(request, now);
                    }
                }
            }
        }
    }

    /// Disable transmit or receive on every attached radio. Failures are
    /// logged and never stop the remaining radios or the transition.
    fn disable_all(&mut self, effect: Effect) {
        let transmit = effect == Effect::DisableTransmit;
        let event = if transmit { "DISABLE_TX_FAILED" } else { "DISABLE_RX_FAILED" };
        let mut failures: Vec<BackendError, 2> = Vec::new();
        for backend in [self.subghz.as_deref_mut(), self.ism.as_deref_mut()].into_iter().flatten() {
            let result = if transmit {
                backend.disable_transmit()
            } else {
                backend.disable_receive()
            };
            if let Err(e) = result {
                let _ = failures.push(e);
            }
        }
        for e in failures {
            log::error!("Back end disable failed: {}", e);
            let reason: ReasonText = format_bounded(format_args!("{}", e));
            self.record(EventKind::Error, event, &reason, "");
        }
    }

    // ── Bookkeeping ─────────────────────────────────────────────────

    fn backend(&self) -> Option<&dyn RadioBackend> {
        match self.config.band {
            Band::SubGhz433 => self.subghz.as_deref(),
            Band::Ism2400 => self.ism.as_deref(),
        }
    }

    fn capacity(&self) -> usize {
        usize::from(self.config.buffer_size).clamp(1, MAX_SIGNALS)
    }

    fn expect_state(&self, expected: WorkflowState) -> Result<(), ActionRejected> {
        if self.state == expected {
            Ok(())
        } else {
            log::info!("Action needs {}, workflow is in {}", expected, self.state);
            Err(ActionRejected::WrongState { actual: self.state })
        }
    }

    /// Count a recoverable error and log it.
    fn raise(&mut self, err: WorkflowError, data: &str) {
        self.error_count = self.error_count.saturating_add(1);
        log::warn!("Workflow error: {} ({} total)", err, self.error_count);
        let reason: ReasonText = format_bounded(format_args!("{}", err));
        self.record(EventKind::Error, err.as_str(), &reason, data);
    }

    fn user_action(&mut self, event: &str, reason: &str, data: &str) {
        self.record(EventKind::UserAction, event, reason, data);
    }

    fn record(&mut self, kind: EventKind, event: &str, reason: &str, data: &str) {
        self.record_as(kind, self.state, self.prev_state, event, reason, data);
    }

    fn record_as(
        &mut self,
        kind: EventKind,
        state: WorkflowState,
        prev_state: WorkflowState,
        event: &str,
        reason: &str,
        data: &str,
    ) {
        if self.config.deterministic_logging {
            let now_us = self.clock.now_us();
            self.log.record(kind, state, prev_state, event, reason, data, now_us);
        }
    }
}
