/// Policy and audit engine.
///
/// Evaluates every transmit request against the blacklist, the pending
/// user confirmation, the rolling rate window and the duration limit, and
/// keeps an append-only audit ring of every decision. One instance per
/// device session, constructed explicitly and handed to the workflow.
///
/// Time is passed in as milliseconds on the caller's monotonic clock so
/// every evaluation is deterministic and testable without real waiting.
use core::fmt;

use heapless::{Deque, Vec};
use serde::Serialize;

use crate::config::PolicyConfig;
use crate::defaults::{FREQUENCY_BLACKLIST, FREQUENCY_EPSILON_MHZ, RATE_WINDOW_MS};
use crate::ring::BoundedRing;
use crate::text::{bounded, ReasonText};

/// Upper bound for the audit ring; `PolicyConfig::audit_capacity` selects
/// the effective size.
pub const MAX_AUDIT_ENTRIES: usize = 128;

/// Upper bound for `rate_limit_per_minute`.
pub const MAX_RATE_LIMIT: usize = 64;

pub const MAX_BLACKLIST: usize = 32;

/// Outcome of one policy evaluation. Never partially granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    Allowed,
    DeniedNoConfirmation,
    DeniedTimeout,
    DeniedRateLimit,
    DeniedBlacklist,
    /// Request exceeds a configured limit (duration, band constraints).
    DeniedPolicy,
}

impl Permission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Permission::Allowed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Allowed => "ALLOWED",
            Permission::DeniedNoConfirmation => "DENIED_NO_CONFIRMATION",
            Permission::DeniedTimeout => "DENIED_TIMEOUT",
            Permission::DeniedRateLimit => "DENIED_RATE_LIMIT",
            Permission::DeniedBlacklist => "DENIED_BLACKLIST",
            Permission::DeniedPolicy => "DENIED_POLICY",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transmission attempt. Lives for a single pass through the gates.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmitRequest {
    pub frequency_mhz: f32,
    pub duration_ms: u32,
    pub reason: ReasonText,
    /// Set only by explicit user action.
    pub confirmed: bool,
    /// Index of the captured signal this request replays.
    pub signal_index: usize,
}

impl TransmitRequest {
    pub fn new(frequency_mhz: f32, duration_ms: u32, reason: &str, signal_index: usize) -> Self {
        Self {
            frequency_mhz,
            duration_ms,
            reason: bounded(reason),
            confirmed: false,
            signal_index,
        }
    }

    pub fn confirmed(mut self) -> Self {
        self.confirmed = true;
        self
    }
}

/// Immutable audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    #[serde(rename = "ts")]
    pub timestamp_ms: u64,
    #[serde(rename = "freq")]
    pub frequency_mhz: f32,
    #[serde(rename = "dur")]
    pub duration_ms: u32,
    pub allowed: bool,
    pub permission: Permission,
    pub note: ReasonText,
}

#[derive(Debug, Clone)]
struct PendingConfirmation {
    request: TransmitRequest,
    requested_at_ms: u64,
    confirmed: bool,
}

/// Snapshot for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyStatus {
    pub require_confirmation: bool,
    pub confirmation_pending: bool,
    pub recent_transmits: u8,
    pub rate_limit: u8,
    pub blacklisted: u8,
    pub audit_entries: u8,
}

pub struct PolicyEngine {
    config: PolicyConfig,
    pending: Option<PendingConfirmation>,
    /// Timestamps of allowed transmissions inside the rolling window.
    recent_transmits: Deque<u64, MAX_RATE_LIMIT>,
    blacklist: Vec<f32, MAX_BLACKLIST>,
    audit: BoundedRing<AuditEntry, MAX_AUDIT_ENTRIES>,
    last_transmit_ms: Option<u64>,
}

impl PolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        let mut engine = Self {
            config,
            pending: None,
            recent_transmits: Deque::new(),
            blacklist: Vec::new(),
            audit: BoundedRing::new(config.audit_capacity),
            last_transmit_ms: None,
        };
        engine.set_rate_limit(config.rate_limit_per_minute);
        if config.default_blacklist {
            for &(freq, _) in FREQUENCY_BLACKLIST {
                engine.add_frequency_to_blacklist(freq);
            }
        }
        log::info!(
            "Policy engine ready: confirmation {}, timeout {} ms, max duration {} ms, rate {}/min, {} blacklisted",
            if engine.config.require_confirmation { "required" } else { "optional" },
            engine.config.confirmation_timeout_ms,
            engine.config.max_transmit_ms,
            engine.config.rate_limit_per_minute,
            engine.blacklist.len()
        );
        engine
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    // ── Evaluation ──────────────────────────────────────────────────

    /// Evaluate `request` against the current policy state. Does not
    /// mutate anything; the rate window only changes on
    /// [`log_transmit_attempt`](Self::log_transmit_attempt).
    ///
    /// Order: blacklist, confirmation timeout, missing confirmation,
    /// rate limit, duration.
    pub fn check_transmit_policy(&self, request: &TransmitRequest, now_ms: u64) -> Permission {
        if self.is_frequency_blacklisted(request.frequency_mhz) {
            return Permission::DeniedBlacklist;
        }
        let confirmation = self.check_confirmation(request, now_ms);
        if !confirmation.is_allowed() {
            return confirmation;
        }
        if !self.rate_limit_ok_at(now_ms) {
            return Permission::DeniedRateLimit;
        }
        if request.duration_ms > self.config.max_transmit_ms {
            return Permission::DeniedPolicy;
        }
        Permission::Allowed
    }

    /// Confirmation part of the policy alone.
    pub fn check_confirmation(&self, request: &TransmitRequest, now_ms: u64) -> Permission {
        if let Some(pending) = &self.pending {
            if self.expired(pending, now_ms) {
                return Permission::DeniedTimeout;
            }
        }
        if !self.config.require_confirmation {
            return Permission::Allowed;
        }
        let confirmed_pending = self
            .pending
            .as_ref()
            .is_some_and(|p| p.confirmed && same_target(&p.request, request));
        if request.confirmed || confirmed_pending {
            Permission::Allowed
        } else {
            Permission::DeniedNoConfirmation
        }
    }

    fn expired(&self, pending: &PendingConfirmation, now_ms: u64) -> bool {
        !pending.confirmed
            && now_ms.saturating_sub(pending.requested_at_ms) >= u64::from(self.config.confirmation_timeout_ms)
    }

    // ── Confirmation ────────────────────────────────────────────────

    /// Open a pending confirmation for `request`, replacing any other.
    pub fn request_user_confirmation(&mut self, request: &TransmitRequest, now_ms: u64) {
        if self.pending.is_some() {
            log::debug!("Replacing pending confirmation");
        }
        log::info!("Confirmation requested for {:.2} MHz transmission", request.frequency_mhz);
        self.pending = Some(PendingConfirmation {
            request: request.clone(),
            requested_at_ms: now_ms,
            confirmed: false,
        });
    }

    /// Record the user's explicit confirmation. Refused once expired.
    pub fn confirm_pending(&mut self, now_ms: u64) -> bool {
        let timeout = u64::from(self.config.confirmation_timeout_ms);
        match self.pending.as_mut() {
            Some(p) if !p.confirmed && now_ms.saturating_sub(p.requested_at_ms) < timeout => {
                p.confirmed = true;
                p.request.confirmed = true;
                log::info!("Confirmation granted");
                true
            }
            _ => false,
        }
    }

    /// Drop any pending confirmation. Idempotent.
    pub fn cancel_confirmation(&mut self) {
        if self.pending.take().is_some() {
            log::info!("Confirmation cancelled");
        }
    }

    /// True while an unconfirmed request is waiting and has not expired.
    pub fn is_confirmation_pending(&self, now_ms: u64) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.confirmed && !self.expired(p, now_ms))
    }

    /// True once an unconfirmed request has outlived its lifetime and has
    /// not been cancelled yet.
    pub fn is_confirmation_expired(&self, now_ms: u64) -> bool {
        self.pending.as_ref().is_some_and(|p| self.expired(p, now_ms))
    }

    /// The request awaiting confirmation, if any.
    pub fn pending_request(&self) -> Option<&TransmitRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    // ── Audit ───────────────────────────────────────────────────────

    /// Append a decision to the audit ring. Allowed attempts also enter the
    /// rolling rate window.
    pub fn log_transmit_attempt(&mut self, request: &TransmitRequest, allowed: bool, permission: Permission, now_ms: u64) {
        debug_assert_eq!(allowed, permission.is_allowed(), "audit verdict disagrees with permission");

        self.audit.push(AuditEntry {
            timestamp_ms: now_ms,
            frequency_mhz: request.frequency_mhz,
            duration_ms: request.duration_ms,
            allowed,
            permission,
            note: request.reason.clone(),
        });

        if allowed {
            if self.recent_transmits.is_full() {
                self.recent_transmits.pop_front();
            }
            let _ = self.recent_transmits.push_back(now_ms);
            self.last_transmit_ms = Some(now_ms);
        }

        log::info!(
            "Audit: {:.2} MHz for {} ms - {} ({})",
            request.frequency_mhz,
            request.duration_ms,
            if allowed { "ALLOWED" } else { "DENIED" },
            permission
        );
    }

    /// Up to `count` audit entries in chronological order, ending `offset`
    /// entries before the newest. Out-of-range values are clamped.
    pub fn recent_logs(&self, count: usize, offset: usize) -> impl Iterator<Item = &AuditEntry> + '_ {
        let end = self.audit.len().saturating_sub(offset);
        let start = end.saturating_sub(count);
        self.audit.iter().skip(start).take(end - start)
    }

    pub fn audit_len(&self) -> usize {
        self.audit.len()
    }

    pub fn clear_logs(&mut self) {
        self.audit.clear();
        log::info!("Audit log cleared");
    }

    // ── Rate limiting ───────────────────────────────────────────────

    /// Prune the window, then compare against the limit.
    pub fn is_rate_limit_ok(&mut self, now_ms: u64) -> bool {
        self.cleanup_old_transmits(now_ms);
        self.recent_transmits.len() < usize::from(self.config.rate_limit_per_minute)
    }

    /// Drop window entries at least `RATE_WINDOW_MS` old.
    pub fn cleanup_old_transmits(&mut self, now_ms: u64) {
        while let Some(&oldest) = self.recent_transmits.front() {
            if now_ms.saturating_sub(oldest) >= RATE_WINDOW_MS {
                self.recent_transmits.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn recent_transmit_count(&mut self, now_ms: u64) -> usize {
        self.cleanup_old_transmits(now_ms);
        self.recent_transmits.len()
    }

    fn rate_limit_ok_at(&self, now_ms: u64) -> bool {
        let in_window = self
            .recent_transmits
            .iter()
            .filter(|&&t| now_ms.saturating_sub(t) < RATE_WINDOW_MS)
            .count();
        in_window < usize::from(self.config.rate_limit_per_minute)
    }

    pub fn last_transmit_ms(&self) -> Option<u64> {
        self.last_transmit_ms
    }

    // ── Blacklist ───────────────────────────────────────────────────

    /// Returns false if already listed or the list is full.
    pub fn add_frequency_to_blacklist(&mut self, frequency_mhz: f32) -> bool {
        if self.is_frequency_blacklisted(frequency_mhz) {
            return false;
        }
        match self.blacklist.push(frequency_mhz) {
            Ok(()) => {
                log::info!("Blacklisted {:.3} MHz", frequency_mhz);
                true
            }
            Err(_) => {
                log::warn!("Blacklist full, {:.3} MHz not added", frequency_mhz);
                false
            }
        }
    }

    pub fn remove_frequency_from_blacklist(&mut self, frequency_mhz: f32) -> bool {
        match self.blacklist.iter().position(|&f| within_epsilon(f, frequency_mhz)) {
            Some(i) => {
                self.blacklist.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn is_frequency_blacklisted(&self, frequency_mhz: f32) -> bool {
        self.blacklist.iter().any(|&f| within_epsilon(f, frequency_mhz))
    }

    pub fn blacklisted_frequencies(&self) -> &[f32] {
        &self.blacklist
    }

    // ── Runtime adjustment ──────────────────────────────────────────

    /// Confirmation lifetime.
    pub fn set_transmit_timeout(&mut self, timeout_ms: u32) {
        self.config.confirmation_timeout_ms = timeout_ms;
    }

    /// Clamped to 1..=`MAX_RATE_LIMIT`.
    pub fn set_rate_limit(&mut self, per_minute: u8) {
        let clamped = per_minute.clamp(1, MAX_RATE_LIMIT as u8);
        if clamped != per_minute {
            log::warn!("Rate limit {}/min out of range, using {}/min", per_minute, clamped);
        }
        self.config.rate_limit_per_minute = clamped;
    }

    pub fn rate_limit(&self) -> u8 {
        self.config.rate_limit_per_minute
    }

    pub fn set_max_transmit_duration(&mut self, duration_ms: u32) {
        self.config.max_transmit_ms = duration_ms;
    }

    pub fn max_transmit_duration(&self) -> u32 {
        self.config.max_transmit_ms
    }

    pub fn set_require_confirmation(&mut self, required: bool) {
        if !required {
            log::warn!("User confirmation requirement disabled");
        }
        self.config.require_confirmation = required;
    }

    pub fn status(&self, now_ms: u64) -> PolicyStatus {
        let recent = self
            .recent_transmits
            .iter()
            .filter(|&&t| now_ms.saturating_sub(t) < RATE_WINDOW_MS)
            .count();
        PolicyStatus {
            require_confirmation: self.config.require_confirmation,
            confirmation_pending: self.is_confirmation_pending(now_ms),
            recent_transmits: recent as u8,
            rate_limit: self.config.rate_limit_per_minute,
            blacklisted: self.blacklist.len() as u8,
            audit_entries: self.audit.len() as u8,
        }
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new(PolicyConfig::new())
    }
}

/// A confirmation only covers the signal and frequency it was opened for.
fn same_target(a: &TransmitRequest, b: &TransmitRequest) -> bool {
    a.signal_index == b.signal_index && within_epsilon(a.frequency_mhz, b.frequency_mhz)
}

fn within_epsilon(a: f32, b: f32) -> bool {
    let d = a - b;
    d < FREQUENCY_EPSILON_MHZ && d > -FREQUENCY_EPSILON_MHZ
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(freq: f32, duration: u32) -> TransmitRequest {
        TransmitRequest::new(freq, duration, "Test transmission", 0)
    }

    // ── Confirmation ────────────────────────────────────────────────

    #[test]
    fn confirmation_timeout_denies_and_clears_pending() {
        let mut policy = PolicyEngine::default();
        policy.set_transmit_timeout(1000);
        let req = request(433.92, 100);

        policy.request_user_confirmation(&req, 0);
        assert!(policy.is_confirmation_pending(500));

        assert_eq!(policy.check_transmit_policy(&req, 1100), Permission::DeniedTimeout);
        assert!(!policy.is_confirmation_pending(1100));
    }

    #[test]
    fn unconfirmed_request_is_denied() {
        let policy = PolicyEngine::default();
        assert_eq!(
            policy.check_transmit_policy(&request(433.92, 100), 0),
            Permission::DeniedNoConfirmation
        );
    }

    #[test]
    fn cancellation_leaves_request_unconfirmed() {
        let mut policy = PolicyEngine::default();
        let req = request(433.92, 100);
        policy.request_user_confirmation(&req, 0);
        assert!(policy.is_confirmation_pending(0));

        policy.cancel_confirmation();
        policy.cancel_confirmation();
        assert!(!policy.is_confirmation_pending(0));
        assert_eq!(policy.check_transmit_policy(&req, 10), Permission::DeniedNoConfirmation);
    }

    #[test]
    fn confirm_pending_grants_before_expiry() {
        let mut policy = PolicyEngine::default();
        policy.set_transmit_timeout(1000);
        let req = request(433.92, 100);
        policy.request_user_confirmation(&req, 0);

        assert!(policy.confirm_pending(900));
        assert!(!policy.is_confirmation_pending(900));
        // Confirmed requests no longer expire
        assert_eq!(policy.check_transmit_policy(&req, 1500), Permission::Allowed);
        assert!(policy.pending_request().is_some_and(|r| r.confirmed));
    }

    #[test]
    fn confirmation_covers_only_its_own_request() {
        let mut policy = PolicyEngine::default();
        policy.request_user_confirmation(&request(433.92, 100), 0);
        assert!(policy.confirm_pending(10));

        let other_signal = TransmitRequest::new(433.92, 100, "Test transmission", 1);
        assert_eq!(policy.check_confirmation(&other_signal, 20), Permission::DeniedNoConfirmation);
        assert_eq!(policy.check_confirmation(&request(315.0, 100), 20), Permission::DeniedNoConfirmation);
        assert_eq!(policy.check_confirmation(&request(433.92, 100), 20), Permission::Allowed);
    }

    #[test]
    fn expiry_is_visible_until_cancelled() {
        let mut policy = PolicyEngine::default();
        policy.set_transmit_timeout(1000);
        policy.request_user_confirmation(&request(433.92, 100), 0);
        assert!(!policy.is_confirmation_expired(999));
        assert!(policy.is_confirmation_expired(1000));
        policy.cancel_confirmation();
        assert!(!policy.is_confirmation_expired(1000));

        policy.request_user_confirmation(&request(433.92, 100), 0);
        assert!(policy.confirm_pending(500));
        assert!(!policy.is_confirmation_expired(5000));
    }

    #[test]
    fn confirm_pending_refused_after_expiry() {
        let mut policy = PolicyEngine::default();
        policy.set_transmit_timeout(1000);
        policy.request_user_confirmation(&request(433.92, 100), 0);
        assert!(!policy.confirm_pending(1000));
        assert!(!policy.confirm_pending(5000));
    }

    #[test]
    fn new_request_replaces_pending() {
        let mut policy = PolicyEngine::default();
        policy.set_transmit_timeout(1000);
        policy.request_user_confirmation(&request(433.92, 100), 0);
        policy.request_user_confirmation(&request(315.0, 200), 800);
        assert!(policy.is_confirmation_pending(1500));
        assert_eq!(policy.pending_request().map(|r| r.duration_ms), Some(200));
    }

    #[test]
    fn confirmation_optional_when_disabled() {
        let mut policy = PolicyEngine::default();
        policy.set_require_confirmation(false);
        assert_eq!(policy.check_transmit_policy(&request(433.92, 100), 0), Permission::Allowed);
    }

    // ── Rate limiting ───────────────────────────────────────────────

    #[test]
    fn rate_limit_denies_after_n_allowed() {
        let mut policy = PolicyEngine::default();
        policy.set_rate_limit(3);
        let req = request(433.92, 100).confirmed();

        for i in 0..3 {
            let now = i * 1000;
            assert_eq!(policy.check_transmit_policy(&req, now), Permission::Allowed);
            policy.log_transmit_attempt(&req, true, Permission::Allowed, now);
        }
        assert_eq!(policy.check_transmit_policy(&req, 3000), Permission::DeniedRateLimit);
        assert!(!policy.is_rate_limit_ok(3000));
    }

    #[test]
    fn rate_window_rolls_after_sixty_seconds() {
        let mut policy = PolicyEngine::default();
        policy.set_rate_limit(2);
        let req = request(433.92, 100).confirmed();
        policy.log_transmit_attempt(&req, true, Permission::Allowed, 1_000);
        policy.log_transmit_attempt(&req, true, Permission::Allowed, 2_000);

        assert_eq!(policy.check_transmit_policy(&req, 60_999), Permission::DeniedRateLimit);
        // Oldest counted transmission is now 60 s old
        assert_eq!(policy.check_transmit_policy(&req, 61_000), Permission::Allowed);
        assert_eq!(policy.recent_transmit_count(61_000), 1);
    }

    #[test]
    fn denied_attempts_do_not_consume_rate() {
        let mut policy = PolicyEngine::default();
        policy.set_rate_limit(1);
        let req = request(433.92, 100).confirmed();
        policy.log_transmit_attempt(&req, false, Permission::DeniedBlacklist, 0);
        assert!(policy.is_rate_limit_ok(0));
        assert_eq!(policy.last_transmit_ms(), None);
    }

    #[test]
    fn check_does_not_prune_window() {
        let mut policy = PolicyEngine::default();
        let req = request(433.92, 100).confirmed();
        policy.log_transmit_attempt(&req, true, Permission::Allowed, 0);
        let _ = policy.check_transmit_policy(&req, 120_000);
        assert_eq!(policy.recent_transmits.len(), 1);
        policy.cleanup_old_transmits(120_000);
        assert!(policy.recent_transmits.is_empty());
    }

    #[test]
    fn rate_limit_is_clamped() {
        let mut policy = PolicyEngine::default();
        policy.set_rate_limit(0);
        assert_eq!(policy.rate_limit(), 1);
        policy.set_rate_limit(255);
        assert_eq!(policy.rate_limit(), MAX_RATE_LIMIT as u8);
    }

    // ── Blacklist ───────────────────────────────────────────────────

    #[test]
    fn default_blacklist_blocks_emergency_frequencies() {
        let policy = PolicyEngine::default();
        for freq in [121.5, 156.8, 243.0] {
            assert!(policy.is_frequency_blacklisted(freq), "{freq} should be blocked");
        }
        assert!(!policy.is_frequency_blacklisted(433.92));
    }

    #[test]
    fn blacklisted_frequency_wins_over_everything() {
        let mut policy = PolicyEngine::default();
        policy.set_transmit_timeout(10);
        assert!(policy.add_frequency_to_blacklist(315.0));
        let req = request(315.0, 999_999);
        policy.request_user_confirmation(&req, 0);
        // Expired confirmation, unconfirmed, excessive duration: still blacklist
        assert_eq!(policy.check_transmit_policy(&req, 1000), Permission::DeniedBlacklist);
        assert_eq!(
            policy.check_transmit_policy(&request(433.92, 100).confirmed(), 1000),
            Permission::DeniedTimeout
        );
    }

    #[test]
    fn non_blacklisted_valid_request_allowed() {
        let policy = PolicyEngine::default();
        assert_eq!(
            policy.check_transmit_policy(&request(433.92, 100).confirmed(), 0),
            Permission::Allowed
        );
    }

    #[test]
    fn blacklist_match_is_epsilon_tolerant() {
        let mut policy = PolicyEngine::new(PolicyConfig {
            default_blacklist: false,
            ..PolicyConfig::new()
        });
        assert!(policy.add_frequency_to_blacklist(433.92));
        assert!(policy.is_frequency_blacklisted(433.925));
        assert!(!policy.is_frequency_blacklisted(433.95));
        // Duplicate within tolerance rejected
        assert!(!policy.add_frequency_to_blacklist(433.921));
        assert!(policy.remove_frequency_from_blacklist(433.92));
        assert!(!policy.is_frequency_blacklisted(433.92));
        assert!(!policy.remove_frequency_from_blacklist(433.92));
    }

    // ── Duration ────────────────────────────────────────────────────

    #[test]
    fn excessive_duration_is_policy_denial() {
        let policy = PolicyEngine::default();
        assert_eq!(
            policy.check_transmit_policy(&request(433.92, 10_000).confirmed(), 0),
            Permission::DeniedPolicy
        );
        assert_eq!(
            policy.check_transmit_policy(&request(433.92, 5_000).confirmed(), 0),
            Permission::Allowed
        );
    }

    // ── Audit ───────────────────────────────────────────────────────

    #[test]
    fn audit_records_allowed_and_denied() {
        let mut policy = PolicyEngine::default();
        let req = request(433.92, 100).confirmed();
        policy.log_transmit_attempt(&req, true, Permission::Allowed, 10);
        policy.log_transmit_attempt(&req, false, Permission::DeniedBlacklist, 20);

        let logs: heapless::Vec<&AuditEntry, 4> = policy.recent_logs(10, 0).collect();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].allowed);
        assert!(!logs[1].allowed);
        assert_eq!(logs[1].permission, Permission::DeniedBlacklist);
        assert_eq!(logs[1].note.as_str(), "Test transmission");
    }

    #[test]
    fn audit_ring_evicts_oldest() {
        let mut policy = PolicyEngine::new(PolicyConfig {
            audit_capacity: 3,
            ..PolicyConfig::new()
        });
        let req = request(433.92, 100);
        for t in 0..5 {
            policy.log_transmit_attempt(&req, false, Permission::DeniedNoConfirmation, t);
        }
        assert_eq!(policy.audit_len(), 3);
        let first = policy.recent_logs(10, 0).next().map(|e| e.timestamp_ms);
        assert_eq!(first, Some(2));
    }

    #[test]
    fn recent_logs_clamps_offsets() {
        let mut policy = PolicyEngine::default();
        let req = request(433.92, 100);
        for t in 0..4 {
            policy.log_transmit_attempt(&req, false, Permission::DeniedNoConfirmation, t);
        }
        let ts: heapless::Vec<u64, 8> = policy.recent_logs(2, 1).map(|e| e.timestamp_ms).collect();
        assert_eq!(ts.as_slice(), &[1, 2]);
        assert_eq!(policy.recent_logs(10, 100).count(), 0);
        assert_eq!(policy.recent_logs(100, 0).count(), 4);
        assert_eq!(policy.recent_logs(0, 0).count(), 0);
    }

    #[test]
    fn audit_entry_serializes() {
        let entry = AuditEntry {
            timestamp_ms: 5,
            frequency_mhz: 433.92,
            duration_ms: 100,
            allowed: false,
            permission: Permission::DeniedRateLimit,
            note: bounded("replay"),
        };
        let mut buf = [0u8; 256];
        let len = serde_json_core::to_slice(&entry, &mut buf).unwrap();
        let json = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(json.contains(r#""permission":"DENIED_RATE_LIMIT""#));
        assert!(json.contains(r#""allowed":false"#));
        assert!(json.contains(r#""note":"replay""#));
    }

    #[test]
    fn status_reflects_state() {
        let mut policy = PolicyEngine::default();
        let req = request(433.92, 100).confirmed();
        policy.log_transmit_attempt(&req, true, Permission::Allowed, 0);
        policy.request_user_confirmation(&request(433.92, 100), 0);
        let status = policy.status(10);
        assert_eq!(status.recent_transmits, 1);
        assert!(status.confirmation_pending);
        assert_eq!(status.audit_entries, 1);
        assert_eq!(status.rate_limit, 10);
    }
}
