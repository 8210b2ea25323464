/// Compiled-in safety defaults.
///
/// Timing and limit constants for the workflow and policy engine, and the
/// frequencies that must never be transmitted on regardless of user intent.

/// Frequencies blocked out of the box (MHz, description).
///
/// Sources: ICAO Annex 10 (aviation emergency), ITU-R M.493 / GMDSS
/// (marine distress), MIL-STD-188 guard channel, COSPAS-SARSAT.
pub static FREQUENCY_BLACKLIST: &[(f32, &str)] = &[
    // === Aviation ===
    (121.5, "Aviation emergency (VHF guard)"),
    // === Marine ===
    (156.8, "Marine distress (VHF channel 16)"),
    (156.525, "Marine DSC (VHF channel 70)"),
    // === Military ===
    (243.0, "Military aviation emergency (UHF guard)"),
    // === Satellite distress beacons ===
    (406.025, "COSPAS-SARSAT distress beacon"),
    (406.028, "COSPAS-SARSAT distress beacon"),
    (406.037, "COSPAS-SARSAT distress beacon"),
];

/// Tolerance for blacklist matching (MHz).
pub const FREQUENCY_EPSILON_MHZ: f32 = 0.01;

// ── Policy engine ───────────────────────────────────────────────────

/// Pending confirmation lifetime.
pub const CONFIRMATION_TIMEOUT_MS: u32 = 10_000;
/// Longest single emission.
pub const MAX_TRANSMIT_DURATION_MS: u32 = 5_000;
/// Allowed transmissions per rolling window.
pub const RATE_LIMIT_PER_MINUTE: u8 = 10;
/// Rolling rate window length.
pub const RATE_WINDOW_MS: u64 = 60_000;
pub const AUDIT_LOG_CAPACITY: usize = 100;

// ── Workflow ────────────────────────────────────────────────────────

pub const LISTEN_MIN_MS: u32 = 1_000;
pub const LISTEN_MAX_MS: u32 = 60_000;

pub const INIT_TIMEOUT_MS: u32 = 5_000;
/// Slightly longer than `LISTEN_MAX_MS` so the forced analysis wins.
pub const LISTENING_TIMEOUT_MS: u32 = 65_000;
pub const ANALYZE_TIMEOUT_MS: u32 = 10_000;
pub const READY_TIMEOUT_MS: u32 = 120_000;
pub const TX_GATE_TIMEOUT_MS: u32 = 10_000;
pub const TRANSMIT_TIMEOUT_MS: u32 = 5_000;
pub const CLEANUP_TIMEOUT_MS: u32 = 5_000;

/// Captured-signal slots per session.
pub const SIGNAL_BUFFER_SIZE: u16 = 100;
/// Listening ends early at this fill ratio (percent).
pub const BUFFER_FULL_PERCENT: u16 = 90;

pub const ERROR_THRESHOLD: u16 = 10;
pub const EVENT_LOG_CAPACITY: usize = 200;

// ── 433 MHz ─────────────────────────────────────────────────────────

pub const SUBGHZ_CENTER_MHZ: f32 = 433.92;
pub const SUBGHZ_MIN_PULSES: usize = 10;
pub const SUBGHZ_MIN_RSSI: i8 = -100;
/// Valid replay pulse width range (microseconds, inclusive).
pub const PULSE_MIN_US: u16 = 100;
pub const PULSE_MAX_US: u16 = 10_000;
/// Repeats sent per replay, used to estimate air time.
pub const SUBGHZ_REPEAT_TRANSMIT: u32 = 10;

// ── 2.4 GHz ─────────────────────────────────────────────────────────

/// Shortest frame carrying both addresses: 2 (ctrl) + 2 (dur) + 6 + 6.
pub const ISM_MIN_FRAME_LEN: usize = 16;
pub const ISM_MIN_RSSI: i8 = -90;
pub const ISM_TRANSMIT_ESTIMATE_MS: u32 = 10;
/// Distinct source addresses remembered per session.
pub const MAX_OBSERVED_ADDRESSES: usize = 64;
