/// 433 MHz OOK/ASK signal handling.
///
/// Validation, coarse device classification by pulse statistics, air-time
/// estimate for a replay, and the pulse-width band gate. Decoding real
/// remote protocols is the capture back end's job; this only sorts what it
/// hands over.
use crate::defaults::{SUBGHZ_MIN_PULSES, SUBGHZ_MIN_RSSI, SUBGHZ_REPEAT_TRANSMIT};
use crate::signal::CapturedSignal;

/// Pulse-statistic buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    GarageDoor,
    Doorbell,
    CarRemote,
    Unknown,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::GarageDoor => "Garage Door",
            DeviceKind::Doorbell => "Doorbell",
            DeviceKind::CarRemote => "Car Remote",
            DeviceKind::Unknown => "Unknown",
        }
    }
}

/// Enough pulses and plausible strength. RSSI 0 means "not measured".
pub fn validate(signal: &CapturedSignal) -> bool {
    if signal.pulses().len() < SUBGHZ_MIN_PULSES {
        return false;
    }
    signal.rssi == 0 || signal.rssi >= SUBGHZ_MIN_RSSI
}

/// Classify by mean pulse width and train length.
pub fn classify(pulses: &[u16]) -> DeviceKind {
    if pulses.is_empty() {
        return DeviceKind::Unknown;
    }
    let count = pulses.len();
    let mean = mean_width(pulses);

    if mean > 400 && count >= 48 {
        DeviceKind::GarageDoor
    } else if mean < 350 && count < 48 {
        DeviceKind::Doorbell
    } else if count >= 128 {
        DeviceKind::CarRemote
    } else {
        DeviceKind::Unknown
    }
}

fn mean_width(pulses: &[u16]) -> u32 {
    let total: u32 = pulses.iter().map(|&p| u32::from(p)).sum();
    total / pulses.len() as u32
}

/// Replay air time: one train per repeat.
pub fn estimate_duration_ms(pulses: &[u16]) -> u32 {
    let total_us: u32 = pulses.iter().map(|&p| u32::from(p)).sum();
    total_us.saturating_mul(SUBGHZ_REPEAT_TRANSMIT) / 1000
}

/// Every pulse within `min_us..=max_us`. An empty train fails.
pub fn pulse_gate(pulses: &[u16], min_us: u16, max_us: u16) -> bool {
    !pulses.is_empty() && pulses.iter().all(|&p| (min_us..=max_us).contains(&p))
}
