/// 2.4 GHz frame handling.
///
/// Turns raw 802.11 frames (Wi-Fi management/data traffic and the vendor
/// action frames ESP-NOW rides on) into captured signals, validates and
/// classifies them, and tracks which transmitter addresses were observed
/// while listening. A replay may only target an address from that set.
///
/// Management frames are parsed with the `ieee80211` crate; anything else
/// falls back to the fixed header layout for its two addresses.
use heapless::Vec;
use ieee80211::match_frames;
use ieee80211::mgmt_frame::{BeaconFrame, ProbeRequestFrame, ProbeResponseFrame};

use crate::defaults::{ISM_MIN_FRAME_LEN, ISM_MIN_RSSI, ISM_TRANSMIT_ESTIMATE_MS, MAX_OBSERVED_ADDRESSES};
use crate::signal::{CapturedSignal, MAX_PACKET_LEN};
use crate::text::bounded;

/// 802.11 frame kinds we distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Beacon,
    ProbeRequest,
    ProbeResponse,
    /// Management action frame (ESP-NOW vendor-specific carrier).
    Action,
    Data,
    Other,
}

impl FrameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameType::Beacon => "beacon",
            FrameType::ProbeRequest => "probe_req",
            FrameType::ProbeResponse => "probe_resp",
            FrameType::Action => "action",
            FrameType::Data => "data",
            FrameType::Other => "other",
        }
    }

    fn from_protocol(tag: &str) -> Self {
        match tag {
            "beacon" => FrameType::Beacon,
            "probe_req" => FrameType::ProbeRequest,
            "probe_resp" => FrameType::ProbeResponse,
            "action" => FrameType::Action,
            "data" => FrameType::Data,
            _ => FrameType::Other,
        }
    }
}

/// Center frequency for a 2.4 GHz channel number.
pub fn channel_frequency_mhz(channel: u8) -> f32 {
    if channel == 14 {
        2484.0
    } else {
        2407.0 + 5.0 * f32::from(channel)
    }
}

/// Build a signal from one raw frame. `None` if the frame is too short to
/// carry both addresses or too long to buffer.
pub fn signal_from_frame(frame: &[u8], rssi: i8, channel: u8, captured_at_us: u64) -> Option<CapturedSignal> {
    let (source, destination, frame_type) = parse_addresses(frame)?;
    let mut signal = CapturedSignal::from_packet(channel_frequency_mhz(channel), rssi, captured_at_us, frame)?;
    signal.source = Some(source);
    signal.destination = Some(destination);
    signal.protocol = bounded(frame_type.as_str());
    Some(signal)
}

/// (transmitter, receiver, kind) for `frame`.
fn parse_addresses(frame: &[u8]) -> Option<([u8; 6], [u8; 6], FrameType)> {
    let parsed = match_frames! {
        frame,
        beacon = BeaconFrame<'_> => {
            (beacon.header.transmitter_address.0, beacon.header.receiver_address.0, FrameType::Beacon)
        }
        probe_req = ProbeRequestFrame<'_> => {
            (probe_req.header.transmitter_address.0, probe_req.header.receiver_address.0, FrameType::ProbeRequest)
        }
        probe_resp = ProbeResponseFrame<'_> => {
            (probe_resp.header.transmitter_address.0, probe_resp.header.receiver_address.0, FrameType::ProbeResponse)
        }
    };

    match parsed {
        Ok(addresses) => Some(addresses),
        Err(_) => {
            // Address 1 (receiver) at 4, Address 2 (transmitter) at 10
            if frame.len() < ISM_MIN_FRAME_LEN {
                return None;
            }
            let frame_type = match ((frame[0] >> 2) & 0x3, frame[0] >> 4) {
                (0, 13) => FrameType::Action,
                (2, _) => FrameType::Data,
                _ => FrameType::Other,
            };
            let destination: [u8; 6] = frame[4..10].try_into().ok()?;
            let source: [u8; 6] = frame[10..16].try_into().ok()?;
            Some((source, destination, frame_type))
        }
    }
}

/// Frame length 16..=256 and strength at least -90 dBm (0 = unmeasured).
pub fn validate(signal: &CapturedSignal) -> bool {
    let len = signal.packet().len();
    if !(ISM_MIN_FRAME_LEN..=MAX_PACKET_LEN).contains(&len) {
        return false;
    }
    signal.rssi == 0 || signal.rssi >= ISM_MIN_RSSI
}

pub fn classify(signal: &CapturedSignal) -> &'static str {
    match FrameType::from_protocol(&signal.protocol) {
        FrameType::Beacon | FrameType::ProbeResponse => "Access Point",
        FrameType::ProbeRequest => "Client",
        FrameType::Action => "ESP-NOW Peer",
        FrameType::Data => "Data Station",
        FrameType::Other => "Unknown",
    }
}

/// Single frame air time is short; use a fixed budget.
pub fn estimate_duration_ms(_signal: &CapturedSignal) -> u32 {
    ISM_TRANSMIT_ESTIMATE_MS
}

/// Distinct transmitter addresses seen during the current session's
/// listening phase.
#[derive(Debug, Default)]
pub struct ObservedAddresses {
    addrs: Vec<[u8; 6], MAX_OBSERVED_ADDRESSES>,
}

impl ObservedAddresses {
    pub const fn new() -> Self {
        Self { addrs: Vec::new() }
    }

    /// Remember `addr`. Returns false once full.
    pub fn record(&mut self, addr: [u8; 6]) -> bool {
        if self.contains(&addr) {
            return true;
        }
        self.addrs.push(addr).is_ok()
    }

    pub fn contains(&self, addr: &[u8; 6]) -> bool {
        self.addrs.iter().any(|a| a == addr)
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    pub fn clear(&mut self) {
        self.addrs.clear();
    }
}

/// Band gate: the replay target must have been heard this session.
pub fn destination_gate(signal: &CapturedSignal, observed: &ObservedAddresses) -> bool {
    signal.destination.is_some_and(|d| observed.contains(&d))
}
