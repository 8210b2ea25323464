/// Bounded text helpers.
///
/// Every string carried by a log record or signal is a capacity-checked
/// `heapless::String`. These helpers fill one from arbitrary input without
/// ever splitting a UTF-8 sequence.
use core::fmt::{self, Write};

use heapless::String;

/// Protocol identifier carried by a captured signal.
pub type ProtocolTag = String<32>;

/// Device classification produced during analysis.
pub type DeviceClass = String<32>;

/// Short event identifier in the deterministic log.
pub type EventId = String<32>;

/// Human-readable reason / free-text note.
pub type ReasonText = String<64>;

/// Auxiliary key=value data in the deterministic log.
pub type DataText = String<64>;

/// Copy `s` into a bounded string, truncating at the last char boundary
/// that fits.
pub fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    let _ = out.push_str(truncate(s, N));
    out
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char
/// boundary.
pub fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Format into a bounded string. Output beyond capacity is dropped.
pub fn format_bounded<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut out = Truncating::<N>(String::new());
    let _ = out.write_fmt(args);
    out.0
}

/// `fmt::Write` adapter that keeps as much of each piece as fits.
struct Truncating<const N: usize>(String<N>);

impl<const N: usize> Write for Truncating<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = N - self.0.len();
        let _ = self.0.push_str(truncate(s, room));
        Ok(())
    }
}

/// Format a 6-byte hardware address into "AA:BB:CC:DD:EE:FF".
pub fn format_mac(mac: &[u8; 6]) -> String<18> {
    format_bounded(format_args!(
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    ))
}
