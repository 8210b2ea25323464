/// Analysis pass over the captured signal set.
///
/// Runs the band collaborator's validation and classification over every
/// signal, marking failures invalid, then summarizes the set.
use heapless::String;
use serde::Serialize;

use crate::config::Band;
use crate::signal::CapturedSignal;
use crate::text::{bounded, format_bounded};
use crate::{ism, subghz};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpectrumStats {
    pub signal_count: u16,
    pub valid_count: u16,
    /// Signals whose sample pattern differs from every earlier one.
    pub unique_patterns: u16,
    /// Over signals with a measured strength; 0 when none.
    pub rssi_min: i8,
    pub rssi_max: i8,
    pub rssi_mean: i8,
    pub capture_span_ms: u64,
    pub summary: String<96>,
}

/// Validate and classify each signal in place, then compute statistics.
pub fn analyze(signals: &mut [CapturedSignal], band: Band) -> SpectrumStats {
    for signal in signals.iter_mut() {
        match band {
            Band::SubGhz433 => {
                signal.is_valid = signal.band == band && subghz::validate(signal);
                signal.device_class = bounded(subghz::classify(signal.pulses()).as_str());
            }
            Band::Ism2400 => {
                signal.is_valid = signal.band == band && ism::validate(signal);
                signal.device_class = bounded(ism::classify(signal));
            }
        }
        if !signal.is_valid {
            log::debug!(
                "Signal at {:.2} MHz failed validation ({} samples, {} dBm)",
                signal.frequency_mhz,
                signal.sample_count(),
                signal.rssi
            );
        }
    }
    spectrum_stats(signals)
}

pub fn spectrum_stats(signals: &[CapturedSignal]) -> SpectrumStats {
    let mut stats = SpectrumStats {
        signal_count: signals.len() as u16,
        ..SpectrumStats::default()
    };
    if signals.is_empty() {
        stats.summary = bounded("No signals captured");
        return stats;
    }

    stats.valid_count = signals.iter().filter(|s| s.is_valid).count() as u16;
    stats.unique_patterns = signals
        .iter()
        .enumerate()
        .filter(|(i, s)| !signals[..*i].iter().any(|e| e.samples().same_pattern(s.samples())))
        .count() as u16;

    let mut measured = 0i32;
    let mut sum = 0i32;
    let mut min = i8::MAX;
    let mut max = i8::MIN;
    for rssi in signals.iter().map(|s| s.rssi).filter(|&r| r != 0) {
        measured += 1;
        sum += i32::from(rssi);
        min = min.min(rssi);
        max = max.max(rssi);
    }
    if measured > 0 {
        stats.rssi_min = min;
        stats.rssi_max = max;
        stats.rssi_mean = (sum / measured) as i8;
    }

    let first = signals.iter().map(|s| s.captured_at_us).min().unwrap_or(0);
    let last = signals.iter().map(|s| s.captured_at_us).max().unwrap_or(0);
    stats.capture_span_ms = (last - first) / 1000;

    stats.summary = format_bounded(format_args!(
        "{} signals, {} valid, {} unique, RSSI {}..{} dBm over {} ms",
        stats.signal_count, stats.valid_count, stats.unique_patterns, stats.rssi_min, stats.rssi_max, stats.capture_span_ms
    ));
    stats
}
