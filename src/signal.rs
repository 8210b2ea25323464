/// Captured signal entity and its owned sample buffer.
///
/// A [`SampleBuffer`] is a boxed slice: allocation and length are one value,
/// so "length > 0 without storage" or "storage with length 0" cannot be
/// represented. The buffer is released exactly once when its owner drops.
/// There is no `Clone`; [`SampleBuffer::try_clone`] and
/// [`CapturedSignal::try_clone`] are the explicit, fallible deep copies.
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::mem;

use crate::config::Band;
use crate::text::{bounded, DeviceClass, ProtocolTag};

/// Largest pulse train accepted from a 433 MHz capture.
pub const MAX_PULSES: usize = 1000;

/// Largest raw frame accepted from a 2.4 GHz capture.
pub const MAX_PACKET_LEN: usize = 256;

/// Owned, length-tagged sample storage with move-only transfer.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SampleBuffer<T> {
    data: Box<[T]>,
}

impl<T: Copy + Default> SampleBuffer<T> {
    /// An empty buffer; owns no storage.
    pub fn empty() -> Self {
        Self {
            data: Box::default(),
        }
    }

    /// Allocate `count` zeroed samples.
    ///
    /// Returns `None` without any partial allocation if `count` exceeds
    /// `max` or the allocator refuses the request.
    pub fn allocate(count: usize, max: usize) -> Option<Self> {
        if count > max {
            return None;
        }
        let mut v = Vec::new();
        v.try_reserve_exact(count).ok()?;
        v.resize(count, T::default());
        Some(Self {
            data: v.into_boxed_slice(),
        })
    }

    /// Allocate and fill from `src`.
    pub fn from_slice(src: &[T], max: usize) -> Option<Self> {
        let mut buf = Self::allocate(src.len(), max)?;
        buf.data.copy_from_slice(src);
        Some(buf)
    }

    /// Explicit deep copy. Fails like [`allocate`](Self::allocate).
    pub fn try_clone(&self) -> Option<Self> {
        Self::from_slice(&self.data, self.data.len())
    }

    /// Move the storage out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }
}

impl<T> SampleBuffer<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/// Band-specific payload of a capture.
#[derive(Debug, PartialEq, Eq)]
pub enum Samples {
    /// 433 MHz: high/low pulse widths in microseconds.
    Pulses(SampleBuffer<u16>),
    /// 2.4 GHz: raw frame bytes.
    Packet(SampleBuffer<u8>),
}

impl Samples {
    pub fn empty_for(band: Band) -> Self {
        match band {
            Band::SubGhz433 => Samples::Pulses(SampleBuffer::empty()),
            Band::Ism2400 => Samples::Packet(SampleBuffer::empty()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::Pulses(b) => b.len(),
            Samples::Packet(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pulses(&self) -> &[u16] {
        match self {
            Samples::Pulses(b) => b.as_slice(),
            Samples::Packet(_) => &[],
        }
    }

    pub fn packet(&self) -> &[u8] {
        match self {
            Samples::Packet(b) => b.as_slice(),
            Samples::Pulses(_) => &[],
        }
    }

    /// Two payloads carry the same pattern if kind and content match.
    pub fn same_pattern(&self, other: &Samples) -> bool {
        match (self, other) {
            (Samples::Pulses(a), Samples::Pulses(b)) => a.as_slice() == b.as_slice(),
            (Samples::Packet(a), Samples::Packet(b)) => a.as_slice() == b.as_slice(),
            _ => false,
        }
    }

    fn try_clone(&self) -> Option<Self> {
        Some(match self {
            Samples::Pulses(b) => Samples::Pulses(b.try_clone()?),
            Samples::Packet(b) => Samples::Packet(b.try_clone()?),
        })
    }
}

/// One captured signal, exclusively owned by whoever holds it.
#[derive(Debug, PartialEq)]
pub struct CapturedSignal {
    /// Capture time in microseconds on the workflow clock.
    pub captured_at_us: u64,
    /// Center frequency in MHz.
    pub frequency_mhz: f32,
    /// Signal strength in dBm; 0 means "not measured".
    pub rssi: i8,
    pub band: Band,
    pub protocol: ProtocolTag,
    pub device_class: DeviceClass,
    pub is_valid: bool,
    /// 2.4 GHz only: transmitter address.
    pub source: Option<[u8; 6]>,
    /// 2.4 GHz only: receiver address the frame is aimed at.
    pub destination: Option<[u8; 6]>,
    samples: Samples,
}

impl CapturedSignal {
    /// A signal with metadata only and no sample storage.
    pub fn new(band: Band, frequency_mhz: f32, rssi: i8, captured_at_us: u64) -> Self {
        Self {
            captured_at_us,
            frequency_mhz,
            rssi,
            band,
            protocol: ProtocolTag::new(),
            device_class: DeviceClass::new(),
            is_valid: false,
            source: None,
            destination: None,
            samples: Samples::empty_for(band),
        }
    }

    /// 433 MHz capture from a pulse train. `None` if the train is too long
    /// or cannot be allocated.
    pub fn from_pulses(frequency_mhz: f32, rssi: i8, captured_at_us: u64, pulses: &[u16]) -> Option<Self> {
        let mut signal = Self::new(Band::SubGhz433, frequency_mhz, rssi, captured_at_us);
        signal.samples = Samples::Pulses(SampleBuffer::from_slice(pulses, MAX_PULSES)?);
        signal.is_valid = !pulses.is_empty();
        Some(signal)
    }

    /// 2.4 GHz capture from raw frame bytes.
    pub fn from_packet(frequency_mhz: f32, rssi: i8, captured_at_us: u64, frame: &[u8]) -> Option<Self> {
        let mut signal = Self::new(Band::Ism2400, frequency_mhz, rssi, captured_at_us);
        signal.samples = Samples::Packet(SampleBuffer::from_slice(frame, MAX_PACKET_LEN)?);
        signal.is_valid = !frame.is_empty();
        Some(signal)
    }

    pub fn with_protocol(mut self, protocol: &str) -> Self {
        self.protocol = bounded(protocol);
        self
    }

    /// Acquire a zeroed buffer of `count` samples for this signal's band,
    /// replacing any buffer already held. On failure nothing changes.
    pub fn allocate(&mut self, count: usize) -> bool {
        let samples = match self.band {
            Band::SubGhz433 => SampleBuffer::allocate(count, MAX_PULSES).map(Samples::Pulses),
            Band::Ism2400 => SampleBuffer::allocate(count, MAX_PACKET_LEN).map(Samples::Packet),
        };
        match samples {
            Some(samples) => {
                self.samples = samples;
                true
            }
            None => false,
        }
    }

    /// True iff a non-empty buffer is owned.
    pub fn has_buffer(&self) -> bool {
        !self.samples.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut Samples {
        &mut self.samples
    }

    pub fn pulses(&self) -> &[u16] {
        self.samples.pulses()
    }

    pub fn packet(&self) -> &[u8] {
        self.samples.packet()
    }

    /// Transfer the buffer out. `self` keeps its metadata but owns nothing
    /// and reports a zero sample count.
    pub fn take_samples(&mut self) -> Samples {
        mem::replace(&mut self.samples, Samples::empty_for(self.band))
    }

    /// Release the buffer now instead of at drop.
    pub fn release(&mut self) {
        drop(self.take_samples());
    }

    /// Explicit deep copy of metadata and samples.
    pub fn try_clone(&self) -> Option<Self> {
        Some(Self {
            captured_at_us: self.captured_at_us,
            frequency_mhz: self.frequency_mhz,
            rssi: self.rssi,
            band: self.band,
            protocol: self.protocol.clone(),
            device_class: self.device_class.clone(),
            is_valid: self.is_valid,
            source: self.source,
            destination: self.destination,
            samples: self.samples.try_clone()?,
        })
    }
}
