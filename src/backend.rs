/// Capture/transmit back-end contract.
///
/// One implementation per band, supplied by the platform binary (CC1101
/// driver, ESP-NOW/Wi-Fi radio). The workflow only ever talks to this trait.
/// A missing back end is "not ready", never a construction error.
use alloc::boxed::Box;

use crate::error::BackendError;
use crate::signal::CapturedSignal;

pub trait RadioBackend {
    fn is_ready(&self) -> bool;

    fn is_signal_available(&mut self) -> bool;

    /// Next captured signal, ownership passes to the caller.
    fn receive_signal(&mut self) -> Option<CapturedSignal>;

    /// Emit `signal` for at most `duration_ms`. Must return within that
    /// bound. `true` on success.
    fn transmit(&mut self, signal: &CapturedSignal, duration_ms: u32) -> bool;

    fn disable_receive(&mut self) -> Result<(), BackendError>;

    fn disable_transmit(&mut self) -> Result<(), BackendError>;
}

/// Substitutes only the physical emit call. Everything else, including the
/// disable calls, reaches the wrapped radio.
pub struct DryRunBackend {
    inner: Box<dyn RadioBackend>,
}

impl DryRunBackend {
    pub fn new(inner: Box<dyn RadioBackend>) -> Self {
        Self { inner }
    }
}

impl RadioBackend for DryRunBackend {
    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn is_signal_available(&mut self) -> bool {
        self.inner.is_signal_available()
    }

    fn receive_signal(&mut self) -> Option<CapturedSignal> {
        self.inner.receive_signal()
    }

    fn transmit(&mut self, signal: &CapturedSignal, duration_ms: u32) -> bool {
        log::info!(
            "Dry run: skipping emit of {:.2} MHz for {} ms",
            signal.frequency_mhz,
            duration_ms
        );
        true
    }

    fn disable_receive(&mut self) -> Result<(), BackendError> {
        self.inner.disable_receive()
    }

    fn disable_transmit(&mut self) -> Result<(), BackendError> {
        self.inner.disable_transmit()
    }
}
