/// Monotonic time source.
///
/// The workflow never blocks; every wait is a "has it elapsed yet" check
/// against this clock on the next poll. Platform binaries wrap their timer
/// (`embassy_time::Instant`, `esp_timer_get_time`, `std::time::Instant`);
/// tests drive a [`ManualClock`].
use core::cell::Cell;

pub trait Clock {
    /// Microseconds since an arbitrary fixed origin. Must never go backwards.
    fn now_us(&self) -> u64;

    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Clock that only moves when told to. Shared through `&` so a test can
/// advance it while the workflow holds a reference.
#[derive(Debug, Default)]
pub struct ManualClock {
    us: Cell<u64>,
}

impl ManualClock {
    pub const fn new() -> Self {
        Self { us: Cell::new(0) }
    }

    pub const fn starting_at_ms(ms: u64) -> Self {
        Self {
            us: Cell::new(ms * 1000),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }

    pub fn advance_us(&self, us: u64) {
        self.us.set(self.us.get() + us);
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> u64 {
        self.us.get()
    }
}
