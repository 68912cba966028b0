//! Millisecond clock from the esp-idf high-resolution timer.

use crate::traits::Clock;

/// Monotonic clock backed by `esp_timer`, which starts at boot and never
/// wraps in any realistic deployment (64-bit microseconds).
#[derive(Clone, Copy, Debug, Default)]
pub struct Esp32Clock;

impl Esp32Clock {
    /// The boot-relative clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for Esp32Clock {
    fn now_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time has no preconditions once the IDF
        // runtime is up, which main guarantees before construction.
        let micros = unsafe { esp_idf_sys::esp_timer_get_time() };
        (micros / 1000) as u64
    }
}
