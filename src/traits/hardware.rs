//! Hardware abstraction traits for the radio transport, LED strip, button,
//! and status indicator.
//!
//! This module defines the core hardware interfaces that allow play-sign to
//! work across different platforms (ESP32, desktop mocks, etc.).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`RadioBus`] | SPI byte exchange + CSN/CE control for the radio chip |
//! | [`RadioTransport`] | Logical receive pipe: init, listen, poll for frames |
//! | [`LedStrip`] | Push a composed GRB buffer to the physical strip |
//! | [`ButtonInput`] | Diagnostic push button level |
//! | [`StatusLed`] | Single status indicator GPIO |
//! | [`Clock`] | Time source for `no_std` environments |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).

use crate::config::RadioConfig;
use crate::frame::FRAME_LEN;

/// Low-level bus primitives for an nRF24L01+-class radio chip.
///
/// Models exactly what the hardware layer hands the driver: a full-duplex
/// single-byte SPI exchange plus the two control lines. Chip select is
/// asserted by the caller around a sequence of transfers; the enable (CE)
/// line gates the radio's air interface.
///
/// # Implementation Notes
///
/// - `transfer` must be a blocking, full-duplex single-byte exchange
/// - `chip_select(true)` drives CSN low (active low), `false` drives it high
/// - No transaction may overlap another; the driver issues them sequentially
pub trait RadioBus {
    /// Error type for bus operations.
    type Error: core::fmt::Debug;

    /// Exchange one byte on the SPI bus, returning the byte clocked in.
    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Assert (`true`) or release (`false`) the chip-select line.
    fn chip_select(&mut self, selected: bool) -> Result<(), Self::Error>;

    /// Drive the CE enable line high (`true`) or low (`false`).
    fn set_enable(&mut self, high: bool) -> Result<(), Self::Error>;
}

/// Radio transport capability: one fixed receive pipe delivering fixed-size
/// status payloads.
///
/// Two implementations exist: [`Nrf24Radio`] for the real chip and
/// [`MockRadio`] for host testing, selected at composition time so the
/// controller logic is written once.
///
/// [`Nrf24Radio`]: crate::radio::Nrf24Radio
/// [`MockRadio`]: crate::hal::mock::MockRadio
pub trait RadioTransport {
    /// Error type for transport operations.
    type Error: core::fmt::Debug;

    /// Program the fixed pipe configuration (channel, address, payload width).
    fn begin(&mut self, config: &RadioConfig) -> Result<(), Self::Error>;

    /// Enter receive mode. Pending payloads from before this call are flushed
    /// so stale data is never reprocessed.
    fn start_listening(&mut self) -> Result<(), Self::Error>;

    /// Leave receive mode (standby).
    fn stop_listening(&mut self) -> Result<(), Self::Error>;

    /// Non-blocking poll for a received payload.
    ///
    /// Returns `Ok(None)` when no payload is pending. Must never block
    /// waiting for data. A returned payload has had its data-ready flag
    /// cleared exactly once, after the read.
    fn poll_frame(&mut self) -> Result<Option<[u8; FRAME_LEN]>, Self::Error>;
}

/// Addressable LED strip output.
///
/// The buffer is in the strip's native channel order (GRB for WS2815).
/// `send` blocks until the physical transmission is complete; the bit
/// stream is timing-sensitive at the microsecond level and must not be
/// interleaved with other bus activity.
pub trait LedStrip {
    /// Error type for strip operations.
    type Error: core::fmt::Debug;

    /// Transmit the buffer to the strip; returns once transmission is done.
    fn send(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;
}

/// Diagnostic push button input.
///
/// Implementations convert the raw GPIO level to a logical "pressed"
/// boolean (the physical button is active low).
pub trait ButtonInput {
    /// Returns true while the button is held down.
    fn is_pressed(&mut self) -> bool;
}

/// Single status indicator LED.
pub trait StatusLed {
    /// Error type for indicator operations.
    type Error: core::fmt::Debug;

    /// Turn the indicator on or off.
    fn set_on(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds for link supervision, debounce,
/// and blink cadences. On desktop, this can wrap `std::time::Instant`.
/// On embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use play_sign::traits::Clock;
/// use play_sign::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}
