//! Hardware abstraction layer.
//!
//! Mock implementations for host-side testing live in [`mock`]; the ESP32
//! implementations are behind the `esp32` feature.

#[cfg(feature = "std")]
pub mod mock;

#[cfg(feature = "esp32")]
pub mod esp32;

#[cfg(feature = "std")]
pub use mock::{MockButton, MockClock, MockLedStrip, MockRadio, MockRadioBus, MockStatusLed};
