//! Core traits for hardware abstraction.
//!
//! All hardware touched by the sign controller is reached through the
//! traits in this module, so the control logic runs unchanged against
//! the ESP32 implementations or the mocks in [`crate::hal::mock`].

mod hardware;

pub use hardware::{ButtonInput, Clock, LedStrip, RadioBus, RadioTransport, StatusLed};
