//! ESP32 hardware implementations (requires the `esp32` feature).
//!
//! Wiring of the deployed sign:
//!
//! | Signal | GPIO |
//! |------------------|------|
//! | Status LED | 2 |
//! | LED strip data | 13 |
//! | Radio CE | 4 |
//! | Radio CSN | 5 |
//! | SPI SCK | 18 |
//! | SPI MOSI | 23 |
//! | SPI MISO | 19 |
//! | Diagnostic button| 21 |
//!
//! The button is wired to ground and uses the internal pull-up.

mod button;
mod clock;
mod led;
mod spi;
mod strip;

pub use button::Esp32Button;
pub use clock::Esp32Clock;
pub use led::Esp32StatusLed;
pub use spi::Esp32RadioBus;
pub use strip::Esp32LedStrip;
