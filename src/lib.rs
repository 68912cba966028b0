//! # play-sign
//!
//! Receiver firmware for a wireless two-digit seven-segment play clock.
//! A remote controller broadcasts 8-byte status frames over an nRF24L01+
//! link; this crate validates them, supervises link liveness, and renders
//! the seconds value onto a WS2815 LED strip wired as two large digits.
//!
//! ## Architecture
//!
//! The [`controller::SignController`] owns all state and runs a 50 ms tick
//! loop. It is generic over the hardware traits in [`traits`], with two
//! implementations: the ESP32 layer behind the `esp32` feature, and mocks
//! in [`hal::mock`] for host-side testing. The radio driver, frame codec,
//! link supervisor, and renderer are each independent modules with no
//! hardware coupling of their own.
//!
//! ## Features
//!
//! - `std` (default): host builds, mocks, tests
//! - `esp32`: esp-idf hardware layer and the firmware binary
//! - `serde`: serialization derives on configuration and state types

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

pub mod button;
pub mod config;
pub mod controller;
pub mod frame;
pub mod hal;
pub mod link;
pub mod radio;
pub mod render;
pub mod segment;
pub mod state;
pub mod traits;

pub use config::SignConfig;
pub use controller::SignController;
pub use frame::{FrameCodec, StatusFrame};
pub use state::{DisplayMode, DisplayState, SystemState};
pub use traits::{ButtonInput, Clock, LedStrip, RadioBus, RadioTransport, StatusLed};
