//! Status indicator GPIO.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_sys::EspError;

use crate::traits::StatusLed;

/// Single status LED on a push-pull output.
pub struct Esp32StatusLed<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> Esp32StatusLed<'d> {
    /// Wrap the configured output pin, starting off.
    pub fn new(mut pin: PinDriver<'d, AnyOutputPin, Output>) -> Result<Self, EspError> {
        pin.set_low()?;
        Ok(Self { pin })
    }
}

impl StatusLed for Esp32StatusLed<'_> {
    type Error = EspError;

    fn set_on(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
