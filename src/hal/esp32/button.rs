//! Diagnostic button input.

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
use esp_idf_sys::EspError;

use crate::traits::ButtonInput;

/// Active-low button on a GPIO with the internal pull-up enabled.
pub struct Esp32Button<'d> {
    pin: PinDriver<'d, AnyIOPin, Input>,
}

impl<'d> Esp32Button<'d> {
    /// Configure the pin for the button.
    pub fn new(mut pin: PinDriver<'d, AnyIOPin, Input>) -> Result<Self, EspError> {
        pin.set_pull(Pull::Up)?;
        Ok(Self { pin })
    }
}

impl ButtonInput for Esp32Button<'_> {
    fn is_pressed(&mut self) -> bool {
        self.pin.is_low()
    }
}
