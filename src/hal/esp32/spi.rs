//! SPI bus binding for the radio chip.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver};
use esp_idf_sys::EspError;

use crate::traits::RadioBus;

/// Radio bus over the ESP32 SPI peripheral.
///
/// Chip select is driven manually rather than by the SPI driver: the radio
/// protocol needs CSN held across multi-byte command sequences, which the
/// per-transfer CS of the peripheral cannot express.
pub struct Esp32RadioBus<'d> {
    spi: SpiDeviceDriver<'d, SpiDriver<'d>>,
    csn: PinDriver<'d, AnyOutputPin, Output>,
    ce: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> Esp32RadioBus<'d> {
    /// Bus from a configured SPI device and the two control pins.
    ///
    /// Both lines start inactive (CSN high, CE low).
    pub fn new(
        spi: SpiDeviceDriver<'d, SpiDriver<'d>>,
        mut csn: PinDriver<'d, AnyOutputPin, Output>,
        mut ce: PinDriver<'d, AnyOutputPin, Output>,
    ) -> Result<Self, EspError> {
        csn.set_high()?;
        ce.set_low()?;
        Ok(Self { spi, csn, ce })
    }
}

impl RadioBus for Esp32RadioBus<'_> {
    type Error = EspError;

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut read = [0u8; 1];
        self.spi.transfer(&mut read, &[byte])?;
        Ok(read[0])
    }

    fn chip_select(&mut self, selected: bool) -> Result<(), Self::Error> {
        // CSN is active low.
        if selected {
            self.csn.set_low()
        } else {
            self.csn.set_high()
        }
    }

    fn set_enable(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.ce.set_high()
        } else {
            self.ce.set_low()
        }
    }
}
