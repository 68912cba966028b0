//! WS2815 strip output over the RMT peripheral.

use core::time::Duration;

use esp_idf_hal::gpio::OutputPin;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::rmt::config::TransmitConfig;
use esp_idf_hal::rmt::{PinState, Pulse, RmtChannel, TxRmtDriver, VariableLengthSignal};
use esp_idf_sys::EspError;

use crate::traits::LedStrip;

// WS2815 bit cell timing.
const T0H: Duration = Duration::from_nanos(300);
const T0L: Duration = Duration::from_nanos(1090);
const T1H: Duration = Duration::from_nanos(1090);
const T1L: Duration = Duration::from_nanos(320);

/// Strip driver translating a GRB buffer into the one-wire bit stream.
///
/// The RMT peripheral generates the waveform in hardware, so the
/// microsecond-level bit timing holds regardless of interrupt load.
pub struct Esp32LedStrip<'d> {
    tx: TxRmtDriver<'d>,
}

impl<'d> Esp32LedStrip<'d> {
    /// Claim an RMT channel for the strip's data pin.
    pub fn new(
        channel: impl Peripheral<P = impl RmtChannel> + 'd,
        pin: impl Peripheral<P = impl OutputPin> + 'd,
    ) -> Result<Self, EspError> {
        let config = TransmitConfig::new().clock_divider(1);
        let tx = TxRmtDriver::new(channel, pin, &config)?;
        Ok(Self { tx })
    }
}

impl LedStrip for Esp32LedStrip<'_> {
    type Error = EspError;

    fn send(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        let clock_hz = self.tx.counter_clock()?;
        let zero = (
            Pulse::new_with_duration(clock_hz, PinState::High, &T0H)?,
            Pulse::new_with_duration(clock_hz, PinState::Low, &T0L)?,
        );
        let one = (
            Pulse::new_with_duration(clock_hz, PinState::High, &T1H)?,
            Pulse::new_with_duration(clock_hz, PinState::Low, &T1L)?,
        );

        let mut signal = VariableLengthSignal::new();
        for &byte in buffer {
            // MSB first per channel byte.
            for bit in (0..8).rev() {
                let (high, low) = if byte >> bit & 1 == 1 { &one } else { &zero };
                signal.push([high, low])?;
            }
        }
        self.tx.start_blocking(&signal)
    }
}
