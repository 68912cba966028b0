//! nRF24L01+ receive driver.
//!
//! Minimal driver for the one thing the sign needs: a single fixed-width
//! receive pipe. Written against [`RadioBus`] so the register machine runs
//! unmodified over real SPI and over the bus mock in tests.
//!
//! The chip is configured for 250 kbps at full output power with 2-byte
//! hardware CRC on pipe 0; auto-acknowledge stays enabled so the
//! transmitter sees delivery confirmation.

use log::{debug, warn};

use crate::config::RadioConfig;
use crate::frame::FRAME_LEN;
use crate::traits::{RadioBus, RadioTransport};

/// Register addresses (datasheet section 9).
pub mod reg {
    /// Configuration register.
    pub const CONFIG: u8 = 0x00;
    /// Auto-acknowledge enable per pipe.
    pub const EN_AA: u8 = 0x01;
    /// RX pipe enable.
    pub const EN_RXADDR: u8 = 0x02;
    /// Address width.
    pub const SETUP_AW: u8 = 0x03;
    /// Auto-retransmit setup.
    pub const SETUP_RETR: u8 = 0x04;
    /// RF channel.
    pub const RF_CH: u8 = 0x05;
    /// Data rate and output power.
    pub const RF_SETUP: u8 = 0x06;
    /// Status flags.
    pub const STATUS: u8 = 0x07;
    /// Pipe 0 receive address (5 bytes).
    pub const RX_ADDR_P0: u8 = 0x0A;
    /// Pipe 0 payload width.
    pub const RX_PW_P0: u8 = 0x11;
}

/// SPI command bytes.
mod cmd {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const NOP: u8 = 0xFF;
}

/// CONFIG register bits.
mod config_bits {
    /// 2-byte CRC, CRC enabled.
    pub const CRC_16BIT: u8 = 0x0C;
    pub const PWR_UP: u8 = 0x02;
    pub const PRIM_RX: u8 = 0x01;
}

/// STATUS bit set when a payload has arrived.
const STATUS_RX_DR: u8 = 0x40;

/// 250 kbps, 0 dBm.
const RF_SETUP_250KBPS_MAX_POWER: u8 = 0x26;

/// 15 retries at 1250 us, mirrored from the transmitter setup.
const SETUP_RETR_15X_1250US: u8 = 0x4F;

/// Driver lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioMode {
    /// Before [`RadioTransport::begin`] or after a failed init.
    PoweredDown,
    /// Powered up, CE low, not receiving.
    Standby,
    /// CE high, receive pipe open.
    Listening,
}

/// Radio driver failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioError<E> {
    /// A register read-back after init did not match what was written,
    /// meaning the chip is absent, unpowered, or miswired.
    InitFailed {
        /// Register that failed verification.
        register: u8,
        /// Value written.
        wrote: u8,
        /// Value read back.
        read: u8,
    },
    /// Underlying bus failure.
    Bus(E),
}

impl<E> From<E> for RadioError<E> {
    fn from(err: E) -> Self {
        RadioError::Bus(err)
    }
}

/// nRF24L01+ driver over a [`RadioBus`].
pub struct Nrf24Radio<B: RadioBus> {
    bus: B,
    mode: RadioMode,
}

impl<B: RadioBus> Nrf24Radio<B> {
    /// Driver over the given bus, powered down until `begin`.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            mode: RadioMode::PoweredDown,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn mode(&self) -> RadioMode {
        self.mode
    }

    /// Access the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn with_cs<T>(
        &mut self,
        f: impl FnOnce(&mut B) -> Result<T, B::Error>,
    ) -> Result<T, RadioError<B::Error>> {
        self.bus.chip_select(true)?;
        let result = f(&mut self.bus);
        // Release CSN even when the transaction failed.
        let release = self.bus.chip_select(false);
        let value = result?;
        release?;
        Ok(value)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), RadioError<B::Error>> {
        self.with_cs(|bus| {
            bus.transfer(cmd::W_REGISTER | register)?;
            bus.transfer(value)?;
            Ok(())
        })
    }

    fn read_register(&mut self, register: u8) -> Result<u8, RadioError<B::Error>> {
        self.with_cs(|bus| {
            bus.transfer(cmd::R_REGISTER | register)?;
            bus.transfer(cmd::NOP)
        })
    }

    fn write_address(&mut self, register: u8, address: &[u8; 5]) -> Result<(), RadioError<B::Error>> {
        self.with_cs(|bus| {
            bus.transfer(cmd::W_REGISTER | register)?;
            for &byte in address {
                bus.transfer(byte)?;
            }
            Ok(())
        })
    }

    fn command(&mut self, command: u8) -> Result<(), RadioError<B::Error>> {
        self.with_cs(|bus| {
            bus.transfer(command)?;
            Ok(())
        })
    }

    /// Write a register, read it back, and fail init on a mismatch.
    fn write_verified(&mut self, register: u8, value: u8) -> Result<(), RadioError<B::Error>> {
        self.write_register(register, value)?;
        let read = self.read_register(register)?;
        if read != value {
            return Err(RadioError::InitFailed {
                register,
                wrote: value,
                read,
            });
        }
        Ok(())
    }

    /// Clear any pending payload and the data-ready flag. Used when
    /// entering receive mode so stale frames from before the transition
    /// are never processed.
    fn flush_receive(&mut self) -> Result<(), RadioError<B::Error>> {
        self.command(cmd::FLUSH_RX)?;
        self.write_register(reg::STATUS, STATUS_RX_DR)
    }

    /// Read the full register map for the `--diagnose` style dump.
    pub fn dump_registers(&mut self) -> Result<[u8; 0x18], RadioError<B::Error>> {
        let mut map = [0u8; 0x18];
        for (register, slot) in map.iter_mut().enumerate() {
            *slot = self.read_register(register as u8)?;
        }
        Ok(map)
    }
}

impl<B: RadioBus> RadioTransport for Nrf24Radio<B> {
    type Error = RadioError<B::Error>;

    fn begin(&mut self, config: &RadioConfig) -> Result<(), Self::Error> {
        self.bus.set_enable(false)?;

        // Verified writes catch an absent or miswired chip immediately;
        // a dead SPI bus reads back 0x00 or 0xFF, never the channel.
        self.write_verified(reg::RF_CH, config.channel & 0x7F)?;
        self.write_verified(reg::RF_SETUP, RF_SETUP_250KBPS_MAX_POWER)?;
        self.write_verified(reg::SETUP_RETR, SETUP_RETR_15X_1250US)?;
        self.write_verified(reg::SETUP_AW, 0x03)?; // 5-byte addresses
        self.write_verified(reg::EN_AA, 0x01)?; // auto-ack on pipe 0
        self.write_verified(reg::EN_RXADDR, 0x01)?; // pipe 0 only
        self.write_verified(reg::RX_PW_P0, FRAME_LEN as u8)?;
        self.write_address(reg::RX_ADDR_P0, &config.rx_address)?;

        self.write_verified(
            reg::CONFIG,
            config_bits::CRC_16BIT | config_bits::PWR_UP,
        )?;
        self.mode = RadioMode::Standby;
        debug!(
            "radio up: channel {} payload {}B",
            config.channel, FRAME_LEN
        );
        Ok(())
    }

    fn start_listening(&mut self) -> Result<(), Self::Error> {
        self.flush_receive()?;
        self.write_register(
            reg::CONFIG,
            config_bits::CRC_16BIT | config_bits::PWR_UP | config_bits::PRIM_RX,
        )?;
        self.bus.set_enable(true)?;
        self.mode = RadioMode::Listening;
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), Self::Error> {
        self.bus.set_enable(false)?;
        self.write_register(
            reg::CONFIG,
            config_bits::CRC_16BIT | config_bits::PWR_UP,
        )?;
        self.mode = RadioMode::Standby;
        Ok(())
    }

    fn poll_frame(&mut self) -> Result<Option<[u8; FRAME_LEN]>, Self::Error> {
        if self.mode != RadioMode::Listening {
            warn!("poll_frame while not listening");
            return Ok(None);
        }

        let status = self.read_register(reg::STATUS)?;
        if status & STATUS_RX_DR == 0 {
            return Ok(None);
        }

        let payload = self.with_cs(|bus| {
            bus.transfer(cmd::R_RX_PAYLOAD)?;
            let mut payload = [0u8; FRAME_LEN];
            for byte in payload.iter_mut() {
                *byte = bus.transfer(cmd::NOP)?;
            }
            Ok(payload)
        })?;

        // Write-1-to-clear, after the read so the flag covers this payload.
        self.write_register(reg::STATUS, STATUS_RX_DR)?;
        Ok(Some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::MockRadioBus;

    fn begun_radio() -> Nrf24Radio<MockRadioBus> {
        let mut radio = Nrf24Radio::new(MockRadioBus::new());
        radio.begin(&RadioConfig::default()).unwrap();
        radio
    }

    #[test]
    fn begin_programs_the_pipe() {
        let radio = begun_radio();
        assert_eq!(radio.mode(), RadioMode::Standby);
        let bus = &radio.bus;
        assert_eq!(bus.register(reg::RF_CH), 100);
        assert_eq!(bus.register(reg::RF_SETUP), 0x26);
        assert_eq!(bus.register(reg::RX_PW_P0), FRAME_LEN as u8);
        assert_eq!(bus.rx_address(), [0xC2; 5]);
        assert_eq!(bus.register(reg::CONFIG), 0x0E); // CRC16 | PWR_UP
        assert!(!bus.ce_high());
    }

    #[test]
    fn begin_fails_fast_on_dead_bus() {
        let mut bus = MockRadioBus::new();
        bus.fail_register_writes();
        let mut radio = Nrf24Radio::new(bus);
        match radio.begin(&RadioConfig::default()) {
            Err(RadioError::InitFailed { register, .. }) => {
                assert_eq!(register, reg::RF_CH);
            }
            other => panic!("expected InitFailed, got {:?}", other),
        }
        assert_eq!(radio.mode(), RadioMode::PoweredDown);
    }

    #[test]
    fn listening_raises_ce_and_prim_rx() {
        let mut radio = begun_radio();
        radio.start_listening().unwrap();
        assert_eq!(radio.mode(), RadioMode::Listening);
        assert!(radio.bus.ce_high());
        assert_eq!(radio.bus.register(reg::CONFIG), 0x0F);

        radio.stop_listening().unwrap();
        assert_eq!(radio.mode(), RadioMode::Standby);
        assert!(!radio.bus.ce_high());
        assert_eq!(radio.bus.register(reg::CONFIG), 0x0E);
    }

    #[test]
    fn start_listening_flushes_stale_payloads() {
        let mut radio = begun_radio();
        radio.bus.push_payload([0xAA; FRAME_LEN]);
        radio.start_listening().unwrap();
        assert_eq!(radio.poll_frame().unwrap(), None);
    }

    #[test]
    fn poll_returns_payload_then_clears() {
        let mut radio = begun_radio();
        radio.start_listening().unwrap();

        assert_eq!(radio.poll_frame().unwrap(), None);

        let payload = [0x11; FRAME_LEN];
        radio.bus.push_payload(payload);
        assert_eq!(radio.poll_frame().unwrap(), Some(payload));
        // Flag cleared after the read: nothing pending now.
        assert_eq!(radio.poll_frame().unwrap(), None);
    }

    #[test]
    fn poll_while_standby_yields_nothing() {
        let mut radio = begun_radio();
        radio.bus.push_payload([0x22; FRAME_LEN]);
        assert_eq!(radio.poll_frame().unwrap(), None);
    }

    #[test]
    fn register_dump_covers_the_map() {
        let mut radio = begun_radio();
        let map = radio.dump_registers().unwrap();
        assert_eq!(map[reg::RF_CH as usize], 100);
        assert_eq!(map[reg::RX_PW_P0 as usize], FRAME_LEN as u8);
    }
}
