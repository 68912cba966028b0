//! Mock hardware for host-side tests and desktop development.
//!
//! [`MockRadioBus`] emulates the nRF24L01+ register machine at the SPI
//! level so the real driver can be exercised byte for byte; [`MockRadio`]
//! short-circuits the transport trait for controller-level tests that do
//! not care about registers. The rest are thin recorders.

use std::collections::VecDeque;

use crate::config::RadioConfig;
use crate::frame::{FrameCodec, StatusFrame, FRAME_LEN};
use crate::radio::reg;
use crate::traits::{ButtonInput, Clock, LedStrip, RadioBus, RadioTransport, StatusLed};

/// Error type shared by the mocks.
///
/// Mocks only fail when a test asks them to, via the `fail_*` switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockError;

const STATUS_RX_DR: u8 = 0x40;
const REGISTER_COUNT: usize = 0x18;

#[derive(Clone, Copy)]
enum SpiTransaction {
    Idle,
    ReadRegister { register: u8, offset: u8 },
    WriteRegister { register: u8, offset: u8 },
    ReadPayload { offset: usize },
}

/// Register-level nRF24L01+ emulation behind the [`RadioBus`] trait.
///
/// Supports exactly the command subset the driver issues: single and
/// multi-byte register access, payload read, and RX flush. The STATUS
/// data-ready bit is write-1-to-clear, as on the chip.
pub struct MockRadioBus {
    registers: [u8; REGISTER_COUNT],
    rx_address: [u8; 5],
    rx_queue: VecDeque<[u8; FRAME_LEN]>,
    rx_data_ready: bool,
    ce: bool,
    selected: bool,
    transaction: SpiTransaction,
    writes_disabled: bool,
}

impl MockRadioBus {
    /// Fresh chip with power-on register defaults of zero.
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            rx_address: [0; 5],
            rx_queue: VecDeque::new(),
            rx_data_ready: false,
            ce: false,
            selected: false,
            transaction: SpiTransaction::Idle,
            writes_disabled: false,
        }
    }

    /// Simulate an absent or miswired chip: register writes stop sticking,
    /// so read-back verification fails.
    pub fn fail_register_writes(&mut self) {
        self.writes_disabled = true;
    }

    /// Deliver a payload over the air; raises the data-ready flag.
    pub fn push_payload(&mut self, payload: [u8; FRAME_LEN]) {
        self.rx_queue.push_back(payload);
        self.rx_data_ready = true;
    }

    /// Current value of a register, data-ready flag folded into STATUS.
    pub fn register(&self, register: u8) -> u8 {
        if register == reg::STATUS {
            let mut status = self.registers[reg::STATUS as usize] & !STATUS_RX_DR;
            if self.rx_data_ready {
                status |= STATUS_RX_DR;
            }
            return status;
        }
        self.registers.get(register as usize).copied().unwrap_or(0)
    }

    /// Programmed pipe 0 address.
    pub fn rx_address(&self) -> [u8; 5] {
        self.rx_address
    }

    /// CE line level.
    pub fn ce_high(&self) -> bool {
        self.ce
    }

    fn write_register_byte(&mut self, register: u8, offset: u8, value: u8) {
        if self.writes_disabled {
            return;
        }
        if register == reg::RX_ADDR_P0 {
            if (offset as usize) < self.rx_address.len() {
                self.rx_address[offset as usize] = value;
            }
            return;
        }
        if register == reg::STATUS {
            if value & STATUS_RX_DR != 0 {
                self.rx_data_ready = false;
            }
            return;
        }
        if (register as usize) < REGISTER_COUNT && offset == 0 {
            self.registers[register as usize] = value;
        }
    }

    fn start_command(&mut self, byte: u8) {
        self.transaction = match byte {
            0x61 => SpiTransaction::ReadPayload { offset: 0 },
            0xE2 => {
                self.rx_queue.clear();
                SpiTransaction::Idle
            }
            0xFF => SpiTransaction::Idle,
            b if b & 0xE0 == 0x20 => SpiTransaction::WriteRegister {
                register: b & 0x1F,
                offset: 0,
            },
            b if b & 0xE0 == 0x00 => SpiTransaction::ReadRegister {
                register: b & 0x1F,
                offset: 0,
            },
            _ => SpiTransaction::Idle,
        };
    }
}

impl Default for MockRadioBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioBus for MockRadioBus {
    type Error = MockError;

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        if !self.selected {
            return Ok(0);
        }
        match self.transaction {
            SpiTransaction::Idle => {
                self.start_command(byte);
                // The chip shifts STATUS out while the command shifts in.
                Ok(self.register(reg::STATUS))
            }
            SpiTransaction::ReadRegister { register, offset } => {
                let value = if register == reg::RX_ADDR_P0 {
                    self.rx_address
                        .get(offset as usize)
                        .copied()
                        .unwrap_or(0)
                } else {
                    self.register(register)
                };
                self.transaction = SpiTransaction::ReadRegister {
                    register,
                    offset: offset + 1,
                };
                Ok(value)
            }
            SpiTransaction::WriteRegister { register, offset } => {
                self.write_register_byte(register, offset, byte);
                self.transaction = SpiTransaction::WriteRegister {
                    register,
                    offset: offset + 1,
                };
                Ok(0)
            }
            SpiTransaction::ReadPayload { offset } => {
                let value = self
                    .rx_queue
                    .front()
                    .and_then(|p| p.get(offset).copied())
                    .unwrap_or(0);
                let next = offset + 1;
                if next == FRAME_LEN {
                    self.rx_queue.pop_front();
                }
                self.transaction = SpiTransaction::ReadPayload { offset: next };
                Ok(value)
            }
        }
    }

    fn chip_select(&mut self, selected: bool) -> Result<(), Self::Error> {
        self.selected = selected;
        self.transaction = SpiTransaction::Idle;
        Ok(())
    }

    fn set_enable(&mut self, high: bool) -> Result<(), Self::Error> {
        self.ce = high;
        Ok(())
    }
}

/// Transport-level radio mock for controller tests.
///
/// Frames are either pushed explicitly with [`push_frame`] /
/// [`push_status`], or produced by the built-in generator which emits a
/// well-formed status frame every N polls with an advancing countdown,
/// emulating a live transmitter.
///
/// [`push_frame`]: Self::push_frame
/// [`push_status`]: Self::push_status
pub struct MockRadio {
    queue: VecDeque<[u8; FRAME_LEN]>,
    codec: FrameCodec,
    begun_with: Option<RadioConfig>,
    listening: bool,
    fail_begin: bool,
    generator_interval: Option<u32>,
    polls: u32,
    gen_seconds: u16,
    gen_sequence: u8,
}

impl MockRadio {
    /// Empty transport; frames must be pushed by the test.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            codec: FrameCodec::new(),
            begun_with: None,
            listening: false,
            fail_begin: false,
            generator_interval: None,
            polls: 0,
            gen_seconds: 60,
            gen_sequence: 0,
        }
    }

    /// Transport that synthesizes a RUN frame every `interval` polls,
    /// counting down from 60 seconds.
    pub fn with_generator(interval: u32) -> Self {
        let mut radio = Self::new();
        radio.generator_interval = Some(interval.max(1));
        radio
    }

    /// Make the next `begin` fail, simulating missing hardware.
    pub fn fail_begin(&mut self) {
        self.fail_begin = true;
    }

    /// Queue a raw payload for the next poll.
    pub fn push_frame(&mut self, payload: [u8; FRAME_LEN]) {
        self.queue.push_back(payload);
    }

    /// Encode and queue a status frame.
    pub fn push_status(&mut self, frame: &StatusFrame) {
        self.queue.push_back(self.codec.encode(frame));
    }

    /// The configuration passed to `begin`, if it ran.
    pub fn begun_with(&self) -> Option<&RadioConfig> {
        self.begun_with.as_ref()
    }

    /// Whether the transport is in receive mode.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    fn generate(&mut self) -> Option<[u8; FRAME_LEN]> {
        let interval = self.generator_interval?;
        self.polls += 1;
        if self.polls % interval != 0 {
            return None;
        }
        let frame = StatusFrame {
            state: 1,
            seconds: self.gen_seconds,
            ms_lowres: 0,
            sequence: self.gen_sequence,
        };
        self.gen_seconds = self.gen_seconds.saturating_sub(1);
        self.gen_sequence = self.gen_sequence.wrapping_add(1);
        Some(self.codec.encode(&frame))
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioTransport for MockRadio {
    type Error = MockError;

    fn begin(&mut self, config: &RadioConfig) -> Result<(), Self::Error> {
        if self.fail_begin {
            return Err(MockError);
        }
        self.begun_with = Some(*config);
        Ok(())
    }

    fn start_listening(&mut self) -> Result<(), Self::Error> {
        // Entering receive mode drops anything queued beforehand, matching
        // the hardware driver's flush.
        self.queue.clear();
        self.listening = true;
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), Self::Error> {
        self.listening = false;
        Ok(())
    }

    fn poll_frame(&mut self) -> Result<Option<[u8; FRAME_LEN]>, Self::Error> {
        if !self.listening {
            return Ok(None);
        }
        if let Some(frame) = self.queue.pop_front() {
            return Ok(Some(frame));
        }
        Ok(self.generate())
    }
}

/// Strip recorder: keeps every buffer sent.
pub struct MockLedStrip {
    frames: Vec<Vec<u8>>,
    fail_send: bool,
}

impl MockLedStrip {
    /// Recorder with no frames sent.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            fail_send: false,
        }
    }

    /// Make every subsequent `send` fail.
    pub fn fail_send(&mut self) {
        self.fail_send = true;
    }

    /// Number of buffers sent so far.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The most recently sent buffer.
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.frames.last().map(|f| f.as_slice())
    }
}

impl Default for MockLedStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl LedStrip for MockLedStrip {
    type Error = MockError;

    fn send(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        if self.fail_send {
            return Err(MockError);
        }
        self.frames.push(buffer.to_vec());
        Ok(())
    }
}

/// Settable button level.
#[derive(Default)]
pub struct MockButton {
    pressed: bool,
}

impl MockButton {
    /// Released button.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current level.
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }
}

impl ButtonInput for MockButton {
    fn is_pressed(&mut self) -> bool {
        self.pressed
    }
}

/// Status LED recorder.
#[derive(Default)]
pub struct MockStatusLed {
    on: bool,
    transitions: u32,
}

impl MockStatusLed {
    /// LED starting off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// How many times the level changed.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }
}

impl StatusLed for MockStatusLed {
    type Error = MockError;

    fn set_on(&mut self, on: bool) -> Result<(), Self::Error> {
        if on != self.on {
            self.transitions += 1;
        }
        self.on = on;
        Ok(())
    }
}

/// Manually advanced clock.
#[derive(Default)]
pub struct MockClock {
    now: u64,
}

impl MockClock {
    /// Clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}
