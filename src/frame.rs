//! Wire-frame codec for the controller's status broadcast.
//!
//! The controller node sends one fixed-size frame type: an 8-byte status
//! record carrying the clock state, the seconds value, a low-resolution
//! sub-second field, and a sequence counter, protected by a CRC8 over the
//! first seven bytes.
//!
//! # Wire layout
//!
//! | offset | field | type |
//! |--------|-------------|-----------|
//! | 0 | frame_type | u8 (must be `0xA1`) |
//! | 1 | state | u8 |
//! | 2–3 | seconds | u16 BE |
//! | 4–5 | ms_lowres | u16 BE |
//! | 6 | sequence | u8 |
//! | 7 | crc8 | u8 over bytes 0–6 |
//!
//! # Example
//!
//! ```rust
//! use play_sign::frame::{FrameCodec, StatusFrame};
//!
//! let codec = FrameCodec::new();
//! let frame = StatusFrame { state: 1, seconds: 45, ms_lowres: 0, sequence: 10 };
//! let bytes = codec.encode(&frame);
//! assert_eq!(codec.decode(&bytes).unwrap(), frame);
//! ```

/// Total frame length on the wire, including the trailing CRC byte.
pub const FRAME_LEN: usize = 8;

/// Reserved tag identifying a status frame.
pub const STATUS_FRAME_TYPE: u8 = 0xA1;

/// Seconds value reserved to mean "no data / blank the display".
pub const BLANK_SENTINEL: u16 = 255;

/// Decoded status frame fields.
///
/// Pure wire content; no semantic validation is applied here. Range checks
/// (seconds 0–99, known state values) belong to the consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFrame {
    /// Raw display state value (0=STOP, 1=RUN, 2=RESET on the wire).
    pub state: u8,
    /// Seconds to display; 0–99 nominal, [`BLANK_SENTINEL`] blanks the sign.
    pub seconds: u16,
    /// Sub-second resolution, advisory only.
    pub ms_lowres: u16,
    /// Monotonic counter mod 256, informational (no deduplication).
    pub sequence: u8,
}

/// Frame decode failures.
///
/// All of these are dropped silently by the controller; transient radio
/// noise is expected and common.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer than [`FRAME_LEN`] bytes supplied.
    Truncated,
    /// `frame_type` is not the status tag.
    WrongType,
    /// Computed CRC8 does not match the trailing byte.
    CrcMismatch,
}

/// Encoder/decoder for status frames.
///
/// The CRC8 finalization XOR differs between deployed controller builds
/// (some apply a trailing `XOR 0xFF`), so it is carried as configuration
/// rather than hard-coded. The default of `0x00` matches the canonical
/// transmitter; verify against the paired controller before deployment.
#[derive(Clone, Copy, Debug)]
pub struct FrameCodec {
    xor_out: u8,
}

impl FrameCodec {
    /// Codec with the canonical finalization (no trailing XOR).
    pub const fn new() -> Self {
        Self { xor_out: 0x00 }
    }

    /// Codec with an explicit finalization XOR (e.g. `0xFF` for the
    /// inverted-output transmitter variant).
    pub const fn with_xor_out(xor_out: u8) -> Self {
        Self { xor_out }
    }

    /// CRC8 (poly 0x07, init 0xFF, MSB first, no reflection) over `data`,
    /// finalized with the configured XOR.
    pub fn crc8(&self, data: &[u8]) -> u8 {
        let mut crc: u8 = 0xFF;
        for &byte in data {
            crc ^= byte;
            for _ in 0..8 {
                if crc & 0x80 != 0 {
                    crc = (crc << 1) ^ 0x07;
                } else {
                    crc <<= 1;
                }
            }
        }
        crc ^ self.xor_out
    }

    /// Serialize a frame into its wire layout with the CRC appended.
    pub fn encode(&self, frame: &StatusFrame) -> [u8; FRAME_LEN] {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = STATUS_FRAME_TYPE;
        bytes[1] = frame.state;
        bytes[2..4].copy_from_slice(&frame.seconds.to_be_bytes());
        bytes[4..6].copy_from_slice(&frame.ms_lowres.to_be_bytes());
        bytes[6] = frame.sequence;
        bytes[7] = self.crc8(&bytes[..FRAME_LEN - 1]);
        bytes
    }

    /// Parse and validate a received payload.
    ///
    /// The type tag is checked before the CRC; extra trailing bytes (the
    /// hardware pipe may pad the payload) are ignored.
    pub fn decode(&self, bytes: &[u8]) -> Result<StatusFrame, FrameError> {
        if bytes.len() < FRAME_LEN {
            return Err(FrameError::Truncated);
        }
        if bytes[0] != STATUS_FRAME_TYPE {
            return Err(FrameError::WrongType);
        }
        if self.crc8(&bytes[..FRAME_LEN - 1]) != bytes[FRAME_LEN - 1] {
            return Err(FrameError::CrcMismatch);
        }
        Ok(StatusFrame {
            state: bytes[1],
            seconds: u16::from_be_bytes([bytes[2], bytes[3]]),
            ms_lowres: u16::from_be_bytes([bytes[4], bytes[5]]),
            sequence: bytes[6],
        })
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}
