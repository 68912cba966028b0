//! Receiver-side interpretation of the wire state.
//!
//! The wire carries a raw `u8` state value; the sign keeps it as a distinct
//! type from the internal [`DisplayMode`] so a malformed wire value can
//! never silently become an invalid mode. The translation is total: every
//! wire value maps, unknown ones are preserved and flagged.

use crate::frame::{StatusFrame, BLANK_SENTINEL};

/// Decoded wire state, one variant per defined value plus a catch-all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayState {
    /// Clock stopped (wire value 0).
    Stop,
    /// Clock running (wire value 1).
    Run,
    /// Clock reset (wire value 2).
    Reset,
    /// Any other wire value, preserved for logging.
    Unknown(u8),
}

impl DisplayState {
    /// Total mapping from the raw wire value.
    pub const fn from_wire(value: u8) -> Self {
        match value {
            0 => DisplayState::Stop,
            1 => DisplayState::Run,
            2 => DisplayState::Reset,
            other => DisplayState::Unknown(other),
        }
    }

    /// The raw value this state came from.
    pub const fn as_wire(&self) -> u8 {
        match self {
            DisplayState::Stop => 0,
            DisplayState::Run => 1,
            DisplayState::Reset => 2,
            DisplayState::Unknown(v) => *v,
        }
    }
}

/// Base rendering mode, selecting the segment color.
///
/// Link-warning is a renderer overlay, not a base mode; see
/// [`DisplayRenderer::render`](crate::render::DisplayRenderer::render).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayMode {
    /// Normal display, on-color segments.
    #[default]
    Stop,
    /// Clock running, on-color segments.
    Run,
    /// Clock reset, warning-color segments.
    Reset,
    /// Fault indication, error-color segments.
    Error,
}

impl DisplayMode {
    /// Maps a wire state to a rendering mode.
    ///
    /// Returns `None` for [`DisplayState::Unknown`]: the caller logs the
    /// value and keeps the previous mode rather than replacing it.
    pub const fn from_state(state: DisplayState) -> Option<Self> {
        match state {
            DisplayState::Stop => Some(DisplayMode::Stop),
            DisplayState::Run => Some(DisplayMode::Run),
            DisplayState::Reset => Some(DisplayMode::Reset),
            DisplayState::Unknown(_) => None,
        }
    }
}

/// Everything the receiver knows about the remote controller.
///
/// Owned exclusively by the controller; mutated only by accepted frames
/// and by link-supervisor timeouts. The sequence counter is informational:
/// every accepted frame overwrites state, duplicates and reordering
/// included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemState {
    /// Last received wire state.
    pub display_state: DisplayState,
    /// Last received seconds value. 0–99 nominal; values >= 100 are a
    /// sender error and are passed through un-clamped.
    pub seconds: u16,
    /// Last received sequence counter.
    pub sequence: u8,
    /// Arrival time of the last accepted frame.
    pub last_received_ms: u64,
    /// Current link-liveness verdict from the supervisor.
    pub link_alive: bool,
}

impl SystemState {
    /// Overwrite state from an accepted frame.
    pub fn apply_frame(&mut self, frame: &StatusFrame, now_ms: u64) {
        self.display_state = DisplayState::from_wire(frame.state);
        self.seconds = frame.seconds;
        self.sequence = frame.sequence;
        self.last_received_ms = now_ms;
    }
}

impl Default for SystemState {
    /// Until the first frame arrives, the sign shows nothing: the seconds
    /// field starts at the blank sentinel.
    fn default() -> Self {
        Self {
            display_state: DisplayState::Stop,
            seconds: BLANK_SENTINEL,
            sequence: 0,
            last_received_ms: 0,
            link_alive: false,
        }
    }
}
