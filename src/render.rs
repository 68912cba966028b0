//! Render engine: (mode, seconds, brightness) to a GRB byte buffer.
//!
//! The renderer has no hardware coupling of its own; it only fills a byte
//! slice. The buffer uses the WS2815 strip's native channel order
//! (green, red, blue); that ordering is a hardware contract, not a
//! design choice.
//!
//! # Example
//!
//! ```rust
//! use play_sign::render::{DisplayRenderer, Palette};
//! use play_sign::segment::{DisplayLayout, SegmentMap};
//! use play_sign::state::DisplayMode;
//!
//! let map = SegmentMap::new(&DisplayLayout::default());
//! let renderer = DisplayRenderer::new(map, Palette::default());
//! let mut buf = vec![0u8; renderer.buffer_len()];
//! renderer.render(&mut buf, DisplayMode::Run, false, 45, 255, 0);
//! ```

use crate::frame::BLANK_SENTINEL;
use crate::segment::{Segment, SegmentMap, SegmentRange, DIGIT_COUNT};
use crate::state::DisplayMode;

/// Half-period of the link-warning blink (250 ms toggle, ~2 Hz cadence).
pub const LINK_BLINK_HALF_PERIOD_MS: u64 = 250;

/// An RGB color, stored unscaled; brightness is applied per channel at
/// write time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Construct a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// All channels off.
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// Full white, used by the long-hold diagnostic.
    pub const WHITE: Color = Color::new(255, 255, 255);
}

/// The four fixed colors of the sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    /// Background / inactive segments.
    pub off: Color,
    /// Normal digit color (STOP and RUN).
    pub on: Color,
    /// RESET mode and the link-warning overlay.
    pub warning: Color,
    /// ERROR mode.
    pub error: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            off: Color::BLACK,
            on: Color::new(255, 165, 0),      // orange
            warning: Color::new(255, 255, 0), // yellow
            error: Color::new(255, 0, 0),
        }
    }
}

/// Turns a mode and seconds value into LED strip bytes via a [`SegmentMap`].
#[derive(Clone, Copy, Debug)]
pub struct DisplayRenderer {
    map: SegmentMap,
    palette: Palette,
}

impl DisplayRenderer {
    /// Renderer over a built segment map.
    pub fn new(map: SegmentMap, palette: Palette) -> Self {
        Self { map, palette }
    }

    /// Required buffer size in bytes (3 per LED).
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.map.led_count() as usize * 3
    }

    /// The segment map in use.
    #[inline]
    pub fn map(&self) -> &SegmentMap {
        &self.map
    }

    /// Replace the normal digit color at runtime.
    pub fn set_on_color(&mut self, color: Color) {
        self.palette.on = color;
    }

    /// Compose one display frame into `buf`.
    ///
    /// 1. Fills the whole buffer with the off color at `brightness`.
    /// 2. `seconds == 255` is the blank sentinel: the buffer stays off
    ///    regardless of mode.
    /// 3. Otherwise tens/ones are looked up in the digit mask table and
    ///    active segments get the mode color.
    /// 4. With `link_warning` set, the middle (G) segment of both digits
    ///    toggles at ~2 Hz on top of the digit rendering, phased off
    ///    `now_ms`.
    pub fn render(
        &self,
        buf: &mut [u8],
        mode: DisplayMode,
        link_warning: bool,
        seconds: u16,
        brightness: u8,
        now_ms: u64,
    ) {
        self.fill(buf, self.palette.off, brightness);

        if seconds != BLANK_SENTINEL {
            let color = match mode {
                DisplayMode::Error => self.palette.error,
                DisplayMode::Reset => self.palette.warning,
                DisplayMode::Stop | DisplayMode::Run => self.palette.on,
            };

            let tens = (seconds / 10) % 10;
            let ones = seconds % 10;
            for (digit, value) in [tens, ones].into_iter().enumerate() {
                let mask = SegmentMap::digit_mask(value);
                for segment in Segment::ALL {
                    if mask & (1 << segment.index()) != 0 {
                        self.paint(buf, self.map.range(digit, segment), color, brightness);
                    }
                }
            }
        }

        if link_warning {
            let phase_on = (now_ms / LINK_BLINK_HALF_PERIOD_MS) % 2 == 0;
            let color = if phase_on {
                self.palette.warning
            } else {
                self.palette.off
            };
            for digit in 0..DIGIT_COUNT {
                self.paint(buf, self.map.range(digit, Segment::G), color, brightness);
            }
        }
    }

    /// Fill every LED with one color at the given brightness. Also used by
    /// the all-white diagnostic.
    pub fn fill(&self, buf: &mut [u8], color: Color, brightness: u8) {
        let leds = buf.len() / 3;
        for index in 0..leds {
            Self::write_led(buf, index, color, brightness);
        }
    }

    fn paint(&self, buf: &mut [u8], range: SegmentRange, color: Color, brightness: u8) {
        for i in 0..range.count {
            Self::write_led(buf, (range.start + i) as usize, color, brightness);
        }
    }

    /// Per-channel brightness scaling with integer truncation, written in
    /// the strip's GRB order.
    fn write_led(buf: &mut [u8], index: usize, color: Color, brightness: u8) {
        let offset = index * 3;
        if offset + 2 >= buf.len() {
            return;
        }
        let scale = |channel: u8| ((channel as u16 * brightness as u16) / 255) as u8;
        buf[offset] = scale(color.g);
        buf[offset + 1] = scale(color.r);
        buf[offset + 2] = scale(color.b);
    }
}
