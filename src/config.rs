//! Sign configuration.
//!
//! Defaults match the deployed field unit; the `with_*` builders exist so
//! binaries and tests can override a single knob without spelling out the
//! whole structure. Everything here is plain data, no I/O.

use crate::render::Palette;
use crate::segment::DisplayLayout;

/// Radio link parameters shared with the transmitting controller.
///
/// These must match the paired controller exactly; a mismatch in any field
/// shows up as a permanently dead link, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadioConfig {
    /// RF channel, 0-125 (2400 + n MHz).
    pub channel: u8,
    /// 5-byte receive pipe address.
    pub rx_address: [u8; 5],
    /// CRC8 finalization XOR; 0x00 for the canonical transmitter, 0xFF for
    /// the inverted-output variant.
    pub crc_xor_out: u8,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            channel: 100,
            rx_address: [0xC2; 5],
            crc_xor_out: 0x00,
        }
    }
}

/// Link supervision parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Silence longer than this declares the link dead.
    pub timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

/// Display geometry, colors and diagnostic timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConfig {
    /// Strip wiring of the digits.
    pub layout: DisplayLayout,
    /// The sign's four colors.
    pub palette: Palette,
    /// Global brightness, 0-255.
    pub brightness: u8,
    /// Dwell per value during the number-sweep diagnostic.
    pub sweep_step_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            layout: DisplayLayout::default(),
            palette: Palette::default(),
            brightness: 255,
            sweep_step_ms: 200,
        }
    }
}

/// Diagnostic button parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonConfig {
    /// Debounce settle window.
    pub debounce_ms: u64,
    /// Hold duration that promotes a press to the all-white test.
    pub long_hold_ms: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            long_hold_ms: 2000,
        }
    }
}

/// Top-level configuration for one sign.
///
/// # Example
///
/// ```rust
/// use play_sign::config::SignConfig;
///
/// let config = SignConfig::default()
///     .with_channel(76)
///     .with_link_timeout_ms(5_000)
///     .with_brightness(128);
/// assert_eq!(config.radio.channel, 76);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignConfig {
    /// Radio link parameters.
    pub radio: RadioConfig,
    /// Link supervision parameters.
    pub link: LinkConfig,
    /// Display geometry and colors.
    pub display: DisplayConfig,
    /// Diagnostic button parameters.
    pub button: ButtonConfig,
}

impl SignConfig {
    /// Override the RF channel.
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.radio.channel = channel;
        self
    }

    /// Override the receive pipe address.
    pub fn with_rx_address(mut self, address: [u8; 5]) -> Self {
        self.radio.rx_address = address;
        self
    }

    /// Override the CRC finalization XOR for the paired transmitter.
    pub fn with_crc_xor_out(mut self, xor_out: u8) -> Self {
        self.radio.crc_xor_out = xor_out;
        self
    }

    /// Override the link-dead timeout.
    pub fn with_link_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.link.timeout_ms = timeout_ms;
        self
    }

    /// Override the strip wiring.
    pub fn with_layout(mut self, layout: DisplayLayout) -> Self {
        self.display.layout = layout;
        self
    }

    /// Override the global brightness.
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.display.brightness = brightness;
        self
    }

    /// Override the number-sweep dwell time.
    pub fn with_sweep_step_ms(mut self, step_ms: u64) -> Self {
        self.display.sweep_step_ms = step_ms;
        self
    }

    /// Override the button debounce window.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.button.debounce_ms = debounce_ms;
        self
    }

    /// Override the long-hold threshold.
    pub fn with_long_hold_ms(mut self, long_hold_ms: u64) -> Self {
        self.button.long_hold_ms = long_hold_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_field_unit() {
        let config = SignConfig::default();
        assert_eq!(config.radio.channel, 100);
        assert_eq!(config.radio.rx_address, [0xC2; 5]);
        assert_eq!(config.radio.crc_xor_out, 0x00);
        assert_eq!(config.link.timeout_ms, 10_000);
        assert_eq!(config.display.brightness, 255);
        assert_eq!(config.display.sweep_step_ms, 200);
        assert_eq!(config.button.debounce_ms, 50);
        assert_eq!(config.button.long_hold_ms, 2000);
    }

    #[test]
    fn builders_override_one_knob() {
        let config = SignConfig::default()
            .with_channel(42)
            .with_brightness(64)
            .with_link_timeout_ms(800);
        assert_eq!(config.radio.channel, 42);
        assert_eq!(config.display.brightness, 64);
        assert_eq!(config.link.timeout_ms, 800);
        // untouched sections keep their defaults
        assert_eq!(config.button, ButtonConfig::default());
    }
}
