//! Sign controller: ties radio, codec, link supervision, rendering and the
//! diagnostic button into one 50 ms tick loop.
//!
//! The controller owns all mutable state and is generic over the hardware
//! traits, so the identical logic runs on the ESP32 binary and against the
//! mocks in host tests. Time is passed into [`tick`](SignController::tick)
//! rather than read internally, which keeps every behavior deterministic
//! under test.

use log::{debug, info, warn};

use crate::button::{Gesture, InputController};
use crate::config::SignConfig;
use crate::frame::FrameCodec;
use crate::link::{LinkEvent, LinkSupervisor};
use crate::render::{Color, DisplayRenderer};
use crate::segment::SegmentMap;
use crate::state::{DisplayMode, SystemState};
use crate::traits::{ButtonInput, LedStrip, RadioTransport, StatusLed};

/// Nominal controller tick period.
pub const TICK_MS: u64 = 50;

/// Upper bound on the LED buffer, sized for strips well beyond the deployed
/// 330 LEDs.
pub const LED_BUFFER_CAPACITY: usize = 4096;

/// Active maintenance diagnostic, entered via the button.
///
/// While a diagnostic runs, radio polling and link supervision are
/// suspended; the link timer resumes where it left off afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// Walk 0 through 99 on the digits, then return to normal display.
    NumberSweep {
        /// Value currently shown.
        value: u16,
        /// When to advance to the next value.
        next_step_ms: u64,
    },
    /// Every LED full white while the button stays held.
    AllWhite,
}

/// Failures surfaced by the tick loop, tagged by the subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerError<RE, SE, LE> {
    /// Radio transport failure.
    Radio(RE),
    /// LED strip transmission failure.
    Strip(SE),
    /// Status indicator failure.
    StatusLed(LE),
}

/// The receiver's top-level state machine.
///
/// # Example
///
/// ```rust
/// use play_sign::config::SignConfig;
/// use play_sign::controller::SignController;
/// use play_sign::hal::{MockButton, MockLedStrip, MockRadio, MockStatusLed};
///
/// let mut sign = SignController::new(
///     SignConfig::default(),
///     MockRadio::new(),
///     MockLedStrip::new(),
///     MockButton::new(),
///     MockStatusLed::new(),
/// );
/// sign.begin().unwrap();
/// sign.tick(0).unwrap();
/// ```
pub struct SignController<R, S, B, L>
where
    R: RadioTransport,
    S: LedStrip,
    B: ButtonInput,
    L: StatusLed,
{
    config: SignConfig,
    radio: R,
    strip: S,
    button: B,
    status_led: L,
    codec: FrameCodec,
    renderer: DisplayRenderer,
    input: InputController,
    link: LinkSupervisor,
    state: SystemState,
    mode: DisplayMode,
    diagnostic: Option<Diagnostic>,
    buffer: heapless::Vec<u8, LED_BUFFER_CAPACITY>,
}

type TickResult<R, S, L> = Result<
    (),
    ControllerError<
        <R as RadioTransport>::Error,
        <S as LedStrip>::Error,
        <L as StatusLed>::Error,
    >,
>;

impl<R, S, B, L> SignController<R, S, B, L>
where
    R: RadioTransport,
    S: LedStrip,
    B: ButtonInput,
    L: StatusLed,
{
    /// Assemble a controller from configuration and hardware.
    pub fn new(config: SignConfig, radio: R, strip: S, button: B, status_led: L) -> Self {
        let renderer = DisplayRenderer::new(
            SegmentMap::new(&config.display.layout),
            config.display.palette,
        );
        let mut buffer = heapless::Vec::new();
        // buffer_len is clamped to capacity, so resize cannot fail
        let len = renderer.buffer_len().min(LED_BUFFER_CAPACITY);
        let _ = buffer.resize(len, 0);

        Self {
            codec: FrameCodec::with_xor_out(config.radio.crc_xor_out),
            input: InputController::new(config.button.debounce_ms, config.button.long_hold_ms),
            link: LinkSupervisor::new(config.link.timeout_ms),
            state: SystemState::default(),
            mode: DisplayMode::default(),
            diagnostic: None,
            renderer,
            buffer,
            config,
            radio,
            strip,
            button,
            status_led,
        }
    }

    /// Bring up the radio pipe and enter receive mode.
    pub fn begin(&mut self) -> TickResult<R, S, L> {
        self.radio
            .begin(&self.config.radio)
            .map_err(ControllerError::Radio)?;
        self.radio
            .start_listening()
            .map_err(ControllerError::Radio)?;
        info!(
            "sign up: channel {}, {} LEDs, link timeout {} ms",
            self.config.radio.channel,
            self.renderer.map().led_count(),
            self.config.link.timeout_ms
        );
        Ok(())
    }

    /// Run one control cycle at the given time.
    ///
    /// Order within a tick: button gestures, then either the active
    /// diagnostic or the normal radio/link/render path, then the status
    /// indicator.
    pub fn tick(&mut self, now_ms: u64) -> TickResult<R, S, L> {
        let pressed = self.button.is_pressed();
        match self.input.sample(pressed, now_ms) {
            Some(Gesture::ShortPress) => {
                info!("diagnostic: number sweep");
                self.diagnostic = Some(Diagnostic::NumberSweep {
                    value: 0,
                    next_step_ms: now_ms + self.config.display.sweep_step_ms,
                });
            }
            Some(Gesture::LongHold) => {
                info!("diagnostic: all white");
                self.diagnostic = Some(Diagnostic::AllWhite);
            }
            None => {}
        }

        match self.diagnostic {
            Some(Diagnostic::AllWhite) => {
                if self.input.is_pressed() {
                    self.renderer.fill(
                        &mut self.buffer,
                        Color::WHITE,
                        self.config.display.brightness,
                    );
                    self.strip
                        .send(&self.buffer)
                        .map_err(ControllerError::Strip)?;
                } else {
                    info!("diagnostic finished");
                    self.diagnostic = None;
                }
            }
            Some(Diagnostic::NumberSweep {
                mut value,
                mut next_step_ms,
            }) => {
                if now_ms >= next_step_ms {
                    value += 1;
                    next_step_ms += self.config.display.sweep_step_ms;
                }
                if value > 99 {
                    info!("diagnostic finished");
                    self.diagnostic = None;
                } else {
                    self.diagnostic = Some(Diagnostic::NumberSweep {
                        value,
                        next_step_ms,
                    });
                    self.renderer.render(
                        &mut self.buffer,
                        DisplayMode::Stop,
                        false,
                        value,
                        self.config.display.brightness,
                        now_ms,
                    );
                    self.strip
                        .send(&self.buffer)
                        .map_err(ControllerError::Strip)?;
                }
            }
            None => {}
        }

        if self.diagnostic.is_none() {
            self.poll_radio(now_ms)?;
            if self.link.tick(now_ms) == Some(LinkEvent::Lost) {
                warn!(
                    "link lost: no frame for {} ms",
                    self.config.link.timeout_ms
                );
            }
            self.state.link_alive = self.link.is_alive();

            self.renderer.render(
                &mut self.buffer,
                self.mode,
                !self.state.link_alive,
                self.state.seconds,
                self.config.display.brightness,
                now_ms,
            );
            self.strip
                .send(&self.buffer)
                .map_err(ControllerError::Strip)?;
        }

        // Heartbeat: slow blink while the link is alive, fast while dead.
        let heartbeat = if self.link.is_alive() {
            now_ms % 2000 < 1000
        } else {
            now_ms % 500 < 250
        };
        self.status_led
            .set_on(heartbeat)
            .map_err(ControllerError::StatusLed)?;
        Ok(())
    }

    fn poll_radio(&mut self, now_ms: u64) -> TickResult<R, S, L> {
        let payload = match self.radio.poll_frame().map_err(ControllerError::Radio)? {
            Some(payload) => payload,
            None => return Ok(()),
        };
        match self.codec.decode(&payload) {
            Ok(frame) => {
                if self.link.on_frame_received(now_ms) == Some(LinkEvent::Recovered) {
                    info!("link recovered at seq {}", frame.sequence);
                }
                self.state.apply_frame(&frame, now_ms);
                match DisplayMode::from_state(self.state.display_state) {
                    Some(mode) => self.mode = mode,
                    None => warn!(
                        "unknown state value {}, keeping {:?}",
                        frame.state, self.mode
                    ),
                }
            }
            // Transient corruption is routine on this link; drop quietly.
            Err(err) => debug!("frame dropped: {:?}", err),
        }
        Ok(())
    }

    /// Adjust global brightness at runtime.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.config.display.brightness = brightness;
    }

    /// Replace the normal digit color at runtime.
    pub fn set_on_color(&mut self, color: Color) {
        self.renderer.set_on_color(color);
    }

    /// Last known remote state.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Current base rendering mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Active diagnostic, if any.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        self.diagnostic
    }

    /// Renderer geometry, for sizing external buffers.
    pub fn renderer(&self) -> &DisplayRenderer {
        &self.renderer
    }

    /// Mutable transport access, used by tests to inject frames.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Strip access, used by tests to inspect sent buffers.
    pub fn strip(&self) -> &S {
        &self.strip
    }

    /// Mutable button access, used by tests to drive the level.
    pub fn button_mut(&mut self) -> &mut B {
        &mut self.button
    }

    /// Status indicator access.
    pub fn status_led(&self) -> &L {
        &self.status_led
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{StatusFrame, BLANK_SENTINEL};
    use crate::hal::mock::{MockButton, MockLedStrip, MockRadio, MockStatusLed};
    use crate::state::DisplayState;

    type TestSign = SignController<MockRadio, MockLedStrip, MockButton, MockStatusLed>;

    fn sign() -> TestSign {
        let mut sign = SignController::new(
            SignConfig::default(),
            MockRadio::new(),
            MockLedStrip::new(),
            MockButton::new(),
            MockStatusLed::new(),
        );
        sign.begin().unwrap();
        sign
    }

    #[test]
    fn begin_programs_the_radio() {
        let mut sign = sign();
        let config = sign.radio_mut().begun_with().copied().unwrap();
        assert_eq!(config.channel, 100);
        assert!(sign.radio_mut().is_listening());
    }

    #[test]
    fn begin_surfaces_radio_failure() {
        let mut radio = MockRadio::new();
        radio.fail_begin();
        let mut sign = SignController::new(
            SignConfig::default(),
            radio,
            MockLedStrip::new(),
            MockButton::new(),
            MockStatusLed::new(),
        );
        assert!(matches!(sign.begin(), Err(ControllerError::Radio(_))));
    }

    #[test]
    fn blank_until_first_frame() {
        let mut sign = sign();
        sign.tick(0).unwrap();
        assert_eq!(sign.state().seconds, BLANK_SENTINEL);
        let frame = sign.strip().last_frame().unwrap();
        // Dead link: only the blink overlay may be lit; at t=0 the overlay
        // is in its on phase, so the G segments carry the warning color.
        let g0 = sign.renderer().map().range(0, crate::segment::Segment::G);
        assert_ne!(frame[g0.start as usize * 3], 0);
        assert_eq!(frame[0], 0); // segment A stays dark
    }

    #[test]
    fn accepted_frame_updates_state_and_mode() {
        let mut sign = sign();
        sign.radio_mut().push_status(&StatusFrame {
            state: 1,
            seconds: 45,
            ms_lowres: 0,
            sequence: 3,
        });
        sign.tick(50).unwrap();
        assert_eq!(sign.state().seconds, 45);
        assert_eq!(sign.state().display_state, DisplayState::Run);
        assert_eq!(sign.mode(), DisplayMode::Run);
        assert!(sign.state().link_alive);
    }

    #[test]
    fn corrupt_frame_is_dropped_silently() {
        let mut sign = sign();
        let mut bytes = FrameCodec::new().encode(&StatusFrame {
            state: 1,
            seconds: 45,
            ms_lowres: 0,
            sequence: 3,
        });
        bytes[2] ^= 0x01;
        sign.radio_mut().push_frame(bytes);
        sign.tick(50).unwrap();
        // No state change and no link recovery.
        assert_eq!(sign.state().seconds, BLANK_SENTINEL);
        assert!(!sign.state().link_alive);
    }

    #[test]
    fn unknown_state_retains_previous_mode() {
        let mut sign = sign();
        sign.radio_mut().push_status(&StatusFrame {
            state: 1,
            seconds: 30,
            ms_lowres: 0,
            sequence: 0,
        });
        sign.tick(0).unwrap();
        assert_eq!(sign.mode(), DisplayMode::Run);

        sign.radio_mut().push_status(&StatusFrame {
            state: 9,
            seconds: 29,
            ms_lowres: 0,
            sequence: 1,
        });
        sign.tick(50).unwrap();
        // Raw state stored, rendering mode untouched.
        assert_eq!(sign.state().display_state, DisplayState::Unknown(9));
        assert_eq!(sign.state().seconds, 29);
        assert_eq!(sign.mode(), DisplayMode::Run);
    }

    #[test]
    fn link_dies_after_timeout() {
        let mut sign = sign();
        sign.radio_mut().push_status(&StatusFrame {
            state: 0,
            seconds: 10,
            ms_lowres: 0,
            sequence: 0,
        });
        sign.tick(0).unwrap();
        assert!(sign.state().link_alive);

        sign.tick(10_000).unwrap();
        assert!(sign.state().link_alive); // boundary is exclusive
        sign.tick(10_050).unwrap();
        assert!(!sign.state().link_alive);
    }

    #[test]
    fn status_led_cadence_tracks_link() {
        let mut sign = sign();
        // Dead link: 250 ms on / 250 ms off.
        sign.tick(0).unwrap();
        assert!(sign.status_led().is_on());
        sign.tick(300).unwrap();
        assert!(!sign.status_led().is_on());

        sign.radio_mut().push_status(&StatusFrame {
            state: 0,
            seconds: 10,
            ms_lowres: 0,
            sequence: 0,
        });
        // Alive link: 1 s on / 1 s off.
        sign.tick(350).unwrap();
        assert!(sign.status_led().is_on());
        sign.tick(1200).unwrap();
        assert!(!sign.status_led().is_on());
        sign.tick(2100).unwrap();
        assert!(sign.status_led().is_on());
    }

    #[test]
    fn short_press_starts_sweep_and_suspends_radio() {
        let mut sign = sign();
        sign.button_mut().set_pressed(true);
        sign.tick(0).unwrap();
        sign.tick(100).unwrap();
        sign.button_mut().set_pressed(false);
        sign.tick(150).unwrap();
        sign.tick(200).unwrap(); // release debounced: sweep starts
        assert!(matches!(
            sign.diagnostic(),
            Some(Diagnostic::NumberSweep { value: 0, .. })
        ));

        // Frames arriving mid-sweep are not consumed.
        sign.radio_mut().push_status(&StatusFrame {
            state: 1,
            seconds: 7,
            ms_lowres: 0,
            sequence: 0,
        });
        sign.tick(250).unwrap();
        assert_eq!(sign.state().seconds, BLANK_SENTINEL);
    }

    #[test]
    fn sweep_advances_and_finishes() {
        let mut sign = sign();
        sign.button_mut().set_pressed(true);
        sign.tick(0).unwrap();
        sign.tick(50).unwrap();
        sign.button_mut().set_pressed(false);
        sign.tick(100).unwrap();
        sign.tick(150).unwrap(); // release debounced: sweep starts
        assert!(sign.diagnostic().is_some());

        // 100 values at 200 ms each.
        let mut now = 150;
        while sign.diagnostic().is_some() {
            now += TICK_MS;
            sign.tick(now).unwrap();
            assert!(now < 150 + 101 * 200, "sweep never finished");
        }
        assert!(now >= 150 + 99 * 200);
    }

    #[test]
    fn long_hold_goes_all_white_until_release() {
        let mut sign = sign();
        sign.button_mut().set_pressed(true);
        let mut now = 0;
        while sign.diagnostic().is_none() {
            sign.tick(now).unwrap();
            now += TICK_MS;
            assert!(now < 3000, "long hold never fired");
        }
        assert_eq!(sign.diagnostic(), Some(Diagnostic::AllWhite));
        assert!(now >= 2000);

        sign.tick(now).unwrap();
        let frame = sign.strip().last_frame().unwrap();
        assert!(frame.iter().all(|&b| b == 255));

        sign.button_mut().set_pressed(false);
        sign.tick(now + 50).unwrap();
        sign.tick(now + 100).unwrap(); // release debounced
        sign.tick(now + 150).unwrap();
        assert_eq!(sign.diagnostic(), None);
        // Normal rendering resumed: buffer no longer all white.
        let frame = sign.strip().last_frame().unwrap();
        assert!(frame.iter().any(|&b| b != 255));
    }

    #[test]
    fn brightness_applies_to_output() {
        let mut sign = sign();
        sign.set_brightness(0);
        sign.radio_mut().push_status(&StatusFrame {
            state: 1,
            seconds: 88,
            ms_lowres: 0,
            sequence: 0,
        });
        sign.tick(0).unwrap();
        let frame = sign.strip().last_frame().unwrap();
        assert!(frame.iter().all(|&b| b == 0));
    }
}
