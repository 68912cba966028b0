//! Boundary and malformed-input behavior.

use play_sign::config::SignConfig;
use play_sign::controller::SignController;
use play_sign::frame::{FrameCodec, StatusFrame, BLANK_SENTINEL};
use play_sign::hal::{MockButton, MockLedStrip, MockRadio, MockStatusLed};
use play_sign::segment::{DisplayLayout, Segment, SegmentMap};
use play_sign::state::{DisplayMode, DisplayState};

type MockSign = SignController<MockRadio, MockLedStrip, MockButton, MockStatusLed>;

fn sign_with(config: SignConfig) -> MockSign {
    let mut sign = SignController::new(
        config,
        MockRadio::new(),
        MockLedStrip::new(),
        MockButton::new(),
        MockStatusLed::new(),
    );
    sign.begin().expect("mock begin");
    sign
}

fn status(state: u8, seconds: u16, sequence: u8) -> StatusFrame {
    StatusFrame {
        state,
        seconds,
        ms_lowres: 0,
        sequence,
    }
}

fn digit_dark(buffer: &[u8], digit: usize) -> bool {
    let map = SegmentMap::new(&DisplayLayout::default());
    Segment::ALL.iter().all(|&segment| {
        let range = map.range(digit, segment);
        let offset = range.start as usize * 3;
        buffer[offset..offset + range.count as usize * 3]
            .iter()
            .all(|&b| b == 0)
    })
}

#[test]
fn sentinel_blanks_a_live_display() {
    let mut sign = sign_with(SignConfig::default());
    sign.radio_mut().push_status(&status(1, 45, 0));
    sign.tick(0).unwrap();
    assert!(!digit_dark(sign.strip().last_frame().unwrap(), 0));

    sign.radio_mut().push_status(&status(1, BLANK_SENTINEL, 1));
    sign.tick(50).unwrap();
    let buffer = sign.strip().last_frame().unwrap();
    assert!(digit_dark(buffer, 0));
    assert!(digit_dark(buffer, 1));
    // The frame still counts for the link.
    assert!(sign.state().link_alive);
}

#[test]
fn out_of_range_seconds_shows_low_digits() {
    // A buggy transmitter sending 120 shows "20": no clamping, the digit
    // decomposition just takes tens and ones.
    let mut sign = sign_with(SignConfig::default());
    sign.radio_mut().push_status(&status(1, 120, 0));
    sign.tick(0).unwrap();
    assert_eq!(sign.state().seconds, 120);

    let map = SegmentMap::new(&DisplayLayout::default());
    let buffer = sign.strip().last_frame().unwrap();
    // tens digit shows 2: segment E lit, segment C dark
    let e = map.range(0, Segment::E);
    let c = map.range(0, Segment::C);
    assert!(buffer[e.start as usize * 3..][..3].iter().any(|&b| b != 0));
    assert!(buffer[c.start as usize * 3..][..3].iter().all(|&b| b == 0));
}

#[test]
fn duplicate_sequence_is_not_deduplicated() {
    let mut sign = sign_with(SignConfig::default());
    sign.radio_mut().push_status(&status(1, 45, 9));
    sign.tick(0).unwrap();
    sign.radio_mut().push_status(&status(1, 44, 9));
    sign.tick(50).unwrap();
    assert_eq!(sign.state().seconds, 44);
    assert_eq!(sign.state().sequence, 9);
}

#[test]
fn crc_variant_mismatch_keeps_the_sign_blank() {
    // Sign expects the inverted-CRC transmitter; a canonical frame must be
    // dropped and never count toward the link.
    let mut sign = sign_with(SignConfig::default().with_crc_xor_out(0xFF));
    let canonical = FrameCodec::new().encode(&status(1, 45, 0));
    sign.radio_mut().push_frame(canonical);
    sign.tick(0).unwrap();
    assert_eq!(sign.state().seconds, BLANK_SENTINEL);
    assert!(!sign.state().link_alive);

    // The matching variant is accepted.
    let inverted = FrameCodec::with_xor_out(0xFF).encode(&status(1, 45, 0));
    sign.radio_mut().push_frame(inverted);
    sign.tick(50).unwrap();
    assert_eq!(sign.state().seconds, 45);
    assert!(sign.state().link_alive);
}

#[test]
fn unknown_state_survives_link_loss_and_recovery() {
    let mut sign = sign_with(SignConfig::default());
    sign.radio_mut().push_status(&status(2, 10, 0));
    sign.tick(0).unwrap();
    assert_eq!(sign.mode(), DisplayMode::Reset);

    // Unknown value: state recorded, mode kept.
    sign.radio_mut().push_status(&status(200, 9, 1));
    sign.tick(50).unwrap();
    assert_eq!(sign.state().display_state, DisplayState::Unknown(200));
    assert_eq!(sign.mode(), DisplayMode::Reset);

    // Loss and recovery do not resurrect a stale mode either.
    sign.tick(30_000).unwrap();
    assert!(!sign.state().link_alive);
    sign.radio_mut().push_status(&status(1, 8, 2));
    sign.tick(30_050).unwrap();
    assert_eq!(sign.mode(), DisplayMode::Run);
}

#[test]
fn short_link_timeout_is_honored() {
    let mut sign = sign_with(SignConfig::default().with_link_timeout_ms(800));
    sign.radio_mut().push_status(&status(1, 5, 0));
    sign.tick(0).unwrap();
    assert!(sign.state().link_alive);
    sign.tick(800).unwrap();
    assert!(sign.state().link_alive);
    sign.tick(850).unwrap();
    assert!(!sign.state().link_alive);
}

#[test]
fn custom_layout_sizes_the_output_buffer() {
    let layout = DisplayLayout {
        leds_horizontal: 4,
        leds_vertical: 8,
        digit_base: [0, 44],
    };
    let mut sign = sign_with(SignConfig::default().with_layout(layout));
    sign.tick(0).unwrap();
    // 2 digits x (3*4 + 4*8) = 88 LEDs.
    assert_eq!(sign.strip().last_frame().unwrap().len(), 88 * 3);
}

#[test]
fn strip_failure_surfaces_from_tick() {
    let mut sign = sign_with(SignConfig::default());
    sign.tick(0).unwrap();
    // Inject a strip fault; the controller reports it instead of panicking.
    let mut strip = MockLedStrip::new();
    strip.fail_send();
    let mut sign = SignController::new(
        SignConfig::default(),
        MockRadio::new(),
        strip,
        MockButton::new(),
        MockStatusLed::new(),
    );
    sign.begin().unwrap();
    assert!(sign.tick(0).is_err());
}
