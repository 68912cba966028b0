//! ESP32 firmware entry point for the play-sign receiver.
//!
//! Brings up logging, constructs the hardware layer, and runs the
//! controller at its 50 ms tick. Init failures are signalled on the status
//! LED so a sign with no working strip is still diagnosable from the
//! cabinet: a 100 ms blink means the strip driver failed, 250 ms means the
//! radio did not come up.

use anyhow::{Context, Result};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, IOPin, OutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::{config::Config as SpiConfig, SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_hal::units::FromValueType;
use log::{error, info};

use play_sign::config::SignConfig;
use play_sign::controller::{SignController, TICK_MS};
use play_sign::hal::esp32::{
    Esp32Button, Esp32Clock, Esp32LedStrip, Esp32RadioBus, Esp32StatusLed,
};
use play_sign::radio::Nrf24Radio;
use play_sign::render::DisplayRenderer;
use play_sign::segment::SegmentMap;
use play_sign::traits::{Clock, LedStrip, RadioTransport, StatusLed};

const STRIP_FAILED_BLINK_MS: u32 = 100;
const RADIO_FAILED_BLINK_MS: u32 = 250;

fn main() -> Result<()> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let pins = peripherals.pins;

    let mut status_led = Esp32StatusLed::new(PinDriver::output(pins.gpio2.downgrade_output())?)
        .context("status led")?;

    let mut strip = match Esp32LedStrip::new(peripherals.rmt.channel0, pins.gpio13) {
        Ok(strip) => strip,
        Err(err) => {
            error!("led strip init failed: {err}");
            blink_forever(&mut status_led, STRIP_FAILED_BLINK_MS);
        }
    };

    let spi = SpiDriver::new(
        peripherals.spi2,
        pins.gpio18,
        pins.gpio23,
        Some(pins.gpio19),
        &SpiDriverConfig::new(),
    )
    .context("spi bus")?;
    let device = SpiDeviceDriver::new(
        spi,
        Option::<AnyIOPin>::None,
        &SpiConfig::new()
            .baudrate(4.MHz().into())
            .data_mode(embedded_hal::spi::MODE_0),
    )
    .context("spi device")?;
    let bus = Esp32RadioBus::new(
        device,
        PinDriver::output(pins.gpio5.downgrade_output())?,
        PinDriver::output(pins.gpio4.downgrade_output())?,
    )
    .context("radio bus")?;

    let button =
        Esp32Button::new(PinDriver::input(pins.gpio21.downgrade())?).context("button")?;

    let config = SignConfig::default();

    // Verify the radio before handing the status LED to the controller, so
    // a missing chip can still be signalled.
    let mut radio = Nrf24Radio::new(bus);
    if let Err(err) = radio.begin(&config.radio) {
        error!("radio init failed: {err:?}");
        // Paint the sign red so the fault is visible from the field, then
        // blink the cabinet LED.
        let renderer = DisplayRenderer::new(
            SegmentMap::new(&config.display.layout),
            config.display.palette,
        );
        let mut buffer = vec![0u8; renderer.buffer_len()];
        renderer.fill(
            &mut buffer,
            config.display.palette.error,
            config.display.brightness,
        );
        let _ = strip.send(&buffer);
        blink_forever(&mut status_led, RADIO_FAILED_BLINK_MS);
    }

    let mut sign = SignController::new(config, radio, strip, button, status_led);
    if let Err(err) = sign.begin() {
        return Err(anyhow::anyhow!("sign startup failed: {err:?}"));
    }

    info!("entering main loop");
    let clock = Esp32Clock::new();
    loop {
        if let Err(err) = sign.tick(clock.now_ms()) {
            // A transient bus error should not take the sign down.
            error!("tick failed: {err:?}");
        }
        FreeRtos::delay_ms(TICK_MS as u32);
    }
}

fn blink_forever(led: &mut impl StatusLed, period_ms: u32) -> ! {
    let mut on = false;
    loop {
        on = !on;
        let _ = led.set_on(on);
        FreeRtos::delay_ms(period_ms);
    }
}
