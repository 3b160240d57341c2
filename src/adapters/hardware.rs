//! Raspberry Pi hardware adapter (feature `rpi`).
//!
//! Claims the configured GPIOs and the I2C bus through `rppal` and wraps
//! them in the crate's drivers. `rppal`'s `hal` feature provides the
//! `embedded-hal` 1.0 impls, so nothing past this module knows it is
//! talking to a Pi. This is the only module that touches real hardware.
//!
//! | Peripheral | rppal type            | Mode                    |
//! |------------|-----------------------|-------------------------|
//! | LEDs       | `gpio::OutputPin`     | output, starts LOW      |
//! | Button     | `gpio::InputPin`      | input, internal pull-up |
//! | ADS1115    | `i2c::I2c` (bus 1)    | 7-bit address per read  |

use log::{error, info};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use rppal::hal::Delay;
use rppal::i2c::I2c;

use crate::config::SystemConfig;
use crate::drivers::ads1115::{Ads1115, Ads1115Channel};
use crate::drivers::button::ButtonDriver;
use crate::drivers::pot::Potentiometer;
use crate::error::{Error, Result};
use crate::strategies::{LedPin, Peripherals};

pub type PotInput = Ads1115Channel<I2c, Delay>;
pub type RpiPeripherals = Peripherals<OutputPin, InputPin, PotInput>;

/// Claim every pin and the ADC named in `cfg`.
pub fn build(cfg: &SystemConfig) -> Result<RpiPeripherals> {
    let gpio = Gpio::new().map_err(|e| {
        error!("GPIO: {}", e);
        Error::Init("GPIO peripheral unavailable")
    })?;

    let mut leds = Vec::with_capacity(cfg.leds.len());
    for led in &cfg.leds {
        let pin = gpio.get(led.gpio).map_err(|e| {
            error!("GPIO {} ({}): {}", led.gpio, led.name, e);
            Error::Init("LED pin unavailable")
        })?;
        leds.push(LedPin {
            name: led.name.clone(),
            gpio: led.gpio,
            pin: pin.into_output_low(),
        });
        info!("LED {} on GPIO {}", led.name, led.gpio);
    }

    let button_pin = gpio
        .get(cfg.button.gpio)
        .map_err(|e| {
            error!("GPIO {} ({}): {}", cfg.button.gpio, cfg.button.name, e);
            Error::Init("button pin unavailable")
        })?
        .into_input_pullup();
    let button = ButtonDriver::new(
        button_pin,
        cfg.button.gpio,
        cfg.button.hold_ms,
        cfg.button.debounce_ms,
    );
    info!("Button {} on GPIO {}", cfg.button.name, cfg.button.gpio);

    let i2c = I2c::new().map_err(|e| {
        error!("I2C: {}", e);
        Error::Init("I2C bus unavailable")
    })?;
    let adc = Ads1115::new(i2c, Delay::new(), cfg.pot.i2c_address).into_channel(cfg.pot.channel);
    let pot = Potentiometer::new(adc, &cfg.pot);
    info!(
        "Potentiometer {} on ADS1115 0x{:02x} A{}",
        cfg.pot.name, cfg.pot.i2c_address, cfg.pot.channel
    );

    Ok(Peripherals { leds, button, pot })
}
