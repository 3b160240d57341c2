//! System configuration parameters
//!
//! All tunable parameters for blinkpace: which concurrency strategy runs,
//! which pins the peripherals sit on, and how fast everything is polled.
//! Values can be overridden from a JSON file (see
//! [`JsonConfigFile`](crate::adapters::config_file::JsonConfigFile)) and
//! from the command line.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;
use crate::strategies::Strategy;

/// Topic segment reserved for the "every LED" pub-sub topic.
pub const RESERVED_LED_NAME: &str = "ALL";

/// Longest blink half-period accepted from a config, in seconds.
pub const MAX_RATE_SECS: f32 = 3600.0;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemConfig {
    /// Concurrency strategy coordinating the peripherals.
    pub strategy: Strategy,
    /// LEDs, in the order the button cycles through them.
    pub leds: Vec<LedConfig>,
    pub button: ButtonConfig,
    pub pot: PotConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedConfig {
    /// Name used in logs and as the pub-sub topic suffix (`LED.<name>`).
    pub name: String,
    /// BCM GPIO number.
    pub gpio: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ButtonConfig {
    pub name: String,
    pub gpio: u8,
    /// How long the button must stay down before a hold is reported.
    pub hold_ms: u64,
    /// A raw level must be stable this long before it is accepted.
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PotConfig {
    pub name: String,
    /// 7-bit I2C address of the ADS1115.
    pub i2c_address: u8,
    /// Single-ended ADC input (0..=3).
    pub channel: u8,
    /// Blink rate (seconds) at full counter-clockwise.
    pub min_rate_secs: f32,
    /// Blink rate (seconds) at full clockwise.
    pub max_rate_secs: f32,
    /// Wiper voltage at full counter-clockwise.
    pub min_volts: f32,
    /// Wiper voltage at full clockwise.
    pub max_volts: f32,
    /// Trimmed off both ends of the voltage span so the extremes are reachable.
    pub edge_adjust_volts: f32,
    /// How often the dial is sampled by its own thread/task.
    pub poll_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Sleep between iterations of the busy-poll event loop, and the
    /// sampling period of the button thread/task.
    pub loop_sleep_ms: u64,
    /// Sleep slice used by LED worker threads and LED tasks.
    pub led_slice_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::EventLoop,
            leds: vec![
                LedConfig {
                    name: "MyLED".to_string(),
                    gpio: pins::LED_A_GPIO,
                },
                LedConfig {
                    name: "MyOtherLED".to_string(),
                    gpio: pins::LED_B_GPIO,
                },
            ],
            button: ButtonConfig::default(),
            pot: PotConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            name: "MyButton".to_string(),
            gpio: pins::BUTTON_GPIO,
            hold_ms: 500,
            debounce_ms: 10,
        }
    }
}

impl Default for PotConfig {
    fn default() -> Self {
        Self {
            name: "MyPOT".to_string(),
            i2c_address: pins::ADS1115_I2C_ADDRESS,
            channel: pins::POT_ADC_CHANNEL,
            min_rate_secs: 0.0,
            max_rate_secs: 5.0,
            min_volts: 0.0,
            max_volts: pins::POT_SUPPLY_VOLTS,
            edge_adjust_volts: 0.001,
            poll_ms: 50,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            loop_sleep_ms: 10,
            led_slice_ms: 10,
        }
    }
}

impl PotConfig {
    /// Voltage span actually mapped onto the rate range.
    pub fn volt_span(&self) -> (f32, f32) {
        (
            self.min_volts + self.edge_adjust_volts,
            self.max_volts - self.edge_adjust_volts,
        )
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leds.is_empty() {
            return Err(ConfigError::ValidationFailed("at least one LED is required"));
        }
        for (i, led) in self.leds.iter().enumerate() {
            if led.name.is_empty() || led.name.contains('.') {
                return Err(ConfigError::ValidationFailed(
                    "LED names must be non-empty and contain no '.'",
                ));
            }
            if led.name == RESERVED_LED_NAME {
                return Err(ConfigError::ValidationFailed("LED name 'ALL' is reserved"));
            }
            if self.leds[..i].iter().any(|l| l.name == led.name) {
                return Err(ConfigError::ValidationFailed("LED names must be unique"));
            }
            if self.leds[..i].iter().any(|l| l.gpio == led.gpio) || led.gpio == self.button.gpio {
                return Err(ConfigError::ValidationFailed("GPIO assigned twice"));
            }
        }
        if self.button.name.is_empty() || self.pot.name.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "button and potentiometer need a name",
            ));
        }
        if self.button.hold_ms <= self.button.debounce_ms {
            return Err(ConfigError::ValidationFailed(
                "button.hold_ms must exceed button.debounce_ms",
            ));
        }
        if self.pot.channel > 3 {
            return Err(ConfigError::ValidationFailed("pot.channel must be 0–3"));
        }
        if !(self.pot.min_rate_secs >= 0.0 && self.pot.min_rate_secs < self.pot.max_rate_secs) {
            return Err(ConfigError::ValidationFailed(
                "pot rate range must satisfy 0 <= min < max",
            ));
        }
        if !(self.pot.max_rate_secs <= MAX_RATE_SECS) {
            return Err(ConfigError::ValidationFailed(
                "pot.max_rate_secs must be finite and at most 3600",
            ));
        }
        let (lo, hi) = self.pot.volt_span();
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(ConfigError::ValidationFailed("pot voltages must be finite"));
        }
        if !(lo < hi) {
            return Err(ConfigError::ValidationFailed(
                "pot voltage span is empty after edge adjustment",
            ));
        }
        if self.pot.poll_ms == 0 || self.timing.loop_sleep_ms == 0 || self.timing.led_slice_ms == 0
        {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        Ok(())
    }
}
