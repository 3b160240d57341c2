//! Potentiometer mapped onto a blink-rate range.
//!
//! The wiper voltage comes from any [`AnalogInput`] (an ADS1115 channel on
//! the Pi). Voltages are mapped linearly from the trimmed voltage span onto
//! `[min_rate_secs, max_rate_secs]`, clamped, and rounded to one decimal so
//! ADC noise in the second decimal does not register as a dial movement.

use core::fmt;

use log::{debug, error};

use crate::app::ports::AnalogInput;
use crate::config::PotConfig;

/// Map `v` from `[in_min, in_max]` onto `[out_min, out_max]`, clamping the
/// result to the output range.
pub fn map_value(v: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let mapped = (v - in_min) * (out_max - out_min) / (in_max - in_min) + out_min;
    mapped.min(out_max).max(out_min)
}

/// Round to one decimal place.
pub fn round_tenth(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

pub struct Potentiometer<A> {
    input: A,
    name: String,
    volt_min: f32,
    volt_max: f32,
    rate_min: f32,
    rate_max: f32,
    last_value: f32,
}

impl<A: AnalogInput> Potentiometer<A> {
    /// Wrap an analog input and take a first reading. If that reading fails
    /// the dial starts at the bottom of the rate range.
    pub fn new(input: A, cfg: &PotConfig) -> Self {
        let (volt_min, volt_max) = cfg.volt_span();
        let mut pot = Self {
            input,
            name: cfg.name.clone(),
            volt_min,
            volt_max,
            rate_min: cfg.min_rate_secs,
            rate_max: cfg.max_rate_secs,
            last_value: cfg.min_rate_secs,
        };
        pot.last_value = pot.read();
        pot
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last value reported by [`read`](Self::read) or [`poll`](Self::poll).
    pub fn value(&self) -> f32 {
        self.last_value
    }

    /// Current mapped value. A failed ADC read is logged and the previous
    /// value returned.
    pub fn read(&mut self) -> f32 {
        match self.input.voltage() {
            Ok(volts) => round_tenth(map_value(
                volts,
                self.volt_min,
                self.volt_max,
                self.rate_min,
                self.rate_max,
            )),
            Err(e) => {
                error!("Potentiometer {}: {}", self.name, e);
                self.last_value
            }
        }
    }

    /// Read and report the value only if it moved since the last report.
    #[allow(clippy::float_cmp)]
    pub fn poll(&mut self) -> Option<f32> {
        let current = self.read();
        if current == self.last_value {
            return None;
        }
        debug!("Potentiometer {} has mapped value of {}", self.name, current);
        self.last_value = current;
        Some(current)
    }
}

impl<A> fmt::Display for Potentiometer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Potentiometer {} has mapped value of {}",
            self.name, self.last_value
        )
    }
}
