//! TI ADS1115 16-bit ADC, single-shot reads over I2C.
//!
//! ## Register map (subset)
//!
//! | Pointer | Register    |
//! |---------|-------------|
//! | `0x00`  | Conversion  |
//! | `0x01`  | Config      |
//!
//! Each read writes a config word that starts one single-ended conversion
//! at ±4.096 V full scale and 128 SPS with the comparator disabled, polls
//! the OS bit until the conversion completes, then reads the result.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::AnalogInput;
use crate::error::{Error, SensorError};

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

const CFG_OS_START: u16 = 0x8000;
const CFG_MUX_SINGLE: u16 = 0b100;
const CFG_PGA_4_096V: u16 = 0x0200;
const CFG_MODE_SINGLE: u16 = 0x0100;
const CFG_DR_128SPS: u16 = 0x0080;
const CFG_COMP_DISABLE: u16 = 0x0003;

/// Full-scale voltage for the configured gain.
const FULL_SCALE_VOLTS: f32 = 4.096;

/// A conversion at 128 SPS takes ~8 ms; give up well after that.
const MAX_READY_POLLS: u32 = 50;

/// Config word that starts a single-shot conversion on `channel` (0..=3).
pub fn config_word(channel: u8) -> u16 {
    CFG_OS_START
        | ((CFG_MUX_SINGLE | u16::from(channel & 0x03)) << 12)
        | CFG_PGA_4_096V
        | CFG_MODE_SINGLE
        | CFG_DR_128SPS
        | CFG_COMP_DISABLE
}

/// Scale a raw conversion result to volts.
pub fn raw_to_volts(raw: i16) -> f32 {
    f32::from(raw) * FULL_SCALE_VOLTS / 32768.0
}

pub struct Ads1115<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Ads1115<I, D> {
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Run one single-shot conversion and return the raw result.
    pub fn read_raw(&mut self, channel: u8) -> Result<i16, Error> {
        let [hi, lo] = config_word(channel).to_be_bytes();
        self.i2c
            .write(self.address, &[REG_CONFIG, hi, lo])
            .map_err(|e| self.bus_error(&e))?;

        let mut ready = false;
        for _ in 0..MAX_READY_POLLS {
            self.delay.delay_ms(1);
            let mut cfg = [0u8; 2];
            self.i2c
                .write_read(self.address, &[REG_CONFIG], &mut cfg)
                .map_err(|e| self.bus_error(&e))?;
            // OS reads back as 1 once the device is idle again.
            if cfg[0] & 0x80 != 0 {
                ready = true;
                break;
            }
        }
        if !ready {
            return Err(SensorError::AdcTimeout.into());
        }

        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_CONVERSION], &mut buf)
            .map_err(|e| self.bus_error(&e))?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Single-shot voltage on `channel`.
    pub fn read_volts(&mut self, channel: u8) -> Result<f32, Error> {
        self.read_raw(channel).map(raw_to_volts)
    }

    /// Bind this converter to one input.
    pub fn into_channel(self, channel: u8) -> Ads1115Channel<I, D> {
        Ads1115Channel { adc: self, channel }
    }

    fn bus_error<E: core::fmt::Debug>(&self, e: &E) -> Error {
        warn!("ADS1115 at 0x{:02x}: bus error: {:?}", self.address, e);
        SensorError::AdcBusFailed.into()
    }
}

/// One ADS1115 input, usable wherever an [`AnalogInput`] is expected.
pub struct Ads1115Channel<I, D> {
    adc: Ads1115<I, D>,
    channel: u8,
}

impl<I: I2c, D: DelayNs> AnalogInput for Ads1115Channel<I, D> {
    fn voltage(&mut self) -> Result<f32, Error> {
        self.adc.read_volts(self.channel)
    }
}
