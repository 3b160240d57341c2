//! Unified error types for blinkpace.
//!
//! A single `Error` enum that the peripheral drivers and strategies convert
//! into. Drivers log it and carry on; a strategy returns it only when it
//! cannot start. Config failures use
//! [`ConfigError`](crate::app::ports::ConfigError) instead.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible peripheral operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor (button pin, ADC) could not be read.
    Sensor(SensorError),
    /// An actuator (LED pin) command failed.
    Actuator(ActuatorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C transfer to the ADC failed (lost communication).
    AdcBusFailed,
    /// The ADC never reported conversion complete.
    AdcTimeout,
    /// GPIO read returned an error.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcBusFailed => write!(f, "ADC I2C transfer failed"),
            Self::AdcTimeout => write!(f, "ADC conversion timed out"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
    /// The LED worker thread panicked and its pin was lost.
    WorkerLost,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::WorkerLost => write!(f, "LED worker thread lost"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
