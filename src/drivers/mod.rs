//! Peripheral drivers: LEDs, the push button, the potentiometer and the
//! ADC it sits behind.

pub mod ads1115;
pub mod button;
pub mod led;
pub mod pot;
pub mod threaded_led;

#[cfg(test)]
pub(crate) mod mock;
