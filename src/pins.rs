//! Reference wiring for the Raspberry Pi (BCM numbering).
//!
//! Single source of truth for the default config. Change a pin here and it
//! propagates to [`SystemConfig::default`](crate::config::SystemConfig).

// ---------------------------------------------------------------------------
// LEDs (via 200 Ω series resistors to GND)
// ---------------------------------------------------------------------------

/// First LED, the one the dial controls at startup.
pub const LED_A_GPIO: u8 = 13;
/// Second LED.
pub const LED_B_GPIO: u8 = 19;

// ---------------------------------------------------------------------------
// Push button
// ---------------------------------------------------------------------------

/// Momentary switch to GND. Internal pull-up, so the button is active LOW.
pub const BUTTON_GPIO: u8 = 21;

// ---------------------------------------------------------------------------
// Potentiometer (ADS1115 on I2C bus 1)
// ---------------------------------------------------------------------------

/// ADS1115 with ADDR tied to GND.
pub const ADS1115_I2C_ADDRESS: u8 = 0x48;
/// Wiper connected to A0.
pub const POT_ADC_CHANNEL: u8 = 0;
/// Supply rail of the potentiometer as measured on the reference board.
pub const POT_SUPPLY_VOLTS: f32 = 3.286;
