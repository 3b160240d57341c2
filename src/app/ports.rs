//! Port traits: the boundary between the rate controller and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BlinkService (domain)
//! ```
//!
//! Driven adapters (LED banks, the ADC, clocks, event sinks, config files)
//! implement these traits. The [`BlinkService`](super::service::BlinkService)
//! and the peripheral drivers consume them via generics, so none of the
//! coordination logic touches hardware directly and every strategy can be
//! exercised against in-memory mocks.

use crate::config::SystemConfig;
use crate::error::Error;

// ───────────────────────────────────────────────────────────────
// LED port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the service calls this to change blink rates.
///
/// Each strategy supplies its own implementation: a polled bank, a bank
/// of worker threads, or a publisher onto the pub-sub bus.
pub trait LedPort {
    /// Number of LEDs the button cycles through.
    fn led_count(&self) -> usize;

    /// Set one LED's half-period in seconds. A rate `<= 0` turns it off.
    fn set_rate(&mut self, index: usize, rate_secs: f32);

    /// Set every LED to `rate_secs` so they all blink in phase.
    fn set_rate_all(&mut self, rate_secs: f32);
}

// ───────────────────────────────────────────────────────────────
// Analog input port (driven adapter: ADC → domain)
// ───────────────────────────────────────────────────────────────

/// One analog channel, read as a voltage.
pub trait AnalogInput {
    fn voltage(&mut self) -> Result<f32, Error>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds. Drivers take timestamps from this rather than
/// reading the system clock so tests can step time by hand.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting. Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration. Returns [`SystemConfig::default()`] if no stored
    /// config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The stored config could not be parsed.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError(std::io::Error),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}
