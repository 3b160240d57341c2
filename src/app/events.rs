//! Outbound application events.
//!
//! The [`BlinkService`](super::service::BlinkService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. The log sink prints
//! them; tests record them.

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service started and synchronised every LED.
    Started { rate_secs: f32, selected: usize },

    /// The dial now controls a different LED.
    SelectionChanged { selected: usize },

    /// One LED got a new rate from the dial.
    LedRateChanged { index: usize, rate_secs: f32 },

    /// Every LED was set to the same rate and restarted in phase.
    AllSynced { rate_secs: f32 },

    /// Every LED was turned off.
    Stopped,
}
