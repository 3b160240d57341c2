//! Inbound commands to the application service.
//!
//! These are what the peripherals report. Every strategy translates its
//! own trigger mechanism (polling, worker thread, bus message, async task)
//! into one of these and hands it to
//! [`BlinkService::handle_command`](super::service::BlinkService::handle_command).

use crate::drivers::button::ButtonEvent;

/// Commands that peripheral units send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// The button changed state.
    Button(ButtonEvent),

    /// The dial settled on a new mapped rate (seconds).
    PotChanged(f32),
}
