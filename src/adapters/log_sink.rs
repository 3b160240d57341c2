//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one log
//! line, so a run reads like a narrative of what the operator did.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                rate_secs,
                selected,
            } => {
                info!(
                    "START | all LEDs at {} s | dial controls LED #{}",
                    rate_secs, selected
                );
            }
            AppEvent::SelectionChanged { selected } => {
                info!("SELECT | dial now controls LED #{}", selected);
            }
            AppEvent::LedRateChanged { index, rate_secs } => {
                info!("RATE | LED #{} -> {} s", index, rate_secs);
            }
            AppEvent::AllSynced { rate_secs } => {
                info!("SYNC | all LEDs -> {} s", rate_secs);
            }
            AppEvent::Stopped => {
                info!("STOP | all LEDs off");
            }
        }
    }
}
