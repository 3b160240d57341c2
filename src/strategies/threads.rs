//! Thread per peripheral.
//!
//! Each LED blinks in its own worker thread ([`ThreadedLed`]); the button
//! and the dial each get a sampling thread. Both report to one controller
//! (service + LED bank) behind a mutex, which serialises their effects.
//!
//! ```text
//!  button thread ──┐                        ┌──▶ led-gpio13 worker
//!                  ├─▶ Mutex<Controller> ───┤
//!  pot thread ─────┘                        └──▶ led-gpio19 worker
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use embedded_hal::digital::{InputPin, StatefulOutputPin};
use log::{error, info};

use super::samplers::run_samplers;
use super::{Peripherals, lock};
use crate::adapters::log_sink::LogEventSink;
use crate::app::commands::AppCommand;
use crate::app::ports::AnalogInput;
use crate::app::service::BlinkService;
use crate::config::SystemConfig;
use crate::drivers::threaded_led::{ThreadedLed, ThreadedLedBank};
use crate::error::{Error, Result};

struct Controller<P: StatefulOutputPin + Send + 'static> {
    service: BlinkService,
    bank: ThreadedLedBank<P>,
    sink: LogEventSink,
}

impl<P: StatefulOutputPin + Send + 'static> Controller<P> {
    fn apply(&mut self, cmd: AppCommand) {
        self.service.handle_command(cmd, &mut self.bank, &mut self.sink);
    }
}

pub fn run<L, B, A>(
    peripherals: Peripherals<L, B, A>,
    config: &SystemConfig,
    shutdown: &AtomicBool,
) -> Result<()>
where
    L: StatefulOutputPin + Send + 'static,
    B: InputPin + Send,
    A: AnalogInput + Send,
{
    let Peripherals { leds, button, pot } = peripherals;

    let slice = Duration::from_millis(config.timing.led_slice_ms);
    let bank = ThreadedLedBank::new(
        leds.into_iter()
            .map(|l| ThreadedLed::new(l.pin, l.name, l.gpio, slice))
            .collect(),
    );
    let mut controller = Controller {
        service: BlinkService::new(),
        bank,
        sink: LogEventSink::new(),
    };
    controller
        .service
        .start(pot.value(), &mut controller.bank, &mut controller.sink);
    let controller = Mutex::new(controller);

    let outcome = run_samplers(
        button,
        pot,
        config,
        shutdown,
        |event| lock(&controller).apply(AppCommand::Button(event)),
        |rate| lock(&controller).apply(AppCommand::PotChanged(rate)),
    );
    info!("Threads: shutdown requested");

    let mut controller = controller
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    controller
        .service
        .stop(&mut controller.bank, &mut controller.sink);
    controller.bank.stop_all();

    outcome.map_err(|e| {
        error!("Threads: could not start peripheral thread: {}", e);
        Error::Init("peripheral thread spawn failed")
    })
}
