//! Cooperative scheduling on one thread.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │  futures_lite::future::block_on                          │
//!  │  ┌────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                      │  │
//!  │  │   led task × N ── poll_one · Timer(led_slice)      │  │
//!  │  │   button task ─┐                                   │  │
//!  │  │   pot task ────┴─▶ Channel<AppCommand> ─▶ control  │  │
//!  │  └────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every task yields at an `async-io-mini` timer, so nothing ever blocks
//! the thread. State is shared through `Rc<RefCell<_>>`; borrows are never
//! held across an `.await`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_io_mini::Timer;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::digital::{InputPin, StatefulOutputPin};
use log::info;

use super::Peripherals;
use crate::adapters::log_sink::LogEventSink;
use crate::adapters::time::MonotonicClock;
use crate::app::commands::AppCommand;
use crate::app::ports::{AnalogInput, Clock};
use crate::app::service::BlinkService;
use crate::config::SystemConfig;
use crate::drivers::button::ButtonDriver;
use crate::drivers::led::{PolledLed, PolledLedBank};
use crate::drivers::pot::Potentiometer;
use crate::error::Result;

/// Commands waiting for the controller task.
const COMMAND_DEPTH: usize = 8;

type Commands = Channel<NoopRawMutex, AppCommand, COMMAND_DEPTH>;
type SharedBank<L> = Rc<RefCell<PolledLedBank<L, MonotonicClock>>>;

async fn led_task<L: StatefulOutputPin>(bank: SharedBank<L>, index: usize, slice: Duration) {
    loop {
        bank.borrow_mut().poll_one(index);
        Timer::after(slice).await;
    }
}

async fn button_task<B: InputPin>(
    mut button: ButtonDriver<B>,
    clock: MonotonicClock,
    commands: &Commands,
    period: Duration,
) {
    loop {
        if let Some(event) = button.tick(clock.now_ms()) {
            commands.send(AppCommand::Button(event)).await;
        }
        Timer::after(period).await;
    }
}

async fn pot_task<A: AnalogInput>(mut pot: Potentiometer<A>, commands: &Commands, period: Duration) {
    loop {
        if let Some(rate) = pot.poll() {
            commands.send(AppCommand::PotChanged(rate)).await;
        }
        Timer::after(period).await;
    }
}

async fn control_task<L: StatefulOutputPin>(
    service: Rc<RefCell<BlinkService>>,
    bank: SharedBank<L>,
    commands: &Commands,
) {
    let mut sink = LogEventSink::new();
    loop {
        let cmd = commands.receive().await;
        service
            .borrow_mut()
            .handle_command(cmd, &mut *bank.borrow_mut(), &mut sink);
    }
}

pub fn run<L, B, A>(
    peripherals: Peripherals<L, B, A>,
    config: &SystemConfig,
    shutdown: &AtomicBool,
) -> Result<()>
where
    L: StatefulOutputPin,
    B: InputPin,
    A: AnalogInput,
{
    let Peripherals { leds, button, pot } = peripherals;

    let clock = MonotonicClock::new();
    let led_count = leds.len();
    let bank: SharedBank<L> = Rc::new(RefCell::new(PolledLedBank::new(
        leds.into_iter()
            .map(|l| PolledLed::new(l.pin, l.name, l.gpio))
            .collect(),
        clock,
    )));
    let service = Rc::new(RefCell::new(BlinkService::new()));
    let mut sink = LogEventSink::new();
    let commands = Commands::new();

    service
        .borrow_mut()
        .start(pot.value(), &mut *bank.borrow_mut(), &mut sink);

    let led_slice = Duration::from_millis(config.timing.led_slice_ms);
    let loop_sleep = Duration::from_millis(config.timing.loop_sleep_ms);
    let pot_period = Duration::from_millis(config.pot.poll_ms);

    {
        let executor: edge_executor::LocalExecutor<'_, 64> = edge_executor::LocalExecutor::new();

        for index in 0..led_count {
            executor
                .spawn(led_task(Rc::clone(&bank), index, led_slice))
                .detach();
        }
        executor
            .spawn(button_task(button, clock, &commands, loop_sleep))
            .detach();
        executor
            .spawn(pot_task(pot, &commands, pot_period))
            .detach();
        executor
            .spawn(control_task(Rc::clone(&service), Rc::clone(&bank), &commands))
            .detach();

        info!("Cooperative: {} task(s) scheduled", led_count + 3);

        futures_lite::future::block_on(executor.run(async {
            while !shutdown.load(Ordering::Acquire) {
                Timer::after(loop_sleep).await;
            }
        }));
    }

    info!("Cooperative: shutdown requested");
    service
        .borrow_mut()
        .stop(&mut *bank.borrow_mut(), &mut sink);
    bank.borrow_mut().all_off();
    Ok(())
}
