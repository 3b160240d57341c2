//! Button and dial sampling threads shared by the threaded strategies.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::InputPin;
use log::debug;

use super::sleep_sliced;
use crate::adapters::time::MonotonicClock;
use crate::app::ports::{AnalogInput, Clock};
use crate::config::SystemConfig;
use crate::drivers::button::{ButtonDriver, ButtonEvent};
use crate::drivers::pot::Potentiometer;

/// Sample the button every `loop_sleep_ms` and the dial every `poll_ms`,
/// each in its own thread, until `shutdown` is raised. Changes are handed
/// to the callbacks from the sampling threads.
///
/// Returns once both threads have finished.
pub(crate) fn run_samplers<B, A, FB, FP>(
    mut button: ButtonDriver<B>,
    mut pot: Potentiometer<A>,
    config: &SystemConfig,
    shutdown: &AtomicBool,
    on_button: FB,
    on_pot: FP,
) -> io::Result<()>
where
    B: InputPin + Send,
    A: AnalogInput + Send,
    FB: Fn(ButtonEvent) + Send,
    FP: Fn(f32) + Send,
{
    let loop_sleep = Duration::from_millis(config.timing.loop_sleep_ms);
    let pot_interval = Duration::from_millis(config.pot.poll_ms);
    let clock = MonotonicClock::new();

    // Raised once `shutdown` is seen, or if a thread fails to start.
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let done = &done;

        let spawned = thread::Builder::new()
            .name("button".into())
            .spawn_scoped(s, move || {
                while !done.load(Ordering::Acquire) {
                    if let Some(event) = button.tick(clock.now_ms()) {
                        on_button(event);
                    }
                    thread::sleep(loop_sleep);
                }
                debug!("Button thread finished");
            })
            .and_then(|_| {
                thread::Builder::new()
                    .name("potentiometer".into())
                    .spawn_scoped(s, move || {
                        while !done.load(Ordering::Acquire) {
                            if let Some(rate) = pot.poll() {
                                on_pot(rate);
                            }
                            sleep_sliced(pot_interval, loop_sleep, done);
                        }
                        debug!("Potentiometer thread finished");
                    })
            });

        if spawned.is_ok() {
            while !shutdown.load(Ordering::Acquire) {
                thread::sleep(loop_sleep);
            }
        }
        done.store(true, Ordering::Release);
        spawned.map(|_| ())
    })
}
