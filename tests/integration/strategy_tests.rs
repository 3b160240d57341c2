//! Every strategy run against mock hardware: same scenarios, same results.
//!
//! The dial starts fully clockwise (5 s rate), so LEDs that are blinking
//! stay lit for the whole of each short scenario and "lit" vs "off" is a
//! stable thing to assert on.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use blinkpace::config::SystemConfig;
use blinkpace::error::Result;
use blinkpace::strategies::{self, Strategy};

use super::mock_hw::{Rig, fast_config, rig};

const FULL_CW_VOLTS: f32 = 3.286;
const FULL_CCW_VOLTS: f32 = 0.0;

const ALL: [Strategy; 4] = [
    Strategy::EventLoop,
    Strategy::Threads,
    Strategy::PubSub,
    Strategy::Async,
];

struct Running {
    rig: Rig,
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<Result<()>>,
}

impl Running {
    fn start(strategy: Strategy, cfg: SystemConfig) -> Self {
        let (peripherals, rig) = rig(&cfg, FULL_CW_VOLTS);
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || strategies::run(strategy, peripherals, &cfg, &flag));
        settle();
        Self {
            rig,
            shutdown,
            handle,
        }
    }

    fn lit(&self) -> Vec<bool> {
        self.rig.leds.iter().map(|l| l.is_lit()).collect()
    }

    fn stop(self) -> Rig {
        self.shutdown.store(true, Ordering::Release);
        let outcome = self.handle.join().expect("strategy thread panicked");
        assert!(outcome.is_ok(), "strategy returned {outcome:?}");
        self.rig
    }
}

fn settle() {
    thread::sleep(Duration::from_millis(80));
}

fn click(r: &Running) {
    r.rig.button.press();
    settle();
    r.rig.button.release();
    settle();
}

#[test]
fn start_lights_every_led_and_shutdown_turns_them_off() {
    for strategy in ALL {
        let running = Running::start(strategy, fast_config());
        assert_eq!(running.lit(), vec![true, true], "{strategy}: after start");

        let rig = running.stop();
        assert!(
            rig.leds.iter().all(|l| !l.is_lit()),
            "{strategy}: LEDs left on after shutdown"
        );
    }
}

#[test]
fn dial_controls_first_led_initially() {
    for strategy in ALL {
        let running = Running::start(strategy, fast_config());
        running.rig.dial.turn_to(FULL_CCW_VOLTS);
        settle();
        assert_eq!(running.lit(), vec![false, true], "{strategy}");
        running.stop();
    }
}

#[test]
fn press_moves_dial_to_next_led() {
    for strategy in ALL {
        let running = Running::start(strategy, fast_config());
        click(&running);
        running.rig.dial.turn_to(FULL_CCW_VOLTS);
        settle();
        assert_eq!(running.lit(), vec![true, false], "{strategy}");
        running.stop();
    }
}

#[test]
fn hold_syncs_every_led_to_last_dial_rate() {
    for strategy in ALL {
        let running = Running::start(strategy, fast_config());
        running.rig.dial.turn_to(FULL_CCW_VOLTS);
        settle();
        assert_eq!(running.lit(), vec![false, true], "{strategy}: before hold");

        running.rig.button.press();
        thread::sleep(Duration::from_millis(350));
        running.rig.button.release();
        settle();
        assert_eq!(running.lit(), vec![false, false], "{strategy}: after hold");
        running.stop();
    }
}

#[test]
fn lost_adc_keeps_last_rate() {
    for strategy in ALL {
        let running = Running::start(strategy, fast_config());
        running.rig.dial.disconnect();
        settle();
        assert_eq!(running.lit(), vec![true, true], "{strategy}");
        running.stop();
    }
}

#[test]
fn three_leds_cycle_and_wrap() {
    let mut cfg = fast_config();
    cfg.leds.push(blinkpace::config::LedConfig {
        name: "Third".into(),
        gpio: 26,
    });
    cfg.validate().unwrap();

    for strategy in ALL {
        let running = Running::start(strategy, cfg.clone());
        for _ in 0..3 {
            click(&running);
        }
        running.rig.dial.turn_to(FULL_CCW_VOLTS);
        settle();
        assert_eq!(running.lit(), vec![false, true, true], "{strategy}: wrapped to LED 0");
        running.stop();
    }
}
