//! BlinkService driven end to end: button and dial commands in, LED rates
//! and events out, against recording ports and against a real polled bank.

use std::cell::Cell;

use blinkpace::app::commands::AppCommand;
use blinkpace::app::events::AppEvent;
use blinkpace::app::ports::Clock;
use blinkpace::app::service::BlinkService;
use blinkpace::drivers::button::ButtonEvent;
use blinkpace::drivers::led::{PolledLed, PolledLedBank};

use super::mock_hw::{LedCall, RecordingLeds, RecordingSink, SimLed};

const PRESS: AppCommand = AppCommand::Button(ButtonEvent::Pressed);
const HOLD: AppCommand = AppCommand::Button(ButtonEvent::Hold);
const RELEASE: AppCommand = AppCommand::Button(ButtonEvent::Released);

#[test]
fn full_session_over_three_leds() {
    let mut svc = BlinkService::new();
    let mut leds = RecordingLeds::new(3);
    let mut sink = RecordingSink::default();

    svc.start(1.0, &mut leds, &mut sink);
    svc.handle_command(AppCommand::PotChanged(0.4), &mut leds, &mut sink);
    svc.handle_command(PRESS, &mut leds, &mut sink);
    svc.handle_command(RELEASE, &mut leds, &mut sink);
    svc.handle_command(AppCommand::PotChanged(2.0), &mut leds, &mut sink);
    svc.handle_command(PRESS, &mut leds, &mut sink);
    svc.handle_command(PRESS, &mut leds, &mut sink);
    svc.handle_command(HOLD, &mut leds, &mut sink);
    svc.handle_command(RELEASE, &mut leds, &mut sink);
    svc.stop(&mut leds, &mut sink);

    assert_eq!(
        leds.calls,
        vec![
            LedCall::All(1.0),
            LedCall::One(0, 0.4),
            LedCall::One(1, 2.0),
            LedCall::All(2.0),
            LedCall::All(0.0),
        ]
    );
    assert_eq!(svc.selected(), 0, "two more presses wrap 1 -> 2 -> 0");
    assert_eq!(sink.events.first(), Some(&AppEvent::Started { rate_secs: 1.0, selected: 0 }));
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| matches!(e, AppEvent::SelectionChanged { .. }))
            .count(),
        3
    );
}

#[test]
fn single_led_selection_stays_put() {
    let mut svc = BlinkService::new();
    let mut leds = RecordingLeds::new(1);
    let mut sink = RecordingSink::default();
    svc.start(0.5, &mut leds, &mut sink);
    svc.handle_command(PRESS, &mut leds, &mut sink);
    svc.handle_command(AppCommand::PotChanged(3.0), &mut leds, &mut sink);
    assert_eq!(svc.selected(), 0);
    assert_eq!(leds.calls.last(), Some(&LedCall::One(0, 3.0)));
}

struct StepClock(Cell<u64>);

impl Clock for &StepClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

#[test]
fn hold_brings_polled_leds_into_phase() {
    let clock = StepClock(Cell::new(0));
    let pins = [SimLed::new(), SimLed::new()];
    let mut bank = PolledLedBank::new(
        vec![
            PolledLed::new(pins[0].clone(), "MyLED", 13),
            PolledLed::new(pins[1].clone(), "MyOtherLED", 19),
        ],
        &clock,
    );
    let mut svc = BlinkService::new();
    let mut sink = RecordingSink::default();

    svc.start(0.2, &mut bank, &mut sink);
    // Knock LED 0 out of phase with a different rate.
    clock.0.set(50);
    svc.handle_command(AppCommand::PotChanged(0.3), &mut bank, &mut sink);
    for t in (60..=700).step_by(10) {
        clock.0.set(t);
        bank.poll_all();
    }

    svc.handle_command(HOLD, &mut bank, &mut sink);
    for t in (710..=3000).step_by(10) {
        clock.0.set(t);
        bank.poll_all();
        assert_eq!(pins[0].is_lit(), pins[1].is_lit(), "out of phase at {t} ms");
    }
    assert!(pins[0].toggles() > 5);
}
