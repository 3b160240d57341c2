//! Pub-sub wiring: LED subscriptions on a real bus drive threaded LEDs.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use blinkpace::app::ports::LedPort;
use blinkpace::bus::{Bus, Message};
use blinkpace::drivers::threaded_led::{ThreadedLed, ThreadedLedBank};
use blinkpace::strategies::pubsub::{BusLedPort, subscribe_leds};

use super::mock_hw::SimLed;

const SLICE: Duration = Duration::from_millis(2);

fn wired() -> (Arc<Bus>, Arc<Mutex<ThreadedLedBank<SimLed>>>, [SimLed; 2]) {
    let pins = [SimLed::new(), SimLed::new()];
    let bank = Arc::new(Mutex::new(ThreadedLedBank::new(vec![
        ThreadedLed::new(pins[0].clone(), "MyLED", 13, SLICE),
        ThreadedLed::new(pins[1].clone(), "MyOtherLED", 19, SLICE),
    ])));
    let bus = Arc::new(Bus::new());
    subscribe_leds(&bus, &bank);
    (bus, bank, pins)
}

#[test]
fn led_topic_reaches_only_that_led() {
    let (bus, bank, pins) = wired();

    assert_eq!(bus.publish("LED.MyOtherLED", &Message::Rate(5.0)), 1);
    thread::sleep(Duration::from_millis(30));
    assert!(!pins[0].is_lit());
    assert!(pins[1].is_lit());

    bank.lock().unwrap().stop_all();
    assert!(!pins[1].is_lit());
}

#[test]
fn all_topic_restarts_every_led() {
    let (bus, bank, pins) = wired();
    bus.publish("LED.MyLED", &Message::Rate(5.0));
    thread::sleep(Duration::from_millis(30));

    bus.publish("LED.ALL", &Message::Rate(5.0));
    thread::sleep(Duration::from_millis(30));
    assert!(pins[0].is_lit() && pins[1].is_lit());

    bus.publish("LED.ALL", &Message::Rate(0.0));
    assert!(!pins[0].is_lit() && !pins[1].is_lit());
    assert!(bank.lock().unwrap().leds().iter().all(|l| !l.is_blinking()));
}

#[test]
fn bus_led_port_publishes_to_led_topics() {
    let (bus, bank, pins) = wired();
    let mut port = BusLedPort::new(
        Arc::clone(&bus),
        &["MyLED".to_string(), "MyOtherLED".to_string()],
    );
    assert_eq!(port.led_count(), 2);

    port.set_rate(0, 5.0);
    thread::sleep(Duration::from_millis(30));
    assert!(pins[0].is_lit() && !pins[1].is_lit());

    port.set_rate_all(0.0);
    assert!(!pins[0].is_lit());

    // Out-of-range index publishes nothing.
    port.set_rate(7, 5.0);
    thread::sleep(Duration::from_millis(20));
    assert!(!pins[0].is_lit() && !pins[1].is_lit());
    bank.lock().unwrap().stop_all();
}

#[test]
fn non_rate_messages_are_ignored_by_leds() {
    let (bus, bank, pins) = wired();
    bus.publish(
        "LED.MyLED",
        &Message::Pot {
            name: "MyPOT".into(),
            value: 1.0,
        },
    );
    thread::sleep(Duration::from_millis(20));
    assert!(!pins[0].is_lit());
    bank.lock().unwrap().stop_all();
}
