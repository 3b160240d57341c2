//! Publish/subscribe strategy.
//!
//! Producers and consumers only know topic names:
//!
//! ```text
//!  button thread ── BUTTON.<name> ───────┐
//!  pot thread ───── Potentiometer.<name> ┼─▶ application ─┐
//!                                        │                │
//!      LED.<name> / LED.ALL ◀────────────┴────────────────┘
//!            │
//!            ▼
//!      ThreadedLed workers
//! ```
//!
//! The application subscribes to the `BUTTON` and `Potentiometer` roots and
//! runs the shared [`BlinkService`] against a [`LedPort`] that publishes
//! rates instead of touching LEDs.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use embedded_hal::digital::{InputPin, StatefulOutputPin};
use log::{debug, error, info};

use super::samplers::run_samplers;
use super::{Peripherals, lock};
use crate::adapters::log_sink::LogEventSink;
use crate::app::commands::AppCommand;
use crate::app::ports::{AnalogInput, LedPort};
use crate::app::service::BlinkService;
use crate::bus::{
    Bus, Message, SubscriptionId, TOPIC_BUTTON_ROOT, TOPIC_LED_ROOT, TOPIC_POT_ROOT, topic,
};
use crate::config::{RESERVED_LED_NAME, SystemConfig};
use crate::drivers::threaded_led::{ThreadedLed, ThreadedLedBank};
use crate::error::{Error, Result};

/// [`LedPort`] that turns rate changes into `LED.*` messages.
pub struct BusLedPort {
    bus: Arc<Bus>,
    /// `LED.<name>` per LED, in button-cycling order.
    topics: Vec<String>,
    all_topic: String,
}

impl BusLedPort {
    pub fn new(bus: Arc<Bus>, led_names: &[String]) -> Self {
        Self {
            bus,
            topics: led_names
                .iter()
                .map(|name| topic(TOPIC_LED_ROOT, name))
                .collect(),
            all_topic: topic(TOPIC_LED_ROOT, RESERVED_LED_NAME),
        }
    }
}

impl LedPort for BusLedPort {
    fn led_count(&self) -> usize {
        self.topics.len()
    }

    fn set_rate(&mut self, index: usize, rate_secs: f32) {
        if let Some(t) = self.topics.get(index) {
            debug!("Changing LED #{} rate to {} using the topic {}", index, rate_secs, t);
            self.bus.publish(t, &Message::Rate(rate_secs));
        }
    }

    fn set_rate_all(&mut self, rate_secs: f32) {
        debug!("Changing rate for all LEDs to {}", rate_secs);
        self.bus.publish(&self.all_topic, &Message::Rate(rate_secs));
    }
}

struct App {
    service: BlinkService,
    port: BusLedPort,
    sink: LogEventSink,
}

impl App {
    fn apply(&mut self, cmd: AppCommand) {
        self.service.handle_command(cmd, &mut self.port, &mut self.sink);
    }
}

/// Subscribe every LED in `bank` to its own topic, and the bank as a whole
/// to `LED.ALL` so a sync stops every worker before restarting any.
pub fn subscribe_leds<P>(bus: &Bus, bank: &Arc<Mutex<ThreadedLedBank<P>>>) -> Vec<SubscriptionId>
where
    P: StatefulOutputPin + Send + 'static,
{
    let names: Vec<String> = lock(bank).leds().iter().map(|l| l.name().to_string()).collect();
    let mut ids = Vec::with_capacity(names.len() + 1);

    for (index, name) in names.iter().enumerate() {
        let bank = Arc::clone(bank);
        ids.push(bus.subscribe(topic(TOPIC_LED_ROOT, name), move |_: &str, msg: &Message| {
            if let Message::Rate(rate) = msg {
                lock(&bank).set_rate(index, *rate);
            }
        }));
    }

    let bank = Arc::clone(bank);
    ids.push(bus.subscribe(
        topic(TOPIC_LED_ROOT, RESERVED_LED_NAME),
        move |_: &str, msg: &Message| {
            if let Message::Rate(rate) = msg {
                lock(&bank).set_rate_all(*rate);
            }
        },
    ));
    ids
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
    let bus = Arc::new(Bus::new());

    let slice = Duration::from_millis(config.timing.led_slice_ms);
    let names: Vec<String> = leds.iter().map(|l| l.name.clone()).collect();
    let bank = Arc::new(Mutex::new(ThreadedLedBank::new(
        leds.into_iter()
            .map(|l| ThreadedLed::new(l.pin, l.name, l.gpio, slice))
            .collect(),
    )));
    let mut subscriptions = subscribe_leds(&bus, &bank);

    let app = Arc::new(Mutex::new(App {
        service: BlinkService::new(),
        port: BusLedPort::new(Arc::clone(&bus), &names),
        sink: LogEventSink::new(),
    }));

    {
        let app = Arc::clone(&app);
        subscriptions.push(bus.subscribe(TOPIC_BUTTON_ROOT, move |_: &str, msg: &Message| {
            if let Message::Button { state, .. } = msg {
                lock(&app).apply(AppCommand::Button(*state));
            }
        }));
    }
    {
        let app = Arc::clone(&app);
        subscriptions.push(bus.subscribe(TOPIC_POT_ROOT, move |_: &str, msg: &Message| {
            if let Message::Pot { value, .. } = msg {
                lock(&app).apply(AppCommand::PotChanged(*value));
            }
        }));
    }

    {
        let mut guard = lock(&app);
        let App {
            service,
            port,
            sink,
        } = &mut *guard;
        service.start(pot.value(), port, sink);
    }

    let button_name = config.button.name.clone();
    let button_topic = topic(TOPIC_BUTTON_ROOT, &button_name);
    let pot_name = pot.name().to_string();
    let pot_topic = topic(TOPIC_POT_ROOT, &pot_name);

    let outcome = run_samplers(
        button,
        pot,
        config,
        shutdown,
        |state| {
            bus.publish(
                &button_topic,
                &Message::Button {
                    name: button_name.clone(),
                    state,
                },
            );
        },
        |value| {
            bus.publish(
                &pot_topic,
                &Message::Pot {
                    name: pot_name.clone(),
                    value,
                },
            );
        },
    );
    info!("Pub-sub: shutdown requested");

    {
        let mut guard = lock(&app);
        let App {
            service,
            port,
            sink,
        } = &mut *guard;
        service.stop(port, sink);
    }

    // Handlers hold the app, and the app holds the bus.
    for id in subscriptions {
        bus.unsubscribe(id);
    }
    lock(&bank).stop_all();

    outcome.map_err(|e| {
        error!("Pub-sub: could not start peripheral thread: {}", e);
        Error::Init("peripheral thread spawn failed")
    })
}
