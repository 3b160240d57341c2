//! Adapters: concrete implementations of the port traits, plus the
//! process-level plumbing the binary needs.
//!
//! | Adapter       | Implements   | Connects to                    |
//! |---------------|--------------|--------------------------------|
//! | `config_file` | ConfigPort   | JSON file on disk              |
//! | `hardware`    | -            | rppal GPIO + I2C (feature rpi) |
//! | `log_sink`    | EventSink    | `log` facade                   |
//! | `signals`     | -            | SIGINT / SIGTERM               |
//! | `time`        | Clock        | `std::time::Instant`           |

pub mod config_file;
#[cfg(feature = "rpi")]
pub mod hardware;
pub mod log_sink;
pub mod signals;
pub mod time;
