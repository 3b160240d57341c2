//! Log output for the binary.
//!
//! Library code logs through the `log` facade; the binary installs a
//! `tracing-subscriber` formatter whose `tracing-log` bridge picks those
//! records up. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "blinkpace=info";
const VERBOSE_FILTER: &str = "blinkpace=debug,info";

pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_names(true)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
