//! SIGINT / SIGTERM handling.
//!
//! Both signals raise one shared flag that every strategy polls; the
//! strategy then turns its LEDs off and returns normally.

use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::debug;
use signal_hook::consts::{SIGINT, SIGTERM};

/// Register SIGINT and SIGTERM onto a fresh shutdown flag.
pub fn shutdown_flag() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    for sig in [SIGINT, SIGTERM] {
        signal_hook::flag::register(sig, Arc::clone(&flag))?;
        debug!("Signals: registered {}", sig);
    }
    Ok(flag)
}
