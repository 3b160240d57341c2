//! Application core: pure coordination logic, zero I/O.
//!
//! Decides what happens when the button is pressed or held and when the
//! dial moves: which LED the dial controls and when all LEDs are
//! resynchronised. All interaction with hardware happens through **port
//! traits** defined in [`ports`], which is what lets the four strategies
//! share this logic unchanged.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
