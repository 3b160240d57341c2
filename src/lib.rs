//! blinkpace library.
//!
//! One button, one potentiometer and a bank of blinking LEDs, coordinated
//! by any of four interchangeable concurrency strategies. Everything below
//! the [`adapters::hardware`] module is written against `embedded-hal`
//! traits and the crate's own ports, so it runs against in-memory mocks on
//! any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bus;
pub mod config;
pub mod drivers;
pub mod error;
pub mod logging;
pub mod pins;
pub mod strategies;
