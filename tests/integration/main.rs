//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the in-memory hardware in `mock_hw`. All tests run on the host
//! with no real GPIO or I2C required.

mod bus_tests;
mod mock_hw;
mod service_tests;
mod strategy_tests;
