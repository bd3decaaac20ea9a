//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no pigpio
//! daemon or broker required.

mod cycle_tests;
mod mock_hw;
mod override_tests;
mod runtime_tests;
