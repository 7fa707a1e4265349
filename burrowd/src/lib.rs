//! # Burrow Host Daemon
//!
//! Library behind the `burrowd` binary: boots a simulated kernel, loads the
//! stock modules, and drives one end-to-end exercise of the pseudo device
//! (write, seek back, read, verify).

pub mod runtime;

pub use runtime::{RunReport, Runtime, RuntimeConfig, RuntimeError};
