//! Device Integration Test Utilities
//!
//! This crate provides shared bootstrap helpers for the end-to-end device
//! tests.
//!
//! ## Test Philosophy
//!
//! - **Through the front door**: Tests exercise the host entry points
//!   (`open`/`read`/`write`/`lseek`/`close`), not device internals
//! - **Deterministic faults**: Boundary failures are injected via
//!   `sim_kernel::fault_injection`
//! - **Observable side effects**: Logging-only operations are asserted
//!   through the kernel log

use core_types::ModuleId;
use modules::{HelloModule, PseudoModule};
use sim_kernel::SimulatedKernel;

/// Boots a kernel with the pseudo module loaded
pub fn boot_with_pseudo() -> (SimulatedKernel, ModuleId) {
    let mut kernel = SimulatedKernel::new();
    let pseudo = kernel
        .load_module(Box::new(PseudoModule::new()))
        .expect("pseudo module should load");
    (kernel, pseudo)
}

/// Boots a kernel with both stock modules loaded
pub fn boot_full() -> (SimulatedKernel, ModuleId, ModuleId) {
    let mut kernel = SimulatedKernel::new();
    let hello = kernel
        .load_module(Box::new(HelloModule::new()))
        .expect("hello module should load");
    let pseudo = kernel
        .load_module(Box::new(PseudoModule::new()))
        .expect("pseudo module should load");
    (kernel, hello, pseudo)
}
