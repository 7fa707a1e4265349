//! # Module API
//!
//! This crate defines the interface between loadable modules and the kernel.
//!
//! ## Philosophy
//!
//! The kernel provides **mechanisms**, not policies:
//! - Device-number region allocation (not device naming conventions)
//! - Device registration (not dispatch internals)
//! - Class and node creation (not a filesystem)
//!
//! ## Design Goals
//!
//! 1. **Testability**: The entire API can be simulated and tested
//! 2. **Explicitness**: Modules receive their kernel handle; nothing is
//!    ambient
//! 3. **Symmetry**: Every registration a module makes has a teardown twin it
//!    can call from `exit` or from a failed `init`

pub mod module;
pub mod services;

pub use module::{KernelModule, ModuleInfo};
pub use services::{KernelServices, ModuleError};
