//! # Modules
//!
//! The loadable modules shipped with Burrow:
//!
//! - [`HelloModule`]: logs one line at load and one at unload, nothing else.
//! - [`PseudoModule`]: registers [`PseudoDevice`], a single-instance
//!   character device backed by a fixed 512-byte in-memory buffer with
//!   offset-validated read, write and seek.

pub mod hello;
pub mod pseudo;

pub use hello::HelloModule;
pub use pseudo::{PseudoDevice, PseudoModule, DEV_MEM_SIZE, PSEUDO_CLASS, PSEUDO_NODE};
