//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the boundary between devices and their callers.
//!
//! ## Philosophy
//!
//! **The platform's memory-transfer mechanism must be fully abstracted.**
//!
//! Devices copy bytes to and from caller-supplied memory through traits, so
//! core device logic never depends on how the platform actually moves bytes
//! across its protection boundary.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: All boundary transfers go through traits
//! 2. **Failure is explicit**: An inaccessible caller buffer is an error
//!    value, never a panic
//! 3. **Testable**: In-memory implementations run under `cargo test`

pub mod user_memory;

pub use user_memory::{SliceSource, TransferError, UserSink, UserSource, VecSink};
