//! # Core Types
//!
//! This crate defines the fundamental types used throughout Burrow.
//!
//! ## Philosophy
//!
//! Core types are designed with these principles:
//! - **Explicit over implicit**: Identifiers are typed and cannot be confused.
//! - **Type safety first**: The type system prevents misuse at compile time.
//!
//! ## Key Types
//!
//! - [`ModuleId`]: Unique identifier for a loaded module
//! - [`SessionId`]: Unique identifier for an open-to-release device session
//! - [`ClassId`]: Unique identifier for a device class
//! - [`DeviceNumber`]: A (major, minor) device number

pub mod devnum;
pub mod ids;

pub use devnum::DeviceNumber;
pub use ids::{ClassId, ModuleId, SessionId};
