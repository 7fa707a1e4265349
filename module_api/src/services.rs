//! Kernel services available to modules
//!
//! The registration surface mirrors what a character-device module needs
//! from its host: a device-number region, a dispatch entry for the device, a
//! class, and a node callers can open. Each call has a teardown twin so a
//! module can unwind a partially completed `init` and empty itself at
//! `exit`.

use chardev::CharDevice;
use core_types::{ClassId, DeviceNumber};
use klog::LogHandle;
use thiserror::Error;

/// Errors returned by kernel registration services
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// No device-number region could be allocated
    #[error("device number space exhausted")]
    RegionExhausted,

    /// A device is already registered under this device number
    #[error("device number already registered: {0}")]
    DeviceNumberInUse(DeviceNumber),

    /// No device is registered under this device number
    #[error("no device registered under: {0}")]
    DeviceNotRegistered(DeviceNumber),

    /// A class with this name already exists
    #[error("class already exists: {0}")]
    ClassExists(String),

    /// The class handle does not name a live class
    #[error("unknown class")]
    ClassNotFound,

    /// A node with this name already exists
    #[error("device node already exists: {0}")]
    NodeExists(String),

    /// Module initialization failed for a module-specific reason
    #[error("module initialization failed: {0}")]
    InitFailed(String),
}

/// The capability surface the kernel hands to a module
///
/// Implemented by the host; modules see only this trait. Registration
/// transfers ownership of the device to the host's dispatch table, so a
/// module keeps handles (device numbers, class IDs) rather than devices.
pub trait KernelServices {
    /// Returns a handle to the kernel log
    fn log(&self) -> LogHandle;

    /// Allocates a fresh device-number region
    ///
    /// The region holds a single minor; `name` labels the region for
    /// diagnostics.
    ///
    /// # Errors
    /// Returns `ModuleError::RegionExhausted` when no majors remain.
    fn alloc_chrdev_region(&mut self, name: &str) -> Result<DeviceNumber, ModuleError>;

    /// Releases a device-number region
    ///
    /// Releasing an unknown region is a no-op.
    fn release_chrdev_region(&mut self, devnum: DeviceNumber);

    /// Registers a device under a device number
    ///
    /// The host dispatches file operations for `devnum` to `device` from
    /// now on.
    ///
    /// # Errors
    /// Returns `ModuleError::DeviceNumberInUse` if the number is taken.
    fn register_chardev(
        &mut self,
        devnum: DeviceNumber,
        device: Box<dyn CharDevice>,
    ) -> Result<(), ModuleError>;

    /// Removes a device from dispatch and drops it
    ///
    /// Unregistering an unknown device number is a no-op.
    fn unregister_chardev(&mut self, devnum: DeviceNumber);

    /// Creates a device class
    ///
    /// # Errors
    /// Returns `ModuleError::ClassExists` if the name is taken.
    fn create_class(&mut self, name: &str) -> Result<ClassId, ModuleError>;

    /// Destroys a device class
    ///
    /// Destroying an unknown class is a no-op.
    fn destroy_class(&mut self, class: ClassId);

    /// Creates a named node under a class, pointing at a device number
    ///
    /// The node name is what callers pass to the host's `open`.
    ///
    /// # Errors
    /// Returns `ModuleError::ClassNotFound` if the class is not live and
    /// `ModuleError::NodeExists` if the name is taken.
    fn create_device_node(
        &mut self,
        class: ClassId,
        devnum: DeviceNumber,
        name: &str,
    ) -> Result<(), ModuleError>;

    /// Removes the node pointing at a device number
    ///
    /// Removing a node for an unknown device number is a no-op.
    fn destroy_device_node(&mut self, devnum: DeviceNumber);
}
