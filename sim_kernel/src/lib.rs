//! # Simulated Kernel
//!
//! This crate provides a simulated host for modules and character devices.
//!
//! ## Purpose
//!
//! The simulated kernel allows testing module and device behavior without a
//! real operating system underneath:
//! - Runs under `cargo test`
//! - Deterministic (synchronous dispatch, no real concurrency)
//! - Inspectable (registration tables and open files are accessible)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! Driver code is usually hard to test because the host it plugs into is
//! not available at test time. This host is a full implementation of the
//! module-facing API that happens to run in-process.
//!
//! Dispatch is synchronous: one call runs to completion before the next
//! starts, so calls from different sessions interleave at call granularity.
//! Devices provide no atomicity across calls and the host adds none.

pub mod fault_injection;

use chardev::{CharDevice, DeviceError, Whence};
use core_types::{ClassId, DeviceNumber, ModuleId, SessionId};
use hal::{UserSink, UserSource, VecSink};
use klog::LogHandle;
use module_api::{KernelModule, KernelServices, ModuleError};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

const LOG_SOURCE: &str = "kernel";

/// First major handed out by the dynamic allocator
const DYNAMIC_MAJOR_FIRST: u32 = 240;

/// Last major in the dynamic range
const DYNAMIC_MAJOR_LAST: u32 = 254;

/// Handle to one open file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(u64);

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File({})", self.0)
    }
}

/// Errors returned by host entry points
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// No node with this name exists
    #[error("device node not found: {0}")]
    NodeNotFound(String),

    /// The file handle does not name an open file
    #[error("invalid file handle")]
    BadHandle,

    /// The node or open file points at a device that is no longer
    /// registered
    #[error("device {0} is no longer registered")]
    DeviceUnavailable(DeviceNumber),

    /// A module with this name is already loaded
    #[error("module already loaded: {0}")]
    ModuleAlreadyLoaded(String),

    /// The module handle does not name a loaded module
    #[error("module not loaded")]
    ModuleNotLoaded,

    /// A device operation failed
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// A registration service failed during module init
    #[error(transparent)]
    Module(#[from] ModuleError),
}

struct LoadedModule {
    name: String,
    module: Box<dyn KernelModule>,
}

struct NodeRecord {
    class: ClassId,
    devnum: DeviceNumber,
}

struct OpenFile {
    devnum: DeviceNumber,
    session: SessionId,
    position: u64,
}

/// Simulated kernel state
///
/// Owns the kernel log, every registration table, and the open-file table.
/// Modules reach it through [`KernelServices`]; external callers use the
/// host entry points (`open`, `read`, `write`, `lseek`, `close`).
pub struct SimulatedKernel {
    log: LogHandle,
    /// Allocated device-number regions, labeled for diagnostics
    regions: HashMap<DeviceNumber, String>,
    /// Dispatch table from device number to device
    devices: HashMap<DeviceNumber, Box<dyn CharDevice>>,
    /// Live classes
    classes: HashMap<ClassId, String>,
    /// Node namespace callers open into
    nodes: HashMap<String, NodeRecord>,
    /// Loaded modules
    modules: HashMap<ModuleId, LoadedModule>,
    /// Open files with their per-open cursor
    open_files: HashMap<FileHandle, OpenFile>,
    next_fd: u64,
}

impl SimulatedKernel {
    /// Creates a kernel with empty tables and a fresh log
    pub fn new() -> Self {
        Self {
            log: LogHandle::new(),
            regions: HashMap::new(),
            devices: HashMap::new(),
            classes: HashMap::new(),
            nodes: HashMap::new(),
            modules: HashMap::new(),
            open_files: HashMap::new(),
            next_fd: 3,
        }
    }

    /// Returns a handle to the kernel log
    pub fn kernel_log(&self) -> LogHandle {
        self.log.clone()
    }

    /// Loads a module: runs its `init` and keeps it on success
    ///
    /// # Errors
    /// Rejects a second module with an already-loaded name. An `init`
    /// failure is propagated and the module is discarded; `init` is
    /// responsible for having unwound its partial registrations.
    pub fn load_module(&mut self, mut module: Box<dyn KernelModule>) -> Result<ModuleId, KernelError> {
        let info = module.info();
        if self.modules.values().any(|m| m.name == info.name) {
            return Err(KernelError::ModuleAlreadyLoaded(info.name));
        }

        self.log
            .info(LOG_SOURCE, format!("loading module {}", info.name));
        if let Err(err) = module.init(self) {
            self.log.error(
                LOG_SOURCE,
                format!("module {} failed to initialize: {}", info.name, err),
            );
            return Err(err.into());
        }

        let id = ModuleId::new();
        self.modules.insert(
            id,
            LoadedModule {
                name: info.name,
                module,
            },
        );
        Ok(id)
    }

    /// Unloads a module: runs its `exit` and drops it
    pub fn unload_module(&mut self, id: ModuleId) -> Result<(), KernelError> {
        let mut loaded = self
            .modules
            .remove(&id)
            .ok_or(KernelError::ModuleNotLoaded)?;
        self.log
            .info(LOG_SOURCE, format!("unloading module {}", loaded.name));
        loaded.module.exit(self);
        Ok(())
    }

    /// Returns true if a module with this name is loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        self.modules.values().any(|m| m.name == name)
    }

    /// Returns the names of all loaded modules
    pub fn module_names(&self) -> Vec<String> {
        self.modules.values().map(|m| m.name.clone()).collect()
    }

    /// Returns the device number behind a node, if the node exists
    pub fn node_devnum(&self, name: &str) -> Option<DeviceNumber> {
        self.nodes.get(name).map(|n| n.devnum)
    }

    /// Returns true if a class with this name is live
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.values().any(|n| n == name)
    }

    /// Returns the number of registered devices
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Returns the number of open files
    pub fn open_file_count(&self) -> usize {
        self.open_files.len()
    }

    /// Returns the cursor of an open file
    pub fn position(&self, handle: FileHandle) -> Option<u64> {
        self.open_files.get(&handle).map(|f| f.position)
    }

    /// Opens the device behind a node
    ///
    /// Creates a session with its cursor at zero and invokes the device's
    /// `open`.
    pub fn open(&mut self, node: &str) -> Result<FileHandle, KernelError> {
        let devnum = self
            .nodes
            .get(node)
            .map(|n| n.devnum)
            .ok_or_else(|| KernelError::NodeNotFound(node.to_string()))?;
        let device = self
            .devices
            .get_mut(&devnum)
            .ok_or(KernelError::DeviceUnavailable(devnum))?;

        let session = SessionId::new();
        device.open(session)?;

        let handle = FileHandle(self.next_fd);
        self.next_fd += 1;
        self.open_files.insert(
            handle,
            OpenFile {
                devnum,
                session,
                position: 0,
            },
        );
        Ok(handle)
    }

    /// Closes an open file, invoking the device's `release`
    ///
    /// Closing succeeds even if the device was unregistered while the file
    /// was open; the session is discarded either way.
    pub fn close(&mut self, handle: FileHandle) -> Result<(), KernelError> {
        let file = self
            .open_files
            .remove(&handle)
            .ok_or(KernelError::BadHandle)?;
        if let Some(device) = self.devices.get_mut(&file.devnum) {
            device.release(file.session)?;
        }
        Ok(())
    }

    /// Reads up to `count` bytes at the file's cursor into `dst`
    pub fn read(
        &mut self,
        handle: FileHandle,
        count: usize,
        dst: &mut dyn UserSink,
    ) -> Result<usize, KernelError> {
        let file = self
            .open_files
            .get_mut(&handle)
            .ok_or(KernelError::BadHandle)?;
        let device = self
            .devices
            .get_mut(&file.devnum)
            .ok_or(KernelError::DeviceUnavailable(file.devnum))?;
        Ok(device.read(&mut file.position, count, dst)?)
    }

    /// Convenience read that collects into a fresh vector
    pub fn read_to_vec(&mut self, handle: FileHandle, count: usize) -> Result<Vec<u8>, KernelError> {
        let mut sink = VecSink::new();
        self.read(handle, count, &mut sink)?;
        Ok(sink.into_bytes())
    }

    /// Writes the bytes offered by `src` at the file's cursor
    pub fn write(
        &mut self,
        handle: FileHandle,
        src: &dyn UserSource,
    ) -> Result<usize, KernelError> {
        let file = self
            .open_files
            .get_mut(&handle)
            .ok_or(KernelError::BadHandle)?;
        let device = self
            .devices
            .get_mut(&file.devnum)
            .ok_or(KernelError::DeviceUnavailable(file.devnum))?;
        Ok(device.write(&mut file.position, src)?)
    }

    /// Repositions the file's cursor
    ///
    /// `whence_raw` is the conventional integer encoding received at the
    /// host boundary; unknown values fail with an invalid-argument device
    /// error. Returns the new absolute position.
    pub fn lseek(
        &mut self,
        handle: FileHandle,
        offset: i64,
        whence_raw: i32,
    ) -> Result<u64, KernelError> {
        let whence = Whence::from_raw(whence_raw)
            .ok_or(KernelError::Device(DeviceError::InvalidArgument))?;
        let file = self
            .open_files
            .get_mut(&handle)
            .ok_or(KernelError::BadHandle)?;
        let device = self
            .devices
            .get_mut(&file.devnum)
            .ok_or(KernelError::DeviceUnavailable(file.devnum))?;
        Ok(device.seek(&mut file.position, offset, whence)?)
    }
}

impl Default for SimulatedKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelServices for SimulatedKernel {
    fn log(&self) -> LogHandle {
        self.log.clone()
    }

    fn alloc_chrdev_region(&mut self, name: &str) -> Result<DeviceNumber, ModuleError> {
        // Lowest free major in the dynamic range; released majors are
        // reusable so load/unload cycles do not leak the number space.
        for major in DYNAMIC_MAJOR_FIRST..=DYNAMIC_MAJOR_LAST {
            let devnum = DeviceNumber::new(major, 0);
            if !self.regions.contains_key(&devnum) {
                self.regions.insert(devnum, name.to_string());
                self.log.info(
                    LOG_SOURCE,
                    format!("chrdev region {} allocated for {}", devnum, name),
                );
                return Ok(devnum);
            }
        }
        Err(ModuleError::RegionExhausted)
    }

    fn release_chrdev_region(&mut self, devnum: DeviceNumber) {
        if self.regions.remove(&devnum).is_some() {
            self.log
                .info(LOG_SOURCE, format!("chrdev region {} released", devnum));
        }
    }

    fn register_chardev(
        &mut self,
        devnum: DeviceNumber,
        device: Box<dyn CharDevice>,
    ) -> Result<(), ModuleError> {
        if self.devices.contains_key(&devnum) {
            return Err(ModuleError::DeviceNumberInUse(devnum));
        }
        self.devices.insert(devnum, device);
        self.log
            .info(LOG_SOURCE, format!("chardev {} registered", devnum));
        Ok(())
    }

    fn unregister_chardev(&mut self, devnum: DeviceNumber) {
        if self.devices.remove(&devnum).is_some() {
            self.log
                .info(LOG_SOURCE, format!("chardev {} unregistered", devnum));
        }
    }

    fn create_class(&mut self, name: &str) -> Result<ClassId, ModuleError> {
        if self.classes.values().any(|n| n == name) {
            return Err(ModuleError::ClassExists(name.to_string()));
        }
        let id = ClassId::new();
        self.classes.insert(id, name.to_string());
        self.log
            .info(LOG_SOURCE, format!("class {} created", name));
        Ok(id)
    }

    fn destroy_class(&mut self, class: ClassId) {
        if let Some(name) = self.classes.remove(&class) {
            self.log
                .info(LOG_SOURCE, format!("class {} destroyed", name));
        }
    }

    fn create_device_node(
        &mut self,
        class: ClassId,
        devnum: DeviceNumber,
        name: &str,
    ) -> Result<(), ModuleError> {
        if !self.classes.contains_key(&class) {
            return Err(ModuleError::ClassNotFound);
        }
        if self.nodes.contains_key(name) {
            return Err(ModuleError::NodeExists(name.to_string()));
        }
        self.nodes.insert(name.to_string(), NodeRecord { class, devnum });
        self.log.info(
            LOG_SOURCE,
            format!("device node {} created for {}", name, devnum),
        );
        Ok(())
    }

    fn destroy_device_node(&mut self, devnum: DeviceNumber) {
        let removed: Vec<String> = self
            .nodes
            .iter()
            .filter(|(_, record)| record.devnum == devnum)
            .map(|(name, _)| name.clone())
            .collect();
        for name in removed {
            self.nodes.remove(&name);
            self.log
                .info(LOG_SOURCE, format!("device node {} destroyed", name));
        }
    }
}
