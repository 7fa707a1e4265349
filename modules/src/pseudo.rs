//! Pseudo character device
//!
//! A single-instance device serving bounded random-access byte I/O over a
//! fixed 512-byte in-memory buffer. Transfers that would run past capacity
//! are truncated; a write with nothing left to transfer is an error while a
//! read of zero bytes is not.
//!
//! The buffer is owned by the device instance, which the module hands to
//! the kernel at registration and which is dropped at unregistration. There
//! is no locking: calls from different sessions interleave at call
//! granularity with no atomicity guarantee across calls.

use chardev::{CharDevice, DeviceError, Whence};
use core_types::{ClassId, DeviceNumber, SessionId};
use hal::{UserSink, UserSource};
use klog::LogHandle;
use module_api::{KernelModule, KernelServices, ModuleError, ModuleInfo};

/// Fixed capacity of the device buffer in bytes
pub const DEV_MEM_SIZE: usize = 512;

/// Class the device node is created under
pub const PSEUDO_CLASS: &str = "pseudo";

/// Node name callers open
pub const PSEUDO_NODE: &str = "pseudo0";

const LOG_SOURCE: &str = "pseudo";

/// The bounded-buffer device
pub struct PseudoDevice {
    buffer: [u8; DEV_MEM_SIZE],
    log: LogHandle,
}

impl PseudoDevice {
    /// Creates a zero-filled device logging through `log`
    pub fn new(log: LogHandle) -> Self {
        Self {
            buffer: [0; DEV_MEM_SIZE],
            log,
        }
    }

    /// Validates a cursor and converts it to a buffer index
    ///
    /// The cursor is valid anywhere in `[0, DEV_MEM_SIZE]`; the capacity
    /// position itself is addressable (reads there return zero bytes).
    fn checked_position(position: u64) -> Result<usize, DeviceError> {
        if position > DEV_MEM_SIZE as u64 {
            return Err(DeviceError::InvalidArgument);
        }
        Ok(position as usize)
    }
}

impl CharDevice for PseudoDevice {
    fn open(&mut self, session: SessionId) -> Result<(), DeviceError> {
        self.log.record(
            klog::LogEntry::new(klog::LogLevel::Info, LOG_SOURCE, "open requested")
                .with_session(session),
        );
        Ok(())
    }

    fn release(&mut self, session: SessionId) -> Result<(), DeviceError> {
        self.log.record(
            klog::LogEntry::new(klog::LogLevel::Info, LOG_SOURCE, "release requested")
                .with_session(session),
        );
        Ok(())
    }

    fn read(
        &mut self,
        position: &mut u64,
        count: usize,
        dst: &mut dyn UserSink,
    ) -> Result<usize, DeviceError> {
        self.log.record(
            klog::LogEntry::new(
                klog::LogLevel::Info,
                LOG_SOURCE,
                format!("read requested for {} bytes", count),
            )
            .with_field("position", position.to_string()),
        );

        let pos = Self::checked_position(*position)?;
        let effective = count.min(DEV_MEM_SIZE - pos);

        if effective > 0 {
            dst.copy_from_kernel(&self.buffer[pos..pos + effective])?;
        }
        *position += effective as u64;

        self.log.record(
            klog::LogEntry::new(
                klog::LogLevel::Info,
                LOG_SOURCE,
                format!("read {} bytes", effective),
            )
            .with_field("position", position.to_string()),
        );
        Ok(effective)
    }

    fn write(&mut self, position: &mut u64, src: &dyn UserSource) -> Result<usize, DeviceError> {
        let count = src.len();
        self.log.record(
            klog::LogEntry::new(
                klog::LogLevel::Info,
                LOG_SOURCE,
                format!("write requested for {} bytes", count),
            )
            .with_field("position", position.to_string()),
        );

        let pos = Self::checked_position(*position)?;
        let effective = count.min(DEV_MEM_SIZE - pos);
        if effective == 0 {
            self.log.warn(LOG_SOURCE, "write rejected, no space left");
            return Err(DeviceError::OutOfSpace);
        }

        src.copy_to_kernel(&mut self.buffer[pos..pos + effective])?;
        *position += effective as u64;

        self.log.record(
            klog::LogEntry::new(
                klog::LogLevel::Info,
                LOG_SOURCE,
                format!("wrote {} bytes", effective),
            )
            .with_field("position", position.to_string()),
        );
        Ok(effective)
    }

    fn seek(
        &mut self,
        position: &mut u64,
        offset: i64,
        whence: Whence,
    ) -> Result<u64, DeviceError> {
        self.log.record(
            klog::LogEntry::new(
                klog::LogLevel::Info,
                LOG_SOURCE,
                format!("lseek requested with offset {}", offset),
            )
            .with_field("position", position.to_string()),
        );

        let capacity = DEV_MEM_SIZE as i64;
        let new_position = match whence {
            Whence::Set => {
                if offset < 0 || offset > capacity {
                    return Err(DeviceError::InvalidArgument);
                }
                offset
            }
            Whence::Current => {
                let target = (*position as i64)
                    .checked_add(offset)
                    .ok_or(DeviceError::InvalidArgument)?;
                if target < 0 || target > capacity {
                    return Err(DeviceError::InvalidArgument);
                }
                target
            }
            // Measured back from capacity, not past the end: an offset of
            // 100 on a 512-byte device lands the cursor at 412.
            Whence::End => {
                if offset < 0 || offset > capacity {
                    return Err(DeviceError::InvalidArgument);
                }
                capacity - offset
            }
        };

        *position = new_position as u64;
        Ok(*position)
    }
}

/// The module that owns the pseudo device's registrations
///
/// `init` performs the registration steps in order and unwinds the ones
/// already completed when a later step fails; `exit` tears everything down
/// in reverse order.
#[derive(Default)]
pub struct PseudoModule {
    devnum: Option<DeviceNumber>,
    class: Option<ClassId>,
}

impl PseudoModule {
    /// Creates the module
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the device number allocated at init, if loaded
    pub fn devnum(&self) -> Option<DeviceNumber> {
        self.devnum
    }
}

impl KernelModule for PseudoModule {
    fn info(&self) -> ModuleInfo {
        ModuleInfo::new("pseudo")
            .with_version("0.1.0")
            .with_author("Burrow Contributors")
            .with_description("Pseudo character device driver")
            .with_license("GPL")
    }

    fn init(&mut self, kernel: &mut dyn KernelServices) -> Result<(), ModuleError> {
        let log = kernel.log();
        log.info(LOG_SOURCE, "pseudo char driver loaded");

        let devnum = kernel.alloc_chrdev_region("pseudo_char_device")?;
        log.info(LOG_SOURCE, format!("device number {}", devnum));

        if let Err(err) = kernel.register_chardev(devnum, Box::new(PseudoDevice::new(log.clone())))
        {
            kernel.release_chrdev_region(devnum);
            return Err(err);
        }

        let class = match kernel.create_class(PSEUDO_CLASS) {
            Ok(class) => class,
            Err(err) => {
                kernel.unregister_chardev(devnum);
                kernel.release_chrdev_region(devnum);
                return Err(err);
            }
        };

        if let Err(err) = kernel.create_device_node(class, devnum, PSEUDO_NODE) {
            kernel.destroy_class(class);
            kernel.unregister_chardev(devnum);
            kernel.release_chrdev_region(devnum);
            return Err(err);
        }

        self.devnum = Some(devnum);
        self.class = Some(class);
        Ok(())
    }

    fn exit(&mut self, kernel: &mut dyn KernelServices) {
        if let Some(devnum) = self.devnum.take() {
            kernel.destroy_device_node(devnum);
            if let Some(class) = self.class.take() {
                kernel.destroy_class(class);
            }
            kernel.unregister_chardev(devnum);
            kernel.release_chrdev_region(devnum);
        }
        kernel.log().info(LOG_SOURCE, "pseudo char driver unloaded");
    }
}
