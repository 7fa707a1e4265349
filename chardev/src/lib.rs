//! # Character Device Interface
//!
//! This crate defines the capability interface a character device exposes to
//! the host's dispatch layer.
//!
//! ## Philosophy
//!
//! A device is a small set of methods on one concrete type, not an entry in
//! a function-pointer table. The host environment dispatches external I/O
//! requests into this interface; how requests reach the host is not the
//! device's concern.
//!
//! ## Cursor ownership
//!
//! The per-session cursor lives in the host's open-file table. Read, write
//! and seek receive it by mutable reference and advance it as part of the
//! operation, so a device never tracks per-session state of its own.

use core_types::SessionId;
use hal::{TransferError, UserSink, UserSource};
use thiserror::Error;

/// Errors a device operation can return
///
/// Every failure is returned synchronously to the immediate caller. There
/// are no retries and no recovery paths; a failed operation fails that
/// single call and nothing else.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Offset or whence outside the device's valid range
    #[error("invalid argument")]
    InvalidArgument,

    /// A write had nothing to transfer: the cursor is at capacity or the
    /// caller offered zero bytes
    #[error("no space left on device")]
    OutOfSpace,

    /// The transfer between the device and caller-supplied memory failed
    #[error("bad address in caller-supplied memory")]
    CopyFault,
}

impl From<TransferError> for DeviceError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Fault => Self::CopyFault,
        }
    }
}

/// Origin for a seek operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Absolute position from the start of the device
    Set,
    /// Relative to the current cursor
    Current,
    /// Measured against the device's capacity
    End,
}

impl Whence {
    /// Decodes the conventional integer encoding used at the host boundary
    ///
    /// Returns `None` for values outside the known set; the host maps that
    /// to [`DeviceError::InvalidArgument`].
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Set),
            1 => Some(Self::Current),
            2 => Some(Self::End),
            _ => None,
        }
    }

    /// Returns the conventional integer encoding
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Set => 0,
            Self::Current => 1,
            Self::End => 2,
        }
    }
}

/// The operations a character device serves
///
/// Implementers provide bounded random-access byte I/O. Open, release and
/// seek have defaults: devices that need no per-session bookkeeping accept
/// every open and release, and devices without meaningful positions reject
/// seeking.
pub trait CharDevice {
    /// A session opened the device
    ///
    /// Always succeeds unless the device overrides it.
    fn open(&mut self, session: SessionId) -> Result<(), DeviceError> {
        let _ = session;
        Ok(())
    }

    /// A session released the device
    ///
    /// Always succeeds unless the device overrides it. Must not have
    /// cleanup side effects on device contents.
    fn release(&mut self, session: SessionId) -> Result<(), DeviceError> {
        let _ = session;
        Ok(())
    }

    /// Reads up to `count` bytes at the cursor into `dst`
    ///
    /// Returns the number of bytes actually read and advances the cursor by
    /// that amount. Zero is a valid result.
    ///
    /// # Errors
    /// `InvalidArgument` if the cursor is beyond the device's range;
    /// `CopyFault` if `dst` cannot be written.
    fn read(
        &mut self,
        position: &mut u64,
        count: usize,
        dst: &mut dyn UserSink,
    ) -> Result<usize, DeviceError>;

    /// Writes the bytes offered by `src` at the cursor
    ///
    /// Returns the number of bytes actually written and advances the cursor
    /// by that amount.
    ///
    /// # Errors
    /// `InvalidArgument` if the cursor is beyond the device's range;
    /// `OutOfSpace` if nothing could be written (cursor at capacity, or a
    /// zero-length source); `CopyFault` if `src` cannot be read.
    fn write(&mut self, position: &mut u64, src: &dyn UserSource) -> Result<usize, DeviceError>;

    /// Repositions the cursor
    ///
    /// Returns the new absolute cursor position.
    ///
    /// # Errors
    /// `InvalidArgument` if the resulting position would leave the device's
    /// valid range, or if the device does not support seeking.
    fn seek(&mut self, position: &mut u64, offset: i64, whence: Whence) -> Result<u64, DeviceError> {
        let _ = (position, offset, whence);
        Err(DeviceError::InvalidArgument)
    }
}
