//! Deterministic fault injection for boundary transfers
//!
//! Tests need caller-supplied memory that fails on demand to exercise the
//! copy-fault paths. The implementations here fail deterministically
//! according to a plan configured per test.
//!
//! ## Example
//!
//! ```
//! use sim_kernel::fault_injection::{FaultingSink, TransferFault};
//! use hal::UserSink;
//!
//! let mut sink = FaultingSink::new(TransferFault::Immediately);
//! assert!(sink.copy_from_kernel(b"lost").is_err());
//! ```

use hal::{TransferError, UserSink, UserSource};
use std::cell::Cell;

/// When a faulting source or sink should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFault {
    /// Every transfer fails
    Immediately,
    /// The first `count` transfers succeed, the next one fails
    AfterTransfers { count: usize },
}

/// A sink standing in for an unmapped caller destination
///
/// Bytes delivered before the configured fault are retained for
/// inspection.
pub struct FaultingSink {
    fault: TransferFault,
    transfers: usize,
    delivered: Vec<u8>,
}

impl FaultingSink {
    /// Creates a sink with the given fault plan
    pub fn new(fault: TransferFault) -> Self {
        Self {
            fault,
            transfers: 0,
            delivered: Vec::new(),
        }
    }

    /// Returns the bytes delivered before the fault
    pub fn delivered(&self) -> &[u8] {
        &self.delivered
    }
}

impl UserSink for FaultingSink {
    fn copy_from_kernel(&mut self, src: &[u8]) -> Result<(), TransferError> {
        let due = match self.fault {
            TransferFault::Immediately => true,
            TransferFault::AfterTransfers { count } => self.transfers >= count,
        };
        if due {
            return Err(TransferError::Fault);
        }
        self.transfers += 1;
        self.delivered.extend_from_slice(src);
        Ok(())
    }
}

/// A source standing in for an unreadable caller buffer
///
/// Advertises the length of its backing bytes so requested counts behave
/// normally; the transfer itself fails per the plan.
pub struct FaultingSource {
    bytes: Vec<u8>,
    fault: TransferFault,
    transfers: Cell<usize>,
}

impl FaultingSource {
    /// Creates a source offering `bytes` with the given fault plan
    pub fn new(bytes: impl Into<Vec<u8>>, fault: TransferFault) -> Self {
        Self {
            bytes: bytes.into(),
            fault,
            transfers: Cell::new(0),
        }
    }
}

impl UserSource for FaultingSource {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn copy_to_kernel(&self, dst: &mut [u8]) -> Result<(), TransferError> {
        let due = match self.fault {
            TransferFault::Immediately => true,
            TransferFault::AfterTransfers { count } => self.transfers.get() >= count,
        };
        if due {
            return Err(TransferError::Fault);
        }
        if dst.len() > self.bytes.len() {
            return Err(TransferError::Fault);
        }
        self.transfers.set(self.transfers.get() + 1);
        dst.copy_from_slice(&self.bytes[..dst.len()]);
        Ok(())
    }
}
