/// User-memory boundary for device transfers
///
/// Devices never touch caller memory directly. A caller hands the host an
/// opaque source or sink and the device copies bytes across the boundary in
/// a single bounded transfer, the way a driver copies between kernel and
/// user space. The concrete transfer mechanism belongs to the platform
/// binding layer; this module only fixes the contract.
use core::fmt;

/// Errors crossing the user-memory boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// The caller-supplied memory could not be accessed
    Fault,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fault => write!(f, "caller-supplied memory is inaccessible"),
        }
    }
}

impl std::error::Error for TransferError {}

/// Caller-supplied source of bytes for a write
///
/// The source advertises how many bytes the caller offered; the device
/// decides how many of them to take and pulls exactly that many in one
/// transfer.
pub trait UserSource {
    /// Total bytes the caller offered for transfer
    fn len(&self) -> usize;

    /// Returns true if the caller offered no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the first `dst.len()` offered bytes into kernel memory
    ///
    /// # Errors
    /// Returns `TransferError::Fault` if the caller memory cannot be read.
    /// A failed transfer copies nothing.
    fn copy_to_kernel(&self, dst: &mut [u8]) -> Result<(), TransferError>;
}

/// Caller-supplied destination of bytes for a read
pub trait UserSink {
    /// Copies `src` out of kernel memory into the caller's destination
    ///
    /// # Errors
    /// Returns `TransferError::Fault` if the caller memory cannot be
    /// written. A failed transfer delivers nothing.
    fn copy_from_kernel(&mut self, src: &[u8]) -> Result<(), TransferError>;
}

/// A source backed by an in-memory slice
///
/// The reference implementation used by the simulated host and by tests.
pub struct SliceSource<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Wraps a byte slice as a transfer source
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl UserSource for SliceSource<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn copy_to_kernel(&self, dst: &mut [u8]) -> Result<(), TransferError> {
        if dst.len() > self.bytes.len() {
            return Err(TransferError::Fault);
        }
        dst.copy_from_slice(&self.bytes[..dst.len()]);
        Ok(())
    }
}

/// A sink that collects transferred bytes into a vector
pub struct VecSink {
    bytes: Vec<u8>,
}

impl VecSink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Returns the bytes delivered so far
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the sink, returning the delivered bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl UserSink for VecSink {
    fn copy_from_kernel(&mut self, src: &[u8]) -> Result<(), TransferError> {
        self.bytes.extend_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_full_transfer() {
        let source = SliceSource::new(b"pseudo");
        assert_eq!(source.len(), 6);

        let mut dst = [0u8; 6];
        source.copy_to_kernel(&mut dst).unwrap();
        assert_eq!(&dst, b"pseudo");
    }

    #[test]
    fn test_slice_source_partial_transfer() {
        let source = SliceSource::new(b"pseudo");
        let mut dst = [0u8; 3];
        source.copy_to_kernel(&mut dst).unwrap();
        assert_eq!(&dst, b"pse");
    }

    #[test]
    fn test_slice_source_over_read_faults() {
        let source = SliceSource::new(b"ab");
        let mut dst = [0u8; 3];
        assert_eq!(
            source.copy_to_kernel(&mut dst),
            Err(TransferError::Fault)
        );
    }

    #[test]
    fn test_slice_source_empty() {
        let source = SliceSource::new(b"");
        assert!(source.is_empty());
        assert_eq!(source.len(), 0);
    }

    #[test]
    fn test_vec_sink_accumulates() {
        let mut sink = VecSink::new();
        sink.copy_from_kernel(b"he").unwrap();
        sink.copy_from_kernel(b"llo").unwrap();
        assert_eq!(sink.bytes(), b"hello");
        assert_eq!(sink.into_bytes(), b"hello".to_vec());
    }

    #[test]
    fn test_transfer_error_display() {
        assert_eq!(
            TransferError::Fault.to_string(),
            "caller-supplied memory is inaccessible"
        );
    }
}
