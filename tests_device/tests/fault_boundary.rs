//! Boundary Fault Tests
//!
//! Validates the copy-fault paths: transfers that fail at the user-memory
//! boundary surface as `CopyFault`, leave the cursor and buffer untouched,
//! and do not poison the session.

use chardev::DeviceError;
use hal::SliceSource;
use modules::PSEUDO_NODE;
use sim_kernel::fault_injection::{FaultingSink, FaultingSource, TransferFault};
use sim_kernel::KernelError;
use tests_device::boot_with_pseudo;

const SEEK_SET: i32 = 0;

/// Test: a read into inaccessible caller memory fails with a copy fault
#[test]
fn test_read_copy_fault() {
    let (mut kernel, _pseudo) = boot_with_pseudo();
    let fd = kernel.open(PSEUDO_NODE).expect("open pseudo0");
    kernel
        .write(fd, &SliceSource::new(b"payload"))
        .expect("seed data");
    kernel.lseek(fd, 0, SEEK_SET).expect("rewind");

    let mut sink = FaultingSink::new(TransferFault::Immediately);
    assert_eq!(
        kernel.read(fd, 7, &mut sink),
        Err(KernelError::Device(DeviceError::CopyFault))
    );

    // The failed transfer moved nothing, including the cursor.
    assert_eq!(kernel.position(fd), Some(0));
    assert!(sink.delivered().is_empty());
}

/// Test: a write from unreadable caller memory fails with a copy fault and
/// leaves the buffer contents untouched
#[test]
fn test_write_copy_fault_preserves_contents() {
    let (mut kernel, _pseudo) = boot_with_pseudo();
    let fd = kernel.open(PSEUDO_NODE).expect("open pseudo0");
    kernel
        .write(fd, &SliceSource::new(b"original"))
        .expect("seed data");
    kernel.lseek(fd, 0, SEEK_SET).expect("rewind");

    let source = FaultingSource::new(b"clobber!".to_vec(), TransferFault::Immediately);
    assert_eq!(
        kernel.write(fd, &source),
        Err(KernelError::Device(DeviceError::CopyFault))
    );
    assert_eq!(kernel.position(fd), Some(0));

    let bytes = kernel.read_to_vec(fd, 8).expect("read back");
    assert_eq!(bytes, b"original");
}

/// Test: a sink that faults on its second transfer delivers the first one
#[test]
fn test_sink_fault_after_first_transfer() {
    let (mut kernel, _pseudo) = boot_with_pseudo();
    let fd = kernel.open(PSEUDO_NODE).expect("open pseudo0");
    kernel
        .write(fd, &SliceSource::new(b"abcdef"))
        .expect("seed data");
    kernel.lseek(fd, 0, SEEK_SET).expect("rewind");

    let mut sink = FaultingSink::new(TransferFault::AfterTransfers { count: 1 });
    let first = kernel.read(fd, 3, &mut sink).expect("first read");
    assert_eq!(first, 3);
    assert_eq!(sink.delivered(), b"abc");

    assert_eq!(
        kernel.read(fd, 3, &mut sink),
        Err(KernelError::Device(DeviceError::CopyFault))
    );
    assert_eq!(kernel.position(fd), Some(3));
}

/// Test: a fault fails only that call; the session keeps working
#[test]
fn test_fault_does_not_poison_session() {
    let (mut kernel, _pseudo) = boot_with_pseudo();
    let fd = kernel.open(PSEUDO_NODE).expect("open pseudo0");
    kernel
        .write(fd, &SliceSource::new(b"resilient"))
        .expect("seed data");
    kernel.lseek(fd, 0, SEEK_SET).expect("rewind");

    let mut bad_sink = FaultingSink::new(TransferFault::Immediately);
    assert!(kernel.read(fd, 9, &mut bad_sink).is_err());

    let bytes = kernel.read_to_vec(fd, 9).expect("retry with good memory");
    assert_eq!(bytes, b"resilient");
    kernel.close(fd).expect("close");
}
