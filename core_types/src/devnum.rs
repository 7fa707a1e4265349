//! Device numbers
//!
//! A device number pairs a major number (identifying the driver that owns a
//! region of the device-number space) with a minor number (distinguishing
//! individual devices within that region).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (major, minor) device number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceNumber {
    major: u32,
    minor: u32,
}

impl DeviceNumber {
    /// Creates a device number from a major/minor pair
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Returns the major number
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Returns the minor number
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Returns the device number for the next minor in the same region
    pub fn next_minor(&self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
        }
    }
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.major, self.minor)
    }
}
