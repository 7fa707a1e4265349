//! Module lifecycle contract

use crate::services::{KernelServices, ModuleError};

/// Static metadata a module declares about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Short unique name, used as the log source and for duplicate detection
    pub name: String,
    /// Module version
    pub version: String,
    /// Author attribution
    pub author: String,
    /// One-line description
    pub description: String,
    /// License the module is distributed under
    pub license: String,
}

impl ModuleInfo {
    /// Creates metadata with the given name and empty remaining fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            author: String::new(),
            description: String::new(),
            license: String::new(),
        }
    }

    /// Sets the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the license
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }
}

/// A loadable kernel module
///
/// The kernel drives the lifecycle: `init` runs at load and may fail, in
/// which case the module is not kept and must have torn down whatever
/// registrations it had already completed. `exit` runs at unload and
/// releases everything `init` registered, in reverse order.
pub trait KernelModule {
    /// Returns the module's static metadata
    fn info(&self) -> ModuleInfo;

    /// Initializes the module
    ///
    /// # Errors
    /// On error the kernel discards the module. A failing `init` is
    /// responsible for undoing its own partial registrations before
    /// returning.
    fn init(&mut self, kernel: &mut dyn KernelServices) -> Result<(), ModuleError>;

    /// Tears the module down at unload
    fn exit(&mut self, kernel: &mut dyn KernelServices);
}
