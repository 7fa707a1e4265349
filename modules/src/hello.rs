//! Hello world module
//!
//! The smallest possible module: no registrations, no state, one log line
//! at each end of the lifecycle.

use module_api::{KernelModule, KernelServices, ModuleError, ModuleInfo};

/// A module whose only effect is logging its own lifecycle
#[derive(Debug, Default)]
pub struct HelloModule;

impl HelloModule {
    /// Creates the module
    pub fn new() -> Self {
        Self
    }
}

impl KernelModule for HelloModule {
    fn info(&self) -> ModuleInfo {
        ModuleInfo::new("hello")
            .with_version("0.1.0")
            .with_author("Burrow Contributors")
            .with_description("A simple hello world module")
            .with_license("GPL")
    }

    fn init(&mut self, kernel: &mut dyn KernelServices) -> Result<(), ModuleError> {
        kernel.log().info("hello", "hello world module initialized");
        Ok(())
    }

    fn exit(&mut self, kernel: &mut dyn KernelServices) {
        kernel.log().info("hello", "hello world module exited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_module_info() {
        let info = HelloModule::new().info();
        assert_eq!(info.name, "hello");
        assert_eq!(info.license, "GPL");
        assert!(!info.description.is_empty());
    }
}
