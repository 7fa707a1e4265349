//! Daemon runtime
//!
//! One runtime owns one simulated kernel. `run` performs the full demo
//! lifecycle: load the hello and pseudo modules, push a payload through the
//! device and pull it back, then unload everything and hand the kernel log
//! to the caller.

use chardev::Whence;
use hal::SliceSource;
use klog::LogEntry;
use modules::{HelloModule, PseudoModule, PSEUDO_NODE};
use sim_kernel::{KernelError, SimulatedKernel};
use thiserror::Error;

/// Errors the daemon can exit with
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A kernel entry point failed
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    /// The bytes read back did not match the bytes written
    #[error("round trip mismatch: wrote {written} bytes, read {read} back")]
    RoundTripMismatch { written: usize, read: usize },
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Payload written to the pseudo device
    pub message: String,
    /// Print the kernel log after the run
    pub dump_log: bool,
    /// Print the kernel log as JSON instead of text
    pub json_log: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            message: "hello from burrowd".to_string(),
            dump_log: false,
            json_log: false,
        }
    }
}

/// What a completed run did
#[derive(Debug)]
pub struct RunReport {
    /// Bytes accepted by the device
    pub bytes_written: usize,
    /// Bytes read back from the device
    pub payload: Vec<u8>,
    /// Kernel log at the end of the run
    pub log: Vec<LogEntry>,
}

/// The daemon runtime
pub struct Runtime {
    config: RuntimeConfig,
    kernel: SimulatedKernel,
}

impl Runtime {
    /// Creates a runtime with a fresh kernel
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            kernel: SimulatedKernel::new(),
        }
    }

    /// Runs the demo lifecycle
    pub fn run(&mut self) -> Result<RunReport, RuntimeError> {
        let hello = self.kernel.load_module(Box::new(HelloModule::new()))?;
        let pseudo = self.kernel.load_module(Box::new(PseudoModule::new()))?;

        let fd = self.kernel.open(PSEUDO_NODE)?;
        let bytes_written = self
            .kernel
            .write(fd, &SliceSource::new(self.config.message.as_bytes()))?;

        self.kernel.lseek(fd, 0, Whence::Set.to_raw())?;
        let payload = self.kernel.read_to_vec(fd, bytes_written)?;
        if payload.len() != bytes_written {
            return Err(RuntimeError::RoundTripMismatch {
                written: bytes_written,
                read: payload.len(),
            });
        }
        self.kernel.close(fd)?;

        self.kernel.unload_module(pseudo)?;
        self.kernel.unload_module(hello)?;

        Ok(RunReport {
            bytes_written,
            payload,
            log: self.kernel.kernel_log().snapshot(),
        })
    }

    /// Renders the report for the terminal, honoring the log flags
    pub fn render(&self, report: &RunReport) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "wrote {} bytes, read back: {}\n",
            report.bytes_written,
            String::from_utf8_lossy(&report.payload)
        ));
        if self.config.dump_log {
            if self.config.json_log {
                // Entries are serde-serializable; failures cannot occur for
                // the types involved, so fall back to an empty array.
                let json =
                    serde_json::to_string_pretty(&report.log).unwrap_or_else(|_| "[]".to_string());
                out.push_str(&json);
                out.push('\n');
            } else {
                for entry in &report.log {
                    out.push_str(&format!(
                        "[{:?}] {}: {}\n",
                        entry.level, entry.source, entry.message
                    ));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_round_trips_the_message() {
        let mut runtime = Runtime::new(RuntimeConfig::default());
        let report = runtime.run().unwrap();

        assert_eq!(report.bytes_written, "hello from burrowd".len());
        assert_eq!(report.payload, b"hello from burrowd");
    }

    #[test]
    fn test_run_leaves_lifecycle_trace_in_log() {
        let mut runtime = Runtime::new(RuntimeConfig::default());
        let report = runtime.run().unwrap();

        let messages: Vec<&str> = report.log.iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"hello world module initialized"));
        assert!(messages.contains(&"hello world module exited"));
        assert!(messages.contains(&"pseudo char driver loaded"));
        assert!(messages.contains(&"pseudo char driver unloaded"));
    }

    #[test]
    fn test_render_without_log_is_one_line() {
        let mut runtime = Runtime::new(RuntimeConfig {
            message: "abc".to_string(),
            dump_log: false,
            json_log: false,
        });
        let report = runtime.run().unwrap();
        let rendered = runtime.render(&report);
        assert_eq!(rendered.lines().count(), 1);
        assert!(rendered.contains("read back: abc"));
    }

    #[test]
    fn test_render_json_log_parses() {
        let mut runtime = Runtime::new(RuntimeConfig {
            message: "abc".to_string(),
            dump_log: true,
            json_log: true,
        });
        let report = runtime.run().unwrap();
        let rendered = runtime.render(&report);
        let json_part = rendered.splitn(2, '\n').nth(1).unwrap();
        let entries: Vec<LogEntry> = serde_json::from_str(json_part.trim_end()).unwrap();
        assert!(!entries.is_empty());
    }

    #[test]
    fn test_message_longer_than_device_is_truncated() {
        let mut runtime = Runtime::new(RuntimeConfig {
            message: "x".repeat(600),
            dump_log: false,
            json_log: false,
        });
        let report = runtime.run().unwrap();
        assert_eq!(report.bytes_written, modules::DEV_MEM_SIZE);
        assert_eq!(report.payload.len(), modules::DEV_MEM_SIZE);
    }
}
