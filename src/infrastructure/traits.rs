//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

use crate::infrastructure::ApiError;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read all of standard input.
    fn read_stdin(&self) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Canonicalize path (resolve symlinks, make absolute).
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with inherited stdio and return its exit code.
    fn run_passthrough(&self, cmd: &str, args: &[String]) -> io::Result<i32>;
}

/// Result of a remote build-config query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigResponse {
    /// Whether the service accepted the config
    pub valid: bool,
    /// Config as the service received it
    pub source_yaml: Option<String>,
    /// Expanded config, present when expansion succeeded
    pub output_yaml: Option<String>,
    /// Validation messages, empty when valid
    pub errors: Vec<String>,
}

/// Remote config validation/expansion service.
pub trait ConfigApi: Send + Sync {
    /// Submit raw config text. `Err` means the service could not be reached
    /// or returned something other than a build-config result.
    fn build_config(&self, config_yaml: &str) -> Result<ConfigResponse, ApiError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read_stdin(&self) -> io::Result<String> {
        io::read_to_string(io::stdin())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_passthrough(&self, cmd: &str, args: &[String]) -> io::Result<i32> {
        let status = std::process::Command::new(cmd).args(args).status()?;
        Ok(exit_code_of(status))
    }
}

#[cfg(unix)]
fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    // shell convention for signal deaths
    status
        .code()
        .or_else(|| status.signal().map(|s| 128 + s))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
