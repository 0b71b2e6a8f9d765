//! Legacy config migration, delegated to an external executable.

use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::CommandRunner;

/// Subcommand prefix passed to the migration executable.
pub const MIGRATE_PREFIX: [&str; 2] = ["config", "migrate"];

/// Runs `<command> config migrate <args...>` with inherited stdio.
pub struct MigrateService {
    cmd: Arc<dyn CommandRunner>,
    command: String,
}

impl MigrateService {
    pub fn new(cmd: Arc<dyn CommandRunner>, command: String) -> Self {
        Self { cmd, command }
    }

    /// Full argument list handed to the executable.
    pub fn arguments(args: &[String]) -> Vec<String> {
        MIGRATE_PREFIX
            .iter()
            .map(|s| s.to_string())
            .chain(args.iter().cloned())
            .collect()
    }

    /// Run the migration and return the executable's exit code unchanged.
    pub fn migrate(&self, args: &[String]) -> ApplicationResult<i32> {
        let argv = Self::arguments(args);
        debug!("migrate: {} {:?}", self.command, argv);
        self.cmd
            .run_passthrough(&self.command, &argv)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("run {}", self.command),
                source: Box::new(e),
            })
    }
}
