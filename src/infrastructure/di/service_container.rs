//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::ApplicationResult;
use crate::application::services::{ComposeService, ConfigQueryService, MigrateService};
use crate::config::Settings;
use crate::infrastructure::api::GraphqlConfigApi;
use crate::infrastructure::traits::{
    CommandRunner, ConfigApi, FileSystem, RealCommandRunner, RealFileSystem,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Remote config service
    pub api: Arc<dyn ConfigApi>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        let api = Arc::new(GraphqlConfigApi::new(&settings)?);
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            api,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        api: Arc<dyn ConfigApi>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cmd,
            api,
        }
    }

    pub fn compose_service(&self) -> ComposeService {
        ComposeService::new(self.fs.clone(), self.settings.max_depth)
    }

    pub fn query_service(&self) -> ConfigQueryService {
        ConfigQueryService::new(self.fs.clone(), self.api.clone())
    }

    pub fn migrate_service(&self) -> MigrateService {
        MigrateService::new(self.cmd.clone(), self.settings.migrate_command.clone())
    }
}
