//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner, ConfigApi)
//! but are themselves concrete structs, not traits.

mod compose;
mod migrate;
mod query;

pub use compose::ComposeService;
pub use migrate::{MigrateService, MIGRATE_PREFIX};
pub use query::{ConfigQueryService, STDIN_PATH};
