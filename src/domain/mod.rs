//! Domain layer: entities and pure composition logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod resolver;
pub mod scanner;
pub mod serializer;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use resolver::resolve_config_path;
pub use scanner::scan;
pub use serializer::{materialize, render_tree, serialize};

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Unknown variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
