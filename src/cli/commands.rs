//! Command dispatch: maps parsed arguments onto services

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, SettingsCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{render_tree, resolve_config_path};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the parsed command; returns the process exit code.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<i32> {
    match &cli.command {
        Some(Commands::Collapse { path }) => collapse(container, path.as_deref()),
        Some(Commands::Validate { path, config }) => {
            validate(container, path.as_deref(), config.as_deref())
        }
        Some(Commands::Expand { path }) => expand(container, path),
        Some(Commands::Migrate { args }) => migrate(container, args),
        Some(Commands::Tree { path }) => tree(container, path.as_deref()),
        Some(Commands::Files { path }) => files(container, path.as_deref()),
        Some(Commands::Settings { command }) => settings(container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(exitcode::OK)
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn effective_path(container: &ServiceContainer, path: Option<&Path>) -> PathBuf {
    resolve_config_path(&container.settings.default_config_path, None, path)
}

#[instrument(skip(container))]
fn collapse(container: &ServiceContainer, path: Option<&Path>) -> CliResult<i32> {
    let path = effective_path(container, path);
    debug!("collapse: {}", path.display());
    let yaml = container.compose_service().collapse(&path)?;
    output::document(&yaml).map_err(|e| InfraError::io("write output", e))?;
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn validate(
    container: &ServiceContainer,
    path: Option<&Path>,
    legacy_config: Option<&str>,
) -> CliResult<i32> {
    let path = resolve_config_path(&container.settings.default_config_path, legacy_config, path);
    container.query_service().validate(&path)?;
    output::success(&format!("Config file at {} is valid", path.display()));
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn expand(container: &ServiceContainer, path: &Path) -> CliResult<i32> {
    let yaml = container.query_service().expand(path)?;
    output::document(&yaml).map_err(|e| InfraError::io("write output", e))?;
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn migrate(container: &ServiceContainer, args: &[String]) -> CliResult<i32> {
    Ok(container.migrate_service().migrate(args)?)
}

#[instrument(skip(container))]
fn tree(container: &ServiceContainer, path: Option<&Path>) -> CliResult<i32> {
    let path = effective_path(container, path);
    let tree = container.compose_service().compose(&path)?;
    output::info(&render_tree(&tree));
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn files(container: &ServiceContainer, path: Option<&Path>) -> CliResult<i32> {
    let path = effective_path(container, path);
    for file in container.compose_service().files(&path)? {
        output::info(&file.display());
    }
    Ok(exitcode::OK)
}

fn settings(container: &ServiceContainer, command: &SettingsCommands) -> CliResult<i32> {
    match command {
        SettingsCommands::Show => {
            output::document(&container.settings.to_toml()?)
                .map_err(|e| InfraError::io("write output", e))?;
        }
        SettingsCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
        SettingsCommands::Init => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("no config directory available on this platform".to_string())
            })?;
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "settings file already exists: {}",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(exitcode::OK)
}
