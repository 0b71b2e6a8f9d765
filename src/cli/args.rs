//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Compose split CI configuration files, validate and expand them
#[derive(Parser, Debug)]
#[command(name = "ciconf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collapse a split configuration into a single document
    Collapse {
        /// Root config file (default: .circleci/config.yml)
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
    },

    /// Check that the config file is well formed (use "-" for stdin)
    #[command(alias = "check")]
    Validate {
        /// Config file
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
        /// Config file (legacy flag, superseded by PATH)
        #[arg(short = 'c', long = "config", hide = true)]
        config: Option<String>,
    },

    /// Expand the config (use "-" for stdin)
    Expand {
        /// Config file
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },

    /// Migrate a pre-release 2.0 config to the official release version
    #[command(hide = true, disable_help_flag = true)]
    Migrate {
        /// Arguments forwarded to the migration tool
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        args: Vec<String>,
    },

    /// Show the include hierarchy as a tree
    Tree {
        /// Root config file (default: .circleci/config.yml)
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
    },

    /// List every file in the composition
    Files {
        /// Root config file (default: .circleci/config.yml)
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
    },

    /// Manage settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show effective settings
    Show,

    /// Show settings file path
    Path,

    /// Create settings template
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_check_alias_with_legacy_flag_when_parsing_then_validate() {
        let cli = Cli::try_parse_from(["ciconf", "check", "-c", "legacy.yml"]).unwrap();
        match cli.command {
            Some(Commands::Validate { path, config }) => {
                assert!(path.is_none());
                assert_eq!(config.as_deref(), Some("legacy.yml"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_migrate_with_flags_when_parsing_then_forwards_verbatim() {
        let cli =
            Cli::try_parse_from(["ciconf", "migrate", "-c", "old.yml", "--in-place"]).unwrap();
        match cli.command {
            Some(Commands::Migrate { args }) => {
                assert_eq!(args, vec!["-c", "old.yml", "--in-place"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_expand_without_path_when_parsing_then_errors() {
        assert!(Cli::try_parse_from(["ciconf", "expand"]).is_err());
    }

    #[test]
    fn given_collapse_with_two_paths_when_parsing_then_errors() {
        assert!(Cli::try_parse_from(["ciconf", "collapse", "a.yml", "b.yml"]).is_err());
    }

    #[test]
    fn given_repeated_debug_when_parsing_then_counts() {
        let cli = Cli::try_parse_from(["ciconf", "-dd", "files"]).unwrap();
        assert_eq!(cli.debug, 2);
    }
}
