//! Effective config path selection

use std::path::{Path, PathBuf};

/// Pick the config path to operate on.
///
/// Precedence: positional argument, then a non-empty override value
/// (the legacy `--config` flag), then the default path.
pub fn resolve_config_path(
    default_path: &Path,
    override_value: Option<&str>,
    positional: Option<&Path>,
) -> PathBuf {
    if let Some(path) = positional {
        return path.to_path_buf();
    }
    match override_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => default_path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, ".circleci/config.yml")]
    #[case(Some(""), None, ".circleci/config.yml")]
    #[case(Some("legacy.yml"), None, "legacy.yml")]
    #[case(None, Some("arg.yml"), "arg.yml")]
    #[case(Some("legacy.yml"), Some("arg.yml"), "arg.yml")]
    fn given_inputs_when_resolving_then_highest_precedence_wins(
        #[case] override_value: Option<&str>,
        #[case] positional: Option<&str>,
        #[case] expected: &str,
    ) {
        let resolved = resolve_config_path(
            Path::new(".circleci/config.yml"),
            override_value,
            positional.map(Path::new),
        );
        assert_eq!(resolved, PathBuf::from(expected));
    }
}
