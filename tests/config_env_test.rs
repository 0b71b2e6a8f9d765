//! Environment overrides for Settings, isolated in their own test binary
//! because they mutate process environment.

use std::fs;

use tempfile::TempDir;

use ciconf::config::Settings;

#[test]
fn given_env_vars_when_loading_then_override_global_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ciconf.toml");
    fs::write(&path, "max_depth = 12\nmigrate_command = \"from-file\"\n").unwrap();
    std::env::set_var("CICONF_MAX_DEPTH", "3");
    std::env::set_var("CICONF_TOKEN", "env-token");

    // Act
    let settings = Settings::load_from(Some(&path));
    std::env::remove_var("CICONF_MAX_DEPTH");
    std::env::remove_var("CICONF_TOKEN");
    let settings = settings.unwrap();

    // Assert
    assert_eq!(settings.max_depth, 3);
    assert_eq!(settings.token.as_deref(), Some("env-token"));
    assert_eq!(settings.migrate_command, "from-file");
}
