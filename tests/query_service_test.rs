//! Tests for ConfigQueryService with a mock remote service

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use ciconf::application::services::ConfigQueryService;
use ciconf::application::ApplicationError;
use ciconf::infrastructure::traits::{ConfigApi, ConfigResponse, FileSystem, RealFileSystem};
use ciconf::infrastructure::ApiError;

/// Records submitted documents and replies with a canned result.
/// `Err` carries the HTTP status the service fails with.
struct MockApi {
    reply: Result<ConfigResponse, u16>,
    received: Mutex<Vec<String>>,
}

impl MockApi {
    fn replying(reply: Result<ConfigResponse, u16>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            received: Mutex::new(Vec::new()),
        })
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl ConfigApi for MockApi {
    fn build_config(&self, config_yaml: &str) -> Result<ConfigResponse, ApiError> {
        self.received.lock().unwrap().push(config_yaml.to_string());
        self.reply.clone().map_err(|status| ApiError::Status {
            url: "https://ci.example.com/graphql-unstable".into(),
            status,
        })
    }
}

/// Filesystem whose stdin is a fixed string.
struct StdinFs(String);

impl FileSystem for StdinFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        RealFileSystem.read_to_string(path)
    }

    fn read_stdin(&self) -> io::Result<String> {
        Ok(self.0.clone())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        path.canonicalize()
    }
}

fn valid(output: &str) -> ConfigResponse {
    ConfigResponse {
        valid: true,
        source_yaml: None,
        output_yaml: Some(output.to_string()),
        errors: vec![],
    }
}

fn write_config(temp: &TempDir, content: &str) -> PathBuf {
    let path = temp.path().join("config.yml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_valid_config_when_validating_then_sends_raw_text() {
    // Arrange: include references are sent as-is, not composed
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "x:\n  include: other.yml\n");
    let api = MockApi::replying(Ok(valid("x: 1\n")));
    let service = ConfigQueryService::new(Arc::new(RealFileSystem), api.clone());

    // Act
    service.validate(&path).unwrap();

    // Assert
    assert_eq!(api.received(), vec!["x:\n  include: other.yml\n".to_string()]);
}

#[test]
fn given_invalid_config_when_validating_then_validation_failed_with_messages() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "jobs: 3\n");
    let api = MockApi::replying(Ok(ConfigResponse {
        valid: false,
        errors: vec!["jobs: expected type: Map".into(), "version: required".into()],
        ..ConfigResponse::default()
    }));
    let service = ConfigQueryService::new(Arc::new(RealFileSystem), api);

    // Act
    let err = service.validate(&path).unwrap_err();

    // Assert
    let message = err.to_string();
    match err {
        ApplicationError::ValidationFailed { path: p, errors } => {
            assert_eq!(p, path);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected validation failure, got: {other}"),
    }
    assert!(message.contains("  - version: required"));
}

#[test]
fn given_unreachable_service_when_expanding_then_service_unavailable() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "version: 2.1\n");
    let api = MockApi::replying(Err(503));
    let service = ConfigQueryService::new(Arc::new(RealFileSystem), api);

    // Act
    let err = service.expand(&path).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::ServiceUnavailable(ApiError::Status { status: 503, .. })
    ));
    assert!(err.to_string().contains("returned HTTP 503"));
}

#[test]
fn given_valid_config_when_expanding_then_returns_output_yaml() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "version: 2.1\n");
    let api = MockApi::replying(Ok(valid("version: 2\njobs: {}\n")));
    let service = ConfigQueryService::new(Arc::new(RealFileSystem), api);

    assert_eq!(service.expand(&path).unwrap(), "version: 2\njobs: {}\n");
}

#[test]
fn given_valid_response_without_output_when_expanding_then_service_unavailable() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "version: 2.1\n");
    let api = MockApi::replying(Ok(ConfigResponse {
        valid: true,
        ..ConfigResponse::default()
    }));
    let service = ConfigQueryService::new(Arc::new(RealFileSystem), api);

    assert!(matches!(
        service.expand(&path).unwrap_err(),
        ApplicationError::ServiceUnavailable(ApiError::MissingOutput(_))
    ));
}

#[test]
fn given_dash_path_when_validating_then_reads_stdin() {
    // Arrange
    let api = MockApi::replying(Ok(valid("")));
    let fs = Arc::new(StdinFs("from: stdin\n".into()));
    let service = ConfigQueryService::new(fs, api.clone());

    // Act
    service.validate(Path::new("-")).unwrap();

    // Assert
    assert_eq!(api.received(), vec!["from: stdin\n".to_string()]);
}

#[test]
fn given_missing_file_when_validating_then_fails_before_calling_service() {
    // Arrange
    let api = MockApi::replying(Ok(valid("")));
    let service = ConfigQueryService::new(Arc::new(RealFileSystem), api.clone());

    // Act
    let err = service
        .validate(Path::new("/nonexistent/ciconf/config.yml"))
        .unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(api.received().is_empty());
}
