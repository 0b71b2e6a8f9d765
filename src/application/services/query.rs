//! Remote validation and expansion of a raw config document.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::{ConfigApi, ConfigResponse, FileSystem};
use crate::infrastructure::ApiError;

/// Path argument meaning "read the document from standard input".
pub const STDIN_PATH: &str = "-";

/// Service sending config text to the remote build-config service.
///
/// Documents are sent as-is; local `include` references are not composed.
pub struct ConfigQueryService {
    fs: Arc<dyn FileSystem>,
    api: Arc<dyn ConfigApi>,
}

impl ConfigQueryService {
    pub fn new(fs: Arc<dyn FileSystem>, api: Arc<dyn ConfigApi>) -> Self {
        Self { fs, api }
    }

    /// Submit the document at `path` and require it to be valid.
    pub fn query(&self, path: &Path) -> ApplicationResult<ConfigResponse> {
        debug!("query: path={}", path.display());
        let text = self.read_document(path)?;

        let response = self.api.build_config(&text)?;

        if !response.valid {
            return Err(ApplicationError::ValidationFailed {
                path: path.to_path_buf(),
                errors: response.errors,
            });
        }
        Ok(response)
    }

    /// Validate the document; nothing is returned on success.
    pub fn validate(&self, path: &Path) -> ApplicationResult<()> {
        self.query(path).map(|_| ())
    }

    /// Expanded form of the document as produced by the service.
    pub fn expand(&self, path: &Path) -> ApplicationResult<String> {
        let response = self.query(path)?;
        response
            .output_yaml
            .ok_or_else(|| ApiError::MissingOutput(path.to_path_buf()).into())
    }

    fn read_document(&self, path: &Path) -> ApplicationResult<String> {
        if path.as_os_str() == STDIN_PATH {
            return self.fs.read_stdin().with_path_context("read config", path);
        }
        self.fs.read_to_string(path).with_path_context("read config", path)
    }
}
