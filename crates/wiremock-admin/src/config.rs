//! Client configuration.
//!
//! ```yaml
//! base_url: "http://localhost:8080"
//! files_root: "./stubs/__files"
//! browser_name: "chrome"
//! timeout_secs: 10
//! ```

use crate::error::AdminError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Scheme, host and port of the mock server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fallback directory for resolving relative body file references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_root: Option<PathBuf>,

    /// Browser whose `User-Agent` the request journal helper filters on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,

    /// Per-request timeout; unset leaves reqwest's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            files_root: None,
            browser_name: None,
            timeout_secs: None,
        }
    }
}

impl AdminConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_files_root(mut self, files_root: impl Into<PathBuf>) -> Self {
        self.files_root = Some(files_root.into());
        self
    }

    pub fn with_browser_name(mut self, browser_name: impl Into<String>) -> Self {
        self.browser_name = Some(browser_name.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Load and validate a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AdminError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AdminError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&contents)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, AdminError> {
        let config: AdminConfig = serde_yaml::from_str(contents)
            .map_err(|e| AdminError::Parse(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AdminError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AdminError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AdminError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.base_url
            )));
        }
        if url.host().is_none() {
            return Err(AdminError::InvalidUrl(format!(
                "{}: missing host",
                self.base_url
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(AdminError::Parse(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.files_root.is_none());
        assert!(config.browser_name.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
base_url: "http://wiremock:9090"
files_root: "./stubs/__files"
browser_name: "firefox"
timeout_secs: 5
"#;
        let config = AdminConfig::from_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://wiremock:9090");
        assert_eq!(config.files_root, Some(PathBuf::from("./stubs/__files")));
        assert_eq!(config.browser_name.as_deref(), Some("firefox"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = AdminConfig::from_str("browser_name: chrome\n").unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = AdminConfig::from_str("base_url: \"ftp://example.com\"\n");
        assert!(matches!(result, Err(AdminError::InvalidUrl(_))));

        let result = AdminConfig::from_str("base_url: \"not-a-valid-url\"\n");
        assert!(matches!(result, Err(AdminError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = AdminConfig::from_str("timeout_secs: 0\n");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("timeout_secs must be greater than 0"));
    }

    #[test]
    fn test_from_missing_file() {
        let result = AdminConfig::from_file("/nonexistent/wiremock-admin.yaml");
        assert!(matches!(result, Err(AdminError::Io { .. })));
    }
}
