//! Errors returned by the admin client.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the admin API
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("HTTP call to the admin API failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("admin API didn't return a 2xx code\nStatus: {status} - {reason}")]
    Status { status: u16, reason: String },
    #[error("admin API rejected the request: {}", describe_validation(.errors))]
    Validation { errors: Vec<ValidationErrorDetail> },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid admin URL: {0}")]
    InvalidUrl(String),
}

impl AdminError {
    /// True for 422 replies describing a structurally invalid document.
    pub fn is_validation(&self) -> bool {
        matches!(self, AdminError::Validation { .. })
    }

    /// HTTP status reported by the server, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Status { status, .. } => Some(*status),
            AdminError::Validation { .. } => Some(422),
            _ => None,
        }
    }
}

/// Error body of a 422 reply.
#[derive(Debug, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<ValidationErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationErrorDetail {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub source: Option<ErrorSource>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// JSON pointer to the offending field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorSource {
    #[serde(default)]
    pub pointer: Option<String>,
}

fn describe_validation(errors: &[ValidationErrorDetail]) -> String {
    match errors.first() {
        Some(first) => match &first.detail {
            Some(detail) => format!("{}: {}", first.title, detail),
            None => first.title.clone(),
        },
        None => "no error details".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_contains_title_and_detail() {
        let body = r#"{"errors":[{"code":10,"source":{"pointer":"/incorrectpointer"},
            "title":"Error parsing JSON","detail":"Unrecognized field \"incorrectpointer\""}]}"#;
        let parsed: ValidationErrorResponse = serde_json::from_str(body).unwrap();
        let error = AdminError::Validation {
            errors: parsed.errors,
        };

        let message = error.to_string();
        assert!(message.contains("Error parsing JSON"));
        assert!(message.contains("Unrecognized"));
        assert!(error.is_validation());
        assert_eq!(error.status(), Some(422));
    }

    #[test]
    fn test_status_message_embeds_code_and_reason() {
        let error = AdminError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert!(error.to_string().contains("503 - Service Unavailable"));
        assert!(!error.is_validation());
    }
}
