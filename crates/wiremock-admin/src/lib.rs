//! Fluent client for the WireMock admin REST API.
//!
//! Build stub mappings with the builders and match expressions, then push
//! them to a running server with [`AdminClient`]. [`RequestJournal`] counts
//! and searches received requests, optionally scoped to one browser.
//!
//! # Example
//!
//! ```no_run
//! use wiremock_admin::builders::{for_get_request_matching_url, for_ok_response, stub_for};
//! use wiremock_admin::matchers::equal_to;
//! use wiremock_admin::{AdminClient, AdminConfig};
//!
//! # async fn run() -> Result<(), wiremock_admin::AdminError> {
//! let client = AdminClient::new(&AdminConfig::new("http://localhost:8080"))?;
//!
//! let request = for_get_request_matching_url("/api/users")
//!     .with_header("Accept", equal_to("application/json"));
//! let mapping = stub_for(request, for_ok_response(Some(r#"{"users":[]}"#)));
//! client.add_mapping(&mapping).await?;
//!
//! let journal = client.request_journal(Some("chrome"));
//! let count = journal
//!     .get_request_count(&for_get_request_matching_url("/api/users").build())
//!     .await;
//! println!("{count} matching requests");
//! # Ok(())
//! # }
//! ```

pub mod builders;
mod client;
mod config;
mod error;
mod journal;
pub mod matchers;
pub mod model;
mod paths;
mod transport;

#[cfg(test)]
mod test_support;

// Re-export public types
pub use client::AdminClient;
pub use config::AdminConfig;
pub use error::{AdminError, ErrorSource, ValidationErrorDetail, ValidationErrorResponse};
pub use journal::RequestJournal;
pub use transport::{AdminRequest, AdminTransport, HttpTransport, Payload, RequestBody};
