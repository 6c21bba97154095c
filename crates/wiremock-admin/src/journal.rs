//! Request-journal helper scoped to one browser.
//!
//! Test suites driving a real browser against the mock server usually only
//! care about the requests that browser made. [`RequestJournal`] adds a
//! `User-Agent` containment condition to every journal query so counts and
//! searches ignore traffic from other clients.

use crate::error::AdminError;
use crate::matchers::contains;
use crate::model::RequestPattern;
use crate::paths;
use crate::transport::{AdminRequest, AdminTransport, Payload};
use serde::Deserialize;
use serde_json::Map;
use std::sync::Arc;
use tracing::warn;

const USER_AGENT: &str = "User-Agent";

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

pub(crate) async fn count_requests(
    transport: &dyn AdminTransport,
    query: &RequestPattern,
) -> Result<u64, AdminError> {
    let request = AdminRequest::post(paths::REQUESTS_COUNT).with_json(query)?;
    let reply: CountResponse = transport.send(request).await?.decode()?;
    Ok(reply.count)
}

pub(crate) async fn find_requests(
    transport: &dyn AdminTransport,
    query: &RequestPattern,
) -> Result<Payload, AdminError> {
    let request = AdminRequest::post(paths::REQUESTS_FIND).with_json(query)?;
    transport.send(request).await
}

pub(crate) async fn fetch_journal(transport: &dyn AdminTransport) -> Result<Payload, AdminError> {
    transport.send(AdminRequest::get(paths::REQUESTS)).await
}

pub(crate) async fn reset_journal(transport: &dyn AdminTransport) -> Result<(), AdminError> {
    transport.send(AdminRequest::delete(paths::REQUESTS)).await?;
    Ok(())
}

#[derive(Clone)]
pub struct RequestJournal {
    transport: Arc<dyn AdminTransport>,
    browser_name: Option<String>,
}

impl RequestJournal {
    /// The browser name is title-cased; empty names disable the filter.
    pub fn new(transport: Arc<dyn AdminTransport>, browser_name: Option<&str>) -> Self {
        let browser_name = browser_name.map(title_case).filter(|name| !name.is_empty());
        Self {
            transport,
            browser_name,
        }
    }

    pub fn browser_name(&self) -> Option<&str> {
        self.browser_name.as_deref()
    }

    /// Number of journaled requests matching `query`.
    ///
    /// Failures are logged and reported as zero.
    pub async fn get_request_count(&self, query: &RequestPattern) -> u64 {
        let query = self.scoped(query);
        match count_requests(self.transport.as_ref(), &query).await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Failed to count journaled requests, reporting 0");
                0
            }
        }
    }

    pub async fn find_requests(&self, query: &RequestPattern) -> Result<Payload, AdminError> {
        find_requests(self.transport.as_ref(), &self.scoped(query)).await
    }

    pub async fn get_request_journal(&self) -> Result<Payload, AdminError> {
        fetch_journal(self.transport.as_ref()).await
    }

    pub async fn reset_request_journal(&self) -> Result<(), AdminError> {
        reset_journal(self.transport.as_ref()).await
    }

    fn scoped(&self, query: &RequestPattern) -> RequestPattern {
        let mut query = query.clone();
        if let Some(browser) = &self.browser_name {
            query
                .headers
                .get_or_insert_with(Map::new)
                .insert(USER_AGENT.to_string(), contains(browser.as_str()).to_document());
        }
        query
    }
}

fn title_case(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::for_get_request_matching_url;
    use crate::matchers::equal_to;
    use crate::test_support::RecordingTransport;
    use crate::transport::RequestBody;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    fn counting_transport(count: u64) -> Arc<RecordingTransport> {
        Arc::new(RecordingTransport::new(move |_| {
            Ok(Payload::Json(json!({ "count": count })))
        }))
    }

    fn sent_body(transport: &RecordingTransport) -> serde_json::Value {
        match transport.calls().remove(0).body {
            Some(RequestBody::Json(json)) => json,
            other => panic!("expected a JSON body, got {other:?}"),
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("myCustomBrowser"), "Mycustombrowser");
        assert_eq!(title_case("CHROME"), "Chrome");
        assert_eq!(title_case(""), "");
    }

    #[tokio::test]
    async fn test_count_adds_user_agent_and_keeps_headers() {
        let transport = counting_transport(100);
        let journal = RequestJournal::new(transport.clone(), Some("myCustomBrowser"));
        let query = for_get_request_matching_url("/some/thing")
            .with_header("Content-Type", equal_to("text/xml"))
            .build();

        assert_eq!(journal.get_request_count(&query).await, 100);
        assert_eq!(transport.call_lines(), vec!["POST /__admin/requests/count"]);
        assert_json_eq!(
            sent_body(&transport),
            json!({
                "method": "GET",
                "url": "/some/thing",
                "headers": {
                    "Content-Type": {"equalTo": "text/xml", "caseInsensitive": false},
                    "User-Agent": {"contains": "Mycustombrowser"}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_no_browser_leaves_query_untouched() {
        let transport = counting_transport(3);
        let journal = RequestJournal::new(transport.clone(), Some(""));
        assert!(journal.browser_name().is_none());

        let query = for_get_request_matching_url("/plain").build();
        assert_eq!(journal.get_request_count(&query).await, 3);
        assert_json_eq!(sent_body(&transport), json!({"method": "GET", "url": "/plain"}));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_count_failure_reports_zero() {
        let transport = Arc::new(RecordingTransport::new(|_| {
            Err(AdminError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
            })
        }));
        let journal = RequestJournal::new(transport, Some("firefox"));

        let count = journal
            .get_request_count(&for_get_request_matching_url("/x").build())
            .await;
        assert_eq!(count, 0);
        assert!(logs_contain("Failed to count journaled requests"));
    }

    #[tokio::test]
    async fn test_unparseable_count_reports_zero() {
        let transport = Arc::new(RecordingTransport::new(|_| {
            Ok(Payload::Text("not json".to_string()))
        }));
        let journal = RequestJournal::new(transport, None);
        let count = journal
            .get_request_count(&for_get_request_matching_url("/x").build())
            .await;
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_find_requests_is_scoped() {
        let transport = Arc::new(RecordingTransport::new(|_| {
            Ok(Payload::Json(json!({"requests": []})))
        }));
        let journal = RequestJournal::new(transport.clone(), Some("safari"));

        let reply = journal
            .find_requests(&for_get_request_matching_url("/y").build())
            .await
            .unwrap();
        assert_eq!(reply, Payload::Json(json!({"requests": []})));
        assert_eq!(transport.call_lines(), vec!["POST /__admin/requests/find"]);
        assert_eq!(
            sent_body(&transport)["headers"]["User-Agent"],
            json!({"contains": "Safari"})
        );
    }

    #[tokio::test]
    async fn test_cloned_journal_shares_transport_and_browser() {
        let transport = counting_transport(7);
        let journal = RequestJournal::new(transport.clone(), Some("EDGE"));
        let copy = journal.clone();

        assert_eq!(copy.browser_name(), Some("Edge"));
        assert_eq!(
            copy.get_request_count(&for_get_request_matching_url("/z").build()).await,
            7
        );
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_journal_passthrough() {
        let transport = Arc::new(RecordingTransport::empty());
        let journal = RequestJournal::new(transport.clone(), Some("chrome"));

        journal.get_request_journal().await.unwrap();
        journal.reset_request_journal().await.unwrap();
        assert_eq!(
            transport.call_lines(),
            vec!["GET /__admin/requests", "DELETE /__admin/requests"]
        );
    }
}
