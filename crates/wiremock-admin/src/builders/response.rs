//! Fluent builder for response definitions.

use crate::model::{DelayDistribution, Fault, ResponseDefinition};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

/// The single body representation a response carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Json(Value),
    /// Name of a file in the server's `__files` store.
    File(String),
    /// Raw bytes, base64-encoded when the definition is built.
    Base64(Vec<u8>),
}

#[derive(Debug, Clone, Default)]
pub struct ResponseDefinitionBuilder {
    status: Option<u16>,
    status_message: Option<String>,
    body: Option<ResponseBody>,
    headers: Map<String, Value>,
    proxy_headers: Map<String, Value>,
    fixed_delay_ms: Option<u64>,
    delay_distribution: Option<DelayDistribution>,
    proxy_base_url: Option<String>,
    fault: Option<Fault>,
    transformers: Option<Vec<String>>,
    transformer_parameters: Map<String, Value>,
}

impl ResponseDefinitionBuilder {
    pub fn new(status: u16, status_message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            status_message: Some(status_message.into()),
            ..Default::default()
        }
    }

    /// Builder with no status at all, used for fault-only responses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the body with `body`; only the latest body survives.
    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_text_body(self, body: impl Into<String>) -> Self {
        self.with_body(ResponseBody::Text(body.into()))
    }

    pub fn with_json_body(self, body: Value) -> Self {
        self.with_body(ResponseBody::Json(body))
    }

    pub fn with_referred_body(self, file_name: impl Into<String>) -> Self {
        self.with_body(ResponseBody::File(file_name.into()))
    }

    pub fn with_base64_body(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.with_body(ResponseBody::Base64(bytes.into()))
    }

    /// Store `text` as a JSON body when it parses as JSON, as text otherwise.
    ///
    /// Note that `"42"` or `"true"` parse as JSON too.
    pub fn with_inferred_body(self, text: impl Into<String>) -> Self {
        let text = text.into();
        match serde_json::from_str::<Value>(&text) {
            Ok(json) => self.with_json_body(json),
            Err(_) => self.with_text_body(text),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Header added to the request forwarded to the proxy target.
    pub fn with_proxy_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.proxy_headers
            .insert(name.into(), Value::String(value.into()));
        self
    }

    pub fn with_delay(mut self, fixed_delay_ms: u64) -> Self {
        self.fixed_delay_ms = Some(fixed_delay_ms);
        self
    }

    pub fn with_delay_distribution(mut self, distribution: DelayDistribution) -> Self {
        self.delay_distribution = Some(distribution);
        self
    }

    pub fn with_proxy(mut self, proxy_base_url: impl Into<String>) -> Self {
        self.proxy_base_url = Some(proxy_base_url.into());
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn with_transformers<I, S>(mut self, transformers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transformers = Some(transformers.into_iter().map(Into::into).collect());
        self
    }

    /// Enable response templating. The server must run with local response
    /// templating turned on for this to take effect.
    pub fn with_response_template_transformer(self) -> Self {
        self.with_transformers(["response-template"])
    }

    pub fn with_transformer_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.transformer_parameters.insert(name.into(), value);
        self
    }

    pub fn build(&self) -> ResponseDefinition {
        let mut definition = ResponseDefinition {
            status: self.status,
            status_message: self.status_message.clone(),
            headers: non_empty(&self.headers),
            fixed_delay_milliseconds: self.fixed_delay_ms,
            delay_distribution: self.delay_distribution.clone(),
            proxy_base_url: self.proxy_base_url.clone(),
            additional_proxy_request_headers: non_empty(&self.proxy_headers),
            fault: self.fault,
            transformers: self.transformers.clone(),
            transformer_parameters: non_empty(&self.transformer_parameters),
            ..Default::default()
        };

        match &self.body {
            Some(ResponseBody::Text(text)) => definition.body = Some(text.clone()),
            Some(ResponseBody::Json(json)) => definition.json_body = Some(json.clone()),
            Some(ResponseBody::File(name)) => definition.body_file_name = Some(name.clone()),
            Some(ResponseBody::Base64(bytes)) => {
                definition.base64_body = Some(STANDARD.encode(bytes))
            }
            None => {}
        }

        definition
    }
}

fn non_empty(map: &Map<String, Value>) -> Option<Map<String, Value>> {
    (!map.is_empty()).then(|| map.clone())
}

/// Response with the given status, message and optional text body.
pub fn response_for(
    status: u16,
    status_message: impl Into<String>,
    body: Option<&str>,
) -> ResponseDefinitionBuilder {
    let builder = ResponseDefinitionBuilder::new(status, status_message);
    match body {
        Some(body) => builder.with_text_body(body),
        None => builder,
    }
}

pub fn for_ok_response(body: Option<&str>) -> ResponseDefinitionBuilder {
    response_for(200, "Ok", body)
}

pub fn for_not_found_response() -> ResponseDefinitionBuilder {
    response_for(404, "Not Found", None)
}

pub fn for_error_response(body: Option<&str>) -> ResponseDefinitionBuilder {
    response_for(500, "Internal Server Error", body)
}

pub fn for_connection_reset_by_peer_fault() -> ResponseDefinitionBuilder {
    ResponseDefinitionBuilder::empty().with_fault(Fault::ConnectionResetByPeer)
}

pub fn for_empty_response_fault() -> ResponseDefinitionBuilder {
    ResponseDefinitionBuilder::empty().with_fault(Fault::EmptyResponse)
}

pub fn for_malformed_response_chunk_fault() -> ResponseDefinitionBuilder {
    ResponseDefinitionBuilder::empty().with_fault(Fault::MalformedResponseChunk)
}

pub fn for_random_data_then_close_fault() -> ResponseDefinitionBuilder {
    ResponseDefinitionBuilder::empty().with_fault(Fault::RandomDataThenClose)
}
