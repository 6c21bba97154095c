//! Wire documents exchanged with the admin API.
//!
//! Builders produce these; the client serializes them with `serde_json` and
//! decodes the server's replies back into them. Optional fields are skipped
//! when unset so a built document only carries what was configured.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Request side
// ============================================================================

/// HTTP method a request pattern matches. `Any` matches every method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
    Any,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Patch => "PATCH",
            RequestMethod::Options => "OPTIONS",
            RequestMethod::Head => "HEAD",
            RequestMethod::Trace => "TRACE",
            RequestMethod::Any => "ANY",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            "PUT" => Ok(RequestMethod::Put),
            "DELETE" => Ok(RequestMethod::Delete),
            "PATCH" => Ok(RequestMethod::Patch),
            "OPTIONS" => Ok(RequestMethod::Options),
            "HEAD" => Ok(RequestMethod::Head),
            "TRACE" => Ok(RequestMethod::Trace),
            "ANY" => Ok(RequestMethod::Any),
            other => Err(format!("unknown request method: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: String,
}

/// Request pattern document. At most one of the four url fields is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<RequestMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_patterns: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth_credentials: Option<BasicAuthCredentials>,
    /// Match conditions without a typed field (form parameters, multipart
    /// patterns, path templates and so on), passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Response side
// ============================================================================

/// Canned connection faults. Serialized as the ordinal; names are accepted
/// when decoding since the server echoes them back that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    ConnectionResetByPeer,
    EmptyResponse,
    MalformedResponseChunk,
    RandomDataThenClose,
}

impl Fault {
    pub fn ordinal(&self) -> u8 {
        match self {
            Fault::ConnectionResetByPeer => 0,
            Fault::EmptyResponse => 1,
            Fault::MalformedResponseChunk => 2,
            Fault::RandomDataThenClose => 3,
        }
    }

    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        match ordinal {
            0 => Some(Fault::ConnectionResetByPeer),
            1 => Some(Fault::EmptyResponse),
            2 => Some(Fault::MalformedResponseChunk),
            3 => Some(Fault::RandomDataThenClose),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Fault::ConnectionResetByPeer => "CONNECTION_RESET_BY_PEER",
            Fault::EmptyResponse => "EMPTY_RESPONSE",
            Fault::MalformedResponseChunk => "MALFORMED_RESPONSE_CHUNK",
            Fault::RandomDataThenClose => "RANDOM_DATA_THEN_CLOSE",
        }
    }
}

impl FromStr for Fault {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECTION_RESET_BY_PEER" => Ok(Fault::ConnectionResetByPeer),
            "EMPTY_RESPONSE" => Ok(Fault::EmptyResponse),
            "MALFORMED_RESPONSE_CHUNK" => Ok(Fault::MalformedResponseChunk),
            "RANDOM_DATA_THEN_CLOSE" => Ok(Fault::RandomDataThenClose),
            other => Err(format!("unknown fault: {other}")),
        }
    }
}

impl Serialize for Fault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for Fault {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Ordinal(u64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Ordinal(ordinal) => Fault::from_ordinal(ordinal)
                .ok_or_else(|| de::Error::custom(format!("unknown fault ordinal: {ordinal}"))),
            Repr::Name(name) => name.parse().map_err(de::Error::custom),
        }
    }
}

/// Random delay applied before the response is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum DelayDistribution {
    Lognormal { median: u64, sigma: f64 },
    Uniform { lower: u64, upper: u64 },
    Fixed { milliseconds: u64 },
    /// A distribution type this crate has no variant for, kept as received.
    Other(Value),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum KnownDistribution {
    Lognormal { median: u64, sigma: f64 },
    Uniform { lower: u64, upper: u64 },
    Fixed { milliseconds: u64 },
}

impl Serialize for DelayDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let known = match self {
            DelayDistribution::Lognormal { median, sigma } => KnownDistribution::Lognormal {
                median: *median,
                sigma: *sigma,
            },
            DelayDistribution::Uniform { lower, upper } => KnownDistribution::Uniform {
                lower: *lower,
                upper: *upper,
            },
            DelayDistribution::Fixed { milliseconds } => KnownDistribution::Fixed {
                milliseconds: *milliseconds,
            },
            DelayDistribution::Other(value) => return value.serialize(serializer),
        };
        known.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DelayDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let distribution = match serde_json::from_value::<KnownDistribution>(value.clone()) {
            Ok(KnownDistribution::Lognormal { median, sigma }) => {
                DelayDistribution::Lognormal { median, sigma }
            }
            Ok(KnownDistribution::Uniform { lower, upper }) => {
                DelayDistribution::Uniform { lower, upper }
            }
            Ok(KnownDistribution::Fixed { milliseconds }) => {
                DelayDistribution::Fixed { milliseconds }
            }
            Err(_) => DelayDistribution::Other(value),
        };
        Ok(distribution)
    }
}

/// Response definition document. At most one body field is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_delay_milliseconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_distribution: Option<DelayDistribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_proxy_request_headers: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<Fault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer_parameters: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Stub mappings and listings
// ============================================================================

/// A request pattern paired with the response it triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_scenario_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_scenario_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_serve_actions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub request: RequestPattern,
    #[serde(default)]
    pub response: ResponseDefinition,
    /// Server fields without a typed counterpart.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StubMapping {
    /// Name of the server-side file the response body is read from, if any.
    pub fn referred_body_file(&self) -> Option<&str> {
        self.response.body_file_name.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListStubMappingsResult {
    #[serde(default)]
    pub mappings: Vec<StubMapping>,
    #[serde(default)]
    pub meta: ListMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub possible_states: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioList {
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fault_serializes_as_ordinal() {
        let response = ResponseDefinition {
            fault: Some(Fault::MalformedResponseChunk),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"fault": 2}));
    }

    #[test]
    fn test_fault_accepts_ordinal_or_name() {
        let by_ordinal: Fault = serde_json::from_value(json!(3)).unwrap();
        let by_name: Fault = serde_json::from_value(json!("RANDOM_DATA_THEN_CLOSE")).unwrap();
        assert_eq!(by_ordinal, Fault::RandomDataThenClose);
        assert_eq!(by_name, Fault::RandomDataThenClose);

        assert!(serde_json::from_value::<Fault>(json!(7)).is_err());
        assert!(serde_json::from_value::<Fault>(json!("SLOW_LORIS")).is_err());
    }

    #[test]
    fn test_request_method_wire_names() {
        assert_eq!(serde_json::to_value(RequestMethod::Any).unwrap(), json!("ANY"));
        assert_eq!("delete".parse::<RequestMethod>().unwrap(), RequestMethod::Delete);
        assert!("FETCH".parse::<RequestMethod>().is_err());
    }

    #[test]
    fn test_delay_distribution_is_tagged_by_type() {
        let delay = DelayDistribution::Uniform {
            lower: 15,
            upper: 25,
        };
        assert_eq!(
            serde_json::to_value(&delay).unwrap(),
            json!({"type": "uniform", "lower": 15, "upper": 25})
        );
    }

    #[test]
    fn test_delay_distribution_keeps_fixed_and_unknown_types() {
        let fixed: DelayDistribution =
            serde_json::from_value(json!({"type": "fixed", "milliseconds": 100})).unwrap();
        assert_eq!(fixed, DelayDistribution::Fixed { milliseconds: 100 });

        let custom = json!({"type": "pareto", "scale": 3, "shape": 1.5});
        let decoded: DelayDistribution = serde_json::from_value(custom.clone()).unwrap();
        assert_eq!(decoded, DelayDistribution::Other(custom.clone()));
        assert_eq!(serde_json::to_value(&decoded).unwrap(), custom);
    }

    #[test]
    fn test_listing_with_fixed_delay_decodes() {
        let listing: ListStubMappingsResult = serde_json::from_value(json!({
            "mappings": [{
                "id": "a",
                "request": {"method": "GET", "url": "/slow"},
                "response": {
                    "status": 200,
                    "delayDistribution": {"type": "fixed", "milliseconds": 100}
                }
            }],
            "meta": {"total": 1}
        }))
        .unwrap();

        assert_eq!(
            listing.mappings[0].response.delay_distribution,
            Some(DelayDistribution::Fixed { milliseconds: 100 })
        );
    }

    #[test]
    fn test_unmodelled_fields_survive_round_trip() {
        let document = json!({
            "id": "a",
            "name": "form upload",
            "request": {
                "method": "POST",
                "urlPath": "/x",
                "formParameters": {"tag": {"equalTo": "y"}},
                "multipartPatterns": [{"matchingType": "ANY", "headers": {}}]
            },
            "response": {
                "status": 200,
                "chunkedDribbleDelay": {"numberOfChunks": 5, "totalDuration": 1000},
                "fromConfiguredStub": true
            }
        });

        let mapping: StubMapping = serde_json::from_value(document.clone()).unwrap();
        assert_eq!(mapping.request.url_path.as_deref(), Some("/x"));
        assert!(mapping.request.extra.contains_key("formParameters"));
        assert_eq!(mapping.extra.get("name"), Some(&json!("form upload")));

        assert_eq!(serde_json::to_value(&mapping).unwrap(), document);
    }

    #[test]
    fn test_decode_server_stub_mapping() {
        let mapping: StubMapping = serde_json::from_value(json!({
            "id": "76ada7b0-55ae-4229-91c4-396a36f18123",
            "uuid": "76ada7b0-55ae-4229-91c4-396a36f18123",
            "persistent": true,
            "request": {"url": "/api/sample", "method": "GET"},
            "response": {"status": 200, "bodyFileName": "sample.json", "fault": "EMPTY_RESPONSE"}
        }))
        .unwrap();

        assert_eq!(mapping.request.method, Some(RequestMethod::Get));
        assert_eq!(mapping.referred_body_file(), Some("sample.json"));
        assert_eq!(mapping.response.fault, Some(Fault::EmptyResponse));
        assert_eq!(mapping.persistent, Some(true));
    }

    #[test]
    fn test_empty_stub_mapping_omits_optional_fields() {
        assert_eq!(
            serde_json::to_value(StubMapping::default()).unwrap(),
            json!({"request": {}, "response": {}})
        );
    }
}
