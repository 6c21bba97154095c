//! Match expressions used to test a single field of an incoming request.
//!
//! A [`MatchExpression`] is a condition tag, a comparison value and an ordered
//! list of auxiliary flags. It is turned into its wire shape by
//! [`MatchExpression::to_document`], which puts the condition and the flags
//! side by side in one JSON object:
//!
//! ```
//! use serde_json::json;
//! use wiremock_admin::matchers::equal_to_ignore_cases;
//!
//! let doc = equal_to_ignore_cases("Bearer abc").to_document();
//! assert_eq!(doc, json!({"equalTo": "Bearer abc", "caseInsensitive": true}));
//! ```

use serde_json::{Map, Value};

/// Condition a match expression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchCondition {
    EqualTo,
    Contains,
    Matches,
    DoesNotMatch,
    Absent,
    EqualToJson,
    MatchesJsonPath,
    EqualToXml,
    MatchesXPath,
}

impl MatchCondition {
    /// Key used for this condition in the admin API documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCondition::EqualTo => "equalTo",
            MatchCondition::Contains => "contains",
            MatchCondition::Matches => "matches",
            MatchCondition::DoesNotMatch => "doesNotMatch",
            MatchCondition::Absent => "absent",
            MatchCondition::EqualToJson => "equalToJson",
            MatchCondition::MatchesJsonPath => "matchesJsonPath",
            MatchCondition::EqualToXml => "equalToXml",
            MatchCondition::MatchesXPath => "matchesXPath",
        }
    }
}

impl std::fmt::Display for MatchCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single matching condition plus its auxiliary flags.
///
/// Flags are stored as given; which ones make sense for a condition is left
/// to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpression {
    condition: MatchCondition,
    value: Value,
    properties: Vec<(String, Value)>,
}

impl MatchExpression {
    pub fn new(condition: MatchCondition, value: impl Into<Value>) -> Self {
        Self {
            condition,
            value: value.into(),
            properties: Vec::new(),
        }
    }

    /// Set an auxiliary flag, replacing an earlier value with the same name.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((name, value)),
        }
        self
    }

    pub fn condition(&self) -> MatchCondition {
        self.condition
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn properties(&self) -> &[(String, Value)] {
        &self.properties
    }

    /// Flatten into `{<condition>: value, <flag>: <flag value>, ...}`.
    pub fn to_document(&self) -> Value {
        let mut document = Map::new();
        self.write_into(&mut document);
        Value::Object(document)
    }

    fn write_into(&self, document: &mut Map<String, Value>) {
        document.insert(self.condition.as_str().to_string(), self.value.clone());
        for (name, value) in &self.properties {
            document.insert(name.clone(), value.clone());
        }
    }
}

/// How a URL match expression compares the request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlMatchKind {
    /// Full URL including the query string, compared for equality.
    EqualTo,
    /// Full URL matched against a regular expression.
    Pattern,
    /// Path only, compared for equality.
    PathEqualTo,
    /// Path only, matched against a regular expression.
    PathPattern,
}

impl UrlMatchKind {
    /// Name of the request pattern field this kind writes.
    pub fn field_name(&self) -> &'static str {
        match self {
            UrlMatchKind::EqualTo => "url",
            UrlMatchKind::Pattern => "urlPattern",
            UrlMatchKind::PathEqualTo => "urlPath",
            UrlMatchKind::PathPattern => "urlPathPattern",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatchExpression {
    url: String,
    kind: UrlMatchKind,
}

impl UrlMatchExpression {
    pub fn new(url: impl Into<String>, kind: UrlMatchKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> UrlMatchKind {
        self.kind
    }
}

pub fn url_equal_to(url: impl Into<String>) -> UrlMatchExpression {
    UrlMatchExpression::new(url, UrlMatchKind::EqualTo)
}

pub fn url_matching(regex: impl Into<String>) -> UrlMatchExpression {
    UrlMatchExpression::new(regex, UrlMatchKind::Pattern)
}

pub fn url_path_equal_to(path: impl Into<String>) -> UrlMatchExpression {
    UrlMatchExpression::new(path, UrlMatchKind::PathEqualTo)
}

pub fn url_path_matching(regex: impl Into<String>) -> UrlMatchExpression {
    UrlMatchExpression::new(regex, UrlMatchKind::PathPattern)
}

/// Case-sensitive equality.
pub fn equal_to(expected: impl Into<String>) -> MatchExpression {
    MatchExpression::new(MatchCondition::EqualTo, expected.into())
        .with_property("caseInsensitive", false)
}

pub fn equal_to_ignore_cases(expected: impl Into<String>) -> MatchExpression {
    MatchExpression::new(MatchCondition::EqualTo, expected.into())
        .with_property("caseInsensitive", true)
}

pub fn contains(expected: impl Into<String>) -> MatchExpression {
    MatchExpression::new(MatchCondition::Contains, expected.into())
}

pub fn matches(regex: impl Into<String>) -> MatchExpression {
    MatchExpression::new(MatchCondition::Matches, regex.into())
}

pub fn does_not_match(regex: impl Into<String>) -> MatchExpression {
    MatchExpression::new(MatchCondition::DoesNotMatch, regex.into())
}

/// The field must not be present.
pub fn absent() -> MatchExpression {
    MatchExpression::new(MatchCondition::Absent, true)
}

/// The field must be present, whatever its value.
pub fn not_absent() -> MatchExpression {
    MatchExpression::new(MatchCondition::Absent, false)
}

/// JSON body equality, tolerant of array order and extra elements.
pub fn body_equal_to_json(json: Value) -> MatchExpression {
    body_equal_to_json_with(json, true, true)
}

pub fn body_equal_to_json_with(
    json: Value,
    ignore_array_order: bool,
    ignore_extra_elements: bool,
) -> MatchExpression {
    MatchExpression::new(MatchCondition::EqualToJson, json)
        .with_property("ignoreArrayOrder", ignore_array_order)
        .with_property("ignoreExtraElements", ignore_extra_elements)
}

/// Same as [`body_equal_to_json`], parsing the expected document from text.
pub fn body_equal_to_json_string(json: &str) -> serde_json::Result<MatchExpression> {
    let parsed: Value = serde_json::from_str(json)?;
    Ok(body_equal_to_json(parsed))
}

pub fn body_matches_json_path(json_path: impl Into<String>) -> MatchExpression {
    MatchExpression::new(MatchCondition::MatchesJsonPath, json_path.into())
}

/// Apply `expression` to the value selected by `json_path`.
///
/// Produces `{matchesJsonPath: {expression: <path>, <condition>: <value>}}`.
pub fn body_matches_json_path_expression(
    json_path: impl Into<String>,
    expression: MatchExpression,
) -> MatchExpression {
    nested_expression(MatchCondition::MatchesJsonPath, json_path.into(), &expression)
}

/// Placeholder settings for XML body equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlPlaceholders {
    pub enable_placeholders: bool,
    pub opening_delimiter_regex: Option<String>,
    pub closing_delimiter_regex: Option<String>,
    pub exempted_comparisons: Option<Vec<String>>,
}

pub fn body_equal_to_xml_string(xml: impl Into<String>) -> MatchExpression {
    body_equal_to_xml_string_with(xml, XmlPlaceholders::default())
}

pub fn body_equal_to_xml_string_with(
    xml: impl Into<String>,
    placeholders: XmlPlaceholders,
) -> MatchExpression {
    let mut expression = MatchExpression::new(MatchCondition::EqualToXml, xml.into())
        .with_property("enablePlaceholders", placeholders.enable_placeholders);
    if let Some(opening) = placeholders.opening_delimiter_regex {
        expression = expression.with_property("placeholderOpeningDelimiterRegex", opening);
    }
    if let Some(closing) = placeholders.closing_delimiter_regex {
        expression = expression.with_property("placeholderClosingDelimiterRegex", closing);
    }
    if let Some(exempted) = placeholders.exempted_comparisons {
        expression = expression.with_property("exemptedComparisons", exempted);
    }
    expression
}

pub fn body_matches_xpath(xpath: impl Into<String>) -> MatchExpression {
    MatchExpression::new(MatchCondition::MatchesXPath, xpath.into())
}

/// Apply `expression` to the node selected by `xpath`.
pub fn body_matches_xpath_expression(
    xpath: impl Into<String>,
    expression: MatchExpression,
) -> MatchExpression {
    nested_expression(MatchCondition::MatchesXPath, xpath.into(), &expression)
}

fn nested_expression(
    outer: MatchCondition,
    selector: String,
    inner: &MatchExpression,
) -> MatchExpression {
    let mut wrapper = Map::new();
    wrapper.insert("expression".to_string(), Value::String(selector));
    inner.write_into(&mut wrapper);
    MatchExpression::new(outer, Value::Object(wrapper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_not_absent_share_condition() {
        assert_eq!(absent().to_document(), json!({"absent": true}));
        assert_eq!(not_absent().to_document(), json!({"absent": false}));
        assert_eq!(absent().condition(), not_absent().condition());
    }

    #[test]
    fn test_equal_to_case_flags() {
        assert_eq!(
            equal_to("value").to_document(),
            json!({"equalTo": "value", "caseInsensitive": false})
        );
        assert_eq!(
            equal_to_ignore_cases("value").to_document(),
            json!({"equalTo": "value", "caseInsensitive": true})
        );
    }

    #[test]
    fn test_simple_string_conditions() {
        assert_eq!(contains("abc").to_document(), json!({"contains": "abc"}));
        assert_eq!(matches("[a-z]+").to_document(), json!({"matches": "[a-z]+"}));
        assert_eq!(
            does_not_match("^x").to_document(),
            json!({"doesNotMatch": "^x"})
        );
    }

    #[test]
    fn test_json_string_matches_parsed_json() {
        let from_text = body_equal_to_json_string(r#"{"a":1}"#).unwrap();
        let from_value = body_equal_to_json(json!({"a": 1}));

        assert_eq!(from_text, from_value);
        assert_eq!(
            from_text.to_document(),
            json!({"equalToJson": {"a": 1}, "ignoreArrayOrder": true, "ignoreExtraElements": true})
        );
    }

    #[test]
    fn test_json_string_rejects_invalid_json() {
        assert!(body_equal_to_json_string("{not json").is_err());
    }

    #[test]
    fn test_json_path_expression_nests_inner_condition() {
        let expression = body_matches_json_path_expression("$.name", contains("someValue"));
        assert_eq!(
            expression.to_document(),
            json!({"matchesJsonPath": {"expression": "$.name", "contains": "someValue"}})
        );
    }

    #[test]
    fn test_xpath_expression_keeps_inner_flags() {
        let expression = body_matches_xpath_expression("//todo/text()", equal_to("done"));
        assert_eq!(
            expression.to_document(),
            json!({"matchesXPath": {
                "expression": "//todo/text()",
                "equalTo": "done",
                "caseInsensitive": false
            }})
        );
    }

    #[test]
    fn test_xml_placeholders() {
        assert_eq!(
            body_equal_to_xml_string("<a/>").to_document(),
            json!({"equalToXml": "<a/>", "enablePlaceholders": false})
        );

        let placeholders = XmlPlaceholders {
            enable_placeholders: true,
            opening_delimiter_regex: Some("\\[\\[".to_string()),
            closing_delimiter_regex: Some("]]".to_string()),
            exempted_comparisons: Some(vec!["NAMESPACE_URI".to_string()]),
        };
        assert_eq!(
            body_equal_to_xml_string_with("<a/>", placeholders).to_document(),
            json!({
                "equalToXml": "<a/>",
                "enablePlaceholders": true,
                "placeholderOpeningDelimiterRegex": "\\[\\[",
                "placeholderClosingDelimiterRegex": "]]",
                "exemptedComparisons": ["NAMESPACE_URI"]
            })
        );
    }

    #[test]
    fn test_with_property_replaces_existing_flag() {
        let expression = equal_to("x").with_property("caseInsensitive", true);
        assert_eq!(expression.properties().len(), 1);
        assert_eq!(expression.properties()[0].1, json!(true));
    }

    #[test]
    fn test_url_kinds_map_to_field_names() {
        assert_eq!(url_equal_to("/a").kind().field_name(), "url");
        assert_eq!(url_matching("/a.*").kind().field_name(), "urlPattern");
        assert_eq!(url_path_equal_to("/a").kind().field_name(), "urlPath");
        assert_eq!(url_path_matching("/a.*").kind().field_name(), "urlPathPattern");
    }
}
