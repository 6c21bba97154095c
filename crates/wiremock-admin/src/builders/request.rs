//! Fluent builder for request patterns.

use crate::matchers::{url_equal_to, MatchExpression, UrlMatchExpression, UrlMatchKind};
use crate::model::{BasicAuthCredentials, RequestMethod, RequestPattern};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Builds a [`RequestPattern`] from a method, a URL condition and any number
/// of header, cookie, query parameter and body conditions.
#[derive(Debug, Clone)]
pub struct RequestPatternBuilder {
    method: RequestMethod,
    url: UrlMatchExpression,
    query_parameters: BTreeMap<String, MatchExpression>,
    headers: BTreeMap<String, MatchExpression>,
    cookies: BTreeMap<String, MatchExpression>,
    body_patterns: Vec<MatchExpression>,
    basic_auth: Option<BasicAuthCredentials>,
}

impl RequestPatternBuilder {
    pub fn new(method: RequestMethod, url: UrlMatchExpression) -> Self {
        Self {
            method,
            url,
            query_parameters: BTreeMap::new(),
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            body_patterns: Vec::new(),
            basic_auth: None,
        }
    }

    /// Match a header. A later condition for the same name replaces this one.
    pub fn with_header(mut self, name: impl Into<String>, expression: MatchExpression) -> Self {
        self.headers.insert(name.into(), expression);
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, expression: MatchExpression) -> Self {
        self.cookies.insert(name.into(), expression);
        self
    }

    pub fn with_query_param(
        mut self,
        name: impl Into<String>,
        expression: MatchExpression,
    ) -> Self {
        self.query_parameters.insert(name.into(), expression);
        self
    }

    /// Add a body condition. All body conditions must hold for a match.
    pub fn with_request_body(mut self, expression: MatchExpression) -> Self {
        self.body_patterns.push(expression);
        self
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some(BasicAuthCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn build(&self) -> RequestPattern {
        let mut pattern = RequestPattern {
            method: Some(self.method),
            headers: named_conditions(&self.headers),
            query_parameters: named_conditions(&self.query_parameters),
            cookies: named_conditions(&self.cookies),
            basic_auth_credentials: self.basic_auth.clone(),
            ..Default::default()
        };

        let url = Some(self.url.url().to_string());
        match self.url.kind() {
            UrlMatchKind::EqualTo => pattern.url = url,
            UrlMatchKind::Pattern => pattern.url_pattern = url,
            UrlMatchKind::PathEqualTo => pattern.url_path = url,
            UrlMatchKind::PathPattern => pattern.url_path_pattern = url,
        }

        if !self.body_patterns.is_empty() {
            pattern.body_patterns = Some(
                self.body_patterns
                    .iter()
                    .map(MatchExpression::to_document)
                    .collect(),
            );
        }

        pattern
    }
}

/// `None` when empty so the field is left out of the document entirely.
fn named_conditions(conditions: &BTreeMap<String, MatchExpression>) -> Option<Map<String, Value>> {
    if conditions.is_empty() {
        return None;
    }
    Some(
        conditions
            .iter()
            .map(|(name, expression)| (name.clone(), expression.to_document()))
            .collect(),
    )
}

pub fn request_for(method: RequestMethod, url: UrlMatchExpression) -> RequestPatternBuilder {
    RequestPatternBuilder::new(method, url)
}

/// Any method, URL equal to `url`.
pub fn for_request_matching_url(url: impl Into<String>) -> RequestPatternBuilder {
    request_for(RequestMethod::Any, url_equal_to(url))
}

pub fn for_get_request_matching_url(url: impl Into<String>) -> RequestPatternBuilder {
    request_for(RequestMethod::Get, url_equal_to(url))
}

pub fn for_post_request_matching_url(url: impl Into<String>) -> RequestPatternBuilder {
    request_for(RequestMethod::Post, url_equal_to(url))
}

pub fn for_delete_request_matching_url(url: impl Into<String>) -> RequestPatternBuilder {
    request_for(RequestMethod::Delete, url_equal_to(url))
}
