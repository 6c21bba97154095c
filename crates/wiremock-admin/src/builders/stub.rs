//! Stub mappings: one request pattern paired with one response definition.

use super::request::RequestPatternBuilder;
use super::response::{for_not_found_response, for_ok_response, ResponseDefinitionBuilder};
use crate::model::StubMapping;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct StubMappingBuilder {
    request: RequestPatternBuilder,
    response: ResponseDefinitionBuilder,
    id: Option<String>,
    priority: Option<u32>,
    persistent: Option<bool>,
    scenario_name: Option<String>,
    required_scenario_state: Option<String>,
    new_scenario_state: Option<String>,
    metadata: Option<Value>,
}

impl StubMappingBuilder {
    pub fn new(request: RequestPatternBuilder, response: ResponseDefinitionBuilder) -> Self {
        Self {
            request,
            response,
            id: None,
            priority: None,
            persistent: None,
            scenario_name: None,
            required_scenario_state: None,
            new_scenario_state: None,
            metadata: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Lower values win when several stubs match the same request.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = Some(persistent);
        self
    }

    pub fn in_scenario(mut self, scenario_name: impl Into<String>) -> Self {
        self.scenario_name = Some(scenario_name.into());
        self
    }

    pub fn when_scenario_state_is(mut self, state: impl Into<String>) -> Self {
        self.required_scenario_state = Some(state.into());
        self
    }

    pub fn will_set_state_to(mut self, state: impl Into<String>) -> Self {
        self.new_scenario_state = Some(state.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn build(&self) -> StubMapping {
        StubMapping {
            id: self.id.clone(),
            priority: self.priority,
            persistent: self.persistent,
            scenario_name: self.scenario_name.clone(),
            required_scenario_state: self.required_scenario_state.clone(),
            new_scenario_state: self.new_scenario_state.clone(),
            metadata: self.metadata.clone(),
            request: self.request.build(),
            response: self.response.build(),
            ..Default::default()
        }
    }
}

pub fn stub_for(
    request: RequestPatternBuilder,
    response: ResponseDefinitionBuilder,
) -> StubMapping {
    StubMappingBuilder::new(request, response).build()
}

pub fn stub_for_ok_response_with_body(
    request: RequestPatternBuilder,
    body: Option<&str>,
) -> StubMapping {
    stub_for(request, for_ok_response(body))
}

/// 200 response whose body is read from `file_name` in the server's file store.
pub fn stub_for_ok_response_with_referred_body(
    request: RequestPatternBuilder,
    file_name: impl Into<String>,
) -> StubMapping {
    stub_for(request, for_ok_response(None).with_referred_body(file_name))
}

pub fn stub_for_not_found_response(request: RequestPatternBuilder) -> StubMapping {
    stub_for(request, for_not_found_response())
}
