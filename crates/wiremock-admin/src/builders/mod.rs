//! Fluent builders for request patterns, response definitions and stub mappings.

pub mod request;
pub mod response;
pub mod stub;

pub use request::{
    for_delete_request_matching_url, for_get_request_matching_url, for_post_request_matching_url,
    for_request_matching_url, request_for, RequestPatternBuilder,
};
pub use response::{
    for_connection_reset_by_peer_fault, for_empty_response_fault, for_error_response,
    for_malformed_response_chunk_fault, for_not_found_response, for_ok_response,
    for_random_data_then_close_fault, response_for, ResponseBody, ResponseDefinitionBuilder,
};
pub use stub::{
    stub_for, stub_for_not_found_response, stub_for_ok_response_with_body,
    stub_for_ok_response_with_referred_body, StubMappingBuilder,
};
