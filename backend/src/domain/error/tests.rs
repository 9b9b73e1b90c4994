//! Tests for the error payload constructors and serde contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_replaces_blank_messages() {
    let err = Error::new(ErrorCode::InternalError, "  ");
    assert_eq!(err.message(), FALLBACK_MESSAGE);
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn with_trace_id_ignores_blank_values(base_error: Error) {
    let err = base_error.with_trace_id(" ");
    assert!(err.trace_id().is_none());
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::upstream_unavailable("down") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn decoding_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let raw = json!({ "code": "not_found", "message": "missing" });

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(raw).expect("valid payload decodes")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_camel_case_and_omits_empty_fields(expected_trace_id: String) {
    let error = Error::unknown_country("unknown country: Atlantis").with_trace_id(expected_trace_id);
    let value = serde_json::to_value(&error).expect("serialises");

    assert_eq!(
        value,
        json!({
            "code": "unknown_country",
            "message": "unknown country: Atlantis",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
fn decoding_rejects_blank_messages() {
    let raw = json!({ "code": "invalid_request", "message": " " });
    assert!(serde_json::from_value::<Error>(raw).is_err());
}
