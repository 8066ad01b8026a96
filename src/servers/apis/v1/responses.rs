//! Common responses for the API v1 shared by all the contexts.
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Response status used when requests have only two possible results
/// `Ok` or `Error` and no data is returned.
#[derive(Serialize, Debug)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionStatus<'a> {
    Ok,
    Err { reason: std::borrow::Cow<'a, str> },
}

/// `400` response with a json error reason.
///
/// # Panics
///
/// Will panic if it can't convert the `ActionStatus` to json.
#[must_use]
pub fn invalid_form_response(reason: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&ActionStatus::Err { reason: reason.into() }).unwrap(),
    )
        .into_response()
}

/// `500` response with a json error reason.
///
/// # Panics
///
/// Will panic if it can't convert the `ActionStatus` to json.
#[must_use]
pub fn unhandled_rejection_response(reason: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&ActionStatus::Err { reason: reason.into() }).unwrap(),
    )
        .into_response()
}
