use crate::models::ErrorResponse;
use rocket::http::Status;
use rocket::{catch, Request};

/// Renders errors raised outside the handlers (unknown routes, rejected
/// guards) in the same JSON shape the handlers use.
#[catch(default)]
pub fn json_error(status: Status, request: &Request<'_>) -> ErrorResponse {
    ErrorResponse::new(status, format!("{} {}", request.method(), request.uri()))
}
