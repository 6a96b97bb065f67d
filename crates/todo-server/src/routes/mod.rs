//! HTTP route handlers.

pub mod auth;
pub mod health;
pub mod todos;

use std::sync::OnceLock;

use axum::{
    Router,
    routing::{get, patch, post},
};
use regex::Regex;

use crate::error::ApiError;
use crate::server::AppState;

/// Assembles the route table. Middleware is layered in `server::build_app`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/todos", post(todos::create).get(todos::list))
        .route(
            "/todos/{id}",
            get(todos::get_by_id)
                .put(todos::update)
                .delete(todos::remove),
        )
        .route("/todos/{id}/toggle", patch(todos::toggle))
}

/// Syntactic email check; deliverability is not our problem.
pub(crate) fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    });
    re.is_match(email)
}

/// Builds the single 400 response the validators agree on:
/// `Validation error: field: message, field: message`.
pub(crate) fn validation_error(errors: &[(&str, &str)]) -> ApiError {
    let joined = errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ");
    ApiError::bad_request(format!("Validation error: {joined}"))
}
