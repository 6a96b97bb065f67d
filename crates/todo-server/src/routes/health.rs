use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub async fn health() -> impl IntoResponse {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "message": "Service is running",
            "timestamp": timestamp,
        })),
    )
}
