//! Todo CRUD handlers. Every route here requires a valid bearer token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use todo_auth::BearerAuth;
use todo_core::TodoPatch;

use crate::error::ApiError;
use crate::server::AppState;

use super::validation_error;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() || title.len() > 255 {
        return Err(validation_error(&[(
            "title",
            "Title is required and must be between 1 and 255 characters",
        )]));
    }
    Ok(())
}

fn validate_id(id: i64) -> Result<(), ApiError> {
    if id < 1 {
        return Err(validation_error(&[("id", "ID must be a positive integer")]));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    BearerAuth(claims): BearerAuth,
    Json(req): Json<CreateTodoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = req.title.trim();
    validate_title(title)?;
    let description = req.description.as_deref().map(str::trim);

    let todo = state
        .todos
        .create(claims.user_id(), title, description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Todo created successfully",
            "todo": todo,
        })),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    BearerAuth(claims): BearerAuth,
) -> Result<impl IntoResponse, ApiError> {
    let todos = state.todos.list(claims.user_id()).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Todos retrieved successfully",
            "todos": todos,
        })),
    ))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    BearerAuth(claims): BearerAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    validate_id(id)?;
    let todo = state.todos.get(claims.user_id(), id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Todo retrieved successfully",
            "todo": todo,
        })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    BearerAuth(claims): BearerAuth,
    Path(id): Path<i64>,
    Json(mut patch): Json<TodoPatch>,
) -> Result<impl IntoResponse, ApiError> {
    validate_id(id)?;
    if let Some(title) = patch.title.take() {
        let title = title.trim().to_string();
        validate_title(&title)?;
        patch.title = Some(title);
    }

    let todo = state.todos.update(claims.user_id(), id, &patch).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Todo updated successfully",
            "todo": todo,
        })),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    BearerAuth(claims): BearerAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    validate_id(id)?;
    state.todos.delete(claims.user_id(), id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Todo deleted successfully",
        })),
    ))
}

pub async fn toggle(
    State(state): State<AppState>,
    BearerAuth(claims): BearerAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    validate_id(id)?;
    let todo = state.todos.toggle_completed(claims.user_id(), id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Todo status toggled successfully",
            "todo": todo,
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("x").is_ok());
        assert!(validate_title(&"x".repeat(255)).is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_id_bounds() {
        assert!(validate_id(1).is_ok());
        assert!(validate_id(0).is_err());
        assert!(validate_id(-3).is_err());
    }
}
