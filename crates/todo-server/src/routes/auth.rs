//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::server::AppState;

use super::{is_valid_email, validation_error};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors: Vec<(&str, &str)> = Vec::new();

    let username = req.username.trim();
    if username.len() < 3 || username.len() > 30 {
        errors.push(("username", "Username must be between 3 and 30 characters"));
    }
    if !is_valid_email(req.email.trim()) {
        errors.push(("email", "Must be a valid email address"));
    }
    if req.password.len() < 6 {
        errors.push(("password", "Password must be at least 6 characters"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(validation_error(&errors))
    }
}

fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    let mut errors: Vec<(&str, &str)> = Vec::new();

    if !is_valid_email(req.email.trim()) {
        errors.push(("email", "Must be a valid email address"));
    }
    if req.password.len() < 6 {
        errors.push(("password", "Password must be at least 6 characters"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(validation_error(&errors))
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_register(&req)?;

    let (user, token) = state
        .auth_service
        .register(req.username.trim(), req.email.trim(), &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user,
            "token": token,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_login(&req)?;

    let (user, token) = state
        .auth_service
        .login(req.email.trim(), &req.password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Login successful",
            "user": user,
            "token": token,
        })),
    ))
}
