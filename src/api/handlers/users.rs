//! User CRUD handlers: list, get, create, delete.
//!
//! Each handler is a thin translation between HTTP and one
//! [`crate::persistence::UserStore`] call.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::CreateUserRequest;
use crate::api::extract::{ApiJson, UserIdPath};
use crate::app_state::AppState;
use crate::domain::User;
use crate::error::{ApiError, ErrorResponse};

/// `GET /users` — List every user.
///
/// # Errors
///
/// Returns [`ApiError::StorageUnavailable`] if the query fails.
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    summary = "List users",
    description = "Returns every stored user. An empty table yields an empty array.",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.list_all().await?;
    tracing::debug!(count = users.len(), "listed users");
    Ok(Json(users))
}

/// `GET /users/{id}` — Fetch one user.
///
/// # Errors
///
/// Returns [`ApiError::UserNotFound`] if no user has the id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    summary = "Get a user",
    params(
        ("id" = i32, Path, description = "User id"),
    ),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user))
}

/// `POST /users` — Create a user.
///
/// # Errors
///
/// Returns [`ApiError::MalformedRequest`] for an unreadable body and
/// [`ApiError::ConstraintViolation`] when storage rejects the values.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    summary = "Create a user",
    description = "Inserts a user and returns it with the id assigned by storage. Without `age` the schema default (18) applies unless the service runs with `MISSING_AGE_POLICY=reject`.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 422, description = "Schema constraint violated", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_user = req.into_new_user(state.missing_age_policy)?;
    let user = state.users.insert(new_user).await?;
    tracing::info!(id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `DELETE /users/{id}` — Delete a user and return its last values.
///
/// # Errors
///
/// Returns [`ApiError::UserNotFound`] if no user has the id.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    summary = "Delete a user",
    params(
        ("id" = i32, Path, description = "User id"),
    ),
    responses(
        (status = 200, description = "The deleted user", body = User),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.delete_by_id(id).await?;
    tracing::info!(id = %user.id, "user deleted");
    Ok(Json(user))
}

/// User resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
}
