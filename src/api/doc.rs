//! OpenAPI documentation for the REST API.

use utoipa::OpenApi;

use crate::api::dto::CreateUserRequest;
use crate::api::handlers::system::HealthResponse;
use crate::domain::User;
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI document covering the user and health endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "users-api",
        description = "CRUD over a single PostgreSQL users table."
    ),
    paths(
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::get_user,
        crate::api::handlers::users::create_user,
        crate::api::handlers::users::delete_user,
        crate::api::handlers::system::health_handler,
    ),
    components(schemas(User, CreateUserRequest, ErrorResponse, ErrorBody, HealthResponse)),
    tags(
        (name = "Users", description = "User records"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
