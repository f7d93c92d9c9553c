//! Health and API description endpoints

use axum::Json;
use gorest_api::{
    FailureEnvelope, Gender, HealthResponse, NewPost, NewTodo, NewUser, Pagination, Post, Todo,
    TodoStatus, User, UserPatch, UserStatus,
};
use utoipa::OpenApi;

/// Schemas exchanged by the proxy
#[derive(OpenApi)]
#[openapi(components(schemas(
    User,
    Gender,
    UserStatus,
    Post,
    Todo,
    TodoStatus,
    NewUser,
    UserPatch,
    NewPost,
    NewTodo,
    Pagination,
    FailureEnvelope,
    HealthResponse
)))]
pub struct ApiDoc;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/openapi.json
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
