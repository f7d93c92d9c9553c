//! Posts nested under a user

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use gorest_api::{NewPost, SuccessEnvelope};
use serde::Deserialize;

use crate::api::error::AppError;
use crate::api::request_id::CorrelationId;
use crate::api::users::{json_body, user_id};
use crate::api::validation;
use crate::state::AppState;

const INVALID_POST: &str = "Invalid post data";

#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(self) -> Result<NewPost, Vec<String>> {
        let mut errors = Vec::new();
        let title = validation::required("title", self.title, &mut errors);
        let body = validation::required("body", self.body, &mut errors);
        match (title, body) {
            (Some(title), Some(body)) => Ok(NewPost { title, body }),
            _ => Err(errors),
        }
    }
}

/// GET /api/users/{id}/posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    path: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(&request_id, path)?;
    let posts = state
        .directory
        .list_user_posts(id)
        .await
        .map_err(AppError::client(&request_id, "Failed to fetch posts"))?;
    Ok(Json(SuccessEnvelope::new(posts)))
}

/// POST /api/users/{id}/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(&request_id, path)?;
    let new_post = json_body(&request_id, INVALID_POST, body)?
        .validate()
        .map_err(|errors| AppError::validation(&request_id, INVALID_POST, errors))?;

    let post = state
        .directory
        .create_user_post(id, &new_post)
        .await
        .map_err(AppError::client(&request_id, "Failed to create post"))?;
    Ok((StatusCode::CREATED, Json(SuccessEnvelope::new(post))))
}
