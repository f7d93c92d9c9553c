//! Todos nested under a user

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
use gorest_api::{NewTodo, SuccessEnvelope};
use serde::Deserialize;

use crate::api::error::AppError;
use crate::api::request_id::CorrelationId;
use crate::api::users::{json_body, user_id};
use crate::api::validation;
use crate::state::AppState;

const INVALID_TODO: &str = "Invalid todo data";

#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub status: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub due_on: Option<String>,
}

impl CreateTodoRequest {
    pub fn validate(self) -> Result<NewTodo, Vec<String>> {
        let mut errors = Vec::new();
        let title = validation::required("title", self.title, &mut errors);
        let status = validation::required("status", self.status, &mut errors)
            .and_then(|status| validation::enumerated(status, &mut errors));
        let due_on = validation::optional("due_on", self.due_on, &mut errors)
            .and_then(|due_on| validation::due_date(due_on, &mut errors));

        match (title, status) {
            (Some(title), Some(status)) if errors.is_empty() => Ok(NewTodo {
                title,
                status,
                due_on,
            }),
            _ => Err(errors),
        }
    }
}

/// GET /api/users/{id}/todos
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    path: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(&request_id, path)?;
    let todos = state
        .directory
        .list_user_todos(id)
        .await
        .map_err(AppError::client(&request_id, "Failed to fetch todos"))?;
    Ok(Json(SuccessEnvelope::new(todos)))
}

/// POST /api/users/{id}/todos
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(&request_id, path)?;
    let new_todo = json_body(&request_id, INVALID_TODO, body)?
        .validate()
        .map_err(|errors| AppError::validation(&request_id, INVALID_TODO, errors))?;

    let todo = state
        .directory
        .create_user_todo(id, &new_todo)
        .await
        .map_err(AppError::client(&request_id, "Failed to create todo"))?;
    Ok((StatusCode::CREATED, Json(SuccessEnvelope::new(todo))))
}
