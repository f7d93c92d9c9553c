//! User endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use gorest_api::{NewUser, Pagination, PaginationParams, SuccessEnvelope, UserPatch};
use serde::Deserialize;

use crate::api::error::AppError;
use crate::api::request_id::CorrelationId;
use crate::api::validation;
use crate::state::AppState;

const INVALID_USER: &str = "Invalid user data";
const INVALID_USER_ID: &str = "Invalid user id";
const INVALID_PAGINATION: &str = "Invalid pagination parameters";
const EMPTY_UPDATE: &str = "at least one of name, email, status must be provided";

/// Query string of the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u64>,
    #[serde(rename = "perPage", alias = "per_page")]
    pub per_page: Option<u64>,
}

impl ListUsersQuery {
    fn params(&self) -> PaginationParams {
        PaginationParams::new(
            self.page.unwrap_or(PaginationParams::DEFAULT_PAGE),
            self.per_page.unwrap_or(PaginationParams::DEFAULT_PER_PAGE),
        )
    }
}

/// Body of the create endpoint, before validation
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
}

impl CreateUserRequest {
    /// Validate every field, collecting all problems
    pub fn validate(self) -> Result<NewUser, Vec<String>> {
        let mut errors = Vec::new();
        let name = validation::required("name", self.name, &mut errors);
        let email = validation::required("email", self.email, &mut errors)
            .and_then(|email| validation::email(email, &mut errors));
        let gender = validation::required("gender", self.gender, &mut errors)
            .and_then(|gender| validation::enumerated(gender, &mut errors));
        let status = validation::required("status", self.status, &mut errors)
            .and_then(|status| validation::enumerated(status, &mut errors));

        if !errors.is_empty() {
            return Err(errors);
        }
        match (name, email, gender, status) {
            (Some(name), Some(email), Some(gender), Some(status)) => Ok(NewUser {
                name,
                email,
                gender,
                status,
            }),
            _ => Err(errors),
        }
    }
}

/// Body of the update endpoint, before validation
///
/// Gender cannot be changed through the proxy; a submitted `gender` is
/// ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl UpdateUserRequest {
    /// Validate the fields present; at least one is required
    pub fn validate(self) -> Result<UserPatch, Vec<String>> {
        let mut errors = Vec::new();
        let patch = UserPatch {
            name: validation::optional("name", self.name, &mut errors),
            email: validation::optional("email", self.email, &mut errors)
                .and_then(|email| validation::email(email, &mut errors)),
            status: validation::optional("status", self.status, &mut errors)
                .and_then(|status| validation::enumerated(status, &mut errors)),
        };

        if errors.is_empty() && patch.is_empty() {
            errors.push(EMPTY_UPDATE.to_string());
        }
        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }
}

/// Unwrap a path id or report it through the validation envelope
pub(crate) fn user_id(
    request_id: &CorrelationId,
    path: Result<Path<u64>, PathRejection>,
) -> Result<u64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::rejection(request_id, INVALID_USER_ID, rejection))
}

/// Unwrap a JSON body or report it through the validation envelope
pub(crate) fn json_body<T>(
    request_id: &CorrelationId,
    message: &'static str,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::rejection(request_id, message, rejection))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let query = query
        .map(|Query(query)| query)
        .map_err(|rejection| AppError::rejection(&request_id, INVALID_PAGINATION, rejection))?;
    let params = query.params();

    let page = state
        .directory
        .list_users(params)
        .await
        .map_err(AppError::client(&request_id, "Failed to fetch users"))?;

    let pagination = Pagination::new(params, page.total_count);
    Ok(Json(SuccessEnvelope::paginated(page.items, pagination)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    path: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(&request_id, path)?;
    let user = state
        .directory
        .get_user(id)
        .await
        .map_err(AppError::client(&request_id, "Failed to fetch user"))?;
    Ok(Json(SuccessEnvelope::new(user)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let new_user = json_body(&request_id, INVALID_USER, body)?
        .validate()
        .map_err(|errors| AppError::validation(&request_id, INVALID_USER, errors))?;

    let user = state
        .directory
        .create_user(&new_user)
        .await
        .map_err(AppError::client(&request_id, "Failed to create user"))?;

    tracing::info!(request_id = %request_id.as_str(), user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(SuccessEnvelope::new(user))))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(&request_id, path)?;
    let patch = json_body(&request_id, INVALID_USER, body)?
        .validate()
        .map_err(|errors| AppError::validation(&request_id, INVALID_USER, errors))?;

    let user = state
        .directory
        .update_user(id, &patch)
        .await
        .map_err(AppError::client(&request_id, "Failed to update user"))?;
    Ok(Json(SuccessEnvelope::new(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    request_id: CorrelationId,
    path: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(&request_id, path)?;
    state
        .directory
        .delete_user(id)
        .await
        .map_err(AppError::client(&request_id, "Failed to delete user"))?;

    tracing::info!(request_id = %request_id.as_str(), user_id = id, "user deleted");
    Ok(Json(SuccessEnvelope::<()>::empty()))
}
