//! Response types for the proxy API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::requests::PaginationParams;

/// One page of items together with the upstream total count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub per_page: u64,
    pub total_count: u64,
    /// Always `ceil(total_count / per_page)`
    pub total_pages: u64,
}

impl Pagination {
    #[must_use]
    pub fn new(params: PaginationParams, total_count: u64) -> Self {
        Self {
            current_page: params.page(),
            per_page: params.per_page(),
            total_count,
            total_pages: total_count.div_ceil(params.per_page()),
        }
    }
}

/// Successful proxy response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: Some(pagination),
        }
    }

    /// Envelope with no payload, used for deletes
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            pagination: None,
        }
    }
}

/// Failed proxy response
///
/// `error` carries the diagnostic text of an upstream or client failure;
/// `errors` carries per-field validation messages.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Correlation id for operator-side log lookup
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
