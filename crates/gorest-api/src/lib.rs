//! gorest-api: Shared data model and envelope types
//!
//! Contains the user-management resources exchanged with the upstream GoREST
//! service, the pagination types, and the response envelopes returned by the
//! proxy to browser clients.

pub mod models;
pub mod requests;
pub mod responses;

pub use models::{Gender, ParseEnumError, Post, Todo, TodoStatus, User, UserStatus};
pub use requests::{NewPost, NewTodo, NewUser, PaginationParams, UserPatch};
pub use responses::{FailureEnvelope, HealthResponse, Page, Pagination, SuccessEnvelope};
