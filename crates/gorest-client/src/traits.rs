//! User directory trait

use async_trait::async_trait;

use gorest_api::{NewPost, NewTodo, NewUser, Page, PaginationParams, Post, Todo, User, UserPatch};

use crate::error::Result;

/// Operations offered by a remote user directory
///
/// Implemented by [`crate::GoRestClient`]; the proxy depends only on this
/// trait.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// List one page of users along with the total user count
    async fn list_users(&self, params: PaginationParams) -> Result<Page<User>>;

    async fn get_user(&self, id: u64) -> Result<User>;

    /// Create a user; enum fields are sent lower-case
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Apply a partial update to a user
    async fn update_user(&self, id: u64, patch: &UserPatch) -> Result<User>;

    async fn delete_user(&self, id: u64) -> Result<()>;

    async fn list_user_posts(&self, user_id: u64) -> Result<Vec<Post>>;

    async fn create_user_post(&self, user_id: u64, post: &NewPost) -> Result<Post>;

    async fn list_user_todos(&self, user_id: u64) -> Result<Vec<Todo>>;

    async fn create_user_todo(&self, user_id: u64, todo: &NewTodo) -> Result<Todo>;
}
