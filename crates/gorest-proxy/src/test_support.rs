//! In-memory user directory and request helpers for handler tests

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, header::CONTENT_TYPE},
    response::Response,
};
use gorest_api::{
    Gender, NewPost, NewTodo, NewUser, Page, PaginationParams, Post, Todo, User, UserPatch,
    UserStatus,
};
use gorest_client::{ClientError, Operation, Result, UserDirectory};
use http_body_util::BodyExt;

#[derive(Default)]
struct Records {
    users: Vec<User>,
    posts: Vec<Post>,
    todos: Vec<Todo>,
    calls: Vec<Operation>,
    last_params: Option<PaginationParams>,
    failure: Option<ClientError>,
}

/// User directory double; records each operation it serves
#[derive(Default)]
pub(crate) struct MockDirectory {
    records: Mutex<Records>,
    total_count: u64,
}

impl MockDirectory {
    /// Directory holding users `1..=count`
    pub(crate) fn with_users(count: u64) -> Self {
        let users = (1..=count)
            .map(|id| User {
                id,
                name: format!("User {id}"),
                email: format!("user{id}@example.com"),
                gender: Gender::Male,
                status: UserStatus::Active,
            })
            .collect();
        Self {
            records: Mutex::new(Records {
                users,
                ..Records::default()
            }),
            total_count: count,
        }
    }

    /// Total reported by list calls
    pub(crate) fn total_count(mut self, total: u64) -> Self {
        self.total_count = total;
        self
    }

    /// Fail the next call with `error`
    pub(crate) fn failing(self, error: ClientError) -> Self {
        self.records.lock().unwrap().failure = Some(error);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Operation> {
        self.records.lock().unwrap().calls.clone()
    }

    pub(crate) fn last_params(&self) -> Option<PaginationParams> {
        self.records.lock().unwrap().last_params
    }

    fn begin(&self, op: Operation) -> Result<std::sync::MutexGuard<'_, Records>> {
        let mut records = self.records.lock().unwrap();
        records.calls.push(op);
        let failure = records.failure.take();
        match failure {
            Some(error) => Err(error),
            None => Ok(records),
        }
    }
}

fn not_found() -> ClientError {
    ClientError::Upstream {
        status: 404,
        body: "{\"message\":\"Resource not found\"}".to_string(),
    }
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn list_users(&self, params: PaginationParams) -> Result<Page<User>> {
        let mut records = self.begin(Operation::ListUsers)?;
        records.last_params = Some(params);
        Ok(Page {
            items: records.users.clone(),
            total_count: self.total_count,
        })
    }

    async fn get_user(&self, id: u64) -> Result<User> {
        let records = self.begin(Operation::GetUser)?;
        records
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut records = self.begin(Operation::CreateUser)?;
        let created = User {
            id: records.users.len() as u64 + 100,
            name: user.name.clone(),
            email: user.email.clone(),
            gender: user.gender,
            status: user.status,
        };
        records.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: u64, patch: &UserPatch) -> Result<User> {
        let mut records = self.begin(Operation::UpdateUser)?;
        let user = records
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(not_found)?;
        if let Some(name) = &patch.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            user.email.clone_from(email);
        }
        if let Some(status) = patch.status {
            user.status = status;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        let mut records = self.begin(Operation::DeleteUser)?;
        let before = records.users.len();
        records.users.retain(|user| user.id != id);
        if records.users.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn list_user_posts(&self, user_id: u64) -> Result<Vec<Post>> {
        let records = self.begin(Operation::ListUserPosts)?;
        Ok(records
            .posts
            .iter()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_user_post(&self, user_id: u64, post: &NewPost) -> Result<Post> {
        let mut records = self.begin(Operation::CreateUserPost)?;
        let created = Post {
            id: records.posts.len() as u64 + 1,
            user_id,
            title: post.title.clone(),
            body: post.body.clone(),
        };
        records.posts.push(created.clone());
        Ok(created)
    }

    async fn list_user_todos(&self, user_id: u64) -> Result<Vec<Todo>> {
        let records = self.begin(Operation::ListUserTodos)?;
        Ok(records
            .todos
            .iter()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_user_todo(&self, user_id: u64, todo: &NewTodo) -> Result<Todo> {
        let mut records = self.begin(Operation::CreateUserTodo)?;
        let created = Todo {
            id: records.todos.len() as u64 + 1,
            user_id,
            title: todo.title.clone(),
            status: todo.status,
            due_on: todo.due_on,
        };
        records.todos.push(created.clone());
        Ok(created)
    }
}

/// Build a request, with a JSON body when one is given
pub(crate) fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
