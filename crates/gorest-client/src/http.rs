//! HTTP client for the upstream GoREST service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use gorest_api::{NewPost, NewTodo, NewUser, Page, PaginationParams, Post, Todo, User, UserPatch};

use crate::error::{ClientError, Result};
use crate::retry::{Operation, RetryPolicy};
use crate::traits::UserDirectory;

/// Public demo instance, suitable for local development only
pub const DEFAULT_BASE_URL: &str = "https://gorest.co.in/";

/// Versioned path prefix of the upstream API
pub const API_PREFIX: &str = "public/v2/";

/// Response header carrying the total item count of a list
pub const PAGINATION_TOTAL_HEADER: &str = "x-pagination-total";

/// Overall timeout applied to each upstream request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings used to construct a [`GoRestClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upstream base URL, without the `public/v2` prefix
    pub base_url: String,
    /// Bearer token sent on every request
    pub token: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Which operations are retried, and how
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Configuration with default timeout and retry policy
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Authenticated client for the upstream user-management API
///
/// The bearer token is installed once at construction and never refreshed.
#[derive(Debug, Clone)]
pub struct GoRestClient {
    client: Client,
    api_url: Url,
    retry: RetryPolicy,
}

impl GoRestClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns an error if the token is empty or not a valid header value,
    /// or if the base URL is invalid.
    ///
    /// # Example
    /// ```no_run
    /// use gorest_client::{ClientConfig, GoRestClient};
    ///
    /// let client = GoRestClient::new(ClientConfig::new("https://gorest.co.in/", "token"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(ClientError::Config("upstream token is empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .map_err(|_| ClientError::Config("token is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Self::with_client(&config.base_url, client, config.retry)
    }

    /// Create a client around a preconfigured `reqwest::Client`
    ///
    /// The caller is responsible for any authentication headers.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(
        base_url: impl AsRef<str>,
        client: Client,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let api_url = base_url.join(API_PREFIX)?;
        Ok(Self {
            client,
            api_url,
            retry,
        })
    }

    /// Retry policy in effect
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Build a full URL from a path relative to the API prefix
    fn url(&self, path: &str) -> Result<Url> {
        self.api_url.join(path).map_err(ClientError::Url)
    }

    /// Send a request and turn non-2xx statuses into `ClientError::Upstream`
    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Read and deserialize a JSON body
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ClientError::Deserialization("response body is empty".to_string()));
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialization(e.to_string()))
    }

    /// Perform a GET request and deserialize the response
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = Self::send(self.client.get(url)).await?;
        Self::decode(response).await
    }

    /// Perform a GET request for a list; a `null` body is an empty list
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let items: Option<Vec<T>> = self.get(path).await?;
        Ok(items.unwrap_or_default())
    }

    /// Perform a POST request with JSON body
    async fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        let url = self.url(path)?;
        let response = Self::send(self.client.post(url).json(body)).await?;
        Self::decode(response).await
    }

    /// Perform a PATCH request with JSON body
    async fn patch<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        let url = self.url(path)?;
        let response = Self::send(self.client.patch(url).json(body)).await?;
        Self::decode(response).await
    }

    /// Perform a DELETE request
    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        Self::send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn fetch_user_page(&self, params: PaginationParams) -> Result<Page<User>> {
        let mut url = self.url("users")?;
        url.query_pairs_mut()
            .append_pair("page", &params.page().to_string())
            .append_pair("per_page", &params.per_page().to_string());

        let response = Self::send(self.client.get(url)).await?;
        let total_count = total_count(response.headers());
        let items: Option<Vec<User>> = Self::decode(response).await?;
        Ok(Page {
            items: items.unwrap_or_default(),
            total_count,
        })
    }
}

/// Total item count from the pagination header, 0 if absent or unparsable
fn total_count(headers: &HeaderMap) -> u64 {
    headers
        .get(PAGINATION_TOTAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl UserDirectory for GoRestClient {
    #[instrument(skip(self))]
    async fn list_users(&self, params: PaginationParams) -> Result<Page<User>> {
        let page = self
            .retry
            .run(Operation::ListUsers, || self.fetch_user_page(params))
            .await?;
        debug!(count = page.items.len(), "listed users");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: u64) -> Result<User> {
        let path = format!("users/{id}");
        let user: User = self
            .retry
            .run(Operation::GetUser, || self.get(&path))
            .await?;
        debug!(name = %user.name, "fetched user");
        Ok(user)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let created: User = self
            .retry
            .run(Operation::CreateUser, || self.post("users", user))
            .await?;
        debug!(id = created.id, "created user");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    async fn update_user(&self, id: u64, patch: &UserPatch) -> Result<User> {
        let path = format!("users/{id}");
        self.retry
            .run(Operation::UpdateUser, || self.patch(&path, patch))
            .await
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: u64) -> Result<()> {
        let path = format!("users/{id}");
        self.retry
            .run(Operation::DeleteUser, || self.delete(&path))
            .await?;
        debug!("deleted user");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_user_posts(&self, user_id: u64) -> Result<Vec<Post>> {
        let path = format!("users/{user_id}/posts");
        self.retry
            .run(Operation::ListUserPosts, || self.get_list(&path))
            .await
    }

    #[instrument(skip(self, post))]
    async fn create_user_post(&self, user_id: u64, post: &NewPost) -> Result<Post> {
        let path = format!("users/{user_id}/posts");
        self.retry
            .run(Operation::CreateUserPost, || self.post(&path, post))
            .await
    }

    #[instrument(skip(self))]
    async fn list_user_todos(&self, user_id: u64) -> Result<Vec<Todo>> {
        let path = format!("users/{user_id}/todos");
        self.retry
            .run(Operation::ListUserTodos, || self.get_list(&path))
            .await
    }

    #[instrument(skip(self, todo))]
    async fn create_user_todo(&self, user_id: u64, todo: &NewTodo) -> Result<Todo> {
        let path = format!("users/{user_id}/todos");
        self.retry
            .run(Operation::CreateUserTodo, || self.post(&path, todo))
            .await
    }
}
