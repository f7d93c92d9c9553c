//! gorest-client: Client library for the GoREST user-management API
//!
//! Wraps the upstream REST endpoints with bearer authentication, pagination
//! header extraction, error normalization and a per-operation retry policy.
//!
//! # Example
//!
//! ```no_run
//! use gorest_api::PaginationParams;
//! use gorest_client::{ClientConfig, GoRestClient, UserDirectory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GoRestClient::new(ClientConfig::new("https://gorest.co.in/", "token"))?;
//!
//! // First page of 50 users
//! let page = client.list_users(PaginationParams::new(1, 50)).await?;
//! println!("{} of {} users", page.items.len(), page.total_count);
//!
//! // Single user, retried with linear backoff
//! let user = client.get_user(page.items[0].id).await?;
//! println!("{}", user.name);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod retry;
pub mod traits;

pub use error::{ClientError, Result};
pub use http::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, GoRestClient};
pub use retry::{Operation, RetryPolicy};
pub use traits::UserDirectory;
