//! Per-operation retry with linear backoff
//!
//! Only operations listed in [`RetryPolicy::operations`] are retried. By
//! default that is `get_user` and `delete_user`; creates, updates, lists and
//! nested-resource calls fail on the first error. The set is configuration
//! rather than code so the coverage stays explicit.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Client operations, used to select which calls are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListUsers,
    GetUser,
    CreateUser,
    UpdateUser,
    DeleteUser,
    ListUserPosts,
    CreateUserPost,
    ListUserTodos,
    CreateUserTodo,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListUsers => "list_users",
            Operation::GetUser => "get_user",
            Operation::CreateUser => "create_user",
            Operation::UpdateUser => "update_user",
            Operation::DeleteUser => "delete_user",
            Operation::ListUserPosts => "list_user_posts",
            Operation::CreateUserPost => "create_user_post",
            Operation::ListUserTodos => "list_user_todos",
            Operation::CreateUserTodo => "create_user_todo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retry configuration
///
/// After failed attempt `n` the caller's task sleeps `base_delay_ms * n`
/// before attempt `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one (0 behaves as 1)
    pub max_attempts: u32,
    /// Backoff unit in milliseconds
    pub base_delay_ms: u64,
    /// Operations the policy applies to
    pub operations: BTreeSet<Operation>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            operations: BTreeSet::from([Operation::GetUser, Operation::DeleteUser]),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            operations: BTreeSet::new(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn covers(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    /// Delay to wait after the given failed attempt (1-indexed)
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(u64::from(attempt)))
    }

    /// Run `call`, retrying it if `operation` is covered by this policy
    ///
    /// # Errors
    /// Uncovered operations return the first error unchanged. Covered
    /// operations return [`ClientError::RetryExhausted`] wrapping the last
    /// failure once every attempt has failed.
    pub async fn run<T, F, Fut>(&self, operation: Operation, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.covers(operation) {
            return call().await;
        }

        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(%operation, attempt, "upstream call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if attempt < attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        %operation,
                        attempt,
                        max_attempts = attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "upstream call failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(ClientError::RetryExhausted {
                        attempts,
                        source: Box::new(err),
                    });
                }
            }
        }
    }
}
