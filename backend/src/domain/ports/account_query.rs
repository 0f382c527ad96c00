//! Driving port for reading the caller's account.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for account reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Load the profile of `user_id`, failing with `not_found` when the
    /// account no longer exists.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}
