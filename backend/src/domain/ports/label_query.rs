//! Driving port for listing tags and ingredients.

use async_trait::async_trait;

use crate::domain::{Error, Label, UserId};

/// Domain use-case port for label reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelQuery<L: Label>: Send + Sync {
    /// List `owner`'s labels by name descending. With `assigned_only`, only
    /// labels attached to at least one recipe are returned.
    async fn list(&self, owner: &UserId, assigned_only: bool) -> Result<Vec<L>, Error>;
}
