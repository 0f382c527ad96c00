//! Driving port for tag and ingredient mutations.

use async_trait::async_trait;

use crate::domain::{Error, Label, LabelName, UserId};

/// Domain use-case port for label mutations.
///
/// Every operation is scoped to `owner`; labels owned by someone else are
/// reported as `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelCommand<L: Label>: Send + Sync {
    /// Create a label owned by `owner`.
    async fn create(&self, owner: &UserId, name: LabelName) -> Result<L, Error>;

    /// Rename one of `owner`'s labels.
    async fn rename(&self, owner: &UserId, id: L::Id, name: LabelName) -> Result<L, Error>;

    /// Delete one of `owner`'s labels, detaching it from recipes.
    async fn delete(&self, owner: &UserId, id: L::Id) -> Result<(), Error>;
}
