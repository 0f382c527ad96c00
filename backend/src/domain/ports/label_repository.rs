//! Port for tag and ingredient persistence.
//!
//! One generic trait serves both label kinds; adapters implement it once per
//! table.

use async_trait::async_trait;

use crate::domain::{Label, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by label repository adapters.
    pub enum LabelPersistenceError {
        /// Repository connection could not be established.
        Connection { message } => "label repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "label repository query failed: {message}",
    }
}

/// Storage for one kind of user-owned label.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelRepository<L: Label>: Send + Sync {
    /// Insert a new label.
    async fn insert(&self, label: &L) -> Result<(), LabelPersistenceError>;

    /// Overwrite a label's name.
    async fn update(&self, label: &L) -> Result<(), LabelPersistenceError>;

    /// Delete a label and detach it from every recipe. Returns whether a
    /// row was removed.
    async fn delete(&self, id: &L::Id) -> Result<bool, LabelPersistenceError>;

    /// Fetch labels by id regardless of owner.
    ///
    /// Callers must pass the result through
    /// [`crate::domain::OwnerScope::retain`] before trusting it.
    async fn find_by_ids(&self, ids: &[L::Id]) -> Result<Vec<L>, LabelPersistenceError>;

    /// List a user's labels, optionally only those attached to at least
    /// one recipe.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<L>, LabelPersistenceError>;
}
