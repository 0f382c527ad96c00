//! Port for recipe persistence.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeFilter, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipePersistenceError {
        /// Repository connection could not be established.
        Connection { message } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "recipe repository query failed: {message}",
    }
}

/// Storage for recipes and their tag/ingredient associations.
///
/// Writes replace the association rows wholesale, atomically with the
/// recipe row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a new recipe with its associations.
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError>;

    /// Overwrite a recipe and its associations.
    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError>;

    /// Delete a recipe. Tags and ingredients are left intact. Returns
    /// whether a row was removed.
    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipePersistenceError>;

    /// Fetch a recipe by identifier regardless of owner.
    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// List a user's recipes matching `filter`, without duplicates.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipePersistenceError>;
}
