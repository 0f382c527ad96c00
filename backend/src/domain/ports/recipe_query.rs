//! Driving port for recipe reads.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeDetail, RecipeFilter, RecipeId, UserId};

/// Domain use-case port for recipe reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// List `owner`'s recipes matching `filter`, ordered by title.
    async fn list(&self, owner: &UserId, filter: RecipeFilter) -> Result<Vec<Recipe>, Error>;

    /// Load one of `owner`'s recipes with its tags and ingredients expanded.
    async fn detail(&self, owner: &UserId, id: RecipeId) -> Result<RecipeDetail, Error>;
}
