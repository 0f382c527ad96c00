//! Driving port for recipe mutations and image uploads.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeDraft, RecipeId, RecipePatch, UserId};

/// Uploaded image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Client-supplied file name; only its extension is kept.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Domain use-case port for recipe mutations.
///
/// Tag and ingredient ids in drafts and patches are resolved against the
/// caller's own labels; any id outside that set fails with
/// `invalid_request`. Recipes owned by someone else are `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Create a recipe owned by `owner`.
    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error>;

    /// Replace every writable field of a recipe.
    async fn replace(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<Recipe, Error>;

    /// Update the supplied fields of a recipe.
    async fn patch(&self, owner: &UserId, id: RecipeId, patch: RecipePatch)
    -> Result<Recipe, Error>;

    /// Delete a recipe, keeping its tags and ingredients.
    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error>;

    /// Store an image for a recipe, replacing any previous image.
    async fn attach_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<Recipe, Error>;
}
