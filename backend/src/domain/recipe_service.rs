//! Recipe domain service.
//!
//! Implements recipe CRUD, filtered listing, detail expansion and image
//! attachment. Every tag and ingredient reference passes through
//! [`OwnerScope::resolve`] so a recipe can only point at its author's labels.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::access_scope::map_label_persistence_error;
use crate::domain::ports::{
    ImageStore, ImageStoreError, ImageUpload, LabelRepository, RecipeCommand,
    RecipePersistenceError, RecipeQuery, RecipeRepository,
};
use crate::domain::{
    Error, ImagePathError, Ingredient, IngredientId, Label, OwnerScope, RandomUploadIds, Recipe,
    RecipeDetail, RecipeDraft, RecipeFilter, RecipeId, RecipeImagePath, RecipePatch, Tag, TagId,
    UploadIdSource, UserId, dedupe_ids, recipe_image_file_path_with, sort_recipes,
};

/// Recipe service implementing the recipe driving ports.
#[derive(Clone)]
pub struct RecipeService<R, T, I, S> {
    recipes: Arc<R>,
    tags: Arc<T>,
    ingredients: Arc<I>,
    images: Arc<S>,
    upload_ids: Arc<dyn UploadIdSource>,
}

impl<R, T, I, S> RecipeService<R, T, I, S> {
    /// Create a new service over the given repositories and image store.
    pub fn new(recipes: Arc<R>, tags: Arc<T>, ingredients: Arc<I>, images: Arc<S>) -> Self {
        Self {
            recipes,
            tags,
            ingredients,
            images,
            upload_ids: Arc::new(RandomUploadIds),
        }
    }

    /// Replace the source of image file identifiers.
    #[must_use]
    pub fn with_upload_ids(mut self, upload_ids: Arc<dyn UploadIdSource>) -> Self {
        self.upload_ids = upload_ids;
        self
    }
}

impl<R, T, I, S> RecipeService<R, T, I, S>
where
    R: RecipeRepository,
    T: LabelRepository<Tag>,
    I: LabelRepository<Ingredient>,
    S: ImageStore,
{
    fn map_recipe_error(error: RecipePersistenceError) -> Error {
        match error {
            RecipePersistenceError::Connection { message } => {
                Error::service_unavailable(format!("recipe repository unavailable: {message}"))
            }
            RecipePersistenceError::Query { message } => {
                Error::internal(format!("recipe repository error: {message}"))
            }
        }
    }

    fn map_image_error(error: ImageStoreError) -> Error {
        match error {
            ImageStoreError::Unavailable { message } => {
                Error::service_unavailable(format!("image store unavailable: {message}"))
            }
            ImageStoreError::Io { path, message } => {
                Error::internal(format!("image store failed for {path}: {message}"))
            }
        }
    }

    fn map_path_error(error: &ImagePathError) -> Error {
        let code = match error {
            ImagePathError::MissingExtension | ImagePathError::InvalidExtension { .. } => {
                "invalid_image_name"
            }
            ImagePathError::InvalidIdentifier | ImagePathError::OutsideUploadDir => {
                return Error::internal(format!("could not build image path: {error}"));
            }
        };
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "image", "code": code }))
    }

    async fn load_owned(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        let found = self
            .recipes
            .find_by_id(&id)
            .await
            .map_err(Self::map_recipe_error)?;
        OwnerScope::new(owner)
            .visible(found)
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }

    async fn resolve_tags(&self, owner: &UserId, ids: &[TagId]) -> Result<Vec<TagId>, Error> {
        let tags: Vec<Tag> = OwnerScope::new(owner)
            .resolve(self.tags.as_ref(), "tags", ids)
            .await?;
        Ok(tags.iter().map(Label::id).collect())
    }

    async fn resolve_ingredients(
        &self,
        owner: &UserId,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, Error> {
        let ingredients: Vec<Ingredient> = OwnerScope::new(owner)
            .resolve(self.ingredients.as_ref(), "ingredients", ids)
            .await?;
        Ok(ingredients.iter().map(Label::id).collect())
    }

    async fn scope_draft(
        &self,
        owner: &UserId,
        mut draft: RecipeDraft,
    ) -> Result<RecipeDraft, Error> {
        draft.tags = self.resolve_tags(owner, &draft.tags).await?;
        draft.ingredients = self.resolve_ingredients(owner, &draft.ingredients).await?;
        Ok(draft)
    }

    async fn expand<L, Repo>(
        &self,
        repo: &Repo,
        owner: &UserId,
        ids: &[L::Id],
    ) -> Result<Vec<L>, Error>
    where
        L: Label,
        Repo: LabelRepository<L> + ?Sized,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = repo
            .find_by_ids(ids)
            .await
            .map_err(|err| map_label_persistence_error(L::KIND.noun(), err))?;
        let scoped = OwnerScope::new(owner).retain(found);
        Ok(ids
            .iter()
            .filter_map(|id| scoped.iter().find(|label| label.id() == *id).cloned())
            .collect())
    }

    async fn discard_image(&self, path: &RecipeImagePath, reason: &str) {
        if let Err(err) = self.images.remove(path).await {
            warn!(path = %path, error = %err, reason, "failed to remove recipe image");
        }
    }
}

#[async_trait]
impl<R, T, I, S> RecipeCommand for RecipeService<R, T, I, S>
where
    R: RecipeRepository,
    T: LabelRepository<Tag>,
    I: LabelRepository<Ingredient>,
    S: ImageStore,
{
    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error> {
        let draft = self.scope_draft(owner, draft).await?;
        let recipe = Recipe::new(*owner, draft);
        self.recipes
            .insert(&recipe)
            .await
            .map_err(Self::map_recipe_error)?;
        debug!(recipe_id = %recipe.id(), "created recipe");
        Ok(recipe)
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<Recipe, Error> {
        let mut recipe = self.load_owned(owner, id).await?;
        let draft = self.scope_draft(owner, draft).await?;
        recipe.replace(draft);
        self.recipes
            .update(&recipe)
            .await
            .map_err(Self::map_recipe_error)?;
        Ok(recipe)
    }

    async fn patch(
        &self,
        owner: &UserId,
        id: RecipeId,
        mut patch: RecipePatch,
    ) -> Result<Recipe, Error> {
        let mut recipe = self.load_owned(owner, id).await?;
        if let Some(tags) = patch.tags.take() {
            patch.tags = Some(self.resolve_tags(owner, &tags).await?);
        }
        if let Some(ingredients) = patch.ingredients.take() {
            patch.ingredients = Some(self.resolve_ingredients(owner, &ingredients).await?);
        }
        recipe.apply(patch);
        self.recipes
            .update(&recipe)
            .await
            .map_err(Self::map_recipe_error)?;
        Ok(recipe)
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error> {
        let recipe = self.load_owned(owner, id).await?;
        let removed = self
            .recipes
            .delete(&id)
            .await
            .map_err(Self::map_recipe_error)?;
        if !removed {
            return Err(Error::not_found(format!("recipe {id} not found")));
        }
        if let Some(image) = recipe.image() {
            self.discard_image(image, "recipe deleted").await;
        }
        Ok(())
    }

    async fn attach_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<Recipe, Error> {
        let mut recipe = self.load_owned(owner, id).await?;
        if upload.bytes.is_empty() {
            return Err(Error::invalid_request("the submitted file is empty")
                .with_details(json!({ "field": "image", "code": "empty_file" })));
        }
        let path =
            recipe_image_file_path_with(self.upload_ids.as_ref(), &recipe, &upload.filename)
                .map_err(|err| Self::map_path_error(&err))?;

        self.images
            .save(&path, &upload.bytes)
            .await
            .map_err(Self::map_image_error)?;

        let previous = recipe.set_image(path.clone());
        if let Err(err) = self.recipes.update(&recipe).await {
            self.discard_image(&path, "recipe update failed").await;
            return Err(Self::map_recipe_error(err));
        }
        if let Some(previous) = previous {
            self.discard_image(&previous, "image replaced").await;
        }
        debug!(recipe_id = %id, path = %path, "attached recipe image");
        Ok(recipe)
    }
}

#[async_trait]
impl<R, T, I, S> RecipeQuery for RecipeService<R, T, I, S>
where
    R: RecipeRepository,
    T: LabelRepository<Tag>,
    I: LabelRepository<Ingredient>,
    S: ImageStore,
{
    async fn list(&self, owner: &UserId, filter: RecipeFilter) -> Result<Vec<Recipe>, Error> {
        let filter = RecipeFilter {
            tags: dedupe_ids(&filter.tags),
            ingredients: dedupe_ids(&filter.ingredients),
        };
        let found = self
            .recipes
            .list_for_owner(owner, &filter)
            .await
            .map_err(Self::map_recipe_error)?;
        let mut recipes: Vec<Recipe> = OwnerScope::new(owner)
            .retain(found)
            .into_iter()
            .filter(|recipe| filter.matches(recipe))
            .collect();
        sort_recipes(&mut recipes);
        Ok(recipes)
    }

    async fn detail(&self, owner: &UserId, id: RecipeId) -> Result<RecipeDetail, Error> {
        let recipe = self.load_owned(owner, id).await?;
        let tags = self.expand(self.tags.as_ref(), owner, recipe.tags()).await?;
        let ingredients = self
            .expand(self.ingredients.as_ref(), owner, recipe.ingredients())
            .await?;
        Ok(RecipeDetail {
            recipe,
            tags,
            ingredients,
        })
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
