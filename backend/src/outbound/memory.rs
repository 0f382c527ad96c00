//! In-process adapters implementing every repository port.
//!
//! [`InMemoryStore`] keeps users, labels and recipes behind one mutex so a
//! label delete and the matching recipe cleanup happen atomically, the way
//! the PostgreSQL adapter relies on cascading join rows. It backs local runs
//! without `database_url` and the HTTP integration tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    LabelPersistenceError, LabelRepository, RecipePersistenceError, RecipeRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, Ingredient, IngredientId, Label, Owned, Recipe, RecipeFilter, RecipeId, Tag,
    TagId, User, UserId,
};

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<UserId, User>,
    tags: BTreeMap<TagId, Tag>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, Recipe>,
}

/// Shared in-memory storage. Clones share the same state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, MemoryState>> {
        self.state.lock().ok()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        if state.users.values().any(|other| other.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().to_string()));
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        match state.users.get_mut(user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user not found for update")),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        Ok(state
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }
}

/// Implements [`LabelRepository`] for one label kind, naming the table it
/// lives in and the recipe relation it populates.
macro_rules! impl_label_repository {
    ($label:ty, $table:ident, $relation:ident, $forget:ident) => {
        #[async_trait]
        impl LabelRepository<$label> for InMemoryStore {
            async fn insert(&self, label: &$label) -> Result<(), LabelPersistenceError> {
                let mut state = self
                    .lock()
                    .ok_or_else(|| LabelPersistenceError::connection(POISONED))?;
                state.$table.insert(label.id(), label.clone());
                Ok(())
            }

            async fn update(&self, label: &$label) -> Result<(), LabelPersistenceError> {
                let mut state = self
                    .lock()
                    .ok_or_else(|| LabelPersistenceError::connection(POISONED))?;
                match state.$table.get_mut(&label.id()) {
                    Some(stored) => {
                        *stored = label.clone();
                        Ok(())
                    }
                    None => Err(LabelPersistenceError::query(format!(
                        "{} not found for update",
                        <$label as Label>::KIND.noun()
                    ))),
                }
            }

            async fn delete(
                &self,
                id: &<$label as Label>::Id,
            ) -> Result<bool, LabelPersistenceError> {
                let mut state = self
                    .lock()
                    .ok_or_else(|| LabelPersistenceError::connection(POISONED))?;
                if state.$table.remove(id).is_none() {
                    return Ok(false);
                }
                for recipe in state.recipes.values_mut() {
                    recipe.$forget(*id);
                }
                Ok(true)
            }

            async fn find_by_ids(
                &self,
                ids: &[<$label as Label>::Id],
            ) -> Result<Vec<$label>, LabelPersistenceError> {
                let state = self
                    .lock()
                    .ok_or_else(|| LabelPersistenceError::connection(POISONED))?;
                Ok(ids
                    .iter()
                    .filter_map(|id| state.$table.get(id).cloned())
                    .collect())
            }

            async fn list_for_owner(
                &self,
                owner: &UserId,
                assigned_only: bool,
            ) -> Result<Vec<$label>, LabelPersistenceError> {
                let state = self
                    .lock()
                    .ok_or_else(|| LabelPersistenceError::connection(POISONED))?;
                Ok(state
                    .$table
                    .values()
                    .filter(|label| label.owner() == owner)
                    .filter(|label| {
                        !assigned_only
                            || state
                                .recipes
                                .values()
                                .any(|recipe| recipe.$relation().contains(&label.id()))
                    })
                    .cloned()
                    .collect())
            }
        }
    };
}

impl_label_repository!(Tag, tags, tags, forget_tag);
impl_label_repository!(Ingredient, ingredients, ingredients, forget_ingredient);

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| RecipePersistenceError::connection(POISONED))?;
        state.recipes.insert(recipe.id(), recipe.clone());
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| RecipePersistenceError::connection(POISONED))?;
        match state.recipes.get_mut(&recipe.id()) {
            Some(stored) => {
                *stored = recipe.clone();
                Ok(())
            }
            None => Err(RecipePersistenceError::query("recipe not found for update")),
        }
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| RecipePersistenceError::connection(POISONED))?;
        Ok(state.recipes.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| RecipePersistenceError::connection(POISONED))?;
        Ok(state.recipes.get(id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| RecipePersistenceError::connection(POISONED))?;
        Ok(state
            .recipes
            .values()
            .filter(|recipe| recipe.owner() == owner && filter.matches(recipe))
            .cloned()
            .collect())
    }
}
