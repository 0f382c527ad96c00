//! Builders wiring domain services to PostgreSQL or in-memory adapters.

use std::io;
use std::sync::Arc;

use tracing::info;

use recipe_backend::domain::{AccountService, LabelService, RecipeService};
use recipe_backend::inbound::http::state::{HttpState, LabelPorts};
use recipe_backend::outbound::memory::InMemoryStore;
use recipe_backend::outbound::persistence::{
    DbPool, DieselIngredientRepository, DieselRecipeRepository, DieselTagRepository,
    DieselUserRepository,
};
use recipe_backend::outbound::storage::CapStdImageStore;

use super::ServerConfig;

fn diesel_state(pool: &DbPool, images: Arc<CapStdImageStore>) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let tags = Arc::new(DieselTagRepository::new(pool.clone()));
    let ingredients = Arc::new(DieselIngredientRepository::new(pool.clone()));
    let recipes = Arc::new(DieselRecipeRepository::new(pool.clone()));

    let accounts = Arc::new(AccountService::new(users));
    let recipe_service = Arc::new(RecipeService::new(
        recipes,
        tags.clone(),
        ingredients.clone(),
        images,
    ));

    HttpState {
        login: accounts.clone(),
        accounts: accounts.clone(),
        account_query: accounts,
        tags: LabelPorts::from_service(Arc::new(LabelService::new(tags))),
        ingredients: LabelPorts::from_service(Arc::new(LabelService::new(ingredients))),
        recipes: recipe_service.clone(),
        recipe_query: recipe_service,
    }
}

fn memory_state(images: Arc<CapStdImageStore>) -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    HttpState::from_services(
        Arc::new(AccountService::new(store.clone())),
        Arc::new(LabelService::new(store.clone())),
        Arc::new(RecipeService::new(
            store.clone(),
            store.clone(),
            store,
            images,
        )),
    )
}

/// Build handler state from the configured backend.
///
/// # Errors
/// Returns [`io::Error`] when the media root cannot be created or opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let images = Arc::new(CapStdImageStore::open(&config.media_root)?);
    let state = match &config.db_pool {
        Some(pool) => {
            info!(media_root = %config.media_root.display(), "serving from PostgreSQL");
            diesel_state(pool, images)
        }
        None => {
            info!(
                media_root = %config.media_root.display(),
                "no database configured; serving from memory"
            );
            memory_state(images)
        }
    };
    Ok(state)
}
