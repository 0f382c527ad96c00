//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data` and depend only on
//! the domain's driving ports, so they can be tested against mocks.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, LabelCommand, LabelQuery, LoginService, RecipeCommand,
    RecipeQuery,
};
use crate::domain::{Ingredient, Label, Tag};

/// Command and query ports for one label kind.
pub struct LabelPorts<L: Label> {
    pub command: Arc<dyn LabelCommand<L>>,
    pub query: Arc<dyn LabelQuery<L>>,
}

impl<L: Label> LabelPorts<L> {
    /// Serve both ports from one service.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: LabelCommand<L> + LabelQuery<L> + 'static,
    {
        Self {
            command: service.clone(),
            query: service,
        }
    }
}

impl<L: Label> Clone for LabelPorts<L> {
    fn clone(&self) -> Self {
        Self {
            command: Arc::clone(&self.command),
            query: Arc::clone(&self.query),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub account_query: Arc<dyn AccountQuery>,
    pub tags: LabelPorts<Tag>,
    pub ingredients: LabelPorts<Ingredient>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipe_query: Arc<dyn RecipeQuery>,
}

/// Access to the label ports of one kind, so label handlers can be written
/// once for tags and ingredients.
pub trait LabelState<L: Label> {
    /// Ports serving label kind `L`.
    fn label_ports(&self) -> &LabelPorts<L>;
}

impl LabelState<Tag> for HttpState {
    fn label_ports(&self) -> &LabelPorts<Tag> {
        &self.tags
    }
}

impl LabelState<Ingredient> for HttpState {
    fn label_ports(&self) -> &LabelPorts<Ingredient> {
        &self.ingredients
    }
}

impl HttpState {
    /// Wire every port to one service per concern.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use recipe_backend::domain::{AccountService, LabelService, RecipeService};
    /// use recipe_backend::inbound::http::state::HttpState;
    /// use recipe_backend::outbound::memory::InMemoryStore;
    /// use recipe_backend::outbound::storage::InMemoryImageStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let accounts = Arc::new(AccountService::new(store.clone()));
    /// let labels = Arc::new(LabelService::new(store.clone()));
    /// let recipes = Arc::new(RecipeService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(InMemoryImageStore::new()),
    /// ));
    /// let state = HttpState::from_services(accounts, labels, recipes);
    /// let _login = state.login.clone();
    /// ```
    pub fn from_services<A, L, R>(accounts: Arc<A>, labels: Arc<L>, recipes: Arc<R>) -> Self
    where
        A: LoginService + AccountCommand + AccountQuery + 'static,
        L: LabelCommand<Tag>
            + LabelQuery<Tag>
            + LabelCommand<Ingredient>
            + LabelQuery<Ingredient>
            + 'static,
        R: RecipeCommand + RecipeQuery + 'static,
    {
        Self {
            login: accounts.clone(),
            accounts: accounts.clone(),
            account_query: accounts,
            tags: LabelPorts::from_service(labels.clone()),
            ingredients: LabelPorts::from_service(labels),
            recipes: recipes.clone(),
            recipe_query: recipes,
        }
    }
}
