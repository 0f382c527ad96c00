//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories implement the domain's driven ports on top of `diesel-async`
//! and a `bb8` pool. They translate between Diesel rows and domain types and
//! hold no business rules. Rows read back from the database are validated
//! again, so a corrupt row surfaces as a query error rather than an invalid
//! domain value.
//!
//! ```ignore
//! use recipe_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::connect(&PoolConfig::new("postgres://localhost/recipes")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_label_repository;
mod diesel_recipe_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_label_repository::{DieselIngredientRepository, DieselTagRepository};
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{
    DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError,
};
