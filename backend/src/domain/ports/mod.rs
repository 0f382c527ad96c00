//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`LoginService`]) are called by
//! inbound adapters. Driven ports (`*Repository`, [`ImageStore`]) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod image_store;
mod label_command;
mod label_query;
mod label_repository;
mod login_service;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, CreateUserRequest, UpdateProfileRequest};
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
pub use label_command::LabelCommand;
#[cfg(test)]
pub use label_command::MockLabelCommand;
pub use label_query::LabelQuery;
#[cfg(test)]
pub use label_query::MockLabelQuery;
#[cfg(test)]
pub use label_repository::MockLabelRepository;
pub use label_repository::{LabelPersistenceError, LabelRepository};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::{ImageUpload, RecipeCommand};
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::RecipeQuery;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipePersistenceError, RecipeRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
