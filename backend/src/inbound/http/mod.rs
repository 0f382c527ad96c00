//! HTTP inbound adapter exposing the REST API.

pub mod error;
pub mod health;
pub mod labels;
pub mod labels_dto;
pub mod recipes;
pub mod recipes_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` route and the extractor configuration that
/// answers malformed input with the error envelope.
///
/// Callers mount this inside a scope wrapped in the session middleware.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use recipe_backend::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(users::update_current_user);
    labels::configure(cfg);
    recipes::configure(cfg);
}
