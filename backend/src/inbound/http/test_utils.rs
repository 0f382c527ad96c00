//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockLabelCommand, MockLabelQuery, MockLoginService,
    MockRecipeCommand, MockRecipeQuery,
};
use crate::domain::{Ingredient, Tag, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, LabelPorts};

/// Fixture id for the authenticated caller.
pub const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// [`USER_ID`] as a typed id.
pub fn user_id() -> UserId {
    UserId::new(USER_ID).expect("fixture user id")
}

/// Session middleware with a fresh key, cookie name `session` and the
/// `Secure` flag off for plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
///
/// # Panics
/// Panics when the response sets no session cookie.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// One mock per driving port. Set expectations on the fields, then call
/// [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub accounts: MockAccountCommand,
    pub account_query: MockAccountQuery,
    pub tag_command: MockLabelCommand<Tag>,
    pub tag_query: MockLabelQuery<Tag>,
    pub ingredient_command: MockLabelCommand<Ingredient>,
    pub ingredient_query: MockLabelQuery<Ingredient>,
    pub recipes: MockRecipeCommand,
    pub recipe_query: MockRecipeQuery,
}

impl MockPorts {
    /// Mocks whose login service accepts any credentials as [`USER_ID`].
    pub fn signed_in() -> Self {
        let mut ports = Self::default();
        ports
            .login
            .expect_authenticate()
            .returning(|_| Ok(user_id()));
        ports
    }

    /// Wrap the mocks as handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            login: Arc::new(self.login),
            accounts: Arc::new(self.accounts),
            account_query: Arc::new(self.account_query),
            tags: LabelPorts {
                command: Arc::new(self.tag_command),
                query: Arc::new(self.tag_query),
            },
            ingredients: LabelPorts {
                command: Arc::new(self.ingredient_command),
                query: Arc::new(self.ingredient_query),
            },
            recipes: Arc::new(self.recipes),
            recipe_query: Arc::new(self.recipe_query),
        })
    }
}

/// The full `/api/v1` surface over `state`, behind a test session.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .configure(configure_api),
    )
}

/// Log in through `POST /api/v1/login` and return the session cookie.
///
/// # Panics
/// Panics when the login is rejected.
pub async fn login_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({ "email": "cook@example.com", "password": "secret" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed");
    session_cookie(&response)
}
