//! Shared harness for HTTP integration tests over the in-memory adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use recipe_backend::Trace;
use recipe_backend::domain::{AccountService, LabelService, RecipeService, UploadIdSource};
use recipe_backend::inbound::http::configure_api;
use recipe_backend::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::memory::InMemoryStore;
use recipe_backend::outbound::storage::InMemoryImageStore;
use serde_json::{Value, json};

/// Upload ids `img-1`, `img-2`, ... in call order.
#[derive(Default)]
pub struct SequentialUploadIds(AtomicUsize);

impl UploadIdSource for SequentialUploadIds {
    fn next_id(&self) -> String {
        format!("img-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// In-memory adapters behind one test application.
pub struct Harness {
    pub images: Arc<InMemoryImageStore>,
    state: web::Data<HttpState>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let images = Arc::new(InMemoryImageStore::new());
        let recipes = RecipeService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            images.clone(),
        )
        .with_upload_ids(Arc::new(SequentialUploadIds::default()));
        let state = HttpState::from_services(
            Arc::new(AccountService::new(store.clone())),
            Arc::new(LabelService::new(store)),
            Arc::new(recipes),
        );
        Self {
            images,
            state: web::Data::new(state),
        }
    }

    /// Application mounted the way the server mounts it.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        };
        App::new().app_data(self.state.clone()).wrap(Trace).service(
            web::scope("/api/v1")
                .wrap(session.middleware())
                .configure(configure_api),
        )
    }
}

/// Decode a JSON response body.
pub async fn json_body(response: ServiceResponse) -> Value {
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

/// `details.<key>` of an error envelope.
pub fn detail<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get("details")?.get(key)?.as_str()
}

/// Send `request` and return the response.
pub async fn send<S>(app: &S, request: test::TestRequest) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(app, request.to_request()).await
}

/// Register `email` with `password` and return the login session cookie.
pub async fn signed_up<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let registered = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(registered.status().as_u16(), 201, "registration of {email}");
    log_in(app, email, password)
        .await
        .expect("login after registration")
}

/// Log in and return the session cookie, or `None` when rejected.
pub async fn log_in<S>(app: &S, email: &str, password: &str) -> Option<Cookie<'static>>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await;
    if !response.status().is_success() {
        return None;
    }
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// Create a label under `collection` (`tags` or `ingredients`) and return
/// its id.
pub async fn create_label<S>(app: &S, cookie: &Cookie<'static>, collection: &str, name: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = send(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/{collection}"))
            .cookie(cookie.clone())
            .set_json(json!({ "name": name })),
    )
    .await;
    assert_eq!(response.status().as_u16(), 201, "create {collection} {name}");
    json_body(response)
        .await
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .expect("label id")
}
