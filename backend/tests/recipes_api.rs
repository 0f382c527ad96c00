//! Recipe lifecycle, filtering, images and owner isolation.

mod support;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};
use support::{Harness, create_label, detail, json_body, send, signed_up};

async fn create_recipe<S>(app: &S, cookie: &Cookie<'static>, body: Value) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie.clone())
            .set_json(body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

async fn upload<S>(
    app: &S,
    cookie: &Cookie<'static>,
    recipe_id: &str,
    filename: &str,
) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/recipes/{recipe_id}/upload-image"))
            .cookie(cookie.clone())
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ))
            .set_payload(format!("bytes of {filename}")),
    )
    .await
}

fn id_of(value: &Value) -> String {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .expect("id")
}

#[actix_web::test]
async fn recipes_round_trip_through_every_verb() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_up(&app, "cook@example.com", "secret").await;
    let vegan = create_label(&app, &cookie, "tags", "Vegan").await;
    let salt = create_label(&app, &cookie, "ingredients", "Salt").await;

    let created = create_recipe(
        &app,
        &cookie,
        json!({
            "title": "Soup",
            "time_minutes": 10,
            "price": "5.50",
            "link": "https://example.com/soup",
            "tags": [vegan],
            "ingredients": [salt],
        }),
    )
    .await;
    let id = id_of(&created);
    assert_eq!(created.get("price").and_then(Value::as_str), Some("5.50"));

    let detail_response = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/recipes/{id}"))
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(detail_response.status(), StatusCode::OK);
    let detail_body = json_body(detail_response).await;
    assert_eq!(
        detail_body.get("tags"),
        Some(&json!([{ "id": vegan, "name": "Vegan" }]))
    );
    assert_eq!(
        detail_body.get("ingredients"),
        Some(&json!([{ "id": salt, "name": "Salt" }]))
    );

    let patched = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/recipes/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Stew", "link": null })),
    )
    .await;
    assert_eq!(patched.status(), StatusCode::OK);
    let patched = json_body(patched).await;
    assert_eq!(patched.get("title").and_then(Value::as_str), Some("Stew"));
    assert_eq!(patched.get("link").and_then(Value::as_str), Some(""));
    assert_eq!(patched.get("tags"), Some(&json!([vegan])));

    let replaced = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/recipes/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Broth", "time_minutes": 30, "price": 2 })),
    )
    .await;
    assert_eq!(replaced.status(), StatusCode::OK);
    let replaced = json_body(replaced).await;
    assert_eq!(replaced.get("price").and_then(Value::as_str), Some("2.00"));
    assert_eq!(replaced.get("tags"), Some(&json!([])));
    assert_eq!(replaced.get("ingredients"), Some(&json!([])));

    let deleted = send(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/recipes/{id}"))
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/recipes/{id}"))
            .cookie(cookie),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_filters_match_any_tag_and_any_ingredient() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_up(&app, "cook@example.com", "secret").await;
    let vegan = create_label(&app, &cookie, "tags", "Vegan").await;
    let quick = create_label(&app, &cookie, "tags", "Quick").await;
    let salt = create_label(&app, &cookie, "ingredients", "Salt").await;

    let base = json!({ "time_minutes": 5, "price": "1.00" });
    let with = |title: &str, tags: Vec<&String>, ingredients: Vec<&String>| {
        let mut body = base.clone();
        body["title"] = json!(title);
        body["tags"] = json!(tags);
        body["ingredients"] = json!(ingredients);
        body
    };
    create_recipe(&app, &cookie, with("Beans", vec![&vegan], vec![&salt])).await;
    create_recipe(&app, &cookie, with("Apples", vec![&quick], vec![])).await;
    create_recipe(&app, &cookie, with("Chips", vec![], vec![&salt])).await;

    let titles = |uri: String| {
        let app = &app;
        let cookie = cookie.clone();
        async move {
            let response = send(app, test::TestRequest::get().uri(&uri).cookie(cookie)).await;
            assert_eq!(response.status(), StatusCode::OK);
            json_body(response)
                .await
                .as_array()
                .expect("array")
                .iter()
                .filter_map(|recipe| recipe.get("title").and_then(Value::as_str))
                .map(str::to_owned)
                .collect::<Vec<_>>()
        }
    };

    assert_eq!(
        titles("/api/v1/recipes".to_owned()).await,
        ["Apples", "Beans", "Chips"]
    );
    assert_eq!(
        titles(format!("/api/v1/recipes?tags={vegan},{quick}")).await,
        ["Apples", "Beans"]
    );
    assert_eq!(
        titles(format!("/api/v1/recipes?ingredients={salt}")).await,
        ["Beans", "Chips"]
    );
    assert_eq!(
        titles(format!("/api/v1/recipes?tags={vegan}&ingredients={salt}")).await,
        ["Beans"]
    );
}

#[actix_web::test]
async fn uploads_store_the_image_and_replace_the_previous_one() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_up(&app, "cook@example.com", "secret").await;
    let recipe = create_recipe(
        &app,
        &cookie,
        json!({ "title": "Soup", "time_minutes": 10, "price": "5.50" }),
    )
    .await;
    let id = id_of(&recipe);

    let first = upload(&app, &cookie, &id, "myimage.jpg").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = json_body(first).await;
    assert_eq!(
        first.get("image").and_then(Value::as_str),
        Some("uploads/recipe/img-1.jpg")
    );
    assert_eq!(
        harness.images.get("uploads/recipe/img-1.jpg").as_deref(),
        Some(b"bytes of myimage.jpg".as_slice())
    );

    let second = upload(&app, &cookie, &id, "photo.PNG").await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(harness.images.paths(), ["uploads/recipe/img-2.PNG"]);

    send(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/recipes/{id}"))
            .cookie(cookie),
    )
    .await;
    assert!(harness.images.paths().is_empty());
}

#[rstest]
#[case("notes", "invalid_image_name")]
#[case("../../etc/passwd", "invalid_image_name")]
#[actix_web::test]
async fn uploads_need_a_safe_extension(#[case] filename: &str, #[case] code: &str) {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_up(&app, "cook@example.com", "secret").await;
    let recipe = create_recipe(
        &app,
        &cookie,
        json!({ "title": "Soup", "time_minutes": 10, "price": "5.50" }),
    )
    .await;

    let response = upload(&app, &cookie, &id_of(&recipe), filename).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(detail(&body, "field"), Some("image"));
    assert_eq!(detail(&body, "code"), Some(code));
    assert!(harness.images.paths().is_empty());
}

#[actix_web::test]
async fn owners_cannot_see_or_reference_each_others_data() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let alice = signed_up(&app, "alice@example.com", "secret").await;
    let bob = signed_up(&app, "bob@example.com", "secret").await;
    let alices_tag = create_label(&app, &alice, "tags", "Secret").await;
    let alices_recipe = create_recipe(
        &app,
        &alice,
        json!({ "title": "Family stew", "time_minutes": 90, "price": "12.00" }),
    )
    .await;
    let alices_id = id_of(&alices_recipe);

    let listed = send(
        &app,
        test::TestRequest::get().uri("/api/v1/recipes").cookie(bob.clone()),
    )
    .await;
    assert_eq!(json_body(listed).await, json!([]));

    for request in [
        test::TestRequest::get().uri(&format!("/api/v1/recipes/{alices_id}")),
        test::TestRequest::delete().uri(&format!("/api/v1/recipes/{alices_id}")),
        test::TestRequest::patch()
            .uri(&format!("/api/v1/recipes/{alices_id}"))
            .set_json(json!({ "title": "Mine now" })),
    ] {
        let response = send(&app, request.cookie(bob.clone())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let borrowed = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(bob)
            .set_json(json!({
                "title": "Copycat",
                "time_minutes": 5,
                "price": "1.00",
                "tags": [alices_tag],
            })),
    )
    .await;
    assert_eq!(borrowed.status(), StatusCode::BAD_REQUEST);
    let body = json_body(borrowed).await;
    assert_eq!(detail(&body, "field"), Some("tags"));
    assert_eq!(detail(&body, "code"), Some("reference_not_found"));
}

#[actix_web::test]
async fn recipes_require_a_session() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let response = send(&app, test::TestRequest::get().uri("/api/v1/recipes")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
