//! End-to-end HTTP behaviour against an in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shelf_api::config::DatabaseSettings;
use shelf_api::{build_app, sync_schema, Database};
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::connect(&DatabaseSettings::in_memory()).await.unwrap();
    sync_schema(&db).await.unwrap();
    build_app(Arc::new(db))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let (status, created) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created
}

#[tokio::test]
async fn root_is_alive() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Hello World"));
}

#[tokio::test]
async fn bad_route_is_404() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/badroute", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn bad_method_is_404() {
    let app = app().await;
    let (status, _) = send(&app, Method::PUT, "/authors", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::POST, "/books/1", Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::PATCH, "/food/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_lifecycle() {
    let app = app().await;
    let created = create(&app, "/authors", json!({"name": "Author 2"})).await;
    assert_eq!(created["name"], "Author 2");
    assert!(created["id"].is_i64());
    assert!(created["createdAt"].is_string());
    let id = created["id"].as_i64().unwrap();

    let (status, list) = send(&app, Method::GET, "/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!list.as_array().unwrap().is_empty());

    let (status, fetched) = send(&app, Method::GET, &format!("/authors/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/authors/{id}"),
        Some(json!({"name": "Updated Author 1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Updated Author 1");
    assert_eq!(updated["id"], id);

    let (status, body) = send(&app, Method::DELETE, &format!("/authors/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn books_reference_authors() {
    let app = app().await;
    let author = create(&app, "/authors", json!({"name": "Author 3"})).await;
    let book = create(&app, "/books", json!({"title": "New Book", "authorId": author["id"]})).await;
    assert_eq!(book["title"], "New Book");
    assert_eq!(book["authorId"], author["id"]);

    let unattached = create(&app, "/books", json!({"title": "Anonymous"})).await;
    assert_eq!(unattached["authorId"], Value::Null);

    let (status, list) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn book_update_then_delete() {
    let app = app().await;
    let book = create(&app, "/books", json!({"title": "Book 1"})).await;
    let uri = format!("/books/{}", book["id"]);

    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({"title": "Updated Book 1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Updated Book 1");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Book not found"}));
}

#[tokio::test]
async fn delete_is_not_repeatable() {
    let app = app().await;
    let food = create(&app, "/food", json!({"name": "Egg", "calories": 78, "type": "protein"})).await;
    let uri = format!("/food/{}", food["id"]);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Food not found"}));
}

#[tokio::test]
async fn missing_ids_are_404_for_every_resource() {
    let app = app().await;
    for (path, resource, body) in [
        ("/authors", "Author", json!({"name": "x"})),
        ("/books", "Book", json!({"title": "x"})),
        ("/food", "Food", json!({"calories": 1})),
    ] {
        let uri = format!("{path}/4242");
        let expected = json!({"error": format!("{resource} not found")});
        assert_eq!(send(&app, Method::GET, &uri, None).await, (StatusCode::NOT_FOUND, expected.clone()));
        assert_eq!(send(&app, Method::PUT, &uri, Some(body)).await, (StatusCode::NOT_FOUND, expected.clone()));
        assert_eq!(send(&app, Method::DELETE, &uri, None).await, (StatusCode::NOT_FOUND, expected.clone()));
        assert_eq!(
            send(&app, Method::GET, &format!("{path}/not-a-number"), None).await,
            (StatusCode::NOT_FOUND, expected)
        );
    }
}

#[tokio::test]
async fn food_partial_update() {
    let app = app().await;
    let carrot = create(&app, "/food", json!({"name": "Carrot", "calories": 25, "type": "vegetable"})).await;
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/food/{}", carrot["id"]),
        Some(json!({"calories": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Carrot");
    assert_eq!(updated["calories"], 30);
    assert_eq!(updated["type"], "vegetable");
    assert_eq!(updated["createdAt"], carrot["createdAt"]);
}

#[tokio::test]
async fn food_type_outside_enum_is_400() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/food", Some(json!({"name": "Steak", "calories": 271, "type": "meat"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, list) = send(&app, Method::GET, "/food", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn validation_failures_are_400() {
    let app = app().await;
    for (uri, body) in [
        ("/authors", json!({})),
        ("/authors", json!({"name": ""})),
        ("/authors", json!({"name": 12})),
        ("/books", json!({"authorId": 1})),
        ("/food", json!({"name": "Kiwi", "calories": "lots", "type": "fruit"})),
        ("/food", json!([])),
    ] {
        let (status, res) = send(&app, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {res}");
        assert!(res["error"].is_string());
    }

    let author = create(&app, "/authors", json!({"name": "Kept"})).await;
    let uri = format!("/authors/{}", author["id"]);
    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["name"], "Kept");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app().await;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/authors")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_of_missing_record_is_404_before_body_errors() {
    let app = app().await;
    let malformed = Request::builder()
        .method(Method::PUT)
        .uri("/authors/4242")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let res = app.clone().oneshot(malformed).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Author not found"}));

    let untyped = Request::builder()
        .method(Method::PUT)
        .uri("/authors/4242")
        .body(Body::from("name=x"))
        .unwrap();
    let res = app.clone().oneshot(untyped).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let author = create(&app, "/authors", json!({"name": "A"})).await;
    let malformed = Request::builder()
        .method(Method::PUT)
        .uri(format!("/authors/{}", author["id"]))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let res = app.oneshot(malformed).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_failures_are_500() {
    let db = Database::connect(&DatabaseSettings::in_memory()).await.unwrap();
    sync_schema(&db).await.unwrap();
    let db = Arc::new(db);
    let app = build_app(Arc::clone(&db));
    db.close().await;

    let (status, body) = send(&app, Method::GET, "/authors", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_author_reference_is_400() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/books", Some(json!({"title": "Ghost", "authorId": 999}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn id_in_body_is_ignored() {
    let app = app().await;
    let author = create(&app, "/authors", json!({"name": "A", "id": 500})).await;
    assert_ne!(author["id"], 500);
    let uri = format!("/authors/{}", author["id"]);
    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({"id": 77, "name": "B"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], author["id"]);
}

#[tokio::test]
async fn cors_headers_are_set() {
    let app = app().await;
    let req = Request::builder()
        .uri("/authors")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
