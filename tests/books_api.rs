//! End-to-end tests of the `/book` endpoints through the full router.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use catalog_app::modules;
use catalog_db::{DocumentStore, Filter, MemoryStore, Store};
use catalog_kernel::{settings::Settings, Module, ModuleRegistry};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Store,
}

fn test_app() -> TestApp {
    let settings = Settings::default();
    let store: Store = Arc::new(MemoryStore::new());

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store.clone(), &settings);

    TestApp {
        router: catalog_http::router::RouterBuilder::new()
            .mount_module("/book", registry.get_module("books").unwrap().routes())
            .build(),
        store,
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &TestApp, book: Value) -> Value {
    let (status, created) = send(app, Method::POST, "/book", Some(book)).await;
    assert_eq!(status, StatusCode::CREATED);
    created
}

async fn stored_docs(app: &TestApp) -> Vec<catalog_db::Document> {
    app.store.find("books", &Filter::All).await.unwrap()
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = test_app();
    let created = create(
        &app,
        json!({"title": "Dune", "average_rating": 4.8, "num_pages": 412}),
    )
    .await;

    let id = created["_id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["average_rating"], 4.8);
    assert_eq!(created["num_pages"], 412);

    let (status, fetched) = send(&app, Method::GET, &format!("/book/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_honours_supplied_id_and_rejects_reuse() {
    let app = test_app();
    let created = create(&app, json!({"_id": "dune-1", "title": "Dune"})).await;
    assert_eq!(created["_id"], "dune-1");

    let (status, body) = send(
        &app,
        Method::POST,
        "/book",
        Some(json!({"_id": "dune-1", "title": "Dune again"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn create_rejects_rating_outside_scale() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/book",
        Some(json!({"title": "Dune", "average_rating": 7.5})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["field"], "average_rating");
    assert!(stored_docs(&app).await.is_empty());
}

#[tokio::test]
async fn list_filters_by_minimum_rating() {
    let app = test_app();
    for (title, rating) in [("Low", 2.0), ("Mid", 4.0), ("Top", 5.0), ("Zero", 0.0)] {
        create(&app, json!({"title": title, "average_rating": rating})).await;
    }

    let titles = |books: &Value| -> Vec<String> {
        books
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, all) = send(&app, Method::GET, "/book", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&all), vec!["Low", "Mid", "Top", "Zero"]);

    let (_, zero) = send(&app, Method::GET, "/book?rating=0", None).await;
    assert_eq!(titles(&zero).len(), 4);

    let (_, good) = send(&app, Method::GET, "/book?rating=4", None).await;
    assert_eq!(titles(&good), vec!["Mid", "Top"]);

    let (_, best) = send(&app, Method::GET, "/book?rating=5", None).await;
    assert_eq!(titles(&best), vec!["Top"]);
}

#[tokio::test]
async fn list_with_non_numeric_rating_is_bad_request() {
    let app = test_app();
    create(&app, json!({"title": "Dune", "average_rating": 4.8})).await;

    let (status, body) = send(&app, Method::GET, "/book?rating=abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to deserialize query string"));
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/book/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Book with ID missing not found");
}

#[tokio::test]
async fn update_merges_fields_and_keeps_id() {
    let app = test_app();
    let created = create(
        &app,
        json!({"title": "Dune", "authors": ["Frank Herbert"], "num_pages": 412}),
    )
    .await;
    let id = created["_id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/book/{id}"),
        Some(json!({"_id": "other", "num_pages": 500, "publisher": "Ace"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], id);
    assert_eq!(updated["num_pages"], 500);
    assert_eq!(updated["publisher"], "Ace");
    assert_eq!(updated["title"], "Dune");
    assert_eq!(updated["authors"], json!(["Frank Herbert"]));

    let (_, fetched) = send(&app, Method::GET, &format!("/book/{id}"), None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_unknown_id_is_not_found_and_writes_nothing() {
    let app = test_app();
    create(&app, json!({"_id": "b-1", "title": "Dune"})).await;
    let before = stored_docs(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/book/missing",
        Some(json!({"title": "Emma"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(stored_docs(&app).await, before);
}

#[tokio::test]
async fn update_rejects_wrongly_typed_field() {
    let app = test_app();
    create(&app, json!({"_id": "b-1", "title": "Dune", "num_pages": 412})).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/book/b-1",
        Some(json!({"num_pages": "lots"})),
    )
    .await;

    assert!(status.is_client_error());
    let (_, fetched) = send(&app, Method::GET, "/book/b-1", None).await;
    assert_eq!(fetched["num_pages"], 412);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = test_app();
    let created = create(
        &app,
        json!({"title": "Dune", "average_rating": 4.8, "num_pages": 412}),
    )
    .await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/book/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Book with ID {id} has been deleted successfully")
    );

    let (status, _) = send(&app, Method::GET, &format!("/book/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/book/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_router_serves_health_and_openapi() {
    let settings = Settings::default();
    let store: Store = Arc::new(MemoryStore::new());
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, &settings);

    let app = TestApp {
        router: catalog_http::build_router(&registry, &settings),
        store: Arc::new(MemoryStore::new()),
    };

    let (status, _) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, doc) = send(&app, Method::GET, "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/book"]["get"].is_object());
    assert!(doc["paths"]["/book/{id}"]["delete"].is_object());
    assert_eq!(
        doc["paths"]["/book/{id}"]["get"]["responses"]["404"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/ErrorResponse"
    );
    assert_eq!(
        doc["paths"]["/book/{id}"]["delete"]["responses"]["200"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/DeleteConfirmation"
    );

    let (status, books) = send(&app, Method::GET, "/book", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books, json!([]));
}
