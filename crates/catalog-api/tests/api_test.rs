//! Router tests for the product API
//!
//! These drive the full router (routing, access gate, handlers, repository)
//! with in-process requests via `oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use catalog_api::handlers::ErrorResponse;
use catalog_api::{create_router, AppConfig, AppState, GatePolicy, Operation};
use catalog_core::{seed, Product, ProductRepository};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // For oneshot()
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

const KEY: &str = "test-key";

fn app_with(policy: GatePolicy, repository: ProductRepository) -> Router {
    let config = AppConfig {
        api_key: Some(KEY.to_string()),
        gate_policy: policy,
        ..Default::default()
    };
    create_router(AppState::with_repository(config, repository))
}

fn seeded_app() -> (Router, ProductRepository) {
    let repository = ProductRepository::from_seed(seed::builtin()).unwrap();
    (app_with(GatePolicy::open(), repository.clone()), repository)
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Records the level of every request/response event from the trace layer
#[derive(Clone, Default)]
struct TraceLevels(Arc<Mutex<Vec<Level>>>);

impl<S: tracing::Subscriber> Layer<S> for TraceLevels {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target().starts_with("tower_http::trace") {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }
}

#[tokio::test]
async fn test_requests_are_traced_at_info() {
    let levels = TraceLevels::default();
    let subscriber = tracing_subscriber::registry().with(levels.clone());
    let _guard = tracing::subscriber::set_default(subscriber);
    let (app, _) = seeded_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // one event when the request arrives, one when the response is ready
    let seen = levels.0.lock().unwrap().clone();
    assert!(seen.len() >= 2, "{:?}", seen);
    assert!(seen.iter().all(|level| *level == Level::INFO), "{:?}", seen);
}

#[tokio::test]
async fn test_list_defaults_to_first_page() {
    let (app, _) = seeded_app();

    let response = app.oneshot(get("/api/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalProducts"], 8);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["perPage"], 10);
    assert_eq!(body["products"].as_array().unwrap().len(), 8);
    assert_eq!(body["products"][0]["name"], "Laptop");
}

#[tokio::test]
async fn test_collection_path_accepts_trailing_slash() {
    let repository = ProductRepository::from_seed(seed::builtin()).unwrap();
    let app = app_with(GatePolicy::default(), repository.clone());

    let response = app.clone().oneshot(get("/api/products/?limit=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalProducts"], 8);
    assert_eq!(body["products"].as_array().unwrap().len(), 3);

    // the gate still applies to create on the slash form
    let response = app
        .oneshot(with_json(
            "POST",
            "/api/products/",
            json!({ "name": "Kettle", "description": "Electric kettle", "price": 30, "category": "kitchen", "inStock": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(repository.len(), 8);
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let (app, _) = seeded_app();

    let response = app
        .oneshot(get("/api/products?category=ELECTRONICS&page=2&limit=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalProducts"], 3);
    let names: Vec<_> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["External SSD"]);
}

#[tokio::test]
async fn test_list_search() {
    let (app, _) = seeded_app();

    let response = app.oneshot(get("/api/products?search=wireless")).await.unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalProducts"], 1);
    assert_eq!(body["products"][0]["id"], "4");
}

#[tokio::test]
async fn test_list_rejects_bad_pagination() {
    let (app, _) = seeded_app();

    for uri in ["/api/products?page=0", "/api/products?limit=abc", "/api/products?page=-2"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_oversized_page_is_empty_not_rejected() {
    let (app, _) = seeded_app();

    let response = app
        .oneshot(get("/api/products?page=99999999999999999999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalProducts"], 8);
    assert!(body["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_page_beyond_data_is_empty() {
    let (app, _) = seeded_app();

    let response = app.oneshot(get("/api/products?page=50")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalProducts"], 8);
    assert!(body["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_is_not_an_id() {
    let (app, _) = seeded_app();

    let response = app.oneshot(get("/api/products/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalProducts"], 8);
    assert_eq!(
        body["countByCategory"],
        json!({ "accessories": 2, "electronics": 3, "kitchen": 2, "wearables": 1 })
    );
    assert_eq!(body["inStock"], 6);
    assert_eq!(body["outOfStock"], 2);
    assert_eq!(body["averagePrice"], 310.63);
}

#[tokio::test]
async fn test_get_product() {
    let (app, _) = seeded_app();

    let response = app.clone().oneshot(get("/api/products/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, "Smartphone");

    let response = app.oneshot(get("/api/products/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.code, 404);
}

#[tokio::test]
async fn test_create_returns_201_and_is_listed() {
    let (app, repository) = seeded_app();

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/products",
            json!({
                "name": "Kettle",
                "description": "Electric kettle",
                "price": 30,
                "category": "kitchen",
                "inStock": true,
                "id": "ignored"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Product = json_body(response.into_body()).await;
    assert_ne!(created.id, "ignored");
    assert_eq!(created.price, 30.0);
    assert_eq!(repository.get(&created.id).unwrap(), created);

    let response = app
        .oneshot(get("/api/products?category=kitchen&search=kettle"))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalProducts"], 1);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (app, repository) = seeded_app();

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/products",
            json!({ "name": "Kettle", "description": "Electric kettle", "price": 30, "category": "kitchen" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert!(error.error.contains("inStock"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repository.len(), 8);
}

#[tokio::test]
async fn test_update_is_partial() {
    let (app, repository) = seeded_app();
    let before = repository.get("3").unwrap();

    let response = app
        .oneshot(with_json("PUT", "/api/products/3", json!({ "inStock": true })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let after: Product = json_body(response.into_body()).await;
    assert!(after.in_stock);
    assert_eq!(after.id, before.id);
    assert_eq!(after.name, before.name);
    assert_eq!(after.price, before.price);
}

#[tokio::test]
async fn test_update_rejects_bad_price_without_mutating() {
    let (app, repository) = seeded_app();
    let before = repository.get("1").unwrap();

    let response = app
        .oneshot(with_json("PUT", "/api/products/1", json!({ "price": -5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert!(error.error.contains("Price"));
    assert_eq!(repository.get("1").unwrap(), before);
}

#[tokio::test]
async fn test_empty_update_rejected_even_for_unknown_id() {
    let (app, _) = seeded_app();

    for uri in ["/api/products/1", "/api/products/does-not-exist"] {
        let response = app
            .clone()
            .oneshot(with_json("PUT", uri, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }

    let response = app
        .oneshot(with_json("PUT", "/api/products/nope", json!({ "name": "x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let (app, _) = seeded_app();

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri("/api/products/5")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/products/5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_default_policy_gates_writes_only() {
    let repository = ProductRepository::from_seed(seed::builtin()).unwrap();
    let app = app_with(GatePolicy::default(), repository.clone());

    let response = app.clone().oneshot(get("/api/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(with_json("PUT", "/api/products/1", json!({ "price": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(repository.get("1").unwrap().price, 1200.0);

    let mut request = with_json("PUT", "/api/products/1", json!({ "price": 1 }));
    request
        .headers_mut()
        .insert("x-api-key", KEY.parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_each_operation_gated_independently() {
    let repository = ProductRepository::from_seed(seed::builtin()).unwrap();
    let app = app_with(GatePolicy::only([Operation::Stats]), repository);

    let response = app.clone().oneshot(get("/api/products/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "Unauthorized: Invalid or missing API key");

    let response = app.clone().oneshot(get("/api/products/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut request = get("/api/products/stats");
    request
        .headers_mut()
        .insert("x-api-key", "wrong".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = seeded_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["products"], 8);
}
