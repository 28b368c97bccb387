//! End-to-end tests over the full router with an in-memory database and a
//! static token verifier standing in for the identity service.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use venta_api::auth::{AuthUser, AuthVerifier};
use venta_api::{build_router, AppState};
use venta_db::{Database, DbConfig};

/// Maps fixed tokens to fixed users; everything else fails verification.
struct StaticVerifier;

#[async_trait]
impl AuthVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Option<AuthUser> {
        match token {
            "token-alice" => Some(AuthUser {
                id: "user-alice".to_string(),
                email: Some("alice@example.com".to_string()),
            }),
            "token-bob" => Some(AuthUser {
                id: "user-bob".to_string(),
                email: None,
            }),
            _ => None,
        }
    }
}

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState {
        db,
        verifier: Arc::new(StaticVerifier),
    };
    build_router(state, &["http://localhost:3000".to_string()])
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_product(app: &Router, token: &str, name: &str, price: i64, stock: i64) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/products",
            Some(token),
            Some(json!({ "name": name, "price_cents": price, "stock": stock })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app().await;

    let (status, body) = send(&app, request("GET", "/api/products", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        request("GET", "/api/products", Some("bad-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_routes_open() {
    let app = test_app().await;

    let (status, body) = send(&app, request("GET", "/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, request("GET", "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_crud() {
    let app = test_app().await;

    let created = create_product(&app, "token-alice", "Coffee", 1200, 10).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["low_stock"], false);

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/products/{id}"), Some("token-alice"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Coffee");
    assert_eq!(body["price_cents"], 1200);

    // Partial update: only stock changes, and the low-stock flag flips.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/products/{id}"),
            Some("token-alice"),
            Some(json!({ "stock": 4 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"], 4);
    assert_eq!(body["name"], "Coffee");
    assert_eq!(body["low_stock"], true);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/products/{id}"),
            Some("token-alice"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        request("GET", &format!("/api/products/{id}"), Some("token-alice"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_validation() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/products",
            Some("token-alice"),
            Some(json!({ "name": "", "price_cents": 100 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/products",
            Some("token-alice"),
            Some(json!({ "name": "Coffee", "price_cents": -1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ownership_isolation() {
    let app = test_app().await;

    let created = create_product(&app, "token-alice", "Coffee", 1200, 10).await;
    let id = created["id"].as_str().unwrap();

    // Bob sees an empty list and cannot reach Alice's product by id.
    let (_, list) = send(&app, request("GET", "/api/products", Some("token-bob"), None)).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    let (status, _) = send(
        &app,
        request("GET", &format!("/api/products/{id}"), Some("token-bob"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/products/{id}"),
            Some("token-bob"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
async fn test_sale_computes_total_and_decrements_stock() {
    let app = test_app().await;

    let coffee = create_product(&app, "token-alice", "Coffee", 1000, 10).await;
    let tea = create_product(&app, "token-alice", "Tea", 500, 10).await;

    // Client-supplied total is ignored.
    let (status, sale) = send(
        &app,
        request(
            "POST",
            "/api/sales",
            Some("token-alice"),
            Some(json!({
                "items": [
                    { "product_id": coffee["id"], "quantity": 2 },
                    { "product_id": tea["id"], "quantity": 1 },
                ],
                "total": 1,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["total_cents"], 2500);

    let (_, product) = send(
        &app,
        request(
            "GET",
            &format!("/api/products/{}", coffee["id"].as_str().unwrap()),
            Some("token-alice"),
            None,
        ),
    )
    .await;
    assert_eq!(product["stock"], 8);
}

#[tokio::test]
async fn test_sale_empty_items_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/sales",
            Some("token-alice"),
            Some(json!({ "items": [] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("at least one item"));
}

#[tokio::test]
async fn test_sale_insufficient_stock_rolls_back() {
    let app = test_app().await;

    let coffee = create_product(&app, "token-alice", "Coffee", 1000, 10).await;
    let tea = create_product(&app, "token-alice", "Tea", 500, 1).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/sales",
            Some("token-alice"),
            Some(json!({
                "items": [
                    { "product_id": coffee["id"], "quantity": 2 },
                    { "product_id": tea["id"], "quantity": 5 },
                ],
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Tea"));
    assert!(message.contains('1'));
    assert!(message.contains('5'));

    // Nothing persisted: sales list empty, both stocks untouched.
    let (_, sales) = send(&app, request("GET", "/api/sales", Some("token-alice"), None)).await;
    assert_eq!(sales.as_array().unwrap().len(), 0);

    let (_, product) = send(
        &app,
        request(
            "GET",
            &format!("/api/products/{}", coffee["id"].as_str().unwrap()),
            Some("token-alice"),
            None,
        ),
    )
    .await;
    assert_eq!(product["stock"], 10);
}

#[tokio::test]
async fn test_sale_duplicate_lines_report_combined_stock_shortfall() {
    let app = test_app().await;
    let coffee = create_product(&app, "token-alice", "Coffee", 1000, 8).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/sales",
            Some("token-alice"),
            Some(json!({
                "items": [
                    { "product_id": coffee["id"], "quantity": 5 },
                    { "product_id": coffee["id"], "quantity": 5 },
                ],
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Coffee"));
    assert!(message.contains("available 8"));
    assert!(message.contains("requested 10"));

    let (_, product) = send(
        &app,
        request(
            "GET",
            &format!("/api/products/{}", coffee["id"].as_str().unwrap()),
            Some("token-alice"),
            None,
        ),
    )
    .await;
    assert_eq!(product["stock"], 8);
}

#[tokio::test]
async fn test_duplicate_sale_submission_records_twice() {
    let app = test_app().await;
    let coffee = create_product(&app, "token-alice", "Coffee", 1000, 10).await;
    let payload = json!({ "items": [{ "product_id": coffee["id"], "quantity": 1 }] });

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            request("POST", "/api/sales", Some("token-alice"), Some(payload.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, sales) = send(&app, request("GET", "/api/sales", Some("token-alice"), None)).await;
    assert_eq!(sales.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_sales_listing_nests_items() {
    let app = test_app().await;
    let coffee = create_product(&app, "token-alice", "Coffee", 1000, 10).await;

    send(
        &app,
        request(
            "POST",
            "/api/sales",
            Some("token-alice"),
            Some(json!({ "items": [{ "product_id": coffee["id"], "quantity": 3 }] })),
        ),
    )
    .await;

    let (status, sales) = send(&app, request("GET", "/api/sales", Some("token-alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let sale = &sales.as_array().unwrap()[0];
    assert_eq!(sale["items"].as_array().unwrap().len(), 1);
    assert_eq!(sale["items"][0]["quantity"], 3);
    assert_eq!(sale["items"][0]["unit_price_cents"], 1000);
    assert_eq!(sale["items"][0]["product"]["name"], "Coffee");
}

// =============================================================================
// Reports and backup
// =============================================================================

#[tokio::test]
async fn test_top_products_report() {
    let app = test_app().await;
    let a = create_product(&app, "token-alice", "A", 1000, 100).await;
    let b = create_product(&app, "token-alice", "B", 500, 100).await;

    for (id, qty) in [(&a["id"], 2), (&b["id"], 1), (&a["id"], 1)] {
        send(
            &app,
            request(
                "POST",
                "/api/sales",
                Some("token-alice"),
                Some(json!({ "items": [{ "product_id": id, "quantity": qty }] })),
            ),
        )
        .await;
    }

    let (status, top) = send(
        &app,
        request("GET", "/api/reports/top-products", Some("token-alice"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let top = top.as_array().unwrap();
    assert_eq!(top[0]["name"], "A");
    assert_eq!(top[0]["quantity"], 3);
    assert_eq!(top[0]["revenue_cents"], 3000);
    assert_eq!(top[1]["name"], "B");
    assert_eq!(top[1]["quantity"], 1);
}

#[tokio::test]
async fn test_daily_sales_report() {
    let app = test_app().await;
    let a = create_product(&app, "token-alice", "A", 1000, 10).await;
    send(
        &app,
        request(
            "POST",
            "/api/sales",
            Some("token-alice"),
            Some(json!({ "items": [{ "product_id": a["id"], "quantity": 1 }] })),
        ),
    )
    .await;

    let today = chrono::Utc::now().date_naive();
    let (status, sales) = send(
        &app,
        request(
            "GET",
            &format!("/api/reports/daily-sales?date={today}"),
            Some("token-alice"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/api/reports/daily-sales?date=not-a-date",
            Some("token-alice"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("date has invalid format"));
    assert!(message.contains("YYYY-MM-DD"));
}

#[tokio::test]
async fn test_backup_exports_all_owned_data() {
    let app = test_app().await;
    let a = create_product(&app, "token-alice", "A", 1000, 10).await;
    send(
        &app,
        request(
            "POST",
            "/api/customers",
            Some("token-alice"),
            Some(json!({ "name": "Carol" })),
        ),
    )
    .await;
    send(
        &app,
        request(
            "POST",
            "/api/sales",
            Some("token-alice"),
            Some(json!({ "items": [{ "product_id": a["id"], "quantity": 1 }] })),
        ),
    )
    .await;
    create_product(&app, "token-bob", "Hidden", 1, 1).await;

    let (status, backup) = send(&app, request("GET", "/api/backup", Some("token-alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backup["products"].as_array().unwrap().len(), 1);
    assert_eq!(backup["customers"].as_array().unwrap().len(), 1);
    assert_eq!(backup["sales"].as_array().unwrap().len(), 1);
    assert!(backup["exported_at"].is_string());
}
