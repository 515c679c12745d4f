// Testes de roteamento: tudo aqui é respondido antes de qualquer acesso ao banco,
// então o pool é criado com `connect_lazy` e nunca chega a conectar.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use cafe_floor::{
    build_router,
    common::clock::SystemClock,
    config::{AppState, Config},
    models::auth::UserRole,
};

fn test_state() -> AppState {
    let config = Config {
        database_url: "postgres://localhost/cafe_floor_unused".into(),
        jwt_secret: "segredo-de-teste".into(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        db_max_connections: 1,
        db_acquire_timeout: Duration::from_millis(100),
        reservation_sweep_interval: Duration::from_secs(300),
        reservation_lookahead: chrono::Duration::minutes(30),
    };
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(100))
        .connect_lazy(&config.database_url)
        .unwrap();

    AppState::from_pool(pool, config, Arc::new(SystemClock))
}

fn token_for(state: &AppState, role: UserRole) -> String {
    state.auth_service.create_token(1, role, Utc::now()).unwrap()
}

async fn send(app: Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_is_public() {
    let app = build_router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = build_router(test_state());

    let (status, body) = send(app, Method::GET, "/api/halls", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthorized");
}

#[tokio::test]
async fn malformed_token_is_rejected() {
    let app = build_router(test_state());

    let (status, body) = send(app, Method::GET, "/api/menu", Some("nao-e-um-jwt"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthorized");
}

#[tokio::test]
async fn waiter_cannot_manage_halls() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/halls",
        Some(&token),
        Some(json!({ "name": "Varanda", "floorId": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "forbidden");
}

#[tokio::test]
async fn waiter_cannot_change_status_colors() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, _) = send(
        app,
        Method::PUT,
        "/api/settings/status-colors/free",
        Some(&token),
        Some(json!({ "colorHex": "#000000" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_payload_is_validated() {
    let state = test_state();
    let token = token_for(&state, UserRole::Admin);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/tables",
        Some(&token),
        Some(json!({ "name": "", "capacity": 0, "hallId": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
    assert!(body["details"].get("capacity").is_some());
}

#[tokio::test]
async fn order_without_items_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({
            "tableId": 1,
            "systemUserId": 1,
            "customerName": "Ali",
            "items": []
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn order_with_only_removed_lines_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::PUT,
        "/api/orders/7",
        Some(&token),
        Some(json!({
            "systemUserId": 1,
            "customerName": "Ali",
            "items": [{ "menuItemId": 10, "quantity": 0, "price": 100 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn blank_customer_name_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({
            "tableId": 1,
            "systemUserId": 1,
            "customerName": "   ",
            "items": [{ "menuItemId": 10, "quantity": 2, "price": 100 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn negative_quantity_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({
            "tableId": 1,
            "systemUserId": 1,
            "customerName": "Ali",
            "items": [{ "menuItemId": 10, "quantity": -1, "price": 100 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn transfer_onto_the_same_table_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/orders/3/transfer",
        Some(&token),
        Some(json!({ "sourceTableId": 4, "destinationTableId": 4 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn reservation_in_the_past_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);
    let past = (Utc::now() - chrono::Duration::hours(1)).to_rfc3339();

    let (status, body) = send(
        app,
        Method::POST,
        "/api/tables/2/reservation",
        Some(&token),
        Some(json!({ "reservationTime": past })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn order_missing_customer_name_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({
            "tableId": 1,
            "systemUserId": 1,
            "items": [{ "menuItemId": 10, "quantity": 2, "price": 100 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
    assert!(body["error"].as_str().unwrap().contains("customerName"));
}

#[tokio::test]
async fn update_without_items_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::PUT,
        "/api/orders/7",
        Some(&token),
        Some(json!({ "systemUserId": 1, "customerName": "Ali" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn body_that_is_not_json_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/orders/3/transfer")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("origem=4&destino=5"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn waiter_cannot_manage_users_or_read_reports() {
    let state = test_state();
    let token = token_for(&state, UserRole::Waiter);
    let app = build_router(state);

    let (status, _) = send(
        app.clone(),
        Method::POST,
        "/api/users",
        Some(&token),
        Some(json!({
            "username": "reza",
            "fullName": "Reza Karimi",
            "password": "segredo1",
            "mobile": "0912"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app, Method::GET, "/api/reports/sales", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn short_password_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Admin);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/users",
        Some(&token),
        Some(json!({
            "username": "reza",
            "fullName": "Reza Karimi",
            "password": "123",
            "mobile": "0912"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("password").is_some());
}

#[tokio::test]
async fn empty_user_update_is_a_bad_request() {
    let state = test_state();
    let token = token_for(&state, UserRole::Admin);
    let app = build_router(state);

    let (status, body) = send(app, Method::PUT, "/api/users/2", Some(&token), Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn admin_cannot_deactivate_themselves() {
    let state = test_state();
    // token_for emite o token para o usuário 1
    let token = token_for(&state, UserRole::Admin);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::PUT,
        "/api/users/1",
        Some(&token),
        Some(json!({ "isActive": false })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn sales_report_rejects_inverted_range() {
    let state = test_state();
    let token = token_for(&state, UserRole::Admin);
    let app = build_router(state);

    let (status, body) = send(
        app,
        Method::GET,
        "/api/reports/sales?from=2025-06-10&to=2025-06-01",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn sales_report_rejects_malformed_date() {
    let state = test_state();
    let token = token_for(&state, UserRole::Admin);
    let app = build_router(state);

    let (status, body) =
        send(app, Method::GET, "/api/reports/sales?from=ontem", Some(&token), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}
