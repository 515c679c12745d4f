// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::auth_guard};

/// Monta todas as rotas da API. Usado pelo `main` e pelos testes de integração.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas protegidas pelo JWT (todas sob /api)
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        // Estrutura do salão
        .route("/floors", get(handlers::floor::list_floors))
        .route(
            "/halls",
            get(handlers::floor::list_halls).post(handlers::floor::create_hall),
        )
        .route(
            "/halls/{id}",
            put(handlers::floor::update_hall).delete(handlers::floor::delete_hall),
        )
        .route("/tables", post(handlers::floor::create_table))
        .route("/tables/free", get(handlers::floor::list_free_tables))
        .route(
            "/tables/{id}",
            put(handlers::floor::update_table).delete(handlers::floor::delete_table),
        )
        // Status e reservas
        .route("/tables/{id}/status", put(handlers::tables::update_status))
        .route(
            "/tables/{id}/reservation",
            post(handlers::tables::schedule_reservation)
                .delete(handlers::tables::cancel_reservation),
        )
        .route("/tables/{id}/order", get(handlers::tables::get_open_order))
        // Pedidos
        .route("/orders", post(handlers::orders::create_order))
        .route("/orders/{id}", put(handlers::orders::update_order))
        .route("/orders/{id}/settle", post(handlers::orders::settle_order))
        .route("/orders/{id}/transfer", post(handlers::orders::transfer_order))
        // Usuários e relatórios (somente admin)
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/users/{id}", put(handlers::users::update_user))
        .route("/reports/sales", get(handlers::reports::sales_report))
        // Cardápio e configurações
        .route("/menu", get(handlers::menu::get_menu))
        .route(
            "/settings/status-colors",
            get(handlers::settings::get_status_colors),
        )
        .route(
            "/settings/status-colors/{status_key}",
            put(handlers::settings::update_status_color),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login))
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
