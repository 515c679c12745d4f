// src/handlers/menu.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::menu::MenuData,
};

// GET /api/menu
#[utoipa::path(
    get,
    path = "/api/menu",
    tag = "Menu",
    responses(
        (status = 200, description = "Categorias e itens do cardápio", body = MenuData)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_menu(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.menu_repo.list_categories().await?;
    let items = app_state.menu_repo.list_items().await?;

    Ok((StatusCode::OK, Json(MenuData { categories, items })))
}
