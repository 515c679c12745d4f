// src/handlers/settings.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::RequireAdmin},
    models::settings::{StatusColor, StatusColorMap, UpdateStatusColorRequest},
};

// GET /api/settings/status-colors
#[utoipa::path(
    get,
    path = "/api/settings/status-colors",
    tag = "Settings",
    responses(
        (status = 200, description = "Cor e rótulo de cada status de mesa", body = StatusColorMap)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_status_colors(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let colors = app_state.settings_repo.list_status_colors().await?;
    Ok((StatusCode::OK, Json(StatusColorMap::from(colors))))
}

// PUT /api/settings/status-colors/{status_key}
#[utoipa::path(
    put,
    path = "/api/settings/status-colors/{status_key}",
    tag = "Settings",
    request_body = UpdateStatusColorRequest,
    params(
        ("status_key" = String, Path, description = "free, reserved, serving ou paid")
    ),
    responses(
        (status = 200, description = "Cor atualizada", body = StatusColor),
        (status = 404, description = "Status desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status_color(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(status_key): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateStatusColorRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = app_state
        .settings_repo
        .update_status_color(&status_key, &payload.color_hex)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Status '{}' não encontrado.", status_key)))?;

    Ok((StatusCode::OK, Json(updated)))
}
