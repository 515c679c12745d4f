// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    common::{context::RequestContext, error::AppError},
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::auth::{CreateUserRequest, PublicUser, UpdateUserRequest},
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários do sistema", body = Vec<PublicUser>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list_users().await?;
    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Usuário criado", body = PublicUser),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Nome de usuário já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUserRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ctx = RequestContext::new(admin.id, app_state.clock.now());
    let user = app_state.user_service.create_user(&ctx, &payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserRequest,
    params(
        ("id" = i64, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Usuário atualizado", body = PublicUser),
        (status = 400, description = "Nenhum campo enviado ou dados inválidos"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "Nome de usuário já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<i64>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUserRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ctx = RequestContext::new(admin.id, app_state.clock.now());
    let user = app_state.user_service.update_user(&ctx, user_id, &payload).await?;

    Ok((StatusCode::OK, Json(user)))
}
