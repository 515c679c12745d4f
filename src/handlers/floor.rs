// src/handlers/floor.rs

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
    middleware::{auth::AuthenticatedUser, rbac::RequireAdmin},
    models::floor::{
        CreateHallRequest, CreateTableRequest, DiningTable, Floor, FreeTable, Hall,
        HallWithTables, UpdateHallRequest, UpdateTableRequest,
    },
};

// =============================================================================
//  LEITURA
// =============================================================================

// GET /api/floors
#[utoipa::path(
    get,
    path = "/api/floors",
    tag = "Floor",
    responses(
        (status = 200, description = "Andares do café", body = Vec<Floor>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_floors(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let floors = app_state.floor_service.list_floors().await?;
    Ok((StatusCode::OK, Json(floors)))
}

// GET /api/halls
#[utoipa::path(
    get,
    path = "/api/halls",
    tag = "Floor",
    responses(
        (status = 200, description = "Salões com as suas mesas", body = Vec<HallWithTables>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_halls(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let halls = app_state.floor_service.list_halls_with_tables().await?;
    Ok((StatusCode::OK, Json(halls)))
}

// GET /api/tables/free
#[utoipa::path(
    get,
    path = "/api/tables/free",
    tag = "Floor",
    responses(
        (status = 200, description = "Mesas livres (destino de transferência)", body = Vec<FreeTable>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_free_tables(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let tables = app_state.floor_service.list_free_tables().await?;
    Ok((StatusCode::OK, Json(tables)))
}

// =============================================================================
//  GESTÃO DE SALÕES (ADMIN)
// =============================================================================

// POST /api/halls
#[utoipa::path(
    post,
    path = "/api/halls",
    tag = "Floor",
    request_body = CreateHallRequest,
    responses(
        (status = 201, description = "Salão criado", body = Hall),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Andar não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_hall(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    WithRejection(Json(payload), _): WithRejection<Json<CreateHallRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hall = app_state.floor_service.create_hall(&payload).await?;
    Ok((StatusCode::CREATED, Json(hall)))
}

// PUT /api/halls/{id}
#[utoipa::path(
    put,
    path = "/api/halls/{id}",
    tag = "Floor",
    request_body = UpdateHallRequest,
    params(
        ("id" = i64, Path, description = "ID do salão")
    ),
    responses(
        (status = 200, description = "Salão atualizado", body = Hall),
        (status = 404, description = "Salão ou andar não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_hall(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateHallRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hall = app_state.floor_service.update_hall(id, &payload).await?;
    Ok((StatusCode::OK, Json(hall)))
}

// DELETE /api/halls/{id}
#[utoipa::path(
    delete,
    path = "/api/halls/{id}",
    tag = "Floor",
    params(
        ("id" = i64, Path, description = "ID do salão")
    ),
    responses(
        (status = 204, description = "Salão excluído"),
        (status = 404, description = "Salão não encontrado"),
        (status = 409, description = "O salão ainda possui mesas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_hall(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.floor_service.delete_hall(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  GESTÃO DE MESAS (ADMIN)
// =============================================================================

// POST /api/tables
#[utoipa::path(
    post,
    path = "/api/tables",
    tag = "Floor",
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Mesa criada (status inicial: free)", body = DiningTable),
        (status = 404, description = "Salão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_table(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    WithRejection(Json(payload), _): WithRejection<Json<CreateTableRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let table = app_state.floor_service.create_table(&payload).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

// PUT /api/tables/{id}
#[utoipa::path(
    put,
    path = "/api/tables/{id}",
    tag = "Floor",
    request_body = UpdateTableRequest,
    params(
        ("id" = i64, Path, description = "ID da mesa")
    ),
    responses(
        (status = 200, description = "Mesa atualizada", body = DiningTable),
        (status = 404, description = "Mesa ou salão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_table(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateTableRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let table = app_state.floor_service.update_table(id, &payload).await?;
    Ok((StatusCode::OK, Json(table)))
}

// DELETE /api/tables/{id}
#[utoipa::path(
    delete,
    path = "/api/tables/{id}",
    tag = "Floor",
    params(
        ("id" = i64, Path, description = "ID da mesa")
    ),
    responses(
        (status = 204, description = "Mesa excluída"),
        (status = 404, description = "Mesa não encontrada"),
        (status = 409, description = "Mesa em uso ou com faturas registradas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_table(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = RequestContext::new(admin.id, app_state.clock.now());

    app_state.floor_service.delete_table(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
