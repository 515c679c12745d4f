// src/handlers/tables.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    common::{context::RequestContext, error::AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        floor::{ScheduleReservationRequest, UpdateTableStatusRequest},
        order::OpenOrderResponse,
    },
};

// PUT /api/tables/{id}/status
#[utoipa::path(
    put,
    path = "/api/tables/{id}/status",
    tag = "Tables",
    request_body = UpdateTableStatusRequest,
    params(
        ("id" = i64, Path, description = "ID da mesa")
    ),
    responses(
        (status = 204, description = "Status atualizado"),
        (status = 404, description = "Mesa não encontrada"),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(table_id): Path<i64>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateTableStatusRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = RequestContext::new(user.id, app_state.clock.now());

    app_state
        .table_service
        .update_status(&ctx, table_id, payload.status)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/tables/{id}/reservation
#[utoipa::path(
    post,
    path = "/api/tables/{id}/reservation",
    tag = "Tables",
    request_body = ScheduleReservationRequest,
    params(
        ("id" = i64, Path, description = "ID da mesa")
    ),
    responses(
        (status = 204, description = "Reserva agendada"),
        (status = 400, description = "Horário no passado"),
        (status = 409, description = "Mesa não está livre")
    ),
    security(("api_jwt" = []))
)]
pub async fn schedule_reservation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(table_id): Path<i64>,
    WithRejection(Json(payload), _): WithRejection<Json<ScheduleReservationRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = RequestContext::new(user.id, app_state.clock.now());

    app_state
        .table_service
        .schedule_reservation(&ctx, table_id, payload.reservation_time)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/tables/{id}/reservation
#[utoipa::path(
    delete,
    path = "/api/tables/{id}/reservation",
    tag = "Tables",
    params(
        ("id" = i64, Path, description = "ID da mesa")
    ),
    responses(
        (status = 204, description = "Reserva cancelada"),
        (status = 409, description = "A mesa não possui reserva")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_reservation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(table_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = RequestContext::new(user.id, app_state.clock.now());

    app_state.table_service.cancel_reservation(&ctx, table_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/tables/{id}/order
#[utoipa::path(
    get,
    path = "/api/tables/{id}/order",
    tag = "Tables",
    params(
        ("id" = i64, Path, description = "ID da mesa")
    ),
    responses(
        (status = 200, description = "Pedido aberto da mesa (data = null se não houver)", body = OpenOrderResponse),
        (status = 404, description = "Mesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_open_order(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(table_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let data = app_state.order_service.get_open_order(table_id).await?;
    Ok((StatusCode::OK, Json(OpenOrderResponse { data })))
}
