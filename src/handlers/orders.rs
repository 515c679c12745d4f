// src/handlers/orders.rs

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
    middleware::auth::AuthenticatedUser,
    models::order::{
        CreateOrderRequest, OrderCreated, OrderUpdated, SettleOrderRequest, TransferOrderRequest,
        UpdateOrderRequest,
    },
};

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Fatura criada e mesa em atendimento", body = OrderCreated),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Mesa ou usuário não encontrado"),
        (status = 409, description = "A mesa não pode receber pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateOrderRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ctx = RequestContext::new(user.id, app_state.clock.now());
    let created = app_state.order_service.create_order(&ctx, &payload).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// PUT /api/orders/{id}
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "Orders",
    request_body = UpdateOrderRequest,
    params(
        ("id" = i64, Path, description = "ID da fatura")
    ),
    responses(
        (status = 200, description = "Itens reconciliados", body = OrderUpdated),
        (status = 404, description = "Fatura ou usuário não encontrado"),
        (status = 409, description = "Fatura já paga")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(factor_id): Path<i64>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateOrderRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ctx = RequestContext::new(user.id, app_state.clock.now());
    let updated = app_state
        .order_service
        .update_order(&ctx, factor_id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(updated)))
}

// POST /api/orders/{id}/settle
#[utoipa::path(
    post,
    path = "/api/orders/{id}/settle",
    tag = "Orders",
    request_body = SettleOrderRequest,
    params(
        ("id" = i64, Path, description = "ID da fatura")
    ),
    responses(
        (status = 204, description = "Fatura e mesa marcadas como pagas"),
        (status = 404, description = "Fatura ou mesa não encontrada"),
        (status = 409, description = "Fatura já paga ou de outra mesa")
    ),
    security(("api_jwt" = []))
)]
pub async fn settle_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(factor_id): Path<i64>,
    WithRejection(Json(payload), _): WithRejection<Json<SettleOrderRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = RequestContext::new(user.id, app_state.clock.now());

    app_state
        .order_service
        .settle_order(&ctx, factor_id, payload.table_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/orders/{id}/transfer
#[utoipa::path(
    post,
    path = "/api/orders/{id}/transfer",
    tag = "Orders",
    request_body = TransferOrderRequest,
    params(
        ("id" = i64, Path, description = "ID da fatura")
    ),
    responses(
        (status = 204, description = "Pedido transferido"),
        (status = 400, description = "Origem e destino iguais"),
        (status = 409, description = "Mesa de destino não está livre")
    ),
    security(("api_jwt" = []))
)]
pub async fn transfer_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(factor_id): Path<i64>,
    WithRejection(Json(payload), _): WithRejection<Json<TransferOrderRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let ctx = RequestContext::new(user.id, app_state.clock.now());

    app_state
        .transfer_service
        .transfer_order(
            &ctx,
            factor_id,
            payload.source_table_id,
            payload.destination_table_id,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
