// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::report::{SalesReport, SalesReportQuery},
};

// GET /api/reports/sales
#[utoipa::path(
    get,
    path = "/api/reports/sales",
    tag = "Reports",
    params(SalesReportQuery),
    responses(
        (status = 200, description = "Vendas por dia, por mês e no total", body = SalesReport),
        (status = 400, description = "Intervalo de datas inválido"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn sales_report(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    WithRejection(Query(query), _): WithRejection<Query<SalesReportQuery>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.sales_report(&query).await?;
    Ok((StatusCode::OK, Json(report)))
}
