// src/models/report.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

// Vendas agregadas de um dia (YYYY-MM-DD) ou de um mês (YYYY-MM)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesPeriod {
    #[schema(example = "2025-06-01")]
    pub period: String,
    #[schema(example = 15400)]
    pub total_sales: i64,
    #[schema(example = 37)]
    pub orders_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotal {
    pub total_sales: i64,
    pub orders_count: i64,
}

/// Relatório de vendas. Só entram faturas pagas, pela data do fechamento (UTC).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub daily: Vec<SalesPeriod>,
    pub monthly: Vec<SalesPeriod>,
    pub total: SalesTotal,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SalesReportQuery {
    /// Primeiro dia incluído (YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    /// Último dia incluído (YYYY-MM-DD)
    pub to: Option<NaiveDate>,
}
