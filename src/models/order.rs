// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// --- Enums ---

/// Status da fatura. Espelha, mas não é derivado do status da mesa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "factor_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FactorStatus {
    Open,
    Paid,
}

// --- Registros ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Factor {
    #[schema(example = 101)]
    pub id: i64,
    pub table_id: i64,
    #[schema(example = "Ali")]
    pub customer_name: String,
    #[schema(example = "09121234567")]
    pub customer_phone: Option<String>,
    // Sempre igual a Σ price × quantity das linhas gravadas
    #[schema(example = 200)]
    pub invoice_amount: i64,
    pub system_user_id: i64,
    pub status: FactorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub factor_id: i64,
    #[schema(example = 10)]
    pub menu_item_id: i64,
    #[schema(example = 2)]
    pub quantity: i32,
    // Preço capturado no momento do pedido
    #[schema(example = 100)]
    pub price: i64,
    pub notes: Option<String>,
}

/// Fatura aberta com as suas linhas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    #[serde(flatten)]
    pub factor: Factor,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OpenOrderResponse {
    // `null` quando a mesa não tem pedido aberto
    pub data: Option<OpenOrder>,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    #[schema(example = 10)]
    pub menu_item_id: i64,

    // 0 significa "remover a linha"
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    #[schema(example = 2)]
    pub quantity: i32,

    #[validate(range(min = 0, message = "O preço não pode ser negativo."))]
    #[schema(example = 100)]
    pub price: i64,

    #[schema(example = "Sem açúcar")]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[schema(example = 1)]
    pub table_id: i64,

    #[schema(example = 5)]
    pub system_user_id: i64,

    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    #[schema(example = "Ali")]
    pub customer_name: String,

    pub customer_phone: Option<String>,

    #[validate(length(min = 1, message = "O pedido precisa de pelo menos um item."), nested)]
    pub items: Vec<OrderLineInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[schema(example = 5)]
    pub system_user_id: i64,

    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    #[schema(example = "Ali")]
    pub customer_name: String,

    pub customer_phone: Option<String>,

    #[validate(length(min = 1, message = "O pedido precisa de pelo menos um item."), nested)]
    pub items: Vec<OrderLineInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettleOrderRequest {
    #[schema(example = 2)]
    pub table_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferOrderRequest {
    #[schema(example = 1)]
    pub source_table_id: i64,
    #[schema(example = 2)]
    pub destination_table_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub factor_id: i64,
    pub invoice_amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdated {
    pub factor_id: i64,
    pub invoice_amount: i64,
}
