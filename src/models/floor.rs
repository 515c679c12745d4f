// src/models/floor.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// --- Enums ---

/// Ciclo de vida de uma mesa física.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "table_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Free,
    Reserved,
    Serving,
    Paid,
}

impl TableStatus {
    pub const ALL: [TableStatus; 4] = [
        TableStatus::Free,
        TableStatus::Reserved,
        TableStatus::Serving,
        TableStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Free => "free",
            TableStatus::Reserved => "reserved",
            TableStatus::Serving => "serving",
            TableStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Estrutura física ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Térreo")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hall {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Salão Principal")]
    pub name: String,
    #[schema(example = 1)]
    pub floor_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    #[schema(example = 12)]
    pub id: i64,
    #[schema(example = "Mesa 12")]
    pub name: String,
    #[schema(example = 4)]
    pub capacity: i32,
    pub hall_id: i64,
    pub status: TableStatus,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub reservation_time: Option<DateTime<Utc>>,
    // Impede que a varredura processe a mesma janela de reserva duas vezes
    pub reservation_notified: bool,
}

/// Salão com as suas mesas aninhadas (visão de leitura).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HallWithTables {
    #[serde(flatten)]
    pub hall: Hall,
    pub tables: Vec<DiningTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreeTable {
    pub id: i64,
    #[schema(example = "Mesa 3")]
    pub name: String,
    pub hall_id: i64,
}

// --- Payloads de gestão (todos os campos explícitos) ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHallRequest {
    #[validate(length(min = 1, message = "O nome do salão é obrigatório."))]
    #[schema(example = "Varanda")]
    pub name: String,
    #[schema(example = 1)]
    pub floor_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHallRequest {
    #[validate(length(min = 1, message = "O nome do salão é obrigatório."))]
    #[schema(example = "Varanda Coberta")]
    pub name: String,
    #[schema(example = 2)]
    pub floor_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    #[validate(length(min = 1, message = "O nome da mesa é obrigatório."))]
    #[schema(example = "Mesa 7")]
    pub name: String,
    #[validate(range(min = 1, message = "A capacidade deve ser de pelo menos 1 lugar."))]
    #[schema(example = 4)]
    pub capacity: i32,
    #[schema(example = 1)]
    pub hall_id: i64,
}

/// O status não é editável aqui; só muda pelas transições da mesa.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableRequest {
    #[validate(length(min = 1, message = "O nome da mesa é obrigatório."))]
    #[schema(example = "Mesa 7A")]
    pub name: String,
    #[validate(range(min = 1, message = "A capacidade deve ser de pelo menos 1 lugar."))]
    #[schema(example = 6)]
    pub capacity: i32,
    #[schema(example = 1)]
    pub hall_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableStatusRequest {
    #[schema(example = "paid")]
    pub status: TableStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReservationRequest {
    #[schema(example = "2025-06-01T19:30:00Z")]
    pub reservation_time: DateTime<Utc>,
}
