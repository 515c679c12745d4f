// src/services/table_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::{context::RequestContext, error::AppError},
    db::{FloorRepository, OrderRepository},
    models::{
        floor::TableStatus,
        order::FactorStatus,
    },
    services::table_state::TableStateMachine,
};

/// Transições manuais de status e agendamento de reservas.
#[derive(Clone)]
pub struct TableService {
    floor_repo: FloorRepository,
    order_repo: OrderRepository,
    pool: PgPool,
}

impl TableService {
    pub fn new(floor_repo: FloorRepository, order_repo: OrderRepository, pool: PgPool) -> Self {
        Self { floor_repo, order_repo, pool }
    }

    /// Aplica uma transição pedida pela equipe.
    ///
    /// - `reserved → free` também apaga a reserva agendada;
    /// - `serving → paid` fecha junto a fatura aberta, para que mesa e fatura
    ///   nunca fiquem dessincronizadas.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        table_id: i64,
        new_status: TableStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let table = self
            .floor_repo
            .lock_table(&mut *tx, table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mesa {} não encontrada.", table_id)))?;

        let open_factor = self
            .order_repo
            .find_open_factor_for_table(&mut *tx, table.id)
            .await?;

        TableStateMachine::validate(table.status, new_status, open_factor.is_some())?;

        match (table.status, new_status) {
            (TableStatus::Reserved, TableStatus::Free) => {
                self.floor_repo
                    .release_reserved_table(&mut *tx, table.id, ctx.now)
                    .await?;
            }
            (_, TableStatus::Paid) => {
                if let Some(factor) = &open_factor {
                    self.order_repo
                        .lock_factor(&mut *tx, factor.id)
                        .await?;
                    self.order_repo
                        .set_factor_status(&mut *tx, factor.id, FactorStatus::Paid, ctx.now)
                        .await?;
                }
                self.floor_repo
                    .set_table_status(&mut *tx, table.id, new_status, ctx.now)
                    .await?;
            }
            _ => {
                self.floor_repo
                    .set_table_status(&mut *tx, table.id, new_status, ctx.now)
                    .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            table_id,
            from = %table.status,
            to = %new_status,
            caller_id = ctx.caller_id,
            "🪑 Status da mesa atualizado"
        );
        Ok(())
    }

    /// Agenda a chegada de clientes em uma mesa livre.
    pub async fn schedule_reservation(
        &self,
        ctx: &RequestContext,
        table_id: i64,
        reservation_time: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if reservation_time <= ctx.now {
            return Err(AppError::BadRequest(
                "O horário da reserva deve estar no futuro.".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let table = self
            .floor_repo
            .lock_table(&mut *tx, table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mesa {} não encontrada.", table_id)))?;

        if table.status != TableStatus::Free {
            return Err(AppError::Conflict(format!(
                "A mesa '{}' não está livre e não pode ser reservada.",
                table.name
            )));
        }

        self.floor_repo
            .schedule_reservation(&mut *tx, table.id, reservation_time)
            .await?;

        tx.commit().await?;

        tracing::info!(table_id, %reservation_time, "📅 Reserva agendada");
        Ok(())
    }

    /// Cancela a reserva: mesa `reserved` volta a `free`; mesa livre só perde o agendamento.
    pub async fn cancel_reservation(&self, ctx: &RequestContext, table_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let table = self
            .floor_repo
            .lock_table(&mut *tx, table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mesa {} não encontrada.", table_id)))?;

        match table.status {
            TableStatus::Reserved => {
                self.floor_repo
                    .release_reserved_table(&mut *tx, table.id, ctx.now)
                    .await?;
            }
            _ if table.reservation_time.is_some() => {
                self.floor_repo.clear_reservation(&mut *tx, table.id).await?;
            }
            _ => {
                return Err(AppError::Conflict(format!(
                    "A mesa '{}' não possui reserva.",
                    table.name
                )));
            }
        }

        tx.commit().await?;

        tracing::info!(table_id, caller_id = ctx.caller_id, "❌ Reserva cancelada");
        Ok(())
    }
}
