// src/services/transfer_service.rs

use sqlx::PgPool;

use crate::{
    common::{context::RequestContext, error::AppError},
    db::{FloorRepository, OrderRepository},
    models::{floor::TableStatus, order::FactorStatus},
};

/// Move uma fatura aberta de uma mesa para outra.
#[derive(Clone)]
pub struct TransferService {
    order_repo: OrderRepository,
    floor_repo: FloorRepository,
    pool: PgPool,
}

impl TransferService {
    pub fn new(order_repo: OrderRepository, floor_repo: FloorRepository, pool: PgPool) -> Self {
        Self { order_repo, floor_repo, pool }
    }

    /// A checagem "destino livre" e as escritas acontecem na mesma transação,
    /// com as duas mesas travadas. Duas transferências concorrentes para o mesmo destino:
    /// a segunda espera o lock e, ao ler, encontra a mesa já em `serving`.
    pub async fn transfer_order(
        &self,
        ctx: &RequestContext,
        factor_id: i64,
        source_table_id: i64,
        destination_table_id: i64,
    ) -> Result<(), AppError> {
        if source_table_id == destination_table_id {
            return Err(AppError::BadRequest(
                "A mesa de origem e a de destino devem ser diferentes.".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Trava em ordem crescente de id para não gerar deadlock entre transferências cruzadas
        let (first, second) = if source_table_id < destination_table_id {
            (source_table_id, destination_table_id)
        } else {
            (destination_table_id, source_table_id)
        };
        let first_table = self.floor_repo.lock_table(&mut *tx, first).await?;
        let second_table = self.floor_repo.lock_table(&mut *tx, second).await?;

        let (source, destination) = if first == source_table_id {
            (first_table, second_table)
        } else {
            (second_table, first_table)
        };

        let source = source.ok_or_else(|| {
            AppError::NotFound(format!("Mesa de origem {} não encontrada.", source_table_id))
        })?;
        let destination = destination.ok_or_else(|| {
            AppError::NotFound(format!("Mesa de destino {} não encontrada.", destination_table_id))
        })?;

        let factor = self
            .order_repo
            .lock_factor(&mut *tx, factor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fatura {} não encontrada.", factor_id)))?;

        if factor.status != FactorStatus::Open {
            return Err(AppError::Conflict(format!(
                "A fatura {} já foi paga e não pode ser transferida.",
                factor_id
            )));
        }

        if factor.table_id != source.id {
            return Err(AppError::Conflict(format!(
                "A fatura {} não está na mesa '{}'.",
                factor_id, source.name
            )));
        }

        if destination.status != TableStatus::Free {
            return Err(AppError::Conflict(format!(
                "A mesa de destino '{}' não está mais livre.",
                destination.name
            )));
        }

        self.order_repo
            .move_factor(&mut *tx, factor_id, destination.id, ctx.now)
            .await?;
        self.floor_repo
            .set_table_status(&mut *tx, source.id, TableStatus::Free, ctx.now)
            .await?;
        self.floor_repo
            .set_table_status(&mut *tx, destination.id, TableStatus::Serving, ctx.now)
            .await?;

        tx.commit().await?;

        tracing::info!(
            factor_id,
            from = source.id,
            to = destination.id,
            caller_id = ctx.caller_id,
            "🔀 Pedido transferido"
        );
        Ok(())
    }
}
