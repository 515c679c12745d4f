// src/services/reservation_scheduler.rs

//! Varredura periódica de reservas.
//!
//! A cada tick busca as mesas com reserva pendente que vence nos próximos
//! `lookahead` minutos. Mesa livre vira `reserved`; mesa ocupada por outra atividade
//! perde a reserva e gera um aviso. Cada mesa é processada na sua própria transação:
//! falha em uma não impede as demais.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::time::MissedTickBehavior;

use crate::{
    common::{clock::SharedClock, error::AppError},
    db::FloorRepository,
    models::floor::TableStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// Mesa livre: passa para `reserved`
    Promote,
    /// Mesa indisponível: reserva descartada com aviso
    Expire,
}

impl SweepAction {
    pub fn for_status(status: TableStatus) -> Self {
        match status {
            TableStatus::Free => SweepAction::Promote,
            _ => SweepAction::Expire,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub promoted: usize,
    pub expired: usize,
    // Já processada por outra execução entre a listagem e o lock
    pub skipped: usize,
    pub failed: usize,
}

impl SweepReport {
    pub fn processed(&self) -> usize {
        self.promoted + self.expired
    }

    fn record(&mut self, action: SweepAction) {
        match action {
            SweepAction::Promote => self.promoted += 1,
            SweepAction::Expire => self.expired += 1,
        }
    }
}

#[derive(Clone)]
pub struct ReservationScheduler {
    floor_repo: FloorRepository,
    pool: PgPool,
    clock: SharedClock,
    interval: Duration,
    lookahead: chrono::Duration,
}

impl ReservationScheduler {
    pub fn new(
        floor_repo: FloorRepository,
        pool: PgPool,
        clock: SharedClock,
        interval: Duration,
        lookahead: chrono::Duration,
    ) -> Self {
        Self { floor_repo, pool, clock, interval, lookahead }
    }

    /// Loop principal. Roda até o processo terminar.
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            lookahead_min = self.lookahead.num_minutes(),
            "⏰ Agendador de reservas iniciado"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.sweep().await;
        }
    }

    /// Uma passada completa. Nunca propaga erro: falhas são contadas e logadas.
    pub async fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let until = now + self.lookahead;
        let mut report = SweepReport::default();

        let due = match self.floor_repo.list_due_reservations(now, until).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Falha ao listar reservas pendentes: {}", e);
                report.failed += 1;
                return report;
            }
        };

        for table_id in due {
            match self.process_table(table_id, now, until).await {
                Ok(Some(action)) => report.record(action),
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(table_id, "Falha ao processar reserva: {}", e);
                }
            }
        }

        if report.processed() > 0 || report.failed > 0 {
            tracing::info!(
                promoted = report.promoted,
                expired = report.expired,
                skipped = report.skipped,
                failed = report.failed,
                "Varredura de reservas concluída"
            );
        }

        report
    }

    async fn process_table(
        &self,
        table_id: i64,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Option<SweepAction>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Relê com lock: a flag `reservation_notified` pode ter mudado desde a listagem
        let Some(table) = self
            .floor_repo
            .lock_due_reservation(&mut *tx, table_id, now, until)
            .await?
        else {
            return Ok(None);
        };

        let action = SweepAction::for_status(table.status);
        match action {
            SweepAction::Promote => {
                self.floor_repo.promote_reservation(&mut *tx, table.id, now).await?;
            }
            SweepAction::Expire => {
                self.floor_repo.expire_reservation(&mut *tx, table.id).await?;
            }
        }

        tx.commit().await?;

        match action {
            SweepAction::Promote => {
                tracing::info!(table_id, reservation_time = ?table.reservation_time, "Mesa reservada");
            }
            SweepAction::Expire => {
                tracing::warn!(
                    table_id,
                    status = %table.status,
                    reservation_time = ?table.reservation_time,
                    "⚠️ Não foi possível reservar a mesa: ela não estava livre. Reserva descartada."
                );
            }
        }

        Ok(Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_free_tables_are_promoted() {
        assert_eq!(SweepAction::for_status(TableStatus::Free), SweepAction::Promote);
        for status in [TableStatus::Reserved, TableStatus::Serving, TableStatus::Paid] {
            assert_eq!(SweepAction::for_status(status), SweepAction::Expire);
        }
    }

    #[test]
    fn report_counts_processed_tables() {
        let mut report = SweepReport::default();
        report.record(SweepAction::Promote);
        report.record(SweepAction::Expire);
        report.record(SweepAction::Promote);
        report.skipped += 1;

        assert_eq!(report.promoted, 2);
        assert_eq!(report.expired, 1);
        assert_eq!(report.processed(), 3);
    }
}
