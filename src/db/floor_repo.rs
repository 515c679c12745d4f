// src/db/floor_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use crate::{
    common::{
        db_utils::{foreign_key_conflict, foreign_key_not_found},
        error::AppError,
    },
    models::floor::{
        CreateHallRequest, CreateTableRequest, DiningTable, Floor, FreeTable, Hall, TableStatus,
        UpdateHallRequest, UpdateTableRequest,
    },
};

const TABLE_COLUMNS: &str = "id, name, capacity, hall_id, status, last_activity_at, \
                             reservation_time, reservation_notified";

#[derive(Clone)]
pub struct FloorRepository {
    pool: PgPool,
}

impl FloorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list_floors(&self) -> Result<Vec<Floor>, AppError> {
        let floors = sqlx::query_as::<_, Floor>("SELECT id, name FROM floors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(floors)
    }

    pub async fn list_halls(&self) -> Result<Vec<Hall>, AppError> {
        let halls = sqlx::query_as::<_, Hall>("SELECT id, name, floor_id FROM halls ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(halls)
    }

    pub async fn list_tables(&self) -> Result<Vec<DiningTable>, AppError> {
        let tables = sqlx::query_as::<_, DiningTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables ORDER BY hall_id, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(tables)
    }

    pub async fn list_free_tables(&self) -> Result<Vec<FreeTable>, AppError> {
        let tables = sqlx::query_as::<_, FreeTable>(
            "SELECT id, name, hall_id FROM dining_tables WHERE status = $1 ORDER BY hall_id, id",
        )
        .bind(TableStatus::Free)
        .fetch_all(&self.pool)
        .await?;
        Ok(tables)
    }

    pub async fn find_table<'e, E>(&self, executor: E, id: i64) -> Result<Option<DiningTable>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, DiningTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(table)
    }

    /// Lê a mesa travando a linha até o fim da transação (SELECT ... FOR UPDATE).
    /// Só faz sentido dentro de uma transação.
    pub async fn lock_table<'e, E>(&self, executor: E, id: i64) -> Result<Option<DiningTable>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, DiningTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(table)
    }

    // =========================================================================
    //  STATUS E RESERVAS
    // =========================================================================

    /// Troca o status e carimba `last_activity_at`.
    pub async fn set_table_status<'e, E>(
        &self,
        executor: E,
        id: i64,
        status: TableStatus,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE dining_tables SET status = $1, last_activity_at = $2 WHERE id = $3")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Cancelamento manual: volta para `free` e apaga a reserva agendada.
    pub async fn release_reserved_table<'e, E>(
        &self,
        executor: E,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE dining_tables
            SET status = $1, last_activity_at = $2, reservation_time = NULL
            WHERE id = $3
            "#,
        )
        .bind(TableStatus::Free)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn schedule_reservation<'e, E>(
        &self,
        executor: E,
        id: i64,
        reservation_time: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Uma nova reserva reabre a janela para a varredura
        sqlx::query(
            "UPDATE dining_tables SET reservation_time = $1, reservation_notified = FALSE WHERE id = $2",
        )
        .bind(reservation_time)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn clear_reservation<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE dining_tables SET reservation_time = NULL WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// IDs das mesas com reserva ainda não processada dentro de `[from, until]`.
    pub async fn list_due_reservations(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM dining_tables
            WHERE reservation_time IS NOT NULL
              AND reservation_notified = FALSE
              AND reservation_time BETWEEN $1 AND $2
            ORDER BY reservation_time, id
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// Relê e trava a mesa, mas só se a reserva ainda estiver pendente na janela.
    /// `None` quando outra execução (ou um usuário) já mexeu nela.
    pub async fn lock_due_reservation<'e, E>(
        &self,
        executor: E,
        id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Option<DiningTable>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, DiningTable>(&format!(
            r#"
            SELECT {TABLE_COLUMNS} FROM dining_tables
            WHERE id = $1
              AND reservation_time IS NOT NULL
              AND reservation_notified = FALSE
              AND reservation_time BETWEEN $2 AND $3
            FOR UPDATE
            "#
        ))
        .bind(id)
        .bind(from)
        .bind(until)
        .fetch_optional(executor)
        .await?;
        Ok(table)
    }

    pub async fn promote_reservation<'e, E>(
        &self,
        executor: E,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE dining_tables
            SET status = $1, reservation_notified = TRUE, last_activity_at = $2
            WHERE id = $3
            "#,
        )
        .bind(TableStatus::Reserved)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn expire_reservation<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE dining_tables SET reservation_time = NULL, reservation_notified = TRUE WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    // =========================================================================
    //  GESTÃO (SALÕES E MESAS)
    // =========================================================================

    pub async fn create_hall(&self, input: &CreateHallRequest) -> Result<Hall, AppError> {
        sqlx::query_as::<_, Hall>(
            "INSERT INTO halls (name, floor_id) VALUES ($1, $2) RETURNING id, name, floor_id",
        )
        .bind(input.name.trim())
        .bind(input.floor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| foreign_key_not_found(e, "Andar não encontrado."))
    }

    pub async fn update_hall(&self, id: i64, input: &UpdateHallRequest) -> Result<Option<Hall>, AppError> {
        sqlx::query_as::<_, Hall>(
            r#"
            UPDATE halls SET name = $1, floor_id = $2
            WHERE id = $3
            RETURNING id, name, floor_id
            "#,
        )
        .bind(input.name.trim())
        .bind(input.floor_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| foreign_key_not_found(e, "Andar não encontrado."))
    }

    /// Retorna o número de linhas apagadas. Salão com mesas vira `Conflict`.
    pub async fn delete_hall(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM halls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| foreign_key_conflict(e, "Não é possível excluir um salão que ainda possui mesas."))?;
        Ok(result.rows_affected())
    }

    pub async fn create_table(&self, input: &CreateTableRequest) -> Result<DiningTable, AppError> {
        sqlx::query_as::<_, DiningTable>(&format!(
            r#"
            INSERT INTO dining_tables (name, capacity, hall_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {TABLE_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(input.capacity)
        .bind(input.hall_id)
        .bind(TableStatus::Free)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| foreign_key_not_found(e, "Salão não encontrado."))
    }

    pub async fn update_table(
        &self,
        id: i64,
        input: &UpdateTableRequest,
    ) -> Result<Option<DiningTable>, AppError> {
        sqlx::query_as::<_, DiningTable>(&format!(
            r#"
            UPDATE dining_tables SET name = $1, capacity = $2, hall_id = $3
            WHERE id = $4
            RETURNING {TABLE_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(input.capacity)
        .bind(input.hall_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| foreign_key_not_found(e, "Salão não encontrado."))
    }

    pub async fn delete_table<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM dining_tables WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| foreign_key_conflict(e, "A mesa possui faturas registradas e não pode ser excluída."))?;
        Ok(result.rows_affected())
    }
}
