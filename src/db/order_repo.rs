// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use crate::{
    common::{db_utils::foreign_key_not_found, error::AppError},
    models::order::{Factor, FactorStatus, OpenOrder, OrderItem},
    services::order_lines::OrderLine,
};

const FACTOR_COLUMNS: &str = "id, table_id, customer_name, customer_phone, invoice_amount, \
                              system_user_id, status, created_at, updated_at";

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================

    pub async fn create_factor<'e, E>(
        &self,
        executor: E,
        table_id: i64,
        system_user_id: i64,
        customer_name: &str,
        customer_phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Factor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O total começa zerado e é recalculado depois de gravar as linhas
        let factor = sqlx::query_as::<_, Factor>(&format!(
            r#"
            INSERT INTO factors (
                table_id, customer_name, customer_phone, invoice_amount,
                system_user_id, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, 0, $4, $5, $6, $6)
            RETURNING {FACTOR_COLUMNS}
            "#
        ))
        .bind(table_id)
        .bind(customer_name)
        .bind(customer_phone)
        .bind(system_user_id)
        .bind(FactorStatus::Open)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(factor)
    }

    /// Leitura fora de transação: fatura aberta da mesa com as suas linhas.
    pub async fn find_open_order(&self, table_id: i64) -> Result<Option<OpenOrder>, AppError> {
        let Some(factor) = self.find_open_factor_for_table(&self.pool, table_id).await? else {
            return Ok(None);
        };
        let items = self.list_items(&self.pool, factor.id).await?;

        Ok(Some(OpenOrder { factor, items }))
    }

    /// Trava a fatura até o fim da transação.
    pub async fn lock_factor<'e, E>(&self, executor: E, id: i64) -> Result<Option<Factor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let factor = sqlx::query_as::<_, Factor>(&format!(
            "SELECT {FACTOR_COLUMNS} FROM factors WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(factor)
    }

    /// Fatura aberta mais recente da mesa.
    pub async fn find_open_factor_for_table<'e, E>(
        &self,
        executor: E,
        table_id: i64,
    ) -> Result<Option<Factor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let factor = sqlx::query_as::<_, Factor>(&format!(
            r#"
            SELECT {FACTOR_COLUMNS} FROM factors
            WHERE table_id = $1 AND status = $2
            ORDER BY id DESC
            LIMIT 1
            "#
        ))
        .bind(table_id)
        .bind(FactorStatus::Open)
        .fetch_optional(executor)
        .await?;

        Ok(factor)
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        id: i64,
        system_user_id: i64,
        customer_name: &str,
        customer_phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE factors
            SET customer_name = $1, customer_phone = $2, system_user_id = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(customer_name)
        .bind(customer_phone)
        .bind(system_user_id)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn set_factor_status<'e, E>(
        &self,
        executor: E,
        id: i64,
        status: FactorStatus,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // paid_at só é preenchido no fechamento
        sqlx::query(
            "UPDATE factors
             SET status = $1, updated_at = $2,
                 paid_at = CASE WHEN $1 = 'paid'::factor_status THEN $2 ELSE paid_at END
             WHERE id = $3",
        )
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn move_factor<'e, E>(
        &self,
        executor: E,
        id: i64,
        table_id: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE factors SET table_id = $1, updated_at = $2 WHERE id = $3")
            .bind(table_id)
            .bind(now)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Recalcula e atualiza o total em UMA única query, a partir das linhas gravadas.
    pub async fn recalculate_invoice<'e, E>(&self, executor: E, id: i64) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar(
            r#"
            UPDATE factors
            SET invoice_amount = (
                SELECT COALESCE(SUM(price * quantity), 0)::BIGINT
                FROM order_items
                WHERE order_items.factor_id = factors.id
            )
            WHERE id = $1
            RETURNING invoice_amount
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    // =========================================================================
    //  LINHAS DO PEDIDO
    // =========================================================================

    pub async fn list_items<'e, E>(&self, executor: E, factor_id: i64) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, factor_id, menu_item_id, quantity, price, notes
            FROM order_items
            WHERE factor_id = $1
            ORDER BY id
            "#,
        )
        .bind(factor_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        factor_id: i64,
        line: &OrderLine,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (factor_id, menu_item_id, quantity, price, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, factor_id, menu_item_id, quantity, price, notes
            "#,
        )
        .bind(factor_id)
        .bind(line.menu_item_id)
        .bind(line.quantity)
        .bind(line.price)
        .bind(line.notes.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            foreign_key_not_found(
                e,
                &format!("Item do cardápio {} não encontrado.", line.menu_item_id),
            )
        })?;

        Ok(item)
    }

    /// Atualiza quantidade e observação no lugar. O preço capturado não muda.
    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        factor_id: i64,
        line: &OrderLine,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE order_items SET quantity = $1, notes = $2
            WHERE factor_id = $3 AND menu_item_id = $4
            "#,
        )
        .bind(line.quantity)
        .bind(line.notes.as_deref())
        .bind(factor_id)
        .bind(line.menu_item_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn delete_item<'e, E>(&self, executor: E, factor_id: i64, menu_item_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM order_items WHERE factor_id = $1 AND menu_item_id = $2")
            .bind(factor_id)
            .bind(menu_item_id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
