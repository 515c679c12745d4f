// src/db/report_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::report::{SalesPeriod, SalesReport, SalesTotal},
};

// Filtro comum: faturas pagas dentro do intervalo opcional [$1, $2], por dia UTC do fechamento
const PAID_IN_RANGE: &str = "status = 'paid' AND paid_at IS NOT NULL
      AND ($1::date IS NULL OR (paid_at AT TIME ZONE 'UTC')::date >= $1::date)
      AND ($2::date IS NULL OR (paid_at AT TIME ZONE 'UTC')::date <= $2::date)";

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn sales_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<SalesReport, AppError> {
        // As três consultas leem o mesmo snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let daily = sqlx::query_as::<_, SalesPeriod>(&format!(
            "SELECT to_char((paid_at AT TIME ZONE 'UTC')::date, 'YYYY-MM-DD') AS period,
                    COALESCE(SUM(invoice_amount), 0)::BIGINT AS total_sales,
                    COUNT(*) AS orders_count
             FROM factors
             WHERE {PAID_IN_RANGE}
             GROUP BY 1
             ORDER BY 1 DESC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&mut *tx)
        .await?;

        let monthly = sqlx::query_as::<_, SalesPeriod>(&format!(
            "SELECT to_char((paid_at AT TIME ZONE 'UTC')::date, 'YYYY-MM') AS period,
                    COALESCE(SUM(invoice_amount), 0)::BIGINT AS total_sales,
                    COUNT(*) AS orders_count
             FROM factors
             WHERE {PAID_IN_RANGE}
             GROUP BY 1
             ORDER BY 1 DESC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&mut *tx)
        .await?;

        let total = sqlx::query_as::<_, SalesTotal>(&format!(
            "SELECT COALESCE(SUM(invoice_amount), 0)::BIGINT AS total_sales,
                    COUNT(*) AS orders_count
             FROM factors
             WHERE {PAID_IN_RANGE}"
        ))
        .bind(from)
        .bind(to)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SalesReport { daily, monthly, total })
    }
}
