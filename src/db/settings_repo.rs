use sqlx::PgPool;
use crate::{
    common::error::AppError,
    models::settings::StatusColor,
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_status_colors(&self) -> Result<Vec<StatusColor>, AppError> {
        let colors = sqlx::query_as::<_, StatusColor>(
            "SELECT status_key, label, color_hex FROM table_status_colors ORDER BY status_key",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(colors)
    }

    /// `None` quando a chave de status não existe.
    pub async fn update_status_color(
        &self,
        status_key: &str,
        color_hex: &str,
    ) -> Result<Option<StatusColor>, AppError> {
        let updated = sqlx::query_as::<_, StatusColor>(
            r#"
            UPDATE table_status_colors SET color_hex = $1
            WHERE status_key = $2
            RETURNING status_key, label, color_hex
            "#,
        )
        .bind(color_hex.to_uppercase())
        .bind(status_key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }
}
