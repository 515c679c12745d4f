use sqlx::PgPool;
use crate::{
    common::error::AppError,
    models::menu::{MenuCategory, MenuItem},
};

// Cardápio: somente leitura neste serviço
#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> Result<Vec<MenuCategory>, AppError> {
        let categories = sqlx::query_as::<_, MenuCategory>("SELECT id, name FROM menu_categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn list_items(&self) -> Result<Vec<MenuItem>, AppError> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, category_id, name, price, is_full_arabica
            FROM menu_items
            ORDER BY category_id, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
