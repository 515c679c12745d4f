// src/models/menu.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: i64,
    #[schema(example = "Cafés")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub category_id: i64,
    #[schema(example = "Espresso Duplo")]
    pub name: String,
    // Preço em unidades inteiras da moeda
    #[schema(example = 120)]
    pub price: i64,
    pub is_full_arabica: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuData {
    pub categories: Vec<MenuCategory>,
    pub items: Vec<MenuItem>,
}
