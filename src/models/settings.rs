// src/models/settings.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusColor {
    #[schema(example = "serving")]
    pub status_key: String,
    #[schema(example = "Ocupada")]
    pub label: String,
    #[schema(example = "#EF4444")]
    pub color_hex: String,
}

/// Formato de resposta: `{ "free": { "label": "...", "color": "#..." } }`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusColorEntry {
    pub label: String,
    pub color: String,
}

/// Serializado como o próprio mapa (newtype).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusColorMap(pub BTreeMap<String, StatusColorEntry>);

impl From<Vec<StatusColor>> for StatusColorMap {
    fn from(colors: Vec<StatusColor>) -> Self {
        Self(
            colors
                .into_iter()
                .map(|c| (c.status_key, StatusColorEntry { label: c.label, color: c.color_hex }))
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusColorRequest {
    #[validate(custom(function = "validate_color_hex"))]
    #[schema(example = "#0EA5E9")]
    pub color_hex: String,
}

fn validate_color_hex(value: &str) -> Result<(), validator::ValidationError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("color_hex");
        err.message = Some("A cor deve estar no formato #RRGGBB.".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(color: &str) -> UpdateStatusColorRequest {
        UpdateStatusColorRequest { color_hex: color.to_string() }
    }

    #[test]
    fn colors_are_keyed_by_status() {
        let map = StatusColorMap::from(vec![StatusColor {
            status_key: "free".into(),
            label: "Livre".into(),
            color_hex: "#22C55E".into(),
        }]);

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["free"]["label"], "Livre");
        assert_eq!(json["free"]["color"], "#22C55E");
    }

    #[test]
    fn accepts_rgb_hex_colors() {
        assert!(request("#0ea5E9").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(request("0EA5E9").validate().is_err());
        assert!(request("#0EA5E").validate().is_err());
        assert!(request("#GGGGGG").validate().is_err());
    }
}
