use crate::common::error::AppError;

// ---
// Helpers de erro de banco
// ---

/// Converte violação de chave estrangeira em `Conflict` com a mensagem dada.
/// Qualquer outro erro segue como `DatabaseError`.
pub(crate) fn foreign_key_conflict(e: sqlx::Error, message: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::Conflict(message.to_string());
        }
    }
    e.into()
}

/// Como `foreign_key_conflict`, mas para referências que deveriam existir
/// no momento do INSERT/UPDATE (ex: hall_id inexistente vira `NotFound`).
pub(crate) fn foreign_key_not_found(e: sqlx::Error, message: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound(message.to_string());
        }
    }
    e.into()
}
