// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, middleware::auth::AuthenticatedUser};

/// Guardião das rotas de gestão (salões, mesas, cores, usuários, relatórios).
/// Precisa rodar depois do `auth_guard`.
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            tracing::warn!(user_id = user.id, "Acesso negado a rota de gestão");
            return Err(AppError::Forbidden);
        }

        Ok(RequireAdmin(user))
    }
}
