// src/services/user_service.rs

use bcrypt::hash;

use crate::{
    common::{context::RequestContext, error::AppError},
    db::UserRepository,
    models::auth::{CreateUserRequest, PublicUser, UpdateUserRequest, UserRole},
};

/// Cadastro e edição de garçons e administradores.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AppError> {
        let users = self.user_repo.list().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        input: &CreateUserRequest,
    ) -> Result<PublicUser, AppError> {
        let username = required_field(&input.username, "usuário")?;
        let full_name = required_field(&input.full_name, "nome")?;
        let mobile = required_field(&input.mobile, "celular")?;
        let role = input.role.unwrap_or(UserRole::Waiter);

        // Checagem amigável antes do hash. A constraint UNIQUE cobre a corrida.
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(format!("O usuário '{}' já existe.", username)));
        }

        let password_clone = input.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self
            .user_repo
            .create_user(username, full_name, &password_hash, mobile, role)
            .await?;

        tracing::info!(user_id = user.id, ?role, created_by = ctx.caller_id, "👤 Usuário criado");
        Ok(PublicUser::from(user))
    }

    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        changes: &UpdateUserRequest,
    ) -> Result<PublicUser, AppError> {
        if changes.is_empty() {
            return Err(AppError::BadRequest("Nenhum campo para atualizar.".into()));
        }
        if changes.username.as_deref().is_some_and(|u| u.trim().is_empty())
            || changes.full_name.as_deref().is_some_and(|n| n.trim().is_empty())
        {
            return Err(AppError::BadRequest("Usuário e nome não podem ficar em branco.".into()));
        }

        // O administrador não pode se trancar para fora
        if user_id == ctx.caller_id
            && (changes.is_active == Some(false) || changes.role == Some(UserRole::Waiter))
        {
            return Err(AppError::Conflict(
                "Você não pode desativar nem rebaixar a própria conta.".into(),
            ));
        }

        let user = self
            .user_repo
            .update_user(user_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Usuário do sistema {} não encontrado.", user_id)))?;

        tracing::info!(user_id, updated_by = ctx.caller_id, "👤 Usuário atualizado");
        Ok(PublicUser::from(user))
    }
}

fn required_field<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("O campo {} é obrigatório.", field)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> UserService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        UserService::new(UserRepository::new(pool))
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(matches!(required_field("   ", "nome"), Err(AppError::BadRequest(_))));
        assert_eq!(required_field(" reza ", "usuário").unwrap(), "reza");
    }

    #[tokio::test]
    async fn empty_update_is_a_bad_request() {
        let ctx = RequestContext::new(1, Utc::now());
        let result = service().update_user(&ctx, 2, &UpdateUserRequest::default()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn admin_cannot_deactivate_own_account() {
        let ctx = RequestContext::new(1, Utc::now());
        let changes = UpdateUserRequest { is_active: Some(false), ..Default::default() };
        let result = service().update_user(&ctx, 1, &changes).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
