use sqlx::{Executor, PgPool, Postgres};
use crate::{
    common::error::AppError,
    models::auth::{SystemUser, UpdateUserRequest, UserRole},
};

const USER_COLUMNS: &str = "id, username, full_name, password_hash, role, mobile, is_active, created_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'system_users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu login
    pub async fn find_by_username(&self, username: &str) -> Result<Option<SystemUser>, AppError> {
        let user = sqlx::query_as::<_, SystemUser>(&format!(
            "SELECT {USER_COLUMNS} FROM system_users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<SystemUser>, AppError> {
        let user = sqlx::query_as::<_, SystemUser>(&format!(
            "SELECT {USER_COLUMNS} FROM system_users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<SystemUser>, AppError> {
        let users = sqlx::query_as::<_, SystemUser>(&format!(
            "SELECT {USER_COLUMNS} FROM system_users ORDER BY full_name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Verificação de existência usada antes de qualquer escrita de pedido.
    pub async fn exists<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM system_users WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;

        Ok(found)
    }

    pub async fn create_user(
        &self,
        username: &str,
        full_name: &str,
        password_hash: &str,
        mobile: &str,
        role: UserRole,
    ) -> Result<SystemUser, AppError> {
        sqlx::query_as::<_, SystemUser>(&format!(
            "INSERT INTO system_users (username, full_name, password_hash, mobile, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(full_name)
        .bind(password_hash)
        .bind(mobile)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_username(e, username))
    }

    /// Atualiza só as colunas presentes em `changes`. `None` quando o usuário não existe.
    pub async fn update_user(
        &self,
        id: i64,
        changes: &UpdateUserRequest,
    ) -> Result<Option<SystemUser>, AppError> {
        let username = changes.username.as_deref().map(str::trim);

        sqlx::query_as::<_, SystemUser>(&format!(
            "UPDATE system_users
             SET username  = COALESCE($1, username),
                 full_name = COALESCE($2, full_name),
                 mobile    = COALESCE($3, mobile),
                 role      = COALESCE($4, role),
                 is_active = COALESCE($5, is_active)
             WHERE id = $6
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(changes.full_name.as_deref().map(str::trim))
        .bind(changes.mobile.as_deref().map(str::trim))
        .bind(changes.role)
        .bind(changes.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_username(e, username.unwrap_or_default()))
    }
}

// A constraint UNIQUE de `username` vira Conflict
fn duplicate_username(e: sqlx::Error, username: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(format!("O usuário '{}' já existe.", username));
        }
    }
    e.into()
}
