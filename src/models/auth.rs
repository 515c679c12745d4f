// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Waiter,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SystemUser {
    pub id: i64,
    pub username: String,
    pub full_name: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: UserRole,
    pub mobile: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Perfil devolvido ao front-end após o login.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    #[schema(example = "sara")]
    pub username: String,
    #[schema(example = "Sara Ahmadi")]
    pub full_name: String,
    pub role: UserRole,
    #[schema(example = "09121234567")]
    pub mobile: Option<String>,
    pub is_active: bool,
}

impl From<SystemUser> for PublicUser {
    fn from(user: SystemUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            mobile: user.mobile,
            is_active: user.is_active,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O usuário é obrigatório."))]
    #[schema(example = "sara")]
    pub username: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// --- Administração de usuários ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "O usuário deve ter entre 3 e 50 caracteres."))]
    #[schema(example = "reza")]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "O nome é obrigatório."))]
    #[schema(example = "Reza Karimi")]
    pub full_name: String,

    #[validate(length(min = 6, message = "A senha deve ter pelo menos 6 caracteres."))]
    pub password: String,

    #[validate(length(min = 1, max = 20, message = "O celular é obrigatório."))]
    #[schema(example = "09121234567")]
    pub mobile: String,

    // Ausente = garçom
    pub role: Option<UserRole>,
}

/// Edição parcial: só os campos enviados são alterados.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "O usuário deve ter entre 3 e 50 caracteres."))]
    pub username: Option<String>,

    #[validate(length(min = 1, max = 100, message = "O nome não pode ficar vazio."))]
    pub full_name: Option<String>,

    #[validate(length(min = 1, max = 20, message = "O celular não pode ficar vazio."))]
    pub mobile: Option<String>,

    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.full_name.is_none()
            && self.mobile.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
    }
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // ID do usuário
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}
