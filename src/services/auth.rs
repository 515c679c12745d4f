// src/services/auth.rs

use bcrypt::verify;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, PublicUser, UserRole},
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login(&self, username: &str, password: &str, now: DateTime<Utc>) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Conta desativada responde igual a senha errada
        if !user.is_active {
            tracing::warn!(username = %user.username, "Tentativa de login com conta desativada");
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // bcrypt é caro: roda fora do executor async
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::warn!(username = %user.username, "Tentativa de login com senha incorreta");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id, user.role, now)?;
        tracing::info!(user_id = user.id, "🔑 Login efetuado");

        Ok(AuthResponse { token, user: PublicUser::from(user) })
    }

    pub async fn profile(&self, user_id: i64) -> Result<PublicUser, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound(format!("Usuário do sistema {} não encontrado.", user_id)))
    }

    /// Só decodifica e valida assinatura/expiração. Não consulta o banco.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn create_token(&self, user_id: i64, role: UserRole, now: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: unix_seconds(expires_at)?,
            iat: unix_seconds(now)?,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

// Instantes anteriores a 1970 não cabem no `exp`/`iat` do JWT
fn unix_seconds(at: DateTime<Utc>) -> Result<usize, AppError> {
    usize::try_from(at.timestamp())
        .map_err(|_| anyhow::anyhow!("Instante fora do intervalo do token: {}", at).into())
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub.parse().map_err(|_| AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service(secret: &str) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(UserRepository::new(pool), secret.to_string())
    }

    #[tokio::test]
    async fn issued_token_decodes_to_same_user() {
        let auth = service("segredo");
        let token = auth.create_token(42, UserRole::Waiter, Utc::now()).unwrap();

        let claims = auth.decode_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, UserRole::Waiter);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let token = service("um").create_token(1, UserRole::Admin, Utc::now()).unwrap();
        assert!(matches!(service("outro").decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let auth = service("segredo");
        let issued = Utc::now() - chrono::Duration::days(TOKEN_TTL_DAYS + 1);
        let token = auth.create_token(1, UserRole::Admin, issued).unwrap();
        assert!(matches!(auth.decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn instant_before_epoch_is_refused() {
        let auth = service("segredo");
        let before_epoch = DateTime::<Utc>::from_timestamp(-30 * 86_400, 0).unwrap();
        assert!(matches!(
            auth.create_token(1, UserRole::Admin, before_epoch),
            Err(AppError::InternalServerError(_))
        ));
    }
}
