// src/config.rs

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::clock::{SharedClock, SystemClock},
    db::{
        FloorRepository, MenuRepository, OrderRepository, ReportRepository, SettingsRepository,
        UserRepository,
    },
    services::{
        auth::AuthService, floor_service::FloorService, order_service::OrderService,
        report_service::ReportService, reservation_scheduler::ReservationScheduler,
        table_service::TableService, transfer_service::TransferService, user_service::UserService,
    },
};

/// Configuração lida do ambiente (com suporte a `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub reservation_sweep_interval: Duration,
    pub reservation_lookahead: chrono::Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Separado de `from_env` para poder testar sem mexer no ambiente do processo.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{} deve ser definida", key))
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR inválido")?;

        let sweep_secs: u64 = parse_or(&lookup, "RESERVATION_SWEEP_INTERVAL_SECS", 300)?;
        if sweep_secs == 0 {
            return Err(anyhow!("RESERVATION_SWEEP_INTERVAL_SECS deve ser maior que zero"));
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            reservation_sweep_interval: Duration::from_secs(sweep_secs),
            reservation_lookahead: chrono::Duration::minutes(parse_or(
                &lookup,
                "RESERVATION_LOOKAHEAD_MINUTES",
                30,
            )?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} inválido: '{}'", key, raw)),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub clock: SharedClock,

    pub auth_service: AuthService,
    pub floor_service: FloorService,
    pub order_service: OrderService,
    pub transfer_service: TransferService,
    pub table_service: TableService,
    pub user_service: UserService,
    pub report_service: ReportService,

    pub menu_repo: MenuRepository,
    pub settings_repo: SettingsRepository,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config, Arc::new(SystemClock)))
    }

    /// Monta o gráfico de dependências a partir de um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: Config, clock: SharedClock) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let floor_repo = FloorRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), config.jwt_secret.clone());
        let user_service = UserService::new(user_repo.clone());
        let report_service = ReportService::new(ReportRepository::new(db_pool.clone()));
        let floor_service = FloorService::new(floor_repo.clone(), db_pool.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            floor_repo.clone(),
            user_repo,
            db_pool.clone(),
        );
        let transfer_service =
            TransferService::new(order_repo.clone(), floor_repo.clone(), db_pool.clone());
        let table_service = TableService::new(floor_repo, order_repo, db_pool.clone());

        Self {
            menu_repo: MenuRepository::new(db_pool.clone()),
            settings_repo: SettingsRepository::new(db_pool.clone()),
            db_pool,
            config: Arc::new(config),
            clock,
            auth_service,
            floor_service,
            order_service,
            transfer_service,
            table_service,
            user_service,
            report_service,
        }
    }

    pub fn reservation_scheduler(&self) -> ReservationScheduler {
        ReservationScheduler::new(
            FloorRepository::new(self.db_pool.clone()),
            self.db_pool.clone(),
            self.clock.clone(),
            self.config.reservation_sweep_interval,
            self.config.reservation_lookahead,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/cafe"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_acquire_timeout, Duration::from_secs(3));
        assert_eq!(config.reservation_sweep_interval, Duration::from_secs(300));
        assert_eq!(config.reservation_lookahead, chrono::Duration::minutes(30));
    }

    #[test]
    fn missing_required_var_is_an_error() {
        let result = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/cafe")]));
        assert!(result.is_err());
    }

    #[test]
    fn unparsable_number_is_an_error() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/cafe"),
            ("JWT_SECRET", "segredo"),
            ("DB_MAX_CONNECTIONS", "muitas"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/cafe"),
            ("JWT_SECRET", "segredo"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("RESERVATION_SWEEP_INTERVAL_SECS", "60"),
            ("RESERVATION_LOOKAHEAD_MINUTES", "15"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.reservation_sweep_interval, Duration::from_secs(60));
        assert_eq!(config.reservation_lookahead, chrono::Duration::minutes(15));
    }
}
