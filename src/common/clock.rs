// src/common/clock.rs

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Fonte de "agora" usada pelas regras de negócio.
/// Os serviços nunca chamam `Utc::now()` direto: recebem o instante pelo contexto.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Relógio parado, usado em testes.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub type SharedClock = Arc<dyn Clock>;
