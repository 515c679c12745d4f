// src/common/context.rs

use chrono::{DateTime, Utc};

/// Contexto explícito de uma requisição: quem chamou e "quando" é agora.
/// Montado no handler e passado para os serviços; não existe estado de sessão global.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub caller_id: i64,
    pub now: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(caller_id: i64, now: DateTime<Utc>) -> Self {
        Self { caller_id, now }
    }
}
