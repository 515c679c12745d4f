// src/services/order_service.rs

use sqlx::PgPool;

use crate::{
    common::{context::RequestContext, error::AppError},
    db::{FloorRepository, OrderRepository, UserRepository},
    models::{
        floor::TableStatus,
        order::{
            CreateOrderRequest, FactorStatus, OpenOrder, OrderCreated, OrderUpdated,
            UpdateOrderRequest,
        },
    },
    services::{
        order_lines::{invoice_total, normalize_lines, plan_reconciliation},
        table_state::TableStateMachine,
    },
};

/// Gerencia a fatura e as suas linhas como uma unidade.
///
/// Toda operação de escrita valida a entrada antes de abrir a transação e trava
/// as linhas envolvidas (mesa antes de fatura) com `FOR UPDATE`. Qualquer erro no meio
/// do caminho derruba a transação inteira (rollback automático no drop).
#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    floor_repo: FloorRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        floor_repo: FloorRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self { order_repo, floor_repo, user_repo, pool }
    }

    // --- CRIAÇÃO ---

    pub async fn create_order(
        &self,
        ctx: &RequestContext,
        input: &CreateOrderRequest,
    ) -> Result<OrderCreated, AppError> {
        // 1. Validação completa antes de qualquer escrita
        let customer_name = required_customer_name(&input.customer_name)?;
        let customer_phone = optional_phone(input.customer_phone.as_deref());
        let lines = normalize_lines(&input.items)?;
        invoice_total(lines.iter().map(|l| (l.price, l.quantity)))?;

        self.ensure_user_exists(input.system_user_id).await?;

        // 2. Transação: mesa travada, fatura + linhas + status da mesa
        let mut tx = self.pool.begin().await?;

        let table = self
            .floor_repo
            .lock_table(&mut *tx, input.table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mesa {} não encontrada.", input.table_id)))?;

        if !TableStateMachine::can_open_order(table.status) {
            return Err(AppError::Conflict(format!(
                "A mesa '{}' está com status '{}' e não pode receber um novo pedido.",
                table.name, table.status
            )));
        }

        if self
            .order_repo
            .find_open_factor_for_table(&mut *tx, table.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "A mesa '{}' já possui um pedido aberto.",
                table.name
            )));
        }

        let factor = self
            .order_repo
            .create_factor(
                &mut *tx,
                table.id,
                input.system_user_id,
                customer_name,
                customer_phone,
                ctx.now,
            )
            .await?;

        for line in &lines {
            self.order_repo.insert_item(&mut *tx, factor.id, line).await?;
        }

        let invoice_amount = self.order_repo.recalculate_invoice(&mut *tx, factor.id).await?;

        self.floor_repo
            .set_table_status(&mut *tx, table.id, TableStatus::Serving, ctx.now)
            .await?;

        tx.commit().await?;

        tracing::info!(
            factor_id = factor.id,
            table_id = table.id,
            invoice_amount,
            caller_id = ctx.caller_id,
            "🧾 Pedido criado"
        );

        Ok(OrderCreated { factor_id: factor.id, invoice_amount })
    }

    // --- EDIÇÃO (RECONCILIAÇÃO) ---

    pub async fn update_order(
        &self,
        ctx: &RequestContext,
        factor_id: i64,
        input: &UpdateOrderRequest,
    ) -> Result<OrderUpdated, AppError> {
        let customer_name = required_customer_name(&input.customer_name)?;
        let customer_phone = optional_phone(input.customer_phone.as_deref());
        let lines = normalize_lines(&input.items)?;
        invoice_total(lines.iter().map(|l| (l.price, l.quantity)))?;

        self.ensure_user_exists(input.system_user_id).await?;

        let mut tx = self.pool.begin().await?;

        let factor = self
            .order_repo
            .lock_factor(&mut *tx, factor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fatura {} não encontrada.", factor_id)))?;

        if factor.status != FactorStatus::Open {
            return Err(AppError::Conflict(format!(
                "A fatura {} já foi paga e não pode ser alterada.",
                factor_id
            )));
        }

        // Leitura das linhas atuais dentro da mesma transação em que o diff é aplicado
        let existing = self.order_repo.list_items(&mut *tx, factor_id).await?;
        let plan = plan_reconciliation(&existing, &lines);
        if plan.is_noop() {
            tracing::debug!(factor_id, "Itens sem alteração, só os dados do cliente serão gravados");
        }

        for line in &plan.updates {
            self.order_repo.update_item(&mut *tx, factor_id, line).await?;
        }
        for line in &plan.inserts {
            self.order_repo.insert_item(&mut *tx, factor_id, line).await?;
        }
        for menu_item_id in &plan.deletes {
            self.order_repo.delete_item(&mut *tx, factor_id, *menu_item_id).await?;
        }

        self.order_repo
            .update_customer(
                &mut *tx,
                factor_id,
                input.system_user_id,
                customer_name,
                customer_phone,
                ctx.now,
            )
            .await?;

        let invoice_amount = self.order_repo.recalculate_invoice(&mut *tx, factor_id).await?;

        tx.commit().await?;

        tracing::info!(
            factor_id,
            updated = plan.updates.len(),
            inserted = plan.inserts.len(),
            deleted = plan.deletes.len(),
            invoice_amount,
            "✏️ Pedido atualizado"
        );

        Ok(OrderUpdated { factor_id, invoice_amount })
    }

    // --- FECHAMENTO ---

    /// Fatura e mesa passam para `paid` juntas, ou nenhuma das duas.
    pub async fn settle_order(
        &self,
        ctx: &RequestContext,
        factor_id: i64,
        table_id: i64,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let table = self
            .floor_repo
            .lock_table(&mut *tx, table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mesa {} não encontrada.", table_id)))?;

        let factor = self
            .order_repo
            .lock_factor(&mut *tx, factor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fatura {} não encontrada.", factor_id)))?;

        if factor.status == FactorStatus::Paid {
            return Err(AppError::Conflict(format!("A fatura {} já está paga.", factor_id)));
        }

        if factor.table_id != table.id {
            return Err(AppError::Conflict(format!(
                "A fatura {} não pertence à mesa '{}'.",
                factor_id, table.name
            )));
        }

        TableStateMachine::validate(table.status, TableStatus::Paid, true)?;

        self.order_repo
            .set_factor_status(&mut *tx, factor_id, FactorStatus::Paid, ctx.now)
            .await?;
        self.floor_repo
            .set_table_status(&mut *tx, table.id, TableStatus::Paid, ctx.now)
            .await?;

        tx.commit().await?;

        tracing::info!(factor_id, table_id, amount = factor.invoice_amount, "💰 Pedido pago");
        Ok(())
    }

    // --- LEITURA ---

    /// Pedido aberto mais recente da mesa, ou `None` (não é erro).
    pub async fn get_open_order(&self, table_id: i64) -> Result<Option<OpenOrder>, AppError> {
        if self.floor_repo.find_table(&self.pool, table_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Mesa {} não encontrada.", table_id)));
        }

        self.order_repo.find_open_order(table_id).await
    }

    async fn ensure_user_exists(&self, system_user_id: i64) -> Result<(), AppError> {
        if !self.user_repo.exists(&self.pool, system_user_id).await? {
            return Err(AppError::NotFound(format!(
                "Usuário do sistema {} não encontrado.",
                system_user_id
            )));
        }
        Ok(())
    }
}

fn required_customer_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("O nome do cliente é obrigatório.".into()));
    }
    Ok(name)
}

// Telefone vazio é gravado como NULL
fn optional_phone(phone: Option<&str>) -> Option<&str> {
    phone.map(str::trim).filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_customer_name_is_rejected() {
        assert!(matches!(required_customer_name("   "), Err(AppError::BadRequest(_))));
        assert_eq!(required_customer_name("  Ali ").unwrap(), "Ali");
    }

    #[test]
    fn blank_phone_becomes_none() {
        assert_eq!(optional_phone(Some("  ")), None);
        assert_eq!(optional_phone(None), None);
        assert_eq!(optional_phone(Some(" 0912 ")), Some("0912"));
    }
}
