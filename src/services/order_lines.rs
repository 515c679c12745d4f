// src/services/order_lines.rs

use std::collections::{BTreeSet, HashMap};

use crate::{
    common::error::AppError,
    models::order::{OrderItem, OrderLineInput},
};

/// Linha já normalizada: uma por item do cardápio, quantidade >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub price: i64,
    pub notes: Option<String>,
}

/// O que a edição de um pedido precisa gravar, já calculado a partir do diff.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub updates: Vec<OrderLine>,
    pub inserts: Vec<OrderLine>,
    pub deletes: Vec<i64>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty() && self.inserts.is_empty() && self.deletes.is_empty()
    }
}

/// Junta itens repetidos (soma as quantidades, mantém o primeiro preço e a primeira
/// observação não vazia) e descarta linhas com quantidade 0.
///
/// Falha com `BadRequest` se sobrar nenhuma linha, se houver valor negativo
/// ou se a soma estourar.
pub fn normalize_lines(items: &[OrderLineInput]) -> Result<Vec<OrderLine>, AppError> {
    let mut merged: Vec<OrderLine> = Vec::with_capacity(items.len());
    let mut index: HashMap<i64, usize> = HashMap::new();

    for item in items {
        if item.quantity < 0 || item.price < 0 {
            return Err(AppError::BadRequest(
                "Quantidade e preço não podem ser negativos.".into(),
            ));
        }

        let notes = item
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        match index.get(&item.menu_item_id) {
            Some(&pos) => {
                let line = &mut merged[pos];
                line.quantity = line.quantity.checked_add(item.quantity).ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "Quantidade excessiva para o item {}.",
                        item.menu_item_id
                    ))
                })?;
                if line.notes.is_none() {
                    line.notes = notes;
                }
            }
            None => {
                index.insert(item.menu_item_id, merged.len());
                merged.push(OrderLine {
                    menu_item_id: item.menu_item_id,
                    quantity: item.quantity,
                    price: item.price,
                    notes,
                });
            }
        }
    }

    merged.retain(|line| line.quantity > 0);

    if merged.is_empty() {
        return Err(AppError::BadRequest(
            "O pedido precisa de pelo menos um item com quantidade maior que zero.".into(),
        ));
    }

    Ok(merged)
}

/// Σ price × quantity, com aritmética verificada.
pub fn invoice_total<I>(lines: I) -> Result<i64, AppError>
where
    I: IntoIterator<Item = (i64, i32)>,
{
    lines.into_iter().try_fold(0i64, |acc, (price, quantity)| {
        price
            .checked_mul(i64::from(quantity))
            .and_then(|subtotal| acc.checked_add(subtotal))
            .ok_or_else(|| AppError::BadRequest("Valor total do pedido excede o limite.".into()))
    })
}

/// Diff entre as linhas gravadas e as enviadas:
/// - item já existente → atualiza quantidade/observação no lugar;
/// - item novo → insere com o preço enviado;
/// - item gravado que não veio → apaga.
pub fn plan_reconciliation(existing: &[OrderItem], submitted: &[OrderLine]) -> ReconcilePlan {
    let stored: HashMap<i64, &OrderItem> = existing
        .iter()
        .map(|item| (item.menu_item_id, item))
        .collect();

    let mut plan = ReconcilePlan::default();
    let mut kept: BTreeSet<i64> = BTreeSet::new();

    for line in submitted {
        kept.insert(line.menu_item_id);
        match stored.get(&line.menu_item_id) {
            Some(current) => {
                if current.quantity != line.quantity || current.notes != line.notes {
                    plan.updates.push(line.clone());
                }
            }
            None => plan.inserts.push(line.clone()),
        }
    }

    let removed: BTreeSet<i64> = existing
        .iter()
        .map(|item| item.menu_item_id)
        .filter(|id| !kept.contains(id))
        .collect();
    plan.deletes = removed.into_iter().collect();

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(menu_item_id: i64, quantity: i32, price: i64) -> OrderLineInput {
        OrderLineInput { menu_item_id, quantity, price, notes: None }
    }

    fn stored(menu_item_id: i64, quantity: i32, price: i64) -> OrderItem {
        OrderItem {
            id: menu_item_id * 100,
            factor_id: 1,
            menu_item_id,
            quantity,
            price,
            notes: None,
        }
    }

    #[test]
    fn merges_repeated_menu_items() {
        let mut first = input(10, 1, 100);
        first.notes = Some("  ".into());
        let mut second = input(10, 2, 90);
        second.notes = Some("Sem açúcar".into());

        let lines = normalize_lines(&[first, input(11, 1, 50), second]).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].menu_item_id, 10);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].price, 100);
        assert_eq!(lines[0].notes.as_deref(), Some("Sem açúcar"));
    }

    #[test]
    fn zero_quantity_lines_are_dropped() {
        let lines = normalize_lines(&[input(10, 0, 100), input(11, 2, 50)]).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].menu_item_id, 11);
    }

    #[test]
    fn rejects_orders_without_remaining_items() {
        assert!(matches!(normalize_lines(&[]), Err(AppError::BadRequest(_))));
        assert!(matches!(
            normalize_lines(&[input(10, 0, 100)]),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_negative_values() {
        assert!(normalize_lines(&[input(10, -1, 100)]).is_err());
        assert!(normalize_lines(&[input(10, 1, -5)]).is_err());
    }

    #[test]
    fn invoice_total_is_price_times_quantity() {
        let lines = normalize_lines(&[input(10, 2, 100), input(11, 1, 50)]).unwrap();
        let total = invoice_total(lines.iter().map(|l| (l.price, l.quantity))).unwrap();
        assert_eq!(total, 250);
    }

    #[test]
    fn invoice_total_overflow_is_a_bad_request() {
        let result = invoice_total([(i64::MAX, 2)]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn reconciliation_updates_inserts_and_deletes() {
        // Gravado {A:2, B:1}, enviado {A:3, C:1}
        let existing = vec![stored(1, 2, 100), stored(2, 1, 40)];
        let submitted = normalize_lines(&[input(1, 3, 100), input(3, 1, 70)]).unwrap();

        let plan = plan_reconciliation(&existing, &submitted);

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].menu_item_id, 1);
        assert_eq!(plan.updates[0].quantity, 3);
        assert_eq!(plan.inserts.len(), 1);
        assert_eq!(plan.inserts[0].menu_item_id, 3);
        assert_eq!(plan.deletes, vec![2]);
    }

    #[test]
    fn unchanged_lines_produce_no_writes() {
        let existing = vec![stored(1, 2, 100)];
        let submitted = normalize_lines(&[input(1, 2, 100)]).unwrap();
        assert!(plan_reconciliation(&existing, &submitted).is_noop());
    }

    #[test]
    fn notes_change_triggers_an_update() {
        let existing = vec![stored(1, 2, 100)];
        let mut line = input(1, 2, 100);
        line.notes = Some("Bem quente".into());
        let submitted = normalize_lines(&[line]).unwrap();

        let plan = plan_reconciliation(&existing, &submitted);
        assert_eq!(plan.updates.len(), 1);
        assert!(plan.inserts.is_empty());
        assert!(plan.deletes.is_empty());
    }
}
