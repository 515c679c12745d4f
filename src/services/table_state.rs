// src/services/table_state.rs

use crate::{common::error::AppError, models::floor::TableStatus};

/// Regras de transição de status de uma mesa física.
///
/// Toda transição parte de um status e pode voltar a `free`; não há estado terminal.
/// A troca de fatura entre mesas (transferência) não passa por aqui: ela libera a origem
/// e ocupa o destino, e cada lado é validado pelo `TransferService`.
pub struct TableStateMachine;

impl TableStateMachine {
    pub fn is_valid_transition(from: TableStatus, to: TableStatus) -> bool {
        use TableStatus::*;
        matches!(
            (from, to),
            (Free, Reserved)
                | (Free, Serving)
                | (Reserved, Serving)
                | (Reserved, Free)
                | (Serving, Paid)
                | (Paid, Free)
        )
    }

    /// Status para os quais a transição exige uma fatura aberta na mesa.
    pub fn requires_open_factor(to: TableStatus) -> bool {
        matches!(to, TableStatus::Serving | TableStatus::Paid)
    }

    /// Valida a transição. `has_open_factor` diz se existe fatura aberta para a mesa.
    pub fn validate(from: TableStatus, to: TableStatus, has_open_factor: bool) -> Result<(), AppError> {
        if !Self::is_valid_transition(from, to) {
            return Err(AppError::Conflict(Self::rejection_reason(from, to)));
        }

        if Self::requires_open_factor(to) && !has_open_factor {
            return Err(AppError::Conflict(format!(
                "A mesa só pode passar para '{}' com um pedido aberto.",
                to
            )));
        }

        Ok(())
    }

    pub fn rejection_reason(from: TableStatus, to: TableStatus) -> String {
        let allowed = Self::valid_next_states(from)
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(", ");

        if from == to {
            return format!("A mesa já está com o status '{}'. Permitido: {}.", to, allowed);
        }
        match from {
            TableStatus::Serving => {
                format!("A mesa está em atendimento e não pode passar para '{}'. Permitido: {}.", to, allowed)
            }
            _ => format!("Transição inválida de '{}' para '{}'. Permitido: {}.", from, to, allowed),
        }
    }

    /// Um pedido novo só pode ser aberto em mesa livre ou reservada.
    pub fn can_open_order(status: TableStatus) -> bool {
        Self::is_valid_transition(status, TableStatus::Serving)
    }

    pub fn valid_next_states(from: TableStatus) -> Vec<TableStatus> {
        TableStatus::ALL
            .into_iter()
            .filter(|to| Self::is_valid_transition(from, *to))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TableStatus::*;

    #[test]
    fn listed_transitions_are_valid() {
        for (from, to) in [
            (Free, Reserved),
            (Free, Serving),
            (Reserved, Serving),
            (Reserved, Free),
            (Serving, Paid),
            (Paid, Free),
        ] {
            assert!(TableStateMachine::is_valid_transition(from, to), "{from} -> {to}");
        }
    }

    #[test]
    fn every_other_pair_is_a_conflict() {
        let mut valid = 0;
        for from in TableStatus::ALL {
            for to in TableStatus::ALL {
                match TableStateMachine::validate(from, to, true) {
                    Ok(()) => valid += 1,
                    Err(AppError::Conflict(_)) => {
                        assert!(!TableStateMachine::is_valid_transition(from, to))
                    }
                    Err(other) => panic!("erro inesperado: {other:?}"),
                }
            }
        }
        assert_eq!(valid, 6);
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in TableStatus::ALL {
            assert!(!TableStateMachine::is_valid_transition(status, status));
        }
    }

    #[test]
    fn settling_requires_an_open_factor() {
        let err = TableStateMachine::validate(Serving, Paid, false).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(TableStateMachine::validate(Serving, Paid, true).is_ok());
    }

    #[test]
    fn orders_open_only_on_free_or_reserved_tables() {
        assert!(TableStateMachine::can_open_order(Free));
        assert!(TableStateMachine::can_open_order(Reserved));
        assert!(!TableStateMachine::can_open_order(Serving));
        assert!(!TableStateMachine::can_open_order(Paid));
    }

    #[test]
    fn serving_table_can_only_be_settled() {
        assert_eq!(TableStateMachine::valid_next_states(Serving), vec![Paid]);
        assert_eq!(TableStateMachine::valid_next_states(Free), vec![Reserved, Serving]);
    }

    #[test]
    fn conflict_message_lists_allowed_states() {
        match TableStateMachine::validate(Serving, Free, true) {
            Err(AppError::Conflict(msg)) => assert!(msg.ends_with("Permitido: 'paid'."), "{msg}"),
            other => panic!("esperava conflito: {other:?}"),
        }
    }
}
