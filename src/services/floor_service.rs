// src/services/floor_service.rs

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    common::{context::RequestContext, error::AppError},
    db::FloorRepository,
    models::floor::{
        CreateHallRequest, CreateTableRequest, DiningTable, Floor, FreeTable, Hall,
        HallWithTables, TableStatus, UpdateHallRequest, UpdateTableRequest,
    },
};

/// Estrutura física do salão: andares, salões e mesas.
#[derive(Clone)]
pub struct FloorService {
    floor_repo: FloorRepository,
    pool: PgPool,
}

impl FloorService {
    pub fn new(floor_repo: FloorRepository, pool: PgPool) -> Self {
        Self { floor_repo, pool }
    }

    // --- LEITURA ---

    pub async fn list_floors(&self) -> Result<Vec<Floor>, AppError> {
        self.floor_repo.list_floors().await
    }

    pub async fn list_halls_with_tables(&self) -> Result<Vec<HallWithTables>, AppError> {
        let halls = self.floor_repo.list_halls().await?;
        let tables = self.floor_repo.list_tables().await?;
        Ok(nest_tables(halls, tables))
    }

    pub async fn list_free_tables(&self) -> Result<Vec<FreeTable>, AppError> {
        self.floor_repo.list_free_tables().await
    }

    // --- SALÕES ---

    pub async fn create_hall(&self, input: &CreateHallRequest) -> Result<Hall, AppError> {
        let hall = self.floor_repo.create_hall(input).await?;
        tracing::info!(hall_id = hall.id, floor_id = hall.floor_id, "Salão criado");
        Ok(hall)
    }

    pub async fn update_hall(&self, id: i64, input: &UpdateHallRequest) -> Result<Hall, AppError> {
        self.floor_repo
            .update_hall(id, input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Salão {} não encontrado.", id)))
    }

    pub async fn delete_hall(&self, id: i64) -> Result<(), AppError> {
        if self.floor_repo.delete_hall(id).await? == 0 {
            return Err(AppError::NotFound(format!("Salão {} não encontrado.", id)));
        }
        tracing::info!(hall_id = id, "Salão excluído");
        Ok(())
    }

    // --- MESAS ---

    pub async fn create_table(&self, input: &CreateTableRequest) -> Result<DiningTable, AppError> {
        let table = self.floor_repo.create_table(input).await?;
        tracing::info!(table_id = table.id, hall_id = table.hall_id, "Mesa criada");
        Ok(table)
    }

    pub async fn update_table(
        &self,
        id: i64,
        input: &UpdateTableRequest,
    ) -> Result<DiningTable, AppError> {
        self.floor_repo
            .update_table(id, input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mesa {} não encontrada.", id)))
    }

    /// Só mesas livres podem ser excluídas. Mesa com faturas antigas também é recusada
    /// pela chave estrangeira.
    pub async fn delete_table(&self, ctx: &RequestContext, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let table = self
            .floor_repo
            .lock_table(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mesa {} não encontrada.", id)))?;

        if table.status != TableStatus::Free {
            return Err(AppError::Conflict(format!(
                "A mesa '{}' está com status '{}' e não pode ser excluída.",
                table.name, table.status
            )));
        }

        self.floor_repo.delete_table(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(table_id = id, caller_id = ctx.caller_id, "Mesa excluída");
        Ok(())
    }
}

/// Agrupa as mesas sob o seu salão. Salões por id, mesas por id dentro de cada salão.
/// Mesas de um salão que não está na lista são ignoradas.
pub fn nest_tables(mut halls: Vec<Hall>, tables: Vec<DiningTable>) -> Vec<HallWithTables> {
    halls.sort_by_key(|h| h.id);

    let mut by_hall: HashMap<i64, Vec<DiningTable>> = HashMap::new();
    for table in tables {
        by_hall.entry(table.hall_id).or_default().push(table);
    }

    halls
        .into_iter()
        .map(|hall| {
            let mut tables = by_hall.remove(&hall.id).unwrap_or_default();
            tables.sort_by_key(|t| t.id);
            HallWithTables { hall, tables }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall(id: i64) -> Hall {
        Hall { id, name: format!("Salão {id}"), floor_id: 1 }
    }

    fn table(id: i64, hall_id: i64) -> DiningTable {
        DiningTable {
            id,
            name: format!("Mesa {id}"),
            capacity: 4,
            hall_id,
            status: TableStatus::Free,
            last_activity_at: None,
            reservation_time: None,
            reservation_notified: false,
        }
    }

    #[test]
    fn tables_are_nested_and_ordered() {
        let nested = nest_tables(
            vec![hall(2), hall(1)],
            vec![table(7, 2), table(3, 1), table(5, 2), table(1, 1)],
        );

        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].hall.id, 1);
        let first: Vec<i64> = nested[0].tables.iter().map(|t| t.id).collect();
        assert_eq!(first, vec![1, 3]);
        let second: Vec<i64> = nested[1].tables.iter().map(|t| t.id).collect();
        assert_eq!(second, vec![5, 7]);
    }

    #[test]
    fn empty_halls_are_kept() {
        let nested = nest_tables(vec![hall(1), hall(2)], vec![table(1, 2)]);
        assert!(nested[0].tables.is_empty());
        assert_eq!(nested[1].tables.len(), 1);
    }
}
