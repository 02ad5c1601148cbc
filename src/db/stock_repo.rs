// src/db/stock_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock::{Container, ContainerItem, NewContainerItem},
};

const CONTAINER_COLUMNS: &str = "id, company_id, container_no, is_opening_stock, created_at";
const CONTAINER_ITEM_COLUMNS: &str =
    "id, company_id, container_id, supplier_id, item_name, received_qty, sold_qty, unit_price, created_at";

// Postgres aceita no máximo 65535 parâmetros por comando.
const MAX_BIND_PARAMS: usize = 65_535;
const CONTAINER_ITEM_BINDS: usize = 7;
pub const CONTAINER_ITEMS_PER_INSERT: usize = MAX_BIND_PARAMS / CONTAINER_ITEM_BINDS;

/// Divide o upload em lotes que cabem em um único `INSERT ... VALUES`.
pub fn container_item_batches(items: &[NewContainerItem]) -> std::slice::Chunks<'_, NewContainerItem> {
    items.chunks(CONTAINER_ITEMS_PER_INSERT)
}

#[derive(Clone, Default)]
pub struct StockRepository;

impl StockRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CONTAINERS
    // =========================================================================

    pub async fn find_container<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        container_id: Uuid,
    ) -> Result<Option<Container>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {CONTAINER_COLUMNS} FROM containers WHERE company_id = $1 AND id = $2");
        let container = sqlx::query_as::<_, Container>(&sql)
            .bind(company_id)
            .bind(container_id)
            .fetch_optional(executor)
            .await?;

        Ok(container)
    }

    pub async fn find_container_by_label<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        label: &str,
    ) -> Result<Option<Container>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {CONTAINER_COLUMNS} FROM containers WHERE company_id = $1 AND container_no = $2"
        );
        let container = sqlx::query_as::<_, Container>(&sql)
            .bind(company_id)
            .bind(label)
            .fetch_optional(executor)
            .await?;

        Ok(container)
    }

    /// Cria o container sintético de estoque inicial.
    pub async fn insert_opening_container<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        label: &str,
    ) -> Result<Option<Container>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO containers (company_id, container_no, is_opening_stock)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (company_id, container_no) DO NOTHING
            RETURNING {CONTAINER_COLUMNS}
            "#
        );
        let container = sqlx::query_as::<_, Container>(&sql)
            .bind(company_id)
            .bind(label)
            .fetch_optional(executor)
            .await?;

        Ok(container)
    }

    // =========================================================================
    //  ITENS DO CONTAINER
    // =========================================================================

    pub async fn find_container_item<'e, E>(
        &self,
        executor: E,
        container_id: Uuid,
        item_name: &str,
    ) -> Result<Option<ContainerItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {CONTAINER_ITEM_COLUMNS} FROM container_items WHERE container_id = $1 AND item_name = $2 LIMIT 1"
        );
        let item = sqlx::query_as::<_, ContainerItem>(&sql)
            .bind(container_id)
            .bind(item_name)
            .fetch_optional(executor)
            .await?;

        Ok(item)
    }

    /// Entrada de estoque: received_qty = quantidade, sold_qty = 0.
    pub async fn insert_container_item<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        container_id: Uuid,
        item: &NewContainerItem,
    ) -> Result<ContainerItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO container_items (
                company_id, container_id, supplier_id, item_name, received_qty, sold_qty, unit_price
            )
            VALUES ($1, $2, $3, $4, $5, 0, $6)
            RETURNING {CONTAINER_ITEM_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, ContainerItem>(&sql)
            .bind(company_id)
            .bind(container_id)
            .bind(item.supplier_id)
            .bind(&item.item_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .fetch_one(executor)
            .await?;

        Ok(created)
    }

    /// Inserção em massa, sem checagem de duplicidade (upload simples de container).
    /// Recebe no máximo `CONTAINER_ITEMS_PER_INSERT` itens; use `container_item_batches`.
    pub async fn insert_container_items<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        container_id: Uuid,
        items: &[NewContainerItem],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if items.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO container_items (company_id, container_id, supplier_id, item_name, received_qty, sold_qty, unit_price) ",
        );
        builder.push_values(items, |mut row, item| {
            row.push_bind(company_id)
                .push_bind(container_id)
                .push_bind(item.supplier_id)
                .push_bind(item.item_name.clone())
                .push_bind(item.quantity)
                .push_bind(Decimal::ZERO)
                .push_bind(item.unit_price);
        });

        let result = builder.build().execute(executor).await?;
        Ok(result.rows_affected())
    }
}
