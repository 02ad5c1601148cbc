// src/db/supplier_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::supplier::{NewSupplier, Supplier, SupplierItem},
};

#[derive(Clone, Default)]
pub struct SupplierRepository;

impl SupplierRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  FORNECEDORES
    // =========================================================================

    pub async fn find_by_name<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
    ) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, company_id, name, contact, country, created_at
            FROM suppliers
            WHERE company_id = $1 AND name = $2
            "#,
        )
        .bind(company_id)
        .bind(name)
        .fetch_optional(executor)
        .await?;

        Ok(supplier)
    }

    pub async fn insert_if_absent<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        supplier: &NewSupplier,
    ) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (company_id, name, contact, country)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (company_id, name) DO NOTHING
            RETURNING id, company_id, name, contact, country, created_at
            "#,
        )
        .bind(company_id)
        .bind(&supplier.name)
        .bind(supplier.contact.as_deref())
        .bind(supplier.country.as_deref())
        .fetch_optional(executor)
        .await?;

        Ok(created)
    }

    // =========================================================================
    //  ITENS DO CATÁLOGO (preços por fornecedor)
    // =========================================================================

    pub async fn find_item<'e, E>(
        &self,
        executor: E,
        supplier_id: Uuid,
        item_name: &str,
    ) -> Result<Option<SupplierItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SupplierItem>(
            r#"
            SELECT id, company_id, supplier_id, item_name, price, created_at
            FROM supplier_items
            WHERE supplier_id = $1 AND item_name = $2
            "#,
        )
        .bind(supplier_id)
        .bind(item_name)
        .fetch_optional(executor)
        .await?;

        Ok(item)
    }

    pub async fn insert_item_if_absent<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        supplier_id: Uuid,
        item_name: &str,
        price: Decimal,
    ) -> Result<Option<SupplierItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SupplierItem>(
            r#"
            INSERT INTO supplier_items (company_id, supplier_id, item_name, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (supplier_id, item_name) DO NOTHING
            RETURNING id, company_id, supplier_id, item_name, price, created_at
            "#,
        )
        .bind(company_id)
        .bind(supplier_id)
        .bind(item_name)
        .bind(price)
        .fetch_optional(executor)
        .await?;

        Ok(item)
    }
}
