// src/db/customer_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::crm::Customer};

// O repositório de clientes. Toda busca é escopada pelo tenant (company_id).
#[derive(Clone, Default)]
pub struct CustomerRepository;

impl CustomerRepository {
    pub fn new() -> Self {
        Self
    }

    /// Busca exata (case-sensitive) pela chave natural (company_id, name).
    pub async fn find_by_name<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, company_id, name, phone, created_at
            FROM customers
            WHERE company_id = $1 AND name = $2
            "#,
        )
        .bind(company_id)
        .bind(name)
        .fetch_optional(executor)
        .await?;

        Ok(customer)
    }

    /// Insere o cliente se a chave natural estiver livre.
    /// `None` significa que outra importação criou o mesmo cliente antes.
    pub async fn insert_if_absent<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (company_id, name, phone)
            VALUES ($1, $2, $3)
            ON CONFLICT (company_id, name) DO NOTHING
            RETURNING id, company_id, name, phone, created_at
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(phone)
        .fetch_optional(executor)
        .await?;

        Ok(customer)
    }
}
