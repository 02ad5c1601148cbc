// src/db/finance_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{CustomerPayment, Sale, SaleItem, OPENING_BALANCE_NOTE, OPENING_BALANCE_PAYMENT_TYPE},
};

#[derive(Clone, Default)]
pub struct FinanceRepository;

impl FinanceRepository {
    pub fn new() -> Self {
        Self
    }

    /// Existe marcador de saldo inicial para o cliente?
    /// Vale tanto o pagamento `opening_balance` quanto a venda sintética com a nota reservada.
    pub async fn has_opening_balance<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        customer_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM customer_payments
                WHERE company_id = $1 AND customer_id = $2
                  AND (payment_type = $3 OR notes LIKE '%' || $4 || '%')
                UNION ALL
                SELECT 1 FROM sales
                WHERE company_id = $1 AND customer_id = $2
                  AND notes LIKE '%' || $4 || '%'
            )
            "#,
        )
        .bind(company_id)
        .bind(customer_id)
        .bind(OPENING_BALANCE_PAYMENT_TYPE)
        .bind(OPENING_BALANCE_NOTE)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    // =========================================================================
    //  VENDAS (débito)
    // =========================================================================

    pub async fn create_sale<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        customer_id: Uuid,
        total_amount: Decimal,
        notes: &str,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (company_id, customer_id, total_amount, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, customer_id, total_amount, notes, created_at
            "#,
        )
        .bind(company_id)
        .bind(customer_id)
        .bind(total_amount)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(sale)
    }

    pub async fn create_sale_item<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        sale_id: Uuid,
        item_name: &str,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (company_id, sale_id, item_name, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, sale_id, item_name, quantity, unit_price, created_at
            "#,
        )
        .bind(company_id)
        .bind(sale_id)
        .bind(item_name)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    // =========================================================================
    //  PAGAMENTOS (crédito)
    // =========================================================================

    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        customer_id: Uuid,
        amount: Decimal,
        payment_type: &str,
        notes: &str,
    ) -> Result<CustomerPayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, CustomerPayment>(
            r#"
            INSERT INTO customer_payments (company_id, customer_id, amount, payment_type, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, customer_id, amount, payment_type, notes, created_at
            "#,
        )
        .bind(company_id)
        .bind(customer_id)
        .bind(amount)
        .bind(payment_type)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }
}
