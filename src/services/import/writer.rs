// src/services/import/writer.rs

use tracing::debug;

use super::{
    resolver::{EntityResolver, Resolved, RowError},
    store::OpeningStockPosting,
};
use crate::models::{
    finance::OPENING_BALANCE_NOTE,
    import::{
        BalanceType, CustomerBalanceRecord, CustomerRecord, OpeningBalanceRecord, OpeningStockRecord,
        RowOutcome, SupplierItemRecord, SupplierRecord,
    },
    supplier::NewSupplier,
};

pub const SUPPLIER_ITEM_EXISTS: &str = "Supplier item already exists";
pub const ITEM_IN_CONTAINER: &str = "Item already in container";

/// Nota gravada no lançamento de saldo inicial. Sempre contém o marcador,
/// que é o que torna a reimportação idempotente.
pub fn opening_balance_notes(user_notes: Option<&str>) -> String {
    match user_notes {
        Some(extra) if !extra.is_empty() => format!("{OPENING_BALANCE_NOTE}: {extra}"),
        _ => OPENING_BALANCE_NOTE.to_string(),
    }
}

fn outcome<T>(resolved: &Resolved<T>) -> RowOutcome {
    if resolved.was_created() {
        RowOutcome::Created
    } else {
        RowOutcome::Unchanged
    }
}

/// Aplica UMA linha normalizada no banco. Cada chamada é independente:
/// não há transação cobrindo a planilha inteira.
#[derive(Clone, Copy)]
pub struct ReconciliationWriter<'a> {
    resolver: EntityResolver<'a>,
    opening_stock_label: &'a str,
}

impl<'a> ReconciliationWriter<'a> {
    pub fn new(resolver: EntityResolver<'a>, opening_stock_label: &'a str) -> Self {
        Self { resolver, opening_stock_label }
    }

    // =========================================================================
    //  1. CREATE-IF-ABSENT (clientes, fornecedores, itens)
    // =========================================================================

    pub async fn write_customer(&self, record: &CustomerRecord) -> Result<RowOutcome, RowError> {
        let resolved = self
            .resolver
            .resolve_or_create_customer(&record.name, Some(&record.phone))
            .await?;
        Ok(outcome(&resolved))
    }

    pub async fn write_supplier(&self, record: &SupplierRecord) -> Result<RowOutcome, RowError> {
        let supplier = NewSupplier {
            name: record.name.clone(),
            contact: Some(record.contact.clone()),
            country: Some(record.country.clone()),
        };
        let resolved = self.resolver.resolve_or_create_supplier(&supplier).await?;
        Ok(outcome(&resolved))
    }

    /// O fornecedor precisa existir (criado antes pela folha Suppliers ou já no banco).
    pub async fn write_supplier_item(&self, record: &SupplierItemRecord) -> Result<RowOutcome, RowError> {
        let supplier = self.resolver.resolve_supplier(&record.supplier_name).await?;
        let store = self.resolver.store();

        if store.find_supplier_item(supplier.id, &record.item_name).await?.is_some() {
            return Ok(RowOutcome::Unchanged);
        }

        let inserted = store
            .insert_supplier_item(self.resolver.company_id(), supplier.id, &record.item_name, record.price)
            .await?;

        Ok(if inserted.is_some() {
            RowOutcome::Created
        } else {
            RowOutcome::Unchanged
        })
    }

    // =========================================================================
    //  2. SALDOS INICIAIS
    // =========================================================================

    /// Débito vira venda sintética, crédito vira pagamento. Se o cliente já
    /// tem um marcador de saldo inicial, a linha é ignorada.
    pub async fn write_opening_balance(&self, record: &OpeningBalanceRecord) -> Result<RowOutcome, RowError> {
        let customer = self.resolver.resolve_customer(&record.customer_name).await?;
        let store = self.resolver.store();
        let company_id = self.resolver.company_id();

        if store.has_opening_balance(company_id, customer.id).await? {
            debug!(customer = %customer.name, "Saldo inicial já lançado, ignorando");
            return Ok(RowOutcome::Unchanged);
        }

        let notes = opening_balance_notes(record.notes.as_deref());
        match record.balance_type {
            BalanceType::Debit => {
                store
                    .post_opening_debit(company_id, customer.id, record.amount, &notes)
                    .await?;
            }
            BalanceType::Credit => {
                store
                    .post_opening_credit(company_id, customer.id, record.amount, &notes)
                    .await?;
            }
        }

        Ok(RowOutcome::Created)
    }

    /// Fluxo simples: (cliente, saldo). O cliente é criado se faltar.
    pub async fn write_customer_balance(
        &self,
        record: &CustomerBalanceRecord,
    ) -> Result<(RowOutcome, RowOutcome), RowError> {
        let resolved = self
            .resolver
            .resolve_or_create_customer(&record.customer_name, record.phone.as_deref())
            .await?;
        let customer_outcome = outcome(&resolved);
        let customer = resolved.into_inner();

        let store = self.resolver.store();
        let company_id = self.resolver.company_id();

        if store.has_opening_balance(company_id, customer.id).await? {
            return Ok((customer_outcome, RowOutcome::Unchanged));
        }

        store
            .post_opening_credit(company_id, customer.id, record.opening_balance, OPENING_BALANCE_NOTE)
            .await?;

        Ok((customer_outcome, RowOutcome::Created))
    }

    // =========================================================================
    //  3. ESTOQUE INICIAL (fornecedor → item do catálogo → container → item do container)
    // =========================================================================

    pub async fn write_opening_stock(&self, record: &OpeningStockRecord) -> Result<RowOutcome, RowError> {
        let store = self.resolver.store();
        let company_id = self.resolver.company_id();

        let supplier = self
            .resolver
            .resolve_or_create_supplier(&NewSupplier {
                name: record.supplier_name.clone(),
                contact: None,
                country: None,
            })
            .await?
            .into_inner();

        // Item já catalogado bloqueia a linha inteira, inclusive o item do container.
        let label = record.group_label.as_deref().unwrap_or(self.opening_stock_label);
        let posting = store
            .post_opening_stock(company_id, supplier.id, label, &record.item_name, record.quantity, record.price)
            .await?;

        Ok(match posting {
            OpeningStockPosting::Created(item) => {
                debug!(container_id = %item.container_id, item = %item.item_name, "Estoque inicial lançado");
                RowOutcome::Created
            }
            OpeningStockPosting::SupplierItemExists => RowOutcome::Skipped(SUPPLIER_ITEM_EXISTS.to_string()),
            OpeningStockPosting::ItemInContainer => RowOutcome::Skipped(ITEM_IN_CONTAINER.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::services::import::memory_store::MemoryStore;

    fn stock_row(supplier: &str, item: &str) -> OpeningStockRecord {
        OpeningStockRecord {
            supplier_name: supplier.into(),
            item_name: item.into(),
            quantity: Decimal::from(10),
            price: Decimal::new(45, 1),
            group_label: None,
        }
    }

    #[test]
    fn notes_always_carry_the_marker() {
        assert_eq!(opening_balance_notes(None), "Opening balance from import");
        assert_eq!(opening_balance_notes(Some("")), "Opening balance from import");
        assert_eq!(
            opening_balance_notes(Some("carried over")),
            "Opening balance from import: carried over"
        );
    }

    #[tokio::test]
    async fn debit_becomes_a_single_line_sale() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let writer = ReconciliationWriter::new(EntityResolver::new(&store, company), "openingstock");

        writer
            .write_customer(&CustomerRecord { name: "Alice".into(), phone: "1".into() })
            .await
            .unwrap();

        let record = OpeningBalanceRecord {
            customer_name: "Alice".into(),
            balance_type: BalanceType::Debit,
            amount: Decimal::from(1500),
            notes: None,
        };
        assert_eq!(writer.write_opening_balance(&record).await.unwrap(), RowOutcome::Created);
        assert_eq!(writer.write_opening_balance(&record).await.unwrap(), RowOutcome::Unchanged);

        let sales = store.sales(company);
        assert_eq!(sales.len(), 1);
        let lines = store.sale_items(sales[0].id);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, Decimal::ONE);
        assert_eq!(lines[0].unit_price, Decimal::from(1500));
        assert_eq!(lines[0].item_name, "Opening Balance - Customer Owes");
    }

    #[tokio::test]
    async fn credit_becomes_an_opening_balance_payment() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let writer = ReconciliationWriter::new(EntityResolver::new(&store, company), "openingstock");

        writer
            .write_customer(&CustomerRecord { name: "Bob".into(), phone: "2".into() })
            .await
            .unwrap();
        writer
            .write_opening_balance(&OpeningBalanceRecord {
                customer_name: "Bob".into(),
                balance_type: BalanceType::Credit,
                amount: Decimal::new(75025, 2),
                notes: Some("legacy".into()),
            })
            .await
            .unwrap();

        let payments = store.payments(company);
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, Decimal::new(75025, 2));
        assert_eq!(payments[0].payment_type, "opening_balance");
        assert_eq!(payments[0].notes.as_deref(), Some("Opening balance from import: legacy"));
        assert!(store.sales(company).is_empty());
    }

    #[tokio::test]
    async fn existing_catalog_entry_blocks_the_whole_stock_row() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let writer = ReconciliationWriter::new(EntityResolver::new(&store, company), "openingstock");

        writer
            .write_supplier(&SupplierRecord { name: "Acme".into(), contact: "Jo".into(), country: "BR".into() })
            .await
            .unwrap();
        writer
            .write_supplier_item(&SupplierItemRecord {
                supplier_name: "Acme".into(),
                item_name: "Rice".into(),
                price: Decimal::from(40),
            })
            .await
            .unwrap();

        let outcome = writer.write_opening_stock(&stock_row("Acme", "Rice")).await.unwrap();
        assert_eq!(outcome, RowOutcome::Skipped("Supplier item already exists".into()));
        assert!(store.container_items(company).is_empty());
    }

    #[tokio::test]
    async fn stock_rows_land_in_the_labelled_container() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let writer = ReconciliationWriter::new(EntityResolver::new(&store, company), "openingstock");

        assert_eq!(writer.write_opening_stock(&stock_row("Acme", "Rice")).await.unwrap(), RowOutcome::Created);
        assert_eq!(writer.write_opening_stock(&stock_row("Acme", "Beans")).await.unwrap(), RowOutcome::Created);

        let mut grouped = stock_row("Acme", "Salt");
        grouped.group_label = Some("CNT-7".into());
        writer.write_opening_stock(&grouped).await.unwrap();

        let containers = store.containers(company);
        assert_eq!(containers.len(), 2);
        assert!(containers.iter().all(|c| c.is_opening_stock));

        let items = store.container_items(company);
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.sold_qty == Decimal::ZERO));
        assert_eq!(items[0].received_qty, Decimal::from(10));
    }

    #[tokio::test]
    async fn item_already_in_container_is_skipped() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let writer = ReconciliationWriter::new(EntityResolver::new(&store, company), "openingstock");

        // Mesmo nome de item sob outro fornecedor, mesmo container.
        writer.write_opening_stock(&stock_row("Acme", "Rice")).await.unwrap();
        let outcome = writer.write_opening_stock(&stock_row("Globex", "Rice")).await.unwrap();

        assert_eq!(outcome, RowOutcome::Skipped("Item already in container".into()));
        assert_eq!(store.container_items(company).len(), 1);
    }

    #[tokio::test]
    async fn supplier_item_requires_a_known_supplier() {
        let store = MemoryStore::new();
        let writer = ReconciliationWriter::new(EntityResolver::new(&store, Uuid::new_v4()), "openingstock");

        let err = writer
            .write_supplier_item(&SupplierItemRecord {
                supplier_name: "Ghost".into(),
                item_name: "Rice".into(),
                price: Decimal::ONE,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Supplier not found: Ghost");
    }
}
