// src/services/import/normalizer.rs
//
// Normalização por tipo de folha: apara textos, converte números e valida
// enumerações. Nunca entra em pânico: devolve o registro tipado ou a rejeição.

use rust_decimal::Decimal;
use validator::Validate;

use crate::models::import::{
    BalanceType, ContainerItemRecord, CustomerBalanceRecord, CustomerRecord, NormalizedRow,
    OpeningBalanceRecord, OpeningStockRecord, RawRow, RowRejection, SheetKind, SupplierItemRecord,
    SupplierRecord,
};

// Nomes de coluna aceitos (comparação via `header_key`)
const CUSTOMER_NAME: &[&str] = &["customerName"];
const PHONE: &[&str] = &["phone"];
const SUPPLIER_NAME: &[&str] = &["supplierName"];
const CONTACT: &[&str] = &["contact"];
const COUNTRY: &[&str] = &["country"];
const ITEM_NAME: &[&str] = &["itemName"];
const PRICE: &[&str] = &["price"];
const QUANTITY: &[&str] = &["quantity"];
const BALANCE_TYPE: &[&str] = &["balanceType"];
const OPENING_BALANCE: &[&str] = &["openingBalance"];
const AMOUNT: &[&str] = &["amount"];
const NOTES: &[&str] = &["notes"];
const GROUP_LABEL: &[&str] = &["openingstock", "containerNo"];

pub fn normalize(kind: SheetKind, row: &RawRow) -> Result<NormalizedRow, RowRejection> {
    match kind {
        SheetKind::Customers => normalize_customer(row).map(NormalizedRow::Customer),
        SheetKind::Suppliers => normalize_supplier(row).map(NormalizedRow::Supplier),
        SheetKind::ItemsPrices => normalize_supplier_item(row).map(NormalizedRow::SupplierItem),
        SheetKind::OpeningBalances => normalize_opening_balance(row).map(NormalizedRow::OpeningBalance),
        SheetKind::OpeningStock => normalize_opening_stock(row).map(NormalizedRow::OpeningStock),
    }
}

fn text(row: &RawRow, names: &[&str]) -> String {
    row.text(names).unwrap_or_default()
}

// Campo numérico ausente ou ilegível vira zero e cai na regra de positividade.
fn number(row: &RawRow, names: &[&str]) -> Decimal {
    row.decimal(names).unwrap_or(Decimal::ZERO)
}

fn checked<T: Validate>(row: &RawRow, record: T) -> Result<T, RowRejection> {
    record
        .validate()
        .map(|_| record)
        .map_err(|_| RowRejection::invalid_data(row))
}

pub fn normalize_customer(row: &RawRow) -> Result<CustomerRecord, RowRejection> {
    checked(
        row,
        CustomerRecord {
            name: text(row, CUSTOMER_NAME),
            phone: text(row, PHONE),
        },
    )
}

pub fn normalize_supplier(row: &RawRow) -> Result<SupplierRecord, RowRejection> {
    checked(
        row,
        SupplierRecord {
            name: text(row, SUPPLIER_NAME),
            contact: text(row, CONTACT),
            country: text(row, COUNTRY),
        },
    )
}

pub fn normalize_supplier_item(row: &RawRow) -> Result<SupplierItemRecord, RowRejection> {
    checked(
        row,
        SupplierItemRecord {
            supplier_name: text(row, SUPPLIER_NAME),
            item_name: text(row, ITEM_NAME),
            price: number(row, PRICE),
        },
    )
}

/// Duas formas aceitas:
/// - `balanceType` (debit|credit) + `amount` positivo;
/// - `openingBalance` com sinal (positivo = cliente deve, negativo = crédito).
pub fn normalize_opening_balance(row: &RawRow) -> Result<OpeningBalanceRecord, RowRejection> {
    let customer_name = text(row, CUSTOMER_NAME);
    let notes = row.text(NOTES);

    let (balance_type, amount) = match row.text(BALANCE_TYPE) {
        Some(raw_type) => {
            let balance_type = match raw_type.to_lowercase().as_str() {
                "debit" => BalanceType::Debit,
                "credit" => BalanceType::Credit,
                _ => {
                    return Err(RowRejection::with_reason(
                        row,
                        format!("Invalid balance type \"{raw_type}\". Must be \"debit\" or \"credit\""),
                    ));
                }
            };
            (balance_type, number(row, AMOUNT))
        }
        None => {
            let signed = number(row, OPENING_BALANCE);
            let balance_type = if signed.is_sign_negative() {
                BalanceType::Credit
            } else {
                BalanceType::Debit
            };
            (balance_type, signed.abs())
        }
    };

    checked(
        row,
        OpeningBalanceRecord {
            customer_name,
            balance_type,
            amount,
            notes,
        },
    )
}

pub fn normalize_opening_stock(row: &RawRow) -> Result<OpeningStockRecord, RowRejection> {
    checked(
        row,
        OpeningStockRecord {
            supplier_name: text(row, SUPPLIER_NAME),
            item_name: text(row, ITEM_NAME),
            quantity: number(row, QUANTITY),
            price: number(row, PRICE),
            group_label: row.text(GROUP_LABEL),
        },
    )
}

pub fn normalize_container_item(row: &RawRow) -> Result<ContainerItemRecord, RowRejection> {
    checked(
        row,
        ContainerItemRecord {
            item_name: text(row, ITEM_NAME),
            quantity: number(row, QUANTITY),
            price: number(row, PRICE),
        },
    )
}

pub fn normalize_customer_balance(row: &RawRow) -> Result<CustomerBalanceRecord, RowRejection> {
    checked(
        row,
        CustomerBalanceRecord {
            customer_name: text(row, CUSTOMER_NAME),
            phone: row.text(PHONE),
            opening_balance: number(row, OPENING_BALANCE),
        },
    )
}
