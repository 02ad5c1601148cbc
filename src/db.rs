pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;

pub mod import_store;
pub use import_store::PgImportStore;
