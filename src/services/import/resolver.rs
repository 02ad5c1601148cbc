// src/services/import/resolver.rs

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use super::store::ImportStore;
use crate::{
    common::error::AppError,
    models::{
        crm::Customer,
        supplier::{NewSupplier, Supplier},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Supplier,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Customer => write!(f, "Customer"),
            EntityKind::Supplier => write!(f, "Supplier"),
        }
    }
}

/// Falha no processamento de UMA linha. Nunca sobe para o HTTP:
/// o pipeline converte em texto no relatório e segue para a próxima linha.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error(transparent)]
    Store(#[from] AppError),
}

/// Resultado de um find-or-create.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    Existing(T),
    Created(T),
}

impl<T> Resolved<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Resolved::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Resolved::Existing(value) | Resolved::Created(value) => value,
        }
    }
}

/// Busca por chave natural (exata, sensível a maiúsculas), sempre dentro do tenant.
#[derive(Clone, Copy)]
pub struct EntityResolver<'a> {
    store: &'a dyn ImportStore,
    company_id: Uuid,
}

impl<'a> EntityResolver<'a> {
    pub fn new(store: &'a dyn ImportStore, company_id: Uuid) -> Self {
        Self { store, company_id }
    }

    pub fn company_id(&self) -> Uuid {
        self.company_id
    }

    pub fn store(&self) -> &'a dyn ImportStore {
        self.store
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn resolve_customer(&self, name: &str) -> Result<Customer, RowError> {
        self.store
            .find_customer(self.company_id, name)
            .await?
            .ok_or_else(|| RowError::NotFound {
                kind: EntityKind::Customer,
                name: name.to_string(),
            })
    }

    pub async fn resolve_or_create_customer(
        &self,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Resolved<Customer>, RowError> {
        if let Some(existing) = self.store.find_customer(self.company_id, name).await? {
            return Ok(Resolved::Existing(existing));
        }

        match self.store.insert_customer(self.company_id, name, phone).await? {
            Some(created) => Ok(Resolved::Created(created)),
            // Outra importação criou no meio do caminho: vale o que está no banco.
            None => self.resolve_customer(name).await.map(Resolved::Existing),
        }
    }

    // =========================================================================
    //  FORNECEDORES
    // =========================================================================

    pub async fn resolve_supplier(&self, name: &str) -> Result<Supplier, RowError> {
        self.store
            .find_supplier(self.company_id, name)
            .await?
            .ok_or_else(|| RowError::NotFound {
                kind: EntityKind::Supplier,
                name: name.to_string(),
            })
    }

    pub async fn resolve_or_create_supplier(
        &self,
        supplier: &NewSupplier,
    ) -> Result<Resolved<Supplier>, RowError> {
        if let Some(existing) = self.store.find_supplier(self.company_id, &supplier.name).await? {
            return Ok(Resolved::Existing(existing));
        }

        match self.store.insert_supplier(self.company_id, supplier).await? {
            Some(created) => Ok(Resolved::Created(created)),
            None => self.resolve_supplier(&supplier.name).await.map(Resolved::Existing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::import::memory_store::MemoryStore;

    fn acme() -> NewSupplier {
        NewSupplier {
            name: "Acme".into(),
            contact: Some("Jo".into()),
            country: Some("BR".into()),
        }
    }

    #[tokio::test]
    async fn resolve_reports_missing_parent_by_kind() {
        let store = MemoryStore::new();
        let resolver = EntityResolver::new(&store, Uuid::new_v4());

        let err = resolver.resolve_customer("Ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Customer not found: Ghost");

        let err = resolver.resolve_supplier("Nobody").await.unwrap_err();
        assert_eq!(err.to_string(), "Supplier not found: Nobody");
    }

    #[tokio::test]
    async fn resolve_or_create_is_idempotent() {
        let store = MemoryStore::new();
        let resolver = EntityResolver::new(&store, Uuid::new_v4());

        let first = resolver.resolve_or_create_supplier(&acme()).await.unwrap();
        assert!(first.was_created());

        let second = resolver.resolve_or_create_supplier(&acme()).await.unwrap();
        assert!(!second.was_created());
        assert_eq!(first.into_inner().id, second.into_inner().id);
    }

    #[tokio::test]
    async fn matching_is_exact_and_tenant_scoped() {
        let store = MemoryStore::new();
        let tenant_a = EntityResolver::new(&store, Uuid::new_v4());
        let tenant_b = EntityResolver::new(&store, Uuid::new_v4());

        tenant_a.resolve_or_create_customer("Alice", Some("1")).await.unwrap();

        assert!(tenant_a.resolve_customer("alice").await.is_err());
        assert!(tenant_b.resolve_customer("Alice").await.is_err());
        assert!(tenant_a.resolve_customer("Alice").await.is_ok());
    }

    #[tokio::test]
    async fn store_failures_are_not_reported_as_missing() {
        let store = MemoryStore::new().failing_on("Acme");
        let resolver = EntityResolver::new(&store, Uuid::new_v4());

        let err = resolver.resolve_or_create_supplier(&acme()).await.unwrap_err();
        assert!(matches!(err, RowError::Store(_)));
    }
}
