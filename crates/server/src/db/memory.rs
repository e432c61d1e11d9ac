//! In-memory record store.
//!
//! Records are kept in insertion order so "first match" is deterministic,
//! matching the `created_at` ordering of the `PostgreSQL` store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use gym_roster_core::{Client, ClientFilter, ClientId, Product, ProductId};

use super::{RecordStore, RepositoryError};

/// Record store held entirely in process memory.
#[derive(Default)]
pub struct MemoryRecordStore {
    clients: RwLock<Vec<Client>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        Ok(self.clients.read().await.clone())
    }

    async fn find_client(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        Ok(self.clients.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_client_by(
        &self,
        filter: &ClientFilter,
    ) -> Result<Option<Client>, RepositoryError> {
        Ok(self
            .clients
            .read()
            .await
            .iter()
            .find(|c| filter.matches(c))
            .cloned())
    }

    async fn insert_client(&self, client: &Client) -> Result<(), RepositoryError> {
        let mut clients = self.clients.write().await;
        if clients.iter().any(|c| c.id == client.id) {
            return Err(RepositoryError::Conflict("id already exists".to_owned()));
        }
        clients.push(client.clone());
        Ok(())
    }

    async fn update_client(&self, client: &Client) -> Result<Option<Client>, RepositoryError> {
        let mut clients = self.clients.write().await;
        Ok(clients.iter_mut().find(|c| c.id == client.id).map(|slot| {
            slot.clone_from(client);
            client.clone()
        }))
    }

    async fn delete_client(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let mut clients = self.clients.write().await;
        Ok(clients
            .iter()
            .position(|c| c.id == id)
            .map(|index| clients.remove(index)))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return Err(RepositoryError::Conflict("id already exists".to_owned()));
        }
        products.push(product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == product.id).map(|slot| {
            slot.clone_from(product);
            product.clone()
        }))
    }

    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.products.write().await;
        Ok(products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index)))
    }
}
