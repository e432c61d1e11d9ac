//! Product mutation logic.

use std::sync::Arc;

use tracing::instrument;

use gym_roster_core::{Product, ProductId, ProductInput, ProductPatch};

use super::ServiceError;
use crate::db::RecordStore;

/// Product operations over a shared record store.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn RecordStore>,
}

impl ProductService {
    /// Create a product service.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DataAccess` if the store fails.
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.list_products().await?)
    }

    /// A product by id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DataAccess` if the store fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, ServiceError> {
        Ok(self.store.find_product(id).await?)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty text and `DataAccess` on store failure.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> Result<Product, ServiceError> {
        let product = input.validate()?.into_product(ProductId::generate());
        self.store.insert_product(&product).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Apply a sparse update to a product.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty text, `NotFound` if `id` is absent,
    /// and `DataAccess` on store failure.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, ServiceError> {
        let patch = patch.validate()?;

        let existing = self
            .store
            .find_product(id)
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))?;

        let stored = self
            .store
            .update_product(&existing.merge(patch))
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))?;

        tracing::info!("Product updated");
        Ok(stored)
    }

    /// Delete a product. Clients referencing it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is absent and `DataAccess` on store failure.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<Product, ServiceError> {
        let removed = self
            .store
            .delete_product(id)
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))?;

        tracing::info!("Product deleted");
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use gym_roster_core::{ClientInput, MembershipStatus, Price, UniquenessPolicy};

    use super::*;
    use crate::db::MemoryRecordStore;
    use crate::services::{ClientService, FixedClock};

    fn day_pass() -> ProductInput {
        ProductInput {
            name: "day pass".to_owned(),
            description: "single day pass".to_owned(),
            price: Price::from_minor_units(100),
        }
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let service = ProductService::new(Arc::new(MemoryRecordStore::new()));
        let product = service.create(day_pass()).await.unwrap();

        let updated = service
            .update(
                product.id,
                ProductPatch {
                    price: Some(Price::from_minor_units(150)),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price.minor_units(), 150);
        assert_eq!(updated.name, "day pass");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_description() {
        let service = ProductService::new(Arc::new(MemoryRecordStore::new()));
        let err = service
            .create(ProductInput {
                description: String::new(),
                ..day_pass()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let service = ProductService::new(Arc::new(MemoryRecordStore::new()));
        let id = ProductId::generate();

        assert!(matches!(
            service.update(id, ProductPatch::default()).await,
            Err(ServiceError::NotFound { kind: "product", .. })
        ));
        assert!(matches!(
            service.delete(id).await,
            Err(ServiceError::NotFound { kind: "product", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_leaves_client_reference_dangling() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let products = ProductService::new(Arc::clone(&store));
        let clients = ClientService::new(
            Arc::clone(&store),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())),
            UniquenessPolicy::Any,
        );

        let product = products.create(day_pass()).await.unwrap();
        let client = clients
            .create(ClientInput {
                name: "Ana".to_owned(),
                email: "ana@x.com".to_owned(),
                phone: "555-1111".to_owned(),
                birthday: "2000-05-10".to_owned(),
                waiver: true,
                product_id: Some(product.id),
            })
            .await
            .unwrap();

        products.delete(product.id).await.unwrap();

        let client = clients.get(client.id).await.unwrap().unwrap();
        assert_eq!(client.product_id, Some(product.id));
        assert_eq!(client.membership_status, MembershipStatus::Active);
        assert!(products.get(product.id).await.unwrap().is_none());
    }
}
