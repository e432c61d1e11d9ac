//! Sample dataset loading.
//!
//! The dataset is YAML with `products` and `clients` lists. Clients name
//! their product rather than referencing an id. Everything goes through the
//! services, so ages and statuses are derived and uniqueness is enforced
//! exactly as for API writes.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use gym_roster_core::{ClientInput, Price, ProductId, ProductInput};

use crate::services::{ClientService, ProductService, ServiceError};

/// The dataset bundled with the server.
pub const SAMPLE_YAML: &str = include_str!("../seed/sample.yaml");

/// Errors that stop a seed run.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("client {client} references unknown product {product}")]
    UnknownProduct { client: String, product: String },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// A parsed seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    #[serde(default)]
    pub clients: Vec<SeedClient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub description: String,
    pub price: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birthday: String,
    pub waiver: bool,
    /// Product name.
    #[serde(default)]
    pub product: Option<String>,
}

/// Outcome of a seed run.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub products_created: usize,
    /// Products already present under the same name.
    pub products_reused: usize,
    pub clients_created: usize,
    /// Clients rejected as duplicates of existing records.
    pub clients_skipped: usize,
    /// Clients rejected for bad data, keyed by name.
    pub errors: Vec<(String, ServiceError)>,
}

impl SeedData {
    /// Parse a YAML seed document.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Yaml` if the document does not match the format.
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The bundled sample dataset.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Yaml` if the bundled file is malformed.
    pub fn sample() -> Result<Self, SeedError> {
        Self::from_yaml(SAMPLE_YAML)
    }

    /// Check that every client's product is defined in this file or exists.
    fn check_references(&self, known: &HashMap<String, ProductId>) -> Result<(), SeedError> {
        for client in &self.clients {
            if let Some(product) = &client.product
                && !known.contains_key(product)
                && !self.products.iter().any(|p| &p.name == product)
            {
                return Err(SeedError::UnknownProduct {
                    client: client.name.clone(),
                    product: product.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Load `data` through the services.
///
/// Products are matched by name so a second run reuses them; clients that
/// collide with existing ones are skipped.
///
/// # Errors
///
/// Returns `SeedError::UnknownProduct` before writing anything if a client
/// names a missing product, and `SeedError::Service` if the store fails.
#[instrument(skip_all, fields(products = data.products.len(), clients = data.clients.len()))]
pub async fn seed(
    data: SeedData,
    clients: &ClientService,
    products: &ProductService,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    let mut by_name: HashMap<String, ProductId> = products
        .list()
        .await?
        .into_iter()
        .map(|p| (p.name, p.id))
        .collect();

    data.check_references(&by_name)?;

    for product in data.products {
        if by_name.contains_key(&product.name) {
            report.products_reused += 1;
            continue;
        }
        let created = products
            .create(ProductInput {
                name: product.name,
                description: product.description,
                price: Price::from_minor_units(product.price),
            })
            .await?;
        by_name.insert(created.name.clone(), created.id);
        report.products_created += 1;
    }

    for client in data.clients {
        let name = client.name.clone();
        let input = ClientInput {
            name: client.name,
            email: client.email,
            phone: client.phone,
            birthday: client.birthday,
            waiver: client.waiver,
            product_id: client
                .product
                .as_ref()
                .and_then(|product| by_name.get(product).copied()),
        };

        match clients.create(input).await {
            Ok(_) => report.clients_created += 1,
            Err(ServiceError::DuplicateClient { field, .. }) => {
                info!(client = %name, field, "Client already present, skipping");
                report.clients_skipped += 1;
            }
            Err(err @ ServiceError::DataAccess(_)) => return Err(err.into()),
            Err(err) => {
                warn!(client = %name, error = %err, "Rejected seed client");
                report.errors.push((name, err));
            }
        }
    }

    info!(
        products_created = report.products_created,
        clients_created = report.clients_created,
        clients_skipped = report.clients_skipped,
        "Seeding complete"
    );
    Ok(report)
}
