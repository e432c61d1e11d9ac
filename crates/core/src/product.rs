//! Membership products.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};
use crate::validation::{ValidationError, optional_text, required_text};

/// A purchasable membership plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
}

/// Arguments for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Price,
}

impl ProductInput {
    /// Trim the text fields and reject empty ones.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for the first empty field.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", &self.name)?,
            description: required_text("description", &self.description)?,
            price: self.price,
        })
    }

    /// Attach an identity.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}

/// A sparse update to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
}

impl ProductPatch {
    /// Trim supplied text fields and reject empty ones.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for the first supplied empty field.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: optional_text("name", self.name)?,
            description: optional_text("description", self.description)?,
            price: self.price,
        })
    }
}

impl Product {
    /// Apply `patch` over this record, returning the new record.
    #[must_use]
    pub fn merge(&self, patch: ProductPatch) -> Self {
        Self {
            id: self.id,
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            price: patch.price.unwrap_or(self.price),
        }
    }
}
