//! Business logic services for the roster.
//!
//! # Services
//!
//! - `clients` - Client create/update/delete with uniqueness and derived fields
//! - `products` - Product create/update/delete
//! - `auth` - Signed bearer tokens for the API
//!
//! Services are written against [`RecordStore`](crate::db::RecordStore) and a
//! [`Clock`], so they run unchanged over either store and under a fixed date
//! in tests.

pub mod auth;
pub mod clients;
pub mod products;

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use gym_roster_core::{BirthdayError, ClientId, InvalidId, ValidationError};

use crate::db::RepositoryError;

pub use clients::ClientService;
pub use products::ProductService;

/// Errors returned by the mutation and lookup operations.
///
/// Every variant except [`ServiceError::DataAccess`] is detected before any
/// write is attempted.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Another client already holds one of the identifying fields.
    #[error("a client with this {field} already exists")]
    DuplicateClient {
        existing: ClientId,
        field: &'static str,
    },

    /// The birth date is not a valid calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The birth date lies in the future.
    #[error("birth date is in the future")]
    NegativeAge,

    /// A required argument is empty or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No record with the requested identity.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// The record store failed.
    #[error("data access failure: {0}")]
    DataAccess(#[from] RepositoryError),
}

impl ServiceError {
    pub(crate) fn client_not_found(id: ClientId) -> Self {
        Self::NotFound {
            kind: "client",
            id: id.to_string(),
        }
    }

    pub(crate) fn product_not_found(id: gym_roster_core::ProductId) -> Self {
        Self::NotFound {
            kind: "product",
            id: id.to_string(),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<BirthdayError> for ServiceError {
    fn from(err: BirthdayError) -> Self {
        match err {
            BirthdayError::InvalidDate(text) => Self::InvalidDate(text),
            BirthdayError::NegativeAge => Self::NegativeAge,
        }
    }
}

impl From<InvalidId> for ServiceError {
    fn from(err: InvalidId) -> Self {
        Self::InvalidInput(format!("malformed id: {}", err.0))
    }
}

/// Source of "today" for age computation.
pub trait Clock: Send + Sync {
    /// The current calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock stopped on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
