//! Gym Roster Core - Shared record types and rules.
//!
//! This crate provides the types used across all Gym Roster components:
//! - `server` - GraphQL API over the record store
//! - `cli` - Command-line tools for migrations, seeding, and tokens
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Derived client fields (age, membership status) and the
//! conflict filter used for uniqueness checks are computed here so they can be
//! tested without a store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, birth dates, and statuses
//! - [`client`] - Client records, sparse patches, and the conflict filter
//! - [`product`] - Product records and patches
//! - [`validation`] - Required-field checks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod product;
pub mod types;
pub mod validation;

pub use client::{Client, ClientFilter, ClientInput, ClientPatch, ProductUpdate, UniquenessPolicy};
pub use product::{Product, ProductInput, ProductPatch};
pub use types::*;
pub use validation::ValidationError;
