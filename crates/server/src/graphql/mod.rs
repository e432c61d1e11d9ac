//! GraphQL schema over the client and product services.
//!
//! The schema is built once at startup and carries the service handles as
//! context data. Resolvers do no work of their own beyond argument
//! conversion; all rules live in [`crate::services`].

mod error;
mod mutation;
mod query;
pub mod types;

use async_graphql::{EmptySubscription, Schema};

use crate::services::{ClientService, ProductService};

pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// The executable roster schema.
pub type RosterSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema around the given services.
#[must_use]
pub fn build_schema(clients: ClientService, products: ProductService) -> RosterSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(clients)
        .data(products)
        .finish()
}

/// The schema in SDL form.
#[must_use]
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}
