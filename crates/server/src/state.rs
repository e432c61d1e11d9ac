//! Application state shared across handlers.

use std::sync::Arc;

use gym_roster_core::UniquenessPolicy;

use crate::db::RecordStore;
use crate::graphql::{RosterSchema, build_schema};
use crate::services::auth::TokenSigner;
use crate::services::{ClientService, Clock, ProductService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// record store, the services built over it, and the executable schema.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn RecordStore>,
    clients: ClientService,
    products: ProductService,
    schema: RosterSchema,
    signer: TokenSigner,
    graphiql: bool,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `store` - Record store shared by every request
    /// * `clock` - Source of "today" for age computation
    /// * `policy` - Client uniqueness rule
    /// * `signer` - API token verifier
    /// * `graphiql` - Whether `GET /graphql` serves the GraphiQL page
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        policy: UniquenessPolicy,
        signer: TokenSigner,
        graphiql: bool,
    ) -> Self {
        let clients = ClientService::new(Arc::clone(&store), clock, policy);
        let products = ProductService::new(Arc::clone(&store));
        let schema = build_schema(clients.clone(), products.clone());

        Self {
            inner: Arc::new(AppStateInner {
                store,
                clients,
                products,
                schema,
                signer,
                graphiql,
            }),
        }
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the client service.
    #[must_use]
    pub fn clients(&self) -> &ClientService {
        &self.inner.clients
    }

    /// Get a reference to the product service.
    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    /// Get a reference to the GraphQL schema.
    #[must_use]
    pub fn schema(&self) -> &RosterSchema {
        &self.inner.schema
    }

    /// Get a reference to the API token signer.
    #[must_use]
    pub fn signer(&self) -> &TokenSigner {
        &self.inner.signer
    }

    /// Whether the GraphiQL page is served.
    #[must_use]
    pub fn graphiql_enabled(&self) -> bool {
        self.inner.graphiql
    }
}
