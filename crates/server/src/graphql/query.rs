//! Query root.

use async_graphql::{Context, ID, Object, Result, ResultExt};

use gym_roster_core::{ClientId, ProductId};

use super::types::{ClientNode, ProductNode, parse_id};
use crate::services::{ClientService, ProductService};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Every client.
    async fn clients(&self, ctx: &Context<'_>) -> Result<Vec<ClientNode>> {
        let clients = ctx.data_unchecked::<ClientService>().list().await.extend()?;
        Ok(clients.into_iter().map(ClientNode).collect())
    }

    /// A client by id, or `null`.
    async fn client(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ClientNode>> {
        let id: ClientId = parse_id(&id).extend()?;
        let client = ctx.data_unchecked::<ClientService>().get(id).await.extend()?;
        Ok(client.map(ClientNode))
    }

    /// Every product.
    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<ProductNode>> {
        let products = ctx.data_unchecked::<ProductService>().list().await.extend()?;
        Ok(products.into_iter().map(ProductNode).collect())
    }

    /// A product by id, or `null`.
    async fn product(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ProductNode>> {
        let id: ProductId = parse_id(&id).extend()?;
        let product = ctx.data_unchecked::<ProductService>().get(id).await.extend()?;
        Ok(product.map(ProductNode))
    }
}
