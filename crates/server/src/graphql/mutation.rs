//! Mutation root.

use async_graphql::{Context, ID, Object, Result, ResultExt};

use gym_roster_core::{ClientId, ClientInput, ClientPatch, ProductId};

use super::types::{
    AddClientInput, AddProductInput, ClientNode, ProductNode, UpdateClientInput,
    UpdateProductInput, parse_id,
};
use crate::services::{ClientService, ProductService};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a client. Age and membership status are derived.
    async fn add_client(&self, ctx: &Context<'_>, input: AddClientInput) -> Result<ClientNode> {
        let input = ClientInput::try_from(input).extend()?;
        let client = ctx
            .data_unchecked::<ClientService>()
            .create(input)
            .await
            .extend()?;
        Ok(ClientNode(client))
    }

    /// Update a client. Membership status follows the `productId` supplied on
    /// this call.
    async fn update_client(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateClientInput,
    ) -> Result<ClientNode> {
        let id: ClientId = parse_id(&id).extend()?;
        let patch = ClientPatch::try_from(input).extend()?;
        let client = ctx
            .data_unchecked::<ClientService>()
            .update(id, patch)
            .await
            .extend()?;
        Ok(ClientNode(client))
    }

    /// Delete a client, returning the removed record.
    async fn delete_client(&self, ctx: &Context<'_>, id: ID) -> Result<ClientNode> {
        let id: ClientId = parse_id(&id).extend()?;
        let client = ctx
            .data_unchecked::<ClientService>()
            .delete(id)
            .await
            .extend()?;
        Ok(ClientNode(client))
    }

    /// Create a product.
    async fn add_product(&self, ctx: &Context<'_>, input: AddProductInput) -> Result<ProductNode> {
        let product = ctx
            .data_unchecked::<ProductService>()
            .create(input.into())
            .await
            .extend()?;
        Ok(ProductNode(product))
    }

    /// Update a product.
    async fn update_product(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateProductInput,
    ) -> Result<ProductNode> {
        let id: ProductId = parse_id(&id).extend()?;
        let product = ctx
            .data_unchecked::<ProductService>()
            .update(id, input.into())
            .await
            .extend()?;
        Ok(ProductNode(product))
    }

    /// Delete a product. Clients that reference it keep the dangling id.
    async fn delete_product(&self, ctx: &Context<'_>, id: ID) -> Result<ProductNode> {
        let id: ProductId = parse_id(&id).extend()?;
        let product = ctx
            .data_unchecked::<ProductService>()
            .delete(id)
            .await
            .extend()?;
        Ok(ProductNode(product))
    }
}
