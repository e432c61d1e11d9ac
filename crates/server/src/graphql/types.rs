//! GraphQL object and input types.
//!
//! Records are wrapped rather than annotated so the core crate stays free of
//! transport concerns.

use std::str::FromStr;

use async_graphql::{Context, Enum, ID, InputObject, MaybeUndefined, Object, Result, ResultExt};

use gym_roster_core::{
    Client, ClientInput, ClientPatch, InvalidId, MembershipStatus, Price, Product, ProductInput,
    ProductPatch, ProductUpdate,
};

use crate::services::{ProductService, ServiceError};

/// Parse a GraphQL id into a typed record id.
pub(crate) fn parse_id<T>(id: &ID) -> Result<T, ServiceError>
where
    T: FromStr<Err = InvalidId>,
{
    Ok(id.as_str().parse()?)
}

/// Whether a client holds a product.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "MembershipStatus")]
pub enum MembershipStatusGql {
    Active,
    Inactive,
}

impl From<MembershipStatus> for MembershipStatusGql {
    fn from(status: MembershipStatus) -> Self {
        match status {
            MembershipStatus::Active => Self::Active,
            MembershipStatus::Inactive => Self::Inactive,
        }
    }
}

impl From<MembershipStatusGql> for MembershipStatus {
    fn from(status: MembershipStatusGql) -> Self {
        match status {
            MembershipStatusGql::Active => Self::Active,
            MembershipStatusGql::Inactive => Self::Inactive,
        }
    }
}

/// A gym member.
pub struct ClientNode(pub Client);

#[Object(name = "Client")]
impl ClientNode {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn phone(&self) -> &str {
        &self.0.phone
    }

    /// Birth date as `YYYY-MM-DD`.
    async fn birthday(&self) -> String {
        self.0.birthday.to_string()
    }

    /// Whole years as of the last write that set the birth date.
    async fn age(&self) -> u32 {
        self.0.age
    }

    async fn waiver(&self) -> bool {
        self.0.waiver
    }

    async fn membership_status(&self) -> MembershipStatusGql {
        self.0.membership_status.into()
    }

    async fn product_id(&self) -> Option<ID> {
        self.0.product_id.map(|id| ID(id.to_string()))
    }

    /// The linked product, or `null` if none is linked or it was deleted.
    async fn product(&self, ctx: &Context<'_>) -> Result<Option<ProductNode>> {
        let Some(id) = self.0.product_id else {
            return Ok(None);
        };
        let product = ctx
            .data_unchecked::<ProductService>()
            .get(id)
            .await
            .extend()?;
        Ok(product.map(ProductNode))
    }
}

/// A membership product.
pub struct ProductNode(pub Product);

#[Object(name = "Product")]
impl ProductNode {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    /// Price in minor currency units.
    async fn price(&self) -> i32 {
        self.0.price.minor_units()
    }
}

/// Arguments for `addClient`.
#[derive(InputObject)]
pub struct AddClientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD` or `Month D, YYYY`.
    pub birthday: String,
    pub waiver: bool,
    pub product_id: Option<ID>,
}

impl TryFrom<AddClientInput> for ClientInput {
    type Error = ServiceError;

    fn try_from(input: AddClientInput) -> Result<Self, Self::Error> {
        Ok(Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
            birthday: input.birthday,
            waiver: input.waiver,
            product_id: input.product_id.as_ref().map(parse_id).transpose()?,
        })
    }
}

/// Arguments for `updateClient`. Omitted fields keep their value and
/// `productId: null` unlinks the product. Membership status is derived from
/// the `productId` supplied on each call.
#[derive(InputObject, Default)]
pub struct UpdateClientInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub waiver: Option<bool>,
    pub product_id: MaybeUndefined<ID>,
    /// Accepted for compatibility; status is always derived from `productId`.
    pub membership_status: Option<MembershipStatusGql>,
}

impl TryFrom<UpdateClientInput> for ClientPatch {
    type Error = ServiceError;

    fn try_from(input: UpdateClientInput) -> Result<Self, Self::Error> {
        let product = match input.product_id {
            MaybeUndefined::Undefined => ProductUpdate::Unchanged,
            MaybeUndefined::Null => ProductUpdate::Cleared,
            MaybeUndefined::Value(id) => ProductUpdate::Linked(parse_id(&id)?),
        };

        Ok(Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
            birthday: input.birthday,
            waiver: input.waiver,
            product,
            membership_status: input.membership_status.map(Into::into),
        })
    }
}

/// Arguments for `addProduct`.
#[derive(InputObject)]
pub struct AddProductInput {
    pub name: String,
    pub description: String,
    /// Minor currency units.
    pub price: i32,
}

impl From<AddProductInput> for ProductInput {
    fn from(input: AddProductInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            price: Price::from_minor_units(input.price),
        }
    }
}

/// Arguments for `updateProduct`.
#[derive(InputObject, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
}

impl From<UpdateProductInput> for ProductPatch {
    fn from(input: UpdateProductInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            price: input.price.map(Price::from_minor_units),
        }
    }
}
