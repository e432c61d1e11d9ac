//! `PostgreSQL` record store.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`) and rows are
//! converted into core records, surfacing bad stored values as
//! [`RepositoryError::DataCorruption`].

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use gym_roster_core::{
    Birthday, Client, ClientFilter, ClientId, Price, Product, ProductId, UniquenessPolicy,
};

use super::{RecordStore, RepositoryError};

const CLIENT_COLUMNS: &str =
    "id, name, email, phone, birthday, age, waiver, membership_status, product_id";
const PRODUCT_COLUMNS: &str = "id, name, description, price";

/// Record store backed by a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    birthday: NaiveDate,
    age: i32,
    waiver: bool,
    membership_status: String,
    product_id: Option<Uuid>,
}

impl TryFrom<ClientRow> for Client {
    type Error = RepositoryError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let age = u32::try_from(row.age).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative age for client {}", row.id))
        })?;
        let membership_status = row
            .membership_status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: ClientId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            birthday: Birthday::from_date(row.birthday),
            age,
            waiver: row.waiver,
            membership_status,
            product_id: row.product_id.map(ProductId::from_uuid),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            price: Price::from_minor_units(row.price),
        }
    }
}

fn age_column(client: &Client) -> Result<i32, RepositoryError> {
    i32::try_from(client.age).map_err(|_| {
        RepositoryError::DataCorruption(format!("age out of range for client {}", client.id))
    })
}

fn map_insert_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("id already exists".to_owned());
    }
    RepositoryError::Database(e)
}

/// Build the uniqueness lookup for `filter`: supplied fields joined per the
/// policy, the excluded id skipped, oldest match first.
fn client_filter_query(filter: &ClientFilter) -> QueryBuilder<'static, Postgres> {
    let joiner = match filter.policy {
        UniquenessPolicy::Any => " OR ",
        UniquenessPolicy::All => " AND ",
    };

    let mut query = QueryBuilder::new(format!("SELECT {CLIENT_COLUMNS} FROM roster.client WHERE ("));
    {
        let mut conditions = query.separated(joiner);
        if let Some(name) = &filter.name {
            conditions.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(email) = &filter.email {
            conditions.push("email = ").push_bind_unseparated(email.clone());
        }
        if let Some(phone) = &filter.phone {
            conditions.push("phone = ").push_bind_unseparated(phone.clone());
        }
    }
    query.push(")");
    if let Some(exclude) = filter.exclude {
        query.push(" AND id <> ").push_bind(exclude.as_uuid());
    }
    query.push(" ORDER BY created_at, id LIMIT 1");
    query
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let rows: Vec<ClientRow> = sqlx::query_as(&format!(
            "SELECT {CLIENT_COLUMNS} FROM roster.client ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Client::try_from).collect()
    }

    async fn find_client(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let row: Option<ClientRow> = sqlx::query_as(&format!(
            "SELECT {CLIENT_COLUMNS} FROM roster.client WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Client::try_from).transpose()
    }

    async fn find_client_by(
        &self,
        filter: &ClientFilter,
    ) -> Result<Option<Client>, RepositoryError> {
        if filter.is_empty() {
            return Ok(None);
        }

        let mut query = client_filter_query(filter);
        let row = query
            .build_query_as::<ClientRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(Client::try_from).transpose()
    }

    async fn insert_client(&self, client: &Client) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO roster.client
                (id, name, email, phone, birthday, age, waiver, membership_status, product_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.birthday.date())
        .bind(age_column(client)?)
        .bind(client.waiver)
        .bind(client.membership_status.as_str())
        .bind(client.product_id.map(|p| p.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn update_client(&self, client: &Client) -> Result<Option<Client>, RepositoryError> {
        let row: Option<ClientRow> = sqlx::query_as(&format!(
            r"
            UPDATE roster.client
            SET name = $2, email = $3, phone = $4, birthday = $5, age = $6,
                waiver = $7, membership_status = $8, product_id = $9, updated_at = now()
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "
        ))
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.birthday.date())
        .bind(age_column(client)?)
        .bind(client.waiver)
        .bind(client.membership_status.as_str())
        .bind(client.product_id.map(|p| p.as_uuid()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Client::try_from).transpose()
    }

    async fn delete_client(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let row: Option<ClientRow> = sqlx::query_as(&format!(
            "DELETE FROM roster.client WHERE id = $1 RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Client::try_from).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM roster.product ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM roster.product WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO roster.product (id, name, description, price)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.minor_units())
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE roster.product
            SET name = $2, description = $3, price = $4, updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.minor_units())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "DELETE FROM roster.product WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filter(
        name: Option<&str>,
        email: Option<&str>,
        policy: UniquenessPolicy,
        exclude: Option<ClientId>,
    ) -> ClientFilter {
        ClientFilter {
            name: name.map(str::to_owned),
            email: email.map(str::to_owned),
            phone: None,
            policy,
            exclude,
        }
    }

    fn where_clause(filter: &ClientFilter) -> String {
        let query = client_filter_query(filter);
        let sql = query.sql();
        let start = sql.find("WHERE ").unwrap() + "WHERE ".len();
        let end = sql.find(" ORDER BY").unwrap();
        sql[start..end].to_owned()
    }

    #[test]
    fn test_any_policy_with_exclusion() {
        let filter = filter(
            Some("Ana"),
            Some("ana@x.com"),
            UniquenessPolicy::Any,
            Some(ClientId::generate()),
        );

        assert_eq!(
            where_clause(&filter),
            "(name = $1 OR email = $2) AND id <> $3"
        );
    }

    #[test]
    fn test_all_policy_joins_with_and() {
        let filter = filter(Some("Ana"), Some("ana@x.com"), UniquenessPolicy::All, None);

        assert_eq!(where_clause(&filter), "(name = $1 AND email = $2)");
    }

    #[test]
    fn test_single_field_has_no_separator() {
        let filter = filter(None, Some("ana@x.com"), UniquenessPolicy::Any, None);

        assert_eq!(where_clause(&filter), "(email = $1)");
    }

    #[test]
    fn test_oldest_match_first() {
        let filter = filter(Some("Ana"), None, UniquenessPolicy::Any, None);
        let query = client_filter_query(&filter);

        assert!(query.sql().ends_with(" ORDER BY created_at, id LIMIT 1"));
        assert!(query.sql().starts_with("SELECT id, name, email"));
    }
}
