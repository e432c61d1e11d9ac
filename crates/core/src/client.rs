//! Client records and the pure rules that shape them.
//!
//! Everything here is side-effect free: the mutation services load and store
//! records, these types decide what a record looks like after a write.
//!
//! Two fields are never taken from callers:
//! - `age` is recomputed from the birth date on every write that supplies one
//! - `membership_status` follows the product reference supplied on the write

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Birthday, BirthdayError, ClientId, MembershipStatus, ProductId};
use crate::validation::{ValidationError, optional_text, required_text};

/// A gym member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birthday: Birthday,
    /// Whole years as of the last write that touched `birthday`.
    pub age: u32,
    pub waiver: bool,
    pub membership_status: MembershipStatus,
    /// Weak reference; the product may have been deleted since.
    pub product_id: Option<ProductId>,
}

/// Arguments for creating a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Raw birth date text, parsed after the uniqueness check.
    pub birthday: String,
    pub waiver: bool,
    pub product_id: Option<ProductId>,
}

impl ClientInput {
    /// Trim the text fields and reject empty ones.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for the first empty field.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", &self.name)?,
            email: required_text("email", &self.email)?,
            phone: required_text("phone", &self.phone)?,
            birthday: required_text("birthday", &self.birthday)?,
            ..self
        })
    }

    /// Filter that finds clients conflicting with this input.
    #[must_use]
    pub fn conflict_filter(&self, policy: UniquenessPolicy) -> ClientFilter {
        ClientFilter {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
            policy,
            exclude: None,
        }
    }

    /// Build the record to persist, deriving age and membership status.
    ///
    /// # Errors
    ///
    /// Returns a [`BirthdayError`] if the birth date does not parse or lies
    /// after `today`.
    pub fn into_client(self, id: ClientId, today: NaiveDate) -> Result<Client, BirthdayError> {
        let birthday = Birthday::parse(&self.birthday)?;
        let age = birthday.age_on(today)?;

        Ok(Client {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            birthday,
            age,
            waiver: self.waiver,
            membership_status: MembershipStatus::for_product(self.product_id),
            product_id: self.product_id,
        })
    }
}

/// What an update does to a client's product reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductUpdate {
    /// Not supplied: the reference is kept.
    #[default]
    Unchanged,
    /// Supplied as null: the reference is removed.
    Cleared,
    /// Supplied with an id.
    Linked(ProductId),
}

impl ProductUpdate {
    /// The product id supplied on this write, if any.
    #[must_use]
    pub const fn supplied(&self) -> Option<ProductId> {
        match self {
            Self::Linked(id) => Some(*id),
            Self::Unchanged | Self::Cleared => None,
        }
    }
}

/// A sparse update to a client. `None` fields keep their prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub waiver: Option<bool>,
    pub product: ProductUpdate,
    /// Accepted for compatibility and ignored; the status is always derived.
    pub membership_status: Option<MembershipStatus>,
}

impl ClientPatch {
    /// Trim supplied text fields and reject empty ones.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for the first supplied empty field.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: optional_text("name", self.name)?,
            email: optional_text("email", self.email)?,
            phone: optional_text("phone", self.phone)?,
            birthday: optional_text("birthday", self.birthday)?,
            ..self
        })
    }

    /// Whether the patch supplies any identifying field.
    #[must_use]
    pub const fn touches_identity(&self) -> bool {
        self.name.is_some() || self.email.is_some() || self.phone.is_some()
    }

    /// Filter that finds clients other than `id` conflicting with this patch.
    #[must_use]
    pub fn conflict_filter(&self, id: ClientId, policy: UniquenessPolicy) -> ClientFilter {
        ClientFilter {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            policy,
            exclude: Some(id),
        }
    }
}

impl Client {
    /// Apply `patch` over this record, returning the new record.
    ///
    /// Supplied values win and absent ones keep their prior value. Age is
    /// recomputed only when a birth date is supplied. Membership status is
    /// re-derived from the product id supplied on *this* patch, so a patch
    /// without a product id yields `Inactive` even when the prior reference
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns a [`BirthdayError`] if a supplied birth date does not parse or
    /// lies after `today`.
    pub fn merge(&self, patch: ClientPatch, today: NaiveDate) -> Result<Self, BirthdayError> {
        let (birthday, age) = match patch.birthday {
            Some(text) => {
                let birthday = Birthday::parse(&text)?;
                (birthday, birthday.age_on(today)?)
            }
            None => (self.birthday, self.age),
        };

        let product_id = match patch.product {
            ProductUpdate::Unchanged => self.product_id,
            ProductUpdate::Cleared => None,
            ProductUpdate::Linked(id) => Some(id),
        };

        Ok(Self {
            id: self.id,
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            email: patch.email.unwrap_or_else(|| self.email.clone()),
            phone: patch.phone.unwrap_or_else(|| self.phone.clone()),
            birthday,
            age,
            waiver: patch.waiver.unwrap_or(self.waiver),
            membership_status: MembershipStatus::for_product(patch.product.supplied()),
            product_id,
        })
    }
}

/// How candidate identifying fields combine when looking for a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniquenessPolicy {
    /// A record conflicts if it shares the name, the email, or the phone.
    #[default]
    Any,
    /// A record conflicts only if every supplied field matches.
    All,
}

impl std::fmt::Display for UniquenessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::All => f.write_str("all"),
        }
    }
}

impl std::str::FromStr for UniquenessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "all" => Ok(Self::All),
            _ => Err(format!("invalid uniqueness policy: {s} (expected any or all)")),
        }
    }
}

/// Find-by-filter query over client identifying fields.
///
/// Only supplied candidates take part. A filter with no candidates matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub policy: UniquenessPolicy,
    /// Record never reported as a match (the record under update).
    pub exclude: Option<ClientId>,
}

impl ClientFilter {
    /// Whether no candidate field is supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Evaluate the filter against a single record.
    #[must_use]
    pub fn matches(&self, client: &Client) -> bool {
        if self.exclude == Some(client.id) {
            return false;
        }

        let checks = [
            self.name.as_deref().map(|n| n == client.name),
            self.email.as_deref().map(|e| e == client.email),
            self.phone.as_deref().map(|p| p == client.phone),
        ];
        let mut supplied = checks.into_iter().flatten().peekable();
        if supplied.peek().is_none() {
            return false;
        }

        match self.policy {
            UniquenessPolicy::Any => supplied.any(|hit| hit),
            UniquenessPolicy::All => supplied.all(|hit| hit),
        }
    }

    /// Name of the first supplied field that `client` shares with this filter.
    #[must_use]
    pub fn shared_field(&self, client: &Client) -> Option<&'static str> {
        if self.name.as_deref() == Some(client.name.as_str()) {
            Some("name")
        } else if self.email.as_deref() == Some(client.email.as_str()) {
            Some("email")
        } else if self.phone.as_deref() == Some(client.phone.as_str()) {
            Some("phone")
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn ana_input() -> ClientInput {
        ClientInput {
            name: "Ana".to_owned(),
            email: "ana@x.com".to_owned(),
            phone: "555-1111".to_owned(),
            birthday: "2000-05-10".to_owned(),
            waiver: true,
            product_id: None,
        }
    }

    fn ana() -> Client {
        ana_input().into_client(ClientId::generate(), today()).unwrap()
    }

    #[test]
    fn test_into_client_derives_fields() {
        let client = ana();
        assert_eq!(client.age, 26);
        assert_eq!(client.membership_status, MembershipStatus::Inactive);
        assert_eq!(client.birthday.to_string(), "2000-05-10");
    }

    #[test]
    fn test_into_client_with_product_is_active() {
        let input = ClientInput {
            product_id: Some(ProductId::generate()),
            ..ana_input()
        };
        let client = input.into_client(ClientId::generate(), today()).unwrap();
        assert_eq!(client.membership_status, MembershipStatus::Active);
    }

    #[test]
    fn test_into_client_rejects_bad_birthday() {
        let input = ClientInput {
            birthday: "2000-02-31".to_owned(),
            ..ana_input()
        };
        assert!(matches!(
            input.into_client(ClientId::generate(), today()),
            Err(BirthdayError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_text() {
        let input = ClientInput {
            phone: "  ".to_owned(),
            ..ana_input()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::EmptyField { field: "phone" })
        );
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let client = ana();
        let patch = ClientPatch {
            waiver: Some(false),
            ..ClientPatch::default()
        };
        let merged = client.merge(patch, today()).unwrap();
        assert_eq!(merged.name, client.name);
        assert_eq!(merged.email, client.email);
        assert_eq!(merged.age, client.age);
        assert!(!merged.waiver);
    }

    #[test]
    fn test_merge_recomputes_age() {
        let client = ana();
        let patch = ClientPatch {
            birthday: Some("1990-12-01".to_owned()),
            ..ClientPatch::default()
        };
        let merged = client.merge(patch, today()).unwrap();
        assert_eq!(merged.age, 35);
    }

    #[test]
    fn test_merge_status_follows_supplied_product() {
        let product = ProductId::generate();
        let linked = ana()
            .merge(
                ClientPatch {
                    product: ProductUpdate::Linked(product),
                    ..ClientPatch::default()
                },
                today(),
            )
            .unwrap();
        assert_eq!(linked.membership_status, MembershipStatus::Active);
        assert_eq!(linked.product_id, Some(product));

        // Omitting the product keeps the reference but derives Inactive.
        let untouched = linked.merge(ClientPatch::default(), today()).unwrap();
        assert_eq!(untouched.product_id, Some(product));
        assert_eq!(untouched.membership_status, MembershipStatus::Inactive);

        let cleared = linked
            .merge(
                ClientPatch {
                    product: ProductUpdate::Cleared,
                    ..ClientPatch::default()
                },
                today(),
            )
            .unwrap();
        assert_eq!(cleared.product_id, None);
        assert_eq!(cleared.membership_status, MembershipStatus::Inactive);
    }

    #[test]
    fn test_merge_ignores_supplied_status() {
        let patch = ClientPatch {
            membership_status: Some(MembershipStatus::Active),
            ..ClientPatch::default()
        };
        let merged = ana().merge(patch, today()).unwrap();
        assert_eq!(merged.membership_status, MembershipStatus::Inactive);
    }

    #[test]
    fn test_filter_any_matches_single_field() {
        let client = ana();
        let filter = ClientFilter {
            email: Some("ana@x.com".to_owned()),
            phone: Some("000".to_owned()),
            ..ClientFilter::default()
        };
        assert!(filter.matches(&client));
    }

    #[test]
    fn test_filter_all_requires_every_field() {
        let client = ana();
        let mut filter = ClientFilter {
            name: Some("Ana".to_owned()),
            email: Some("other@x.com".to_owned()),
            policy: UniquenessPolicy::All,
            ..ClientFilter::default()
        };
        assert!(!filter.matches(&client));

        filter.email = Some("ana@x.com".to_owned());
        assert!(filter.matches(&client));
    }

    #[test]
    fn test_filter_excludes_self() {
        let client = ana();
        let patch = ClientPatch {
            email: Some(client.email.clone()),
            ..ClientPatch::default()
        };
        let filter = patch.conflict_filter(client.id, UniquenessPolicy::Any);
        assert!(!filter.matches(&client));
    }

    #[test]
    fn test_shared_field_reports_first_hit() {
        let client = ana();
        let filter = ClientFilter {
            name: Some("Bea".to_owned()),
            email: Some("b@x.com".to_owned()),
            phone: Some("555-1111".to_owned()),
            ..ClientFilter::default()
        };
        assert_eq!(filter.shared_field(&client), Some("phone"));
        assert_eq!(ClientFilter::default().shared_field(&client), None);
    }

    #[test]
    fn test_empty_filter_matches_nothing() {
        let filter = ClientFilter::default();
        assert!(filter.is_empty());
        assert!(!filter.matches(&ana()));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("ANY".parse::<UniquenessPolicy>().unwrap(), UniquenessPolicy::Any);
        assert_eq!("all".parse::<UniquenessPolicy>().unwrap(), UniquenessPolicy::All);
        assert!("some".parse::<UniquenessPolicy>().is_err());
    }
}
