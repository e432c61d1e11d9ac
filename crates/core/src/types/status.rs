//! Membership status of a client.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Whether a client currently holds a membership product.
///
/// Never set directly by callers: it is derived from the product reference
/// at write time via [`MembershipStatus::for_product`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    #[default]
    Inactive,
}

impl MembershipStatus {
    /// Derive the status from the product reference being written.
    #[must_use]
    pub const fn for_product(product: Option<ProductId>) -> Self {
        if product.is_some() {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Lowercase wire/storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("invalid membership status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_for_product() {
        assert_eq!(
            MembershipStatus::for_product(Some(ProductId::generate())),
            MembershipStatus::Active
        );
        assert_eq!(
            MembershipStatus::for_product(None),
            MembershipStatus::Inactive
        );
    }

    #[test]
    fn test_from_str_matches_display() {
        for status in [MembershipStatus::Active, MembershipStatus::Inactive] {
            assert_eq!(status.to_string().parse::<MembershipStatus>().unwrap(), status);
        }
        assert!("ACTIVE".parse::<MembershipStatus>().is_err());
    }
}
