//! GraphQL error mapping.
//!
//! Every service failure becomes a GraphQL error carrying `extensions.code`.
//! Store failures are reported to Sentry and their details withheld from the
//! caller.

use async_graphql::{Error, ErrorExtensions};

use crate::services::ServiceError;

impl ServiceError {
    /// Machine-readable code exposed as `extensions.code`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DuplicateClient { .. } => "DUPLICATE_CLIENT",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::NegativeAge => "NEGATIVE_AGE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DataAccess(_) => "DATA_ACCESS",
        }
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> Error {
        let message = match self {
            Self::DataAccess(_) => {
                let event_id = sentry::capture_error(self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Resolver error"
                );
                "Internal server error".to_owned()
            }
            _ => {
                tracing::debug!(error = %self, code = self.code(), "Rejected operation");
                self.to_string()
            }
        };

        let code = self.code();
        let existing = match self {
            Self::DuplicateClient { existing, field } => Some((existing.to_string(), *field)),
            _ => None,
        };

        Error::new(message).extend_with(|_, ext| {
            ext.set("code", code);
            if let Some((id, field)) = &existing {
                ext.set("existingId", id.as_str());
                ext.set("field", *field);
            }
        })
    }
}
