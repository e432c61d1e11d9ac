//! Input validation shared by client and product records.

/// Errors raised when caller-supplied fields fail validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Trim `value` and ensure something is left.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyField`] when the trimmed value is empty.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

/// Like [`required_text`], for a field a caller may omit.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyField`] when the value is supplied but empty.
pub fn optional_text(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    value.map(|v| required_text(field, &v)).transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("name", "  Ana ").unwrap(), "Ana");
    }

    #[test]
    fn test_required_text_rejects_blank() {
        assert_eq!(
            required_text("email", "   "),
            Err(ValidationError::EmptyField { field: "email" })
        );
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("phone", None).unwrap(), None);
        assert_eq!(
            optional_text("phone", Some("555".to_owned())).unwrap(),
            Some("555".to_owned())
        );
        assert!(optional_text("phone", Some(String::new())).is_err());
    }
}
