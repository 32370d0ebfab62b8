//! Domain-level validation errors.
//!
//! [`DataValidationError`] is the single error kind raised by the product
//! model itself: serialised mappings that cannot be turned back into a
//! product, and persistence calls made on a product that is not in a valid
//! state for them. Store failures are modelled separately by the repository
//! port.

use thiserror::Error;

/// Validation failures raised by the product model.
///
/// # Examples
/// ```
/// use product_catalogue::domain::DataValidationError;
///
/// let err = DataValidationError::missing_field("name");
/// assert_eq!(err.to_string(), "invalid product: missing name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataValidationError {
    /// An update was requested for a product that has never been persisted.
    #[error("update called with empty id field")]
    MissingId,
    /// A required key is absent from a serialised product.
    #[error("invalid product: missing {field}")]
    MissingField {
        /// Name of the absent key.
        field: &'static str,
    },
    /// A key is present but holds a value of the wrong JSON type.
    #[error("invalid type for {expected} [{field}]: {found}")]
    InvalidType {
        /// Name of the offending key.
        field: &'static str,
        /// Type the key must hold.
        expected: &'static str,
        /// JSON type that was supplied instead.
        found: &'static str,
    },
    /// A key holds a value of the right type that is still unacceptable.
    #[error("invalid value for [{field}]: {value}")]
    InvalidValue {
        /// Name of the offending key.
        field: &'static str,
        /// The rejected value, rendered for diagnostics.
        value: String,
    },
}

impl DataValidationError {
    /// Build a [`DataValidationError::MissingField`] error.
    pub const fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Build a [`DataValidationError::InvalidType`] error.
    pub const fn invalid_type(
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::InvalidType {
            field,
            expected,
            found,
        }
    }

    /// Build a [`DataValidationError::InvalidValue`] error.
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}
