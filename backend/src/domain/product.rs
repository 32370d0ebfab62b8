//! Product data model.

use std::fmt;

use rust_decimal::Decimal;

use super::{Category, DataValidationError};

/// Maximum length of a product name, matching the `products.name` column.
pub const NAME_MAX: usize = 100;
/// Maximum length of a product description, matching `products.description`.
pub const DESCRIPTION_MAX: usize = 250;
/// Number of fractional digits stored for prices (`NUMERIC(14, 2)`).
pub const PRICE_SCALE: u32 = 2;
/// Exclusive upper bound on the magnitude of a storable price.
const PRICE_LIMIT: i64 = 1_000_000_000_000;

/// Store-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(i32);

impl ProductId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for ProductId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalogue product.
///
/// ## Invariants
/// - `id` is `None` until the product is first persisted; only the
///   repository (or an adopted serialised mapping) sets it.
/// - `name` is non-empty once trimmed and at most [`NAME_MAX`] characters.
/// - `price` is a fixed-point decimal with at most [`PRICE_SCALE`] fractional
///   digits; it is never represented as a binary float.
///
/// The invariants on mutable fields are checked by [`Product::validate`],
/// which the repository runs before every write.
///
/// # Examples
/// ```
/// use product_catalogue::domain::{Category, Product};
/// use rust_decimal::Decimal;
///
/// let product = Product::new("Fedora", Decimal::new(1250, 2), true, Category::Software)
///     .with_description("A red hat");
/// assert_eq!(product.to_string(), "<Product Fedora id=[None]>");
/// assert!(product.id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: Option<ProductId>,
    /// Display name.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Whether the product can currently be ordered.
    pub available: bool,
    /// Classification.
    pub category: Category,
}

impl Product {
    /// Build an unsaved product without a description.
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            price,
            available,
            category,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Store-assigned identifier, if the product has been persisted.
    pub const fn id(&self) -> Option<ProductId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<ProductId>) {
        self.id = id;
    }

    /// Check the attribute invariants that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`DataValidationError::InvalidValue`] naming the first field
    /// that violates its constraint.
    pub fn validate(&self) -> Result<(), DataValidationError> {
        validate_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        validate_price(self.price)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{id}]>", self.name),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), DataValidationError> {
    if name.trim().is_empty() || name.chars().count() > NAME_MAX {
        return Err(DataValidationError::invalid_value("name", name));
    }
    Ok(())
}

pub(crate) fn validate_description(description: &str) -> Result<(), DataValidationError> {
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(DataValidationError::invalid_value(
            "description",
            format!("longer than {DESCRIPTION_MAX} characters"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_price(price: Decimal) -> Result<(), DataValidationError> {
    if price.normalize().scale() > PRICE_SCALE || price.abs() >= Decimal::from(PRICE_LIMIT) {
        return Err(DataValidationError::invalid_value("price", price.to_string()));
    }
    Ok(())
}
