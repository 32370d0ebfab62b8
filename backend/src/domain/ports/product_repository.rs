//! Port abstraction for product persistence adapters and their errors.
//!
//! The [`ProductRepository`] trait is the storage context handed to callers:
//! adapters own the connection handle, so tests and services choose their
//! store by choosing the repository value rather than through global state.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{Category, DataValidationError, Product, ProductId};

/// Errors raised by product repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductRepositoryError {
    /// Repository connection could not be established.
    #[error("product repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("product repository query failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
    /// No stored product carries the given identifier.
    #[error("product not found: {id}")]
    NotFound {
        /// Identifier that matched no row.
        id: ProductId,
    },
    /// The product is not in a valid state for the requested operation.
    #[error(transparent)]
    Validation(#[from] DataValidationError),
}

impl ProductRepositoryError {
    /// Build a [`ProductRepositoryError::Connection`] error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`ProductRepositoryError::Query`] error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Build a [`ProductRepositoryError::NotFound`] error.
    pub const fn not_found(id: ProductId) -> Self {
        Self::NotFound { id }
    }
}

/// Equality criterion applied by the finder queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// Products whose name equals the value exactly.
    Name(String),
    /// Products with the given availability.
    Availability(bool),
    /// Products in the given category.
    Category(Category),
    /// Products whose price is decimal-equal to the value.
    Price(Decimal),
}

/// Port for product storage and retrieval.
///
/// Every mutation is committed before the returned future resolves, so a
/// subsequent read always observes it. Reads return freshly materialised
/// products; adapters never hand out shared instances.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert the product as a new row and assign its identifier.
    ///
    /// Any identifier already held by `product` is replaced: calling `create`
    /// twice stores two rows.
    async fn create(&self, product: &mut Product) -> Result<(), ProductRepositoryError>;

    /// Persist the product's attributes to the row carrying its identifier.
    ///
    /// Returns [`ProductRepositoryError::Validation`] wrapping
    /// [`DataValidationError::MissingId`] when the product was never saved.
    async fn update(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    /// Remove the product's row.
    ///
    /// Returns `Ok(true)` if a row was deleted and `Ok(false)` if the product
    /// has no identifier or its row no longer exists.
    async fn delete(&self, product: &Product) -> Result<bool, ProductRepositoryError>;

    /// Fetch every stored product.
    async fn all(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Fetch a product by identifier.
    ///
    /// Returns `None` if no product exists with the given ID.
    async fn find(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Count the products matching `filter`.
    async fn count(&self, filter: &ProductFilter) -> Result<usize, ProductRepositoryError>;

    /// Fetch the products matching `filter`.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ProductRepositoryError>;
}
