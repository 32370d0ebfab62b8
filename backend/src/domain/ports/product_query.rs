//! Lazily evaluated finder queries over a [`ProductRepository`].
//!
//! A finder only records its criterion. The repository is consulted when the
//! caller awaits [`ProductQuery::count`] or [`ProductQuery::fetch`], and every
//! call runs the query again, so one query value can be re-read after the
//! store changes.

use rust_decimal::Decimal;

use crate::domain::{Category, Product};

use super::{ProductFilter, ProductRepository, ProductRepositoryError};

/// Deferred, restartable selection of products matching one filter.
pub struct ProductQuery<'r, R: ?Sized> {
    repository: &'r R,
    filter: ProductFilter,
}

impl<'r, R> ProductQuery<'r, R>
where
    R: ProductRepository + ?Sized,
{
    /// Record a query without running it.
    pub const fn new(repository: &'r R, filter: ProductFilter) -> Self {
        Self { repository, filter }
    }

    /// Criterion applied by this query.
    pub const fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Number of stored products currently matching the filter.
    ///
    /// # Errors
    ///
    /// Propagates the repository's failure unchanged.
    pub async fn count(&self) -> Result<usize, ProductRepositoryError> {
        self.repository.count(&self.filter).await
    }

    /// Every stored product currently matching the filter, each exactly once.
    ///
    /// # Errors
    ///
    /// Propagates the repository's failure unchanged.
    pub async fn fetch(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        self.repository.list(&self.filter).await
    }
}

/// Finder operations available on every [`ProductRepository`].
///
/// # Examples
/// ```ignore
/// use product_catalogue::domain::ports::ProductFinders;
///
/// let hats = repository.find_by_name("Hat");
/// assert_eq!(hats.count().await?, hats.fetch().await?.len());
/// ```
pub trait ProductFinders: ProductRepository {
    /// Products whose name equals `name` exactly.
    fn find_by_name(&self, name: impl Into<String>) -> ProductQuery<'_, Self> {
        ProductQuery::new(self, ProductFilter::Name(name.into()))
    }

    /// Products with the given availability.
    fn find_by_availability(&self, available: bool) -> ProductQuery<'_, Self> {
        ProductQuery::new(self, ProductFilter::Availability(available))
    }

    /// Products in the given category.
    fn find_by_category(&self, category: Category) -> ProductQuery<'_, Self> {
        ProductQuery::new(self, ProductFilter::Category(category))
    }

    /// Products whose price is decimal-equal to `price`.
    fn find_by_price(&self, price: Decimal) -> ProductQuery<'_, Self> {
        ProductQuery::new(self, ProductFilter::Price(price))
    }
}

impl<R> ProductFinders for R where R: ProductRepository + ?Sized {}
