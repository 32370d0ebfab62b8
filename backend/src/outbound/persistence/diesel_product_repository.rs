//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! This adapter implements the domain's `ProductRepository` port. Every
//! operation checks a connection out of the pool, runs a single statement and
//! returns it, so writes are committed before the call resolves and each read
//! materialises fresh `Product` values.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ProductFilter, ProductRepository, ProductRepositoryError};
use crate::domain::{Category, DataValidationError, Product, ProductId};

use super::diesel_error_mapping;
use super::models::{NewProductRow, ProductRow, ProductUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the `ProductRepository` port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    diesel_error_mapping::map_pool_error(error, ProductRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

/// Convert a database row to a domain `Product`.
///
/// A stored category outside the closed set is a validation error, so a
/// corrupted row never reads back as a different product.
fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    let category = row.category.parse::<Category>().inspect_err(|_| {
        debug!(
            value = row.category.as_str(),
            product_id = row.id,
            "stored category is not recognised"
        );
    })?;

    let mut product = Product::new(row.name, row.price, row.available, category);
    product.description = row.description;
    product.set_id(Some(ProductId::new(row.id)));
    Ok(product)
}

/// Start a boxed `products` query restricted to rows matching `filter`.
fn filtered(filter: &ProductFilter) -> products::BoxedQuery<'static, Pg> {
    let query = products::table.into_boxed();
    match filter {
        ProductFilter::Name(name) => query.filter(products::name.eq(name.clone())),
        ProductFilter::Availability(available) => query.filter(products::available.eq(*available)),
        ProductFilter::Category(category) => query.filter(products::category.eq(category.as_str())),
        ProductFilter::Price(price) => query.filter(products::price.eq(*price)),
    }
}

fn count_to_usize(count: i64) -> Result<usize, ProductRepositoryError> {
    usize::try_from(count).map_err(|_| ProductRepositoryError::query("row count out of range"))
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn create(&self, product: &mut Product) -> Result<(), ProductRepositoryError> {
        product.validate()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewProductRow {
            name: &product.name,
            description: product.description.as_deref(),
            price: product.price,
            available: product.available,
            category: product.category.as_str(),
        };

        let id: i32 = diesel::insert_into(products::table)
            .values(&new_row)
            .returning(products::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(product_id = id, name = product.name.as_str(), "product created");
        product.set_id(Some(ProductId::new(id)));
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let id = product.id().ok_or(DataValidationError::MissingId)?;
        product.validate()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ProductUpdate {
            name: &product.name,
            description: product.description.as_deref(),
            price: product.price,
            available: product.available,
            category: product.category.as_str(),
        };

        let updated_rows = diesel::update(products::table.find(id.get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(product_id = id.get(), updated_rows, "product updated");
        if updated_rows == 0 {
            return Err(ProductRepositoryError::not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let Some(id) = product.id() else {
            debug!(name = product.name.as_str(), "delete skipped for unsaved product");
            return Ok(false);
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted_rows = diesel::delete(products::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(product_id = id.get(), deleted_rows, "product deleted");
        Ok(deleted_rows > 0)
    }

    async fn all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .order(products::id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(rows = rows.len(), "loaded all products");
        rows.into_iter().map(row_to_product).collect()
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProductRow> = products::table
            .find(id.get())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        debug!(product_id = id.get(), found = row.is_some(), "product lookup");
        row.map(row_to_product).transpose()
    }

    async fn count(&self, filter: &ProductFilter) -> Result<usize, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(?filter, count, "counted products");
        count_to_usize(count)
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = filtered(filter)
            .order(products::id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(?filter, rows = rows.len(), "listed products");
        rows.into_iter().map(row_to_product).collect()
    }
}
