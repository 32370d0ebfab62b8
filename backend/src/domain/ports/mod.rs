//! Domain ports and supporting types for the hexagonal boundary.

mod product_query;
mod product_repository;

pub use product_query::{ProductFinders, ProductQuery};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductFilter, ProductRepository, ProductRepositoryError};
