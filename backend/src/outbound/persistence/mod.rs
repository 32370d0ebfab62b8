//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the product repository
//! port backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Injected context**: the pool returned by [`init_db`] is passed to the
//!   repository explicitly; there is no global session.
//!
//! # Example
//!
//! ```ignore
//! use product_catalogue::config::DatabaseSettings;
//! use product_catalogue::outbound::persistence::{DieselProductRepository, init_db};
//!
//! let settings = DatabaseSettings::for_uri("postgres://localhost/catalogue");
//! let pool = init_db(&settings).await?;
//! let repo = DieselProductRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_product_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_product_repository::DieselProductRepository;
pub use migrations::{InitDbError, MIGRATIONS, init_db, recreate_schema, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
