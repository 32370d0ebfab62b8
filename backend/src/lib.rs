//! Product catalogue persistence library.
//!
//! The [`domain`] module holds the product model, its validation and mapping
//! rules, and the repository port. [`outbound::persistence`] implements that
//! port on PostgreSQL, and [`config`] describes where the database lives.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
