//! Domain primitives and ports.
//!
//! Purpose: Define the product model, its validation rules and its plain
//! mapping contract, independent of any storage technology. Persistence
//! adapters live under `crate::outbound` and plug in through [`ports`].
//!
//! Public surface:
//! - Category — closed set of product classifications.
//! - Product / ProductId — the entity and its store-assigned identity.
//! - ProductMapping / parse_price — the key-value exchange format.
//! - DataValidationError — every validation failure of the model.

pub mod category;
pub mod error;
pub mod ports;
pub mod product;
pub mod product_mapping;

pub use self::category::Category;
pub use self::error::DataValidationError;
pub use self::product::{DESCRIPTION_MAX, NAME_MAX, PRICE_SCALE, Product, ProductId};
pub use self::product_mapping::{ProductMapping, parse_price};
