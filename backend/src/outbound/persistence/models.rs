//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::products;

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available: bool,
    pub category: String,
}

/// Insertable struct for creating new product records.
///
/// The identifier is left to the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub available: bool,
    pub category: &'a str,
}

/// Changeset struct for updating existing product records.
///
/// A `None` description clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProductUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub available: bool,
    pub category: &'a str,
}
