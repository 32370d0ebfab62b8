//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Product catalogue table.
    ///
    /// The `id` column is a serial primary key assigned on insert. The
    /// `category` column holds the upper-case category name and is guarded by
    /// a check constraint.
    products (id) {
        /// Primary key assigned by the `products_id_seq` sequence.
        id -> Int4,
        /// Product name (max 100 characters).
        name -> Varchar,
        /// Optional free-text description (max 250 characters).
        description -> Nullable<Varchar>,
        /// Exact price with two fractional digits.
        price -> Numeric,
        /// Whether the product can currently be sold.
        available -> Bool,
        /// Category name, `UNKNOWN` when unclassified.
        category -> Varchar,
    }
}
