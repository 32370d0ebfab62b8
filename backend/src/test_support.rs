//! Test utilities for the product catalogue crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). Integration tests reach it through the
//! `test-support` feature.

use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

use crate::domain::{Category, Product};

/// Names drawn by the factory. Small on purpose so that batches share names.
pub const PRODUCT_NAMES: [&str; 11] = [
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Chevy", "Hammer",
    "Wrench",
];

/// Smallest generated price, in cents.
const MIN_PRICE_CENTS: i64 = 50;
/// Largest generated price, in cents.
const MAX_PRICE_CENTS: i64 = 200_000;

/// Deterministic generator of unsaved products.
///
/// The same seed always yields the same sequence of products, so failing
/// tests can be replayed exactly.
///
/// # Examples
/// ```
/// use product_catalogue::test_support::ProductFactory;
///
/// let first = ProductFactory::with_seed(7).build_batch(3);
/// let second = ProductFactory::with_seed(7).build_batch(3);
/// assert_eq!(first, second);
/// assert!(first.iter().all(|product| product.id().is_none()));
/// ```
#[derive(Debug, Clone)]
pub struct ProductFactory {
    rng: ChaCha8Rng,
}

impl ProductFactory {
    /// Create a factory seeded with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate the next product.
    pub fn build(&mut self) -> Product {
        let name = PRODUCT_NAMES.choose(&mut self.rng).copied().unwrap_or("Hat");
        let description: String = Sentence(3..8).fake_with_rng(&mut self.rng);
        let cents = self.rng.random_range(MIN_PRICE_CENTS..=MAX_PRICE_CENTS);
        let available = self.rng.random_bool(0.5);
        let category = Category::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default();

        Product::new(name, Decimal::new(cents, 2), available, category)
            .with_description(description)
    }

    /// Generate `count` products.
    pub fn build_batch(&mut self, count: usize) -> Vec<Product> {
        (0..count).map(|_| self.build()).collect()
    }
}

impl Default for ProductFactory {
    fn default() -> Self {
        Self::with_seed(0x5EED)
    }
}
