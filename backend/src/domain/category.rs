//! Product classification.

use std::fmt;
use std::str::FromStr;

use super::DataValidationError;

/// Closed set of product categories.
///
/// The serialised form of a category is its upper-case member name, both in
/// mappings and in the `products.category` column. Parsing is exact: only a
/// listed name yields a category, anything else is a validation error.
///
/// # Examples
/// ```
/// use product_catalogue::domain::Category;
///
/// let category: Category = "TOOLS".parse().expect("known category");
/// assert_eq!(category, Category::Tools);
/// assert_eq!(category.as_str(), "TOOLS");
/// assert!("tools".parse::<Category>().is_err());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Not yet classified.
    #[default]
    Unknown,
    /// Clothing.
    Cloths,
    /// Food.
    Food,
    /// Housewares.
    Housewares,
    /// Automotive parts and accessories.
    Automotive,
    /// Tools.
    Tools,
    /// Software.
    Software,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Unknown,
        Self::Cloths,
        Self::Food,
        Self::Housewares,
        Self::Automotive,
        Self::Tools,
        Self::Software,
    ];

    /// Member name used for serialisation and storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Cloths => "CLOTHS",
            Self::Food => "FOOD",
            Self::Housewares => "HOUSEWARES",
            Self::Automotive => "AUTOMOTIVE",
            Self::Tools => "TOOLS",
            Self::Software => "SOFTWARE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DataValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| DataValidationError::invalid_value("category", value))
    }
}
