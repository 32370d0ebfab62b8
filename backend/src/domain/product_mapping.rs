//! Conversion between [`Product`] and its plain key-value representation.
//!
//! The mapping is a JSON object with the keys `id`, `name`, `description`,
//! `price`, `available` and `category`. It is the exchange format for any
//! caller that moves product data across a boundary, so deserialisation is
//! strict: values must carry the right JSON type and pass the same checks as
//! [`Product::validate`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::product::{validate_description, validate_name, validate_price};
use super::{Category, DataValidationError, Product, ProductId};

/// Plain string-keyed representation of a product.
pub type ProductMapping = Map<String, Value>;

/// Parse a decimal price from text.
///
/// Surrounding spaces and double quotes are ignored, so values copied from
/// query strings such as `"10.20"` parse the same as `10.20`. Digit group
/// separators are not accepted.
///
/// # Errors
///
/// Returns [`DataValidationError::InvalidValue`] when the text is not a
/// plain decimal number.
///
/// # Examples
/// ```
/// use product_catalogue::domain::parse_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price(" \"10.20\" "), Ok(Decimal::new(1020, 2)));
/// assert!(parse_price("ten").is_err());
/// assert!(parse_price("1_000").is_err());
/// ```
pub fn parse_price(raw: &str) -> Result<Decimal, DataValidationError> {
    let trimmed = raw.trim_matches(|c: char| c == ' ' || c == '"');
    // `Decimal::from_str` skips underscores.
    if trimmed.contains('_') {
        return Err(DataValidationError::invalid_value("price", raw));
    }
    Decimal::from_str(trimmed).map_err(|_| DataValidationError::invalid_value("price", raw))
}

impl Product {
    /// Render the product as a plain mapping.
    ///
    /// `price` is emitted as a decimal string and `category` as the member
    /// name, so the mapping survives JSON transport without precision loss.
    pub fn serialize(&self) -> ProductMapping {
        let mut mapping = ProductMapping::new();
        mapping.insert(
            "id".to_owned(),
            self.id().map_or(Value::Null, |id| Value::from(id.get())),
        );
        mapping.insert("name".to_owned(), Value::from(self.name.as_str()));
        mapping.insert(
            "description".to_owned(),
            self.description.as_deref().map_or(Value::Null, Value::from),
        );
        mapping.insert("price".to_owned(), Value::from(self.price.to_string()));
        mapping.insert("available".to_owned(), Value::from(self.available));
        mapping.insert("category".to_owned(), Value::from(self.category.as_str()));
        mapping
    }

    /// Overwrite the product's attributes from a plain mapping.
    ///
    /// `id` is adopted as-is when the key is present (`null` clears it) and
    /// left untouched when absent. A missing or `null` `description` clears
    /// it, and a missing or `null` `category` resets it to
    /// [`Category::Unknown`]. The product is only modified when the whole
    /// mapping is valid.
    ///
    /// # Errors
    ///
    /// - [`DataValidationError::MissingField`] when `name`, `price` or
    ///   `available` is absent.
    /// - [`DataValidationError::InvalidType`] when a key holds the wrong JSON
    ///   type, for example a string in `available`.
    /// - [`DataValidationError::InvalidValue`] for an unknown category, an
    ///   empty name or an unparsable price.
    ///
    /// # Examples
    /// ```
    /// use product_catalogue::domain::{Category, DataValidationError, Product};
    /// use rust_decimal::Decimal;
    /// use serde_json::json;
    ///
    /// let mut product = Product::new("Hat", Decimal::ONE, true, Category::Cloths);
    /// let mut mapping = product.serialize();
    /// mapping.insert("available".into(), json!("Invalid value"));
    ///
    /// let err = product.deserialize(&mapping).expect_err("not a boolean");
    /// assert!(matches!(err, DataValidationError::InvalidType { field: "available", .. }));
    /// ```
    pub fn deserialize(
        &mut self,
        data: &ProductMapping,
    ) -> Result<&mut Self, DataValidationError> {
        let id = match data.get("id") {
            Some(value) => Some(read_id(value)?),
            None => None,
        };
        let name = read_name(required(data, "name")?)?;
        let description = read_description(data.get("description"))?;
        let price = read_price(required(data, "price")?)?;
        let available = read_available(required(data, "available")?)?;
        let category = read_category(data.get("category"))?;

        if let Some(id) = id {
            self.set_id(id);
        }
        self.name = name;
        self.description = description;
        self.price = price;
        self.available = available;
        self.category = category;
        Ok(self)
    }
}

fn required<'a>(
    data: &'a ProductMapping,
    field: &'static str,
) -> Result<&'a Value, DataValidationError> {
    let Some(value) = data.get(field) else {
        return Err(DataValidationError::missing_field(field));
    };
    Ok(value)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn read_id(value: &Value) -> Result<Option<ProductId>, DataValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .and_then(|raw| i32::try_from(raw).ok())
            .map(|raw| Some(ProductId::new(raw)))
            .ok_or_else(|| DataValidationError::invalid_value("id", number.to_string())),
        other => Err(DataValidationError::invalid_type("id", "integer", json_type(other))),
    }
}

fn read_name(value: &Value) -> Result<String, DataValidationError> {
    let Value::String(name) = value else {
        return Err(DataValidationError::invalid_type("name", "string", json_type(value)));
    };
    validate_name(name)?;
    Ok(name.clone())
}

fn read_description(value: Option<&Value>) -> Result<Option<String>, DataValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(description)) => {
            validate_description(description)?;
            Ok(Some(description.clone()))
        }
        Some(other) => Err(DataValidationError::invalid_type(
            "description",
            "string",
            json_type(other),
        )),
    }
}

fn read_price(value: &Value) -> Result<Decimal, DataValidationError> {
    let price = match value {
        Value::String(raw) => parse_price(raw)?,
        // Parse the number's textual form so no f64 rounding leaks in.
        Value::Number(number) => {
            let text = number.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| DataValidationError::invalid_value("price", text))?
        }
        other => {
            return Err(DataValidationError::invalid_type(
                "price",
                "decimal",
                json_type(other),
            ));
        }
    };
    validate_price(price)?;
    Ok(price)
}

fn read_available(value: &Value) -> Result<bool, DataValidationError> {
    value
        .as_bool()
        .ok_or_else(|| DataValidationError::invalid_type("available", "boolean", json_type(value)))
}

fn read_category(value: Option<&Value>) -> Result<Category, DataValidationError> {
    match value {
        None | Some(Value::Null) => Ok(Category::Unknown),
        Some(Value::String(name)) => name.parse(),
        Some(other) => Err(DataValidationError::invalid_type(
            "category",
            "string",
            json_type(other),
        )),
    }
}
