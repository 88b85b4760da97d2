//! Product model

use serde::{Deserialize, Serialize};

/// A catalog entry. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier (e.g. "P001")
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Unit price, never negative
    pub price: f64,
    /// Category label used for grouping
    pub category: String,
    /// Image shown on the listing and details pages
    pub image_url: String,
}

impl Product {
    /// Create a new product
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            image_url: image_url.into(),
        }
    }

    /// Price formatted for display, e.g. "$1299.99"
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_price() {
        let product = Product::new("P1", "Thing", "A thing", 29.9, "Misc", "img");
        assert_eq!(product.display_price(), "$29.90");
    }

    #[test]
    fn test_json_field_names() {
        let product = Product::new("P1", "Thing", "A thing", 1.5, "Misc", "img");
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains("\"imageUrl\":\"img\""));
        assert!(json.contains("\"price\":1.5"));
    }
}
