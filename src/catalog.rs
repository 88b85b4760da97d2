//! In-memory product catalog
//!
//! The catalog is built once at startup and shared read-only through the
//! application state, so handlers never need a lock to read it.

use crate::models::Product;

/// Fixed, ordered table of products
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list, preserving its order
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The demo catalog served by the storefront
    pub fn demo() -> Self {
        Self::new(vec![
            Product::new(
                "P001",
                "Laptop Pro 15",
                "High-performance laptop",
                1299.99,
                "Electronics",
                "https://images.unsplash.com/photo-1758612214882-03f8a1d7211f?auto=format&fit=crop&q=80&w=627",
            ),
            Product::new(
                "P002",
                "Wireless Mouse",
                "Ergonomic wireless mouse",
                29.99,
                "Accessories",
                "https://images.unsplash.com/photo-1660491083562-d91a64d6ea9c?auto=format&fit=crop&q=80&w=627",
            ),
            Product::new(
                "P003",
                "Mechanical Keyboard",
                "RGB mechanical keyboard",
                149.99,
                "Accessories",
                "https://images.unsplash.com/photo-1558050032-160f36233a07?auto=format&fit=crop&q=80&w=627",
            ),
            Product::new(
                "P004",
                "27\" Monitor",
                "4K Ultra HD monitor",
                399.99,
                "Electronics",
                "https://images.unsplash.com/photo-1658044552340-42456e3cc071?auto=format&fit=crop&q=80&w=627",
            ),
            Product::new(
                "P005",
                "USB-C Hub",
                "7-in-1 USB-C hub",
                49.99,
                "Accessories",
                "https://plus.unsplash.com/premium_photo-1761043248662-42f371ad31b4?auto=format&fit=crop&q=80&w=627",
            ),
            Product::new(
                "P006",
                "Webcam HD",
                "1080p HD webcam",
                79.99,
                "Electronics",
                "https://images.unsplash.com/photo-1626581795188-8efb9a00eeec?auto=format&fit=crop&q=80&w=627",
            ),
        ])
    }

    /// Every product, in insertion order
    pub fn all_products(&self) -> &[Product] {
        &self.products
    }

    /// Find a product by id. `None` means the id is unknown.
    pub fn product_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Number of products in the catalog
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::demo()
    }
}
