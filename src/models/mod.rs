//! Data models for Storefront
//!
//! Catalog products and the user-activity events published for them.

pub mod event;
pub mod product;

// Re-export commonly used types
pub use event::{EventType, UserEvent};
pub use product::Product;
