//! User activity events
//!
//! A [`UserEvent`] is built per request, handed to the publisher and dropped.
//! Its JSON form is the record published to the event hub, so the field order
//! and names of the struct define the wire shape:
//!
//! ```text
//! {eventId, eventType, userId, productId, productName, price, timestamp, sessionId}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Product;

/// Product id recorded for the listing page view
pub const LISTING_PRODUCT_ID: &str = "All";

/// Product name recorded for the listing page view
pub const LISTING_PRODUCT_NAME: &str = "Product Listing Page";

/// Kinds of user activity tracked by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Visitor loaded the product listing
    PageView,
    /// Visitor opened a product's details page
    ProductView,
    /// Visitor added a product to the cart
    AddToCart,
    /// Visitor purchased a product
    Purchase,
}

impl EventType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PageView => "PageView",
            EventType::ProductView => "ProductView",
            EventType::AddToCart => "AddToCart",
            EventType::Purchase => "Purchase",
        }
    }

    /// Whether the event refers to a single product
    pub fn is_product_scoped(&self) -> bool {
        !matches!(self, EventType::PageView)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user-activity occurrence, stamped with an id and time at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub user_id: String,
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

impl UserEvent {
    /// Create an event with a fresh id and the current time
    pub fn new(
        event_type: EventType,
        user_id: impl Into<String>,
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        price: f64,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            user_id: user_id.into(),
            product_id: product_id.into(),
            product_name: product_name.into(),
            price,
            timestamp: Utc::now(),
            session_id: session_id.into(),
        }
    }

    /// Page view over the whole listing
    pub fn listing_view(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self::new(
            EventType::PageView,
            user_id,
            LISTING_PRODUCT_ID,
            LISTING_PRODUCT_NAME,
            0.0,
            session_id,
        )
    }

    /// Event about a single product, priced at the moment it happened
    pub fn for_product(
        event_type: EventType,
        product: &Product,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self::new(
            event_type,
            user_id,
            product.id.clone(),
            product.name.clone(),
            product.price,
            session_id,
        )
    }

    /// Serialize to the JSON record sent to the sink
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn laptop() -> Product {
        Product::new(
            "P001",
            "Laptop Pro 15",
            "High-performance laptop",
            1299.99,
            "Electronics",
            "https://example.com/laptop.jpg",
        )
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(EventType::PageView.to_string(), "PageView");
        assert_eq!(EventType::ProductView.to_string(), "ProductView");
        assert_eq!(EventType::AddToCart.to_string(), "AddToCart");
        assert_eq!(EventType::Purchase.to_string(), "Purchase");
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = UserEvent::listing_view("user", "session");
        let b = UserEvent::listing_view("user", "session");
        assert_ne!(a.event_id, b.event_id);
        assert!(!a.event_id.to_string().is_empty());
    }

    #[test]
    fn test_listing_view_fields() {
        let event = UserEvent::listing_view("user-1", "sess-1");
        assert_eq!(event.event_type, EventType::PageView);
        assert_eq!(event.product_id, "All");
        assert_eq!(event.product_name, "Product Listing Page");
        assert_eq!(event.price, 0.0);
        assert!(!event.event_type.is_product_scoped());
    }

    #[test]
    fn test_product_event_copies_product() {
        let event = UserEvent::for_product(EventType::AddToCart, &laptop(), "user-1", "sess-1");
        assert_eq!(event.product_id, "P001");
        assert_eq!(event.product_name, "Laptop Pro 15");
        assert_eq!(event.price, 1299.99);
        assert_eq!(event.session_id, "sess-1");
        assert!(event.event_type.is_product_scoped());
    }

    #[test]
    fn test_payload_shape() {
        let event = UserEvent::for_product(EventType::ProductView, &laptop(), "user-1", "sess-1");
        let payload = event.to_payload().unwrap();
        let text = String::from_utf8(payload.clone()).unwrap();

        let keys = [
            "eventId",
            "eventType",
            "userId",
            "productId",
            "productName",
            "price",
            "timestamp",
            "sessionId",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(&format!("\"{}\"", k)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "fields out of order: {}", text);

        let json: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(json.as_object().unwrap().len(), keys.len());
        assert_eq!(json["eventType"], "ProductView");
        assert_eq!(json["price"], 1299.99);
    }

    #[test]
    fn test_timestamp_is_iso8601_millis() {
        let event = UserEvent::listing_view("user-1", "sess-1");
        let json: Value = serde_json::from_slice(&event.to_payload().unwrap()).unwrap();
        let ts = json["timestamp"].as_str().unwrap();

        assert!(ts.ends_with('Z'));
        // 2025-01-01T12:00:00.000Z
        assert_eq!(ts.len(), 24);
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_deserialize_published_record() {
        let event = UserEvent::listing_view("user-1", "sess-1");
        let parsed: UserEvent = serde_json::from_slice(&event.to_payload().unwrap()).unwrap();
        assert_eq!(parsed.event_id, event.event_id);
        assert_eq!(parsed.timestamp.timestamp_millis(), event.timestamp.timestamp_millis());
    }
}
