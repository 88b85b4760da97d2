//! Event Hubs configuration module

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Port of the Event Hubs Kafka endpoint
const EVENT_HUBS_KAFKA_PORT: u16 = 9093;

/// Event Hubs configuration settings
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct EventHubConfig {
    /// Namespace connection string, or a plain broker list for local Kafka
    #[serde(skip_serializing)]
    #[envconfig(from = "EVENTHUB_CONNECTION_STRING")]
    pub connection_string: String,

    /// Event hub (topic) receiving the events
    #[envconfig(from = "EVENTHUB_NAME")]
    pub name: String,

    /// Delivery timeout for one send, in milliseconds
    #[serde(default = "default_send_timeout_ms")]
    #[envconfig(from = "EVENTHUB_SEND_TIMEOUT_MS", default = "30000")]
    pub send_timeout_ms: u64,

    /// Maximum encoded size of one batch
    #[serde(default = "default_max_batch_bytes")]
    #[envconfig(from = "EVENTHUB_MAX_BATCH_BYTES", default = "1048576")]
    pub max_batch_bytes: usize,
}

/// Where the producer connects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEndpoint {
    /// Event Hubs namespace reached over SASL_SSL
    EventHubs {
        /// Fully qualified namespace host, e.g. `myns.servicebus.windows.net`
        host: String,
        /// Entity path embedded in the connection string, if any
        entity_path: Option<String>,
    },
    /// Plaintext Kafka brokers (comma-separated)
    Brokers(String),
}

impl SinkEndpoint {
    /// Parse a connection string.
    ///
    /// Strings carrying an `Endpoint=` part are Event Hubs connection strings;
    /// anything else is taken as a broker list.
    pub fn parse(connection_string: &str) -> Result<Self> {
        let trimmed = connection_string.trim();
        if trimmed.is_empty() {
            return Err(Error::config("Event Hub connection string cannot be empty"));
        }

        let mut endpoint = None;
        let mut entity_path = None;
        for part in trimmed.split(';').filter(|p| !p.trim().is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.eq_ignore_ascii_case("Endpoint") {
                endpoint = Some(value.trim().to_string());
            } else if key.eq_ignore_ascii_case("EntityPath") {
                entity_path = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            }
        }

        let Some(endpoint) = endpoint else {
            return Ok(SinkEndpoint::Brokers(trimmed.to_string()));
        };

        let host = endpoint
            .strip_prefix("sb://")
            .unwrap_or(&endpoint)
            .trim_end_matches('/')
            .to_string();
        if host.is_empty() {
            return Err(Error::config("Event Hub connection string has an empty Endpoint"));
        }

        Ok(SinkEndpoint::EventHubs { host, entity_path })
    }

    /// Kafka bootstrap servers for this endpoint
    pub fn bootstrap_servers(&self) -> String {
        match self {
            SinkEndpoint::EventHubs { host, .. } => format!("{}:{}", host, EVENT_HUBS_KAFKA_PORT),
            SinkEndpoint::Brokers(brokers) => brokers.clone(),
        }
    }
}

impl EventHubConfig {
    /// Create a new EventHubConfig from environment variables
    pub fn from_env() -> std::result::Result<Self, envconfig::Error> {
        <Self as envconfig::Envconfig>::init_from_env()
    }

    /// Get send timeout as Duration
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Parse the configured connection string
    pub fn endpoint(&self) -> Result<SinkEndpoint> {
        SinkEndpoint::parse(&self.connection_string)
    }

    /// Check the settings needed before the producer can be created
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::config(
                "Event Hub connection string and name must be configured",
            ));
        }
        if self.max_batch_bytes == 0 {
            return Err(Error::config("Event Hub max batch size must be positive"));
        }

        if let SinkEndpoint::EventHubs {
            entity_path: Some(path),
            ..
        } = self.endpoint()?
        {
            if path != self.name {
                return Err(Error::config(format!(
                    "Connection string targets event hub '{}' but EVENTHUB_NAME is '{}'",
                    path, self.name
                )));
            }
        }

        Ok(())
    }

    /// Connection string with the shared access key removed, for logging
    pub fn masked_connection_string(&self) -> String {
        match self.endpoint() {
            Ok(SinkEndpoint::EventHubs { host, .. }) => format!("Endpoint=sb://{}/;***", host),
            Ok(SinkEndpoint::Brokers(brokers)) => brokers,
            Err(_) => "***".to_string(),
        }
    }

    /// Build rdkafka producer configuration
    pub fn build_producer_config(&self) -> Result<rdkafka::ClientConfig> {
        let endpoint = self.endpoint()?;
        let mut config = rdkafka::ClientConfig::new();

        config
            .set("bootstrap.servers", endpoint.bootstrap_servers())
            .set("client.id", "storefront")
            .set("message.timeout.ms", self.send_timeout_ms.to_string())
            .set("message.max.bytes", self.max_batch_bytes.max(1000).to_string())
            // one event per send, no client-side coalescing
            .set("linger.ms", "0")
            .set("acks", "all");

        if let SinkEndpoint::EventHubs { .. } = endpoint {
            config
                .set("security.protocol", "SASL_SSL")
                .set("sasl.mechanism", "PLAIN")
                .set("sasl.username", "$ConnectionString")
                .set("sasl.password", self.connection_string.trim());
        }

        Ok(config)
    }
}

fn default_send_timeout_ms() -> u64 {
    30000
}

fn default_max_batch_bytes() -> usize {
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUB_CONN: &str = "Endpoint=sb://shop-ns.servicebus.windows.net/;\
        SharedAccessKeyName=RootManageSharedAccessKey;SharedAccessKey=abc123def=";

    fn config(connection_string: &str, name: &str) -> EventHubConfig {
        EventHubConfig {
            connection_string: connection_string.to_string(),
            name: name.to_string(),
            send_timeout_ms: default_send_timeout_ms(),
            max_batch_bytes: default_max_batch_bytes(),
        }
    }

    #[test]
    fn test_parse_event_hubs_connection_string() {
        let endpoint = SinkEndpoint::parse(HUB_CONN).unwrap();
        assert_eq!(
            endpoint,
            SinkEndpoint::EventHubs {
                host: "shop-ns.servicebus.windows.net".to_string(),
                entity_path: None,
            }
        );
        assert_eq!(endpoint.bootstrap_servers(), "shop-ns.servicebus.windows.net:9093");
    }

    #[test]
    fn test_parse_entity_path() {
        let conn = format!("{};EntityPath=user-events", HUB_CONN);
        match SinkEndpoint::parse(&conn).unwrap() {
            SinkEndpoint::EventHubs { entity_path, .. } => {
                assert_eq!(entity_path.as_deref(), Some("user-events"));
            },
            other => panic!("unexpected endpoint: {:?}", other),
        }
    }

    #[test]
    fn test_parse_broker_list() {
        let endpoint = SinkEndpoint::parse("localhost:9092").unwrap();
        assert_eq!(endpoint, SinkEndpoint::Brokers("localhost:9092".to_string()));
        assert_eq!(endpoint.bootstrap_servers(), "localhost:9092");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(SinkEndpoint::parse("   ").is_err());
        assert!(SinkEndpoint::parse("Endpoint=sb:///;SharedAccessKey=x").is_err());
    }

    #[test]
    fn test_validate_requires_name() {
        assert!(config(HUB_CONN, "").validate().is_err());
        assert!(config(HUB_CONN, "user-events").validate().is_ok());
    }

    #[test]
    fn test_validate_entity_path_mismatch() {
        let conn = format!("{};EntityPath=other-hub", HUB_CONN);
        assert!(config(&conn, "user-events").validate().is_err());

        let conn = format!("{};EntityPath=user-events", HUB_CONN);
        assert!(config(&conn, "user-events").validate().is_ok());
    }

    #[test]
    fn test_masked_connection_string_hides_key() {
        let masked = config(HUB_CONN, "user-events").masked_connection_string();
        assert!(masked.contains("shop-ns.servicebus.windows.net"));
        assert!(!masked.contains("abc123def"));
    }

    #[test]
    fn test_producer_config_for_event_hubs() {
        let client = config(HUB_CONN, "user-events").build_producer_config().unwrap();
        assert_eq!(
            client.get("bootstrap.servers"),
            Some("shop-ns.servicebus.windows.net:9093")
        );
        assert_eq!(client.get("security.protocol"), Some("SASL_SSL"));
        assert_eq!(client.get("sasl.username"), Some("$ConnectionString"));
        assert_eq!(client.get("linger.ms"), Some("0"));
    }

    #[test]
    fn test_producer_config_for_local_brokers() {
        let client = config("localhost:9092", "user-events").build_producer_config().unwrap();
        assert_eq!(client.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(client.get("security.protocol"), None);
    }

    #[test]
    fn test_send_timeout() {
        assert_eq!(
            config(HUB_CONN, "hub").send_timeout(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_serialized_config_omits_connection_string() {
        let json = serde_json::to_value(config(HUB_CONN, "user-events")).unwrap();
        assert!(json.get("connection_string").is_none());
        assert_eq!(json["name"], "user-events");
        assert!(!json.to_string().contains("SharedAccessKey"));
    }
}
