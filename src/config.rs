//! Configuration module for Storefront
//!
//! This module handles loading and validating configuration from environment
//! variables, providing strongly-typed configuration structures for all
//! application components.

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::time::Duration;
use tower_sessions::cookie::Key;

use crate::error::{Error, Result};
use crate::eventhub::EventHubConfig;

/// Secret used when `SESSION_SECRET` is not set
pub const DEFAULT_SESSION_SECRET: &str = "your-secret-key";

/// Main configuration structure for Storefront
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    /// Server configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub server: ServerConfig,

    /// Session cookie configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub session: SessionConfig,

    /// Event Hub configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub event_hub: EventHubConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ServerConfig {
    /// Host to bind to
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[envconfig(from = "PORT", default = "3000")]
    pub port: u16,

    /// Log level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// Environment (development, staging, production)
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,

    /// Request timeout in seconds
    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,

    /// Time allowed for closing the event sink on shutdown, in seconds
    #[envconfig(from = "SHUTDOWN_TIMEOUT_SECS", default = "30")]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct SessionConfig {
    /// Secret the session cookie is signed with
    #[serde(skip_serializing)]
    #[envconfig(from = "SESSION_SECRET", default = "your-secret-key")]
    pub secret: String,

    /// Inactivity period after which a session expires
    #[envconfig(from = "SESSION_MAX_AGE_MINUTES", default = "30")]
    pub max_age_minutes: i64,

    /// Name of the session cookie
    #[envconfig(from = "SESSION_COOKIE_NAME", default = "storefront.sid")]
    pub cookie_name: String,

    /// Only send the cookie over HTTPS
    #[envconfig(from = "SESSION_SECURE_COOKIE", default = "false")]
    pub secure_cookie: bool,

    /// How often expired sessions are evicted, in seconds
    #[envconfig(from = "SESSION_SWEEP_INTERVAL_SECS", default = "60")]
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    /// Inactivity expiry for the session layer
    pub fn max_age(&self) -> time::Duration {
        time::Duration::minutes(self.max_age_minutes)
    }

    /// Cookie signing key derived from the configured secret.
    ///
    /// The secret is stretched to the 64 bytes the signing key requires.
    pub fn signing_key(&self) -> Key {
        let digest = Sha512::digest(self.secret.as_bytes());
        Key::from(&digest[..])
    }

    /// Interval between expired-session sweeps
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Whether the built-in default secret is in use
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SESSION_SECRET
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        // Parse configuration from environment
        Config::init_from_env().map_err(Error::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("Server port cannot be 0"));
        }

        if self.session.secret.is_empty() {
            return Err(Error::config("Session secret cannot be empty"));
        }

        if self.session.max_age_minutes <= 0 {
            return Err(Error::config("Session max age must be at least 1 minute"));
        }

        if self.session.sweep_interval_secs == 0 {
            return Err(Error::config("Session sweep interval cannot be 0"));
        }

        self.event_hub.validate()
    }

    /// Log configuration (with sensitive data masked)
    pub fn log_config(&self) {
        tracing::info!(
            server_address = %self.server.address(),
            environment = %self.server.environment,
            log_level = %self.server.log_level,
            "Server configuration"
        );

        tracing::info!(
            cookie_name = %self.session.cookie_name,
            max_age_minutes = %self.session.max_age_minutes,
            secure_cookie = %self.session.secure_cookie,
            "Session configuration"
        );

        if self.session.uses_default_secret() {
            tracing::warn!("SESSION_SECRET is not set; using the built-in default secret");
        }

        tracing::info!(
            connection = %self.event_hub.masked_connection_string(),
            event_hub = %self.event_hub.name,
            send_timeout_ms = %self.event_hub.send_timeout_ms,
            max_batch_bytes = %self.event_hub.max_batch_bytes,
            "Event Hub configuration"
        );
    }
}
