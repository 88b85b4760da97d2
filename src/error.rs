//! Error handling module for Storefront
//!
//! This module defines the error types used throughout the application,
//! providing a unified error handling strategy and HTTP response mapping.
//! Response bodies are plain text and never carry internal detail; the
//! detail goes to the logs instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::eventhub::SinkError;

/// Result type alias for Storefront operations
pub type Result<T> = std::result::Result<T, Error>;

/// Body sent for any error that has no page-specific message
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// Main error type for Storefront
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event publishing failures
    #[error("Event sink error: {0}")]
    Sink(#[from] SinkError),

    /// Session store failures
    #[error("Session error: {0}")]
    Session(String),

    /// Unknown product or route
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// An error raised while serving a page, with the message shown to the visitor
    #[error("{message}: {source}")]
    Page {
        message: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Error::NotFound(what.into())
    }

    /// Attach the visitor-facing message for the page being served.
    ///
    /// Not-found errors pass through untouched so they keep their own body.
    pub fn page(self, message: &'static str) -> Self {
        match self {
            Error::NotFound(_) | Error::Page { .. } => self,
            other => Error::Page {
                message,
                source: Box::new(other),
            },
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Page { source, .. } => source.status_code(),
            Error::Config(_)
            | Error::Sink(_)
            | Error::Session(_)
            | Error::Io(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent back to the visitor
    pub fn public_message(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "Product not found",
            Error::Page { message, .. } => *message,
            _ => GENERIC_ERROR_MESSAGE,
        }
    }
}

/// Implement IntoResponse for automatic error responses in Axum
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %self, error_type = error_type(&self), "Request failed");
            },
            _ => {
                tracing::warn!(error = %self, error_type = error_type(&self), "Client error");
            },
        }

        (status, self.public_message()).into_response()
    }
}

/// Get a string representation of the error type
fn error_type(error: &Error) -> &'static str {
    match error {
        Error::Config(_) => "configuration_error",
        Error::Sink(_) => "sink_error",
        Error::Session(_) => "session_error",
        Error::NotFound(_) => "not_found",
        Error::Io(_) => "io_error",
        Error::Internal(_) => "internal_error",
        Error::Page { source, .. } => error_type(source),
    }
}

/// Convert from anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

/// Convert from envconfig::Error to our Error type
impl From<envconfig::Error> for Error {
    fn from(err: envconfig::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        Error::Session(err.to_string())
    }
}
