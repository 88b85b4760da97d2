//! Per-visitor session context
//!
//! Wraps the cookie-keyed session store with the two pieces of state the
//! storefront keeps per visitor: a lazily created user id, and a one-shot
//! flash message carried across a redirect.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{Error, Result};

const USER_ID_KEY: &str = "userId";
const FLASH_KEY: &str = "message";

/// Session context extracted for each storefront request
#[derive(Debug, Clone)]
pub struct VisitorSession {
    session: Session,
}

impl VisitorSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// The visitor's user id, generated and stored on first use
    pub async fn user_id(&self) -> Result<String> {
        if let Some(user_id) = self.session.get::<String>(USER_ID_KEY).await? {
            return Ok(user_id);
        }

        let user_id = Uuid::new_v4().to_string();
        self.session.insert(USER_ID_KEY, &user_id).await?;
        tracing::debug!(user_id = %user_id, "Assigned new visitor id");
        Ok(user_id)
    }

    /// Identifier of the session itself.
    ///
    /// A brand new session has no id until it is stored, so it is saved here
    /// first.
    pub async fn session_id(&self) -> Result<String> {
        if self.session.id().is_none() {
            self.session.save().await?;
        }

        self.session
            .id()
            .map(|id| id.to_string())
            .ok_or_else(|| Error::Session("session has no id after save".to_string()))
    }

    /// Read and clear the flash message
    pub async fn take_flash(&self) -> Result<Option<String>> {
        Ok(self.session.remove::<String>(FLASH_KEY).await?)
    }

    /// Set the message shown on the next rendered page
    pub async fn set_flash(&self, message: impl Into<String>) -> Result<()> {
        self.session.insert(FLASH_KEY, message.into()).await?;
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for VisitorSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}
