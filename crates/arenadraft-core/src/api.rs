// Session service abstraction: the calls the controller makes, independent
// of transport.

use async_trait::async_trait;
use thiserror::Error;

use crate::card::CardCounts;
use crate::catalog::{Catalog, CatalogError};
use crate::protocol::{ReplyError, SessionOptions, SessionSnapshot};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with `{"error": "..."}`.
    #[error("{0}")]
    Server(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid server url {0}")]
    InvalidUrl(String),

    #[error("card catalog: {0}")]
    Catalog(#[from] CatalogError),
}

impl From<ReplyError> for ApiError {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::Server(msg) => ApiError::Server(msg),
            ReplyError::Decode(e) => ApiError::Decode(e),
        }
    }
}

/// Calls against the session service. Each call is a single attempt.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Create a session seeded with `collection`; returns the new session id.
    async fn create_session(
        &self,
        collection: &CardCounts,
        options: &SessionOptions,
    ) -> Result<String, ApiError>;

    async fn get_session(&self, session: &str) -> Result<SessionSnapshot, ApiError>;

    /// Register a player; returns the new player id.
    async fn register_player(
        &self,
        session: &str,
        name: &str,
        collection: &CardCounts,
    ) -> Result<String, ApiError>;

    async fn set_ready(
        &self,
        session: &str,
        player: &str,
        ready: bool,
    ) -> Result<SessionSnapshot, ApiError>;

    /// The pool assigned to `player` once the session started.
    async fn fetch_card_pool(&self, session: &str, player: &str) -> Result<CardCounts, ApiError>;

    async fn fetch_catalog(&self) -> Result<Catalog, ApiError>;
}
