//! Continuation context for paginated connection searches.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use super::config::NetworkId;
use super::query::ConnectionsQuery;
use crate::domain::ConfigurationError;

/// Backend position within a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Cursor {
    pub ident: String,
    pub seqnr: String,
}

/// Opaque state for requesting earlier or later connections.
///
/// Returned by a connection search and handed back verbatim to
/// [`Provider::query_more_connections`](super::Provider::query_more_connections).
/// Each call returns a fresh context; a context is never updated in place.
///
/// [`to_token`](Self::to_token) and [`from_token`](Self::from_token) give a
/// string form for callers that need to store it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsContext {
    network: NetworkId,
    query: ConnectionsQuery,
    cursor: Cursor,
}

impl ConnectionsContext {
    pub(crate) fn new(network: NetworkId, query: ConnectionsQuery, cursor: Cursor) -> Self {
        Self {
            network,
            query,
            cursor,
        }
    }

    pub(crate) fn network(&self) -> NetworkId {
        self.network
    }

    pub(crate) fn query(&self) -> &ConnectionsQuery {
        &self.query
    }

    pub(crate) fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Encode as a URL-safe string.
    pub fn to_token(&self) -> Result<String, ConfigurationError> {
        let json =
            serde_json::to_vec(self).map_err(|e| ConfigurationError::InvalidToken(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a string produced by [`to_token`](Self::to_token).
    pub fn from_token(token: &str) -> Result<Self, ConfigurationError> {
        let json = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| ConfigurationError::InvalidToken(e.to_string()))?;
        serde_json::from_slice(&json).map_err(|e| ConfigurationError::InvalidToken(e.to_string()))
    }
}
