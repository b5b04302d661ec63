//! Client error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server's envelope message, or the
    /// raw body when it was not an envelope.
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A multi-request operation stopped part way.
    #[error("Stopped after deleting {deleted} notes: {source}")]
    Partial {
        deleted: usize,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Partial { source, .. } => source.status(),
            ClientError::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
