//! NCALayer client error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that can occur when talking to the NCALayer agent.
#[derive(Debug, Error)]
pub enum NcaLayerError {
    /// The WebSocket handshake failed.
    #[error("failed to connect to NCALayer at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    /// No message arrived in time.
    #[error("NCALayer did not answer within {secs}s while {stage}")]
    Timeout { stage: &'static str, secs: u64 },

    /// The agent reported a failure (`"status": false`).
    #[error("{message} (code {code})")]
    Agent { code: String, message: String },

    /// A reply did not have the expected shape.
    #[error("unexpected NCALayer reply: {0}")]
    Protocol(String),

    /// The agent closed the connection.
    #[error("NCALayer closed the connection")]
    Closed,

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}
