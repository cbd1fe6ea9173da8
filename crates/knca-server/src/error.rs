//! Server error types.

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] knca_config::ConfigError),
}

/// Why a signature was not stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignRejection {
    #[error("document {0} not found")]
    NotFound(String),

    #[error("document {0} is already signed")]
    AlreadySigned(String),
}
