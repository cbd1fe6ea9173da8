//! # knca-ncalayer
//!
//! WebSocket client for NCALayer, the local agent that holds the user's keys
//! and performs the actual signing.
//!
//! The agent greets every new connection with its version and then answers
//! one request at a time. A signing call blocks until the user picks a key
//! and enters a password, so the response timeout is long.

mod error;
mod protocol;

pub use error::NcaLayerError;

use std::future::Future;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use knca_config::NcaLayerConfig;
use knca_core::{CmsSignRequest, SignOutcome, SigningAgent};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config,
    tungstenite::Message,
};

use crate::protocol::ModuleCall;

type AgentStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A live connection to the NCALayer agent.
pub struct NcaLayerClient {
    stream: AgentStream,
    version: Option<String>,
    sign_timeout: Duration,
}

impl std::fmt::Debug for NcaLayerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NcaLayerClient")
            .field("version", &self.version)
            .field("sign_timeout", &self.sign_timeout)
            .finish_non_exhaustive()
    }
}

impl NcaLayerClient {
    /// Open the WebSocket and wait for the agent's greeting.
    ///
    /// # Errors
    ///
    /// Returns [`NcaLayerError::Connect`] if the agent is not reachable,
    /// [`NcaLayerError::Timeout`] if the handshake or greeting takes longer
    /// than `connect_timeout_secs`, or [`NcaLayerError::Protocol`] if the
    /// greeting is not JSON.
    pub async fn connect(config: &NcaLayerConfig) -> Result<Self, NcaLayerError> {
        let secs = config.connect_timeout_secs;
        let connector = if config.accept_invalid_certs {
            let tls = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()?;
            Some(Connector::NativeTls(tls))
        } else {
            None
        };

        tracing::debug!(url = %config.url, "connecting to NCALayer");
        let handshake = connect_async_tls_with_config(config.url.as_str(), None, false, connector);
        let (mut stream, _) = within(secs, "connecting", handshake)
            .await?
            .map_err(|source| NcaLayerError::Connect {
                url: config.url.clone(),
                source,
            })?;

        let greeting = within(secs, "waiting for the greeting", next_text(&mut stream)).await??;
        let version = protocol::parse_greeting(&greeting)?;
        tracing::info!(version = version.as_deref().unwrap_or("unknown"), "NCALayer connected");

        Ok(Self {
            stream,
            version,
            sign_timeout: Duration::from_secs(config.sign_timeout_secs),
        })
    }

    /// Agent version reported in the greeting.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Ask the agent for a CMS signature via `kz.gov.pki.knca.basics.sign`.
    ///
    /// # Errors
    ///
    /// Returns [`NcaLayerError::Agent`] when the agent reports a failure,
    /// [`NcaLayerError::Timeout`] when no reply arrives within the signing
    /// timeout, and transport or protocol errors otherwise. A closed key
    /// dialog is [`SignOutcome::Canceled`], not an error.
    pub async fn basics_sign_cms(
        &mut self,
        request: &CmsSignRequest,
    ) -> Result<SignOutcome, NcaLayerError> {
        let call = serde_json::to_string(&ModuleCall::basics_sign_cms(request))?;
        tracing::debug!(bytes = request.payload.len(), "sending basics.sign");
        self.stream.send(Message::Text(call.into())).await?;

        let secs = self.sign_timeout.as_secs();
        let reply = within(secs, "signing", next_text(&mut self.stream)).await??;
        let outcome = protocol::parse_sign_reply(&reply)?;
        if outcome == SignOutcome::Canceled {
            tracing::info!("signing dialog closed by user");
        }
        Ok(outcome)
    }

    /// Send a close frame.
    ///
    /// # Errors
    ///
    /// Returns [`NcaLayerError::WebSocket`] if the close frame cannot be sent.
    pub async fn close(mut self) -> Result<(), NcaLayerError> {
        self.stream.close(None).await?;
        Ok(())
    }
}

impl SigningAgent for NcaLayerClient {
    type Error = NcaLayerError;

    async fn sign_cms(&mut self, request: &CmsSignRequest) -> Result<SignOutcome, NcaLayerError> {
        self.basics_sign_cms(request).await
    }
}

async fn within<F: Future>(
    secs: u64,
    stage: &'static str,
    future: F,
) -> Result<F::Output, NcaLayerError> {
    tokio::time::timeout(Duration::from_secs(secs), future)
        .await
        .map_err(|_| NcaLayerError::Timeout { stage, secs })
}

/// Next text frame, skipping control frames.
async fn next_text(stream: &mut AgentStream) -> Result<String, NcaLayerError> {
    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(text) => return Ok(text.as_str().to_owned()),
            Message::Close(_) => return Err(NcaLayerError::Closed),
            Message::Binary(_) => {
                return Err(NcaLayerError::Protocol("unexpected binary frame".into()));
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }
    Err(NcaLayerError::Closed)
}
