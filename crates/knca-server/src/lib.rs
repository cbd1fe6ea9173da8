//! # knca-server
//!
//! In-memory reference backend for the signer demo. It stores documents and
//! detached signatures and does not verify anything it is given.
//!
//! Routes:
//! - `GET  /api/documents`: every document in creation order
//! - `POST /api/documents`: `{content}`; blank content is a bare 400
//! - `PUT  /api/documents/{id}/sign`: `{signature}`; 400 with `{error}` when
//!   the signature is blank or the document is unknown or already signed

mod error;
mod store;

pub use error::{ServerError, SignRejection};
pub use store::DocumentStore;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use knca_config::ServerConfig;
use knca_core::{ApiErrorBody, Document, SignAck};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Store shared between request handlers.
pub type SharedStore = Arc<Mutex<DocumentStore>>;

#[derive(Debug, Default, Deserialize)]
struct ContentPayload {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SignaturePayload {
    #[serde(default)]
    signature: Option<String>,
}

/// Build the API router over `store`.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/api/documents", get(list_documents).post(create_document))
        .route("/api/documents/:id/sign", put(sign_document))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Store for a server configuration.
#[must_use]
pub fn store_for(config: &ServerConfig) -> SharedStore {
    let store = if config.seed_samples {
        DocumentStore::with_samples()
    } else {
        DocumentStore::new()
    };
    Arc::new(Mutex::new(store))
}

/// Serve on an already bound listener until the process is stopped.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the server loop fails.
pub async fn serve(listener: TcpListener, store: SharedStore) -> Result<(), ServerError> {
    axum::serve(listener, router(store)).await?;
    Ok(())
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServerError`] if the address is invalid, cannot be bound, or
/// the server loop fails.
pub async fn run(config: &ServerConfig) -> Result<(), ServerError> {
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!(%addr, samples = config.seed_samples, "document backend listening");

    axum::serve(listener, router(store_for(config)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

fn lock(store: &SharedStore) -> MutexGuard<'_, DocumentStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn list_documents(State(store): State<SharedStore>) -> Json<Vec<Document>> {
    Json(lock(&store).list())
}

async fn create_document(
    State(store): State<SharedStore>,
    Json(payload): Json<ContentPayload>,
) -> Result<Json<Document>, StatusCode> {
    let content = payload.content.unwrap_or_default();
    if content.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let document = lock(&store).create(&content);
    tracing::info!(id = %document.id, "document created");
    Ok(Json(document))
}

async fn sign_document(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(payload): Json<SignaturePayload>,
) -> Result<Json<SignAck>, (StatusCode, Json<ApiErrorBody>)> {
    let signature = payload.signature.unwrap_or_default();
    if signature.trim().is_empty() {
        return Err(bad_request("Signature is required"));
    }

    match lock(&store).sign(&id, &signature) {
        Ok(()) => {
            tracing::info!(%id, "document signed");
            Ok(Json(SignAck {
                message: "Document signed successfully".to_string(),
            }))
        }
        Err(rejection) => {
            tracing::warn!(%id, %rejection, "signature rejected");
            Err(bad_request("Document not found or already signed"))
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<ApiErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorBody {
            error: message.to_string(),
        }),
    )
}
