//! # knca-core
//!
//! Core types and the document controller for the KNCA signer demo.
//!
//! This crate has no transport of its own. It provides:
//! - The document record exchanged with the backend and its request bodies
//! - [`DocumentManager`], which drives list/create/sign flows and turns
//!   failures into user-facing notifications
//! - Card templating for the HTML document list
//! - Signing payload and signer parameter construction for NCALayer
//! - Port traits ([`DocumentBackend`], [`SigningAgent`]) implemented by the
//!   `knca-client` and `knca-ncalayer` crates

pub mod document;
pub mod errors;
pub mod manager;
pub mod notify;
pub mod ports;
pub mod render;
pub mod signing;

pub use document::{ApiErrorBody, CreateDocumentRequest, Document, SignAck, SignDocumentRequest};
pub use errors::CoreError;
pub use manager::{ActionOutcome, DocumentManager, ManagerSettings};
pub use notify::{ActivityLog, LogEntry, Notification, NotificationCenter, NotificationLevel};
pub use ports::{DocumentBackend, SigningAgent};
pub use render::CardTemplate;
pub use signing::{CaChain, CmsParams, CmsSignRequest, SignOutcome, SignerParams, StorageSelector};
