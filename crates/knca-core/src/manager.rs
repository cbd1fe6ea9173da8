//! The document controller.
//!
//! [`DocumentManager`] owns the document list shown to the user and runs one
//! sequential call chain per action: backend call or agent call, then a list
//! refresh. Failures never escape as errors. They are written to the
//! activity log, shown as notifications, and reported through
//! [`ActionOutcome`].

use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::document::Document;
use crate::notify::{ActivityLog, Notification, NotificationCenter, DEFAULT_NOTIFICATION_TTL};
use crate::ports::{DocumentBackend, SigningAgent};
use crate::render::{self, CardTemplate, DEFAULT_PREVIEW_LENGTH, RenderOptions};
use crate::signing::{CaChain, CmsSignRequest, EMAIL_PROTECTION_OID, SignOutcome, SignerParams};

pub const MSG_AGENT_UNAVAILABLE: &str =
    "Could not connect to NCALayer. Make sure NCALayer is installed and running.";
pub const MSG_LOAD_FAILED: &str = "Failed to load documents";
pub const MSG_EMPTY_CONTENT: &str = "Enter the document content";
pub const MSG_CREATE_FAILED: &str = "Failed to create document";
pub const MSG_CREATED: &str = "Document created successfully!";
pub const MSG_AGENT_NOT_CONNECTED: &str = "NCALayer is not connected";
pub const MSG_DOCUMENT_NOT_FOUND: &str = "Document not found";
pub const MSG_SIGNED: &str = "Document signed successfully!";
pub const MSG_SIGN_CANCELED: &str = "Signing canceled by user";
pub const MSG_CA_READ_FAILED: &str = "Failed to read the CA certificate file";
pub const LOG_READY: &str = "Application ready";

/// Result of a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<T = ()> {
    Completed(T),
    /// The user backed out (closed the key dialog, picked no file).
    Canceled,
    /// The action failed; carries the message shown to the user.
    Failed(String),
}

impl<T> ActionOutcome<T> {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Tunables for the controller.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    pub ext_key_usage_oids: Vec<String>,
    pub locale: String,
    pub preview_length: usize,
    pub notification_ttl: Duration,
    pub template: CardTemplate,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            ext_key_usage_oids: vec![EMAIL_PROTECTION_OID.to_string()],
            locale: "ru".to_string(),
            preview_length: DEFAULT_PREVIEW_LENGTH,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            template: CardTemplate::default(),
        }
    }
}

pub struct DocumentManager<B, A> {
    backend: B,
    agent: Option<A>,
    settings: ManagerSettings,
    documents: Vec<Document>,
    ca_chain: Option<CaChain>,
    expanded: HashSet<String>,
    notifications: NotificationCenter,
    log: ActivityLog,
}

impl<B, A> DocumentManager<B, A>
where
    B: DocumentBackend,
    A: SigningAgent,
{
    #[must_use]
    pub fn new(backend: B, settings: ManagerSettings) -> Self {
        let mut log = ActivityLog::default();
        log.record("Starting...");
        Self {
            backend,
            agent: None,
            notifications: NotificationCenter::new(settings.notification_ttl),
            settings,
            documents: Vec::new(),
            ca_chain: None,
            expanded: HashSet::new(),
            log,
        }
    }

    /// Startup sequence: load the list, connect the agent, then log that the
    /// application is ready. A failure in either step is reported as usual
    /// and does not stop the other. Returns the load outcome; check
    /// [`Self::is_agent_connected`] for the agent.
    pub async fn init<F, E>(&mut self, connect: F) -> ActionOutcome<usize>
    where
        F: Future<Output = Result<A, E>>,
        E: Display,
    {
        let loaded = self.load_documents().await;
        self.connect_agent(connect).await;
        self.log.record(LOG_READY);
        loaded
    }

    /// Await `connect` and keep the agent if it succeeds.
    pub async fn connect_agent<F, E>(&mut self, connect: F) -> ActionOutcome
    where
        F: Future<Output = Result<A, E>>,
        E: Display,
    {
        self.log.record("Connecting to NCALayer...");
        match connect.await {
            Ok(agent) => {
                self.agent = Some(agent);
                self.log.record("NCALayer connected");
                ActionOutcome::Completed(())
            }
            Err(error) => {
                tracing::error!(%error, "failed to connect to NCALayer");
                self.log
                    .record(format!("NCALayer connection error: {error}"));
                self.fail(MSG_AGENT_UNAVAILABLE)
            }
        }
    }

    /// Use an already connected agent.
    pub fn attach_agent(&mut self, agent: A) {
        self.agent = Some(agent);
    }

    #[must_use]
    pub const fn is_agent_connected(&self) -> bool {
        self.agent.is_some()
    }

    /// Hand back the agent so the caller can shut it down.
    pub fn disconnect_agent(&mut self) -> Option<A> {
        self.agent.take()
    }

    /// Replace the document list with the backend's. On failure the previous
    /// list is kept.
    pub async fn load_documents(&mut self) -> ActionOutcome<usize> {
        self.log.record("Loading the document list from the server...");
        match self.backend.list_documents().await {
            Ok(documents) => {
                self.documents = documents;
                self.expanded
                    .retain(|id| self.documents.iter().any(|d| &d.id == id));
                self.log
                    .record(format!("Loaded {} documents", self.documents.len()));
                ActionOutcome::Completed(self.documents.len())
            }
            Err(error) => {
                tracing::error!(%error, "failed to load documents");
                self.log.record(format!("Failed to load documents: {error}"));
                self.fail(MSG_LOAD_FAILED)
            }
        }
    }

    /// Create a document from user input. Blank input is rejected without a
    /// request.
    pub async fn create_document(&mut self, raw: &str) -> ActionOutcome<Document> {
        let content = raw.trim();
        if content.is_empty() {
            return self.fail(MSG_EMPTY_CONTENT);
        }

        self.log.record("Sending the new document to the server...");
        match self.backend.create_document(content).await {
            Ok(document) => {
                self.log
                    .record(format!("Document created. ID: {}", document.id));
                self.notifications.success(MSG_CREATED);
                self.load_documents().await;
                ActionOutcome::Completed(document)
            }
            Err(error) => {
                tracing::error!(%error, "failed to create document");
                self.log
                    .record(format!("Failed to create document: {error}"));
                self.fail(MSG_CREATE_FAILED)
            }
        }
    }

    /// Sign a listed document through the agent and store the signature.
    ///
    /// Returns the signature on success.
    pub async fn sign_document(&mut self, id: &str) -> ActionOutcome<String> {
        if self.agent.is_none() {
            return self.fail(MSG_AGENT_NOT_CONNECTED);
        }
        let Some(document) = self.document(id).cloned() else {
            return self.fail(MSG_DOCUMENT_NOT_FOUND);
        };

        self.log.record(format!("Signing document {id}..."));
        let request = self.build_sign_request(&document);
        self.log
            .record(format!("Document {id} converted to base64"));

        let Some(agent) = self.agent.as_mut() else {
            return ActionOutcome::Failed(MSG_AGENT_NOT_CONNECTED.to_string());
        };
        let signature = match agent.sign_cms(&request).await {
            Ok(SignOutcome::Signed(signature)) => signature,
            Ok(SignOutcome::Canceled) => {
                self.log
                    .record(format!("Signing of document {id} canceled by user"));
                self.notifications.error(MSG_SIGN_CANCELED);
                return ActionOutcome::Canceled;
            }
            Err(error) => return self.sign_failed(id, &error),
        };
        self.log
            .record(format!("Signature received from NCALayer for document {id}"));

        if let Err(error) = self.backend.sign_document(id, &signature).await {
            return self.sign_failed(id, &error);
        }

        self.log
            .record(format!("Signature for document {id} saved on the server"));
        self.notifications.success(MSG_SIGNED);
        self.load_documents().await;
        ActionOutcome::Completed(signature)
    }

    /// Load CA certificates from a file. `None` means no file was picked.
    pub fn load_ca_pem(&mut self, path: Option<&Path>) -> ActionOutcome {
        let Some(path) = path else {
            return ActionOutcome::Canceled;
        };
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.log.record(format!("CA file selected: {name}"));

        match std::fs::read_to_string(path) {
            Ok(text) => {
                self.set_ca_pem(name, text);
                ActionOutcome::Completed(())
            }
            Err(error) => {
                tracing::error!(%error, path = %path.display(), "failed to read CA file");
                self.log.record("Error while reading the CA file");
                self.fail(MSG_CA_READ_FAILED)
            }
        }
    }

    /// Use CA certificates already in memory.
    pub fn set_ca_pem(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let chain = CaChain::new(name, text);
        self.notifications.success(format!(
            "CA PEM file \"{}\" loaded successfully!",
            chain.source()
        ));
        self.log.record("CA PEM file processed and ready to use");
        self.ca_chain = Some(chain);
    }

    #[must_use]
    pub const fn ca_chain(&self) -> Option<&CaChain> {
        self.ca_chain.as_ref()
    }

    /// Flip a document between preview and full view. Returns the new
    /// expanded state, or `None` for an unknown id.
    pub fn toggle_content(&mut self, id: &str) -> Option<bool> {
        self.document(id)?;
        if self.expanded.remove(id) {
            Some(false)
        } else {
            self.expanded.insert(id.to_string());
            Some(true)
        }
    }

    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// HTML for the current document list.
    #[must_use]
    pub fn render_documents(&self) -> String {
        render::render_list(&self.documents, &self.render_options())
    }

    /// A standalone HTML page with live notifications and the activity log.
    pub fn render_page(&mut self) -> String {
        let options = RenderOptions {
            template: &self.settings.template,
            preview_length: self.settings.preview_length,
            expanded: &self.expanded,
        };
        let notifications = self.notifications.active(Utc::now());
        render::render_page(&self.documents, &options, notifications, self.log.entries())
    }

    #[must_use]
    pub const fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.all()
    }

    /// Notifications still within their TTL at `now`; expired ones are dropped.
    pub fn active_notifications(&mut self, now: DateTime<Utc>) -> &[Notification] {
        self.notifications.active(now)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    #[must_use]
    pub const fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    fn render_options(&self) -> RenderOptions<'_> {
        RenderOptions {
            template: &self.settings.template,
            preview_length: self.settings.preview_length,
            expanded: &self.expanded,
        }
    }

    fn build_sign_request(&mut self, document: &Document) -> CmsSignRequest {
        let signer = SignerParams::new(
            self.settings.ext_key_usage_oids.clone(),
            self.ca_chain.as_ref(),
        );
        match &signer.chain {
            Some(chain) => self.log.record(format!(
                "Using a CA chain of {} certificates for document {}",
                chain.len(),
                document.id
            )),
            None => self.log.record(format!(
                "No CA chain loaded, signing document {} without CA",
                document.id
            )),
        }
        CmsSignRequest::detached(&document.content, signer, self.settings.locale.clone())
    }

    fn sign_failed<T>(&mut self, id: &str, error: &dyn std::error::Error) -> ActionOutcome<T> {
        tracing::error!(%error, document = id, "signing failed");
        self.log
            .record(format!("Error signing document {id}: {error}"));
        self.fail(format!("Signing error: {error}"))
    }

    fn fail<T>(&mut self, message: impl Into<String>) -> ActionOutcome<T> {
        let message = message.into();
        self.notifications.error(message.clone());
        ActionOutcome::Failed(message)
    }
}
