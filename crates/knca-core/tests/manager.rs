use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use thiserror::Error;

use knca_core::manager::{
    LOG_READY, MSG_AGENT_NOT_CONNECTED, MSG_AGENT_UNAVAILABLE, MSG_CA_READ_FAILED, MSG_CREATED,
    MSG_DOCUMENT_NOT_FOUND, MSG_EMPTY_CONTENT, MSG_LOAD_FAILED, MSG_SIGN_CANCELED, MSG_SIGNED,
};
use knca_core::{
    ActionOutcome, CmsSignRequest, Document, DocumentBackend, DocumentManager, ManagerSettings,
    NotificationLevel, SignAck, SignOutcome, SigningAgent, StorageSelector,
};

#[derive(Debug, Error)]
#[error("{0}")]
struct FakeError(String);

#[derive(Default)]
struct BackendState {
    documents: Vec<Document>,
    fail_list: bool,
    fail_create: bool,
    reject_sign: Option<String>,
    created: Vec<String>,
    signatures: Vec<(String, String)>,
    list_calls: usize,
}

#[derive(Clone, Default)]
struct FakeBackend(Arc<Mutex<BackendState>>);

impl FakeBackend {
    fn with_documents(documents: Vec<Document>) -> Self {
        let backend = Self::default();
        backend.0.lock().unwrap().documents = documents;
        backend
    }

    fn state(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.0.lock().unwrap()
    }
}

impl DocumentBackend for FakeBackend {
    type Error = FakeError;

    async fn list_documents(&self) -> Result<Vec<Document>, FakeError> {
        let mut state = self.state();
        state.list_calls += 1;
        if state.fail_list {
            return Err(FakeError("connection refused".into()));
        }
        Ok(state.documents.clone())
    }

    async fn create_document(&self, content: &str) -> Result<Document, FakeError> {
        let mut state = self.state();
        if state.fail_create {
            return Err(FakeError("API error (500): boom".into()));
        }
        let doc = Document::new(format!("doc-{}", state.documents.len() + 1), content);
        state.created.push(content.to_string());
        state.documents.push(doc.clone());
        Ok(doc)
    }

    async fn sign_document(&self, id: &str, signature: &str) -> Result<SignAck, FakeError> {
        let mut state = self.state();
        if let Some(message) = state.reject_sign.clone() {
            return Err(FakeError(message));
        }
        state.signatures.push((id.to_string(), signature.to_string()));
        if let Some(doc) = state.documents.iter_mut().find(|d| d.id == id) {
            doc.signed = true;
            doc.signature = Some(signature.to_string());
        }
        Ok(SignAck {
            message: "Document signed successfully".into(),
        })
    }
}

enum AgentBehavior {
    Sign(&'static str),
    Cancel,
    Fail(&'static str),
}

struct FakeAgent {
    behavior: AgentBehavior,
    requests: Arc<Mutex<Vec<CmsSignRequest>>>,
}

impl FakeAgent {
    fn new(behavior: AgentBehavior) -> (Self, Arc<Mutex<Vec<CmsSignRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                behavior,
                requests: Arc::clone(&requests),
            },
            requests,
        )
    }
}

impl SigningAgent for FakeAgent {
    type Error = FakeError;

    async fn sign_cms(&mut self, request: &CmsSignRequest) -> Result<SignOutcome, FakeError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.behavior {
            AgentBehavior::Sign(signature) => Ok(SignOutcome::Signed(signature.to_string())),
            AgentBehavior::Cancel => Ok(SignOutcome::Canceled),
            AgentBehavior::Fail(message) => Err(FakeError(message.to_string())),
        }
    }
}

fn sample_documents() -> Vec<Document> {
    vec![
        Document::new("doc-1", "<document><title>One</title></document>"),
        Document::new("doc-2", "Привет"),
    ]
}

fn manager(backend: FakeBackend) -> DocumentManager<FakeBackend, FakeAgent> {
    DocumentManager::new(backend, ManagerSettings::default())
}

fn last_error(m: &DocumentManager<FakeBackend, FakeAgent>) -> Option<String> {
    m.notifications()
        .iter()
        .rev()
        .find(|n| n.level == NotificationLevel::Error)
        .map(|n| n.message.clone())
}

#[tokio::test]
async fn load_documents_replaces_list_and_renders_cards() {
    let mut m = manager(FakeBackend::with_documents(sample_documents()));

    assert_eq!(m.load_documents().await, ActionOutcome::Completed(2));
    assert_eq!(m.documents().len(), 2);
    assert!(m.log().contains("Loaded 2 documents"));

    let html = m.render_documents();
    assert_eq!(html.matches("status-unsigned").count(), 2);
    assert!(m.notifications().is_empty());
}

#[tokio::test]
async fn failed_fetch_shows_error_and_keeps_previous_list() {
    let backend = FakeBackend::with_documents(sample_documents());
    let mut m = manager(backend.clone());
    m.load_documents().await;

    backend.state().fail_list = true;
    let outcome = m.load_documents().await;

    assert_eq!(outcome, ActionOutcome::Failed(MSG_LOAD_FAILED.to_string()));
    assert_eq!(last_error(&m).as_deref(), Some(MSG_LOAD_FAILED));
    assert_eq!(m.documents().len(), 2);
    assert!(m.log().contains("connection refused"));
}

#[tokio::test]
async fn empty_backend_renders_no_documents_marker() {
    let mut m = manager(FakeBackend::default());
    m.load_documents().await;
    assert!(m.render_documents().contains("No documents"));
}

#[tokio::test]
async fn blank_content_is_rejected_without_a_request() {
    let backend = FakeBackend::default();
    let mut m = manager(backend.clone());

    let outcome = m.create_document("   \n\t ").await;

    assert_eq!(outcome, ActionOutcome::Failed(MSG_EMPTY_CONTENT.to_string()));
    assert!(backend.state().created.is_empty());
    assert_eq!(backend.state().list_calls, 0);
}

#[tokio::test]
async fn create_trims_content_and_reloads() {
    let backend = FakeBackend::default();
    let mut m = manager(backend.clone());

    let outcome = m.create_document("  <note/>  ").await;

    let ActionOutcome::Completed(doc) = outcome else {
        panic!("expected a created document, got {outcome:?}");
    };
    assert_eq!(doc.content, "<note/>");
    assert_eq!(backend.state().created, vec!["<note/>".to_string()]);
    assert_eq!(backend.state().list_calls, 1);
    assert_eq!(m.documents().len(), 1);
    assert_eq!(
        m.notifications().last().map(|n| n.message.as_str()),
        Some(MSG_CREATED)
    );
    assert!(m.log().contains("Document created. ID: doc-1"));
}

#[tokio::test]
async fn create_failure_is_reported() {
    let backend = FakeBackend::default();
    backend.state().fail_create = true;
    let mut m = manager(backend);

    let outcome = m.create_document("text").await;
    assert_eq!(outcome.failure(), Some("Failed to create document"));
}

#[tokio::test]
async fn signing_without_agent_is_rejected() {
    let mut m = manager(FakeBackend::with_documents(sample_documents()));
    m.load_documents().await;

    let outcome = m.sign_document("doc-1").await;
    assert_eq!(outcome, ActionOutcome::Failed(MSG_AGENT_NOT_CONNECTED.to_string()));
}

#[tokio::test]
async fn failed_agent_connection_leaves_agent_unset() {
    let mut m = manager(FakeBackend::default());
    let outcome = m
        .connect_agent(async { Err::<FakeAgent, _>(FakeError("refused".into())) })
        .await;

    assert_eq!(outcome, ActionOutcome::Failed(MSG_AGENT_UNAVAILABLE.to_string()));
    assert!(!m.is_agent_connected());
    assert!(m.log().contains("NCALayer connection error: refused"));
}

#[tokio::test]
async fn init_loads_connects_then_reports_ready() {
    let mut m = manager(FakeBackend::with_documents(sample_documents()));
    let (agent, _requests) = FakeAgent::new(AgentBehavior::Cancel);

    let loaded = m.init(async { Ok::<_, FakeError>(agent) }).await;
    assert_eq!(loaded, ActionOutcome::Completed(2));
    assert!(m.is_agent_connected());

    let messages: Vec<&str> = m.log().entries().iter().map(|e| e.message.as_str()).collect();
    let load = messages.iter().position(|line| *line == "Loaded 2 documents").unwrap();
    let connect = messages.iter().position(|line| *line == "NCALayer connected").unwrap();
    assert!(load < connect);
    assert_eq!(messages.last().copied(), Some(LOG_READY));
}

#[tokio::test]
async fn init_reports_both_failures_and_still_finishes() {
    let backend = FakeBackend::default();
    backend.state().fail_list = true;
    let mut m = manager(backend);

    let loaded = m
        .init(async { Err::<FakeAgent, _>(FakeError("refused".into())) })
        .await;
    assert_eq!(loaded, ActionOutcome::Failed(MSG_LOAD_FAILED.to_string()));
    assert!(!m.is_agent_connected());

    let errors: Vec<&str> = m.notifications().iter().map(|n| n.message.as_str()).collect();
    assert_eq!(errors, vec![MSG_LOAD_FAILED, MSG_AGENT_UNAVAILABLE]);
    assert!(m.log().contains(LOG_READY));
}

#[tokio::test]
async fn disconnect_hands_back_the_agent() {
    let mut m = manager(FakeBackend::with_documents(sample_documents()));
    let (agent, _requests) = FakeAgent::new(AgentBehavior::Sign("MIIsig"));
    m.attach_agent(agent);
    m.load_documents().await;

    assert!(m.disconnect_agent().is_some());
    assert!(!m.is_agent_connected());
    assert!(m.disconnect_agent().is_none());
    assert_eq!(
        m.sign_document("doc-1").await,
        ActionOutcome::Failed(MSG_AGENT_NOT_CONNECTED.to_string())
    );
}

#[tokio::test]
async fn signing_unknown_document_is_rejected() {
    let mut m = manager(FakeBackend::with_documents(sample_documents()));
    let (agent, requests) = FakeAgent::new(AgentBehavior::Sign("MIIsig"));
    m.connect_agent(async { Ok::<_, FakeError>(agent) }).await;
    m.load_documents().await;

    let outcome = m.sign_document("doc-404").await;
    assert_eq!(outcome, ActionOutcome::Failed(MSG_DOCUMENT_NOT_FOUND.to_string()));
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn successful_signing_submits_signature_and_reloads() {
    let backend = FakeBackend::with_documents(sample_documents());
    let mut m = manager(backend.clone());
    let (agent, requests) = FakeAgent::new(AgentBehavior::Sign("MIIsig"));
    m.attach_agent(agent);
    m.load_documents().await;

    let outcome = m.sign_document("doc-2").await;

    assert_eq!(outcome, ActionOutcome::Completed("MIIsig".to_string()));
    assert_eq!(
        backend.state().signatures,
        vec![("doc-2".to_string(), "MIIsig".to_string())]
    );
    assert!(m.document("doc-2").is_some_and(|d| d.signed));
    assert!(m.render_documents().contains("✓ Signed"));
    assert_eq!(
        m.notifications().last().map(|n| n.message.as_str()),
        Some(MSG_SIGNED)
    );

    let requests = requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.payload, "0J/RgNC40LLQtdGC");
    assert_eq!(request.storages, StorageSelector::All);
    assert!(request.params.decode);
    assert!(!request.params.encapsulate);
    assert_eq!(request.signer.ext_key_usage_oids, vec!["1.3.6.1.5.5.7.3.4"]);
    assert!(request.signer.chain.is_none());
    assert!(m.log().contains("No CA chain loaded"));
}

#[tokio::test]
async fn loaded_ca_chain_is_passed_to_the_agent() {
    let mut m = manager(FakeBackend::with_documents(sample_documents()));
    let (agent, requests) = FakeAgent::new(AgentBehavior::Sign("sig"));
    m.attach_agent(agent);
    m.load_documents().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.pem");
    std::fs::write(&path, "ROOT, INTERMEDIATE").unwrap();

    assert_eq!(m.load_ca_pem(Some(&path)), ActionOutcome::Completed(()));
    assert_eq!(
        m.notifications().last().map(|n| n.message.as_str()),
        Some("CA PEM file \"chain.pem\" loaded successfully!")
    );

    m.sign_document("doc-1").await;
    let requests = requests.lock().unwrap();
    assert_eq!(
        requests[0].signer.chain,
        Some(vec!["ROOT".to_string(), "INTERMEDIATE".to_string()])
    );
    assert!(m.log().contains("Using a CA chain of 2 certificates"));
}

#[tokio::test]
async fn cancel_is_distinct_from_failure() {
    let backend = FakeBackend::with_documents(sample_documents());
    let mut m = manager(backend.clone());
    let (agent, _) = FakeAgent::new(AgentBehavior::Cancel);
    m.attach_agent(agent);
    m.load_documents().await;

    let outcome = m.sign_document("doc-1").await;

    assert_eq!(outcome, ActionOutcome::Canceled);
    assert!(backend.state().signatures.is_empty());
    assert_eq!(last_error(&m).as_deref(), Some(MSG_SIGN_CANCELED));
    assert!(m.log().contains("canceled by user"));
}

#[tokio::test]
async fn agent_error_is_reported_with_its_message() {
    let mut m = manager(FakeBackend::with_documents(sample_documents()));
    let (agent, _) = FakeAgent::new(AgentBehavior::Fail("500: storage unavailable"));
    m.attach_agent(agent);
    m.load_documents().await;

    let outcome = m.sign_document("doc-1").await;
    assert_eq!(
        outcome.failure(),
        Some("Signing error: 500: storage unavailable")
    );
}

#[tokio::test]
async fn rejected_signature_surfaces_backend_message() {
    let backend = FakeBackend::with_documents(sample_documents());
    backend.state().reject_sign = Some("Document not found or already signed".into());
    let mut m = manager(backend);
    let (agent, _) = FakeAgent::new(AgentBehavior::Sign("sig"));
    m.attach_agent(agent);
    m.load_documents().await;

    let outcome = m.sign_document("doc-1").await;
    assert_eq!(
        outcome.failure(),
        Some("Signing error: Document not found or already signed")
    );
}

#[test]
fn missing_ca_selection_is_a_no_op() {
    let mut m = manager(FakeBackend::default());
    assert_eq!(m.load_ca_pem(None), ActionOutcome::Canceled);
    assert!(m.ca_chain().is_none());
    assert!(m.notifications().is_empty());
}

#[test]
fn unreadable_ca_file_is_reported() {
    let mut m = manager(FakeBackend::default());
    let dir = tempfile::tempdir().unwrap();
    let outcome = m.load_ca_pem(Some(&dir.path().join("missing.pem")));
    assert_eq!(outcome, ActionOutcome::Failed(MSG_CA_READ_FAILED.to_string()));
    assert!(m.ca_chain().is_none());
}

#[tokio::test]
async fn toggle_content_flips_known_documents_only() {
    let long = Document::new("doc-long", "x".repeat(700));
    let mut m = manager(FakeBackend::with_documents(vec![long]));
    m.load_documents().await;

    assert!(!m.is_expanded("doc-long"));
    assert_eq!(m.toggle_content("doc-long"), Some(true));
    assert!(m.is_expanded("doc-long"));
    assert!(m.render_documents().contains("📄 Collapse"));
    assert_eq!(m.toggle_content("doc-long"), Some(false));
    assert!(!m.is_expanded("doc-long"));
    assert!(m.render_documents().contains("📄 Show full"));
    assert_eq!(m.toggle_content("nope"), None);
}

#[test]
fn clear_log_empties_the_activity_log() {
    let mut m = manager(FakeBackend::default());
    assert!(m.log().contains("Starting..."));
    m.clear_log();
    assert!(m.log().entries().is_empty());
}

#[tokio::test]
async fn notifications_expire_from_the_active_view() {
    let mut m = manager(FakeBackend::default());
    m.create_document("").await;

    let now = chrono::Utc::now();
    assert_eq!(m.active_notifications(now).len(), 1);
    assert!(
        m.active_notifications(now + chrono::Duration::seconds(6))
            .is_empty()
    );
    assert!(m.notifications().is_empty());
}
