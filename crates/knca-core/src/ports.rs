//! Seams between the controller and its transports.

use std::future::Future;

use crate::document::{Document, SignAck};
use crate::signing::{CmsSignRequest, SignOutcome};

/// The REST backend that stores documents and signatures.
pub trait DocumentBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_documents(&self) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send;

    fn create_document(
        &self,
        content: &str,
    ) -> impl Future<Output = Result<Document, Self::Error>> + Send;

    fn sign_document(
        &self,
        id: &str,
        signature: &str,
    ) -> impl Future<Output = Result<SignAck, Self::Error>> + Send;
}

/// An external agent holding the user's keys.
///
/// A user closing the key dialog is reported as [`SignOutcome::Canceled`],
/// not as an error.
pub trait SigningAgent {
    type Error: std::error::Error + Send + Sync + 'static;

    fn sign_cms(
        &mut self,
        request: &CmsSignRequest,
    ) -> impl Future<Output = Result<SignOutcome, Self::Error>> + Send;
}
