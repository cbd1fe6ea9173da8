//! Signing payload and signer parameters for the NCALayer `basics` module.
//!
//! The agent does all the cryptography. This module only shapes what is sent
//! to it: the base64 payload, the storage selector, the CMS flags, and the
//! signer parameters (extended key usage filter and optional CA chain).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// id-kp-emailProtection, the key usage required of signing certificates.
pub const EMAIL_PROTECTION_OID: &str = "1.3.6.1.5.5.7.3.4";

/// Base64 of the UTF-8 bytes of `content`.
#[must_use]
pub fn encode_payload(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

/// CA certificates loaded by the user, as raw text.
///
/// Entries are separated by commas; each entry is trimmed. The text is not
/// parsed as PEM here, NCALayer validates what it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaChain {
    source: String,
    text: String,
}

impl CaChain {
    #[must_use]
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Name of the file (or other origin) the chain was loaded from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        if self.text.is_empty() {
            return Vec::new();
        }
        self.text.split(',').map(|s| s.trim().to_string()).collect()
    }
}

/// Signer filter passed as `signerParams`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignerParams {
    pub ext_key_usage_oids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<String>>,
}

impl Default for SignerParams {
    fn default() -> Self {
        Self {
            ext_key_usage_oids: vec![EMAIL_PROTECTION_OID.to_string()],
            chain: None,
        }
    }
}

impl SignerParams {
    /// Build signer parameters; the chain is attached only when non-empty.
    #[must_use]
    pub fn new(ext_key_usage_oids: Vec<String>, ca_chain: Option<&CaChain>) -> Self {
        let chain = ca_chain.filter(|c| !c.is_empty()).map(CaChain::entries);
        Self {
            ext_key_usage_oids,
            chain,
        }
    }
}

/// Which key storages NCALayer may offer to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageSelector {
    /// Every storage type the agent supports (serialized as `null`).
    #[default]
    All,
    Only(Vec<String>),
}

impl Serialize for StorageSelector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_none(),
            Self::Only(storages) => storages.serialize(serializer),
        }
    }
}

/// CMS signing flags passed as `signingParams`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CmsParams {
    pub decode: bool,
    pub encapsulate: bool,
    pub digested: bool,
    pub tsa_profile: serde_json::Map<String, serde_json::Value>,
}

impl CmsParams {
    /// Detached signature over the decoded payload, no timestamp profile.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            decode: true,
            encapsulate: false,
            digested: false,
            tsa_profile: serde_json::Map::new(),
        }
    }
}

/// Everything the agent needs for one CMS signing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsSignRequest {
    pub storages: StorageSelector,
    pub payload: String,
    pub params: CmsParams,
    pub signer: SignerParams,
    pub locale: String,
}

impl CmsSignRequest {
    /// Detached signature over `content`, offered from every storage.
    #[must_use]
    pub fn detached(content: &str, signer: SignerParams, locale: impl Into<String>) -> Self {
        Self {
            storages: StorageSelector::All,
            payload: encode_payload(content),
            params: CmsParams::detached(),
            signer,
            locale: locale.into(),
        }
    }
}

/// Result of a signing call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    /// Base64 CMS signature.
    Signed(String),
    /// The user closed the key selection dialog.
    Canceled,
}
