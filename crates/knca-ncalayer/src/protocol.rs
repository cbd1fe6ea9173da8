//! NCALayer wire messages.
//!
//! Requests name a module and a method; replies either carry
//! `"status": false` with a code and message, or `"status": true` with a
//! `body` whose `result` is the payload. An empty body means the user closed
//! the dialog.

use knca_core::{CmsParams, CmsSignRequest, SignOutcome, SignerParams, StorageSelector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NcaLayerError;

pub const BASICS_MODULE: &str = "kz.gov.pki.knca.basics";

#[derive(Debug, Serialize)]
pub struct ModuleCall<A> {
    pub module: &'static str,
    pub method: &'static str,
    pub args: A,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignArgs<'a> {
    pub allowed_storages: &'a StorageSelector,
    pub format: &'static str,
    pub data: &'a str,
    pub signing_params: &'a CmsParams,
    pub signer_params: &'a SignerParams,
    pub locale: &'a str,
}

impl<'a> ModuleCall<SignArgs<'a>> {
    pub fn basics_sign_cms(request: &'a CmsSignRequest) -> Self {
        Self {
            module: BASICS_MODULE,
            method: "sign",
            args: SignArgs {
                allowed_storages: &request.storages,
                format: "cms",
                data: &request.payload,
                signing_params: &request.params,
                signer_params: &request.signer,
                locale: &request.locale,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct Greeting {
    result: Option<GreetingResult>,
}

#[derive(Debug, Deserialize)]
struct GreetingResult {
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Reply {
    status: Option<bool>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    body: Option<Value>,
}

/// Agent version from the greeting sent right after the handshake.
pub fn parse_greeting(text: &str) -> Result<Option<String>, NcaLayerError> {
    let greeting: Greeting = serde_json::from_str(text)
        .map_err(|e| NcaLayerError::Protocol(format!("bad greeting: {e}")))?;
    Ok(greeting.result.and_then(|r| r.version))
}

/// Interpret the reply to a `basics.sign` call.
pub fn parse_sign_reply(text: &str) -> Result<SignOutcome, NcaLayerError> {
    let reply: Reply =
        serde_json::from_str(text).map_err(|e| NcaLayerError::Protocol(e.to_string()))?;

    match reply.status {
        Some(true) => {}
        Some(false) => {
            return Err(NcaLayerError::Agent {
                code: reply.code.map_or_else(|| "unknown".to_string(), code_text),
                message: reply
                    .message
                    .unwrap_or_else(|| "unknown agent error".to_string()),
            });
        }
        None => return Err(NcaLayerError::Protocol("reply without status".into())),
    }

    let result = reply.body.and_then(|mut body| body.get_mut("result").map(Value::take));
    match result {
        None | Some(Value::Null) => Ok(SignOutcome::Canceled),
        Some(Value::String(sig)) if sig.is_empty() => Ok(SignOutcome::Canceled),
        Some(Value::String(sig)) => Ok(SignOutcome::Signed(sig)),
        Some(Value::Array(items)) => match items.into_iter().next() {
            Some(Value::String(sig)) => Ok(SignOutcome::Signed(sig)),
            Some(other) => Err(NcaLayerError::Protocol(format!(
                "signature is not a string: {other}"
            ))),
            None => Err(NcaLayerError::Protocol("empty signature list".into())),
        },
        Some(other) => Err(NcaLayerError::Protocol(format!(
            "unexpected result: {other}"
        ))),
    }
}

fn code_text(code: Value) -> String {
    match code {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
