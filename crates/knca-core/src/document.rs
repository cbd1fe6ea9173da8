use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document as served by the backend.
///
/// The record is opaque to the client: it is listed, rendered, and signed,
/// but nothing here enforces server-side rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub signed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Document {
    /// A fresh unsigned document.
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            signed: false,
            created_at: None,
            signature: None,
        }
    }

    /// Number of `\n`-separated lines. An empty document has one line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Approximate in-memory size in kilobytes, rounded to two decimals.
    ///
    /// Counts two bytes per UTF-16 code unit.
    #[must_use]
    pub fn size_kb(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let bytes = (self.content.encode_utf16().count() * 2) as f64;
        (bytes / 1024.0 * 100.0).round() / 100.0
    }
}

/// Body of `POST /api/documents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDocumentRequest {
    pub content: String,
}

/// Body of `PUT /api/documents/{id}/sign`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignDocumentRequest {
    pub signature: String,
}

/// Success body of the sign endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignAck {
    #[serde(default)]
    pub message: String,
}

/// Failure body returned by the backend on rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn deserializes_minimal_server_record() {
        let doc: Document =
            serde_json::from_str(r#"{"id":"doc-1","content":"<a/>","signed":false}"#).unwrap();
        assert_eq!(doc, Document::new("doc-1", "<a/>"));
    }

    #[test]
    fn deserializes_created_at_and_ignores_unknown_fields() {
        let doc: Document = serde_json::from_str(
            r#"{"id":"doc-2","content":"x","signed":true,"signature":"MIIB","createdAt":"2024-03-01T10:00:00Z","extra":1}"#,
        )
        .unwrap();
        assert!(doc.signed);
        assert_eq!(doc.signature.as_deref(), Some("MIIB"));
        assert_eq!(
            doc.created_at.map(|t| t.to_rfc3339()),
            Some("2024-03-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn missing_signed_flag_defaults_to_unsigned() {
        let doc: Document = serde_json::from_str(r#"{"id":"d","content":"c"}"#).unwrap();
        assert!(!doc.signed);
    }

    #[test]
    fn serializes_camel_case_and_skips_absent_fields() {
        let json = serde_json::to_value(Document::new("doc-9", "hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "doc-9", "content": "hello", "signed": false})
        );
    }

    #[rstest]
    #[case("", 1)]
    #[case("one line", 1)]
    #[case("a\nb\nc", 3)]
    #[case("trailing\n", 2)]
    fn line_count_splits_on_newlines(#[case] content: &str, #[case] expected: usize) {
        assert_eq!(Document::new("d", content).line_count(), expected);
    }

    #[rstest]
    #[case("", 0.0)]
    #[case("a", 0.0)]
    #[case(&"x".repeat(512), 1.0)]
    #[case(&"x".repeat(1000), 1.95)]
    #[case(&"ж".repeat(512), 1.0)]
    fn size_kb_counts_utf16_units(#[case] content: &str, #[case] expected: f64) {
        let size = Document::new("d", content).size_kb();
        assert!((size - expected).abs() < f64::EPSILON, "{size} != {expected}");
    }
}
