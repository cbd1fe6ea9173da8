//! Printable shapes of backend documents.

use knca_core::Document;
use knca_core::render::{created_date, truncate_preview};
use serde::Serialize;

use super::Tabular;

const ROW_PREVIEW_CHARS: usize = 48;

fn status_text(signed: bool) -> &'static str {
    if signed { "Signed" } else { "Not signed" }
}

fn created_text(document: &Document) -> String {
    document
        .created_at
        .map_or_else(|| String::from("-"), created_date)
}

/// One line of `knca list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub id: String,
    pub signed: bool,
    pub created: String,
    pub lines: usize,
    pub size_kb: f64,
    pub preview: String,
}

impl From<&Document> for DocumentRow {
    fn from(document: &Document) -> Self {
        let first_line = document.content.lines().next().unwrap_or_default();
        Self {
            id: document.id.clone(),
            signed: document.signed,
            created: created_text(document),
            lines: document.line_count(),
            size_kb: document.size_kb(),
            preview: truncate_preview(first_line, ROW_PREVIEW_CHARS)
                .unwrap_or_else(|| first_line.to_string()),
        }
    }
}

impl Tabular for DocumentRow {
    const COLUMNS: &'static [&'static str] = &["id", "status", "created", "lines", "size", "preview"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            status_text(self.signed).to_string(),
            self.created.clone(),
            self.lines.to_string(),
            format!("{} KB", self.size_kb),
            self.preview.clone(),
        ]
    }
}

/// A single document as printed by `knca show` and `knca create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: String,
    pub signed: bool,
    pub created: String,
    pub lines: usize,
    pub size_kb: f64,
    /// Whether `content` is cut to the preview length.
    pub truncated: bool,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl DocumentView {
    /// `preview_length` of `None` prints the full content.
    #[must_use]
    pub fn new(document: &Document, preview_length: Option<usize>) -> Self {
        let preview = preview_length.and_then(|limit| truncate_preview(&document.content, limit));
        Self {
            id: document.id.clone(),
            signed: document.signed,
            created: created_text(document),
            lines: document.line_count(),
            size_kb: document.size_kb(),
            truncated: preview.is_some(),
            content: preview.unwrap_or_else(|| document.content.clone()),
            signature: document.signature.clone(),
        }
    }
}

impl Tabular for DocumentView {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "status",
        "created",
        "lines",
        "size",
        "content",
        "signature",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            status_text(self.signed).to_string(),
            self.created.clone(),
            self.lines.to_string(),
            format!("{} KB", self.size_kb),
            self.content.clone(),
            self.signature.clone().unwrap_or_else(|| String::from("-")),
        ]
    }
}

/// Result of `knca sign`.
#[derive(Debug, Serialize)]
pub struct SignReport {
    pub id: String,
    pub signature: String,
}

impl Tabular for SignReport {
    const COLUMNS: &'static [&'static str] = &["id", "signature"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.signature.clone()]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};
    use knca_core::CardTemplate;
    use knca_core::render::{RenderOptions, render_card};
    use pretty_assertions::assert_eq;

    use super::*;

    fn document(content: &str) -> Document {
        let mut document = Document::new("doc-1", content);
        document.created_at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).single();
        document
    }

    #[test]
    fn created_date_matches_the_card() {
        // Late enough in the UTC day to fall on the next day east of UTC.
        let mut late = document("text");
        late.created_at = Utc.with_ymd_and_hms(2024, 3, 9, 22, 0, 0).single();

        let template = CardTemplate::default();
        let expanded = HashSet::new();
        let card = render_card(
            &late,
            &RenderOptions {
                template: &template,
                preview_length: 500,
                expanded: &expanded,
            },
        );

        let row = DocumentRow::from(&late);
        let view = DocumentView::new(&late, None);
        assert_eq!(row.created, view.created);
        assert!(
            card.contains(&format!("Created: {}</span>", row.created)),
            "{card}"
        );
    }

    #[test]
    fn row_previews_first_line() {
        let row = DocumentRow::from(&document("<a>\n<b/>\n</a>"));
        assert_eq!(row.preview, "<a>");
        assert_eq!(row.lines, 3);
        assert_eq!(row.created, "09.03.2024");
        assert_eq!(row.cells()[1], "Not signed");
    }

    #[test]
    fn view_truncates_unless_full() {
        let long = "x".repeat(600);
        let preview = DocumentView::new(&document(&long), Some(500));
        assert!(preview.truncated);
        assert_eq!(preview.content.chars().count(), 503);

        let full = DocumentView::new(&document(&long), None);
        assert!(!full.truncated);
        assert_eq!(full.content, long);
    }

    #[test]
    fn signature_is_omitted_from_json_when_unsigned() {
        let view = DocumentView::new(&document("text"), None);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("signature").is_none());
        assert_eq!(json["sizeKb"], serde_json::json!(0.01));
    }
}
