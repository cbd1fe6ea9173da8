//! HTML rendering of document cards.
//!
//! Cards are produced from a placeholder template (`{{name}}`). The template
//! is split into literal and slot segments once, so substituted values are
//! never rescanned for placeholders. Each placeholder is filled at its first
//! occurrence only; repeated occurrences are kept as literal text.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::document::Document;
use crate::errors::CoreError;
use crate::notify::{LogEntry, Notification};

/// Default number of characters shown before a card is truncated.
pub const DEFAULT_PREVIEW_LENGTH: usize = 500;

const PLACEHOLDERS: &[&str] = &[
    "id",
    "statusClass",
    "statusText",
    "lineCount",
    "sizeKB",
    "createdAt",
    "contentClass",
    "displayContent",
    "contentDataAttr",
    "contentToggle",
    "actions",
];

const DEFAULT_TEMPLATE: &str = r#"<div class="document-header">
  <div class="document-id">ID: {{id}}</div>
  <span class="document-status {{statusClass}}">{{statusText}}</span>
</div>
<div class="document-meta">
  <span>Lines: {{lineCount}}</span>
  <span>Size: {{sizeKB}} KB</span>
  {{createdAt}}
</div>
<div class="{{contentClass}}" {{contentDataAttr}}>{{displayContent}}</div>
{{contentToggle}}
<div class="document-actions">{{actions}}</div>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(&'static str),
}

/// A parsed card template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    segments: Vec<Segment>,
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE).unwrap_or(Self {
            segments: vec![Segment::Literal(DEFAULT_TEMPLATE.to_string())],
        })
    }
}

impl CardTemplate {
    /// Parse a template. It must contain `{{displayContent}}`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Template`] when the content placeholder is missing.
    pub fn parse(source: &str) -> Result<Self, CoreError> {
        let mut segments = Vec::new();
        let mut seen = HashSet::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let slot = after.find("}}").and_then(|end| {
                let name = &after[..end];
                PLACEHOLDERS
                    .iter()
                    .find(|p| **p == name)
                    .filter(|p| !seen.contains(**p))
                    .map(|p| (*p, end))
            });

            match slot {
                Some((name, end)) => {
                    literal.push_str(&rest[..start]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(name));
                    seen.insert(name);
                    rest = &after[end + 2..];
                }
                None => {
                    literal.push_str(&rest[..start + 2]);
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !seen.contains("displayContent") {
            return Err(CoreError::Template("displayContent".to_string()));
        }
        Ok(Self { segments })
    }

    /// Load and parse a template file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be read, or
    /// [`CoreError::Template`] if it is not a valid card template.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let source = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    fn fill(&self, lookup: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name) => out.push_str(&lookup(name)),
            }
        }
        out
    }
}

/// Rendering options shared by every card on a page.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub template: &'a CardTemplate,
    pub preview_length: usize,
    pub expanded: &'a HashSet<String>,
}

/// Escape text for use in element content and quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Creation date in the local time zone, as `dd.mm.yyyy`.
#[must_use]
pub fn created_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&chrono::Local).format("%d.%m.%Y").to_string()
}

/// First `limit` characters followed by `...`, or `None` if no truncation is needed.
#[must_use]
pub fn truncate_preview(content: &str, limit: usize) -> Option<String> {
    let mut chars = content.char_indices();
    let (cut, _) = chars.nth(limit)?;
    Some(format!("{}...", &content[..cut]))
}

/// Render one document card, including its wrapper element.
#[must_use]
pub fn render_card(doc: &Document, options: &RenderOptions<'_>) -> String {
    let id = escape_html(&doc.id);
    let truncated = truncate_preview(&doc.content, options.preview_length);
    let expanded = truncated.is_some() && options.expanded.contains(&doc.id);

    let display = match &truncated {
        Some(preview) if !expanded => preview.as_str(),
        _ => doc.content.as_str(),
    };

    let body = options.template.fill(|name| match name {
        "id" => id.clone(),
        "statusClass" => status_class(doc).to_string(),
        "statusText" => status_text(doc).to_string(),
        "lineCount" => doc.line_count().to_string(),
        "sizeKB" => doc.size_kb().to_string(),
        "createdAt" => doc.created_at.map_or_else(String::new, |at| {
            format!("<span>Created: {}</span>", created_date(at))
        }),
        "contentClass" => {
            if expanded {
                "document-content expanded".to_string()
            } else {
                "document-content".to_string()
            }
        }
        "displayContent" => escape_html(display),
        "contentDataAttr" => {
            if truncated.is_some() {
                format!("data-full-content=\"{}\"", escape_html(&doc.content))
            } else {
                String::new()
            }
        }
        "contentToggle" => {
            if truncated.is_none() {
                String::new()
            } else if expanded {
                toggle_button(&id, "btn-danger", "📄 Collapse")
            } else {
                toggle_button(&id, "btn-secondary", "📄 Show full")
            }
        }
        "actions" => {
            if doc.signed {
                r#"<div class="signed-badge">✓ Signed</div>"#.to_string()
            } else {
                format!(
                    r#"<button class="btn btn-success sign-btn" data-action="sign" data-doc-id="{id}">✍️ Sign document</button>"#
                )
            }
        }
        _ => String::new(),
    });

    let wrapper_class = if doc.signed {
        "document-card signed"
    } else {
        "document-card"
    };
    format!("<div class=\"{wrapper_class}\" id=\"doc-{id}\">{body}</div>")
}

/// Render the whole list, or the empty-state marker.
#[must_use]
pub fn render_list(docs: &[Document], options: &RenderOptions<'_>) -> String {
    if docs.is_empty() {
        return r#"<div class="loading">No documents</div>"#.to_string();
    }
    docs.iter()
        .map(|doc| render_card(doc, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A standalone HTML page: notifications, the document list, and the activity log.
#[must_use]
pub fn render_page(
    docs: &[Document],
    options: &RenderOptions<'_>,
    notifications: &[Notification],
    log: &[LogEntry],
) -> String {
    let mut page = String::from(PAGE_HEAD);

    page.push_str("<div id=\"notification-container\">\n");
    for n in notifications {
        let _ = writeln!(
            page,
            "<div class=\"{}\">{}</div>",
            n.css_class(),
            escape_html(&n.message)
        );
    }
    page.push_str("</div>\n<div id=\"documents\">\n");
    page.push_str(&render_list(docs, options));
    page.push_str("\n</div>\n<div id=\"logOutput\">\n");
    for entry in log {
        let _ = writeln!(
            page,
            "<div class=\"log-message\"><span class=\"log-timestamp\">[{}]</span><span class=\"log-text\">{}</span></div>",
            entry.at.format("%H:%M:%S"),
            escape_html(&entry.message)
        );
    }
    page.push_str("</div>\n</body>\n</html>\n");
    page
}

const fn status_class(doc: &Document) -> &'static str {
    if doc.signed {
        "status-signed"
    } else {
        "status-unsigned"
    }
}

const fn status_text(doc: &Document) -> &'static str {
    if doc.signed { "Signed" } else { "Not signed" }
}

fn toggle_button(id: &str, class: &str, label: &str) -> String {
    format!(
        r#"<div class="content-toggle"><button class="btn {class} btn-sm" data-action="toggle" data-doc-id="{id}">{label}</button></div>"#
    )
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>KNCA Signer</title>
<style>
.document-card { border: 1px solid #ccc; border-radius: 6px; padding: 12px; margin: 8px 0; }
.document-card.signed { border-color: #2e7d32; background: #f1f8e9; }
.status-signed { color: #2e7d32; }
.status-unsigned { color: #c62828; }
.document-content { white-space: pre-wrap; font-family: monospace; }
.success { color: #2e7d32; }
.error { color: #c62828; }
.log-timestamp { color: #888; margin-right: 6px; }
</style>
</head>
<body>
"#;
