use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::str::FromStr;

use super::{FormDocument, FormError};

/// Turns a laid-out form into bytes a client can download
pub trait DocumentRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn render(&self, document: &FormDocument) -> Result<Vec<u8>, FormError>;
}

/// Fixed-width text; pages are separated by form feeds
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    pub width: usize,
    pub label_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            width: 72,
            label_width: 30,
        }
    }
}

impl TextRenderer {
    fn centered(&self, text: &str) -> String {
        let pad = self.width.saturating_sub(text.chars().count()) / 2;
        format!("{}{}", " ".repeat(pad), text)
    }
}

impl DocumentRenderer for TextRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn render(&self, document: &FormDocument) -> Result<Vec<u8>, FormError> {
        let total = document.pages.len();
        let mut pages = Vec::with_capacity(total);

        for page in &document.pages {
            let mut out = String::new();
            let heading = format!("Page {} of {}", page.number, total);
            writeln!(out, "{}", self.centered(&document.title))
                .and_then(|_| writeln!(out, "{}", self.centered(&heading)))
                .and_then(|_| writeln!(out, "{}", "=".repeat(self.width)))
                .map_err(|e| FormError::Render(e.to_string()))?;

            for section in &page.sections {
                writeln!(out)
                    .and_then(|_| writeln!(out, "{}", section.heading.to_uppercase()))
                    .and_then(|_| writeln!(out, "{}", "-".repeat(self.width)))
                    .map_err(|e| FormError::Render(e.to_string()))?;
                for field in &section.fields {
                    let label = format!("{}:", field.label);
                    writeln!(out, "{:<width$}{}", label, field.value, width = self.label_width)
                        .map_err(|e| FormError::Render(e.to_string()))?;
                }
            }
            pages.push(out);
        }

        Ok(pages.join("\x0c").into_bytes())
    }
}

/// The document tree as JSON, for clients that lay out pages themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl DocumentRenderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, document: &FormDocument) -> Result<Vec<u8>, FormError> {
        serde_json::to_vec_pretty(document).map_err(|e| FormError::Render(e.to_string()))
    }
}

/// `?format=` selector for the document endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    #[default]
    Text,
    Json,
}

impl RenderFormat {
    pub fn renderer(&self) -> Box<dyn DocumentRenderer> {
        match self {
            RenderFormat::Text => Box::new(TextRenderer::default()),
            RenderFormat::Json => Box::new(JsonRenderer),
        }
    }
}

impl FromStr for RenderFormat {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(RenderFormat::Text),
            "json" => Ok(RenderFormat::Json),
            _ => Err(FormError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    /// Quoted SHA-256 of `bytes`
    pub etag: String,
}

pub fn render_document(
    renderer: &dyn DocumentRenderer,
    document: &FormDocument,
) -> Result<RenderedDocument, FormError> {
    let bytes = renderer.render(document)?;
    let etag = format!("\"{}\"", hex::encode(Sha256::digest(&bytes)));
    Ok(RenderedDocument {
        content_type: renderer.content_type(),
        bytes,
        etag,
    })
}
