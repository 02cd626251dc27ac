use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::documents::error::DocumentError;
use crate::utils::char_len;

/// Document format classification.
///
/// Decides which extractor runs and how the answer prompt names the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Pdf,
    Word,
    Excel,
    PowerPoint,
    Text,
    PreProcessed,
}

impl FormatKind {
    /// Classify a file by its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let extension = extension_of(path);
        match extension.as_str() {
            "xlsx" | "xls" => Ok(FormatKind::Excel),
            "docx" | "doc" => Ok(FormatKind::Word),
            "pdf" => Ok(FormatKind::Pdf),
            "txt" => Ok(FormatKind::Text),
            "ppt" | "pptx" => Ok(FormatKind::PowerPoint),
            _ => Err(DocumentError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{}", extension)
                },
            }),
        }
    }

    /// Tag stored on blocks and metadata
    pub fn tag(&self) -> &'static str {
        match self {
            FormatKind::Pdf => "pdf",
            FormatKind::Word => "word",
            FormatKind::Excel => "excel",
            FormatKind::PowerPoint => "powerpoint",
            FormatKind::Text => "text",
            FormatKind::PreProcessed => "pre_processed",
        }
    }

    /// How the answer prompt refers to a document of this format
    pub fn label(&self) -> &'static str {
        match self {
            FormatKind::Excel => "Excel spreadsheet",
            FormatKind::Word => "Word document",
            FormatKind::Pdf => "PDF document",
            FormatKind::Text => "text file",
            FormatKind::PowerPoint => "PowerPoint presentation",
            FormatKind::PreProcessed => "document",
        }
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatKind::Pdf => write!(f, "PDF"),
            FormatKind::Word => write!(f, "Word"),
            FormatKind::Excel => write!(f, "Excel"),
            FormatKind::PowerPoint => write!(f, "PowerPoint"),
            FormatKind::Text => write!(f, "text"),
            FormatKind::PreProcessed => write!(f, "pre-processed"),
        }
    }
}

/// Lowercased extension without the dot, empty when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// One extracted unit of document text: a page, a sheet, or a whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub text: String,
    pub source_locator: String,
    pub format_tag: FormatKind,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl ContentBlock {
    pub fn new(text: impl Into<String>, source_locator: impl Into<String>, format_tag: FormatKind) -> Self {
        Self {
            text: text.into(),
            source_locator: source_locator.into(),
            format_tag,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// A new block carrying `f(text)` and the same provenance
    pub fn map_text(&self, f: impl FnOnce(&str) -> String) -> Self {
        Self {
            text: f(&self.text),
            ..self.clone()
        }
    }

    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}

/// What an extractor hands back to the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub blocks: Vec<ContentBlock>,
    pub page_count: Option<usize>,
}

impl Extraction {
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self {
            blocks,
            page_count: None,
        }
    }

    pub fn single(block: ContentBlock) -> Self {
        Self::new(vec![block])
    }

    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub file_type: FormatKind,
    pub document_count: usize,
    /// Sum of the character counts of every block
    pub content_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
}

impl DocumentMetadata {
    pub fn describe(file_type: FormatKind, extraction: &Extraction) -> Self {
        Self {
            file_type,
            document_count: extraction.blocks.len(),
            content_length: extraction.blocks.iter().map(ContentBlock::char_len).sum(),
            page_count: extraction.page_count,
        }
    }
}
