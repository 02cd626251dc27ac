use std::path::PathBuf;

use crate::documents::error::DocumentError;
use crate::documents::types::{ContentBlock, DocumentMetadata};

/// What the pipeline reads: a stored file or text that was already extracted
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentInput {
    File(PathBuf),
    Text(String),
}

/// Context threaded through the pipeline. Each stage takes it by value and
/// returns the updated copy.
#[derive(Debug, Clone)]
pub struct ProcessingState {
    pub input: DocumentInput,
    pub question: String,
    /// `None` until extraction succeeds
    pub blocks: Option<Vec<ContentBlock>>,
    pub metadata: Option<DocumentMetadata>,
    pub answer: Option<String>,
    pub error: Option<DocumentError>,
}

impl ProcessingState {
    pub fn new(question: impl Into<String>, input: DocumentInput) -> Self {
        Self {
            input,
            question: question.into(),
            blocks: None,
            metadata: None,
            answer: None,
            error: None,
        }
    }

    pub fn with_extraction(self, blocks: Vec<ContentBlock>, metadata: DocumentMetadata) -> Self {
        Self {
            blocks: Some(blocks),
            metadata: Some(metadata),
            ..self
        }
    }

    pub fn with_error(self, error: DocumentError) -> Self {
        Self {
            error: Some(error),
            ..self
        }
    }

    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..self
        }
    }

    /// Block texts in order, separated by a blank line
    pub fn joined_text(&self) -> String {
        self.blocks
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
