use std::path::Path;
use tokio::task::JoinError;
use tracing::{error, info};

use crate::agents::state::{DocumentInput, ProcessingState};
use crate::config::DocumentConfig;
use crate::documents::converter::ConverterLocator;
use crate::documents::error::DocumentError;
use crate::documents::extractors::{excel, pdf, powerpoint, text, word};
use crate::documents::types::{extension_of, ContentBlock, DocumentMetadata, Extraction, FormatKind};

/// Extraction dispatcher: picks the extractor for a file and records the
/// outcome on the processing state.
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    converter: ConverterLocator,
}

impl DocumentProcessor {
    pub fn new(config: &DocumentConfig) -> Self {
        Self::with_converter(ConverterLocator::new(config.pandoc_path.clone()))
    }

    pub fn with_converter(converter: ConverterLocator) -> Self {
        Self { converter }
    }

    /// Never fails: errors, including a panicking extractor, end up in
    /// `state.error`.
    pub async fn process_document(&self, state: ProcessingState) -> ProcessingState {
        let format = match input_format(&state.input) {
            Ok(format) => format,
            Err(e) => {
                error!(error = %e, "Error processing document");
                return state.with_error(e);
            }
        };
        let input = state.input.clone();
        let converter = self.converter.clone();

        let outcome = tokio::task::spawn_blocking(move || extract(&input, &converter))
            .await
            .unwrap_or_else(|e| Err(task_failure(format, e)));

        match outcome {
            Ok((format, extraction)) => {
                let metadata = DocumentMetadata::describe(format, &extraction);
                info!(
                    file_type = %format,
                    blocks = metadata.document_count,
                    chars = metadata.content_length,
                    "Document processed"
                );
                state.with_extraction(extraction.blocks, metadata)
            }
            Err(e) => {
                error!(error = %e, "Error processing document");
                state.with_error(e)
            }
        }
    }
}

fn input_format(input: &DocumentInput) -> Result<FormatKind, DocumentError> {
    match input {
        DocumentInput::Text(_) => Ok(FormatKind::PreProcessed),
        DocumentInput::File(path) => FormatKind::from_path(path),
    }
}

/// A panicked or cancelled extraction task, reported against the format it was reading
fn task_failure(format: FormatKind, e: JoinError) -> DocumentError {
    DocumentError::failure(format, format!("Extraction task failed: {}", e))
}

/// Run the extractor for `input` on the current thread
pub fn extract(
    input: &DocumentInput,
    converter: &ConverterLocator,
) -> Result<(FormatKind, Extraction), DocumentError> {
    let format = input_format(input)?;
    match input {
        DocumentInput::Text(content) => Ok((
            format,
            Extraction::single(ContentBlock::new(content.clone(), format.tag(), format)),
        )),
        DocumentInput::File(path) => {
            info!(path = %path.display(), file_type = %format, "Processing file");
            Ok((format, extract_file(format, path, converter)?))
        }
    }
}

fn extract_file(format: FormatKind, path: &Path, converter: &ConverterLocator) -> Result<Extraction, DocumentError> {
    match format {
        FormatKind::Excel => excel::extract(path),
        FormatKind::Word if extension_of(path) == "doc" => word::extract_legacy(path, converter),
        FormatKind::Word => word::extract_docx(path),
        FormatKind::Pdf => pdf::extract(path, converter),
        FormatKind::Text | FormatKind::PreProcessed => text::extract(path),
        FormatKind::PowerPoint => powerpoint::extract(path, converter),
    }
}
