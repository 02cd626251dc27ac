//! PDF documents via lopdf, with the external converter as a second path
//! for files whose pages carry no text layer.

use std::path::Path;

use crate::documents::converter::ConverterLocator;
use crate::documents::error::DocumentError;
use crate::documents::types::{Extraction, FormatKind};
use crate::utils::collapse_whitespace;

pub const NO_TEXT_MESSAGE: &str = "No text content found in PDF. The PDF might be scanned or protected.";

/// Whitespace runs become one space and stray spaces before `.` and `,` are
/// dropped.
pub fn clean_pdf_text(text: &str) -> String {
    collapse_whitespace(text).replace(" .", ".").replace(" ,", ",")
}

#[cfg(feature = "pdf")]
pub fn extract(path: &Path, converter: &ConverterLocator) -> Result<Extraction, DocumentError> {
    use crate::documents::fallback::{first_success, Attempt};
    use crate::documents::types::ContentBlock;
    use lopdf::Document;
    use tracing::{debug, info};

    let doc = Document::load(path)
        .map_err(|e| DocumentError::failure(FormatKind::Pdf, format!("Failed to load PDF: {}", e)))?;
    let pages = doc.get_pages();
    let page_count = pages.len();
    let source = path.display().to_string();

    let page_text = || {
        let mut blocks = Vec::new();
        for (index, page_number) in pages.keys().enumerate() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) if !text.trim().is_empty() => {
                    blocks.push(
                        ContentBlock::new(text, source.clone(), FormatKind::Pdf).with_extra("page", index + 1),
                    );
                }
                Ok(_) => debug!(page = index + 1, "Skipping PDF page without text"),
                Err(e) => debug!(page = index + 1, error = %e, "Failed to extract PDF page text"),
            }
        }
        if blocks.is_empty() {
            return Err(DocumentError::EmptyOrMissingContent("no page contains text".to_string()));
        }
        Ok(blocks)
    };

    let converted = || {
        let text = converter
            .locate()?
            .convert(path, None)
            .map_err(|e| DocumentError::failure(FormatKind::Pdf, e.to_string()))?;
        if text.trim().is_empty() {
            return Err(DocumentError::EmptyOrMissingContent("converter produced no text".to_string()));
        }
        Ok(vec![ContentBlock::new(text, source.clone(), FormatKind::Pdf)
            .with_extra("extraction_method", "converter")])
    };

    let success = first_success([Attempt::new("page_text", page_text), Attempt::new("converter", converted)])
        .map_err(|exhausted| DocumentError::exhausted(FormatKind::Pdf, NO_TEXT_MESSAGE, exhausted))?;

    let blocks: Vec<_> = success
        .value
        .iter()
        .map(|block| block.map_text(clean_pdf_text))
        .collect();

    info!(
        path = %path.display(),
        pages = page_count,
        blocks = blocks.len(),
        method = success.strategy,
        "Extracted PDF"
    );
    Ok(Extraction::new(blocks).with_page_count(page_count))
}

#[cfg(not(feature = "pdf"))]
pub fn extract(_path: &Path, _converter: &ConverterLocator) -> Result<Extraction, DocumentError> {
    Err(DocumentError::MissingDependency {
        format: FormatKind::Pdf,
        dependency: "lopdf".to_string(),
    })
}
