//! PowerPoint decks. No Rust library reads `.ppt`/`.pptx` text reliably, so
//! every strategy goes through the external converter.

use std::path::Path;
use tracing::info;

use crate::documents::converter::{ConversionError, ConverterLocator};
use crate::documents::error::DocumentError;
use crate::documents::fallback::{first_success, Attempt};
use crate::documents::types::{extension_of, ContentBlock, Extraction, FormatKind};

fn non_empty(converted: Result<String, ConversionError>) -> Result<String, DocumentError> {
    let text = converted.map_err(|e| DocumentError::failure(FormatKind::PowerPoint, e.to_string()))?;
    if text.trim().is_empty() {
        return Err(DocumentError::EmptyOrMissingContent("converter produced no text".to_string()));
    }
    Ok(text)
}

pub fn extract(path: &Path, converter: &ConverterLocator) -> Result<Extraction, DocumentError> {
    let size = std::fs::metadata(path)
        .map_err(|_| DocumentError::failure(FormatKind::PowerPoint, format!("File not found: {}", path.display())))?
        .len();
    if size == 0 {
        return Err(DocumentError::failure(
            FormatKind::PowerPoint,
            format!("File is empty: {}", path.display()),
        ));
    }

    let pandoc = converter.locate()?;
    let from = match extension_of(path).as_str() {
        "ppt" => "ppt",
        _ => "pptx",
    };

    let success = first_success([
        Attempt::new("direct_conversion", || non_empty(pandoc.convert(path, Some(from)))),
        Attempt::new("subprocess_conversion", || non_empty(pandoc.convert_via_file(path, Some(from)))),
        Attempt::new("auto_detection", || non_empty(pandoc.convert(path, None))),
    ])
    .map_err(|exhausted| {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        DocumentError::exhausted(
            FormatKind::PowerPoint,
            format!(
                "Failed to extract content from PowerPoint file: {}. The file may be empty, corrupted, \
                 or not a valid PowerPoint file.",
                name
            ),
            exhausted,
        )
    })?;

    info!(
        path = %path.display(),
        method = success.strategy,
        chars = success.value.chars().count(),
        "Extracted PowerPoint presentation"
    );
    Ok(Extraction::single(
        ContentBlock::new(success.value, path.display().to_string(), FormatKind::PowerPoint)
            .with_extra("extraction_method", success.strategy),
    ))
}
