use std::path::Path;
use tracing::info;

use crate::documents::error::DocumentError;
use crate::documents::types::{ContentBlock, Extraction, FormatKind};

pub fn extract(path: &Path) -> Result<Extraction, DocumentError> {
    let text = std::fs::read_to_string(path).map_err(|e| DocumentError::failure(FormatKind::Text, e.to_string()))?;

    info!(path = %path.display(), chars = text.chars().count(), "Loaded text file");
    Ok(Extraction::single(ContentBlock::new(
        text,
        path.display().to_string(),
        FormatKind::Text,
    )))
}
