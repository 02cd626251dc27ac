//! Word documents.
//!
//! `.docx` is parsed in-process with docx-rs. Legacy binary `.doc` files go
//! through the external converter.

use std::path::Path;
use tracing::info;

use crate::documents::converter::ConverterLocator;
use crate::documents::error::DocumentError;
use crate::documents::types::{ContentBlock, Extraction, FormatKind};

#[cfg(feature = "docx")]
pub fn extract_docx(path: &Path) -> Result<Extraction, DocumentError> {
    let bytes = std::fs::read(path)
        .map_err(|e| DocumentError::failure(FormatKind::Word, format!("Failed to read DOCX file: {}", e)))?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| DocumentError::failure(FormatKind::Word, format!("Failed to parse DOCX: {}", e)))?;

    let mut text = String::new();
    for child in &docx.document.children {
        push_document_child(child, &mut text);
    }

    info!(path = %path.display(), chars = text.chars().count(), "Extracted Word document");
    Ok(Extraction::single(ContentBlock::new(
        text.trim_end().to_string(),
        path.display().to_string(),
        FormatKind::Word,
    )))
}

#[cfg(not(feature = "docx"))]
pub fn extract_docx(_path: &Path) -> Result<Extraction, DocumentError> {
    Err(DocumentError::MissingDependency {
        format: FormatKind::Word,
        dependency: "docx-rs".to_string(),
    })
}

#[cfg(feature = "docx")]
fn push_runs(children: &[docx_rs::ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    if let docx_rs::RunChild::Text(t) = run_child {
                        out.push_str(&t.text);
                    }
                }
            }
            docx_rs::ParagraphChild::Hyperlink(link) => push_runs(&link.children, out),
            _ => {}
        }
    }
}

#[cfg(feature = "docx")]
fn push_document_child(child: &docx_rs::DocumentChild, out: &mut String) {
    match child {
        docx_rs::DocumentChild::Paragraph(para) => {
            push_runs(&para.children, out);
            out.push('\n');
        }
        docx_rs::DocumentChild::Table(table) => {
            for row in &table.rows {
                let docx_rs::TableChild::TableRow(tr) = row;
                let mut cells = Vec::new();
                for cell in &tr.cells {
                    let docx_rs::TableRowChild::TableCell(tc) = cell;
                    let mut cell_text = String::new();
                    for content in &tc.children {
                        if let docx_rs::TableCellContent::Paragraph(para) = content {
                            if !cell_text.is_empty() {
                                cell_text.push(' ');
                            }
                            push_runs(&para.children, &mut cell_text);
                        }
                    }
                    cells.push(cell_text);
                }
                out.push_str(&cells.join(" | "));
                out.push('\n');
            }
        }
        _ => {}
    }
}

/// Legacy `.doc`: the converter infers the input format from the extension.
/// A missing converter is fatal.
pub fn extract_legacy(path: &Path, converter: &ConverterLocator) -> Result<Extraction, DocumentError> {
    let pandoc = converter.locate()?;
    let text = pandoc.convert(path, None).map_err(|e| {
        DocumentError::failure(FormatKind::Word, format!("Failed to convert legacy .doc file: {}", e))
    })?;

    info!(path = %path.display(), chars = text.chars().count(), "Converted legacy Word document");
    Ok(Extraction::single(
        ContentBlock::new(text, path.display().to_string(), FormatKind::Word)
            .with_extra("extraction_method", "converter"),
    ))
}
