//! Excel workbooks via calamine.
//!
//! Two engines are tried in order: the reader matching the file extension,
//! then a reader that sniffs the container format from the bytes, which
//! rescues mislabelled files (an `.xls` that is really `.xlsx` and so on).

use std::path::Path;

use crate::documents::error::DocumentError;
use crate::documents::types::{Extraction, FormatKind};

#[cfg(feature = "excel")]
pub fn extract(path: &Path) -> Result<Extraction, DocumentError> {
    use crate::documents::fallback::{first_success, Attempt};
    use tracing::info;

    let result = first_success([
        Attempt::new("extension_engine", || engine::by_extension(path)),
        Attempt::new("content_sniffing", || engine::sniffed(path)),
    ]);

    match result {
        Ok(success) => {
            info!(
                path = %path.display(),
                engine = success.strategy,
                sheets = success.value.blocks.len(),
                "Extracted Excel workbook"
            );
            Ok(success.value)
        }
        Err(exhausted) => Err(DocumentError::exhausted(
            FormatKind::Excel,
            "Failed to process Excel file with both engines",
            exhausted,
        )),
    }
}

#[cfg(not(feature = "excel"))]
pub fn extract(_path: &Path) -> Result<Extraction, DocumentError> {
    Err(DocumentError::MissingDependency {
        format: FormatKind::Excel,
        dependency: "calamine".to_string(),
    })
}

#[cfg(feature = "excel")]
mod engine {
    use calamine::{open_workbook, open_workbook_auto_from_rs, Data, Range, Reader, Xls, Xlsx};
    use std::io::{Cursor, Read, Seek};
    use std::path::Path;

    use crate::documents::error::DocumentError;
    use crate::documents::types::{extension_of, ContentBlock, Extraction, FormatKind};

    fn failure(message: impl std::fmt::Display) -> DocumentError {
        DocumentError::failure(FormatKind::Excel, message.to_string())
    }

    pub(super) fn by_extension(path: &Path) -> Result<Extraction, DocumentError> {
        match extension_of(path).as_str() {
            "xls" => {
                let mut workbook: Xls<_> = open_workbook(path).map_err(failure)?;
                read_sheets(&mut workbook, path)
            }
            _ => {
                let mut workbook: Xlsx<_> = open_workbook(path).map_err(failure)?;
                read_sheets(&mut workbook, path)
            }
        }
    }

    pub(super) fn sniffed(path: &Path) -> Result<Extraction, DocumentError> {
        let bytes = std::fs::read(path).map_err(failure)?;
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(failure)?;
        read_sheets(&mut workbook, path)
    }

    fn read_sheets<RS, R>(workbook: &mut R, path: &Path) -> Result<Extraction, DocumentError>
    where
        RS: Read + Seek,
        R: Reader<RS>,
        R::Error: std::fmt::Display,
    {
        let names = workbook.sheet_names();
        if names.is_empty() {
            return Err(failure("Workbook contains no sheets"));
        }

        let mut blocks = Vec::with_capacity(names.len());
        for name in names {
            let range = workbook.worksheet_range(&name).map_err(failure)?;
            blocks.push(
                ContentBlock::new(render_sheet(&name, &range), path.display().to_string(), FormatKind::Excel)
                    .with_extra("sheet", name),
            );
        }
        Ok(Extraction::new(blocks))
    }

    /// `Sheet: <name>` followed by one line per row, cells joined by ` | `
    pub(super) fn render_sheet(name: &str, range: &Range<Data>) -> String {
        let mut out = format!("Sheet: {}\n", name);
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            out.push_str(&cells.join(" | "));
            out.push('\n');
        }
        out.push('\n');
        out
    }
}
