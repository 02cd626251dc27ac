use crate::documents::fallback::{AttemptFailure, FallbackExhausted};
use crate::documents::types::FormatKind;

pub const PANDOC_INSTALL_URL: &str = "https://pandoc.org/installing.html";

/// Everything that can go wrong between receiving a document and answering.
///
/// Stored on the processing state instead of propagated, so every variant must
/// be cheap to clone and render as prose for the end user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("{0}")]
    EmptyOrMissingContent(String),

    #[error("Error processing {format} file: {message}")]
    ExtractionFailure {
        format: FormatKind,
        message: String,
        /// Attempts of an exhausted fallback chain, in the order they ran
        causes: Vec<AttemptFailure>,
    },

    #[error("Missing required dependency '{dependency}' for {format} processing")]
    MissingDependency {
        format: FormatKind,
        dependency: String,
    },

    #[error("{tool} not found. Please install {tool} from {url} or set PANDOC_PATH to its location.", url = PANDOC_INSTALL_URL)]
    MissingExternalTool { tool: String },

    #[error("{0}")]
    UpstreamModelFailure(String),
}

impl DocumentError {
    pub fn failure(format: FormatKind, message: impl Into<String>) -> Self {
        DocumentError::ExtractionFailure {
            format,
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Failure of a whole fallback chain; the summary of every attempt is
    /// appended to `message`.
    pub fn exhausted(format: FormatKind, message: impl Into<String>, exhausted: FallbackExhausted) -> Self {
        DocumentError::ExtractionFailure {
            format,
            message: format!("{} ({})", message.into(), exhausted),
            causes: exhausted.failures,
        }
    }

    /// Actionable prose for the person who uploaded the document
    pub fn user_message(&self) -> String {
        match self {
            DocumentError::MissingDependency { format: FormatKind::Excel, dependency } => format!(
                "I encountered an error while processing your Excel file. The server was built without \
                 the '{}' spreadsheet engine which is required for Excel support. Please contact the \
                 administrator to rebuild the server with the `excel` feature enabled.",
                dependency
            ),
            DocumentError::MissingDependency { format, dependency } => format!(
                "I encountered an error while processing your {} file. The server was built without \
                 '{}', which is required for this format. Please contact the administrator.",
                format, dependency
            ),
            DocumentError::MissingExternalTool { tool } => format!(
                "I encountered an error while processing your document. The server is missing {tool}, \
                 which is required for PowerPoint and older Word (.doc) support. {tool} is a separate \
                 program that needs to be installed on the system. Please ask the administrator to \
                 install it from {PANDOC_INSTALL_URL}"
            ),
            DocumentError::ExtractionFailure { format: FormatKind::Excel, .. } => format!(
                "I encountered an error while processing your Excel file. Please make sure your Excel \
                 file is not password-protected or corrupted. The specific error was: {}",
                self
            ),
            DocumentError::ExtractionFailure { format: FormatKind::PowerPoint, .. } => format!(
                "I encountered an error while processing your PowerPoint file. Please make sure your \
                 PowerPoint file is not password-protected or corrupted. The specific error was: {}",
                self
            ),
            DocumentError::UnsupportedFormat { .. }
            | DocumentError::EmptyOrMissingContent(_)
            | DocumentError::ExtractionFailure { .. }
            | DocumentError::UpstreamModelFailure(_) => format!(
                "I apologize, but I encountered an error while processing your question: {}",
                self
            ),
        }
    }
}
