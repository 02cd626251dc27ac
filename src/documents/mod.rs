//! Document extraction.
//!
//! ```text
//!  file ──► FormatKind::from_path ──► extractor ──► Vec<ContentBlock>
//!                                       │
//!                                       └── fallback chain (first_success)
//! ```
//!
//! Extractors are plain blocking functions; [`DocumentProcessor`] moves them
//! onto the blocking pool and turns their errors into state.

pub mod converter;
pub mod error;
pub mod extractors;
pub mod fallback;
pub mod processor;
pub mod types;

pub use converter::{ConverterLocator, Pandoc};
pub use error::DocumentError;
pub use fallback::{first_success, Attempt, FallbackExhausted};
pub use processor::DocumentProcessor;
pub use types::{ContentBlock, DocumentMetadata, Extraction, FormatKind};
