//! Agent System
//!
//! The document QA pipeline is two agents run in a fixed order over one
//! [`ProcessingState`]:
//!
//! - **Document Processor**: extracts text blocks from the uploaded file
//! - **Answer Agent**: answers the question from those blocks with one LLM call
//!
//! ## Pipeline Overview
//!
//! ```text
//! Question + Document
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Process    │  → Extracts content blocks (or records an error)
//! │  Document   │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Answer    │  → Raw content, setup hint, or model answer
//! │  Question   │
//! └─────────────┘
//!      │
//!      ▼
//!    Answer
//! ```

pub mod answer;
pub mod pipeline;
pub mod state;

pub use answer::{AnswerAgent, RAW_CONTENT_QUESTION};
pub use pipeline::{DocumentQaAgent, PipelineError};
pub use state::{DocumentInput, ProcessingState};
