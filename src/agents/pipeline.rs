//! Document QA pipeline: a fixed two-node workflow stepped through
//! explicitly.

use tracing::{error, info};

use crate::agents::answer::AnswerAgent;
use crate::agents::state::{DocumentInput, ProcessingState};
use crate::config::Config;
use crate::documents::processor::DocumentProcessor;
use crate::llm::LLM;
use crate::utils::char_len;

/// Upper bound on workflow steps
pub const RECURSION_LIMIT: usize = 50;

/// Minimum length of pre-extracted text accepted by [`DocumentQaAgent::run`]
const MIN_TEXT_INPUT_CHARS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Recursion limit of {0} reached without hitting a stop condition")]
    RecursionLimit(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    ProcessDocument,
    AnswerQuestion,
    End,
}

impl Node {
    fn next(self) -> Node {
        match self {
            Node::ProcessDocument => Node::AnswerQuestion,
            Node::AnswerQuestion | Node::End => Node::End,
        }
    }
}

#[derive(Clone)]
pub struct DocumentQaAgent {
    processor: DocumentProcessor,
    answerer: AnswerAgent,
}

impl DocumentQaAgent {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            DocumentProcessor::new(&config.documents),
            AnswerAgent::new(LLM::from_config(&config.llm)),
        )
    }

    pub fn with_parts(processor: DocumentProcessor, answerer: AnswerAgent) -> Self {
        Self { processor, answerer }
    }

    pub fn has_llm(&self) -> bool {
        self.answerer.has_llm()
    }

    /// Run `process_document → answer_question → end`.
    ///
    /// The answer stage does not look at `state.error`; it only notices that
    /// there are no blocks. Once the workflow ends, a recorded error clears
    /// whatever answer was produced.
    pub async fn invoke(&self, mut state: ProcessingState) -> Result<ProcessingState, PipelineError> {
        let mut node = Node::ProcessDocument;
        let mut steps = 0;

        while node != Node::End {
            if steps >= RECURSION_LIMIT {
                return Err(PipelineError::RecursionLimit(RECURSION_LIMIT));
            }
            state = match node {
                Node::ProcessDocument => self.processor.process_document(state).await,
                Node::AnswerQuestion => self.answerer.answer_question(state).await,
                Node::End => state,
            };
            node = node.next();
            steps += 1;
        }

        if state.error.is_some() {
            state.answer = None;
        }
        Ok(state)
    }

    /// Answer `question` about `input` and always return user-facing text
    pub async fn run(&self, question: &str, input: DocumentInput) -> String {
        match &input {
            DocumentInput::Text(text) if char_len(text) < MIN_TEXT_INPUT_CHARS => {
                return "The provided document content is too short or empty. Please upload a valid document."
                    .to_string();
            }
            DocumentInput::File(path) if !path.exists() => {
                return format!("File not found: {}. Please upload a valid document.", path.display());
            }
            _ => {}
        }

        info!(question_len = question.len(), "Running document QA pipeline");
        let state = match self.invoke(ProcessingState::new(question, input)).await {
            Ok(state) => state,
            Err(e) => {
                error!(error = %e, "Pipeline failed");
                return format!("An error occurred while processing your request: {}", e);
            }
        };

        if let Some(e) = &state.error {
            return format!("Error processing document: {}", e);
        }

        match state.answer {
            Some(answer) if !answer.trim().is_empty() => answer,
            _ => "No answer could be generated. Please try rephrasing your question or upload a different document."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::answer::{EMPTY_DOCUMENT_MESSAGE, NO_DOCUMENT_MESSAGE};
    use crate::documents::error::DocumentError;
    use crate::test_support::{stub_agent, StubAdapter};

    #[test]
    fn test_node_order() {
        assert_eq!(Node::ProcessDocument.next(), Node::AnswerQuestion);
        assert_eq!(Node::AnswerQuestion.next(), Node::End);
    }

    #[tokio::test]
    async fn test_text_input_answered() {
        let adapter = StubAdapter::replying("Revenue in Q3 was 42,000 EUR.");
        let agent = stub_agent(&adapter);

        let answer = agent
            .run(
                "What was the revenue?",
                DocumentInput::Text("Quarterly report: revenue in Q3 was 42,000 EUR.".to_string()),
            )
            .await;
        assert!(answer.contains("42,000"));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_error_clears_answer() {
        let adapter = StubAdapter::replying("should not survive");
        let agent = stub_agent(&adapter);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let state = agent
            .invoke(ProcessingState::new("What?", DocumentInput::File(path)))
            .await
            .unwrap();
        assert!(matches!(state.error, Some(DocumentError::UnsupportedFormat { .. })));
        assert!(state.answer.is_none());
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn test_answer_stage_runs_despite_error() {
        let adapter = StubAdapter::replying("unused");
        let agent = stub_agent(&adapter);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.zip");
        std::fs::write(&path, b"PK").unwrap();

        // The answer stage only sees missing blocks; its reply is discarded afterwards
        let state = ProcessingState::new("What?", DocumentInput::File(path));
        let processed = agent.processor.process_document(state).await;
        let answered = agent.answerer.answer_question(processed).await;
        assert_eq!(answered.answer.as_deref(), Some(NO_DOCUMENT_MESSAGE));
        assert!(answered.error.is_some());
    }

    #[tokio::test]
    async fn test_run_messages() {
        let adapter = StubAdapter::replying("unused");
        let agent = stub_agent(&adapter);

        let short = agent.run("What?", DocumentInput::Text("tiny".to_string())).await;
        assert!(short.starts_with("The provided document content is too short"));

        // Length is counted before trimming; blank text reaches the answer stage
        let blank = agent.run("What?", DocumentInput::Text(" ".repeat(12))).await;
        assert_eq!(blank, EMPTY_DOCUMENT_MESSAGE);
        assert_eq!(adapter.calls(), 0);

        let missing = agent
            .run("What?", DocumentInput::File("/nonexistent/report.pdf".into()))
            .await;
        assert_eq!(missing, "File not found: /nonexistent/report.pdf. Please upload a valid document.");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"\x89PNG").unwrap();
        let failed = agent.run("What?", DocumentInput::File(path)).await;
        assert_eq!(failed, "Error processing document: Unsupported file type: .png");
    }

    #[tokio::test]
    async fn test_empty_model_reply() {
        let adapter = StubAdapter::replying("   ");
        let agent = stub_agent(&adapter);

        let answer = agent
            .run("What?", DocumentInput::Text("A document with enough text.".to_string()))
            .await;
        assert!(answer.starts_with("No answer could be generated"));
    }
}
