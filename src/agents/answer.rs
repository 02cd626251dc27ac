//! Answer Agent
//!
//! Second pipeline stage: turns the extracted blocks and the user's question
//! into an answer with a single chat-completion call.

use tracing::{debug, error, info, warn};

use crate::agents::state::ProcessingState;
use crate::documents::error::DocumentError;
use crate::documents::types::FormatKind;
use crate::llm::LLM;
use crate::types::{LLMMessage, LLMRequest};
use crate::utils::{char_len, preview, truncate_chars};

/// Question the upload endpoint sends to get the extracted text back verbatim
pub const RAW_CONTENT_QUESTION: &str =
    "Simply return the raw content of this document without any analysis or summary.";

/// Questions (lowercased) answered with the content itself instead of a model call
pub const RAW_CONTENT_TRIGGERS: [&str; 4] = [
    "simply return the raw content of this document without any analysis or summary.",
    "raw content",
    "show content",
    "extract content",
];

pub const RAW_CONTENT_LIMIT: usize = 8000;

/// Character budget for the document content sent to the model
pub const CONTEXT_CHAR_BUDGET: usize = 25000;

pub const NO_DOCUMENT_MESSAGE: &str =
    "I don't have any document content to analyze. Please upload a document first.";

pub const EMPTY_DOCUMENT_MESSAGE: &str = "The document appears to be empty or contains no extractable text content. \
     Please try uploading a different document format or check if the document contains actual text content \
     that can be extracted.";

pub const MISSING_API_KEY_MESSAGE: &str =
    "API key not configured. Please set the GROQ_API_KEY environment variable.";

const ANSWER_RULES: &str = "\
1. ONLY use information that is EXPLICITLY contained in the document content
2. If the answer cannot be found in the document, politely explain that you don't see that specific information in the current document, then try to be helpful by suggesting related information from the document that might be relevant or suggesting how the user might rephrase their question
3. Be precise and specific in your answers, quoting directly from the text when possible
4. For numerical data, provide exact values as they appear in the document
5. If a question asks for information about a person or topic that's in the document, list all available details from the document
6. Do NOT make assumptions, inferences, or provide information not present in the document
7. For questions that are related to the document but where the exact answer isn't directly stated, explain what relevant information IS available in the document
8. NEVER respond with \"I cannot find any information about X in the document\" and stop there - always try to provide the most relevant information that IS available
9. If the document contains complex data (such as tables or numbers), make sure to convey this information clearly and accurately
10. Assume the user has not seen the document content, so provide COMPLETE information";

pub fn is_raw_content_request(question: &str) -> bool {
    let normalized = question.trim().to_lowercase();
    RAW_CONTENT_TRIGGERS.contains(&normalized.as_str())
}

fn system_instruction(label: &str) -> String {
    format!(
        "You are a document analysis assistant specialized in answering questions about {label}s.\n\
         Your task is to analyze the provided document content and answer questions about it EXACTLY as it \
         appears in the document.\n\
         Follow these rules strictly:\n{ANSWER_RULES}"
    )
}

fn user_prompt(context: &str, question: &str) -> String {
    format!(
        "Document Content:\n\n{}\n\nQuestion: {}\n\nPlease provide a precise answer based only on the document content above.",
        context, question
    )
}

#[derive(Clone)]
pub struct AnswerAgent {
    llm: Option<LLM>,
}

impl AnswerAgent {
    /// `llm` is `None` when no API key is configured
    pub fn new(llm: Option<LLM>) -> Self {
        Self { llm }
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Fills `state.answer`. Never fails: problems become answer prose.
    pub async fn answer_question(&self, state: ProcessingState) -> ProcessingState {
        let format = match state.blocks.as_deref() {
            Some([first, ..]) => first.format_tag,
            _ => return state.with_answer(NO_DOCUMENT_MESSAGE),
        };

        let content = state.joined_text();
        debug!(
            preview = %preview(&content, 200),
            chars = char_len(&content),
            "Document content"
        );

        if content.trim().is_empty() {
            return state.with_answer(EMPTY_DOCUMENT_MESSAGE);
        }

        if is_raw_content_request(&state.question) {
            info!("Returning raw document content");
            let raw = truncate_chars(&content, RAW_CONTENT_LIMIT).to_string();
            return state.with_answer(raw);
        }

        let Some(llm) = &self.llm else {
            warn!("GROQ_API_KEY not set");
            return state.with_answer(MISSING_API_KEY_MESSAGE);
        };

        let answer = self.ask(llm, format, &content, &state.question).await;
        state.with_answer(answer)
    }

    async fn ask(&self, llm: &LLM, format: FormatKind, content: &str, question: &str) -> String {
        let context = truncate_chars(content, CONTEXT_CHAR_BUDGET);
        let request = LLMRequest {
            model: llm.model().to_string(),
            messages: vec![LLMMessage::user(user_prompt(context, question))],
            max_tokens: None,
            temperature: None,
            system_instruction: Some(system_instruction(format.label())),
        };

        info!(
            model = %llm.model(),
            file_type = %format,
            context_chars = char_len(context),
            "Requesting answer"
        );

        match llm.create_chat_completion(&request).await {
            Ok(response) => {
                info!(
                    answer_len = response.content.len(),
                    tokens = response.usage.total_tokens,
                    "Answer generated"
                );
                response.content
            }
            Err(e) => {
                error!(error = %e, "Error generating answer");
                DocumentError::UpstreamModelFailure(e.to_string()).user_message()
            }
        }
    }
}
