// Groq adapter implementation
// Groq serves an OpenAI-compatible chat completions API.
// API Reference: https://console.groq.com/docs/api-reference#chat

use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

pub struct GroqAdapter {
    client: Client,
    api_key: String,
    api_base: String,
}

// Request types for the chat completions API
#[derive(Serialize)]
struct GroqChatRequest<'a> {
    model: &'a str,
    messages: Vec<GroqMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Serialize)]
struct GroqMessage<'a> {
    role: &'a str,
    content: &'a str,
}

// Response types
#[derive(Deserialize)]
struct GroqChatResponse {
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: Option<GroqUsage>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GroqResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct GroqErrorResponse {
    error: GroqError,
}

#[derive(Deserialize)]
struct GroqError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

impl GroqAdapter {
    /// Create an adapter against the public Groq endpoint
    pub fn new(api_key: &str) -> Self {
        Self::with_api_base(api_key, GROQ_API_BASE)
    }

    /// Create an adapter against any OpenAI-compatible base URL
    pub fn with_api_base(api_key: &str, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// The system instruction travels as the first message
    fn wire_messages(request: &LLMRequest) -> Vec<GroqMessage<'_>> {
        let system = request
            .system_instruction
            .as_deref()
            .map(|content| GroqMessage { role: "system", content });

        system
            .into_iter()
            .chain(request.messages.iter().map(|m| GroqMessage {
                role: m.role.as_str(),
                content: m.content.as_str(),
            }))
            .collect()
    }
}

#[async_trait]
impl LLMAdapter for GroqAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let body = GroqChatRequest {
            model: &request.model,
            messages: Self::wire_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMApi(format!("Groq request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<GroqErrorResponse>(&error_text) {
                return Err(AppError::LLMApi(format!(
                    "Groq API error ({}): {} (type: {})",
                    status,
                    error_response.error.message,
                    error_response.error.error_type.unwrap_or_else(|| "unknown".to_string())
                )));
            }

            return Err(AppError::LLMApi(format!(
                "Groq API error ({}): {}",
                status, error_text
            )));
        }

        let groq_response: GroqChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMApi(format!("Failed to parse Groq response: {}", e)))?;

        let choice = groq_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLMApi("Groq returned no choices".to_string()))?;

        let usage = groq_response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LLMMessage;
    use mockito::Matcher;

    fn request() -> LLMRequest {
        LLMRequest {
            model: GROQ_DEFAULT_MODEL.to_string(),
            messages: vec![LLMMessage::user("What is the revenue?")],
            max_tokens: None,
            temperature: None,
            system_instruction: Some("Answer from the document only.".to_string()),
        }
    }

    #[test]
    fn test_api_base_normalized() {
        let adapter = GroqAdapter::with_api_base("key", "http://localhost:1234/v1/");
        assert_eq!(adapter.completions_url(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(
            GroqAdapter::new("key").completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_system_instruction_is_first_message() {
        let req = request();
        let messages = GroqAdapter::wire_messages(&req);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "Answer from the document only.");
        assert_eq!(messages[1].role, "user");
    }

    #[tokio::test]
    async fn test_chat_completion_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk_test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"chatcmpl-1","choices":[{"index":0,"message":{"role":"assistant","content":"The revenue is $42,000."},"finish_reason":"stop"}],"usage":{"prompt_tokens":12,"completion_tokens":7,"total_tokens":19}}"#,
            )
            .create_async()
            .await;

        let adapter = GroqAdapter::with_api_base("gsk_test", &server.url());
        let response = adapter.create_chat_completion(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "The revenue is $42,000.");
        assert_eq!(response.finish_reason, "stop");
        assert_eq!(response.usage.total_tokens, 19);
    }

    #[tokio::test]
    async fn test_chat_completion_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#)
            .create_async()
            .await;

        let adapter = GroqAdapter::with_api_base("bad", &server.url());
        let err = adapter.create_chat_completion(&request()).await.unwrap_err();

        match err {
            AppError::LLMApi(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Invalid API Key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_completion_without_choices() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let adapter = GroqAdapter::with_api_base("gsk_test", &server.url());
        let err = adapter.create_chat_completion(&request()).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
