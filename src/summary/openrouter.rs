//! OpenRouter-compatible chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::SummaryClient;
use crate::config::SummaryConfig;
use crate::errors::SummarizationError;

/// Summarization client for any OpenAI-style chat-completions endpoint.
pub struct OpenRouterClient {
    client: Client,
    config: SummaryConfig,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenRouterClient {
    /// Create a new client from config. Fails only if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: SummaryConfig) -> Result<Self, SummarizationError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn build_request(&self, source: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.config.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("'''{source}'''"),
                },
            ],
        }
    }
}

#[async_trait]
impl SummaryClient for OpenRouterClient {
    async fn summarize(&self, source: &str) -> Result<String, SummarizationError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(source))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        first_content(parsed)
    }
}

fn first_content(response: ChatResponse) -> Result<String, SummarizationError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(SummarizationError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_content() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "A summary."}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_content(response).unwrap(), "A summary.");
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            first_content(response),
            Err(SummarizationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_request_wraps_source_in_quotes() {
        let client = OpenRouterClient::new(SummaryConfig::default()).unwrap();
        let request = client.build_request("print('hi')");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].content, "'''print('hi')'''");
    }
}
