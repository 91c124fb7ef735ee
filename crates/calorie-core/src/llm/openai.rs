//! OpenAI-compatible provider using the Chat Completions API.
//!
//! Sends the image via data URL in the user message content array. The
//! endpoint is configurable so any compatible server works.

use super::provider::{check_status, request_error, LlmProvider, LlmRequest, LlmResponse};
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    endpoint: String,
    api_key: Option<String>,
    key_env_var: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        key_env_var: &str,
        model: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key,
            key_env_var: key_env_var.to_string(),
            model: model.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AnalysisError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AnalysisError::Llm {
                message: format!("OpenAI API key not set. Set {} env var.", self.key_env_var),
                status_code: None,
            });
        };
        let start = Instant::now();

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                    ChatContent::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| request_error("OpenAI", e, self.timeout()))?;

        let resp = check_status("OpenAI", resp).await?;

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| AnalysisError::Llm {
            message: format!("Failed to parse OpenAI response: {e}"),
            status_code: None,
        })?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AnalysisError::Llm {
                message: "OpenAI returned no content".to_string(),
                status_code: None,
            })?;

        Ok(LlmResponse {
            text,
            model: chat_resp.model,
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ImagePart;
    use crate::llm::AnalyzeOptions;
    use crate::prompt::ANALYSIS_PROMPT;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> LlmRequest {
        LlmRequest::new(
            ImagePart {
                mime_type: "image/jpeg".to_string(),
                data: vec![1, 2, 3],
            },
            ANALYSIS_PROMPT,
            &AnalyzeOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_generate_sends_data_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{
                    "role": "user",
                    "content": [{
                        "type": "image_url",
                        "image_url": { "url": "data:image/jpeg;base64,AQID" }
                    }]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{ "message": { "content": "TOTAL CALORIES: 300" } }],
                "usage": { "total_tokens": 50 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(
            &format!("{}/v1/chat/completions", server.uri()),
            Some("sk-test".to_string()),
            "OPENAI_API_KEY",
            "gpt-4o-mini",
            Duration::from_secs(5),
        );
        let response = provider.generate(&request()).await.unwrap();
        assert_eq!(response.text, "TOTAL CALORIES: 300");
        assert_eq!(response.tokens_used, Some(50));
    }

    #[tokio::test]
    async fn test_missing_key_names_configured_variable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(
            &server.uri(),
            None,
            "AZURE_OPENAI_KEY",
            "gpt-4o-mini",
            Duration::from_secs(5),
        );
        let err = provider.generate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("AZURE_OPENAI_KEY"));
        assert!(!err.to_string().contains("OPENAI_API_KEY"));
    }
}
