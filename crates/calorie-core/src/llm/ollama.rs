//! Ollama provider for local vision model inference.
//!
//! Talks to a local Ollama instance via `/api/generate`. No key needed.

use super::provider::{check_status, request_error, LlmProvider, LlmRequest, LlmResponse};
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Ollama provider for local vision model inference.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct GenerateBody {
    model: String,
    prompt: String,
    images: Vec<String>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateReply {
    response: String,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        match self.client.get(&url).timeout(Duration::from_secs(5)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AnalysisError> {
        let url = format!("{}/api/generate", self.endpoint);
        let start = Instant::now();

        let body = GenerateBody {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            images: vec![request.image.to_base64()],
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| request_error("Ollama", e, self.timeout()))?;

        let resp = check_status("Ollama", resp).await?;

        let reply: GenerateReply = resp.json().await.map_err(|e| AnalysisError::Llm {
            message: format!("Failed to parse Ollama response: {e}"),
            status_code: None,
        })?;

        if reply.response.trim().is_empty() {
            return Err(AnalysisError::Llm {
                message: "Ollama returned empty response".to_string(),
                status_code: None,
            });
        }

        let tokens_used = token_total(reply.prompt_eval_count, reply.eval_count);

        Ok(LlmResponse {
            text: reply.response,
            model: self.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Prompt plus completion tokens, when Ollama reports the completion count.
fn token_total(prompt: Option<u32>, completion: Option<u32>) -> Option<u32> {
    match (prompt, completion) {
        (Some(p), Some(e)) => Some(p.saturating_add(e)),
        (None, Some(e)) => Some(e),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ImagePart;
    use crate::llm::AnalyzeOptions;
    use crate::prompt::ANALYSIS_PROMPT;

    #[test]
    fn test_token_total_saturates() {
        assert_eq!(token_total(Some(10), Some(20)), Some(30));
        assert_eq!(token_total(Some(u32::MAX), Some(5)), Some(u32::MAX));
        assert_eq!(token_total(None, Some(7)), Some(7));
        assert_eq!(token_total(Some(7), None), None);
    }
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_posts_base64_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3.2-vision",
                "images": ["AQID"],
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "FOOD ITEMS:\n1. Rice - 200",
                "prompt_eval_count": 10,
                "eval_count": 20
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri(), "llama3.2-vision", Duration::from_secs(5));
        let request = LlmRequest::new(
            ImagePart {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            },
            ANALYSIS_PROMPT,
            &AnalyzeOptions::default(),
        );

        let response = provider.generate(&request).await.unwrap();
        assert_eq!(response.text, "FOOD ITEMS:\n1. Rice - 200");
        assert_eq!(response.tokens_used, Some(30));
    }

    #[tokio::test]
    async fn test_is_available_checks_tags_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "models": [] })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri(), "llama3.2-vision", Duration::from_secs(5));
        assert!(provider.is_available().await);
    }
}
