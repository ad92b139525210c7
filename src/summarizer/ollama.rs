//! Ollama chat API summarizer

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::config::OllamaConfig;

use super::Error;
use super::Result;
use super::SYSTEM_PROMPT;
use super::Summarizer;

/// Summarizer backed by the `/api/chat` endpoint of an Ollama server
#[derive(Clone, Debug)]
pub struct OllamaSummarizer {
    client: Client,
    chat_url: Url,
    model: String,
}

impl OllamaSummarizer {
    /// Create a summarizer for the configured server and model
    ///
    /// # Errors
    ///
    /// Will return `Err` when the HTTP client can not be built
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| Error::Request(err.to_string()))?;

        let chat_url = config
            .base_url
            .join("api/chat")
            .map_err(|err| Error::Request(err.to_string()))?;

        tracing::info!("Summaries via {chat_url} using model {}", config.model);

        Ok(Self {
            client,
            chat_url,
            model: config.model.clone(),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let start = Instant::now();

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status(status.as_u16(), body));
        }

        let response = response
            .json::<ChatResponse>()
            .await
            .map_err(|err| Error::Request(format!("Failed to parse response: {err}")))?;

        let summary = response
            .message
            .map(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(Error::EmptyResponse)?;

        tracing::debug!(
            "Summarized {} characters into {} in {}ms",
            text.len(),
            summary.len(),
            start.elapsed().as_millis()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::body_partial_json;
    use wiremock::matchers::method;
    use wiremock::matchers::path;

    use super::*;

    fn config_for(server: &MockServer) -> OllamaConfig {
        OllamaConfig {
            base_url: Url::parse(&server.uri()).unwrap(),
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
            manage_process: false,
            binary: "ollama".into(),
        }
    }

    #[tokio::test]
    async fn test_summarize() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "stream": false,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": "A very long text" },
                ],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "test-model",
                "message": { "role": "assistant", "content": "Short" },
                "done": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summarizer = OllamaSummarizer::new(&config_for(&server)).unwrap();

        let summary = summarizer.summarize("A very long text").await.unwrap();
        assert_eq!(summary, "Short");
    }

    #[tokio::test]
    async fn test_summarize_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let summarizer = OllamaSummarizer::new(&config_for(&server)).unwrap();

        let err = summarizer.summarize("Some text").await.unwrap_err();
        assert!(matches!(err, Error::Status(404, ref body) if body == "model not found"));
    }

    #[tokio::test]
    async fn test_summarize_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": "  " },
            })))
            .mount(&server)
            .await;

        let summarizer = OllamaSummarizer::new(&config_for(&server)).unwrap();

        let err = summarizer.summarize("Some text").await.unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }
}
