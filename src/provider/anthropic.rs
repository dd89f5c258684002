// src/provider/anthropic.rs — Anthropic Messages API completion service

use async_trait::async_trait;
use std::time::Duration;

use super::CompletionService;
use crate::infra::config::ProviderConfig;
use crate::infra::errors::ProfessorError;
use crate::session::{Message, Role};

const PROVIDER_ID: &str = "anthropic";

pub struct AnthropicService {
    api_key: String,
    model: String,
    max_tokens: u32,
    api_url: String,
    client: reqwest::Client,
}

impl AnthropicService {
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self, ProfessorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProfessorError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_url: config.base_url.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request_body(&self, history: &[Message], system_prompt: &str) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = history
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role() {
                        Role::User | Role::Tool => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": m.content(),
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
        });

        if !system_prompt.is_empty() {
            body["system"] = serde_json::json!(system_prompt);
        }

        body
    }
}

/// Concatenate the text blocks of a Messages API response.
fn extract_text(resp: &serde_json::Value) -> String {
    resp["content"]
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter(|c| c["type"] == "text")
                .filter_map(|c| c["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Turn a response body into the assistant reply. A response with no text
/// (only tool calls, or an empty text block) is not a usable reply.
fn reply_from_response(resp: &serde_json::Value) -> Result<Message, ProfessorError> {
    Message::assistant(extract_text(resp))
        .map_err(|_| ProfessorError::completion(PROVIDER_ID, "response contained no text"))
}

#[async_trait]
impl CompletionService for AnthropicService {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    async fn complete(
        &self,
        history: &[Message],
        system_prompt: &str,
    ) -> Result<Message, ProfessorError> {
        let body = self.build_request_body(history, system_prompt);

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProfessorError::completion(PROVIDER_ID, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProfessorError::completion(
                PROVIDER_ID,
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let resp: serde_json::Value = response.json().await.map_err(|e| {
            ProfessorError::completion(PROVIDER_ID, format!("Failed to parse response: {}", e))
        })?;

        tracing::debug!(
            "Completion: stop_reason={}",
            resp["stop_reason"].as_str().unwrap_or("unknown")
        );
        reply_from_response(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AnthropicService {
        AnthropicService::new("test-key".into(), &ProviderConfig::default()).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let history = vec![
            Message::user("hi").unwrap(),
            Message::assistant("hello").unwrap(),
            Message::new(Role::Tool, "exit 0").unwrap(),
        ];
        let body = service().build_request_body(&history, "Be kind.");

        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["system"], "Be kind.");
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["messages"][2]["role"], "user");
        assert_eq!(body["messages"][2]["content"], "exit 0");
    }

    #[test]
    fn test_request_body_omits_empty_system() {
        let body = service().build_request_body(&[Message::user("hi").unwrap()], "");
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_extract_text_joins_text_blocks() {
        let resp = serde_json::json!({
            "content": [
                {"type": "text", "text": "Hello, "},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": "world"}
            ]
        });
        assert_eq!(extract_text(&resp), "Hello, world");
    }

    #[test]
    fn test_extract_text_missing_content() {
        assert_eq!(extract_text(&serde_json::json!({})), "");
    }

    #[test]
    fn test_reply_from_response_text() {
        let resp = serde_json::json!({
            "content": [{"type": "text", "text": "A basis spans."}],
            "stop_reason": "end_turn"
        });
        let reply = reply_from_response(&resp).unwrap();
        assert_eq!(reply, Message::assistant("A basis spans.").unwrap());
    }

    #[test]
    fn test_reply_without_text_is_completion_error() {
        let cases = [
            serde_json::json!({"content": [{"type": "text", "text": ""}]}),
            serde_json::json!({"content": [{"type": "tool_use", "id": "t1", "name": "x", "input": {}}]}),
            serde_json::json!({"content": []}),
            serde_json::json!({}),
        ];
        for resp in &cases {
            let err = reply_from_response(resp).unwrap_err();
            assert!(
                matches!(err, ProfessorError::Completion { ref provider, .. } if provider == PROVIDER_ID),
                "expected Completion for {resp}"
            );
            assert!(err.is_retriable_completion());
        }
    }
}
