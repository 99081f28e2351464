//! OpenAI-compatible chat completions responder.
//!
//! Works with any endpoint implementing `POST {base_url}/chat/completions`
//! (OpenAI, Azure-style proxies, vLLM, llama.cpp server, Ollama's
//! OpenAI shim, ...).

use super::prompt_with_context;
use async_trait::async_trait;
use deliberation_application::{Responder, ResponderError};
use deliberation_domain::{Generation, GenerationContext, PromptTemplate, ResponderInfo};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Upper bound on an error body echoed into an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    completion_tokens: Option<usize>,
}

pub struct OpenAiCompatibleResponder {
    info: ResponderInfo,
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl OpenAiCompatibleResponder {
    pub fn new(info: ResponderInfo, client: reqwest::Client, model: impl Into<String>) -> Self {
        Self {
            info,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, user_content: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: PromptTemplate::initial_system(),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Map a non-success HTTP status to a responder error
fn status_error(status: StatusCode, body: &str) -> ResponderError {
    let body: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
    if status == StatusCode::TOO_MANY_REQUESTS {
        ResponderError::RateLimited(body)
    } else {
        ResponderError::Provider(format!("HTTP {}: {}", status.as_u16(), body))
    }
}

/// Extract the reply text and completion token count from a response body
fn parse_completion(body: &str) -> Result<(String, Option<usize>), ResponderError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ResponderError::InvalidResponse(format!("malformed completion: {}", e)))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ResponderError::InvalidResponse("completion has no content".into()))?;

    let tokens = response.usage.and_then(|u| u.completion_tokens);
    Ok((text, tokens))
}

#[async_trait]
impl Responder for OpenAiCompatibleResponder {
    fn info(&self) -> &ResponderInfo {
        &self.info
    }

    async fn generate(
        &self,
        prompt: &str,
        context: Option<&GenerationContext>,
    ) -> Result<Generation, ResponderError> {
        let start = Instant::now();
        let content = prompt_with_context(prompt, context);

        let mut request = self
            .client
            .post(self.endpoint())
            .json(&self.request_body(&content));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ResponderError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ResponderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let (text, tokens) = parse_completion(&body)?;
        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(
            "{} answered in {}ms ({:?} completion tokens)",
            self.info.id, latency_ms, tokens
        );

        let generation = Generation::new(text, latency_ms);
        Ok(match tokens {
            Some(n) => generation.with_token_count(n),
            None => generation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder() -> OpenAiCompatibleResponder {
        OpenAiCompatibleResponder::new(
            ResponderInfo::new("gpt", "GPT", "openai"),
            reqwest::Client::new(),
            "gpt-4o-mini",
        )
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let r = responder().with_base_url("http://localhost:8080/v1/");
        assert_eq!(r.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(
            responder().endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let r = responder().with_max_tokens(Some(256));
        let body = serde_json::to_value(r.request_body("Q?")).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Q?");
        assert_eq!(body["max_tokens"], 256);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_parse_completion_with_usage() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Use a queue."}}],
            "usage": {"prompt_tokens": 20, "completion_tokens": 4, "total_tokens": 24}
        }"#;
        let (text, tokens) = parse_completion(body).unwrap();
        assert_eq!(text, "Use a queue.");
        assert_eq!(tokens, Some(4));
    }

    #[test]
    fn test_parse_completion_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "ok"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), ("ok".to_string(), None));
    }

    #[test]
    fn test_parse_completion_rejects_empty() {
        assert!(matches!(
            parse_completion(r#"{"choices": []}"#),
            Err(ResponderError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices": [{"message": {"content": "  "}}]}"#),
            Err(ResponderError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_completion("not json"),
            Err(ResponderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, ResponderError::RateLimited(_)));
        assert!(err.is_retryable());

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert_eq!(err, ResponderError::Provider("HTTP 500: oops".into()));
        assert!(!err.is_retryable());
    }
}
