use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::models::LlmConfig;

/// Chat-completion client used to synthesize solver programs
#[derive(Clone)]
pub struct SynthesisClient {
    client: Client,
    config: LlmConfig,
    token: String,
}

/// Chat message for the completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Request body for the chat completions endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

/// Response body; only the fields we read are modelled
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl SynthesisClient {
    /// Create a new client with the given configuration and bearer token
    pub fn new(config: LlmConfig, token: impl Into<String>) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PipelineError::SynthesisUnavailable(e.to_string()))?;

        Ok(Self { client, config, token: token.into() })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send one completion request and return the first choice's content.
    ///
    /// Transport errors and non-2xx statuses are `SynthesisUnavailable`; a body
    /// without `choices[0].message.content` is `MalformedCompletion`.
    pub async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, PipelineError> {
        let request = CompletionRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
        };

        debug!("Sending completion request to {}", self.config.url);
        debug!("Using model: {}, max_tokens: {}", self.config.model, self.config.max_tokens);

        let response = self
            .client
            .post(&self.config.url)
            .header(ACCEPT, "*/*")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::SynthesisUnavailable(format!(
                "HTTP {}: {}",
                status,
                truncate(&message, 200)
            )));
        }

        let body = response.text().await?;
        let content = parse_completion(&body)?;

        info!("Generated {} characters", content.len());
        Ok(content)
    }
}

/// Pull `choices[0].message.content` out of a completion body
pub fn parse_completion(body: &str) -> Result<String, PipelineError> {
    let parsed: CompletionResponse = serde_json::from_str(body).map_err(|e| {
        PipelineError::MalformedCompletion(format!("{} - {}", e, truncate(body, 200)))
    })?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::MalformedCompletion("response has no choices".to_string()))?;

    choice.message.content.ok_or_else(|| {
        PipelineError::MalformedCompletion("first choice has no message content".to_string())
    })
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_constructors() {
        let sys = ChatMessage::system("You are helpful");
        assert_eq!(sys.role, "system");
        assert_eq!(sys.content, "You are helpful");

        let user = ChatMessage::user("Hello");
        assert_eq!(user.role, "user");
        assert_eq!(user.content, "Hello");
    }

    #[test]
    fn test_completion_request_serialization() {
        let request = CompletionRequest {
            model: "openai/gpt-4.1-nano",
            max_tokens: 1000,
            messages: vec![ChatMessage::system("Be helpful"), ChatMessage::user("Hello")],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"openai/gpt-4.1-nano\""));
        assert!(json.contains("\"max_tokens\":1000"));
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_parse_completion_first_choice() {
        let body = r#"{
            "id": "gen-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "print('first')"}},
                {"index": 1, "message": {"role": "assistant", "content": "print('second')"}}
            ]
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "print('first')");
    }

    #[test]
    fn test_parse_completion_missing_choices() {
        let err = parse_completion(r#"{"error": {"message": "quota"}}"#).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedCompletion(_)));
    }

    #[test]
    fn test_parse_completion_empty_choices() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedCompletion(ref m) if m.contains("no choices")));
    }

    #[test]
    fn test_parse_completion_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let err = parse_completion(body).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedCompletion(ref m) if m.contains("content")));
    }

    #[test]
    fn test_parse_completion_not_json() {
        let err = parse_completion("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedCompletion(ref m) if m.contains("Bad Gateway")));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
