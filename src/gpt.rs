use async_trait::async_trait;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EndpointConfig;
use crate::error::{GiftError, Result};

pub const MAX_TOKENS: u32 = 512;

#[derive(Serialize, Debug, Clone)]
pub struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    max_tokens: u32,
    enable_thinking: bool,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, system: &'a str, user: &'a str) -> Self {
        ChatRequest {
            model,
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            stream: false,
            max_tokens: MAX_TOKENS,
            enable_thinking: false,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}
impl<'a> ChatMessage<'a> {
    pub fn system(content: &'a str) -> Self {
        ChatMessage {
            role: "system",
            content,
        }
    }
    pub fn user(content: &'a str) -> Self {
        ChatMessage {
            role: "user",
            content,
        }
    }
}

/// Only the part of the completion body we read; everything else is ignored.
#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}
impl ChatResponse {
    fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize, Debug)]
struct ReplyMessage {
    content: Option<String>,
}

/// Something that can turn a system/user prompt pair into reply text.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Checked before a prompt is built; nothing is sent when this fails.
    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct GptClient {
    config: EndpointConfig,
    client: Client,
}
impl GptClient {
    pub fn new(config: &EndpointConfig) -> GptClient {
        GptClient {
            config: config.clone(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Recommender for GptClient {
    fn preflight(&self) -> Result<()> {
        self.config.ensure_api_key()
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        self.preflight()?;

        let EndpointConfig {
            url,
            api_key,
            model,
        } = &self.config;
        let body = ChatRequest::new(model, system, user);
        debug!(url = %url, model = %model, "sending completion request");

        let res = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!("completion request failed: {e}");
                GiftError::request(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            debug!("API returned {status}: {text}");
            return Err(GiftError::request(status.to_string()));
        }

        let text = res
            .text()
            .await
            .map_err(|e| GiftError::request(e.to_string()))?;
        debug!("raw completion body: {text}");

        serde_json::from_str::<ChatResponse>(&text)
            .map_err(|e| GiftError::response_format(e.to_string()))?
            .into_content()
            .ok_or_else(|| GiftError::response_format("missing choices[0].message.content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_format() {
        let request = ChatRequest::new("Qwen/Qwen3-8B", "sys", "usr");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "Qwen/Qwen3-8B",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"}
                ],
                "stream": false,
                "max_tokens": 512,
                "enable_thinking": false
            })
        );
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"1. 书签 - 文艺"}}],"usage":{}}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_content().as_deref(), Some("1. 书签 - 文艺"));
    }

    #[test]
    fn missing_shape_has_no_content() {
        for body in [
            "{}",
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{"role":"assistant"}}]}"#,
        ] {
            let response: ChatResponse = serde_json::from_str(body).unwrap();
            assert!(response.into_content().is_none(), "{body}");
        }
    }

    #[tokio::test]
    async fn empty_api_key_fails_before_sending() {
        let config = EndpointConfig {
            url: "http://127.0.0.1:9/unreachable".to_owned(),
            api_key: String::new(),
            model: "m".to_owned(),
        };
        let err = GptClient::new(&config)
            .generate("sys", "usr")
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn whitespace_api_key_fails_before_sending() {
        let config = EndpointConfig {
            url: "http://127.0.0.1:9/unreachable".to_owned(),
            api_key: "   ".to_owned(),
            model: "m".to_owned(),
        };
        let client = GptClient::new(&config);
        assert!(client.preflight().unwrap_err().is_configuration());
        let err = client.generate("sys", "usr").await.unwrap_err();
        assert!(err.is_configuration());
    }
}
