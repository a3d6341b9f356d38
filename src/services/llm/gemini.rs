// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{LogContext, Transport, TransportError};
use crate::domain::{ChatRequest, ProviderProfile};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Generative Language `generateContent`.
pub struct GeminiTransport {
    client: Client,
    log: LogContext,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiTransport {
    pub fn new(client: Client, log: LogContext) -> Self {
        Self { client, log }
    }

    fn endpoint(base_url: &str, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn send(
        &self,
        profile: &ProviderProfile,
        request: &ChatRequest,
    ) -> Result<String, TransportError> {
        let url = Self::endpoint(&profile.base_url, &request.model);

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: request.prompt(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        if self.log.debug {
            debug!(url = %url, model = %request.model, "sending generateContent");
        }

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, profile.api_key().unwrap_or_default())
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), &text));
        }

        if self.log.debug {
            debug!(model = %request.model, body = %text, "generateContent response");
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))?;

        text_of(&value)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// `candidates[0].content.parts[*].text`, concatenated.
pub fn text_of(value: &Value) -> Result<String, TransportError> {
    let candidate = value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .ok_or_else(|| TransportError::UnexpectedShape("no candidates in response".into()))?;

    let parts = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| TransportError::UnexpectedShape("candidate has no content parts".into()))?;

    let mut text = String::new();
    for part in parts {
        let piece = part
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| TransportError::UnexpectedShape("content part is not text".into()))?;
        text.push_str(piece);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_strips_trailing_slash() {
        assert_eq!(
            GeminiTransport::endpoint("https://example.test/v1beta/", "gemini-1.5-flash-8b"),
            "https://example.test/v1beta/models/gemini-1.5-flash-8b:generateContent"
        );
    }

    #[test]
    fn joins_text_parts() {
        let value = json!({
            "candidates": [{"content": {"parts": [{"text": "Generated Commit Message:\n"}, {"text": "Add x"}]}}]
        });
        assert_eq!(text_of(&value).unwrap(), "Generated Commit Message:\nAdd x");
    }

    #[test]
    fn blocked_prompt_is_a_shape_error() {
        let value = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert!(matches!(
            text_of(&value),
            Err(TransportError::UnexpectedShape(_))
        ));
    }
}
