// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use super::{LogContext, Transport, TransportError};
use crate::domain::{ChatRequest, ProviderProfile};

/// OpenAI-compatible chat completions (OpenRouter, OpenAI, Groq, Ollama).
pub struct OpenAiTransport {
    client: Client,
    log: LogContext,
}

impl OpenAiTransport {
    pub fn new(client: Client, log: LogContext) -> Self {
        Self { client, log }
    }
}

#[async_trait]
impl Transport for OpenAiTransport {
    async fn send(
        &self,
        profile: &ProviderProfile,
        request: &ChatRequest,
    ) -> Result<String, TransportError> {
        let mut builder = self
            .client
            .post(&profile.base_url)
            .header(CONTENT_TYPE, "application/json")
            .json(request);

        if let Some(key) = profile.api_key().filter(|k| !k.is_empty()) {
            builder = builder.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        if self.log.debug {
            debug!(url = %profile.base_url, model = %request.model, "sending chat completion");
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), &body));
        }

        if self.log.debug {
            debug!(model = %request.model, body = %body, "chat completion response");
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        content_of(&value)
    }

    fn name(&self) -> &str {
        "openai-chat"
    }
}

/// `choices[0].message.content` as a string.
pub fn content_of(value: &Value) -> Result<String, TransportError> {
    let choices = value
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| TransportError::UnexpectedShape("missing `choices` array".into()))?;

    let first = choices
        .first()
        .ok_or_else(|| TransportError::UnexpectedShape("empty `choices` array".into()))?;

    let message = first
        .get("message")
        .filter(|m| m.is_object())
        .ok_or_else(|| TransportError::UnexpectedShape("choice has no `message` object".into()))?;

    message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TransportError::UnexpectedShape("`message.content` is not a string".into()))
}
