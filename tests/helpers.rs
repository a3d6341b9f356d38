// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::time::Duration;

use gitcomm::config::Provider;
use gitcomm::domain::{Dialect, ProviderProfile};
use secrecy::SecretString;

/// OpenAI-dialect profile pointed at a mock server's chat endpoint
#[allow(dead_code)]
pub fn openai_profile(server_url: &str, models: &[&str]) -> ProviderProfile {
    ProviderProfile {
        provider: Provider::OpenRouter,
        dialect: Dialect::OpenAiChat,
        base_url: format!("{server_url}/chat/completions"),
        api_key: Some(SecretString::from("test-key".to_string())),
        models: models.iter().map(|m| (*m).to_string()).collect(),
        max_tokens: 50,
        temperature: 0.7,
        timeout: Duration::from_secs(5),
    }
}

/// Gemini-dialect profile pointed at a mock server's API root
#[allow(dead_code)]
pub fn gemini_profile(server_url: &str, models: &[&str]) -> ProviderProfile {
    ProviderProfile {
        provider: Provider::Gemini,
        dialect: Dialect::Gemini,
        base_url: format!("{server_url}/v1beta"),
        api_key: Some(SecretString::from("gemini-key".to_string())),
        models: models.iter().map(|m| (*m).to_string()).collect(),
        max_tokens: 50,
        temperature: 0.7,
        timeout: Duration::from_secs(5),
    }
}

/// Minimal chat-completion body carrying `content`
#[allow(dead_code)]
pub fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}
