// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::config::Provider;

/// Wire dialect spoken by a provider's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `POST /chat/completions` with a `choices[0].message.content` reply.
    OpenAiChat,
    /// Google `models/{model}:generateContent`.
    Gemini,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAiChat => write!(f, "openai-chat"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Everything needed to talk to one provider, resolved once per invocation.
///
/// Built by [`Config::resolve`](crate::config::Config::resolve). The model
/// list is never empty and the key is present whenever the provider needs one.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub provider: Provider,
    pub dialect: Dialect,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    /// Fallback order: first entry is the primary model.
    pub models: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ProviderProfile {
    pub fn default_model(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or_default()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some_and(|k| !k.is_empty())
    }
}
