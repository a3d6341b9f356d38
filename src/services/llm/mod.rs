// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

pub mod fallback;
pub mod gemini;
pub mod openai;

use crate::domain::{ChatRequest, Dialect, ProviderProfile};
use crate::error::Result;

pub use fallback::{
    Completion, FailedAttempt, FallbackOrchestrator, FallbackReason, Progress, SilentProgress,
};

/// Longest slice of an error body kept in [`TransportError::Status`].
const BODY_SNIPPET_CHARS: usize = 200;

/// Failure of a single request. Every variant is retryable by the fallback chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("invalid JSON in response: {0}")]
    Decode(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl TransportError {
    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network("request timed out".into())
        } else {
            Self::Network(e.to_string())
        }
    }

    pub(crate) fn status(code: u16, body: &str) -> Self {
        Self::Status {
            code,
            body: body.trim().chars().take(BODY_SNIPPET_CHARS).collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::UnexpectedShape(_) => "unexpected-shape",
        }
    }
}

/// Debug switch fixed at startup and handed to everything that logs payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogContext {
    pub debug: bool,
}

impl LogContext {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

/// One wire dialect. `send` returns the raw completion text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        profile: &ProviderProfile,
        request: &ChatRequest,
    ) -> std::result::Result<String, TransportError>;

    fn name(&self) -> &str;
}

pub fn create_transport(profile: &ProviderProfile, log: LogContext) -> Result<Box<dyn Transport>> {
    let client = http_client(profile.timeout)?;
    Ok(match profile.dialect {
        Dialect::OpenAiChat => Box::new(openai::OpenAiTransport::new(client, log)),
        Dialect::Gemini => Box::new(gemini::GeminiTransport::new(client, log)),
    })
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}
