// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! Ordered model fallback.
//!
//! Each configured model is tried once, in order, with no backoff between
//! attempts. The first non-blank completion wins.

use tracing::{debug, info, warn};

use super::{LogContext, Transport, TransportError};
use crate::domain::{ChatRequest, ProviderProfile};
use crate::error::{Error, Result};

/// Why the chain moved past a model.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The model answered with nothing but whitespace.
    Empty,
    Failed(TransportError),
}

impl FallbackReason {
    fn into_error(self) -> TransportError {
        match self {
            Self::Empty => TransportError::UnexpectedShape("empty completion".into()),
            Self::Failed(e) => e,
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("empty response"),
            Self::Failed(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedAttempt {
    pub model: String,
    pub error: TransportError,
}

/// A usable completion and the attempts that failed before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Trimmed, never empty
    pub content: String,
    pub model: String,
    pub failures: Vec<FailedAttempt>,
}

/// Observer for human-facing progress output.
pub trait Progress: Send + Sync {
    fn attempting(&self, _model: &str, _index: usize, _total: usize) {}
    fn fell_back(&self, _model: &str, _reason: &FallbackReason) {}
    fn succeeded(&self, _model: &str) {}
}

pub struct SilentProgress;

impl Progress for SilentProgress {}

pub struct FallbackOrchestrator {
    transport: Box<dyn Transport>,
    progress: Box<dyn Progress>,
    log: LogContext,
}

impl FallbackOrchestrator {
    pub fn new(transport: Box<dyn Transport>, progress: Box<dyn Progress>, log: LogContext) -> Self {
        Self {
            transport,
            progress,
            log,
        }
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    pub async fn generate(&self, profile: &ProviderProfile, prompt: &str) -> Result<Completion> {
        let template = ChatRequest::user(
            profile.default_model(),
            prompt,
            profile.max_tokens,
            profile.temperature,
        );
        let total = profile.models.len();
        let mut failures: Vec<FailedAttempt> = Vec::with_capacity(total);

        for (index, model) in profile.models.iter().enumerate() {
            self.progress.attempting(model, index, total);
            info!(
                model = %model,
                attempt = index + 1,
                total,
                transport = self.transport.name(),
                "requesting completion"
            );

            let request = template.with_model(model);
            let reason = match self.transport.send(profile, &request).await {
                Ok(content) => {
                    let trimmed = content.trim();
                    if !trimmed.is_empty() {
                        if self.log.debug {
                            debug!(model = %model, chars = trimmed.len(), "completion received");
                        }
                        self.progress.succeeded(model);
                        return Ok(Completion {
                            content: trimmed.to_string(),
                            model: model.clone(),
                            failures,
                        });
                    }
                    FallbackReason::Empty
                }
                Err(e) => FallbackReason::Failed(e),
            };

            match &reason {
                FallbackReason::Empty => warn!(model = %model, "empty response, falling back"),
                FallbackReason::Failed(e) => {
                    warn!(model = %model, kind = e.kind(), error = %e, "model failed, falling back")
                }
            }
            self.progress.fell_back(model, &reason);

            failures.push(FailedAttempt {
                model: model.clone(),
                error: reason.into_error(),
            });
        }

        let last = failures
            .pop()
            .ok_or_else(|| Error::Config("no models configured".into()))?;

        Err(Error::AllModelsFailed {
            attempted: total,
            last_model: last.model,
            source: last.error,
        })
    }
}
