// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use directories::BaseDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::domain::{Dialect, ProviderProfile};
use crate::error::{Error, Result};

pub const DEFAULT_MAX_TOKENS: u32 = 50;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OLLAMA_URL: &str = "http://localhost:11434/v1/chat/completions";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenRouter,
    OpenAI,
    Groq,
    Gemini,
    Ollama,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Self::OpenRouter,
        Self::OpenAI,
        Self::Groq,
        Self::Gemini,
        Self::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenRouter => "openrouter",
            Self::OpenAI => "openai",
            Self::Groq => "groq",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Gemini => Dialect::Gemini,
            _ => Dialect::OpenAiChat,
        }
    }

    /// Environment variable checked first for the API key.
    pub fn primary_key_env(&self) -> Option<&'static str> {
        match self {
            Self::OpenRouter => Some("OPENROUTER_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Groq => Some("GROQ_API_KEY"),
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::Ollama => None,
        }
    }

    /// Older variable name still honoured after the primary one.
    pub fn legacy_key_env(&self) -> Option<&'static str> {
        match self {
            Self::OpenRouter => Some("OPEN_ROUTER_API_KEY"),
            Self::OpenAI => Some("GITCOMM_OPENAI_API_KEY"),
            Self::Groq => Some("GITCOMM_GROQ_API_KEY"),
            Self::Gemini => Some("GOOGLE_API_KEY"),
            Self::Ollama => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenRouter => OPENROUTER_URL,
            Self::OpenAI => OPENAI_URL,
            Self::Groq => GROQ_URL,
            Self::Gemini => GEMINI_URL,
            Self::Ollama => OLLAMA_URL,
        }
    }

    pub fn default_models(&self) -> &'static [&'static str] {
        match self {
            Self::OpenRouter => &[
                "google/gemini-2.0-flash-001",
                "meta-llama/llama-3.3-70b-instruct",
                "openai/gpt-4o-mini",
            ],
            Self::OpenAI => &["gpt-4o-mini"],
            Self::Groq => &["llama-3.1-70b-versatile"],
            Self::Gemini => &["gemini-1.5-flash-8b"],
            Self::Ollama => &["llama3.2"],
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted || (wanted == "open-router" && *p == Self::OpenRouter))
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown provider '{s}'. Expected one of: openrouter, openai, groq, gemini, ollama"
                ))
            })
    }
}

/// On-disk configuration (`~/.gitcomm/config.json`) merged with `GITCOMM_*`
/// environment variables.
///
/// Zero values for `max_tokens`, `temperature` and `timeout_secs` mean
/// "use the built-in default" and are replaced during [`Config::resolve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub provider: Provider,

    /// Stored keys by provider name, e.g. `{"openrouter": "sk-or-..."}`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub api_keys: BTreeMap<String, String>,

    /// Single-key layout of earlier config files. OpenRouter only.
    #[serde(default, skip_serializing)]
    pub open_router_api_key: Option<String>,

    /// Models tried in order; empty means the provider's defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,

    #[serde(default, deserialize_with = "non_negative")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: f32,

    /// Endpoint override (full chat-completions URL, or API root for Gemini)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, deserialize_with = "non_negative")]
    pub timeout_secs: u64,

    /// `timeout_secs` under its earlier name; folded in on load.
    #[serde(default, skip_serializing, deserialize_with = "non_negative")]
    pub timeout_seconds: u64,
}

impl Config {
    /// Load with priority: ENV (`GITCOMM_*`) > user config file > defaults.
    ///
    /// API keys are not read from `GITCOMM_*`; they resolve per provider in
    /// [`Config::resolve`].
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::extract(Figment::new().merge(Serialized::defaults(Config::default()))),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if path.exists() {
            debug!(path = %path.display(), "reading config file");
            figment = figment.merge(Json::file(path));
        }

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self> {
        let figment = figment.merge(Env::prefixed("GITCOMM_").ignore(&[
            "api_key",
            "api_keys",
            "open_router_api_key",
        ]));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".gitcomm"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    fn normalize(&mut self) {
        self.models = normalize_models(&self.models);
        if self.timeout_secs == 0 {
            self.timeout_secs = self.timeout_seconds;
        }
        self.timeout_seconds = 0;
        if self.temperature < 0.0 || self.temperature.is_nan() {
            self.temperature = 0.0;
        }
        self.api_keys = std::mem::take(&mut self.api_keys)
            .into_iter()
            .map(|(name, key)| (name.trim().to_lowercase(), key.trim().to_string()))
            .filter(|(_, key)| !key.is_empty())
            .collect();
        if self
            .open_router_api_key
            .as_deref()
            .is_some_and(|k| k.trim().is_empty())
        {
            self.open_router_api_key = None;
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        if self.timeout_secs > 3600 {
            return Err(Error::Config(format!(
                "timeout_secs must be 0–3600, got {}",
                self.timeout_secs
            )));
        }

        if let Some(ref api_url) = self.api_url {
            let parsed = url::Url::parse(api_url)
                .map_err(|e| Error::Config(format!("api_url '{api_url}' is invalid: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config(format!(
                    "api_url must start with http:// or https://, got '{api_url}'"
                )));
            }
        }

        Ok(())
    }

    /// Resolve the profile for `requested` (or the configured provider) using
    /// the process environment.
    pub fn resolve(
        &self,
        requested: Option<Provider>,
        model_overrides: &[String],
    ) -> Result<ProviderProfile> {
        self.resolve_with(requested, model_overrides, |name| std::env::var(name).ok())
    }

    /// Pure form of [`Config::resolve`] with an injectable environment lookup.
    ///
    /// Key precedence: primary env var, legacy env var, the config file entry
    /// for that provider. A key stored for one provider is never sent to another.
    pub fn resolve_with<F>(
        &self,
        requested: Option<Provider>,
        model_overrides: &[String],
        env: F,
    ) -> Result<ProviderProfile>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = requested.unwrap_or(self.provider);

        let from_env = |name: Option<&str>| {
            name.and_then(&env)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let api_key = from_env(provider.primary_key_env())
            .or_else(|| from_env(provider.legacy_key_env()))
            .or_else(|| self.stored_key(provider));

        if provider.requires_api_key() && api_key.is_none() {
            return Err(Error::MissingCredential {
                provider: provider.to_string(),
                env_var: provider.primary_key_env().unwrap_or_default().to_string(),
            });
        }

        let mut models = normalize_models(model_overrides);
        if models.is_empty() {
            models = normalize_models(&self.models);
        }
        if models.is_empty() {
            models = provider
                .default_models()
                .iter()
                .map(|m| (*m).to_string())
                .collect();
        }

        let max_tokens = match self.max_tokens {
            0 => DEFAULT_MAX_TOKENS,
            n => n,
        };
        let temperature = if self.temperature == 0.0 {
            DEFAULT_TEMPERATURE
        } else {
            self.temperature
        };
        let timeout_secs = match self.timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            n => n,
        };

        let base_url = self
            .api_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string());

        let profile = ProviderProfile {
            provider,
            dialect: provider.dialect(),
            base_url,
            api_key: api_key.map(SecretString::from),
            models,
            max_tokens,
            temperature,
            timeout: Duration::from_secs(timeout_secs),
        };

        debug!(
            provider = %profile.provider,
            dialect = %profile.dialect,
            models = ?profile.models,
            max_tokens = profile.max_tokens,
            "provider profile resolved"
        );

        Ok(profile)
    }

    fn stored_key(&self, provider: Provider) -> Option<String> {
        let legacy = match provider {
            Provider::OpenRouter => self.open_router_api_key.as_deref(),
            _ => None,
        };
        self.api_keys
            .get(provider.as_str())
            .map(String::as_str)
            .or(legacy)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }

    /// Write the config as pretty JSON with owner-only permissions.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Create the default config file unless one already exists.
    pub fn create_default() -> Result<PathBuf> {
        let Some(path) = Self::config_path() else {
            return Err(Error::Config("Cannot determine home directory".into()));
        };

        if path.exists() {
            return Err(Error::Config(format!(
                "{} already exists; edit it directly",
                path.display()
            )));
        }

        let provider = Provider::default();
        let config = Config {
            provider,
            models: provider
                .default_models()
                .iter()
                .map(|m| (*m).to_string())
                .collect(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ..Config::default()
        };
        config.save_to(&path)?;
        Ok(path)
    }
}

/// Negative numbers mean "unset" and become 0.
fn non_negative<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = i64::deserialize(deserializer)?;
    if value <= 0 {
        return Ok(T::default());
    }
    T::try_from(value).map_err(|_| serde::de::Error::custom(format!("{value} is out of range")))
}

fn normalize_models(models: &[String]) -> Vec<String> {
    models
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}
