//! Application Configuration
//!
//! Read once at start-up and handed to the components that need it.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("unknown LLM_PROVIDER {0:?} (expected openai, ollama or mock)")]
    UnknownProvider(String),
}

/// Which chat completion backend to use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Ollama,
    /// Scripted replies, no network
    Mock,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub provider: ProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = get("LLM_PROVIDER")
            .map_or(Ok(ProviderKind::OpenAi), |v| v.parse())?;

        let openai_api_key = get("OPENAI_API_KEY");
        if provider == ProviderKind::OpenAi && openai_api_key.is_none() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }

        let default_model = match provider {
            ProviderKind::Ollama => "llama3.2",
            ProviderKind::OpenAi | ProviderKind::Mock => "gpt-3.5-turbo",
        };

        let temperature: f32 = parse_or(get("LLM_TEMPERATURE"), "LLM_TEMPERATURE", 0.7)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                key: "LLM_TEMPERATURE",
                value: temperature.to_string(),
            });
        }

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            provider,
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".into()),
            model: get("LLM_MODEL").unwrap_or_else(|| default_model.into()),
            temperature,
            timeout_secs: parse_or(get("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS", 120)?,
            ollama_host: get("OLLAMA_HOST").unwrap_or_else(|| "http://localhost".into()),
            ollama_port: parse_or(get("OLLAMA_PORT"), "OLLAMA_PORT", 11434)?,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    raw.map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value })
    })
}
