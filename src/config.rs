use clap::ValueEnum;
use thiserror::Error;

use crate::domain::chain::TraceSettings;
use crate::domain::llm::{groq, ollama};

pub const BACKEND_VAR: &str = "LLM_RELAY_BACKEND";
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";
pub const GROQ_MODEL_VAR: &str = "GROQ_MODEL";
pub const GROQ_BASE_URL_VAR: &str = "GROQ_BASE_URL";
pub const OLLAMA_BASE_URL_VAR: &str = "OLLAMA_BASE_URL";
pub const OLLAMA_MODEL_VAR: &str = "OLLAMA_MODEL";
pub const PROJECT_VAR: &str = "LLM_RELAY_PROJECT";
pub const TRACING_VAR: &str = "LLM_RELAY_TRACING";

pub const DEFAULT_PROJECT: &str = "llm-relay";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} environment variable not set")]
    MissingVar {
        backend: BackendKind,
        var: &'static str,
    },
    #[error("unknown backend '{value}' in {var} (expected groq or ollama)")]
    UnknownBackend { var: &'static str, value: String },
}

impl ConfigError {
    /// Backend the failed configuration was meant for, when known
    pub fn backend(&self) -> Option<BackendKind> {
        match self {
            ConfigError::MissingVar { backend, .. } => Some(*backend),
            ConfigError::UnknownBackend { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Hosted inference on Groq
    Groq,
    /// Local Ollama server
    Ollama,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Groq => "Groq",
            BackendKind::Ollama => "Ollama",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            BackendKind::Groq => "Groq 🔥 | Hosted LLM Demo",
            BackendKind::Ollama => "🧠 Local LLM Demo (Ollama)",
        }
    }

    pub fn system_instruction(&self) -> &'static str {
        match self {
            BackendKind::Groq => "You are a helpful assistant. Please respond to the question.",
            BackendKind::Ollama => {
                "You are a helpful assistant. Please respond to the question asked."
            }
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "groq" => Some(BackendKind::Groq),
            "ollama" => Some(BackendKind::Ollama),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Groq {
        api_key: String,
        model: String,
        base_url: String,
    },
    Ollama {
        model: String,
        base_url: String,
    },
}

impl BackendConfig {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendConfig::Groq { .. } => BackendKind::Groq,
            BackendConfig::Ollama { .. } => BackendKind::Ollama,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            BackendConfig::Groq { model, .. } | BackendConfig::Ollama { model, .. } => model,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            BackendConfig::Groq { base_url, .. } | BackendConfig::Ollama { base_url, .. } => {
                base_url
            }
        }
    }
}

// Keeps the API key out of logs
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.kind().label())
            .field("model", &self.model())
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}

/// Values from the command line that win over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<BackendKind>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub trace: TraceSettings,
}

impl AppConfig {
    /// Resolve configuration from `lookup` (normally the process environment)
    /// and CLI overrides. Empty values count as unset.
    pub fn resolve<F>(overrides: &Overrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let kind = match overrides.backend {
            Some(kind) => kind,
            None => match get(BACKEND_VAR) {
                Some(value) => BackendKind::parse(&value).ok_or(ConfigError::UnknownBackend {
                    var: BACKEND_VAR,
                    value,
                })?,
                None => BackendKind::Ollama,
            },
        };

        let model = |var: &str, default: &str| {
            overrides
                .model
                .clone()
                .or_else(|| get(var))
                .unwrap_or_else(|| default.to_string())
        };
        let base_url = |var: &str, default: &str| {
            overrides
                .base_url
                .clone()
                .or_else(|| get(var))
                .unwrap_or_else(|| default.to_string())
        };

        let backend = match kind {
            BackendKind::Groq => BackendConfig::Groq {
                api_key: get(GROQ_API_KEY_VAR).ok_or(ConfigError::MissingVar {
                    backend: kind,
                    var: GROQ_API_KEY_VAR,
                })?,
                model: model(GROQ_MODEL_VAR, groq::DEFAULT_MODEL),
                base_url: base_url(GROQ_BASE_URL_VAR, groq::DEFAULT_BASE_URL),
            },
            BackendKind::Ollama => BackendConfig::Ollama {
                model: model(OLLAMA_MODEL_VAR, ollama::DEFAULT_MODEL),
                base_url: base_url(OLLAMA_BASE_URL_VAR, ollama::DEFAULT_BASE_URL),
            },
        };

        let trace = TraceSettings {
            project: get(PROJECT_VAR).unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
            enabled: get(TRACING_VAR).is_some_and(|v| is_truthy(&v)),
        };

        Ok(Self { backend, trace })
    }

    /// Resolve against the real process environment
    pub fn from_env(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |var| std::env::var(var).ok())
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
