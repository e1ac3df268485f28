//! Error types for the I/O seams of the engine.
//!
//! The conversation operations themselves are total and never return these; only the
//! completion call and configuration loading can fail.

/// Failure of an external text-completion call.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion transport error: {0}")]
    Transport(String),
    #[error("completion endpoint returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("could not decode completion response: {0}")]
    Decode(String),
    #[error("no API key configured (set llm.api_key, PARLEY_LLM_API_KEY or OPENROUTER_API_KEY)")]
    MissingApiKey,
    #[error("completion response contained no choices")]
    EmptyResponse,
}

/// Failure to load or save engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
