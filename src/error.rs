//! Error types for the classification stage.
//!
//! Only two failure families are modeled as errors: configuration problems
//! (fatal at startup) and request-build problems (contained per message).
//! Transport failures and deadline expiry are not errors — the invoker
//! resolves them to `Outcome::NoAnswer` by value, so every call site handles
//! the absence of an answer explicitly.

/// Top-level error type for the stage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request build error: {0}")]
    Build(#[from] BuildError),
}

/// Configuration-related errors. Surfaced at initialization time as a hard
/// startup failure — the one category allowed to stop processing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Request-build errors. Contained by the stage: a failed build skips the
/// invocation entirely, so the message passes through unmodified.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Could not decode MIME message")]
    MimeDecode,

    #[error("Could not read message source: {0}")]
    Source(#[from] std::io::Error),

    #[error("Could not serialize classification request: {0}")]
    Serialize(#[from] serde_json::Error),
}
