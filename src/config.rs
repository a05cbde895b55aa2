//! Stage configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Header appended to classified mail when no name is configured.
pub const DEFAULT_HEADER_NAME: &str = "X-Classification-Guess";

/// Default number of concurrent classification calls.
pub const DEFAULT_WORKER_COUNT: usize = 2;

/// Classification stage configuration.
///
/// Built once at startup, read-only afterwards. The deadline is optional:
/// `None` means the stage waits for the service indefinitely.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Classification service endpoint URL.
    pub service_url: String,
    /// Name of the header appended to the message.
    pub header_name: String,
    /// Maximum number of concurrent in-flight classification calls.
    pub worker_count: usize,
    /// How long a caller waits for an answer before giving up.
    pub timeout: Option<Duration>,
}

impl StageConfig {
    /// Create a config with defaults for everything but the service URL.
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            header_name: DEFAULT_HEADER_NAME.to_string(),
            worker_count: DEFAULT_WORKER_COUNT,
            timeout: None,
        }
    }

    pub fn with_header_name(mut self, header_name: impl Into<String>) -> Self {
        self.header_name = header_name.into();
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build config from environment variables.
    ///
    /// `CLASSIFIER_SERVICE_URL` is required; `CLASSIFIER_HEADER_NAME`,
    /// `CLASSIFIER_WORKER_COUNT` and `CLASSIFIER_TIMEOUT_MS` override the
    /// defaults. A present but non-numeric or non-positive count/timeout is
    /// rejected rather than silently defaulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        let service_url =
            std::env::var("CLASSIFIER_SERVICE_URL").map_err(|_| ConfigError::MissingRequired {
                key: "CLASSIFIER_SERVICE_URL".into(),
                hint: "Set it to the classification service endpoint URL.".into(),
            })?;

        let mut config = Self::new(service_url);

        if let Ok(header_name) = std::env::var("CLASSIFIER_HEADER_NAME") {
            config.header_name = header_name;
        }

        if let Ok(raw) = std::env::var("CLASSIFIER_WORKER_COUNT") {
            config.worker_count = parse_strictly_positive("CLASSIFIER_WORKER_COUNT", &raw)?;
        }

        if let Ok(raw) = std::env::var("CLASSIFIER_TIMEOUT_MS") {
            let ms = parse_strictly_positive("CLASSIFIER_TIMEOUT_MS", &raw)?;
            config.timeout = Some(Duration::from_millis(ms as u64));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Called once at stage construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "service_url".into(),
                hint: "The classification service endpoint is mandatory.".into(),
            });
        }
        if self.header_name.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "header_name".into(),
                hint: "The classification header name is mandatory.".into(),
            });
        }
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "worker_count".into(),
                message: "expected a strictly positive worker count".into(),
            });
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::InvalidValue {
                key: "timeout".into(),
                message: "expected a strictly positive timeout".into(),
            });
        }
        Ok(())
    }
}

fn parse_strictly_positive(key: &str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            message: format!("expected a strictly positive integer, got {raw:?}"),
        }),
    }
}
