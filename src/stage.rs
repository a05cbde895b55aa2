//! The classification stage — per-message orchestration.
//!
//! Flow:
//! 1. Build the canonical request from the mail (contained failure → skip)
//! 2. Invoke the classification service under the concurrency cap/deadline
//! 3. On an answer, append exactly one header; otherwise leave the mail alone
//!
//! After construction, nothing in here can fail from the pipeline's point of
//! view: the worst observable effect of any failure is a missing header.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::builder::RequestBuilder;
use crate::config::StageConfig;
use crate::error::ConfigError;
use crate::invoker::{ClassificationInvoker, Outcome};
use crate::mail::Mail;
use crate::model::{IdGenerator, RandomIdGenerator};

/// Pipeline stage that tags mail with a classification guess.
///
/// Owns the request builder and the invoker (worker slots included) — the
/// concurrency cap is a constructed, injected resource, not an ambient
/// singleton. Shared state is read-only after construction, so one stage
/// value serves arbitrarily many concurrently processed messages.
pub struct ClassificationStage {
    header_name: String,
    builder: RequestBuilder,
    invoker: ClassificationInvoker,
}

impl ClassificationStage {
    /// Create the stage, validating the configuration.
    ///
    /// This is the only place a failure is allowed to stop processing: a
    /// stage that cannot reach a sane configuration can never function.
    pub fn new(config: StageConfig) -> Result<Self, ConfigError> {
        Self::with_id_generator(config, Arc::new(RandomIdGenerator))
    }

    /// Like [`Self::new`], with an injected request-id generator.
    pub fn with_id_generator(
        config: StageConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            header_name: config.header_name,
            builder: RequestBuilder::new(ids),
            invoker: ClassificationInvoker::new(
                config.service_url,
                config.worker_count,
                config.timeout,
            ),
        })
    }

    /// Process one mail: at most one header is appended, and no failure
    /// propagates.
    pub async fn process(&self, mail: &mut dyn Mail) {
        let request = match self.builder.build(mail) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Could not build classification request, skipping mail");
                return;
            }
        };

        let body = match request.to_json() {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Could not serialize classification request, skipping mail");
                return;
            }
        };
        debug!(request_id = %request.message_id, "Built classification request");

        let recipients = mail.envelope_recipients().to_vec();
        match self.invoker.invoke(body, &recipients).await {
            Outcome::Answer(guess) => {
                debug!(
                    request_id = %request.message_id,
                    header = %self.header_name,
                    "Appending classification guess"
                );
                mail.append_header(&self.header_name, &guess);
            }
            Outcome::NoAnswer => {
                debug!(request_id = %request.message_id, "No classification answer");
            }
        }
    }
}
