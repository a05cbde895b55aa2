//! Bounded, deadline-guarded invocation of the classification service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Result of one classification attempt.
///
/// `NoAnswer` covers deadline expiry, transport failure and service errors
/// indistinguishably — callers only ever decide "attach the answer" or
/// "leave the message alone".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Raw response body, attached to the message verbatim.
    Answer(String),
    /// No usable answer was obtained in time.
    NoAnswer,
}

/// Issues classification calls with a fixed concurrency cap and an optional
/// per-call deadline.
///
/// Each call runs as a spawned task that queues on the worker slots, so a
/// saturated pool delays calls instead of spawning unbounded work. Deadline
/// expiry abandons the caller's wait only: the task keeps its slot and runs
/// the HTTP exchange to completion, and whatever it produces is discarded.
pub struct ClassificationInvoker {
    client: reqwest::Client,
    slots: Arc<Semaphore>,
    service_url: String,
    deadline: Option<Duration>,
}

impl ClassificationInvoker {
    /// Create an invoker with `worker_count` concurrent call slots.
    pub fn new(
        service_url: impl Into<String>,
        worker_count: usize,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            slots: Arc::new(Semaphore::new(worker_count)),
            service_url: service_url.into(),
            deadline,
        }
    }

    /// POST the serialized request and wait for the raw answer.
    ///
    /// Never fails: every failure mode resolves to `Outcome::NoAnswer`.
    /// The deadline, when configured, covers queueing for a worker slot as
    /// well as the network exchange itself.
    pub async fn invoke(&self, body: String, recipients: &[String]) -> Outcome {
        let client = self.client.clone();
        let slots = Arc::clone(&self.slots);
        let url = self.service_url.clone();
        let query: Vec<(&str, String)> = recipients
            .iter()
            .map(|recipient| ("recipients", recipient.clone()))
            .collect();

        let task = tokio::spawn(async move {
            let _permit = slots.acquire_owned().await.ok()?;
            post_classification(&client, &url, &query, body).await
        });

        let joined = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    info!(
                        deadline_ms = deadline.as_millis() as u64,
                        "Could not retrieve classification before the deadline"
                    );
                    return Outcome::NoAnswer;
                }
            },
            None => task.await,
        };

        match joined {
            Ok(Some(answer)) => Outcome::Answer(answer),
            Ok(None) => Outcome::NoAnswer,
            Err(e) => {
                error!(error = %e, "Classification task failed to complete");
                Outcome::NoAnswer
            }
        }
    }
}

/// One HTTP exchange: POST the JSON body with one `recipients` query
/// parameter occurrence per recipient, return the response text.
async fn post_classification(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
    body: String,
) -> Option<String> {
    let exchange = async {
        client
            .post(url)
            .query(query)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    };

    match exchange.await {
        Ok(answer) => Some(answer),
        Err(e) => {
            error!(error = %e, "Error while contacting the classification service");
            None
        }
    }
}
