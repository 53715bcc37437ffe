//! Webhook dispatch over a long-lived HTTP client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use pulsehook_core::{DispatchOutcome, DispatchResult, Job};

use crate::error::DispatchError;

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Per-request timeout. A hung endpoint must not block sibling jobs.
    pub request_timeout: Duration,

    /// User agent sent with every call.
    pub user_agent: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: format!("pulsehook/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Issues outbound webhook calls.
///
/// Owns one pooled [`reqwest::Client`], built once at startup and reused for
/// every job on every tick.
pub struct Dispatcher {
    client: Client,
}

impl Dispatcher {
    /// Build the dispatcher and its HTTP client.
    pub fn new(config: DispatcherConfig) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| DispatchError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Dispatch one job: GET its endpoint, bearer-authenticated when the job
    /// carries a secret.
    ///
    /// Exactly one outbound call is made, with no retry. Every failure mode
    /// (malformed endpoint, refused connection, timeout, non-2xx) ends up in
    /// the returned result rather than an error.
    pub async fn dispatch(&self, job: &Job) -> DispatchResult {
        // Reject malformed endpoints before touching the network.
        let url = match url::Url::parse(&job.endpoint) {
            Ok(url) => url,
            Err(e) => {
                return DispatchResult::new(
                    job,
                    DispatchOutcome::Error(format!("invalid endpoint: {}", e)),
                );
            }
        };

        let mut request = self.client.get(url);
        if job.has_secret() {
            request = request.bearer_auth(&job.secret);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // Drain the body so the pooled connection is released even
                // though the payload is unused.
                let _ = response.bytes().await;
                debug!(job_id = %job.id, status, "Dispatched");
                DispatchResult::new(job, DispatchOutcome::Status(status))
            }
            Err(e) => DispatchResult::new(job, DispatchOutcome::Error(e.to_string())),
        }
    }
}
