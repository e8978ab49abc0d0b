//! HTTP transport abstraction and the per-service probe runner.

use crate::error::Result;
use crate::services::{classify, ProbeResult, ServiceSpec};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Raw outcome of a single HTTP request, before classification.
///
/// `body` may be absent even when `error` is `None` (empty or non-text
/// response).
#[derive(Debug, Clone, Default)]
pub struct ProbeOutcome {
    /// Transport-level error message, if the request never produced a
    /// response.
    pub error: Option<String>,
    /// HTTP status code, if a response arrived.
    pub status: Option<u16>,
    /// Response body as text, if one could be read.
    pub body: Option<String>,
}

impl ProbeOutcome {
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            status: None,
            body: None,
        }
    }

    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self {
            error: None,
            status: Some(status),
            body: Some(body.into()),
        }
    }
}

/// HTTP capability injected into the probe runner.
///
/// The runner only ever issues GET requests. Implementations must never
/// panic; any failure is reported through [`ProbeOutcome::error`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> ProbeOutcome;
}

/// reqwest-backed transport used by the binary.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport with an optional per-request timeout. `None`
    /// leaves requests unbounded, matching services that are expected to
    /// hang rather than reject.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> ProbeOutcome {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => ProbeOutcome {
                        error: None,
                        status: Some(status),
                        body: Some(body),
                    },
                    Err(e) => {
                        debug!(error = %e, "failed to read response body");
                        ProbeOutcome {
                            error: None,
                            status: Some(status),
                            body: None,
                        }
                    }
                }
            }
            Err(e) => ProbeOutcome::transport_error(e.to_string()),
        }
    }
}

/// Issues the single request a service needs and classifies the outcome.
///
/// Never returns an error: transport failures and unrecognized responses
/// resolve to a terminal verdict instead of propagating.
pub async fn run_probe(transport: &dyn HttpTransport, spec: &ServiceSpec) -> ProbeResult {
    let outcome = transport.get(spec.url).await;

    debug!(
        service = spec.name,
        status = ?outcome.status,
        error = ?outcome.error,
        body = ?outcome.body.as_deref().map(truncate_for_log),
        "probe completed"
    );

    let (verdict, region) = classify(spec.kind, &outcome);
    ProbeResult {
        service: spec.name.to_string(),
        kind: spec.kind,
        verdict,
        region,
    }
}

/// Caps a body at 200 characters for the diagnostic log line.
fn truncate_for_log(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{default_services, Verdict};

    struct StaticTransport(ProbeOutcome);

    #[async_trait]
    impl HttpTransport for StaticTransport {
        async fn get(&self, _url: &str) -> ProbeOutcome {
            self.0.clone()
        }
    }

    fn spec(id: &str) -> ServiceSpec {
        default_services()
            .into_iter()
            .find(|s| s.id == id)
            .unwrap()
    }

    #[tokio::test]
    async fn test_transport_error_resolves_to_failed() {
        let transport = StaticTransport(ProbeOutcome::transport_error("connection refused"));
        let result = run_probe(&transport, &spec("chatgpt-ios")).await;
        assert_eq!(result.verdict, Verdict::Failed);
        assert_eq!(result.region, None);
    }

    #[tokio::test]
    async fn test_missing_body_resolves_to_failed() {
        let transport = StaticTransport(ProbeOutcome {
            error: None,
            status: Some(200),
            body: None,
        });
        let result = run_probe(&transport, &spec("youtube-premium")).await;
        assert_eq!(result.verdict, Verdict::Failed);
    }

    #[tokio::test]
    async fn test_successful_body_reaches_classifier() {
        let transport = StaticTransport(ProbeOutcome::response(200, r#"{"code":0}"#));
        let result = run_probe(&transport, &spec("bilibili-mainland")).await;
        assert_eq!(result.verdict, Verdict::Yes);
    }

    #[test]
    fn test_truncate_for_log() {
        let long = "x".repeat(500);
        assert_eq!(truncate_for_log(&long).len(), 200);
        assert_eq!(truncate_for_log("short"), "short");
    }
}
