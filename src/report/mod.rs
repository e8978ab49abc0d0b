//! Fan-out/fan-in probe aggregation and report assembly.

use crate::probe::{run_probe, HttpTransport};
use crate::services::{ProbeResult, ServiceSpec, Verdict};
use chrono::{DateTime, Local};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fixed title of the assembled report.
pub const REPORT_TITLE: &str = "Media Unlock Check";

/// Timestamp format of the trailing report line.
const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Assembled per-invocation report. Immutable after construction.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub results: Vec<ProbeResult>,
    pub generated_at: DateTime<Local>,
}

impl Report {
    /// Joined verdict lines in declaration order, with the trailing
    /// timestamp line.
    pub fn content(&self) -> String {
        let mut lines: Vec<String> = self.results.iter().map(ProbeResult::line).collect();
        lines.push(self.timestamp_line());
        lines.join("\n")
    }

    /// The trailing local-time line, `Checked at: YYYY.MM.DD HH:MM:SS`.
    pub fn timestamp_line(&self) -> String {
        format!(
            "Checked at: {}",
            self.generated_at.format(TIMESTAMP_FORMAT)
        )
    }

    /// Whether any probe ended with the `Failed` verdict.
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.verdict == Verdict::Failed)
    }
}

/// Runs all probes concurrently and assembles the report.
pub struct Aggregator {
    transport: Arc<dyn HttpTransport>,
    services: Vec<ServiceSpec>,
}

impl Aggregator {
    pub fn new(transport: Arc<dyn HttpTransport>, services: Vec<ServiceSpec>) -> Self {
        Self {
            transport,
            services,
        }
    }

    /// Launches every probe at once and waits for all of them to settle.
    ///
    /// Result lines follow the declaration order of `services`, never
    /// network completion order. Each probe runs in its own task with its
    /// own failure boundary: a panicked task yields a `Failed` line for
    /// that one service and leaves its siblings untouched.
    pub async fn aggregate(&self) -> Report {
        debug!(services = self.services.len(), "launching probes");

        let handles: Vec<_> = self
            .services
            .iter()
            .map(|spec| {
                let transport = Arc::clone(&self.transport);
                let spec = *spec;
                tokio::spawn(async move { run_probe(transport.as_ref(), &spec).await })
            })
            .collect();

        let settled = join_all(handles).await;

        let results = settled
            .into_iter()
            .zip(&self.services)
            .map(|(joined, spec)| match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(service = spec.name, error = %e, "probe task did not settle");
                    ProbeResult::failed(spec)
                }
            })
            .collect();

        Report {
            title: REPORT_TITLE.to_string(),
            results,
            generated_at: Local::now(),
        }
    }
}
