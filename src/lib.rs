//! Streaming/AI service region-restriction probe.
//!
//! Issues a single GET request to each supported service, classifies the
//! response into a fixed verdict vocabulary, extracts an optional country
//! code, and assembles a flat text report. All probes run concurrently and
//! a failed probe never takes its siblings down with it.
//!
//! # Supported Services
//!
//! - **Bilibili** - mainland and HK/MO/TW catalog variants
//! - **ChatGPT** - egress country, mobile-web front door, compliance endpoint
//! - **Gemini** - web app availability and serving region
//! - **YouTube Premium** - availability and billing region
//!
//! # Example Usage
//!
//! ```bash
//! # Probe every service
//! media-unlock-check
//!
//! # Probe a subset, emit JSON
//! media-unlock-check --services gemini,youtube-premium --output json
//! ```

pub mod cli;
pub mod country;
pub mod error;
pub mod output;
pub mod probe;
pub mod report;
pub mod services;

pub use cli::Cli;
pub use country::country_code_to_emoji;
pub use error::{AppError, ExitCode, Result};
pub use output::{get_formatter, write_output, OutputFormat};
pub use probe::{HttpTransport, ProbeOutcome, ReqwestTransport};
pub use report::{Aggregator, Report, REPORT_TITLE};
pub use services::{default_services, get_service, ProbeResult, ServiceSpec, Verdict};
