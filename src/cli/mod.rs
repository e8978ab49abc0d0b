use crate::error::{AppError, Result};
use crate::output::OutputFormat;
use crate::services::{default_services, get_service, ServiceSpec};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Streaming/AI service region-restriction probe
#[derive(Parser, Debug)]
#[command(name = "media-unlock-check")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Services to probe (comma-separated ids, or 'all')
    #[arg(short, long, default_value = "all", value_delimiter = ',')]
    pub services: Vec<String>,

    /// Per-probe timeout in seconds; 0 disables the timeout entirely
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Human)]
    pub output: OutputFormatArg,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Enable verbose (per-probe) logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable colors and decoration
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormatArg {
    #[default]
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Resolve the services argument into probe specs, handling "all"
/// specially. Unknown ids are an error rather than a silent skip.
pub fn parse_services(services: &[String]) -> Result<Vec<ServiceSpec>> {
    if services.len() == 1 && services[0].to_lowercase() == "all" {
        return Ok(default_services());
    }

    services
        .iter()
        .map(|id| {
            let id = id.to_lowercase();
            get_service(&id).ok_or_else(|| AppError::InvalidInput(format!("unknown service: {id}")))
        })
        .collect()
}
