use clap::Parser;
use console::style;
use media_unlock_check::{
    cli::{parse_services, Cli},
    error::ExitCode,
    output::{get_formatter, write_output},
    probe::ReqwestTransport,
    report::Aggregator,
};
use std::process::ExitCode as StdExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> StdExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            e.exit_code()
        }
    };

    StdExitCode::from(exit_code as u8)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "media_unlock_check=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> media_unlock_check::Result<ExitCode> {
    let services = parse_services(&cli.services)?;

    // --timeout 0 reproduces the unbounded-wait behavior of having no
    // timeout at all
    let timeout = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));
    let transport = Arc::new(ReqwestTransport::new(timeout)?);

    let report = Aggregator::new(transport, services).aggregate().await;

    let use_colors = console::colors_enabled() && !cli.quiet;
    let formatter = get_formatter(cli.output.into(), use_colors);
    write_output(&formatter.format(&report), cli.output_file.as_deref())?;

    if report.has_failures() {
        Ok(ExitCode::ProbeFailure)
    } else {
        Ok(ExitCode::Success)
    }
}
