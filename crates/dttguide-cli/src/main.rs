//! `tv_grab_th_dttguide` - XMLTV grabber for Thailand's DTT Guide.

/// Grabber configuration.
mod config;
/// Fetch, filter and convert pipeline.
mod grabber;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::GrabberConfig;
use crate::grabber::grab;
use dttguide_xmltv::{BROADCAST_TZ, DateWindow};

/// `--description` output.
const DESCRIPTION: &str = "Thailand (https://dttguide.nbtc.go.th/dttguide)";

/// `--capabilities` output.
const CAPABILITIES: &str = "baseline";

/// Printed to stderr regardless of the log filter when coverage is incomplete.
const INSUFFICIENT_DATA_WARNING: &str =
    "DTTGuide doesn't provide enough data for requested amount of days.";

/// Exit status when the data does not cover the requested days.
const EXIT_INSUFFICIENT_DATA: u8 = 1;

/// Default log filter; stdout may carry the XMLTV document.
const DEFAULT_LOG_FILTER: &str = "warn";

/// CLI argument parser.
///
/// Follows the XMLTV grabber conventions (`--days`, `--offset`,
/// `--output`, `--capabilities`, ...).
#[derive(Parser)]
#[command(
    name = "tv_grab_th_dttguide",
    about = "XMLTV grabber for Thailand's DTT Guide",
    disable_version_flag = true
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Print the grabber version and exit.
    #[arg(long)]
    version: bool,

    /// Print the grabber description and exit.
    #[arg(long)]
    description: bool,

    /// Print the supported XMLTV capabilities and exit.
    #[arg(long)]
    capabilities: bool,

    /// Accepted for compatibility; the grabber logs nothing but warnings by default.
    #[arg(long)]
    quiet: bool,

    /// Output file (default: standard output).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of days of programmes to grab, starting at the offset day.
    #[arg(long, allow_negative_numbers = true)]
    days: Option<i64>,

    /// Start day relative to today (UTC+7).
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<i64>,

    /// Accepted for compatibility; there is nothing to configure.
    #[arg(long)]
    config_file: Option<PathBuf>,
}

/// Writes one line to standard output.
///
/// # Errors
///
/// Returns an error if standard output is closed.
fn print_line(line: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").context("failed to write to stdout")
}

/// Writes the serialized document to `output` or standard output.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
fn write_output(xml: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, xml)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(xml.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write to stdout")
        }
    }
}

/// Runs the grab and returns the process exit status.
///
/// # Errors
///
/// Returns an error if the window is invalid, the API request fails,
/// a record is malformed, or the output cannot be written.
#[instrument(skip_all)]
async fn run_grab(cli: &Cli) -> Result<ExitCode> {
    if cli.quiet || cli.config_file.is_some() {
        tracing::debug!(
            quiet = cli.quiet,
            config_file = ?cli.config_file,
            "compatibility flags have no effect"
        );
    }

    let config = GrabberConfig::from_env()?;

    let today = Utc::now().with_timezone(&*BROADCAST_TZ).date_naive();
    let window = DateWindow::relative_to(today, cli.days, cli.offset)
        .context("failed to resolve --days/--offset window")?;
    tracing::info!(
        %today,
        earliest_start = ?window.earliest_start,
        latest_start_exclusive = ?window.latest_start_exclusive,
        "Requested start window"
    );

    let client = config.build_client()?;
    let outcome = grab(&client, &window, &config).await?;

    let xml = outcome
        .tv
        .to_xml_string()
        .context("failed to serialize XMLTV document")?;
    write_output(&xml, cli.output.as_deref())?;

    if outcome.coverage.is_complete() {
        return Ok(ExitCode::SUCCESS);
    }

    tracing::debug!(
        covers_earliest_start = outcome.coverage.covers_earliest_start,
        covers_latest_start = outcome.coverage.covers_latest_start,
        "coverage check failed"
    );
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{INSUFFICIENT_DATA_WARNING}").context("failed to write to stderr")?;
    Ok(ExitCode::from(EXIT_INSUFFICIENT_DATA))
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if the grab fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
            )
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();

    if cli.version {
        print_line(env!("CARGO_PKG_VERSION"))?;
        return Ok(ExitCode::SUCCESS);
    }
    if cli.description {
        print_line(DESCRIPTION)?;
        return Ok(ExitCode::SUCCESS);
    }
    if cli.capabilities {
        print_line(CAPABILITIES)?;
        return Ok(ExitCode::SUCCESS);
    }

    run_grab(&cli).await
}
