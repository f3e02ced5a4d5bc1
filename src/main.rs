//! taxpro - UAE tax advisor in the terminal
//!
//! Interactive REPL by default, with single-prompt and bridge modes.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tax_advisor::chat::SubmitOutcome;
use tax_advisor::cli;
use tax_advisor::config::Settings;
use tax_advisor::gemini::{GeminiClient, TaxExpert};

/// UAE Tax Advisor Pro - FTA compliance answers grounded in Google Search
#[derive(Parser, Debug)]
#[command(name = "taxpro")]
#[command(version, about, long_about = None)]
struct Args {
    /// Ask a single question and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Run in bridge mode for external UI (NDJSON on stdin/stdout)
    #[arg(long)]
    bridge: bool,

    /// Gemini model to query (overrides TAX_ADVISOR_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Sampling temperature between 0 and 2 (overrides TAX_ADVISOR_TEMPERATURE)
    #[arg(short, long)]
    temperature: Option<f32>,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        // Determine log level from args or env
        let default_filter = if args.verbose {
            "trace"
        } else if args.debug {
            "debug"
        } else {
            "warn" // Quiet by default for normal use
        };

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        if args.debug || args.verbose {
            tracing::info!("Debug logging enabled");
        }

        let mut settings = Settings::from_env()?;
        if let Some(model) = &args.model {
            settings = settings.with_model(model)?;
        }
        if let Some(temperature) = args.temperature {
            settings = settings.with_temperature(temperature)?;
        }
        tracing::debug!(?settings, "Resolved settings");

        let expert: Arc<dyn TaxExpert> = Arc::new(GeminiClient::new(settings));

        if args.bridge {
            cli::bridge::run_bridge_mode(expert).await?;
        } else if let Some(prompt) = args.prompt {
            let outcome = cli::run_single_prompt(expert, &prompt).await?;
            if matches!(outcome, SubmitOutcome::Failed { .. }) {
                return Ok(ExitCode::FAILURE);
            }
        } else {
            cli::run_interactive(expert).await?;
        }

        Ok(ExitCode::SUCCESS)
    })
}
