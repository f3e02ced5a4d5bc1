//! CLI runner for interactive and single-prompt modes.

use std::sync::Arc;

use crate::chat::SubmitOutcome;
use crate::cli::repl::Repl;
use crate::gemini::TaxExpert;

/// Shown under the banner on every interactive start.
pub const DISCLAIMER: &str = "DISCLAIMER: This AI advisor provides information based on public FTA records. Always verify with a certified tax professional for official filing.";

/// Run a single prompt and exit.
pub async fn run_single_prompt(
    expert: Arc<dyn TaxExpert>,
    prompt: &str,
) -> anyhow::Result<SubmitOutcome> {
    let mut repl = Repl::new(expert);
    repl.ask(prompt).await
}

/// Run in interactive mode.
pub async fn run_interactive(expert: Arc<dyn TaxExpert>) -> anyhow::Result<()> {
    print_banner();

    let mut repl = Repl::new(expert);
    repl.run().await?;

    Ok(())
}

/// Print the welcome banner.
pub fn print_banner() {
    println!();
    println!(
        "  \x1b[1;34m🏛  UAE Tax Advisor Pro\x1b[0m  \x1b[2mv{}\x1b[0m",
        get_version()
    );
    println!("  \x1b[2mCompliance & Regulatory Intelligence\x1b[0m");
    println!();
    println!("  \x1b[33m{}\x1b[0m", DISCLAIMER);
    println!("  \x1b[2mType \x1b[0m\x1b[1;36m/help\x1b[0m\x1b[2m for commands, or ask a tax question.\x1b[0m");
    println!();
}

/// Get the application version string.
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Banner text without ANSI codes.
pub fn banner_text_lines() -> Vec<&'static str> {
    vec![
        "UAE Tax Advisor Pro",
        "Compliance & Regulatory Intelligence",
        DISCLAIMER,
        "/help",
    ]
}
