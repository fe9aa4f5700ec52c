//! CLI entrypoint for the `lighthouse` consent flow.
//!
//! Without flags this runs the one-time error-reporting consent prompt and
//! prints the decision. `--enable-error-reporting <BOOL>` persists a value
//! directly and skips the prompt; `--reset` clears the stored preference so
//! the next run prompts again.

use anyhow::Context;
use clap::Parser;
use lighthouse_config_store::ConfigStore;
use lighthouse_consent::APP_NAME;
use lighthouse_consent::ConsentPrompter;
use lighthouse_consent::PREFERENCE_KEY;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lighthouse", about = "One-time error reporting consent for lighthouse")]
struct Cli {
    /// Persist this error-reporting preference without prompting.
    #[arg(long, value_name = "BOOL")]
    enable_error_reporting: Option<bool>,

    /// Clear the stored preference so the next run prompts again.
    #[arg(long, conflicts_with = "enable_error_reporting")]
    reset: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let mut store = ConfigStore::open(APP_NAME).context("failed to open preference store")?;

    if cli.reset {
        store
            .remove(PREFERENCE_KEY)
            .context("failed to clear the stored preference")?;
        eprintln!("Cleared the stored error reporting preference.");
        return Ok(());
    }

    let enabled = match cli.enable_error_reporting {
        Some(enabled) => {
            store
                .set(PREFERENCE_KEY, enabled)
                .context("failed to persist the error reporting preference")?;
            enabled
        }
        None => ConsentPrompter::from_environment()
            .ask_permission(&mut store)
            .await
            .context("failed to resolve the error reporting preference")?,
    };

    println!(
        "Error reporting {}.",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
