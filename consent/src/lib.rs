//! One-time consent prompt for anonymous error reporting.
//!
//! The first interactive run asks the user whether runtime exceptions may be
//! reported back, with a hard 20 second deadline; the answer is persisted in
//! the preference store and every later run returns it without prompting.
//! Non-interactive sessions (stdout is not a terminal, or `CI` is set) never
//! prompt and default to disabled.

mod prompt;

use std::io::IsTerminal;
use std::time::Duration;

use lighthouse_config_store::ConfigStore;
use lighthouse_config_store::ConfigStoreError;
use owo_colors::OwoColorize;
use thiserror::Error;

pub use crate::prompt::PromptProvider;
pub use crate::prompt::StdinPrompt;

/// Application name the preference store is opened under.
pub const APP_NAME: &str = "lighthouse";

/// Store key holding the persisted consent decision.
pub const PREFERENCE_KEY: &str = "isErrorReportingEnabled";

/// How long the prompt waits for an answer before giving up.
pub const MAXIMUM_WAIT_TIME: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error(transparent)]
    Store(#[from] ConfigStoreError),

    #[error("consent prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

fn consent_message() -> String {
    format!(
        "Lighthouse is requesting permission to anonymously report back runtime exceptions.\n  \
         This can include data such as the test URL, its subresources, your OS, Chrome version, and Lighthouse version.\n  \
         May {} {}",
        "Lighthouse".green(),
        "report this data to aid in improving the tool?".bold(),
    )
}

/// Returns true when the `CI` environment variable is set to a non-empty
/// value.
pub fn ci_env_var_set() -> bool {
    std::env::var("CI").is_ok_and(|v| !v.is_empty())
}

/// Decides and persists the error-reporting preference.
///
/// The environment probes are captured at construction so tests can inject
/// both the prompt provider and the interactivity flags.
pub struct ConsentPrompter<P> {
    provider: P,
    stdout_is_tty: bool,
    running_in_ci: bool,
}

impl ConsentPrompter<StdinPrompt> {
    /// Prompter wired to the real terminal and process environment.
    pub fn from_environment() -> Self {
        Self::with_provider(
            StdinPrompt,
            std::io::stdout().is_terminal(),
            ci_env_var_set(),
        )
    }
}

impl<P: PromptProvider> ConsentPrompter<P> {
    pub fn with_provider(provider: P, stdout_is_tty: bool, running_in_ci: bool) -> Self {
        Self {
            provider,
            stdout_is_tty,
            running_in_ci,
        }
    }

    /// Returns the stored preference when one exists; otherwise resolves it
    /// (prompt, timeout, or non-interactive default), persists it, and
    /// returns it. Store I/O and prompt failures propagate; absent or
    /// mistyped stored values and non-interactive sessions do not.
    pub async fn ask_permission(&self, store: &mut ConfigStore) -> Result<bool, ConsentError> {
        if let Some(enabled) = store.get_bool(PREFERENCE_KEY) {
            return Ok(enabled);
        }

        let enabled = self.resolve_preference().await?;
        store.set(PREFERENCE_KEY, enabled)?;
        Ok(enabled)
    }

    /// First-settled-wins race between the prompt and the deadline. The
    /// losing future is dropped; its eventual result can never change the
    /// returned value. A prompt I/O failure surfaces to the caller before
    /// anything is persisted.
    async fn resolve_preference(&self) -> std::io::Result<bool> {
        if !self.stdout_is_tty || self.running_in_ci {
            // Default non-interactive sessions to false.
            return Ok(false);
        }

        let message = consent_message();
        let deadline = tokio::time::sleep(MAXIMUM_WAIT_TIME);
        tokio::pin!(deadline);

        tokio::select! {
            answer = self.provider.confirm(&message, false) => answer,
            _ = &mut deadline => {
                eprintln!();
                eprintln!(
                    "Warning: No response to error logging preference, errors will not be reported."
                );
                tracing::warn!(
                    "no response to error logging preference within {}s",
                    MAXIMUM_WAIT_TIME.as_secs()
                );
                Ok(false)
            }
        }
    }
}
