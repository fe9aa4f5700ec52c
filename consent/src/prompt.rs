//! Interactive yes/no prompt providers.

use std::io::Write;

use owo_colors::OwoColorize;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

/// Source of a single yes/no answer. The consent flow races the returned
/// future against a deadline and drops it if the deadline wins, so
/// implementations must tolerate being abandoned mid-interaction.
pub trait PromptProvider {
    fn confirm(
        &self,
        message: &str,
        default: bool,
    ) -> impl Future<Output = std::io::Result<bool>>;
}

/// Prompt provider that renders the question to stderr and reads one line
/// from stdin. `y`/`yes` and `n`/`no` are accepted case-insensitively;
/// anything else (including an empty line or EOF) yields the default.
#[derive(Default)]
pub struct StdinPrompt;

impl PromptProvider for StdinPrompt {
    async fn confirm(&self, message: &str, default: bool) -> std::io::Result<bool> {
        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        eprint!("{message} {} ", suffix.dimmed());
        std::io::stderr().flush()?;

        // tokio's stdin reads on a blocking thread; dropping this future
        // abandons the interaction but cannot interrupt a read already in
        // flight. The race treats the dropped branch's eventual result as
        // discarded either way.
        let mut reader = BufReader::new(tokio::io::stdin());
        let mut line = String::new();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            return Ok(default);
        }
        Ok(parse_answer(line.trim(), default))
    }
}

fn parse_answer(answer: &str, default: bool) -> bool {
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        true
    } else if answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no") {
        false
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_yes_and_no_in_any_case() {
        assert!(parse_answer("y", false));
        assert!(parse_answer("YES", false));
        assert!(!parse_answer("n", true));
        assert!(!parse_answer("No", true));
    }

    #[test]
    fn anything_else_falls_back_to_the_default() {
        assert!(!parse_answer("", false));
        assert!(parse_answer("", true));
        assert!(!parse_answer("maybe", false));
        assert!(parse_answer("maybe", true));
    }
}
