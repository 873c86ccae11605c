//! "Press Enter to continue" prompt for manual debates.

use colored::Colorize;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// What the user asked for at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueDecision {
    /// Generate the next statement
    Next,
    /// Switch to auto-advance for the rest of the debate
    Auto,
    /// Stop here; the debate can be resumed later
    Quit,
}

/// Interpret one line of input
pub fn parse_continue(line: &str) -> ContinueDecision {
    match line.trim().to_lowercase().as_str() {
        "a" | "auto" => ContinueDecision::Auto,
        "q" | "quit" | "exit" => ContinueDecision::Quit,
        _ => ContinueDecision::Next,
    }
}

/// Wait for a line on stdin.
///
/// EOF and cancellation both count as [`ContinueDecision::Quit`].
pub async fn wait_for_continue(cancel: &CancellationToken) -> ContinueDecision {
    if cancel.is_cancelled() {
        return ContinueDecision::Quit;
    }

    print!(
        "\n{} ",
        "[Enter] next  [a] auto  [q] quit >".magenta().bold()
    );
    let _ = io::stdout().flush();

    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        biased;
        _ = cancel.cancelled() => ContinueDecision::Quit,
        read = stdin.read_line(&mut line) => match read {
            Ok(0) | Err(_) => ContinueDecision::Quit,
            Ok(_) => parse_continue(&line),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_continue() {
        assert_eq!(parse_continue("\n"), ContinueDecision::Next);
        assert_eq!(parse_continue("anything"), ContinueDecision::Next);
        assert_eq!(parse_continue("A\n"), ContinueDecision::Auto);
        assert_eq!(parse_continue(" quit "), ContinueDecision::Quit);
    }

    #[tokio::test]
    async fn test_cancelled_prompt_quits() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(wait_for_continue(&cancel).await, ContinueDecision::Quit);
    }
}
