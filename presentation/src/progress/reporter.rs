//! Progress reporting while a debate runs

use colored::Colorize;
use debate_application::DebateProgressNotifier;
use debate_domain::{CellKey, Expert, Round};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Streams statements to the terminal as they are generated.
///
/// A spinner runs while an expert is "thinking"; it is cleared as soon as the
/// first fragment arrives and the text is then printed inline.
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    /// Whether the current statement has printed any text yet
    streaming: Mutex<bool>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            streaming: Mutex::new(false),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        if let Some(pb) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Banner printed when a round begins
pub fn round_banner(round: Round, panel_size: usize) -> String {
    format!(
        "\n{} {} {}\n{}",
        format!("Round {}/{}", round.index() + 1, Round::COUNT).cyan(),
        round.display_name().bold(),
        format!("({} speakers)", panel_size).dimmed(),
        round.description().dimmed()
    )
}

/// Heading printed above an expert's statement
pub fn speaker_heading(expert: &Expert) -> String {
    format!("── {} ──", expert.label()).yellow().bold().to_string()
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: Round, panel_size: usize) {
        println!("{}", round_banner(round, panel_size));
    }

    fn on_statement_start(&self, expert: &Expert, _round: Round) {
        println!("\n{}", speaker_heading(expert));
        *self.streaming.lock().unwrap_or_else(PoisonError::into_inner) = false;

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(expert.name.clone());
        pb.set_message("is thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_statement_chunk(&self, _key: &CellKey, chunk: &str) {
        let mut streaming = self.streaming.lock().unwrap_or_else(PoisonError::into_inner);
        if !*streaming {
            self.clear_spinner();
            *streaming = true;
        }
        print!("{}", chunk);
        let _ = io::stdout().flush();
    }

    fn on_statement_end(&self, _key: &CellKey, success: bool) {
        self.clear_spinner();
        let streamed = std::mem::take(
            &mut *self.streaming.lock().unwrap_or_else(PoisonError::into_inner),
        );
        if streamed {
            println!();
        }
        if !success {
            println!("{}", "x statement failed; it will be retried".red());
        }
    }

    fn on_debate_complete(&self) {
        self.clear_spinner();
        println!("\n{}", "The debate is over.".green().bold());
    }
}

/// Line-per-statement progress on stderr, for machine-readable stdout
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: Round, panel_size: usize) {
        eprintln!(
            "{} {} ({} speakers)",
            "->".cyan(),
            round.display_name().bold(),
            panel_size
        );
    }

    fn on_statement_start(&self, expert: &Expert, _round: Round) {
        eprintln!("  {} {}", "..".dimmed(), expert.label());
    }

    fn on_statement_end(&self, key: &CellKey, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), key);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), key);
        }
    }

    fn on_debate_complete(&self) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::Stance;

    #[test]
    fn test_round_banner() {
        colored::control::set_override(false);
        let banner = round_banner(Round::Rebuttals, 4);
        assert!(banner.contains("Round 3/4 Rebuttals (4 speakers)"));
        assert!(banner.contains(Round::Rebuttals.description()));
    }

    #[test]
    fn test_speaker_heading() {
        colored::control::set_override(false);
        let expert = Expert::new("a", "Ada", Stance::Pro);
        assert_eq!(speaker_heading(&expert), "── Ada (pro) ──");
    }

    #[test]
    fn test_reporter_tracks_streaming_state() {
        let reporter = ProgressReporter::new();
        let expert = Expert::new("a", "Ada", Stance::Pro);
        let key = CellKey::new("a", Round::Opening);

        reporter.on_statement_start(&expert, Round::Opening);
        assert!(reporter.spinner.lock().unwrap().is_some());

        reporter.on_statement_chunk(&key, "Hello");
        assert!(reporter.spinner.lock().unwrap().is_none());
        assert!(*reporter.streaming.lock().unwrap());

        reporter.on_statement_end(&key, true);
        assert!(!*reporter.streaming.lock().unwrap());
    }
}
