//! Ballot prompt shown once a debate is over.

use colored::Colorize;
use debate_domain::{ExpertId, Panel};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Resolve user input to a panel member.
///
/// Accepts an expert id, a 1-based seat number, or a case-insensitive name.
pub fn parse_ballot(panel: &Panel, input: &str) -> Option<ExpertId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(seat) = input.parse::<usize>() {
        return seat
            .checked_sub(1)
            .and_then(|i| panel.get(i))
            .map(|e| e.id.clone());
    }
    panel
        .iter()
        .find(|e| e.id.as_str() == input || e.name.eq_ignore_ascii_case(input))
        .map(|e| e.id.clone())
}

/// Ask who argued best. `None` means the user skipped.
pub async fn prompt_vote(panel: &Panel) -> Option<ExpertId> {
    println!("\n{}", "Who made the most convincing case?".cyan().bold());
    for (i, expert) in panel.iter().enumerate() {
        println!("  {}. {} {}", i + 1, expert.label(), expert.id.to_string().dimmed());
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    loop {
        print!("{} ", "vote (Enter to skip) >".magenta().bold());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.read_line(&mut line).await {
            Ok(0) | Err(_) => return None,
            Ok(_) if line.trim().is_empty() => return None,
            Ok(_) => match parse_ballot(panel, &line) {
                Some(id) => return Some(id),
                None => println!("{} '{}'", "No such expert:".red(), line.trim()),
            },
        }
    }
}
