//! Console output formatter for debates

use colored::Colorize;
use debate_application::VoteReceipt;
use debate_domain::{Debate, DebateSummary, HistoryEntry, OutputFormat, Panel, Round, Standing};

const WIDTH: usize = 60;
const BAR_WIDTH: usize = 20;

/// Formats debates for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a debate in the requested format
    pub fn render(debate: &Debate, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(debate),
            OutputFormat::Transcript => Self::format_transcript(debate),
            OutputFormat::Json => Self::format_json(debate),
        }
    }

    /// Format the complete debate: transcript, standings and summary
    pub fn format(debate: &Debate) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Expert Debate"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Topic:".cyan().bold(),
            debate.topic().title
        ));
        if !debate.topic().description.is_empty() {
            output.push_str(&format!("{}\n", debate.topic().description.dimmed()));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Panel:".cyan().bold(),
            Self::panel_line(debate.panel())
        ));

        for round in Round::ALL {
            let transcript = debate.round_transcript(round);
            if transcript.is_empty() {
                continue;
            }
            output.push_str(&Self::section_header(round.display_name()));
            for (expert, content) in transcript {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", expert.label()).yellow().bold(),
                    content
                ));
            }
        }

        output.push_str(&Self::format_results(debate));
        output.push_str(&Self::footer());
        output
    }

    /// Standings, winner and summary; empty when there are none yet
    pub fn format_results(debate: &Debate) -> String {
        let mut output = String::new();

        if debate.has_votes() {
            output.push_str(&Self::section_header("Standings"));
            output.push_str(&Self::format_standings(debate.panel(), &debate.standings()));
            if let Some(winner) = debate.winner() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Winner:".green().bold(),
                    winner.label()
                ));
            }
        }

        if let Some(summary) = debate.summary() {
            output.push_str(&Self::section_header("Summary"));
            output.push_str(&Self::format_summary(summary));
        }
        output
    }

    /// Statements only, grouped by round (plain text)
    pub fn format_transcript(debate: &Debate) -> String {
        let mut output = format!("# {}\n", debate.topic().title);

        for round in Round::ALL {
            let transcript = debate.round_transcript(round);
            if transcript.is_empty() {
                continue;
            }
            output.push_str(&format!("\n## {}\n", round.display_name()));
            for (expert, content) in transcript {
                output.push_str(&format!("\n{}: {}\n", expert.label(), content));
            }
        }

        output
    }

    /// Format as JSON
    pub fn format_json(debate: &Debate) -> String {
        serde_json::to_string_pretty(debate).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line per expert with a vote bar, in standings order
    pub fn format_standings(panel: &Panel, standings: &[Standing]) -> String {
        let name_width = panel.iter().map(|e| e.name.len()).max().unwrap_or(0);

        standings
            .iter()
            .map(|standing| {
                let name = panel
                    .find(&standing.expert_id)
                    .map(|e| e.name.as_str())
                    .unwrap_or(standing.expert_id.as_str());
                let filled = (standing.share * BAR_WIDTH as f64).round() as usize;
                format!(
                    "  {:<width$}  {}{}  {:>3} vote{}  {:>5.1}%\n",
                    name,
                    "█".repeat(filled).green(),
                    "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)).dimmed(),
                    standing.votes,
                    if standing.votes == 1 { "" } else { "s" },
                    standing.percentage(),
                    width = name_width
                )
            })
            .collect()
    }

    /// Confirmation printed after a ballot is accepted
    pub fn format_vote_receipt(debate: &Debate, receipt: &VoteReceipt) -> String {
        let name = debate
            .panel()
            .find(&receipt.expert_id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| receipt.expert_id.to_string());

        format!(
            "{} {} now has {} vote{}\n\n{}",
            "Vote recorded:".green().bold(),
            name,
            receipt.count,
            if receipt.count == 1 { "" } else { "s" },
            Self::format_standings(debate.panel(), &receipt.standings)
        )
    }

    pub fn format_summary(summary: &DebateSummary) -> String {
        let mut output = format!("\n{}\n", summary.summary);
        output.push_str(&format!(
            "\n{} {}\n",
            "Verdict:".cyan().bold(),
            summary.verdict
        ));

        if !summary.key_takeaways.is_empty() {
            output.push_str(&format!("\n{}\n", "Key Takeaways:".cyan().bold()));
            for point in &summary.key_takeaways {
                output.push_str(&format!("  * {}\n", point));
            }
        }
        output
    }

    /// Archive listing, newest first
    pub fn format_history(entries: &[HistoryEntry]) -> String {
        if entries.is_empty() {
            return format!("{}\n", "No archived debates yet.".dimmed());
        }

        let mut output = format!(
            "{} ({})\n\n",
            "Recent debates".cyan().bold(),
            entries.len()
        );
        for (i, entry) in entries.iter().enumerate() {
            let debate = entry.debate();
            let outcome = match debate.winner() {
                Some(winner) => format!("winner: {}", winner.name).green().to_string(),
                None => "no votes".dimmed().to_string(),
            };
            output.push_str(&format!(
                "{:>3}. {}  {}  {}\n     {}\n",
                i + 1,
                entry.archived_at().format("%Y-%m-%d %H:%M"),
                debate.topic().title.bold(),
                outcome,
                entry.id().to_string().dimmed()
            ));
        }
        output
    }

    /// Archive listing as JSON
    pub fn format_history_json(entries: &[HistoryEntry]) -> String {
        serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
    }

    fn panel_line(panel: &Panel) -> String {
        panel
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(WIDTH);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(WIDTH).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use debate_domain::{BallotPolicy, CellKey, Expert, Stance, Topic};

    fn finished_debate() -> Debate {
        colored::control::set_override(false);

        let topic = Topic::new("cars", "Should cities ban cars?").unwrap();
        let panel = Panel::new(vec![
            Expert::new("a", "Ada", Stance::Pro),
            Expert::new("b", "Bo", Stance::Con),
        ])
        .unwrap();
        let mut debate = Debate::new(topic, panel);

        for round in Round::ALL {
            for id in ["a", "b"] {
                let key = CellKey::new(id, round);
                debate.open_statement(&key, Utc::now()).unwrap();
                debate
                    .update_statement(&key, &format!("{} in {}", id, round))
                    .unwrap();
                debate.complete_statement(&key, None).unwrap();
            }
        }
        debate.mark_complete().unwrap();
        debate
    }

    #[test]
    fn test_transcript_groups_by_round_in_panel_order() {
        let text = ConsoleFormatter::format_transcript(&finished_debate());

        assert!(text.starts_with("# Should cities ban cars?"));
        let opening = text.find("## Opening Statements").unwrap();
        let closing = text.find("## Closing Statements").unwrap();
        assert!(opening < closing);

        let ada = text.find("Ada (pro): a in").unwrap();
        let bo = text.find("Bo (con): b in").unwrap();
        assert!(ada < bo);
        assert_eq!(text.matches("Ada (pro):").count(), 4);
    }

    #[test]
    fn test_full_output_shows_winner_after_votes() {
        let mut debate = finished_debate();
        assert!(!ConsoleFormatter::format(&debate).contains("Winner:"));

        debate
            .cast_vote(&"b".into(), BallotPolicy::Single)
            .unwrap();
        let text = ConsoleFormatter::format(&debate);
        assert!(text.contains("Standings"));
        assert!(text.contains("Winner: Bo (con)"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_json_round_trips() {
        let debate = finished_debate();
        let json = ConsoleFormatter::render(&debate, OutputFormat::Json);
        let restored: Debate = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, debate);
    }

    #[test]
    fn test_history_listing() {
        colored::control::set_override(false);
        assert!(ConsoleFormatter::format_history(&[]).contains("No archived debates"));

        let debate = finished_debate();
        let entry = HistoryEntry::snapshot(&debate, Utc::now());
        let text = ConsoleFormatter::format_history(&[entry]);
        assert!(text.contains("Recent debates (1)"));
        assert!(text.contains("Should cities ban cars?"));
        assert!(text.contains("no votes"));
    }

    #[test]
    fn test_summary_lists_takeaways() {
        colored::control::set_override(false);
        let summary = DebateSummary::new("Close call.", "Pro by a nose")
            .with_takeaways(vec!["Transit matters".to_string()]);
        let text = ConsoleFormatter::format_summary(&summary);
        assert!(text.contains("Verdict: Pro by a nose"));
        assert!(text.contains("  * Transit matters"));
    }
}
