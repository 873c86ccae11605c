//! CLI command definitions

use clap::Parser;
use debate_domain::OutputFormat;
use std::path::PathBuf;

/// CLI arguments for expert-debate
#[derive(Parser, Debug)]
#[command(name = "expert-debate")]
#[command(author, version, about = "Expert Debate - A panel of AI experts argues a topic")]
#[command(long_about = r#"
Expert Debate runs a panel of AI experts through a four-round debate.

Every expert speaks once per round, in panel order:
1. Opening Statements
2. Main Arguments
3. Rebuttals
4. Closing Statements

When the debate is over you can vote for the most convincing expert, ask for
a summary, or simply finish. Finished debates are kept in a local history of
the 10 most recent.

Configuration files are loaded from (in priority order):
1. EXPERT_DEBATE_* environment variables
2. --config <path>     Explicit config file
3. ./debate.toml       Project-level config
4. ~/.config/expert-debate/config.toml   Global config

Example:
  expert-debate panel.toml
  expert-debate panel.toml --topic "Should cities ban cars?" --vote jacobs
  expert-debate panel.toml --manual --summarize
  expert-debate --history
"#)]
pub struct Cli {
    /// Panel file (TOML with [[experts]] and an optional [topic])
    #[arg(value_name = "PANEL")]
    pub panel: Option<PathBuf>,

    /// Debate topic (overrides the panel file's [topic])
    #[arg(short, long, value_name = "TITLE")]
    pub topic: Option<String>,

    /// Number of experts to seat
    #[arg(short = 'n', long, value_name = "N")]
    pub count: Option<usize>,

    /// Only seat experts marked as real people
    #[arg(long)]
    pub real_only: bool,

    /// Wait for Enter before every statement instead of auto-advancing
    #[arg(long)]
    pub manual: bool,

    /// Vote for an expert once the debate is over
    #[arg(long, value_name = "EXPERT_ID")]
    pub vote: Option<String>,

    /// Archive the debate without voting
    #[arg(long, conflicts_with = "vote")]
    pub finish: bool,

    /// Request a closing summary once the debate is over
    #[arg(long)]
    pub summarize: bool,

    /// List archived debates and exit
    #[arg(long)]
    pub history: bool,

    /// Show an archived debate by id and exit
    #[arg(long, value_name = "DEBATE_ID")]
    pub show: Option<String>,

    /// Output format: full, transcript or json
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Append a JSONL transcript of the debate to this file
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// True when the invocation only reads the archive
    pub fn is_history_query(&self) -> bool {
        self.history || self.show.is_some()
    }
}
