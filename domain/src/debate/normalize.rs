//! Final cleanup pass for a streamed statement.
//!
//! Models sometimes break character with stage directions (`*adjusts glasses*`,
//! `[pauses]`, `(laughs)`) or prefix the answer with their own name. These are
//! stripped once the stream has ended.

use regex::Regex;
use std::sync::LazyLock;

/// Verbs that open a stage direction
const ACTION_VERBS: &str = "adjusts?|pauses?|laughs?|smiles?|sighs?|nods?|chuckles?|leans?|\
    gestures?|shrugs?|grins?|frowns?|shakes? (?:his |her |their )?head|\
    clears? (?:his |her |their )?throat";

/// A stage direction between `open` and `close` that starts with an action verb
fn action_pattern(open: &str, close: &str) -> Regex {
    Regex::new(&format!(
        r"(?i){open}(?:{ACTION_VERBS})\b[^*\[\]()\n]{{0,60}}{close}"
    ))
    .expect("valid action pattern")
}

static STARRED_ACTION: LazyLock<Regex> =
    LazyLock::new(|| action_pattern(r"\*{1,2}", r"\*{1,2}"));

static BRACKETED_ACTION: LazyLock<Regex> =
    LazyLock::new(|| action_pattern(r"\[", r"\]"));

static PAREN_ACTION: LazyLock<Regex> =
    LazyLock::new(|| action_pattern(r"\(", r"\)"));

static EXTRA_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid whitespace pattern"));

/// Strip out-of-character annotations and an optional leading speaker label.
pub fn normalize_statement(text: &str, speaker: Option<&str>) -> String {
    let mut cleaned = STARRED_ACTION.replace_all(text, "").into_owned();
    cleaned = BRACKETED_ACTION.replace_all(&cleaned, "").into_owned();
    cleaned = PAREN_ACTION.replace_all(&cleaned, "").into_owned();
    cleaned = EXTRA_SPACES.replace_all(&cleaned, " ").into_owned();

    let mut trimmed = cleaned.trim();
    if let Some(name) = speaker
        && let Some(rest) = trimmed.strip_prefix(name)
        && let Some(rest) = rest.trim_start().strip_prefix(':')
    {
        trimmed = rest.trim_start();
    }

    trimmed
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_stage_directions() {
        let raw = "*adjusts glasses* Thank you. [pauses] The data is clear (laughs softly) on this.";
        assert_eq!(
            normalize_statement(raw, None),
            "Thank you. The data is clear on this."
        );
    }

    #[test]
    fn test_keeps_markdown_emphasis() {
        let raw = "This is *very* important. **Key point:** cities need trains.";
        assert_eq!(normalize_statement(raw, None), raw);
    }

    #[test]
    fn test_keeps_citations() {
        let raw = "See the study [Smith 2021] for details [3].";
        assert_eq!(normalize_statement(raw, None), raw);
    }

    #[test]
    fn test_strips_bold_action() {
        let raw = "**leans forward** We cannot wait.";
        assert_eq!(normalize_statement(raw, None), "We cannot wait.");
    }

    #[test]
    fn test_keeps_ordinary_parentheticals() {
        let raw = "Emissions fell (by 12% in 2023) after the policy.";
        assert_eq!(normalize_statement(raw, None), raw);
    }

    #[test]
    fn test_strips_speaker_label() {
        let raw = "Dr. Sarah Chen: I believe the benefits outweigh the risks.";
        assert_eq!(
            normalize_statement(raw, Some("Dr. Sarah Chen")),
            "I believe the benefits outweigh the risks."
        );
    }

    #[test]
    fn test_trims_and_preserves_paragraphs() {
        let raw = "  First paragraph.   \n\nSecond paragraph.\n";
        assert_eq!(
            normalize_statement(raw, None),
            "First paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_clean_text_is_unchanged() {
        let raw = "Plain argument.";
        assert_eq!(normalize_statement(raw, Some("Someone")), raw);
    }
}
