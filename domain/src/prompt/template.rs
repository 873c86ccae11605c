//! Prompt templates for the debate flow

use crate::core::round::Round;
use crate::core::topic::Topic;
use crate::debate::entities::Debate;
use crate::panel::entities::Expert;

/// Templates for generating prompts at each stage
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// What the expert should deliver in a given round
    pub fn round_instructions(round: Round) -> &'static str {
        match round {
            Round::Opening => {
                "Give a compelling opening statement (2-3 paragraphs). Introduce your perspective and main thesis."
            }
            Round::Arguments => {
                "Present 2-3 strong arguments supporting your position. Reference facts, logic, or examples."
            }
            Round::Rebuttals => {
                "Respond to opposing viewpoints. Address counterarguments while strengthening your position."
            }
            Round::Closing => {
                "Deliver a powerful closing statement (2-3 paragraphs). Summarize your key points and leave a lasting impression."
            }
        }
    }

    /// System prompt establishing the expert's persona
    pub fn persona_system(expert: &Expert) -> String {
        let mut prompt = format!(
            "You are {}, {}.\nYour background: {}\nYour personality: {}\nYour position on this topic: {}",
            expert.name, expert.expertise, expert.background, expert.personality, expert.stance
        );
        if let Some(works) = &expert.notable_works {
            prompt.push_str(&format!("\nYour notable works: {}", works));
        }
        prompt.push_str(
            "\n\nStay in character. Do not write stage directions, actions in asterisks or brackets, or your own name as a prefix.",
        );
        prompt
    }

    /// User prompt for one statement
    pub fn statement_prompt(
        expert: &Expert,
        topic: &Topic,
        round: Round,
        prior_statements: &[(String, String)],
        other_experts: &[Expert],
    ) -> String {
        let mut prompt = format!(
            "Topic: {}\n{}\n\nRound: {}\n{}",
            topic.title,
            topic.description,
            round.as_str().to_uppercase(),
            Self::round_instructions(round)
        );

        if !other_experts.is_empty() {
            let others = other_experts
                .iter()
                .map(Expert::label)
                .collect::<Vec<_>>()
                .join(", ");
            prompt.push_str(&format!("\n\nOther participants: {}", others));
        }

        if !prior_statements.is_empty() {
            prompt.push_str("\n\nPrevious statements in this round:");
            for (name, content) in prior_statements {
                prompt.push_str(&format!("\n\n{}: {}", name, content));
            }
        }

        prompt.push_str(&format!(
            "\n\nRespond as {} in character. Be authentic to your position ({}) and personality. \
Keep it engaging and substantive but not too long (150-250 words).\n\nYour response:",
            expert.name, expert.stance
        ));
        prompt
    }

    /// System prompt for the summary request
    pub fn summary_system() -> &'static str {
        r#"You are an impartial debate moderator.
Summarize the debate fairly, name the position that was argued most convincingly,
and list the key takeaways.

Return ONLY valid JSON in this exact format, no markdown or extra text:
{"summary": "...", "verdict": "...", "keyTakeaways": ["...", "..."]}"#
    }

    /// User prompt carrying the full transcript
    pub fn summary_prompt(debate: &Debate) -> String {
        let mut prompt = format!(
            "Topic: {}\n{}\n\nParticipants:",
            debate.topic().title,
            debate.topic().description
        );
        for expert in debate.panel().iter() {
            prompt.push_str(&format!("\n- {}", expert.label()));
        }

        for round in Round::ALL {
            prompt.push_str(&format!("\n\n## {}", round.display_name()));
            for (expert, content) in debate.round_transcript(round) {
                prompt.push_str(&format!("\n\n{}: {}", expert.name, content));
            }
        }
        prompt
    }
}
