//! Debate round value object

use serde::{Deserialize, Serialize};

/// A round of the debate (Value Object)
///
/// Rounds are totally ordered and always run in the same sequence:
/// opening → arguments → rebuttals → closing. There is no skipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    /// Experts introduce their positions
    Opening,
    /// Core reasoning and evidence
    Arguments,
    /// Addressing opposing views
    Rebuttals,
    /// Final thoughts and conclusions
    Closing,
}

impl Round {
    /// Every round, in debate order
    pub const ALL: [Round; 4] = [
        Round::Opening,
        Round::Arguments,
        Round::Rebuttals,
        Round::Closing,
    ];

    /// Number of rounds in a debate
    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Opening => "opening",
            Round::Arguments => "arguments",
            Round::Rebuttals => "rebuttals",
            Round::Closing => "closing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Round::Opening => "Opening Statements",
            Round::Arguments => "Main Arguments",
            Round::Rebuttals => "Rebuttals",
            Round::Closing => "Closing Statements",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Round::Opening => "Experts introduce their positions",
            Round::Arguments => "Core reasoning and evidence",
            Round::Rebuttals => "Addressing opposing views",
            Round::Closing => "Final thoughts and conclusions",
        }
    }

    /// Zero-based position of this round
    pub fn index(&self) -> usize {
        match self {
            Round::Opening => 0,
            Round::Arguments => 1,
            Round::Rebuttals => 2,
            Round::Closing => 3,
        }
    }

    /// Round at the given position, if any
    pub fn from_index(index: usize) -> Option<Round> {
        Self::ALL.get(index).copied()
    }

    /// The round that follows this one, `None` after closing
    pub fn next(&self) -> Option<Round> {
        Self::from_index(self.index() + 1)
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Round {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "opening" => Ok(Round::Opening),
            "arguments" => Ok(Round::Arguments),
            "rebuttals" => Ok(Round::Rebuttals),
            "closing" => Ok(Round::Closing),
            other => Err(format!("unknown round '{}'", other)),
        }
    }
}
