//! Panel value objects

use serde::{Deserialize, Serialize};

/// Stable identity of an expert on a panel (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpertId(String);

impl ExpertId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExpertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExpertId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ExpertId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Position an expert takes on the topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Pro,
    Con,
    Neutral,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Pro => "pro",
            Stance::Con => "con",
            Stance::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pro" | "for" => Ok(Stance::Pro),
            "con" | "against" => Ok(Stance::Con),
            "neutral" | "moderator" => Ok(Stance::Neutral),
            other => Err(format!("unknown stance '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expert_id_serializes_as_plain_string() {
        let id = ExpertId::new("expert-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"expert-1\"");
    }

    #[test]
    fn test_stance_parse_aliases() {
        assert_eq!("FOR".parse::<Stance>(), Ok(Stance::Pro));
        assert_eq!("against".parse::<Stance>(), Ok(Stance::Con));
        assert_eq!("neutral".parse::<Stance>(), Ok(Stance::Neutral));
        assert!("maybe".parse::<Stance>().is_err());
    }
}
