//! Panel entities

use super::value_objects::{ExpertId, Stance};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A debate participant (Entity)
///
/// Identity and profile are fixed once the panel is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expert {
    pub id: ExpertId,
    pub name: String,
    #[serde(default)]
    pub expertise: String,
    pub stance: Stance,
    /// Emoji or image URL
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub background: String,
    /// `true` if based on a real person
    #[serde(default)]
    pub is_real: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notable_works: Option<String>,
}

impl Expert {
    pub fn new(id: impl Into<ExpertId>, name: impl Into<String>, stance: Stance) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expertise: String::new(),
            stance,
            avatar: String::new(),
            personality: String::new(),
            background: String::new(),
            is_real: false,
            notable_works: None,
        }
    }

    pub fn with_expertise(mut self, expertise: impl Into<String>) -> Self {
        self.expertise = expertise.into();
        self
    }

    pub fn with_profile(
        mut self,
        personality: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        self.personality = personality.into();
        self.background = background.into();
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    pub fn real_person(mut self, notable_works: Option<String>) -> Self {
        self.is_real = true;
        self.notable_works = notable_works;
        self
    }

    /// "Name (stance)" label used in prompts and logs
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.stance)
    }
}

/// Ordered, non-empty set of experts with unique ids (Entity)
///
/// Panel order is the speaking order within every round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Expert>", into = "Vec<Expert>")]
pub struct Panel {
    experts: Vec<Expert>,
}

impl Panel {
    pub fn new(experts: Vec<Expert>) -> Result<Self, DomainError> {
        if experts.is_empty() {
            return Err(DomainError::EmptyPanel);
        }
        let mut seen = HashSet::new();
        for expert in &experts {
            if !seen.insert(expert.id.clone()) {
                return Err(DomainError::DuplicateExpert(expert.id.clone()));
            }
        }
        Ok(Self { experts })
    }

    pub fn len(&self) -> usize {
        self.experts.len()
    }

    /// Always `false`; a panel cannot be constructed empty
    pub fn is_empty(&self) -> bool {
        self.experts.is_empty()
    }

    pub fn experts(&self) -> &[Expert] {
        &self.experts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expert> {
        self.experts.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Expert> {
        self.experts.get(index)
    }

    pub fn find(&self, id: &ExpertId) -> Option<&Expert> {
        self.experts.iter().find(|e| &e.id == id)
    }

    /// Position of the expert in speaking order
    pub fn position(&self, id: &ExpertId) -> Option<usize> {
        self.experts.iter().position(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ExpertId) -> bool {
        self.position(id).is_some()
    }

    /// Everyone except the given expert, in panel order
    pub fn others(&self, id: &ExpertId) -> Vec<Expert> {
        self.experts.iter().filter(|e| &e.id != id).cloned().collect()
    }
}

impl TryFrom<Vec<Expert>> for Panel {
    type Error = DomainError;

    fn try_from(experts: Vec<Expert>) -> Result<Self, Self::Error> {
        Panel::new(experts)
    }
}

impl From<Panel> for Vec<Expert> {
    fn from(panel: Panel) -> Self {
        panel.experts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<Expert> {
        vec![
            Expert::new("a", "Ada", Stance::Pro),
            Expert::new("b", "Bo", Stance::Con),
            Expert::new("c", "Cy", Stance::Neutral),
        ]
    }

    #[test]
    fn test_panel_rejects_empty() {
        assert_eq!(Panel::new(vec![]), Err(DomainError::EmptyPanel));
    }

    #[test]
    fn test_panel_rejects_duplicate_ids() {
        let mut experts = abc();
        experts.push(Expert::new("b", "Bo again", Stance::Pro));
        assert_eq!(
            Panel::new(experts),
            Err(DomainError::DuplicateExpert(ExpertId::new("b")))
        );
    }

    #[test]
    fn test_panel_order_and_lookup() {
        let panel = Panel::new(abc()).unwrap();
        assert_eq!(panel.len(), 3);
        assert_eq!(panel.position(&"c".into()), Some(2));
        assert_eq!(panel.find(&"b".into()).unwrap().name, "Bo");
        let others: Vec<_> = panel.others(&"b".into()).into_iter().map(|e| e.name).collect();
        assert_eq!(others, vec!["Ada", "Cy"]);
    }

    #[test]
    fn test_panel_deserialize_validates() {
        let err = serde_json::from_str::<Panel>("[]");
        assert!(err.is_err());

        let json = r#"[{"id":"a","name":"Ada","stance":"pro"}]"#;
        let panel: Panel = serde_json::from_str(json).unwrap();
        assert_eq!(panel.experts()[0].label(), "Ada (pro)");
    }
}
