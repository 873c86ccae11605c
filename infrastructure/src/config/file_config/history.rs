//! History persistence from TOML (`[history]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw history configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHistoryConfig {
    /// Persist the archive between runs
    pub enabled: bool,
    /// Archive file; defaults to the user data directory
    pub path: Option<String>,
}

impl Default for FileHistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl FileHistoryConfig {
    /// Resolved archive location, `None` when persistence is off or no data
    /// directory exists
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        match &self.path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    /// `$XDG_DATA_HOME/expert-debate/history.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("expert-debate").join("history.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_history_has_no_path() {
        let config = FileHistoryConfig {
            enabled: false,
            path: Some("/tmp/history.json".to_string()),
        };
        assert!(config.resolved_path().is_none());
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = FileHistoryConfig {
            enabled: true,
            path: Some("debates.json".to_string()),
        };
        assert_eq!(config.resolved_path(), Some(PathBuf::from("debates.json")));
    }
}
