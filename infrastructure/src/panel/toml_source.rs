//! Panel definitions read from a TOML file.
//!
//! ```toml
//! [topic]
//! id = "cars"
//! title = "Should cities ban cars?"
//!
//! [[experts]]
//! id = "jacobs"
//! name = "Jane Jacobs"
//! stance = "pro"
//! expertise = "Urbanism"
//! is_real = true
//! ```
//!
//! The `[topic]` table is optional; the CLI can supply the topic instead.

use async_trait::async_trait;
use debate_application::ports::panel_source::{PanelError, PanelOptions, PanelSource};
use debate_domain::{Expert, Topic};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw panel file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelFile {
    #[serde(default)]
    pub topic: Option<Topic>,
    #[serde(default)]
    pub experts: Vec<Expert>,
}

impl PanelFile {
    pub fn parse(content: &str) -> Result<Self, PanelError> {
        toml::from_str(content).map_err(|e| PanelError::Invalid(e.to_string()))
    }

    pub fn read(path: &Path) -> Result<Self, PanelError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PanelError::Unavailable(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Apply `allow_fictional` and `count`, keeping file order
    pub fn select(&self, options: &PanelOptions) -> Vec<Expert> {
        self.experts
            .iter()
            .filter(|e| options.allow_fictional || e.is_real)
            .take(options.count)
            .cloned()
            .collect()
    }
}

/// [`PanelSource`] backed by a TOML panel file
#[derive(Debug, Clone)]
pub struct TomlPanelSource {
    path: PathBuf,
}

impl TomlPanelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Topic declared in the file, if any
    pub fn topic(&self) -> Result<Option<Topic>, PanelError> {
        Ok(PanelFile::read(&self.path)?.topic)
    }
}

#[async_trait]
impl PanelSource for TomlPanelSource {
    async fn assemble(
        &self,
        topic: &Topic,
        options: &PanelOptions,
    ) -> Result<Vec<Expert>, PanelError> {
        let file = PanelFile::read(&self.path)?;
        let experts = file.select(options);

        debug!(
            "Assembled {} of {} experts from {} for '{}'",
            experts.len(),
            file.experts.len(),
            self.path.display(),
            topic
        );

        if experts.is_empty() {
            return Err(PanelError::Empty);
        }
        Ok(experts)
    }
}
