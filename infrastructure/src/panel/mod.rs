//! Panel sources.

mod toml_source;

pub use toml_source::{PanelFile, TomlPanelSource};
