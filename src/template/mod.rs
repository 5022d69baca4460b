//! Layout templates
//!
//! A template is data: a page and an ordered list of slots. Templates are
//! authored in TOML or built in code, and the two stock layouts live in
//! [`presets`].
//!
//! # Example
//!
//! ```toml
//! name = "Simple"
//! page = { width = 11, height = 8.5 }
//!
//! [[slots]]
//! id = "Core Map Frame"
//! kind = "map_frame"
//! zoom_factor = 1.2
//! placement = { rect = { ll = [0.125, 0.125], ur = [7.0, 7.75] } }
//!
//! [[slots]]
//! id = "Core Map Title"
//! kind = "text"
//! content = "{mapFrame:Core Map Frame.mapName}"
//! symbol = { size = 24, font = { family = "Arial", style = "Bold" } }
//! placement = { point = { anchor = "bottom_left", at = [0.25, 7.2248] } }
//! ```

pub mod presets;
mod registry;
mod spec;

pub use registry::TemplateRegistry;
pub use spec::*;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading or looking up templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found in registry
    #[error("template not found: {name}")]
    NotFound { name: String, suggestions: Vec<String> },

    /// Duplicate template definition
    #[error("duplicate template definition: {name}")]
    Duplicate { name: String },

    /// Error reading template file
    #[error("error reading template file {path}: {message}")]
    FileReadError { path: PathBuf, message: String },

    /// Malformed template TOML
    #[error("failed to parse template: {0}")]
    Parse(#[from] toml::de::Error),
}

impl TemplateError {
    /// Byte range of a parse error in the template source
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        match self {
            TemplateError::Parse(err) => err.span(),
            _ => None,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            TemplateError::NotFound { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

impl LayoutTemplate {
    /// Parse a template from TOML
    pub fn from_toml(content: &str) -> Result<Self, TemplateError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a template file
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TemplateError::FileReadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_toml(&content)
    }
}
