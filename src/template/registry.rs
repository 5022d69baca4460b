//! Template registry for storing and retrieving layout templates

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{presets, LayoutTemplate, TemplateError};
use crate::layout::find_similar;

/// Registry of named layout templates
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, LayoutTemplate>,
    /// Base path for resolving relative file paths
    base_path: Option<PathBuf>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the stock presets
    pub fn with_presets() -> Self {
        let mut registry = Self::new();
        for template in presets::all() {
            registry.templates.insert(template.name.clone(), template);
        }
        registry
    }

    /// Set the base path for file resolution
    pub fn with_base_path(mut self, base_path: PathBuf) -> Self {
        self.base_path = Some(base_path);
        self
    }

    /// Register a template under its own name
    pub fn register(&mut self, template: LayoutTemplate) -> Result<(), TemplateError> {
        if self.templates.contains_key(&template.name) {
            return Err(TemplateError::Duplicate {
                name: template.name,
            });
        }
        debug!(name = %template.name, slots = template.slots.len(), "registered template");
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Result<&LayoutTemplate, TemplateError> {
        self.templates.get(name).ok_or_else(|| TemplateError::NotFound {
            name: name.to_string(),
            suggestions: find_similar(self.names(), name, 3),
        })
    }

    /// Check if a template exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// All template names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    /// Get the base path for file resolution
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    /// Resolve a relative path against the base path
    pub fn resolve_path(&self, relative: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) if relative.is_relative() => base.join(relative),
            _ => relative.to_path_buf(),
        }
    }

    /// Load a TOML template file and register it, returning its name
    pub fn load(&mut self, path: &Path) -> Result<String, TemplateError> {
        let template = LayoutTemplate::from_file(&self.resolve_path(path))?;
        let name = template.name.clone();
        self.register(template)?;
        Ok(name)
    }
}
