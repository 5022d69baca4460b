//! Host application collaborators
//!
//! The composer never owns maps or layers. It reaches them through the traits
//! in this module, which a desktop host, a test double or [`InMemoryHost`]
//! implement.

pub mod memory;

pub use memory::{HostMap, InMemoryHost};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::Extent;
use crate::style::Symbol;
use crate::template::{DefinitionQuery, LabelClass, LayerSpec};

pub use crate::renderer::RenderSurface;

/// Opaque handle to a host-owned map
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub String);

impl MapId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    #[default]
    Feature,
    Basemap,
    Raster,
    Group,
}

/// What the host reports about one layer of a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    #[serde(default)]
    pub kind: LayerKind,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub extent: Option<Extent>,
    /// URI or portal item the layer was created from
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub definition_query: Option<DefinitionQuery>,
    #[serde(default)]
    pub renderer: Option<Symbol>,
    #[serde(default)]
    pub labels: Option<LabelClass>,
    /// Percent, 0 opaque
    #[serde(default)]
    pub transparency: f64,
}

fn default_visible() -> bool {
    true
}

impl LayerInfo {
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visible: true,
            extent: None,
            source: None,
            definition_query: None,
            renderer: None,
            labels: None,
            transparency: 0.0,
        }
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_extent(mut self, extent: Option<Extent>) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    pub fn is_feature(&self) -> bool {
        self.kind == LayerKind::Feature
    }

    /// Whether labels are switched on for this layer
    pub fn labels_visible(&self) -> bool {
        self.labels.as_ref().is_some_and(|l| l.visible)
    }
}

/// Errors raised by host collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("unknown map '{0}'")]
    UnknownMap(MapId),

    #[error("cannot create a layer from '{source_ref}': {reason}")]
    LayerCreation { source_ref: String, reason: String },

    #[error("failed to read host file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("failed to parse host description: {0}")]
    Parse(String),
}

/// Access to the host's maps
pub trait MapProvider {
    /// The map the user is working in, if any
    fn active_map(&self) -> Option<MapId>;

    fn map_name(&self, map: &MapId) -> Result<String, HostError>;

    /// Free-form description shown by `{mapFrame:<frame>.description}`
    fn map_description(&self, map: &MapId) -> Result<Option<String>, HostError>;

    /// Layers in drawing order, top first
    fn layers(&self, map: &MapId) -> Result<Vec<LayerInfo>, HostError>;

    /// Structural copy of a map under a new name
    fn copy_map(&mut self, map: &MapId, name: &str) -> Result<MapId, HostError>;

    /// Remove every layer of a map
    fn remove_layers(&mut self, map: &MapId) -> Result<(), HostError>;
}

/// Adds layers to host maps
pub trait LayerFactory {
    /// Add a layer from a style-catalog or service URI, optionally renamed
    fn create_from_uri(
        &mut self,
        uri: &str,
        name: Option<&str>,
        map: &MapId,
    ) -> Result<LayerInfo, HostError>;

    /// Add a feature layer built from a full layer description
    fn create_from_service_query(
        &mut self,
        spec: &LayerSpec,
        map: &MapId,
    ) -> Result<LayerInfo, HostError>;
}

/// Everything the composer needs from the host
pub trait Host: MapProvider + LayerFactory {}

impl<T: MapProvider + LayerFactory> Host for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_info_toml_defaults() {
        let layer: LayerInfo = toml::from_str(r#"name = "Trails""#).unwrap();
        assert_eq!(layer, LayerInfo::new("Trails", LayerKind::Feature));
        assert!(layer.is_visible());
        assert!(!layer.labels_visible());
    }

    #[test]
    fn test_host_error_display() {
        let err = HostError::UnknownMap(MapId::new("missing"));
        assert_eq!(err.to_string(), "unknown map 'missing'");
    }
}
