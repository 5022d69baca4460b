//! An in-memory host: maps and layers described in TOML
//!
//! ```toml
//! active_map = "main"
//!
//! [[maps]]
//! id = "main"
//! name = "Yellowstone"
//! description = "Trails and lakes"
//!
//! [[maps.layers]]
//! name = "Trails"
//! extent = { xmin = 0, ymin = 0, xmax = 1000, ymax = 800 }
//!
//! # Extents reported for layers created from these sources
//! [sources]
//! "portal:6b3112d1c2264cd39cfa1d109fa73283" = { xmin = -2e6, ymin = -1e6, xmax = 2e6, ymax = 1e6 }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{HostError, LayerFactory, LayerInfo, LayerKind, MapId, MapProvider};
use crate::layout::Extent;
use crate::template::{LayerSource, LayerSpec};

/// A map owned by [`InMemoryHost`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostMap {
    pub id: MapId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Drawing order, top first
    #[serde(default)]
    pub layers: Vec<LayerInfo>,
}

impl HostMap {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MapId::new(id),
            name: name.into(),
            description: None,
            layers: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_layer(mut self, layer: LayerInfo) -> Self {
        self.layers.push(layer);
        self
    }
}

#[derive(Deserialize)]
struct HostFile {
    active_map: Option<MapId>,
    #[serde(default)]
    maps: Vec<HostMap>,
    #[serde(default)]
    sources: BTreeMap<String, Extent>,
}

/// Host double holding everything in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryHost {
    active: Option<MapId>,
    maps: BTreeMap<MapId, HostMap>,
    source_extents: BTreeMap<String, Extent>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a map; the first map added becomes active
    pub fn with_map(mut self, map: HostMap) -> Self {
        if self.active.is_none() {
            self.active = Some(map.id.clone());
        }
        self.maps.insert(map.id.clone(), map);
        self
    }

    pub fn with_active(mut self, id: MapId) -> Self {
        self.active = Some(id);
        self
    }

    /// Extent reported by layers created from `source`
    pub fn with_source_extent(mut self, source: impl Into<String>, extent: Extent) -> Self {
        self.source_extents.insert(source.into(), extent);
        self
    }

    /// Parse a host description from TOML
    pub fn from_toml(content: &str) -> Result<Self, HostError> {
        let file: HostFile =
            toml::from_str(content).map_err(|e| HostError::Parse(e.to_string()))?;
        let mut host = Self {
            active: None,
            maps: BTreeMap::new(),
            source_extents: file.sources,
        };
        for map in file.maps {
            host = host.with_map(map);
        }
        match file.active_map {
            Some(active) if !host.maps.contains_key(&active) => Err(HostError::UnknownMap(active)),
            Some(active) => Ok(host.with_active(active)),
            None => Ok(host),
        }
    }

    /// Read a host description file
    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let content = std::fs::read_to_string(path).map_err(|e| HostError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn map(&self, id: &MapId) -> Option<&HostMap> {
        self.maps.get(id)
    }

    /// Number of maps, copies included
    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    fn map_mut(&mut self, id: &MapId) -> Result<&mut HostMap, HostError> {
        self.maps
            .get_mut(id)
            .ok_or_else(|| HostError::UnknownMap(id.clone()))
    }

    fn get(&self, id: &MapId) -> Result<&HostMap, HostError> {
        self.maps
            .get(id)
            .ok_or_else(|| HostError::UnknownMap(id.clone()))
    }
}

fn is_style_uri(uri: &str) -> bool {
    uri.contains("/resources/styles/") || uri.ends_with(".json")
}

impl MapProvider for InMemoryHost {
    fn active_map(&self) -> Option<MapId> {
        self.active.clone()
    }

    fn map_name(&self, map: &MapId) -> Result<String, HostError> {
        Ok(self.get(map)?.name.clone())
    }

    fn map_description(&self, map: &MapId) -> Result<Option<String>, HostError> {
        Ok(self.get(map)?.description.clone())
    }

    fn layers(&self, map: &MapId) -> Result<Vec<LayerInfo>, HostError> {
        Ok(self.get(map)?.layers.clone())
    }

    /// Copies are keyed by source and name; copying again replaces the earlier copy
    fn copy_map(&mut self, map: &MapId, name: &str) -> Result<MapId, HostError> {
        let source = self.get(map)?;
        let id = MapId::new(format!("{map}/{name}"));
        let copy = HostMap {
            id: id.clone(),
            name: name.to_string(),
            description: source.description.clone(),
            layers: source.layers.clone(),
        };
        let replaced = self.maps.insert(id.clone(), copy).is_some();
        debug!(source = %map, copy = %id, replaced, "copied map");
        Ok(id)
    }

    fn remove_layers(&mut self, map: &MapId) -> Result<(), HostError> {
        self.map_mut(map)?.layers.clear();
        Ok(())
    }
}

impl LayerFactory for InMemoryHost {
    fn create_from_uri(
        &mut self,
        uri: &str,
        name: Option<&str>,
        map: &MapId,
    ) -> Result<LayerInfo, HostError> {
        if uri.trim().is_empty() {
            return Err(HostError::LayerCreation {
                source_ref: uri.to_string(),
                reason: "empty URI".to_string(),
            });
        }
        let kind = if is_style_uri(uri) {
            LayerKind::Basemap
        } else {
            LayerKind::Feature
        };
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| LayerSource::Uri(uri.to_string()).default_layer_name());
        let layer = LayerInfo::new(name, kind)
            .with_source(uri)
            .with_extent(self.source_extents.get(uri).copied());

        let target = self.map_mut(map)?;
        // Basemaps draw beneath everything else
        match kind {
            LayerKind::Basemap => target.layers.push(layer.clone()),
            _ => target.layers.insert(0, layer.clone()),
        }
        Ok(layer)
    }

    fn create_from_service_query(
        &mut self,
        spec: &LayerSpec,
        map: &MapId,
    ) -> Result<LayerInfo, HostError> {
        let source = spec.source.reference();
        let mut layer = LayerInfo::new(
            spec.name
                .clone()
                .unwrap_or_else(|| spec.source.default_layer_name()),
            LayerKind::Feature,
        )
        .with_extent(self.source_extents.get(&source).copied())
        .with_source(source);
        layer.definition_query = spec.definition_query.clone();
        layer.renderer = spec.renderer.clone();
        layer.labels = spec.labels.clone();
        layer.transparency = spec.transparency;

        self.map_mut(map)?.layers.insert(0, layer.clone());
        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::DefinitionQuery;

    const HOST: &str = r#"
active_map = "main"

[[maps]]
id = "main"
name = "Yellowstone"
description = "Trails and lakes"

[[maps.layers]]
name = "Trails"
extent = { xmin = 0, ymin = 0, xmax = 1000, ymax = 800 }

[[maps.layers]]
name = "Topo"
kind = "basemap"

[sources]
"portal:abc" = { xmin = -10, ymin = -10, xmax = 10, ymax = 10 }
"#;

    #[test]
    fn test_from_toml() {
        let host = InMemoryHost::from_toml(HOST).unwrap();
        let main = MapId::new("main");
        assert_eq!(host.active_map(), Some(main.clone()));
        assert_eq!(host.map_name(&main).unwrap(), "Yellowstone");
        assert_eq!(
            host.map_description(&main).unwrap().as_deref(),
            Some("Trails and lakes")
        );
        assert_eq!(host.layers(&main).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_active_map_rejected() {
        let err = InMemoryHost::from_toml("active_map = \"nope\"").unwrap_err();
        assert_eq!(err, HostError::UnknownMap(MapId::new("nope")));
    }

    #[test]
    fn test_copy_then_strip_leaves_source_untouched() {
        let mut host = InMemoryHost::from_toml(HOST).unwrap();
        let main = MapId::new("main");
        let copy = host.copy_map(&main, "Inset Map: Low Zoom").unwrap();
        assert_eq!(copy, MapId::new("main/Inset Map: Low Zoom"));
        assert_eq!(host.map_name(&copy).unwrap(), "Inset Map: Low Zoom");

        host.remove_layers(&copy).unwrap();
        assert!(host.layers(&copy).unwrap().is_empty());
        assert_eq!(host.layers(&main).unwrap().len(), 2);
        assert_eq!(host.map_count(), 2);
    }

    #[test]
    fn test_copy_again_replaces_earlier_copy() {
        let mut host = InMemoryHost::from_toml(HOST).unwrap();
        let main = MapId::new("main");
        let first = host.copy_map(&main, "Overview").unwrap();
        host.remove_layers(&first).unwrap();

        let second = host.copy_map(&main, "Overview").unwrap();
        assert_eq!(first, second);
        assert_eq!(host.layers(&second).unwrap().len(), 2);
        assert_eq!(host.map_count(), 2);
    }

    #[test]
    fn test_create_layers() {
        let mut host = InMemoryHost::from_toml(HOST).unwrap();
        let main = MapId::new("main");
        let basemap = host
            .create_from_uri(
                "https://www.arcgis.com/sharing/rest/content/items/5e9b3685f4c24d8781073dd928ebda50/resources/styles/root.json",
                Some("Dark Grey Base"),
                &main,
            )
            .unwrap();
        assert_eq!(basemap.kind, LayerKind::Basemap);
        assert_eq!(basemap.name, "Dark Grey Base");

        let mut spec = LayerSpec::new(LayerSource::PortalItem("abc".to_string()));
        spec.definition_query = Some(DefinitionQuery {
            name: "Big".to_string(),
            where_clause: "POP_CLASS >= 8".to_string(),
        });
        let layer = host.create_from_service_query(&spec, &main).unwrap();
        assert_eq!(layer.extent, Some(Extent::new(-10.0, -10.0, 10.0, 10.0)));
        assert_eq!(layer.source.as_deref(), Some("portal:abc"));

        let layers = host.layers(&main).unwrap();
        assert_eq!(layers.first().map(|l| l.name.as_str()), Some("Portal item abc"));
        assert_eq!(layers.last().map(|l| l.name.as_str()), Some("Dark Grey Base"));
    }

    #[test]
    fn test_unknown_map_errors() {
        let mut host = InMemoryHost::new();
        let missing = MapId::new("missing");
        assert!(host.layers(&missing).is_err());
        assert!(host.copy_map(&missing, "x").is_err());
        assert!(host.create_from_uri("https://x/FeatureServer/0", None, &missing).is_err());
    }
}
