//! Theme catalogs: named style tokens grouped by theme
//!
//! A theme maps human-readable tokens ("Esri Pin 1", "Glacier") to concrete
//! symbols. Themes are loaded from TOML; a small built-in "ArcGIS 2D" theme
//! carries the tokens the stock presets use.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::style::{StyleCatalog, StyleDefinition, StyleItemType, Symbol};

/// Errors that can occur when loading or parsing themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("style '{token}' is declared as {item_type} but its symbol is not")]
    TypeMismatch {
        token: String,
        item_type: StyleItemType,
    },
    #[error("style '{token}' ({item_type}) is declared twice in theme '{theme}'")]
    Duplicate {
        theme: String,
        token: String,
        item_type: StyleItemType,
    },
}

/// One named theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub description: Option<String>,
    styles: BTreeMap<(StyleItemType, String), Symbol>,
}

/// TOML structure for deserializing themes
#[derive(Deserialize)]
struct TomlTheme {
    metadata: TomlMetadata,
    #[serde(default)]
    styles: Vec<StyleDefinition>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: String,
    description: Option<String>,
}

/// Subset of the ArcGIS 2D style used by the stock presets
const DEFAULT_THEME: &str = r#"
[metadata]
name = "ArcGIS 2D"
description = "Built-in subset of the ArcGIS 2D style"

[[styles]]
token = "Esri Pin 1"
item_type = "point_symbol"
[styles.symbol]
type = "point"
marker = "pin"
size = 10
color = { r = 230, g = 0, b = 0 }

[[styles]]
token = "Glacier"
item_type = "polygon_symbol"
[styles.symbol]
type = "polygon"
fill = { color = { r = 225, g = 245, b = 252 } }
outline = { color = { r = 156, g = 196, b = 213 }, width = 0.4 }

[[styles]]
token = "Water Intermittent"
item_type = "polygon_symbol"
[styles.symbol]
type = "polygon"
fill = { color = { r = 190, g = 232, b = 255 } }
outline = { color = { r = 0, g = 112, b = 255 }, width = 0.7, style = "dash" }

[[styles]]
token = "ArcGIS North 10"
item_type = "north_arrow"
[styles.symbol]
type = "north_arrow"
marker = { marker = "arrow", size = 48, color = { r = 0, g = 0, b = 0 } }

[[styles]]
token = "Double Alternating Scale Bar 1"
item_type = "scale_bar"
[styles.symbol]
type = "scale_bar"
kind = "double_alternating"
unit = "miles"
label = { size = 10, font = { family = "Arial", style = "Regular" } }
"#;

impl Theme {
    /// Create an empty theme
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            styles: BTreeMap::new(),
        }
    }

    /// Load a theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a theme from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;
        let mut theme = Theme::new(parsed.metadata.name);
        theme.description = parsed.metadata.description;
        for style in parsed.styles {
            theme.insert(style)?;
        }
        Ok(theme)
    }

    /// Add a style, rejecting duplicates and symbols of the wrong kind
    pub fn insert(&mut self, style: StyleDefinition) -> Result<(), ThemeError> {
        if !style.item_type.accepts(&style.symbol) {
            return Err(ThemeError::TypeMismatch {
                token: style.token,
                item_type: style.item_type,
            });
        }
        let key = (style.item_type, style.token);
        if self.styles.contains_key(&key) {
            return Err(ThemeError::Duplicate {
                theme: self.name.clone(),
                token: key.1,
                item_type: key.0,
            });
        }
        self.styles.insert(key, style.symbol);
        Ok(())
    }

    /// Drop a token, if present
    pub fn without(mut self, item_type: StyleItemType, token: &str) -> Self {
        self.styles.remove(&(item_type, token.to_string()));
        self
    }

    /// Look up a token
    pub fn get(&self, item_type: StyleItemType, token: &str) -> Option<&Symbol> {
        self.styles.get(&(item_type, token.to_string()))
    }

    /// Number of styles in the theme
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// A set of themes, addressed by name
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeCatalog {
    themes: BTreeMap<String, Theme>,
}

impl ThemeCatalog {
    /// A catalog with no themes
    pub fn empty() -> Self {
        Self {
            themes: BTreeMap::new(),
        }
    }

    /// Add or replace a theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.themes.insert(theme.name.clone(), theme);
        self
    }

    pub fn theme(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    /// Theme names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(|s| s.as_str())
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        let theme = Theme::from_toml(DEFAULT_THEME).expect("Default theme should be valid TOML");
        Self::empty().with_theme(theme)
    }
}

impl StyleCatalog for ThemeCatalog {
    fn find(&self, theme: &str, item_type: StyleItemType, token: &str) -> Option<StyleDefinition> {
        self.theme(theme)
            .and_then(|t| t.get(item_type, token))
            .map(|symbol| StyleDefinition {
                token: token.to_string(),
                item_type,
                symbol: symbol.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, PolygonSymbol};

    #[test]
    fn test_default_catalog_has_preset_tokens() {
        let catalog = ThemeCatalog::default();
        let theme = catalog.theme("ArcGIS 2D").unwrap();
        assert!(theme.get(StyleItemType::PointSymbol, "Esri Pin 1").is_some());
        assert!(theme.get(StyleItemType::PolygonSymbol, "Glacier").is_some());
        assert!(theme.get(StyleItemType::PolygonSymbol, "Water Intermittent").is_some());
        assert!(theme.get(StyleItemType::NorthArrow, "ArcGIS North 10").is_some());
        assert!(theme
            .get(StyleItemType::ScaleBar, "Double Alternating Scale Bar 1")
            .is_some());
        assert_eq!(theme.len(), 5);
    }

    #[test]
    fn test_find_is_keyed_by_item_type() {
        let catalog = ThemeCatalog::default();
        assert!(catalog
            .find("ArcGIS 2D", StyleItemType::PointSymbol, "Esri Pin 1")
            .is_some());
        assert!(catalog
            .find("ArcGIS 2D", StyleItemType::PolygonSymbol, "Esri Pin 1")
            .is_none());
        assert!(catalog
            .find("ArcGIS 3D", StyleItemType::PointSymbol, "Esri Pin 1")
            .is_none());
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let result = Theme::from_toml(
            r#"
[metadata]
name = "Broken"

[[styles]]
token = "Glacier"
item_type = "point_symbol"
[styles.symbol]
type = "polygon"
fill = { color = { r = 1, g = 2, b = 3 } }
"#,
        );
        assert!(matches!(result, Err(ThemeError::TypeMismatch { .. })));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut theme = Theme::new("Mine");
        let style = StyleDefinition {
            token: "Box".to_string(),
            item_type: StyleItemType::PolygonSymbol,
            symbol: Symbol::Polygon(PolygonSymbol::filled(Color::WHITE)),
        };
        theme.insert(style.clone()).unwrap();
        assert!(matches!(
            theme.insert(style),
            Err(ThemeError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_without_removes_token() {
        let theme = ThemeCatalog::default()
            .theme("ArcGIS 2D")
            .cloned()
            .unwrap()
            .without(StyleItemType::PointSymbol, "Esri Pin 1");
        assert!(theme.get(StyleItemType::PointSymbol, "Esri Pin 1").is_none());
    }
}
