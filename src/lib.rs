//! Layout Composer - declarative print layouts for map documents
//!
//! A [`LayoutTemplate`] lists the elements of a printed page as slots: map
//! frames, an inset with an extent indicator, titles, a north arrow, a scale
//! bar, a legend and decorative shapes. Composing a template against a host's
//! maps produces a [`LayoutDocument`], which a [`RenderSurface`] presents.
//!
//! # Example
//!
//! ```rust
//! use layout_composer::{compose_to_svg, InMemoryHost, LayoutTemplate};
//!
//! let template = LayoutTemplate::from_toml(r#"
//! name = "Simple"
//! page = { width = 11, height = 8.5 }
//!
//! [[slots]]
//! id = "Core Map Frame"
//! kind = "map_frame"
//! placement = { rect = { ll = [0.125, 0.125], ur = [7.0, 7.75] } }
//!
//! [[slots]]
//! id = "Core Map Title"
//! kind = "text"
//! content = "{mapFrame:Core Map Frame.mapName}"
//! symbol = { size = 24 }
//! placement = { point = { anchor = "bottom_left", at = [0.25, 7.2248] } }
//! "#).unwrap();
//!
//! let mut host = InMemoryHost::from_toml(r#"
//! [[maps]]
//! id = "main"
//! name = "Yellowstone"
//! "#).unwrap();
//!
//! let svg = compose_to_svg(&template, &mut host).unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("Yellowstone"));
//! ```

pub mod binding;
pub mod error;
pub mod host;
pub mod layout;
pub mod renderer;
pub mod style;
pub mod template;
pub mod theme;

pub use binding::{parse, Binding, DynamicText};
pub use error::BindingError;
pub use host::memory::{HostMap, InMemoryHost};
pub use host::{Host, HostError, MapId};
pub use layout::{
    Composer, Composition, DataContext, LayoutConfig, LayoutDocument, LayoutError, LayoutWarning,
};
pub use renderer::{render_svg, JsonSurface, RenderError, RenderSurface, SvgConfig, SvgSurface};
pub use template::{LayoutTemplate, TemplateError, TemplateRegistry};
pub use theme::{Theme, ThemeCatalog, ThemeError};

use thiserror::Error;

/// Errors that can occur anywhere in the compose pipeline
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("theme error: {0}")]
    Theme(#[from] ThemeError),

    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// Error during composition
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Configuration for the complete compose pipeline
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Themes style tokens resolve against
    pub themes: ThemeCatalog,
    /// Theme to resolve in
    pub theme: String,
    pub project: String,
    /// Debug mode: print the composed element tree to stderr
    pub debug: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            svg: SvgConfig::default(),
            themes: ThemeCatalog::default(),
            theme: "ArcGIS 2D".to_string(),
            project: "Untitled".to_string(),
            debug: false,
        }
    }
}

impl ComposeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    pub fn with_themes(mut self, themes: ThemeCatalog) -> Self {
        self.themes = themes;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Compose a template against a host with custom configuration
pub fn compose_with_config(
    template: &LayoutTemplate,
    host: &mut dyn Host,
    config: &ComposeConfig,
) -> Result<Composition, ComposeError> {
    let mut ctx = DataContext::new(host, &config.themes)
        .with_theme(config.theme.clone())
        .with_project(config.project.clone());
    let composition = Composer::new(template, config.layout.clone()).compose(&mut ctx)?;

    if config.debug {
        print_tree(&composition.document);
    }
    Ok(composition)
}

/// Compose a template and hand the document to `surface`.
///
/// Returns the warnings raised while composing.
pub fn compose_and_present(
    template: &LayoutTemplate,
    host: &mut dyn Host,
    config: &ComposeConfig,
    surface: &mut dyn RenderSurface,
) -> Result<Vec<LayoutWarning>, ComposeError> {
    let Composition { document, warnings } = compose_with_config(template, host, config)?;
    surface.present(document)?;
    Ok(warnings)
}

/// Compose a template with default configuration and draw an SVG preview
pub fn compose_to_svg(template: &LayoutTemplate, host: &mut dyn Host) -> Result<String, ComposeError> {
    let config = ComposeConfig::default();
    let mut surface = SvgSurface::new(config.svg.clone());
    compose_and_present(template, host, &config, &mut surface)?;
    Ok(surface.into_output().unwrap_or_default())
}

fn print_tree(document: &LayoutDocument) {
    eprintln!("=== Layout Debug: {} ===", document.name);
    for element in &document.elements {
        eprintln!(
            "[{}] z={} {:?} bounds={}",
            element.name,
            element.z_order,
            element.content.kind(),
            element.bounds
        );
        if let Some(frame) = element.content.as_frame() {
            for indicator in &frame.extent_indicators {
                eprintln!(
                    "  indicator <- {} collapsed={}",
                    indicator.source_frame, indicator.collapsed
                );
            }
        }
    }
    eprintln!("====================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::presets;

    fn host() -> InMemoryHost {
        InMemoryHost::from_toml(
            r#"
[[maps]]
id = "main"
name = "Yellowstone"

[[maps.layers]]
name = "Trails"
source = "https://services.example.com/Trails/FeatureServer/0"
extent = { xmin = 0, ymin = 0, xmax = 1000, ymax = 800 }
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_compose_preset_to_json() {
        let template = presets::landscape_with_inset();
        let mut surface = JsonSurface::new();
        compose_and_present(&template, &mut host(), &ComposeConfig::default(), &mut surface).unwrap();
        let doc = LayoutDocument::from_json(surface.output().unwrap()).unwrap();
        assert_eq!(doc.name, template.name);
        assert!(doc.frame("Core Map Frame").is_some());
    }

    #[test]
    fn test_compose_to_svg_evaluates_title() {
        let svg = compose_to_svg(&presets::landscape_with_inset(), &mut host()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(">Yellowstone</text>"));
    }

    #[test]
    fn test_unknown_theme_fails() {
        let config = ComposeConfig::new().with_theme("Dark Theme");
        let err = compose_with_config(&presets::landscape_with_inset(), &mut host(), &config).unwrap_err();
        assert!(matches!(err, ComposeError::Layout(LayoutError::StyleNotFound { .. })));
    }
}
