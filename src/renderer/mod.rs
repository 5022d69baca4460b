//! Render surfaces for composed documents
//!
//! A [`RenderSurface`] receives a finished [`LayoutDocument`]. Two surfaces
//! ship with the crate: [`SvgSurface`] draws a preview of the page and
//! [`JsonSurface`] keeps the serialized document.

pub mod config;
mod json;
pub mod svg;

pub use config::SvgConfig;
pub use json::JsonSurface;
pub use svg::{render_svg, SvgSurface};

use std::collections::BTreeSet;

use thiserror::Error;

use crate::binding::{Binding, BindingKind, BindingProperty, DynamicText};
use crate::layout::LayoutDocument;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid SVG configuration: {0}")]
    InvalidConfig(String),
}

/// Where composed documents are presented
pub trait RenderSurface {
    fn present(&mut self, document: LayoutDocument) -> Result<(), RenderError>;
}

/// Evaluate dynamic text against a composed document.
///
/// Frames are looked up by name at evaluation time; bindings that name
/// nothing in the document render empty.
pub fn evaluate_text(document: &LayoutDocument, text: &DynamicText) -> String {
    text.evaluate(|binding| resolve_binding(document, binding))
}

fn resolve_binding(document: &LayoutDocument, binding: &Binding) -> Option<String> {
    match (binding.kind, binding.property) {
        (BindingKind::MapFrame, property) => {
            let frame = document.frame(binding.target.as_deref()?)?;
            match property {
                BindingProperty::MapName => Some(frame.map_name.clone()),
                BindingProperty::Description => frame.map_description.clone(),
                BindingProperty::Scale => frame.camera.map(|c| format!("1:{:.0}", c.scale)),
                _ => None,
            }
        }
        (BindingKind::Project, BindingProperty::Name) => Some(document.project.clone()),
        (BindingKind::Layout, BindingProperty::Name) => Some(document.name.clone()),
        (BindingKind::Layout, BindingProperty::ServiceLayerCredits) => Some(service_credits(document)),
        _ => None,
    }
}

/// Sources of every service-backed layer shown in the document
fn service_credits(document: &LayoutDocument) -> String {
    let sources: BTreeSet<&str> = document
        .elements
        .iter()
        .filter_map(|e| e.content.as_frame())
        .flat_map(|frame| frame.layers.iter())
        .filter_map(|layer| layer.source.as_deref())
        .collect();
    sources.into_iter().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{LayerInfo, LayerKind, MapId};
    use crate::layout::{
        rect, Anchor, Camera, Element, ElementContent, MapFrameElement, Page, Point,
    };

    fn document() -> LayoutDocument {
        let mut doc = LayoutDocument::new("Sheet", "Yellowstone", "ArcGIS 2D", Page::new(11.0, 8.5).unwrap());
        let bounds = rect(Point::new(1.0, 1.0), Point::new(5.0, 5.0)).unwrap();
        doc.elements.push(Element {
            name: "Main".to_string(),
            z_order: 0,
            anchor: Anchor::BottomLeft,
            anchor_point: bounds.ll(),
            bounds,
            content: ElementContent::MapFrame(MapFrameElement {
                map: MapId::new("main"),
                map_name: "Park Map".to_string(),
                map_description: None,
                camera: Some(Camera {
                    x: 0.0,
                    y: 0.0,
                    scale: 24000.0,
                }),
                visible_extent: None,
                layers: vec![LayerInfo::new("Cities", LayerKind::Feature).with_source("https://example.com/FeatureServer/0")],
                extent_indicators: Vec::new(),
            }),
        });
        doc
    }

    #[test]
    fn test_evaluate_bindings() {
        let doc = document();
        let text = crate::binding::parse("{mapFrame:Main.mapName} ({mapFrame:Main.scale}) - {project.name}").unwrap();
        assert_eq!(evaluate_text(&doc, &text), "Park Map (1:24000) - Yellowstone");
    }

    #[test]
    fn test_missing_frame_renders_empty() {
        let doc = document();
        let text = crate::binding::parse("[{mapFrame:Other.mapName}]").unwrap();
        assert_eq!(evaluate_text(&doc, &text), "[]");
    }

    #[test]
    fn test_service_credits() {
        let doc = document();
        let text = crate::binding::parse("{layout:Sheet.serviceLayerCredits}").unwrap();
        assert_eq!(evaluate_text(&doc, &text), "https://example.com/FeatureServer/0");
    }
}
