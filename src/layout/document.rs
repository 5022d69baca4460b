//! The composed layout: positioned, fully styled elements
//!
//! Documents hold resolved symbols, never style tokens, and dynamic text as
//! binding relations. They are plain data and serialize to JSON as a list of
//! elements tagged by `kind`.

use serde::{Deserialize, Serialize};

use crate::binding::DynamicText;
use crate::host::{LayerInfo, MapId};
use crate::style::{
    DistanceUnit, PointSymbol, PolygonSymbol, ScaleBarStyle, Stroke, Symbol, TextSymbol,
};
use crate::template::{CollapsePolicy, ElementKind, LabelFrequency, LegendFitting, ScaleBarFitting};

use super::error::LayoutWarning;
use super::extent::{Camera, Extent};
use super::geometry::{Anchor, Page, Point, Rect};

/// A finished layout, ready for a render surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub name: String,
    pub project: String,
    pub theme: String,
    pub page: Page,
    /// Service layer credits are hidden by an invisible text element
    pub suppress_credits: bool,
    /// In z-order, bottom first
    pub elements: Vec<Element>,
}

impl LayoutDocument {
    pub fn new(
        name: impl Into<String>,
        project: impl Into<String>,
        theme: impl Into<String>,
        page: Page,
    ) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
            theme: theme.into(),
            page,
            suppress_credits: false,
            elements: Vec::new(),
        }
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// The map frame (plain or inset) named `name`
    pub fn frame(&self, name: &str) -> Option<&MapFrameElement> {
        self.element(name).and_then(|e| e.content.as_frame())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One positioned element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub z_order: usize,
    pub anchor: Anchor,
    pub anchor_point: Point,
    pub bounds: Rect,
    pub content: ElementContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementContent {
    MapFrame(MapFrameElement),
    InsetFrame(InsetFrameElement),
    Text(TextElement),
    NorthArrow(NorthArrowElement),
    ScaleBar(ScaleBarElement),
    Legend(LegendElement),
    DecorativeShape(ShapeElement),
    InvisibleCredits(TextElement),
}

impl ElementContent {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::MapFrame(_) => ElementKind::MapFrame,
            ElementContent::InsetFrame(_) => ElementKind::InsetFrame,
            ElementContent::Text(_) => ElementKind::Text,
            ElementContent::NorthArrow(_) => ElementKind::NorthArrow,
            ElementContent::ScaleBar(_) => ElementKind::ScaleBar,
            ElementContent::Legend(_) => ElementKind::Legend,
            ElementContent::DecorativeShape(_) => ElementKind::DecorativeShape,
            ElementContent::InvisibleCredits(_) => ElementKind::InvisibleCredits,
        }
    }

    pub fn as_frame(&self) -> Option<&MapFrameElement> {
        match self {
            ElementContent::MapFrame(frame) => Some(frame),
            ElementContent::InsetFrame(inset) => Some(&inset.frame),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            ElementContent::Text(text) | ElementContent::InvisibleCredits(text) => Some(text),
            _ => None,
        }
    }
}

/// A frame showing a host map through a camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFrameElement {
    pub map: MapId,
    pub map_name: String,
    pub map_description: Option<String>,
    /// Unset when there was nothing to fit
    pub camera: Option<Camera>,
    pub visible_extent: Option<Extent>,
    /// Snapshot of the map's layers when the frame was built
    pub layers: Vec<LayerInfo>,
    pub extent_indicators: Vec<ExtentIndicator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsetFrameElement {
    #[serde(flatten)]
    pub frame: MapFrameElement,
    pub source_map: MapId,
    /// Frame whose camera this inset's camera derives from
    pub camera_source: String,
    pub scale_multiplier: f64,
}

/// Another frame's footprint drawn inside this frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtentIndicator {
    pub source_frame: String,
    /// Page bounds of the source frame
    pub source_bounds: Rect,
    /// Map extent the source frame shows
    pub source_extent: Option<Extent>,
    /// Where that extent lands on the page inside this frame
    pub footprint: Option<Rect>,
    pub marker: PointSymbol,
    pub outline: PolygonSymbol,
    pub collapse: CollapsePolicy,
    /// Draw the marker instead of the outline
    pub collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    Point,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFrame {
    pub border: Option<Stroke>,
    pub background: Option<PolygonSymbol>,
    pub corner_rounding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub text_type: TextType,
    pub content: DynamicText,
    pub symbol: TextSymbol,
    pub frame: Option<ParagraphFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NorthArrowElement {
    pub frame: String,
    pub symbol: PointSymbol,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBarElement {
    pub frame: String,
    pub style: ScaleBarStyle,
    pub divisions: u32,
    pub subdivisions: u32,
    pub label_frequency: LabelFrequency,
    pub fitting: ScaleBarFitting,
    pub unit: DistanceUnit,
    /// Ground distance per division, in `unit`; unknown without a camera
    pub division_distance: Option<f64>,
    /// Bar length in inches
    pub bar_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub layer: String,
    pub patch: Option<Symbol>,
    pub show_heading: bool,
    pub show_group_layer_name: bool,
    pub show_layer_name: bool,
    pub label_symbol: TextSymbol,
    pub layer_name_symbol: TextSymbol,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendElement {
    pub frame: String,
    pub title: Option<String>,
    pub title_symbol: TextSymbol,
    pub fitting: LegendFitting,
    /// Item columns, filled top to bottom then left to right
    pub columns: usize,
    /// Items present when the legend was built
    pub items: Vec<LegendItem>,
}

impl LegendElement {
    /// Items in the tallest column
    pub fn rows(&self) -> usize {
        self.items.len().div_ceil(self.columns.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub symbol: PolygonSymbol,
}

/// Result of a successful composition
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub document: LayoutDocument,
    pub warnings: Vec<LayoutWarning>,
}
