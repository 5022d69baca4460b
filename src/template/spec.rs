//! Declarative layout templates: a page plus an ordered list of slots
//!
//! Slot order is significant. It is the z-order of the finished document and
//! the order in which frame references must be satisfied.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::MapId;
use crate::layout::{Anchor, Extent, Page, Point};
use crate::style::{
    Color, Font, HorizontalAlignment, StyleItemType, StyleRef, Stroke, Symbol, TextSymbol,
};

/// A complete layout description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    /// Also the layout name `{layout:...}` bindings must target
    pub name: String,
    pub page: Page,
    /// Append an invisible credits element unless a slot already provides one
    #[serde(default)]
    pub suppress_credits: bool,
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

impl LayoutTemplate {
    pub fn new(name: impl Into<String>, page: Page) -> Self {
        Self {
            name: name.into(),
            page,
            suppress_credits: false,
            slots: Vec::new(),
        }
    }

    pub fn with_slot(mut self, slot: SlotSpec) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_suppress_credits(mut self, suppress: bool) -> Self {
        self.suppress_credits = suppress;
        self
    }

    /// Find a slot by id
    pub fn slot(&self, id: &str) -> Option<&SlotSpec> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Ids of slots that declare a map frame, in declaration order
    pub fn frame_names(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|s| s.element.declares_frame())
            .map(|s| s.id.as_str())
    }
}

/// One named region of the page and what goes in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub id: String,
    pub placement: Placement,
    #[serde(flatten)]
    pub element: ElementSpec,
}

impl SlotSpec {
    pub fn new(id: impl Into<String>, placement: Placement, element: ElementSpec) -> Self {
        Self {
            id: id.into(),
            placement,
            element,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.element.kind()
    }
}

/// Where a slot sits on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Rectangle in page units; validated when composed
    Rect { ll: Point, ur: Point },
    /// The element's `anchor` sits on `at`
    Point {
        #[serde(default)]
        anchor: Anchor,
        at: Point,
    },
}

impl Placement {
    pub fn rect(ll: (f64, f64), ur: (f64, f64)) -> Self {
        Placement::Rect {
            ll: Point::new(ll.0, ll.1),
            ur: Point::new(ur.0, ur.1),
        }
    }

    pub fn point(anchor: Anchor, at: (f64, f64)) -> Self {
        Placement::Point {
            anchor,
            at: Point::new(at.0, at.1),
        }
    }
}

/// Element kinds a slot can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    MapFrame,
    InsetFrame,
    Text,
    NorthArrow,
    ScaleBar,
    Legend,
    DecorativeShape,
    InvisibleCredits,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::MapFrame => "map frame",
            ElementKind::InsetFrame => "inset frame",
            ElementKind::Text => "text",
            ElementKind::NorthArrow => "north arrow",
            ElementKind::ScaleBar => "scale bar",
            ElementKind::Legend => "legend",
            ElementKind::DecorativeShape => "decorative shape",
            ElementKind::InvisibleCredits => "invisible credits",
        };
        f.write_str(name)
    }
}

/// Kind-specific slot parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementSpec {
    MapFrame(MapFrameSpec),
    InsetFrame(InsetFrameSpec),
    Text(TextSpec),
    NorthArrow(NorthArrowSpec),
    ScaleBar(ScaleBarSpec),
    Legend(LegendSpec),
    DecorativeShape(ShapeSpec),
    InvisibleCredits(CreditsSpec),
}

impl ElementSpec {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementSpec::MapFrame(_) => ElementKind::MapFrame,
            ElementSpec::InsetFrame(_) => ElementKind::InsetFrame,
            ElementSpec::Text(_) => ElementKind::Text,
            ElementSpec::NorthArrow(_) => ElementKind::NorthArrow,
            ElementSpec::ScaleBar(_) => ElementKind::ScaleBar,
            ElementSpec::Legend(_) => ElementKind::Legend,
            ElementSpec::DecorativeShape(_) => ElementKind::DecorativeShape,
            ElementSpec::InvisibleCredits(_) => ElementKind::InvisibleCredits,
        }
    }

    /// Map frames and inset frames both register a frame under the slot id
    pub fn declares_frame(&self) -> bool {
        matches!(self, ElementSpec::MapFrame(_) | ElementSpec::InsetFrame(_))
    }

    /// Frame names this element refers to by name, outside of dynamic text
    pub fn frame_references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        match self {
            ElementSpec::MapFrame(spec) => {
                if let Some(indicator) = &spec.extent_indicator {
                    refs.push(indicator.source_frame.as_str());
                }
            }
            ElementSpec::InsetFrame(spec) => {
                if let Some(source) = &spec.map.copy_of {
                    refs.push(source.as_str());
                }
                refs.push(spec.camera.relative_to.as_str());
                if let Some(indicator) = &spec.extent_indicator {
                    refs.push(indicator.source_frame.as_str());
                }
            }
            ElementSpec::NorthArrow(spec) => refs.push(spec.frame.as_str()),
            ElementSpec::ScaleBar(spec) => refs.push(spec.frame.as_str()),
            ElementSpec::Legend(spec) => refs.push(spec.frame.as_str()),
            ElementSpec::Text(_) | ElementSpec::DecorativeShape(_) | ElementSpec::InvisibleCredits(_) => {}
        }
        refs
    }

    /// Every style reference with the item type it must resolve to
    pub fn style_refs(&self) -> Vec<(StyleItemType, &StyleRef)> {
        let mut refs = Vec::new();
        let indicator = match self {
            ElementSpec::MapFrame(spec) => spec.extent_indicator.as_ref(),
            ElementSpec::InsetFrame(spec) => spec.extent_indicator.as_ref(),
            _ => None,
        };
        if let Some(indicator) = indicator {
            refs.push((StyleItemType::PointSymbol, &indicator.marker));
            refs.push((StyleItemType::PolygonSymbol, &indicator.outline));
        }
        match self {
            ElementSpec::Text(spec) => {
                refs.extend(spec.symbol.halo_ref());
                if let Some(background) = spec.paragraph.as_ref().and_then(|p| p.background.as_ref()) {
                    refs.push((StyleItemType::PolygonSymbol, background));
                }
            }
            ElementSpec::NorthArrow(spec) => refs.push((StyleItemType::NorthArrow, &spec.style)),
            ElementSpec::ScaleBar(spec) => refs.push((StyleItemType::ScaleBar, &spec.style)),
            ElementSpec::Legend(spec) => {
                refs.extend(spec.text.halo_ref());
                if let Some(title) = &spec.title_symbol {
                    refs.extend(title.halo_ref());
                }
            }
            ElementSpec::DecorativeShape(spec) => {
                refs.push((StyleItemType::PolygonSymbol, &spec.symbol))
            }
            ElementSpec::MapFrame(_) | ElementSpec::InsetFrame(_) | ElementSpec::InvisibleCredits(_) => {}
        }
        refs
    }
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

/// Which host map a frame shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MapSource {
    /// The context's primary map, falling back to the host's active map
    #[default]
    Active,
    Map(MapId),
}

/// How a map frame's camera is derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtentPolicy {
    /// Fit the union of the map's visible feature layers
    #[default]
    UnionOfVisibleLayers,
    /// Fit a fixed extent in map units
    Explicit(Extent),
    /// Leave the camera unset
    Unset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFrameSpec {
    #[serde(default)]
    pub map: MapSource,
    #[serde(default)]
    pub extent: ExtentPolicy,
    /// Applied to the camera scale after fitting; 1.20 zooms out 20%
    #[serde(default = "one")]
    pub zoom_factor: f64,
    #[serde(default)]
    pub extent_indicator: Option<ExtentIndicatorSpec>,
}

impl Default for MapFrameSpec {
    fn default() -> Self {
        Self {
            map: MapSource::Active,
            extent: ExtentPolicy::UnionOfVisibleLayers,
            zoom_factor: 1.0,
            extent_indicator: None,
        }
    }
}

/// When an extent indicator shrinks to its marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollapsePolicy {
    /// Always draw the outline
    #[default]
    Never,
    /// Draw the marker once the outline's longer side is below this many inches
    BelowSize(f64),
}

/// Shows another frame's visible extent inside this frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtentIndicatorSpec {
    pub source_frame: String,
    pub marker: StyleRef,
    /// Overrides the marker symbol's size, in points
    #[serde(default)]
    pub marker_size: Option<f64>,
    pub outline: StyleRef,
    #[serde(default)]
    pub collapse: CollapsePolicy,
}

/// A map frame over a copy of another map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsetFrameSpec {
    pub map: InsetMapSpec,
    pub camera: InsetCameraSpec,
    #[serde(default)]
    pub extent_indicator: Option<ExtentIndicatorSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsetMapSpec {
    /// Frame whose map is copied; the primary map when absent
    #[serde(default)]
    pub copy_of: Option<String>,
    /// Name given to the copy
    pub name: String,
    #[serde(default)]
    pub strip_layers: bool,
    #[serde(default)]
    pub basemap: Option<BasemapSpec>,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasemapSpec {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsetCameraSpec {
    /// Frame whose final camera is copied
    pub relative_to: String,
    pub scale_multiplier: f64,
}

/// Where a layer's features come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSource {
    Uri(String),
    PortalItem(String),
}

impl LayerSource {
    /// Stable string form used as the layer's source reference
    pub fn reference(&self) -> String {
        match self {
            LayerSource::Uri(uri) => uri.clone(),
            LayerSource::PortalItem(id) => format!("portal:{id}"),
        }
    }

    /// Name a layer gets when its description does not rename it
    pub fn default_layer_name(&self) -> String {
        match self {
            LayerSource::Uri(uri) => {
                let segments: Vec<&str> = uri.trim_end_matches('/').split('/').collect();
                segments
                    .iter()
                    .position(|s| *s == "FeatureServer" || *s == "MapServer")
                    .and_then(|i| i.checked_sub(1))
                    .and_then(|i| segments.get(i))
                    .or_else(|| segments.last())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| uri.clone())
            }
            LayerSource::PortalItem(id) => format!("Portal item {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionQuery {
    pub name: String,
    pub where_clause: String,
}

/// One opaque label placement parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Label settings passed through to the host untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelClass {
    pub symbol: TextSymbol,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub placement: BTreeMap<String, LabelValue>,
}

/// A layer to add to an inset map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub source: LayerSource,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub definition_query: Option<DefinitionQuery>,
    #[serde(default)]
    pub renderer: Option<Symbol>,
    #[serde(default)]
    pub labels: Option<LabelClass>,
    #[serde(default)]
    pub transparency: f64,
}

impl LayerSpec {
    pub fn new(source: LayerSource) -> Self {
        Self {
            source,
            name: None,
            definition_query: None,
            renderer: None,
            labels: None,
            transparency: 0.0,
        }
    }
}

/// Text symbol parameters with an optional themed halo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyleSpec {
    #[serde(default)]
    pub color: Color,
    pub size: f64,
    #[serde(default)]
    pub font: Font,
    #[serde(default)]
    pub halo: Option<HaloSpec>,
    #[serde(default)]
    pub alignment: HorizontalAlignment,
    /// Vertical offset in points
    #[serde(default)]
    pub offset_y: f64,
}

impl TextStyleSpec {
    pub fn new(color: Color, size: f64, font: Font) -> Self {
        Self {
            color,
            size,
            font,
            halo: None,
            alignment: HorizontalAlignment::Left,
            offset_y: 0.0,
        }
    }

    pub fn with_halo(mut self, size: f64, symbol: StyleRef) -> Self {
        self.halo = Some(HaloSpec { size, symbol });
        self
    }

    fn halo_ref(&self) -> Option<(StyleItemType, &StyleRef)> {
        self.halo
            .as_ref()
            .map(|h| (StyleItemType::PolygonSymbol, &h.symbol))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaloSpec {
    pub size: f64,
    pub symbol: StyleRef,
}

/// Border and background of rectangle paragraph text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParagraphFrameSpec {
    #[serde(default)]
    pub border: Option<Stroke>,
    #[serde(default)]
    pub background: Option<StyleRef>,
    /// Percent of the shorter side
    #[serde(default)]
    pub corner_rounding: f64,
}

/// Point text (point placement) or paragraph text (rect placement)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    /// Literal text with `{...}` bindings
    pub content: String,
    pub symbol: TextStyleSpec,
    #[serde(default)]
    pub paragraph: Option<ParagraphFrameSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NorthArrowHaloSpec {
    pub fill: Color,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NorthArrowSpec {
    pub frame: String,
    pub style: StyleRef,
    /// Height in inches
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub halo: Option<NorthArrowHaloSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScaleBarFitting {
    /// Keep the division distance, resize the frame to the bar
    #[default]
    AdjustFrame,
    /// Round the division distance to a nice number and resize the bar
    AdjustWidth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelFrequency {
    #[default]
    Divisions,
    DivisionsAndFirstMidpoint,
    Ends,
    None,
}

impl LabelFrequency {
    /// Tick positions, in divisions from the bar start, that carry a label
    pub fn labelled_ticks(self, divisions: u32) -> Vec<f64> {
        let all = (0..=divisions).map(f64::from);
        match self {
            LabelFrequency::Divisions => all.collect(),
            LabelFrequency::DivisionsAndFirstMidpoint => {
                let mut ticks: Vec<f64> = all.collect();
                ticks.insert(1, 0.5);
                ticks
            }
            LabelFrequency::Ends => vec![0.0, f64::from(divisions)],
            LabelFrequency::None => Vec::new(),
        }
    }
}

fn default_divisions() -> u32 {
    4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBarSpec {
    pub frame: String,
    pub style: StyleRef,
    /// Bar width in inches; the slot width when absent
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default = "default_divisions")]
    pub divisions: u32,
    #[serde(default)]
    pub subdivisions: u32,
    #[serde(default)]
    pub label_frequency: LabelFrequency,
    #[serde(default)]
    pub fitting: ScaleBarFitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegendFitting {
    /// One column; a point-placed legend's frame grows to its items
    #[default]
    AdjustFrame,
    /// Keep the slot rectangle and spread items over as many columns as needed
    AdjustColumns,
}

/// Per-item toggles applied uniformly to the items present at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendItemToggles {
    #[serde(default = "yes")]
    pub show_headings: bool,
    #[serde(default = "yes")]
    pub show_group_layer_names: bool,
    #[serde(default = "yes")]
    pub show_layer_names: bool,
}

impl Default for LegendItemToggles {
    fn default() -> Self {
        Self {
            show_headings: true,
            show_group_layer_names: true,
            show_layer_names: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSpec {
    pub frame: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Title symbol; `text` is used when absent
    #[serde(default)]
    pub title_symbol: Option<TextStyleSpec>,
    /// Item label and layer name symbol
    pub text: TextStyleSpec,
    #[serde(default)]
    pub fitting: LegendFitting,
    #[serde(default)]
    pub items: LegendItemToggles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub symbol: StyleRef,
}

fn default_credits_size() -> f64 {
    10.0
}

/// Zero-opacity text bound to the layout's service layer credits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditsSpec {
    #[serde(default = "default_credits_size")]
    pub font_size: f64,
}

impl Default for CreditsSpec {
    fn default() -> Self {
        Self {
            font_size: default_credits_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slot_toml_flattens_kind() {
        let slot: SlotSpec = toml::from_str(
            r#"
id = "Core Map Frame"
kind = "map_frame"
zoom_factor = 1.2
placement = { rect = { ll = [0.125, 0.125], ur = [7.0, 7.75] } }
"#,
        )
        .unwrap();
        assert_eq!(slot.kind(), ElementKind::MapFrame);
        assert_eq!(slot.placement, Placement::rect((0.125, 0.125), (7.0, 7.75)));
        match slot.element {
            ElementSpec::MapFrame(spec) => {
                assert_eq!(spec.zoom_factor, 1.2);
                assert_eq!(spec.map, MapSource::Active);
                assert_eq!(spec.extent, ExtentPolicy::UnionOfVisibleLayers);
            }
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn test_inset_frame_references() {
        let spec = ElementSpec::InsetFrame(InsetFrameSpec {
            map: InsetMapSpec {
                copy_of: None,
                name: "Inset Map: Low Zoom".to_string(),
                strip_layers: true,
                basemap: None,
                layers: vec![],
            },
            camera: InsetCameraSpec {
                relative_to: "Core Map Frame".to_string(),
                scale_multiplier: 4.0,
            },
            extent_indicator: Some(ExtentIndicatorSpec {
                source_frame: "Core Map Frame".to_string(),
                marker: StyleRef::token("Esri Pin 1"),
                marker_size: Some(30.0),
                outline: StyleRef::token("Extent Outline"),
                collapse: CollapsePolicy::Never,
            }),
        });
        assert_eq!(spec.frame_references(), vec!["Core Map Frame", "Core Map Frame"]);
        let styles = spec.style_refs();
        assert_eq!(styles[0], (StyleItemType::PointSymbol, &StyleRef::token("Esri Pin 1")));
        assert_eq!(styles[1].0, StyleItemType::PolygonSymbol);
    }

    #[test]
    fn test_default_layer_names() {
        let cities = LayerSource::Uri(
            "https://services.arcgis.com/P3ePLMYs2RVChkJx/ArcGIS/rest/services/USA_Major_Cities_/FeatureServer/0"
                .to_string(),
        );
        assert_eq!(cities.default_layer_name(), "USA_Major_Cities_");
        let item = LayerSource::PortalItem("6b3112d1c2264cd39cfa1d109fa73283".to_string());
        assert_eq!(item.reference(), "portal:6b3112d1c2264cd39cfa1d109fa73283");
    }

    #[test]
    fn test_label_values_untagged() {
        let labels: LabelClass = toml::from_str(
            r#"
symbol = { size = 8 }
[placement]
feature_type = "point"
never_remove_label = true
label_buffer = 50
"#,
        )
        .unwrap();
        assert!(labels.visible);
        assert_eq!(labels.placement["feature_type"], LabelValue::Text("point".to_string()));
        assert_eq!(labels.placement["never_remove_label"], LabelValue::Bool(true));
        assert_eq!(labels.placement["label_buffer"], LabelValue::Number(50.0));
    }

    #[test]
    fn test_labelled_ticks() {
        assert_eq!(LabelFrequency::Ends.labelled_ticks(4), vec![0.0, 4.0]);
        assert_eq!(
            LabelFrequency::DivisionsAndFirstMidpoint.labelled_ticks(2),
            vec![0.0, 0.5, 1.0, 2.0]
        );
        assert!(LabelFrequency::None.labelled_ticks(4).is_empty());
    }
}
