//! Stock templates: a landscape and a portrait layout with an inset map
//!
//! Both share the same slot list (core frame, inset, title bar, three titles,
//! north arrow, scale bar, legend with a backing rectangle, description
//! paragraph, credits suppressor) and differ in geometry and a few symbols.

use std::collections::BTreeMap;

use crate::layout::{Anchor, Page, PageUnit};
use crate::style::{
    Color, Fill, Font, HorizontalAlignment, MarkerStyle, PointSymbol, PolygonSymbol, Stroke,
    StyleRef, Symbol, TextSymbol,
};

use super::spec::*;

const BASEMAP_STYLE: &str = "https://www.arcgis.com/sharing/rest/content/items/5e9b3685f4c24d8781073dd928ebda50/resources/styles/root.json";
const MAJOR_CITIES: &str = "https://services.arcgis.com/P3ePLMYs2RVChkJx/ArcGIS/rest/services/USA_Major_Cities_/FeatureServer/0";
const BOUNDARY_ITEM: &str = "6b3112d1c2264cd39cfa1d109fa73283";

const CORE: &str = "Core Map Frame";
const INSET: &str = "Inset Map Frame";

/// Every stock template
pub fn all() -> Vec<LayoutTemplate> {
    vec![landscape_with_inset(), portrait_with_inset()]
}

/// Look a preset up by its short CLI key
pub fn by_key(key: &str) -> Option<LayoutTemplate> {
    match key {
        "landscape" => Some(landscape_with_inset()),
        "portrait" => Some(portrait_with_inset()),
        _ => None,
    }
}

/// Short keys accepted by [`by_key`]
pub const KEYS: [&str; 2] = ["landscape", "portrait"];

/// 11 x 8.5 in, inset at the upper right
pub fn landscape_with_inset() -> LayoutTemplate {
    let name = "Landscape Layout with Inset";
    LayoutTemplate::new(name, page(11.0, 8.5))
        .with_slot(core_frame((0.125, 0.125), (7.0, 7.75), 1.20))
        .with_slot(inset_frame(
            (7.0, 4.125),
            (10.875, 8.375),
            InsetMapSpec {
                copy_of: Some(CORE.to_string()),
                name: "Inset Map: Low Zoom".to_string(),
                strip_layers: true,
                basemap: Some(BasemapSpec {
                    uri: BASEMAP_STYLE.to_string(),
                    name: None,
                }),
                layers: vec![LayerSpec::new(LayerSource::Uri(MAJOR_CITIES.to_string())), boundary_layer()],
            },
            4.0,
            30.0,
        ))
        .with_slot(title_bar((0.125, 7.75), (7.0, 8.375)))
        .with_slot(title(
            "Core Map Title",
            Anchor::BottomLeft,
            (0.25, 7.2248),
            "{mapFrame:Core Map Frame.mapName}",
            24.0,
            1.0,
        ))
        .with_slot(title(
            "Inset Map Title",
            Anchor::TopRight,
            (10.75, 8.25),
            "{mapFrame:Inset Map Frame.mapName}",
            16.0,
            1.0,
        ))
        .with_slot(title(
            "Project Title",
            Anchor::BottomLeft,
            (0.1875, 7.75),
            "{project.name}",
            36.0,
            1.0,
        ))
        .with_slot(north_arrow((6.5829, 7.125), Color::rgba(0, 174, 239, 100)))
        .with_slot(scale_bar((2.1843, 0.375), (5.0657, 0.746)))
        .with_slot(legend((7.125, 4.0)))
        .with_slot(legend_rectangle((7.0, 1.125), (10.875, 4.125), Color::rgba(0, 0, 0, 0)))
        .with_slot(description(
            (7.0, 0.125),
            (10.875, 1.125),
            10.0,
            ParagraphFrameSpec {
                border: Some(Stroke::solid(Color::BLACK, 1.0)),
                background: None,
                corner_rounding: 0.0,
            },
        ))
        .with_slot(credits())
}

/// 8.5 x 11 in, inset at the upper right, legend at the lower left
pub fn portrait_with_inset() -> LayoutTemplate {
    let name = "Portrait Layout with Inset";
    let mut cities = LayerSpec::new(LayerSource::Uri(MAJOR_CITIES.to_string()));
    cities.name = Some("Major Cities".to_string());
    cities.definition_query = Some(DefinitionQuery {
        name: "Population Definition".to_string(),
        where_clause: "POP_CLASS >= 8".to_string(),
    });
    cities.renderer = Some(Symbol::Point(PointSymbol::new(
        MarkerStyle::Diamond,
        9.0,
        Color::rgba(255, 144, 200, 100),
    )));
    cities.labels = Some(LabelClass {
        symbol: TextSymbol::new(Color::rgba(177, 48, 177, 100), 8.0, Font::new("Arial", "Regular"))
            .with_halo(0.2, PolygonSymbol::new(Fill::solid(Color::rgba(255, 255, 255, 75)), None)),
        visible: true,
        placement: placement([
            ("feature_type", text("point")),
            ("never_remove_label", LabelValue::Bool(true)),
            ("is_offset_from_feature_geometry", LabelValue::Bool(true)),
        ]),
    });

    LayoutTemplate::new(name, page(8.5, 11.0))
        .with_slot(core_frame((0.125, 0.125), (8.375, 10.2554), 1.25))
        .with_slot(inset_frame(
            (6.0, 8.375),
            (8.375, 10.875),
            InsetMapSpec {
                copy_of: Some(CORE.to_string()),
                name: "Inset Map: Low Zoom".to_string(),
                strip_layers: true,
                basemap: Some(BasemapSpec {
                    uri: BASEMAP_STYLE.to_string(),
                    name: Some("Dark Grey Base".to_string()),
                }),
                layers: vec![cities, boundary_layer()],
            },
            5.0,
            20.0,
        ))
        .with_slot(title_bar((0.125, 10.25), (6.0, 10.875)))
        .with_slot(title(
            "Core Map Title",
            Anchor::BottomMid,
            (6.25, 1.3),
            "{mapFrame:Core Map Frame.mapName}",
            24.0,
            1.0,
        ))
        .with_slot(title(
            "Inset Map Title",
            Anchor::TopRight,
            (8.25, 8.638),
            "{mapFrame:Inset Map Frame.mapName}",
            10.0,
            0.5,
        ))
        .with_slot(title(
            "Project Title",
            Anchor::BottomLeft,
            (0.25, 10.2693),
            "{project.name}",
            36.0,
            1.0,
        ))
        .with_slot(north_arrow((0.5421, 9.6308), Color::rgba(249, 249, 245, 100)))
        .with_slot(scale_bar((0.25, 2.125), (3.1082, 2.496)))
        .with_slot(legend_rectangle((0.125, 0.125), (4.0, 2.0), Color::rgba(255, 255, 255, 50)))
        .with_slot(legend((0.25, 1.875)))
        .with_slot(description(
            (4.375, 0.375),
            (8.125, 1.25),
            8.0,
            ParagraphFrameSpec {
                border: Some(Stroke::solid(Color::BLACK, 1.0)),
                background: Some(StyleRef::polygon(PolygonSymbol::new(
                    Fill::solid(Color::rgba(255, 255, 255, 50)),
                    None,
                ))),
                corner_rounding: 45.0,
            },
        ))
        .with_slot(credits())
}

fn page(width: f64, height: f64) -> Page {
    Page {
        width,
        height,
        unit: PageUnit::Inches,
    }
}

fn core_frame(ll: (f64, f64), ur: (f64, f64), zoom_factor: f64) -> SlotSpec {
    SlotSpec::new(
        CORE,
        Placement::rect(ll, ur),
        ElementSpec::MapFrame(MapFrameSpec {
            zoom_factor,
            ..MapFrameSpec::default()
        }),
    )
}

fn inset_frame(
    ll: (f64, f64),
    ur: (f64, f64),
    map: InsetMapSpec,
    scale_multiplier: f64,
    marker_size: f64,
) -> SlotSpec {
    SlotSpec::new(
        INSET,
        Placement::rect(ll, ur),
        ElementSpec::InsetFrame(InsetFrameSpec {
            map,
            camera: InsetCameraSpec {
                relative_to: CORE.to_string(),
                scale_multiplier,
            },
            extent_indicator: Some(ExtentIndicatorSpec {
                source_frame: CORE.to_string(),
                marker: StyleRef::token("Esri Pin 1"),
                marker_size: Some(marker_size),
                outline: StyleRef::polygon(PolygonSymbol::new(
                    Fill::none(),
                    Some(Stroke::solid(Color::RED, 1.0)),
                )),
                collapse: CollapsePolicy::Never,
            }),
        }),
    )
}

/// Hollow boundary polygons labelled along their edges
fn boundary_layer() -> LayerSpec {
    let mut layer = LayerSpec::new(LayerSource::PortalItem(BOUNDARY_ITEM.to_string()));
    layer.renderer = Some(Symbol::Polygon(PolygonSymbol::new(
        Fill::solid(Color::rgba(0, 0, 0, 0)),
        Some(Stroke::solid(Color::rgba(50, 75, 33, 100), 2.0)),
    )));
    layer.labels = Some(LabelClass {
        symbol: TextSymbol::new(Color::rgba(0, 122, 194, 100), 12.0, Font::new("Arial", "Regular"))
            .with_halo(
                0.2,
                PolygonSymbol::new(
                    Fill::solid(Color::rgba(255, 255, 255, 75)),
                    Some(Stroke::solid(Color::rgba(0, 0, 0, 0), 0.0)),
                ),
            ),
        visible: true,
        placement: placement([
            ("feature_type", text("polygon")),
            ("polygon_placement_method", text("repeat_along_boundary")),
            ("boundary_labeling_allow_single_sided", LabelValue::Bool(false)),
            ("boundary_labeling_single_sided_on_line", LabelValue::Bool(false)),
            ("label_buffer", LabelValue::Number(50.0)),
            ("is_label_buffer_hard_constraint", LabelValue::Bool(true)),
            ("can_place_label_outside_polygon", LabelValue::Bool(false)),
            ("avoid_polygon_holes", LabelValue::Bool(true)),
            ("remove_ambiguous_labels", text("all")),
            ("polygon_boundary_weight", LabelValue::Number(0.0)),
            ("feature_weight", LabelValue::Number(1000.0)),
            ("prefer_horizontal_placement", LabelValue::Bool(true)),
            ("primary_offset", LabelValue::Number(5.0)),
            ("is_offset_from_feature_geometry", LabelValue::Bool(true)),
            ("align_label_to_line_direction", LabelValue::Bool(false)),
            ("repeat_label", LabelValue::Bool(false)),
        ]),
    });
    layer.transparency = 0.0;
    layer
}

fn placement<const N: usize>(entries: [(&str, LabelValue); N]) -> BTreeMap<String, LabelValue> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn text(value: &str) -> LabelValue {
    LabelValue::Text(value.to_string())
}

fn title_bar(ll: (f64, f64), ur: (f64, f64)) -> SlotSpec {
    SlotSpec::new(
        "Title Bar",
        Placement::rect(ll, ur),
        ElementSpec::DecorativeShape(ShapeSpec {
            symbol: StyleRef::polygon(PolygonSymbol::new(
                Fill::solid(Color::rgba(0, 122, 194, 30)),
                Some(Stroke::solid(Color::BLACK, 1.0)),
            )),
        }),
    )
}

fn title(id: &str, anchor: Anchor, at: (f64, f64), content: &str, size: f64, halo: f64) -> SlotSpec {
    SlotSpec::new(
        id,
        Placement::point(anchor, at),
        ElementSpec::Text(TextSpec {
            content: content.to_string(),
            symbol: TextStyleSpec::new(Color::BLACK, size, Font::new("Arial", "Bold"))
                .with_halo(halo, StyleRef::token("Glacier")),
            paragraph: None,
        }),
    )
}

fn north_arrow(at: (f64, f64), halo_fill: Color) -> SlotSpec {
    SlotSpec::new(
        "North Arrow",
        Placement::point(Anchor::BottomLeft, at),
        ElementSpec::NorthArrow(NorthArrowSpec {
            frame: CORE.to_string(),
            style: StyleRef::token("ArcGIS North 10"),
            height: Some(0.8),
            halo: Some(NorthArrowHaloSpec {
                fill: halo_fill,
                size: 1.0,
            }),
        }),
    )
}

fn scale_bar(ll: (f64, f64), ur: (f64, f64)) -> SlotSpec {
    SlotSpec::new(
        "Scale Bar",
        Placement::rect(ll, ur),
        ElementSpec::ScaleBar(ScaleBarSpec {
            frame: CORE.to_string(),
            style: StyleRef::token("Double Alternating Scale Bar 1"),
            width: Some(3.0),
            divisions: 4,
            subdivisions: 0,
            label_frequency: LabelFrequency::Divisions,
            fitting: ScaleBarFitting::AdjustFrame,
        }),
    )
}

fn legend(top_left: (f64, f64)) -> SlotSpec {
    SlotSpec::new(
        "Legend",
        Placement::point(Anchor::TopLeft, top_left),
        ElementSpec::Legend(LegendSpec {
            frame: CORE.to_string(),
            title: Some("Legend".to_string()),
            title_symbol: None,
            text: TextStyleSpec::new(Color::BLACK, 12.0, Font::new("Arial", "Regular"))
                .with_halo(0.25, StyleRef::token("Water Intermittent")),
            fitting: LegendFitting::AdjustFrame,
            items: LegendItemToggles {
                show_headings: false,
                show_group_layer_names: false,
                show_layer_names: false,
            },
        }),
    )
}

fn legend_rectangle(ll: (f64, f64), ur: (f64, f64), fill: Color) -> SlotSpec {
    SlotSpec::new(
        "Legend Rectangle",
        Placement::rect(ll, ur),
        ElementSpec::DecorativeShape(ShapeSpec {
            symbol: StyleRef::polygon(PolygonSymbol::new(
                Fill::solid(fill),
                Some(Stroke::solid(Color::BLACK, 1.0)),
            )),
        }),
    )
}

fn description(ll: (f64, f64), ur: (f64, f64), size: f64, paragraph: ParagraphFrameSpec) -> SlotSpec {
    let mut symbol = TextStyleSpec::new(Color::BLACK, size, Font::new("Arial", "Regular"));
    symbol.alignment = HorizontalAlignment::Center;
    symbol.offset_y = -5.0;
    SlotSpec::new(
        "Core Frame Description",
        Placement::rect(ll, ur),
        ElementSpec::Text(TextSpec {
            content: "{mapFrame:Core Map Frame.description}".to_string(),
            symbol,
            paragraph: Some(paragraph),
        }),
    )
}

fn credits() -> SlotSpec {
    SlotSpec::new(
        "Invisible Service Layer",
        Placement::point(Anchor::BottomLeft, (0.0, 0.0)),
        ElementSpec::InvisibleCredits(CreditsSpec::default()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(template: &LayoutTemplate) -> Vec<&str> {
        template.slots.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_landscape_slot_order() {
        let template = landscape_with_inset();
        assert_eq!(
            ids(&template),
            vec![
                "Core Map Frame",
                "Inset Map Frame",
                "Title Bar",
                "Core Map Title",
                "Inset Map Title",
                "Project Title",
                "North Arrow",
                "Scale Bar",
                "Legend",
                "Legend Rectangle",
                "Core Frame Description",
                "Invisible Service Layer",
            ]
        );
        assert_eq!(template.page.orientation(), crate::layout::Orientation::Landscape);
    }

    #[test]
    fn test_portrait_puts_rectangle_under_legend() {
        let template = portrait_with_inset();
        let order = ids(&template);
        let rectangle = order.iter().position(|id| *id == "Legend Rectangle").unwrap();
        let legend = order.iter().position(|id| *id == "Legend").unwrap();
        assert!(rectangle < legend);
    }

    #[test]
    fn test_inset_parameters() {
        for (template, multiplier, marker) in [
            (landscape_with_inset(), 4.0, 30.0),
            (portrait_with_inset(), 5.0, 20.0),
        ] {
            let ElementSpec::InsetFrame(inset) = &template.slot(INSET).unwrap().element else {
                panic!("inset slot is not an inset frame");
            };
            assert_eq!(inset.camera.scale_multiplier, multiplier);
            assert_eq!(inset.extent_indicator.as_ref().unwrap().marker_size, Some(marker));
            assert_eq!(inset.map.name, "Inset Map: Low Zoom");
            assert!(inset.map.strip_layers);
        }
    }

    #[test]
    fn test_portrait_cities_layer() {
        let template = portrait_with_inset();
        let ElementSpec::InsetFrame(inset) = &template.slot(INSET).unwrap().element else {
            panic!("inset slot is not an inset frame");
        };
        let cities = &inset.map.layers[0];
        assert_eq!(cities.name.as_deref(), Some("Major Cities"));
        assert_eq!(
            cities.definition_query.as_ref().map(|q| q.where_clause.as_str()),
            Some("POP_CLASS >= 8")
        );
    }

    #[test]
    fn test_by_key() {
        assert_eq!(by_key("portrait").map(|t| t.name), Some("Portrait Layout with Inset".to_string()));
        assert!(by_key("square").is_none());
        assert_eq!(KEYS.len(), all().len());
    }
}
