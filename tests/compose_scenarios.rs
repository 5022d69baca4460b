//! End-to-end composition of the stock layouts against an in-memory host

use layout_composer::host::{LayerInfo, LayerKind};
use layout_composer::layout::{
    ComposeState, Composer, DataContext, ElementContent, Extent, LayoutConfig, LayoutDocument,
    LayoutError,
};
use layout_composer::style::StyleItemType;
use layout_composer::template::{
    presets, ElementSpec, LayoutTemplate, MapFrameSpec, Placement, SlotSpec,
};
use layout_composer::{HostMap, InMemoryHost, ThemeCatalog};
use pretty_assertions::assert_eq;

fn host() -> InMemoryHost {
    InMemoryHost::new()
        .with_map(
            HostMap::new("main", "Yellowstone")
                .with_description("Trails and lakes of the park")
                .with_layer(
                    LayerInfo::new("Trails", LayerKind::Feature)
                        .with_extent(Some(Extent::new(500_000.0, 4_900_000.0, 560_000.0, 4_950_000.0)))
                        .with_source("https://services.example.com/Trails/FeatureServer/0"),
                )
                .with_layer(
                    LayerInfo::new("Lakes", LayerKind::Feature)
                        .with_extent(Some(Extent::new(520_000.0, 4_910_000.0, 540_000.0, 4_930_000.0))),
                )
                .with_layer(LayerInfo::new("Topographic", LayerKind::Basemap)),
        )
        .with_source_extent(
            "portal:6b3112d1c2264cd39cfa1d109fa73283",
            Extent::new(-2_000_000.0, -1_000_000.0, 2_000_000.0, 1_000_000.0),
        )
}

fn compose(template: &LayoutTemplate, themes: &ThemeCatalog) -> Result<LayoutDocument, LayoutError> {
    let mut host = host();
    let mut ctx = DataContext::new(&mut host, themes).with_project("Park Survey");
    Composer::new(template, LayoutConfig::default())
        .compose(&mut ctx)
        .map(|c| c.document)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_landscape_inset_scale_follows_core() {
    let doc = compose(&presets::landscape_with_inset(), &ThemeCatalog::default()).unwrap();

    let core = doc.frame("Core Map Frame").unwrap().camera.unwrap();
    let Some(ElementContent::InsetFrame(inset)) = doc.element("Inset Map Frame").map(|e| &e.content) else {
        panic!("inset slot did not produce an inset frame");
    };
    let inset_camera = inset.frame.camera.unwrap();

    assert_eq!(inset_camera.scale, core.scale * 4.0);
    assert_eq!((inset_camera.x, inset_camera.y), (core.x, core.y));
    assert_eq!(inset.camera_source, "Core Map Frame");
    assert_eq!(inset.scale_multiplier, 4.0);
}

#[test]
fn test_extent_indicator_tracks_core_frame() {
    let doc = compose(&presets::landscape_with_inset(), &ThemeCatalog::default()).unwrap();
    let core = doc.element("Core Map Frame").unwrap();
    let inset = doc.element("Inset Map Frame").unwrap();
    let indicators = &inset.content.as_frame().unwrap().extent_indicators;

    assert_eq!(indicators.len(), 1);
    let indicator = &indicators[0];
    assert_eq!(indicator.source_frame, "Core Map Frame");
    assert_eq!(indicator.source_bounds, core.bounds);
    assert_eq!(indicator.marker.size, 30.0);
    assert!(!indicator.collapsed);

    // at 4x the scale the core footprint is a quarter of the core frame, centred in the inset
    let footprint = indicator.footprint.unwrap();
    assert!(approx(footprint.width(), core.bounds.width() / 4.0));
    assert!(inset.bounds.contains_rect(&footprint));
}

#[test]
fn test_zoom_factor_widens_core_scale() {
    let fitted = LayoutTemplate::new("Fitted", presets::landscape_with_inset().page).with_slot(SlotSpec::new(
        "Core Map Frame",
        Placement::rect((0.125, 0.125), (7.0, 7.75)),
        ElementSpec::MapFrame(MapFrameSpec::default()),
    ));
    let fitted = compose(&fitted, &ThemeCatalog::default()).unwrap();
    let zoomed = compose(&presets::landscape_with_inset(), &ThemeCatalog::default()).unwrap();

    let base = fitted.frame("Core Map Frame").unwrap().camera.unwrap().scale;
    let wide = zoomed.frame("Core Map Frame").unwrap().camera.unwrap().scale;
    assert_eq!(wide, base * 1.20);
}

#[test]
fn test_composition_is_deterministic() {
    let template = presets::landscape_with_inset();
    let first = compose(&template, &ThemeCatalog::default()).unwrap();
    let second = compose(&template, &ThemeCatalog::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_composing_twice_on_one_host_reuses_the_copy() {
    let template = presets::landscape_with_inset();
    let themes = ThemeCatalog::default();
    let mut host = host();
    let mut documents = Vec::new();
    for _ in 0..2 {
        let mut ctx = DataContext::new(&mut host, &themes).with_project("Park Survey");
        let composed = Composer::new(&template, LayoutConfig::default()).compose(&mut ctx).unwrap();
        documents.push(composed.document);
    }
    assert_eq!(documents[0], documents[1]);
    assert_eq!(host.map_count(), 2);
}

#[test]
fn test_document_survives_json_round_trip() {
    let doc = compose(&presets::landscape_with_inset(), &ThemeCatalog::default()).unwrap();
    let json = doc.to_json().unwrap();
    assert_eq!(LayoutDocument::from_json(&json).unwrap(), doc);
}

#[test]
fn test_missing_style_token_builds_nothing() {
    let theme = ThemeCatalog::default()
        .theme("ArcGIS 2D")
        .cloned()
        .unwrap()
        .without(StyleItemType::PointSymbol, "Esri Pin 1");
    let themes = ThemeCatalog::empty().with_theme(theme);

    let template = presets::landscape_with_inset();
    let mut host = host();
    let mut ctx = DataContext::new(&mut host, &themes);
    let mut composer = Composer::new(&template, LayoutConfig::default());
    let err = composer.compose(&mut ctx).unwrap_err();

    assert!(matches!(&err, LayoutError::StyleNotFound { token, .. } if token == "Esri Pin 1"));
    assert_eq!(composer.state(), &ComposeState::Failed(err));
    assert!(composer.partial_document().unwrap().elements.is_empty());
}

#[test]
fn test_portrait_composes_every_slot() {
    let template = presets::portrait_with_inset();
    let doc = compose(&template, &ThemeCatalog::default()).unwrap();

    let names: Vec<&str> = doc.elements.iter().map(|e| e.name.as_str()).collect();
    let slots: Vec<&str> = template.slots.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(names, slots);

    let inset = doc.element("Inset Map Frame").unwrap().content.as_frame().unwrap();
    let cities = inset.layers.iter().find(|l| l.name == "Major Cities").unwrap();
    assert_eq!(
        cities.definition_query.as_ref().map(|q| q.where_clause.as_str()),
        Some("POP_CLASS >= 8")
    );
    assert!(inset.layers.iter().all(|l| l.name != "Trails"));
}

#[test]
fn test_legend_snapshots_core_layers() {
    let doc = compose(&presets::landscape_with_inset(), &ThemeCatalog::default()).unwrap();
    let Some(ElementContent::Legend(legend)) = doc.element("Legend").map(|e| &e.content) else {
        panic!("legend slot did not produce a legend");
    };
    let items: Vec<String> = legend
        .items
        .iter()
        .map(|i| format!("{} heading={} layer_name={}", i.layer, i.show_heading, i.show_layer_name))
        .collect();
    insta::assert_snapshot!(items.join("\n"), @r###"
    Trails heading=false layer_name=false
    Lakes heading=false layer_name=false
    "###);
}

#[test]
fn test_scale_bar_keeps_requested_width() {
    let doc = compose(&presets::landscape_with_inset(), &ThemeCatalog::default()).unwrap();
    let bar = doc.element("Scale Bar").unwrap();
    let ElementContent::ScaleBar(scale_bar) = &bar.content else {
        panic!("scale bar slot did not produce a scale bar");
    };
    assert!(approx(bar.bounds.width(), 3.0));
    assert_eq!(scale_bar.divisions, 4);
    assert!(scale_bar.division_distance.unwrap() > 0.0);
}
