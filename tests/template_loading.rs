//! Templates authored in TOML: loading, registry lookups and composition

use std::fs;

use layout_composer::layout::{compose, DataContext};
use layout_composer::template::{CollapsePolicy, ElementSpec, TemplateError, TemplateRegistry};
use layout_composer::{InMemoryHost, LayoutTemplate, ThemeCatalog};

const INSET_TEMPLATE: &str = r#"
name = "Trail Sheet"
page = { width = 11, height = 8.5 }
suppress_credits = true

[[slots]]
id = "Main"
kind = "map_frame"
zoom_factor = 1.2
placement = { rect = { ll = [0.125, 0.125], ur = [7.0, 7.75] } }

[[slots]]
id = "Overview"
kind = "inset_frame"
placement = { rect = { ll = [7.0, 4.125], ur = [10.875, 8.375] } }
map = { copy_of = "Main", name = "Overview Map", strip_layers = true }
camera = { relative_to = "Main", scale_multiplier = 4.0 }

[slots.extent_indicator]
source_frame = "Main"
marker = { token = "Esri Pin 1" }
marker_size = 20
outline = { token = "Glacier" }
collapse = { below_size = 2.0 }

[[slots]]
id = "Title"
kind = "text"
content = "{mapFrame:Main.mapName} for {project.name}"
symbol = { size = 24, font = { family = "Arial", style = "Bold" }, halo = { size = 1, symbol = { token = "Glacier" } } }
placement = { point = { anchor = "bottom_left", at = [0.25, 7.2248] } }
"#;

const HOST: &str = r#"
[[maps]]
id = "main"
name = "Yellowstone"

[[maps.layers]]
name = "Trails"
source = "https://services.example.com/Trails/FeatureServer/0"
extent = { xmin = 0, ymin = 0, xmax = 1000, ymax = 800 }
"#;

#[test]
fn test_toml_inset_collapses_to_marker() {
    let template = LayoutTemplate::from_toml(INSET_TEMPLATE).unwrap();
    assert!(matches!(
        template.slot("Overview").map(|s| &s.element),
        Some(ElementSpec::InsetFrame(_))
    ));

    let mut host = InMemoryHost::from_toml(HOST).unwrap();
    let themes = ThemeCatalog::default();
    let mut ctx = DataContext::new(&mut host, &themes);
    let doc = compose(&template, &mut ctx).unwrap().document;

    let indicator = &doc.frame("Overview").unwrap().extent_indicators[0];
    assert_eq!(indicator.collapse, CollapsePolicy::BelowSize(2.0));
    // a quarter of a 6.875 x 7.625 frame is under two inches on its longer side
    assert!(indicator.collapsed);
    assert_eq!(indicator.marker.size, 20.0);

    // suppress_credits appends the credits element last
    assert_eq!(doc.elements.last().unwrap().name, "Invisible Service Layer");
    assert_eq!(doc.elements.len(), 4);
}

#[test]
fn test_registry_suggests_close_names() {
    let registry = TemplateRegistry::with_presets();
    let err = registry.get("Landscape Layout with Insett").unwrap_err();
    assert!(matches!(err, TemplateError::NotFound { .. }));
    assert_eq!(
        err.suggestions(),
        Some(&["Landscape Layout with Inset".to_string()][..])
    );
}

#[test]
fn test_registry_loads_relative_paths() {
    let dir = std::env::temp_dir().join(format!("layout-composer-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("trail_sheet.toml"), INSET_TEMPLATE).unwrap();

    let mut registry = TemplateRegistry::with_presets().with_base_path(dir.clone());
    let name = registry.load("trail_sheet.toml".as_ref()).unwrap();
    assert_eq!(name, "Trail Sheet");
    assert_eq!(registry.get("Trail Sheet").unwrap().slots.len(), 3);

    let again = registry.load("trail_sheet.toml".as_ref());
    assert!(matches!(again, Err(TemplateError::Duplicate { .. })));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unknown_element_kind_is_rejected() {
    let err = LayoutTemplate::from_toml(
        r#"
name = "Broken"
page = { width = 11, height = 8.5 }

[[slots]]
id = "Compass"
kind = "compass_rose"
placement = { point = { at = [1, 1] } }
"#,
    )
    .unwrap_err();
    assert!(matches!(err, TemplateError::Parse(_)));
}
