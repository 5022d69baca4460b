//! Frame references, slot ordering and binding checks on TOML templates

use layout_composer::layout::{compose, DataContext, LayoutError};
use layout_composer::{InMemoryHost, LayoutTemplate, ThemeCatalog};

const HOST: &str = r#"
[[maps]]
id = "main"
name = "Yellowstone"

[[maps.layers]]
name = "Trails"
extent = { xmin = 0, ymin = 0, xmax = 1000, ymax = 800 }
"#;

const CORE_FRAME: &str = r#"
[[slots]]
id = "Core Map Frame"
kind = "map_frame"
placement = { rect = { ll = [0.125, 0.125], ur = [7.0, 7.75] } }
"#;

const SCALE_BAR: &str = r#"
[[slots]]
id = "Scale Bar"
kind = "scale_bar"
frame = "Core Map Frame"
style = { token = "Double Alternating Scale Bar 1" }
placement = { rect = { ll = [2.1843, 0.375], ur = [5.0657, 0.746] } }
"#;

fn template(slots: &[&str]) -> LayoutTemplate {
    let mut source = String::from("name = \"Simple\"\npage = { width = 11, height = 8.5 }\n");
    for slot in slots {
        source.push_str(slot);
    }
    LayoutTemplate::from_toml(&source).unwrap()
}

fn text_slot(content: &str) -> String {
    format!(
        r#"
[[slots]]
id = "Caption"
kind = "text"
content = "{content}"
symbol = {{ size = 12 }}
placement = {{ point = {{ at = [0.5, 0.5] }} }}
"#
    )
}

fn run(template: &LayoutTemplate) -> Result<usize, LayoutError> {
    let mut host = InMemoryHost::from_toml(HOST).unwrap();
    let themes = ThemeCatalog::default();
    let mut ctx = DataContext::new(&mut host, &themes);
    compose(template, &mut ctx).map(|c| c.document.elements.len())
}

#[test]
fn test_producer_before_consumer_composes() {
    assert_eq!(run(&template(&[CORE_FRAME, SCALE_BAR])).unwrap(), 2);
}

#[test]
fn test_consumer_before_producer_is_an_ordering_error() {
    let err = run(&template(&[SCALE_BAR, CORE_FRAME])).unwrap_err();
    match err {
        LayoutError::SlotOrderingError {
            slot,
            frame,
            used_at,
            declared_at,
        } => {
            assert_eq!(slot, "Scale Bar");
            assert_eq!(frame, "Core Map Frame");
            assert!(used_at < declared_at);
        }
        other => panic!("expected an ordering error, got {other:?}"),
    }
}

#[test]
fn test_undeclared_frame_is_dangling_with_suggestion() {
    let caption = text_slot("{mapFrame:Core Map Frme.mapName}");
    let err = run(&template(&[CORE_FRAME, &caption])).unwrap_err();
    assert!(matches!(err, LayoutError::DanglingFrameReference { .. }));
    assert_eq!(err.slot(), Some("Caption"));
    assert_eq!(err.suggestions(), Some(&["Core Map Frame".to_string()][..]));
}

#[test]
fn test_duplicate_slot_ids_rejected() {
    let err = run(&template(&[CORE_FRAME, CORE_FRAME])).unwrap_err();
    assert_eq!(
        err,
        LayoutError::DuplicateSlot {
            slot: "Core Map Frame".to_string()
        }
    );
}

#[test]
fn test_rectangle_off_the_page() {
    let shape = r#"
[[slots]]
id = "Banner"
kind = "decorative_shape"
symbol = { token = "Glacier" }
placement = { rect = { ll = [10.0, 8.0], ur = [12.0, 9.0] } }
"#;
    let err = run(&template(&[shape])).unwrap_err();
    assert!(matches!(err, LayoutError::OutOfPage { ref slot, .. } if slot == "Banner"));
}

#[test]
fn test_layout_binding_must_name_this_layout() {
    let ok = text_slot("{layout:Simple.name}");
    assert_eq!(run(&template(&[&ok])).unwrap(), 1);

    let other = text_slot("{layout:Other.name}");
    let err = run(&template(&[&other])).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidBinding { .. }));
}

#[test]
fn test_unterminated_binding_is_a_syntax_error() {
    let broken = text_slot("{mapFrame:Core Map Frame.mapName");
    let err = run(&template(&[CORE_FRAME, &broken])).unwrap_err();
    let LayoutError::BindingSyntax { slot, errors, .. } = err else {
        panic!("expected a binding syntax error");
    };
    assert_eq!(slot, "Caption");
    assert!(!errors.is_empty());
}

#[test]
fn test_scale_bar_width_override_off_the_page() {
    let bar = r#"
[[slots]]
id = "Scale Bar"
kind = "scale_bar"
frame = "Core Map Frame"
style = { token = "Double Alternating Scale Bar 1" }
width = 5
placement = { rect = { ll = [9.0, 0.375], ur = [10.5, 0.746] } }
"#;
    let err = run(&template(&[CORE_FRAME, bar])).unwrap_err();
    assert!(matches!(err, LayoutError::OutOfPage { ref slot, .. } if slot == "Scale Bar"));
}

#[test]
fn test_north_arrow_height_override_off_the_page() {
    let arrow = r#"
[[slots]]
id = "North Arrow"
kind = "north_arrow"
frame = "Core Map Frame"
style = { token = "ArcGIS North 10" }
height = 3
placement = { rect = { ll = [10.0, 7.0], ur = [10.5, 8.0] } }
"#;
    let err = run(&template(&[CORE_FRAME, arrow])).unwrap_err();
    assert!(matches!(err, LayoutError::OutOfPage { ref slot, .. } if slot == "North Arrow"));
}

fn inset_slot(indicator: &str) -> String {
    format!(
        r#"
[[slots]]
id = "Locator"
kind = "inset_frame"
placement = {{ rect = {{ ll = [7.0, 4.125], ur = [10.875, 8.375] }} }}
map = {{ copy_of = "Core Map Frame", name = "Locator Map" }}
camera = {{ relative_to = "Core Map Frame", scale_multiplier = 4.0 }}

[slots.extent_indicator]
marker = {{ token = "Esri Pin 1" }}
outline = {{ token = "Glacier" }}
{indicator}
"#
    )
}

fn host_maps_after(template: &LayoutTemplate) -> (Result<usize, LayoutError>, usize) {
    let mut host = InMemoryHost::from_toml(HOST).unwrap();
    let themes = ThemeCatalog::default();
    let result = {
        let mut ctx = DataContext::new(&mut host, &themes);
        compose(template, &mut ctx).map(|c| c.document.elements.len())
    };
    (result, host.map_count())
}

#[test]
fn test_inset_indicator_on_later_frame_leaves_host_untouched() {
    let inset = inset_slot("source_frame = \"Detail\"");
    let detail = CORE_FRAME.replace("Core Map Frame", "Detail");
    let (result, maps) = host_maps_after(&template(&[CORE_FRAME, &inset, &detail]));
    assert!(matches!(
        result,
        Err(LayoutError::SlotOrderingError { ref slot, ref frame, .. }) if slot == "Locator" && frame == "Detail"
    ));
    assert_eq!(maps, 1);
}

#[test]
fn test_inset_bad_collapse_threshold_leaves_host_untouched() {
    let inset = inset_slot("source_frame = \"Core Map Frame\"\ncollapse = { below_size = -1.0 }");
    let (result, maps) = host_maps_after(&template(&[CORE_FRAME, &inset]));
    assert!(matches!(result, Err(LayoutError::InvalidParameter { ref slot, .. }) if slot == "Locator"));
    assert_eq!(maps, 1);

    let inset = inset_slot("source_frame = \"Core Map Frame\"");
    let (result, maps) = host_maps_after(&template(&[CORE_FRAME, &inset]));
    assert_eq!(result.unwrap(), 2);
    assert_eq!(maps, 2);
}
