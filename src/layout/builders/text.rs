//! Text elements, paragraph text and the invisible credits element

use crate::binding::{self, Binding, BindingKind, BindingProperty, DynamicText};
use crate::style::{Color, Font, TextSymbol};
use crate::template::{CreditsSpec, ElementSpec, Placement, SlotSpec, TextSpec};

use super::super::document::{Element, ElementContent, ParagraphFrame, TextElement, TextType};
use super::super::error::LayoutError;
use super::super::geometry::Anchor;
use super::{element, point_bounds, positive, BuildEnv};

/// Name given to the credits element added for `suppress_credits`
pub(in crate::layout) const CREDITS_SLOT: &str = "Invisible Service Layer";

pub(in crate::layout) fn build_text(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &TextSpec,
) -> Result<Element, LayoutError> {
    let content = binding::parse(&spec.content).map_err(|errors| LayoutError::BindingSyntax {
        slot: slot.id.clone(),
        content: spec.content.clone(),
        errors,
    })?;
    for b in content.bindings() {
        check_binding(env, slot, index, b)?;
    }
    let symbol = env.text_symbol(&slot.id, &spec.symbol)?;

    let (text_type, bounds, frame) = match slot.placement {
        Placement::Point { anchor, at } => {
            if spec.paragraph.is_some() {
                return Err(LayoutError::invalid_parameter(
                    &slot.id,
                    "paragraph borders and backgrounds need a rectangle placement",
                ));
            }
            let (width, height) = estimate(env, &content, symbol.size);
            (TextType::Point, point_bounds(env, slot, anchor, at, width, height)?, None)
        }
        Placement::Rect { .. } => {
            let bounds = env.slot_rect(slot)?;
            let frame = match &spec.paragraph {
                Some(paragraph) => {
                    if !(0.0..=100.0).contains(&paragraph.corner_rounding) {
                        return Err(LayoutError::invalid_parameter(
                            &slot.id,
                            format!(
                                "corner rounding must be within 0..=100, got {}",
                                paragraph.corner_rounding
                            ),
                        ));
                    }
                    let background = match &paragraph.background {
                        Some(style) => Some(env.polygon_symbol(style)?),
                        None => None,
                    };
                    Some(ParagraphFrame {
                        border: paragraph.border,
                        background,
                        corner_rounding: paragraph.corner_rounding,
                    })
                }
                None => None,
            };
            (TextType::Paragraph, bounds, frame)
        }
    };

    Ok(element(
        slot,
        index,
        bounds,
        ElementContent::Text(TextElement {
            text_type,
            content,
            symbol,
            frame,
        }),
    ))
}

/// Zero-opacity point text carrying the layout's service layer credits
pub(in crate::layout) fn build_credits(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &CreditsSpec,
) -> Result<Element, LayoutError> {
    let size = positive(&slot.id, "font size", spec.font_size)?;
    let content = DynamicText::from_binding(Binding::layout(
        env.layout_name,
        BindingProperty::ServiceLayerCredits,
    ));
    let symbol = TextSymbol::new(Color::rgba(255, 255, 255, 0), size, Font::default());
    let bounds = match slot.placement {
        Placement::Point { anchor, at } => {
            let (width, height) = estimate(env, &content, size);
            point_bounds(env, slot, anchor, at, width, height)?
        }
        Placement::Rect { .. } => env.slot_rect(slot)?,
    };
    Ok(element(
        slot,
        index,
        bounds,
        ElementContent::InvisibleCredits(TextElement {
            text_type: TextType::Point,
            content,
            symbol,
            frame: None,
        }),
    ))
}

/// The slot appended when a template asks for credits suppression without declaring one
pub(in crate::layout) fn credits_suppressor(name: String) -> SlotSpec {
    SlotSpec::new(
        name,
        Placement::point(Anchor::BottomLeft, (0.0, 0.0)),
        ElementSpec::InvisibleCredits(CreditsSpec::default()),
    )
}

fn check_binding(
    env: &BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    b: &Binding,
) -> Result<(), LayoutError> {
    match (b.kind, b.target.as_deref()) {
        (BindingKind::MapFrame, Some(frame)) => {
            env.frames.lookup(&slot.id, index, frame)?;
            Ok(())
        }
        (BindingKind::Layout, Some(layout)) if layout != env.layout_name => {
            Err(LayoutError::invalid_binding(
                &slot.id,
                format!("{b} names layout '{layout}', but this layout is '{}'", env.layout_name),
            ))
        }
        (BindingKind::Project, None) | (BindingKind::Layout, Some(_)) => Ok(()),
        _ => Err(LayoutError::invalid_binding(
            &slot.id,
            format!("{b} has no valid target"),
        )),
    }
}

/// Single-line extent, with a placeholder width for each unevaluated binding
fn estimate(env: &BuildEnv<'_>, content: &DynamicText, size_pt: f64) -> (f64, f64) {
    let (chars, bindings) = content.measure();
    env.config
        .text_extent(chars + bindings * env.config.binding_placeholder_chars, size_pt)
}
