use crate::template::{ShapeSpec, SlotSpec};

use super::super::document::{Element, ElementContent, ShapeElement};
use super::super::error::LayoutError;
use super::{element, BuildEnv};

/// A filled rectangle; title bars and legend backgrounds
pub(in crate::layout) fn build_shape(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &ShapeSpec,
) -> Result<Element, LayoutError> {
    let bounds = env.slot_rect(slot)?;
    let symbol = env.polygon_symbol(&spec.symbol)?;
    Ok(element(
        slot,
        index,
        bounds,
        ElementContent::DecorativeShape(ShapeElement { symbol }),
    ))
}
