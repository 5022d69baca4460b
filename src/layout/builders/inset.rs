//! Inset frames: a copied map shown at a multiple of another frame's scale

use tracing::debug;

use crate::template::{InsetFrameSpec, SlotSpec};

use super::super::document::{Element, ElementContent, InsetFrameElement};
use super::super::error::LayoutError;
use super::map_frame::{frame_element, resolve_indicator};
use super::{element, positive, BuildEnv};

pub(in crate::layout) fn build_inset_frame(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &InsetFrameSpec,
) -> Result<Element, LayoutError> {
    let bounds = env.slot_rect(slot)?;
    let multiplier = positive(&slot.id, "scale multiplier", spec.camera.scale_multiplier)?;
    for layer in &spec.map.layers {
        if !(0.0..=100.0).contains(&layer.transparency) {
            return Err(LayoutError::invalid_parameter(
                &slot.id,
                format!("layer transparency must be within 0..=100, got {}", layer.transparency),
            ));
        }
    }

    // Resolve and validate every frame reference before touching the host
    let source_map = match &spec.map.copy_of {
        Some(frame) => env.frames.lookup(&slot.id, index, frame)?.map.clone(),
        None => env.primary_map(&slot.id)?,
    };
    let relative = env
        .frames
        .lookup(&slot.id, index, &spec.camera.relative_to)?
        .camera;
    let indicator = match &spec.extent_indicator {
        Some(indicator) => Some(resolve_indicator(env, slot, index, indicator)?),
        None => None,
    };

    let map = env.host.copy_map(&source_map, &spec.map.name)?;
    if spec.map.strip_layers {
        env.host.remove_layers(&map)?;
    }
    if let Some(basemap) = &spec.map.basemap {
        env.host
            .create_from_uri(&basemap.uri, basemap.name.as_deref(), &map)?;
    }
    for layer in &spec.map.layers {
        let created = env.host.create_from_service_query(layer, &map)?;
        debug!(inset = %slot.id, layer = %created.name, "added inset layer");
    }

    let camera = relative.map(|c| c.zoomed(multiplier));
    let extent_indicators: Vec<_> = indicator
        .map(|pending| pending.place(&bounds, camera, env.config.map_units_per_inch))
        .into_iter()
        .collect();

    let layers = env.host.layers(&map)?;
    let map_name = env.host.map_name(&map)?;
    let frame = frame_element(env, &slot.id, map, map_name, camera, &bounds, layers, extent_indicators)?;
    debug!(inset = %slot.id, source = %source_map, multiplier, "built inset frame");

    Ok(element(
        slot,
        index,
        bounds,
        ElementContent::InsetFrame(InsetFrameElement {
            frame,
            source_map,
            camera_source: spec.camera.relative_to.clone(),
            scale_multiplier: multiplier,
        }),
    ))
}
