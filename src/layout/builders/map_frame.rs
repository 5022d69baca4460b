//! Map frames and the extent indicators drawn inside them

use tracing::{debug, warn};

use crate::host::{LayerInfo, MapId};
use crate::style::{PointSymbol, PolygonSymbol};
use crate::template::{CollapsePolicy, ExtentIndicatorSpec, ExtentPolicy, MapFrameSpec, MapSource, SlotSpec};

use super::super::document::{Element, ElementContent, ExtentIndicator, MapFrameElement};
use super::super::error::{LayoutError, LayoutWarning};
use super::super::extent::{combined_extent, Camera, Extent};
use super::super::geometry::{rect, Point, Rect};
use super::{element, positive, BuildEnv, FrameRecord};

pub(in crate::layout) fn build_map_frame(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &MapFrameSpec,
) -> Result<Element, LayoutError> {
    let bounds = env.slot_rect(slot)?;
    let zoom = positive(&slot.id, "zoom factor", spec.zoom_factor)?;

    let map = match &spec.map {
        MapSource::Active => env.primary_map(&slot.id)?,
        MapSource::Map(id) => id.clone(),
    };
    let layers = env.host.layers(&map)?;
    let map_name = env.host.map_name(&map)?;

    let mupi = env.config.map_units_per_inch;
    let camera = match &spec.extent {
        ExtentPolicy::UnionOfVisibleLayers => match combined_extent(&layers) {
            Some(extent) => Some(Camera::fit(&extent, &bounds, mupi).zoomed(zoom)),
            None => {
                warn!(frame = %slot.id, map = %map, "no visible feature layers to fit");
                env.warnings.push(LayoutWarning::NoVisibleLayers {
                    frame: slot.id.clone(),
                    map: map.to_string(),
                });
                None
            }
        },
        ExtentPolicy::Explicit(extent) => Some(Camera::fit(extent, &bounds, mupi).zoomed(zoom)),
        ExtentPolicy::Unset => None,
    };

    let extent_indicators = match &spec.extent_indicator {
        Some(indicator) => vec![resolve_indicator(env, slot, index, indicator)?.place(
            &bounds,
            camera,
            env.config.map_units_per_inch,
        )],
        None => Vec::new(),
    };

    let frame = frame_element(env, &slot.id, map, map_name, camera, &bounds, layers, extent_indicators)?;
    debug!(frame = %slot.id, scale = ?frame.camera.map(|c| c.scale), "built map frame");
    Ok(element(slot, index, bounds, ElementContent::MapFrame(frame)))
}

/// Assemble the frame content and record it for later slots
#[allow(clippy::too_many_arguments)]
pub(in crate::layout) fn frame_element(
    env: &mut BuildEnv<'_>,
    name: &str,
    map: MapId,
    map_name: String,
    camera: Option<Camera>,
    bounds: &Rect,
    layers: Vec<LayerInfo>,
    extent_indicators: Vec<ExtentIndicator>,
) -> Result<MapFrameElement, LayoutError> {
    let visible_extent = camera.map(|c| c.visible_extent(bounds, env.config.map_units_per_inch));
    env.frames.record(
        name,
        FrameRecord {
            bounds: *bounds,
            map: map.clone(),
            camera,
            visible_extent,
        },
    );
    Ok(MapFrameElement {
        map_description: env.host.map_description(&map)?,
        map,
        map_name,
        camera,
        visible_extent,
        layers,
        extent_indicators,
    })
}

/// An extent indicator with its source frame and symbols resolved, waiting
/// for the camera of the frame that hosts it
pub(in crate::layout) struct PendingIndicator {
    source_frame: String,
    source: FrameRecord,
    marker: PointSymbol,
    outline: PolygonSymbol,
    collapse: CollapsePolicy,
}

/// Resolve and validate everything an extent indicator needs from the run
pub(in crate::layout) fn resolve_indicator(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &ExtentIndicatorSpec,
) -> Result<PendingIndicator, LayoutError> {
    let source = env.frames.lookup(&slot.id, index, &spec.source_frame)?.clone();

    let mut marker = env.point_symbol(&spec.marker)?;
    if let Some(size) = spec.marker_size {
        marker.size = positive(&slot.id, "marker size", size)?;
    }
    let outline = env.polygon_symbol(&spec.outline)?;

    if let CollapsePolicy::BelowSize(threshold) = spec.collapse {
        if !(threshold >= 0.0 && threshold.is_finite()) {
            return Err(LayoutError::invalid_parameter(
                &slot.id,
                format!("collapse threshold must be non-negative, got {threshold}"),
            ));
        }
    }

    Ok(PendingIndicator {
        source_frame: spec.source_frame.clone(),
        source,
        marker,
        outline,
        collapse: spec.collapse,
    })
}

impl PendingIndicator {
    /// Project the source frame's view into a frame with `host_bounds` and `host_camera`
    pub fn place(self, host_bounds: &Rect, host_camera: Option<Camera>, map_units_per_inch: f64) -> ExtentIndicator {
        let footprint = match (host_camera, self.source.visible_extent) {
            (Some(camera), Some(extent)) => {
                project_extent(&extent, &camera, host_bounds, map_units_per_inch)
            }
            _ => None,
        };
        let collapsed = match (self.collapse, footprint) {
            (CollapsePolicy::BelowSize(threshold), Some(f)) => f.width().max(f.height()) < threshold,
            _ => false,
        };

        ExtentIndicator {
            source_frame: self.source_frame,
            source_bounds: self.source.bounds,
            source_extent: self.source.visible_extent,
            footprint,
            marker: self.marker,
            outline: self.outline,
            collapse: self.collapse,
            collapsed,
        }
    }
}

/// Page rectangle covered by `extent` in a frame driven by `camera`
fn project_extent(extent: &Extent, camera: &Camera, frame: &Rect, map_units_per_inch: f64) -> Option<Rect> {
    let per_inch = camera.scale * map_units_per_inch;
    let center = frame.center();
    let to_page = |x: f64, y: f64| {
        Point::new(
            center.x + (x - camera.x) / per_inch,
            center.y + (y - camera.y) / per_inch,
        )
    };
    rect(
        to_page(extent.xmin, extent.ymin),
        to_page(extent.xmax, extent.ymax),
    )
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_extent_inside_wider_view() {
        let frame = rect(Point::new(0.0, 0.0), Point::new(4.0, 4.0)).unwrap();
        let camera = Camera {
            x: 0.0,
            y: 0.0,
            scale: 10.0,
        };
        // 1 inch of page is 10 map units
        let footprint = project_extent(&Extent::new(-5.0, -5.0, 5.0, 5.0), &camera, &frame, 1.0).unwrap();
        assert_eq!(footprint.ll(), Point::new(1.5, 1.5));
        assert_eq!(footprint.ur(), Point::new(2.5, 2.5));
    }
}
