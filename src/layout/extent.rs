//! Map extents and frame cameras
//!
//! Extents live in map units (meters). A [`Camera`] positions a map inside a frame:
//! its center in map units and its scale (map units per page unit, expressed as
//! the usual representative fraction denominator).

use serde::{Deserialize, Serialize};

use crate::host::LayerInfo;

use super::geometry::Rect;

/// A rectangular region in map coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin: xmin.min(xmax),
            ymin: ymin.min(ymax),
            xmax: xmin.max(xmax),
            ymax: ymin.max(ymax),
        }
    }

    /// Extent of the given size centered on (x, y)
    pub fn from_center(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            x - width / 2.0,
            y - height / 2.0,
            x + width / 2.0,
            y + height / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }

    /// Smallest extent containing both
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            xmin: self.xmin.min(other.xmin),
            ymin: self.ymin.min(other.ymin),
            xmax: self.xmax.max(other.xmax),
            ymax: self.ymax.max(other.ymax),
        }
    }
}

/// Union of the extents of all visible feature layers.
///
/// Layers that are not feature layers, are hidden, or report no extent are
/// skipped. Returns `None` when nothing is left to union.
pub fn combined_extent(layers: &[LayerInfo]) -> Option<Extent> {
    layers
        .iter()
        .filter(|layer| layer.is_feature() && layer.is_visible())
        .filter_map(|layer| layer.extent())
        .reduce(|acc, extent| acc.union(&extent))
}

/// Scale used when an extent collapses to a point and cannot be fitted
const DEGENERATE_FIT_SCALE: f64 = 1.0;

/// Viewpoint of a map frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Camera {
    /// Fit the camera so `extent` is fully visible in `frame`, centered.
    pub fn fit(extent: &Extent, frame: &Rect, map_units_per_inch: f64) -> Camera {
        let (x, y) = extent.center();
        let scale_x = extent.width() / (frame.width() * map_units_per_inch);
        let scale_y = extent.height() / (frame.height() * map_units_per_inch);
        let scale = scale_x.max(scale_y);
        Camera {
            x,
            y,
            scale: if scale > 0.0 && scale.is_finite() {
                scale
            } else {
                DEGENERATE_FIT_SCALE
            },
        }
    }

    /// Multiply the scale, keeping the center
    pub fn zoomed(&self, factor: f64) -> Camera {
        Camera {
            scale: self.scale * factor,
            ..*self
        }
    }

    /// The map extent shown when this camera drives `frame`
    pub fn visible_extent(&self, frame: &Rect, map_units_per_inch: f64) -> Extent {
        let per_inch = self.scale * map_units_per_inch;
        Extent::from_center(
            self.x,
            self.y,
            frame.width() * per_inch,
            frame.height() * per_inch,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LayerKind;
    use crate::layout::geometry::{rect, Point};

    fn layer(name: &str, visible: bool, extent: Option<Extent>) -> LayerInfo {
        LayerInfo::new(name, LayerKind::Feature)
            .with_visibility(visible)
            .with_extent(extent)
    }

    #[test]
    fn test_combined_extent_unions_visible_feature_layers() {
        let layers = vec![
            layer("a", true, Some(Extent::new(0.0, 0.0, 10.0, 10.0))),
            layer("b", true, Some(Extent::new(5.0, -5.0, 20.0, 5.0))),
            layer("hidden", false, Some(Extent::new(-100.0, -100.0, 100.0, 100.0))),
            LayerInfo::new("basemap", LayerKind::Basemap)
                .with_extent(Some(Extent::new(-1e6, -1e6, 1e6, 1e6))),
        ];
        assert_eq!(
            combined_extent(&layers),
            Some(Extent::new(0.0, -5.0, 20.0, 10.0))
        );
    }

    #[test]
    fn test_combined_extent_is_order_independent() {
        let mut layers = vec![
            layer("a", true, Some(Extent::new(0.0, 0.0, 10.0, 10.0))),
            layer("b", true, Some(Extent::new(5.0, -5.0, 20.0, 5.0))),
            layer("c", true, Some(Extent::new(-3.0, 2.0, 1.0, 30.0))),
        ];
        let forward = combined_extent(&layers);
        layers.reverse();
        assert_eq!(forward, combined_extent(&layers));
        layers.swap(0, 1);
        assert_eq!(forward, combined_extent(&layers));
    }

    #[test]
    fn test_combined_extent_none_without_visible_layers() {
        let layers = vec![
            layer("hidden", false, Some(Extent::new(0.0, 0.0, 1.0, 1.0))),
            layer("no extent", true, None),
        ];
        assert_eq!(combined_extent(&layers), None);
        assert_eq!(combined_extent(&[]), None);
    }

    #[test]
    fn test_fit_centers_and_covers_extent() {
        let frame = rect(Point::new(0.0, 0.0), Point::new(4.0, 2.0)).unwrap();
        let extent = Extent::new(0.0, 0.0, 1000.0, 1000.0);
        let cam = Camera::fit(&extent, &frame, 0.0254);
        assert_eq!((cam.x, cam.y), (500.0, 500.0));
        let visible = cam.visible_extent(&frame, 0.0254);
        assert!(visible.width() >= extent.width() - 1e-6);
        assert!((visible.height() - extent.height()).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_multiplies_scale_and_keeps_center() {
        let cam = Camera {
            x: 12.5,
            y: -7.0,
            scale: 250_000.0,
        };
        let zoomed = cam.zoomed(1.20);
        assert_eq!(zoomed.scale, cam.scale * 1.20);
        assert_eq!((zoomed.x, zoomed.y), (cam.x, cam.y));
    }

    #[test]
    fn test_fit_degenerate_extent() {
        let frame = rect(Point::new(0.0, 0.0), Point::new(1.0, 1.0)).unwrap();
        let cam = Camera::fit(&Extent::new(3.0, 4.0, 3.0, 4.0), &frame, 0.0254);
        assert_eq!(cam.scale, DEGENERATE_FIT_SCALE);
        assert_eq!((cam.x, cam.y), (3.0, 4.0));
    }
}
