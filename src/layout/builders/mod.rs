//! Element builders, one per element kind
//!
//! Builders read the slot, the style resolver and the host, and return one
//! [`Element`]. Map frames and insets also record themselves in the
//! [`FrameRegistry`] so later slots can refer to them by name.

mod inset;
mod map_frame;
mod shape;
mod surround;
mod text;

pub(in crate::layout) use inset::build_inset_frame;
pub(in crate::layout) use map_frame::build_map_frame;
pub(in crate::layout) use shape::build_shape;
pub(in crate::layout) use surround::{build_legend, build_north_arrow, build_scale_bar};
pub(in crate::layout) use text::{build_credits, build_text, credits_suppressor, CREDITS_SLOT};

use std::collections::HashMap;

use crate::host::{Host, MapId};
use crate::style::{
    Halo, PointSymbol, PolygonSymbol, StyleItemType, StyleRef, StyleResolver, TextSymbol,
};
use crate::template::{Placement, SlotSpec, TextStyleSpec};

use super::config::LayoutConfig;
use super::document::{Element, ElementContent};
use super::error::{LayoutError, LayoutWarning};
use super::extent::{Camera, Extent};
use super::find_similar;
use super::geometry::{anchor_point, rect, Anchor, Page, Point, Rect};

/// What later slots may know about a built frame
#[derive(Debug, Clone, PartialEq)]
pub(in crate::layout) struct FrameRecord {
    pub bounds: Rect,
    pub map: MapId,
    pub camera: Option<Camera>,
    pub visible_extent: Option<Extent>,
}

/// Frames by name: declared ones from the template scan, built ones as they land
#[derive(Debug, Default)]
pub(in crate::layout) struct FrameRegistry {
    declared: HashMap<String, usize>,
    built: HashMap<String, FrameRecord>,
}

impl FrameRegistry {
    pub fn declare(&mut self, name: &str, index: usize) {
        self.declared.insert(name.to_string(), index);
    }

    pub fn record(&mut self, name: &str, frame: FrameRecord) {
        self.built.insert(name.to_string(), frame);
    }

    /// Resolve a frame reference made by `slot` at position `used_at`.
    ///
    /// A frame declared by a later slot is an ordering error; a name no slot
    /// declares is a dangling reference.
    pub fn lookup(&self, slot: &str, used_at: usize, name: &str) -> Result<&FrameRecord, LayoutError> {
        if let Some(frame) = self.built.get(name) {
            return Ok(frame);
        }
        match self.declared.get(name) {
            Some(&declared_at) => Err(LayoutError::ordering(slot, name, used_at, declared_at)),
            None => Err(self.dangling(slot, name)),
        }
    }

    /// Check a reference against declarations only, before any frame is built
    pub fn check_declared(&self, slot: &str, used_at: usize, name: &str) -> Result<(), LayoutError> {
        match self.declared.get(name) {
            Some(&declared_at) if declared_at < used_at => Ok(()),
            Some(&declared_at) => Err(LayoutError::ordering(slot, name, used_at, declared_at)),
            None => Err(self.dangling(slot, name)),
        }
    }

    fn dangling(&self, slot: &str, name: &str) -> LayoutError {
        LayoutError::dangling(
            slot,
            name,
            find_similar(self.declared.keys().map(String::as_str), name, 2),
        )
    }
}

/// Everything a builder may read or call during one composition run
pub(in crate::layout) struct BuildEnv<'a> {
    pub config: &'a LayoutConfig,
    pub page: Page,
    pub layout_name: &'a str,
    pub primary_map: Option<MapId>,
    pub resolver: StyleResolver<'a>,
    pub host: &'a mut dyn Host,
    pub frames: FrameRegistry,
    pub warnings: Vec<LayoutWarning>,
}

impl BuildEnv<'_> {
    /// The context's primary map, else the host's active map
    pub fn primary_map(&self, slot: &str) -> Result<MapId, LayoutError> {
        self.primary_map
            .clone()
            .or_else(|| self.host.active_map())
            .ok_or_else(|| LayoutError::NoActiveMap {
                slot: slot.to_string(),
            })
    }

    /// Validated rectangle of a rect-placed slot
    pub fn slot_rect(&self, slot: &SlotSpec) -> Result<Rect, LayoutError> {
        match slot.placement {
            Placement::Rect { ll, ur } => self.on_page(slot, rect(ll, ur)?),
            Placement::Point { .. } => Err(LayoutError::invalid_parameter(
                &slot.id,
                format!("{} slots need a rectangle placement", slot.kind()),
            )),
        }
    }

    pub fn on_page(&self, slot: &SlotSpec, bounds: Rect) -> Result<Rect, LayoutError> {
        if self.page.contains(&bounds) {
            Ok(bounds)
        } else {
            Err(LayoutError::OutOfPage {
                slot: slot.id.clone(),
                rect: bounds,
                page_width: self.page.width,
                page_height: self.page.height,
            })
        }
    }

    pub fn point_symbol(&mut self, style: &StyleRef) -> Result<PointSymbol, LayoutError> {
        self.resolver
            .resolve_ref(StyleItemType::PointSymbol, style)?
            .as_point()
            .cloned()
            .ok_or(LayoutError::StyleMismatch {
                expected: StyleItemType::PointSymbol,
            })
    }

    pub fn polygon_symbol(&mut self, style: &StyleRef) -> Result<PolygonSymbol, LayoutError> {
        self.resolver
            .resolve_ref(StyleItemType::PolygonSymbol, style)?
            .as_polygon()
            .cloned()
            .ok_or(LayoutError::StyleMismatch {
                expected: StyleItemType::PolygonSymbol,
            })
    }

    /// Build a text symbol, resolving its halo through the theme
    pub fn text_symbol(&mut self, slot: &str, spec: &TextStyleSpec) -> Result<TextSymbol, LayoutError> {
        positive(slot, "font size", spec.size)?;
        let color = StyleResolver::resolve_color(
            spec.color.r,
            spec.color.g,
            spec.color.b,
            spec.color.alpha,
        );
        let font = StyleResolver::resolve_font(&spec.font.family, &spec.font.style);
        let mut symbol = TextSymbol::new(color, spec.size, font);
        symbol.alignment = spec.alignment;
        symbol.offset_y = spec.offset_y;
        if let Some(halo) = &spec.halo {
            if !(halo.size >= 0.0 && halo.size.is_finite()) {
                return Err(LayoutError::invalid_parameter(
                    slot,
                    format!("halo size must be non-negative, got {}", halo.size),
                ));
            }
            symbol.halo = Some(Halo {
                size: halo.size,
                symbol: self.polygon_symbol(&halo.symbol)?,
            });
        }
        Ok(symbol)
    }
}

/// Reject zero, negative and non-finite values
pub(in crate::layout) fn positive(slot: &str, what: &str, value: f64) -> Result<f64, LayoutError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::invalid_parameter(
            slot,
            format!("{what} must be positive, got {value}"),
        ))
    }
}

/// Bounds of a point-placed element of the given size; must fit on the page
pub(in crate::layout) fn point_bounds(
    env: &BuildEnv<'_>,
    slot: &SlotSpec,
    anchor: Anchor,
    at: Point,
    width: f64,
    height: f64,
) -> Result<Rect, LayoutError> {
    positive(&slot.id, "width", width)?;
    positive(&slot.id, "height", height)?;
    env.on_page(slot, Rect::from_anchor(anchor, at, width, height)?)
}

/// Wrap built content into a positioned element.
///
/// Rect-placed elements anchor at their lower-left corner.
pub(in crate::layout) fn element(
    slot: &SlotSpec,
    z_order: usize,
    bounds: Rect,
    content: ElementContent,
) -> Element {
    let (anchor, anchor_point) = match slot.placement {
        Placement::Point { anchor, at } => (anchor, at),
        Placement::Rect { .. } => (Anchor::BottomLeft, anchor_point(&bounds, Anchor::BottomLeft)),
    };
    Element {
        name: slot.id.clone(),
        z_order,
        anchor,
        anchor_point,
        bounds,
        content,
    }
}
