//! Map surrounds bound to a frame: north arrow, scale bar, legend

use tracing::debug;

use crate::host::LayerKind;
use crate::style::{Color, Fill, Halo, PolygonSymbol, StyleItemType, Stroke};
use crate::template::{
    LegendFitting, LegendSpec, NorthArrowSpec, Placement, ScaleBarFitting, ScaleBarSpec, SlotSpec,
};

use super::super::document::{
    Element, ElementContent, LegendElement, LegendItem, NorthArrowElement, ScaleBarElement,
};
use super::super::config::LayoutConfig;
use super::super::error::LayoutError;
use super::super::geometry::Anchor;
use super::{element, point_bounds, positive, BuildEnv};

pub(in crate::layout) fn build_north_arrow(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &NorthArrowSpec,
) -> Result<Element, LayoutError> {
    env.frames.lookup(&slot.id, index, &spec.frame)?;
    let style = env
        .resolver
        .resolve_ref(StyleItemType::NorthArrow, &spec.style)?
        .as_north_arrow()
        .cloned()
        .ok_or(LayoutError::StyleMismatch {
            expected: StyleItemType::NorthArrow,
        })?;

    let mut symbol = style.marker;
    if let Some(halo) = spec.halo {
        positive(&slot.id, "halo size", halo.size)?;
        symbol.halo = Some(Halo {
            size: halo.size,
            symbol: PolygonSymbol::new(Fill::solid(halo.fill), Some(Stroke::solid(Color::WHITE, 0.0))),
        });
    }

    let aspect = env.config.north_arrow_aspect;
    let (bounds, height) = match slot.placement {
        Placement::Point { anchor, at } => {
            let height = positive(
                &slot.id,
                "height",
                spec.height.unwrap_or(env.config.north_arrow_height),
            )?;
            (point_bounds(env, slot, anchor, at, height * aspect, height)?, height)
        }
        Placement::Rect { .. } => {
            let slot_rect = env.slot_rect(slot)?;
            match spec.height {
                Some(height) => {
                    let height = positive(&slot.id, "height", height)?;
                    let bounds = point_bounds(env, slot, Anchor::BottomLeft, slot_rect.ll(), height * aspect, height)?;
                    (bounds, height)
                }
                None => (slot_rect, slot_rect.height()),
            }
        }
    };

    Ok(element(
        slot,
        index,
        bounds,
        ElementContent::NorthArrow(NorthArrowElement {
            frame: spec.frame.clone(),
            symbol,
            height,
        }),
    ))
}

pub(in crate::layout) fn build_scale_bar(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &ScaleBarSpec,
) -> Result<Element, LayoutError> {
    let camera = env.frames.lookup(&slot.id, index, &spec.frame)?.camera;
    let style = env
        .resolver
        .resolve_ref(StyleItemType::ScaleBar, &spec.style)?
        .as_scale_bar()
        .cloned()
        .ok_or(LayoutError::StyleMismatch {
            expected: StyleItemType::ScaleBar,
        })?;
    if spec.divisions == 0 {
        return Err(LayoutError::invalid_parameter(
            &slot.id,
            "a scale bar needs at least one division",
        ));
    }

    let base = match slot.placement {
        Placement::Point { anchor, at } => {
            let width = spec.width.ok_or_else(|| {
                LayoutError::invalid_parameter(&slot.id, "point-placed scale bars need a width")
            })?;
            point_bounds(env, slot, anchor, at, width, env.config.scale_bar_height)?
        }
        Placement::Rect { .. } => env.slot_rect(slot)?,
    };
    let requested = positive(&slot.id, "width", spec.width.unwrap_or(base.width()))?;
    let divisions = f64::from(spec.divisions);

    // Ground units (in the style's unit) per page inch
    let ground_per_inch = camera
        .map(|c| c.scale * env.config.map_units_per_inch / style.unit.meters());
    let (bar_width, division_distance) = match (spec.fitting, ground_per_inch) {
        (_, None) => (requested, None),
        (ScaleBarFitting::AdjustFrame, Some(g)) => (requested, Some(requested / divisions * g)),
        (ScaleBarFitting::AdjustWidth, Some(g)) => {
            let nice = nice_floor(requested / divisions * g, &env.config.scale_bar_nice_steps);
            (nice * divisions / g, Some(nice))
        }
    };
    let bounds = env.on_page(slot, base.with_width(bar_width)?)?;
    debug!(scale_bar = %slot.id, bar_width, division = ?division_distance, "fitted scale bar");

    Ok(element(
        slot,
        index,
        bounds,
        ElementContent::ScaleBar(ScaleBarElement {
            frame: spec.frame.clone(),
            unit: style.unit,
            style,
            divisions: spec.divisions,
            subdivisions: spec.subdivisions,
            label_frequency: spec.label_frequency,
            fitting: spec.fitting,
            division_distance,
            bar_width,
        }),
    ))
}

/// Largest `step * 10^k` not above `value`
fn nice_floor(value: f64, steps: &[f64]) -> f64 {
    if !(value > 0.0 && value.is_finite()) {
        return value;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let mantissa = value / magnitude;
    let step = steps
        .iter()
        .copied()
        .filter(|s| *s <= mantissa + f64::EPSILON)
        .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))
        .unwrap_or(1.0);
    step * magnitude
}

pub(in crate::layout) fn build_legend(
    env: &mut BuildEnv<'_>,
    slot: &SlotSpec,
    index: usize,
    spec: &LegendSpec,
) -> Result<Element, LayoutError> {
    let map = env.frames.lookup(&slot.id, index, &spec.frame)?.map.clone();
    let text = env.text_symbol(&slot.id, &spec.text)?;
    let title_symbol = match &spec.title_symbol {
        Some(title) => env.text_symbol(&slot.id, title)?,
        None => text.clone(),
    };

    let toggles = spec.items;
    let items: Vec<LegendItem> = env
        .host
        .layers(&map)?
        .into_iter()
        .filter(|layer| layer.is_visible() && layer.kind != LayerKind::Basemap)
        .map(|layer| LegendItem {
            layer: layer.name,
            patch: layer.renderer,
            show_heading: toggles.show_headings,
            show_group_layer_name: toggles.show_group_layer_names,
            show_layer_name: toggles.show_layer_names,
            label_symbol: text.clone(),
            layer_name_symbol: text.clone(),
        })
        .collect();

    let metrics = LegendMetrics::measure(env.config, spec.title.as_deref(), &items, text.size, title_symbol.size);
    let (bounds, columns) = match (slot.placement, spec.fitting) {
        (Placement::Point { anchor, at }, _) => {
            let (width, height) = metrics.extent(env.config, items.len(), 1);
            (point_bounds(env, slot, anchor, at, width, height)?, 1)
        }
        (Placement::Rect { .. }, LegendFitting::AdjustFrame) => (env.slot_rect(slot)?, 1),
        (Placement::Rect { .. }, LegendFitting::AdjustColumns) => {
            let bounds = env.slot_rect(slot)?;
            let columns = metrics.columns_for(env.config, items.len(), bounds.height());
            (bounds, columns)
        }
    };
    debug!(legend = %slot.id, items = items.len(), columns, "built legend");

    Ok(element(
        slot,
        index,
        bounds,
        ElementContent::Legend(LegendElement {
            frame: spec.frame.clone(),
            title: spec.title.clone(),
            title_symbol,
            fitting: spec.fitting,
            columns,
            items,
        }),
    ))
}

/// Estimated sizes of a legend's title and item rows, in inches
struct LegendMetrics {
    title: (f64, f64),
    label_width: f64,
    row_height: f64,
}

impl LegendMetrics {
    fn measure(
        config: &LayoutConfig,
        title: Option<&str>,
        items: &[LegendItem],
        text_size: f64,
        title_size: f64,
    ) -> Self {
        let (_, patch_h) = config.legend_patch_size;
        let title = match title {
            Some(title) => config.text_extent(title.chars().count(), title_size),
            None => (0.0, 0.0),
        };
        let (label_width, row_height) = items
            .iter()
            .map(|item| config.text_extent(item.layer.chars().count(), text_size))
            .fold((0.0f64, patch_h), |(w, h), (iw, ih)| (w.max(iw), h.max(ih)));
        Self {
            title,
            label_width,
            row_height,
        }
    }

    /// Frame size for `items` spread over `columns`
    fn extent(&self, config: &LayoutConfig, items: usize, columns: usize) -> (f64, f64) {
        let (patch_w, _) = config.legend_patch_size;
        let padding = config.legend_padding;
        let columns = columns.max(1);
        let rows = items.div_ceil(columns) as f64;
        let column_w = patch_w + config.legend_item_spacing + self.label_width;
        let items_w = column_w * columns as f64 + config.legend_item_spacing * (columns - 1) as f64;
        let width = self.title.0.max(items_w) + 2.0 * padding;
        let height = self.title.1 + rows * (self.row_height + config.legend_item_spacing) + 2.0 * padding;
        (width, height)
    }

    /// Fewest columns that fit `items` rows under the title within `height`
    fn columns_for(&self, config: &LayoutConfig, items: usize, height: f64) -> usize {
        let available = height - self.title.1 - 2.0 * config.legend_padding;
        let per_row = self.row_height + config.legend_item_spacing;
        let rows = (available / per_row).floor().max(1.0) as usize;
        items.div_ceil(rows).max(1)
    }
}
