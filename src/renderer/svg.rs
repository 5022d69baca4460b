//! SVG previews of composed documents
//!
//! Page space is y-up in inches; SVG space is y-down in pixels. Every
//! coordinate goes through [`SvgBuilder::x`] / [`SvgBuilder::y`].

use crate::layout::{
    Element, ElementContent, ExtentIndicator, LayoutDocument, LegendElement, MapFrameElement,
    Point, Rect, ScaleBarElement, TextElement, TextType,
};
use crate::style::{
    Color, HorizontalAlignment, LineStyle, MarkerStyle, PointSymbol,
    PolygonSymbol, Stroke, Symbol, TextSymbol,
};

use super::{evaluate_text, RenderError, RenderSurface, SvgConfig};

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    page_height: f64,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    pub fn new(config: SvgConfig, page_height: f64) -> Self {
        Self {
            config,
            page_height,
            elements: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Page inches to SVG x
    fn x(&self, inches: f64) -> f64 {
        round(inches * self.config.pixels_per_inch)
    }

    /// Page inches (y-up) to SVG y (y-down)
    fn y(&self, inches: f64) -> f64 {
        round((self.page_height - inches) * self.config.pixels_per_inch)
    }

    fn len(&self, inches: f64) -> f64 {
        round(inches * self.config.pixels_per_inch)
    }

    /// Points to pixels
    fn pt(&self, points: f64) -> f64 {
        round(points / 72.0 * self.config.pixels_per_inch)
    }

    fn class_list(&self, kind: &str, classes: &[&str]) -> String {
        let prefix = self.prefix();
        std::iter::once(format!("{prefix}{kind}"))
            .chain(classes.iter().map(|c| format!("{prefix}{c}")))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Add a rectangle covering `bounds`
    pub fn add_rect(&mut self, id: Option<&str>, bounds: &Rect, rx: f64, classes: &[&str], styles: &str) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        let rx_attr = if rx > 0.0 {
            format!(r#" rx="{}""#, round(rx))
        } else {
            String::new()
        };
        self.elements.push(format!(
            r#"{}<rect{} class="{}" x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            self.indent_str(),
            id_attr,
            self.class_list("rect", classes),
            self.x(bounds.ll().x),
            self.y(bounds.ur().y),
            self.len(bounds.width()),
            self.len(bounds.height()),
            rx_attr,
            styles
        ));
    }

    /// Add a closed polygon through page points
    pub fn add_polygon(&mut self, points: &[Point], classes: &[&str], styles: &str) {
        let points_str = points
            .iter()
            .map(|p| format!("{},{}", self.x(p.x), self.y(p.y)))
            .collect::<Vec<_>>()
            .join(" ");
        self.elements.push(format!(
            r#"{}<polygon class="{}" points="{}"{}/>"#,
            self.indent_str(),
            self.class_list("polygon", classes),
            points_str,
            styles
        ));
    }

    /// Add a point marker centered on `at`
    pub fn add_marker(&mut self, at: Point, symbol: &PointSymbol, classes: &[&str]) {
        let r = self.pt(symbol.size) / 2.0;
        let (cx, cy) = (self.x(at.x), self.y(at.y));
        let fill = fill_attrs(symbol.color);
        let shape = match symbol.marker {
            MarkerStyle::Circle | MarkerStyle::Pin => {
                format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}"{fill}"#)
            }
            MarkerStyle::Square => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}"{fill}"#,
                cx - r,
                cy - r,
                2.0 * r,
                2.0 * r
            ),
            MarkerStyle::Diamond => format!(
                r#"<polygon points="{},{} {},{} {},{} {},{}"{fill}"#,
                cx,
                cy - r,
                cx + r,
                cy,
                cx,
                cy + r,
                cx - r,
                cy
            ),
            MarkerStyle::Triangle | MarkerStyle::Arrow => format!(
                r#"<polygon points="{},{} {},{} {},{}"{fill}"#,
                cx,
                cy - r,
                cx + r,
                cy + r,
                cx - r,
                cy + r
            ),
            MarkerStyle::Cross => format!(
                r#"<path d="M{},{} L{},{} M{},{} L{},{}" stroke="{}" fill="none""#,
                cx - r,
                cy,
                cx + r,
                cy,
                cx,
                cy - r,
                cx,
                cy + r,
                symbol.color.to_hex()
            ),
        };
        self.elements.push(format!(
            r#"{}<g class="{}">{}/></g>"#,
            self.indent_str(),
            self.class_list("marker", classes),
            shape
        ));
    }

    /// Add a line of text; `at` is the baseline point the alignment refers to
    pub fn add_text(&mut self, text: &str, at: Point, symbol: &TextSymbol, classes: &[&str]) {
        let anchor = match symbol.alignment {
            HorizontalAlignment::Left | HorizontalAlignment::Justify => "start",
            HorizontalAlignment::Center => "middle",
            HorizontalAlignment::Right => "end",
        };
        let weight = if symbol.font.is_bold() { r#" font-weight="bold""# } else { "" };
        let halo = symbol
            .halo
            .as_ref()
            .map(|h| {
                format!(
                    r#" stroke="{}" stroke-opacity="{}" stroke-width="{}" paint-order="stroke""#,
                    h.symbol.fill.color.to_hex(),
                    h.symbol.fill.color.opacity(),
                    self.pt(h.size * 2.0)
                )
            })
            .unwrap_or_default();
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="{}" font-family="{}" font-size="{}"{}{}{}>{}</text>"#,
            self.indent_str(),
            self.class_list("text", classes),
            self.x(at.x),
            round(self.y(at.y) - self.pt(symbol.offset_y)),
            anchor,
            escape_xml(&symbol.font.family),
            self.pt(symbol.size),
            weight,
            fill_attrs(symbol.color),
            halo,
            escape_xml(text)
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[&str]) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            let prefix = self.prefix();
            format!(
                r#" class="{}""#,
                classes
                    .iter()
                    .map(|c| format!("{prefix}{c}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            )
        };
        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string for a page `width` inches wide
    pub fn build(self, width: f64) -> String {
        let nl = self.newline();
        let w = self.len(width);
        let h = self.len(self.page_height);

        let mut svg = String::new();
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ));
        svg.push_str(nl);
        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }
        svg.push_str("</svg>");
        svg
    }
}

/// Render a document to an SVG string
pub fn render_svg(document: &LayoutDocument, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone(), document.page.height);
    if let (Some(paper), Ok(page)) = (config.paper, document.page.bounds()) {
        builder.add_rect(None, &page, 0.0, &["page"], &fill_attrs(paper));
    }
    let mut elements: Vec<&Element> = document.elements.iter().collect();
    elements.sort_by_key(|e| e.z_order);
    for element in elements {
        render_element(document, element, &mut builder);
    }
    builder.build(document.page.width)
}

fn render_element(document: &LayoutDocument, element: &Element, builder: &mut SvgBuilder) {
    let id = Some(element.name.as_str());
    match &element.content {
        ElementContent::MapFrame(frame) => render_frame(frame, element, builder, "map-frame"),
        ElementContent::InsetFrame(inset) => render_frame(&inset.frame, element, builder, "inset-frame"),
        ElementContent::Text(text) => render_text(document, text, element, builder, "text-element"),
        ElementContent::InvisibleCredits(text) => render_text(document, text, element, builder, "credits"),
        ElementContent::NorthArrow(arrow) => {
            builder.start_group(id, &["north-arrow"]);
            let b = &element.bounds;
            let mid = b.center().x;
            let points = [
                Point::new(mid, b.ur().y),
                Point::new(b.ur().x, b.ll().y),
                Point::new(mid, b.ll().y + b.height() * 0.25),
                Point::new(b.ll().x, b.ll().y),
            ];
            let halo = arrow
                .symbol
                .halo
                .as_ref()
                .map(|h| polygon_attrs(&h.symbol))
                .unwrap_or_default();
            builder.add_polygon(&points, &["arrow"], &format!("{}{}", fill_attrs(arrow.symbol.color), halo));
            builder.end_group();
        }
        ElementContent::ScaleBar(bar) => render_scale_bar(bar, element, builder),
        ElementContent::Legend(legend) => render_legend(legend, element, builder),
        ElementContent::DecorativeShape(shape) => {
            builder.add_rect(id, &element.bounds, 0.0, &["shape"], &polygon_attrs(&shape.symbol));
        }
    }
}

fn render_frame(frame: &MapFrameElement, element: &Element, builder: &mut SvgBuilder, kind: &str) {
    builder.start_group(Some(&element.name), &[kind]);
    let outline = format!(
        r##"{} stroke="#000000" stroke-width="1""##,
        fill_attrs(builder.config.frame_fill)
    );
    builder.add_rect(None, &element.bounds, 0.0, &["frame"], &outline);
    if builder.config.frame_labels {
        let label = TextSymbol::new(Color::rgb(110, 110, 110), 8.0, Default::default());
        let b = &element.bounds;
        builder.add_text(&frame.map_name, Point::new(b.ll().x + 0.05, b.ll().y + 0.05), &label, &["map-name"]);
    }
    for indicator in &frame.extent_indicators {
        render_indicator(indicator, builder);
    }
    builder.end_group();
}

fn render_indicator(indicator: &ExtentIndicator, builder: &mut SvgBuilder) {
    let Some(footprint) = indicator.footprint else {
        return;
    };
    if indicator.collapsed {
        builder.add_marker(footprint.center(), &indicator.marker, &["extent-indicator"]);
    } else {
        builder.add_rect(
            None,
            &footprint,
            0.0,
            &["extent-indicator"],
            &polygon_attrs(&indicator.outline),
        );
    }
}

fn render_text(
    document: &LayoutDocument,
    text: &TextElement,
    element: &Element,
    builder: &mut SvgBuilder,
    kind: &str,
) {
    let content = evaluate_text(document, &text.content);
    let b = &element.bounds;
    match text.text_type {
        TextType::Point => {
            builder.add_text(&content, b.ll(), &left_aligned(&text.symbol), &[kind]);
        }
        TextType::Paragraph => {
            builder.start_group(Some(&element.name), &[kind]);
            if let Some(frame) = &text.frame {
                let rounding = frame.corner_rounding / 100.0 * b.width().min(b.height()) / 2.0;
                let mut styles = frame
                    .background
                    .as_ref()
                    .map(polygon_attrs)
                    .unwrap_or_else(|| r#" fill="none""#.to_string());
                if let Some(border) = &frame.border {
                    styles.push_str(&stroke_attrs(border));
                }
                let rx = builder.len(rounding);
                builder.add_rect(None, b, rx, &["paragraph-frame"], &styles);
            }
            let x = match text.symbol.alignment {
                HorizontalAlignment::Left | HorizontalAlignment::Justify => b.ll().x,
                HorizontalAlignment::Center => b.center().x,
                HorizontalAlignment::Right => b.ur().x,
            };
            let baseline = b.ur().y - text.symbol.size / 72.0;
            builder.add_text(&content, Point::new(x, baseline), &text.symbol, &["paragraph"]);
            builder.end_group();
        }
    }
}

fn left_aligned(symbol: &TextSymbol) -> TextSymbol {
    TextSymbol {
        alignment: HorizontalAlignment::Left,
        ..symbol.clone()
    }
}

fn render_scale_bar(bar: &ScaleBarElement, element: &Element, builder: &mut SvgBuilder) {
    builder.start_group(Some(&element.name), &["scale-bar"]);
    let b = &element.bounds;
    let divisions = bar.divisions.max(1);
    let step = bar.bar_width / f64::from(divisions);
    let bar_height = (b.height() / 3.0).min(0.12);
    let top = b.ur().y - bar_height;

    for i in 0..divisions {
        let x0 = b.ll().x + step * f64::from(i);
        let fill = if i % 2 == 0 { bar.style.fill } else { bar.style.alternate_fill };
        if let Ok(cell) = crate::layout::rect(Point::new(x0, top), Point::new(x0 + step, b.ur().y)) {
            builder.add_rect(None, &cell, 0.0, &["division"], &format!("{}{}", fill_attrs(fill), stroke_attrs(&bar.style.outline)));
        }
    }

    if let Some(distance) = bar.division_distance {
        let label = &bar.style.label;
        let centered = TextSymbol {
            alignment: HorizontalAlignment::Center,
            ..label.clone()
        };
        let baseline = top - label.size / 72.0 - 0.02;
        for i in bar.label_frequency.labelled_ticks(divisions) {
            let x = b.ll().x + step * i;
            let value = distance * i;
            let text = if (i - f64::from(divisions)).abs() < f64::EPSILON {
                format!("{} {}", format_distance(value), bar.unit.abbreviation())
            } else {
                format_distance(value)
            };
            builder.add_text(&text, Point::new(x, baseline), &centered, &["scale-label"]);
        }
    }
    builder.end_group();
}

fn format_distance(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round())
    } else {
        format!("{:.2}", value).trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn render_legend(legend: &LegendElement, element: &Element, builder: &mut SvgBuilder) {
    builder.start_group(Some(&element.name), &["legend"]);
    let b = &element.bounds;
    let mut y = b.ur().y - 0.05;
    if let Some(title) = &legend.title {
        y -= legend.title_symbol.size / 72.0;
        builder.add_text(title, Point::new(b.ll().x + 0.05, y), &left_aligned(&legend.title_symbol), &["legend-title"]);
        y -= 0.05;
    }
    let top = y;
    let rows = legend.rows().max(1);
    let column_width = b.width() / legend.columns.max(1) as f64;
    for (i, item) in legend.items.iter().enumerate() {
        if i % rows == 0 {
            y = top;
        }
        let left = b.ll().x + (i / rows) as f64 * column_width;
        let row = item.label_symbol.size / 72.0 * 1.2;
        y -= row;
        let patch_at = Point::new(left + 0.2, y + row / 3.0);
        match &item.patch {
            Some(Symbol::Point(point)) => builder.add_marker(patch_at, point, &["legend-patch"]),
            Some(Symbol::Polygon(polygon)) => {
                if let Ok(patch) = Rect::from_anchor(crate::layout::Anchor::Center, patch_at, 0.3, 0.15) {
                    builder.add_rect(None, &patch, 0.0, &["legend-patch"], &polygon_attrs(polygon));
                }
            }
            _ => {}
        }
        builder.add_text(&item.layer, Point::new(left + 0.45, y), &left_aligned(&item.label_symbol), &["legend-label"]);
    }
    builder.end_group();
}

fn fill_attrs(color: Color) -> String {
    if color.is_transparent() {
        r#" fill="none""#.to_string()
    } else if color.alpha >= 100 {
        format!(r#" fill="{}""#, color.to_hex())
    } else {
        format!(r#" fill="{}" fill-opacity="{}""#, color.to_hex(), color.opacity())
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    if !stroke.is_visible() {
        return String::new();
    }
    let dash = match stroke.style {
        LineStyle::Dash => r#" stroke-dasharray="4 2""#,
        LineStyle::Dot => r#" stroke-dasharray="1 2""#,
        LineStyle::Solid | LineStyle::Null => "",
    };
    let opacity = if stroke.color.alpha >= 100 {
        String::new()
    } else {
        format!(r#" stroke-opacity="{}""#, stroke.color.opacity())
    };
    format!(
        r#" stroke="{}" stroke-width="{}"{}{}"#,
        stroke.color.to_hex(),
        stroke.width,
        opacity,
        dash
    )
}

fn polygon_attrs(symbol: &PolygonSymbol) -> String {
    let fill = if symbol.fill.is_visible() {
        fill_attrs(symbol.fill.color)
    } else {
        r#" fill="none""#.to_string()
    };
    let stroke = symbol.outline.as_ref().map(stroke_attrs).unwrap_or_default();
    format!("{fill}{stroke}")
}

fn round(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Draws every presented document as an SVG preview
#[derive(Debug, Default)]
pub struct SvgSurface {
    config: SvgConfig,
    output: Option<String>,
}

impl SvgSurface {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            output: None,
        }
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn into_output(self) -> Option<String> {
        self.output
    }
}

impl RenderSurface for SvgSurface {
    fn present(&mut self, document: LayoutDocument) -> Result<(), RenderError> {
        self.config.validate()?;
        self.output = Some(render_svg(&document, &self.config));
        Ok(())
    }
}
