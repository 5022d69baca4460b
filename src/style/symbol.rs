//! Symbol, color and font definitions
//!
//! These are plain values: there is no factory state behind them. Colors use
//! RGB components in 0–255 and an alpha in percent (0 fully transparent, 100
//! opaque), matching how print styles are authored.

use serde::{Deserialize, Serialize};

/// An RGB color with percent alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawColor")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: u8,
}

#[derive(Deserialize)]
struct RawColor {
    r: u8,
    g: u8,
    b: u8,
    #[serde(default = "Color::opaque_alpha")]
    alpha: u8,
}

impl From<RawColor> for Color {
    fn from(raw: RawColor) -> Self {
        Color::rgba(raw.r, raw.g, raw.b, raw.alpha)
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 100)
    }

    /// Color with alpha in percent; values above 100 are clamped
    pub const fn rgba(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: if alpha > 100 { 100 } else { alpha },
        }
    }

    fn opaque_alpha() -> u8 {
        100
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha == 0
    }

    /// Alpha as a 0.0–1.0 opacity
    pub fn opacity(&self) -> f64 {
        f64::from(self.alpha.min(100)) / 100.0
    }

    /// `#rrggbb` form, alpha dropped
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A font family and style name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    #[serde(default = "Font::regular")]
    pub style: String,
}

impl Font {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    fn regular() -> String {
        "Regular".to_string()
    }

    pub fn is_bold(&self) -> bool {
        self.style.to_ascii_lowercase().contains("bold")
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Arial", "Regular")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillStyle {
    #[default]
    Solid,
    Null,
}

/// A line: color, width in points, dash style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default)]
    pub color: Color,
    #[serde(default = "Stroke::default_width")]
    pub width: f64,
    #[serde(default)]
    pub style: LineStyle,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: LineStyle::Solid,
        }
    }

    fn default_width() -> f64 {
        1.0
    }

    /// Whether the stroke draws anything
    pub fn is_visible(&self) -> bool {
        self.style != LineStyle::Null && self.width > 0.0 && !self.color.is_transparent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub style: FillStyle,
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            style: FillStyle::Solid,
        }
    }

    /// A fill that draws nothing
    pub fn none() -> Self {
        Self {
            color: Color::BLACK,
            style: FillStyle::Null,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.style != FillStyle::Null && !self.color.is_transparent()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSymbol {
    pub fill: Fill,
    #[serde(default)]
    pub outline: Option<Stroke>,
}

impl PolygonSymbol {
    pub fn new(fill: Fill, outline: Option<Stroke>) -> Self {
        Self { fill, outline }
    }

    /// Solid fill with a 1pt black outline
    pub fn filled(color: Color) -> Self {
        Self::new(Fill::solid(color), Some(Stroke::solid(Color::BLACK, 1.0)))
    }
}

/// A halo drawn around text or markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Halo {
    pub size: f64,
    pub symbol: PolygonSymbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    Pin,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSymbol {
    #[serde(default)]
    pub marker: MarkerStyle,
    pub size: f64,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub halo: Option<Halo>,
}

impl PointSymbol {
    pub fn new(marker: MarkerStyle, size: f64, color: Color) -> Self {
        Self {
            marker,
            size,
            color,
            halo: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A text symbol; `size` is in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSymbol {
    #[serde(default)]
    pub color: Color,
    pub size: f64,
    #[serde(default)]
    pub font: Font,
    #[serde(default)]
    pub halo: Option<Halo>,
    #[serde(default)]
    pub alignment: HorizontalAlignment,
    #[serde(default)]
    pub offset_y: f64,
}

impl TextSymbol {
    pub fn new(color: Color, size: f64, font: Font) -> Self {
        Self {
            color,
            size,
            font,
            halo: None,
            alignment: HorizontalAlignment::Left,
            offset_y: 0.0,
        }
    }

    pub fn with_halo(mut self, size: f64, symbol: PolygonSymbol) -> Self {
        self.halo = Some(Halo { size, symbol });
        self
    }
}

/// North arrow style from a theme catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NorthArrowStyle {
    pub marker: PointSymbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScaleBarKind {
    #[default]
    DoubleAlternating,
    Alternating,
    SingleDivision,
    Line,
}

/// Ground units a scale bar is labelled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
    Meters,
    Feet,
}

impl DistanceUnit {
    pub fn meters(self) -> f64 {
        match self {
            DistanceUnit::Miles => 1609.344,
            DistanceUnit::Kilometers => 1000.0,
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Feet => 0.3048,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Meters => "m",
            DistanceUnit::Feet => "ft",
        }
    }
}

/// Scale bar style from a theme catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBarStyle {
    #[serde(default)]
    pub kind: ScaleBarKind,
    #[serde(default)]
    pub unit: DistanceUnit,
    #[serde(default = "ScaleBarStyle::default_fill")]
    pub fill: Color,
    #[serde(default = "ScaleBarStyle::default_alternate_fill")]
    pub alternate_fill: Color,
    #[serde(default = "ScaleBarStyle::default_outline")]
    pub outline: Stroke,
    pub label: TextSymbol,
}

impl ScaleBarStyle {
    fn default_fill() -> Color {
        Color::BLACK
    }

    fn default_alternate_fill() -> Color {
        Color::WHITE
    }

    fn default_outline() -> Stroke {
        Stroke::solid(Color::BLACK, 0.5)
    }
}

/// Any symbol a theme catalog can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Symbol {
    Point(PointSymbol),
    Line(Stroke),
    Polygon(PolygonSymbol),
    Text(TextSymbol),
    NorthArrow(NorthArrowStyle),
    ScaleBar(ScaleBarStyle),
}

impl Symbol {
    pub fn as_point(&self) -> Option<&PointSymbol> {
        match self {
            Symbol::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonSymbol> {
        match self {
            Symbol::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextSymbol> {
        match self {
            Symbol::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_north_arrow(&self) -> Option<&NorthArrowStyle> {
        match self {
            Symbol::NorthArrow(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_scale_bar(&self) -> Option<&ScaleBarStyle> {
        match self {
            Symbol::ScaleBar(s) => Some(s),
            _ => None,
        }
    }
}
