//! Page-space geometry and anchor resolution
//!
//! All coordinates are in page units (inches) with the origin at the lower-left
//! corner of the page and y growing upwards, the way print layouts are measured.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// A point on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle given by its lower-left and upper-right corners.
///
/// A `Rect` always has positive width and height; the only ways to build one
/// are [`rect`] and the helpers on this type, which all validate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRect")]
pub struct Rect {
    ll: Point,
    ur: Point,
}

#[derive(Deserialize)]
struct RawRect {
    ll: Point,
    ur: Point,
}

impl TryFrom<RawRect> for Rect {
    type Error = LayoutError;

    fn try_from(raw: RawRect) -> Result<Self, Self::Error> {
        rect(raw.ll, raw.ur)
    }
}

/// Build a rectangle from its lower-left and upper-right corners.
///
/// Fails with [`LayoutError::InvalidGeometry`] unless `ll.x < ur.x` and
/// `ll.y < ur.y` and every coordinate is finite.
pub fn rect(ll: Point, ur: Point) -> Result<Rect, LayoutError> {
    if !ll.is_finite() || !ur.is_finite() || ll.x >= ur.x || ll.y >= ur.y {
        return Err(LayoutError::invalid_geometry(ll, ur));
    }
    Ok(Rect { ll, ur })
}

impl Rect {
    /// Lower-left corner
    pub fn ll(&self) -> Point {
        self.ll
    }

    /// Upper-right corner
    pub fn ur(&self) -> Point {
        self.ur
    }

    pub fn width(&self) -> f64 {
        self.ur.x - self.ll.x
    }

    pub fn height(&self) -> f64 {
        self.ur.y - self.ll.y
    }

    pub fn center(&self) -> Point {
        anchor_point(self, Anchor::Center)
    }

    /// Build the rectangle of the given size whose `anchor` sits on `point`.
    pub fn from_anchor(
        anchor: Anchor,
        point: Point,
        width: f64,
        height: f64,
    ) -> Result<Rect, LayoutError> {
        let (fx, fy) = anchor.fractions();
        let ll = Point::new(point.x - fx * width, point.y - fy * height);
        let ur = Point::new(ll.x + width, ll.y + height);
        rect(ll, ur)
    }

    /// Same lower-left corner, new width
    pub fn with_width(&self, width: f64) -> Result<Rect, LayoutError> {
        rect(self.ll, Point::new(self.ll.x + width, self.ur.y))
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.ll.x && point.x <= self.ur.x && point.y >= self.ll.y && point.y <= self.ur.y
    }

    /// Check if `other` lies entirely inside this rectangle (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.ll) && self.contains(other.ur)
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            ll: Point::new(self.ll.x.min(other.ll.x), self.ll.y.min(other.ll.y)),
            ur: Point::new(self.ur.x.max(other.ur.x), self.ur.y.max(other.ur.y)),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ll, self.ur)
    }
}

/// Named reference points on an element's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    BottomLeft,
    BottomMid,
    BottomRight,
    LeftMid,
    Center,
    RightMid,
    TopLeft,
    TopMid,
    TopRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::BottomLeft,
        Anchor::BottomMid,
        Anchor::BottomRight,
        Anchor::LeftMid,
        Anchor::Center,
        Anchor::RightMid,
        Anchor::TopLeft,
        Anchor::TopMid,
        Anchor::TopRight,
    ];

    /// Position of the anchor as fractions of width and height from lower-left
    pub fn fractions(self) -> (f64, f64) {
        match self {
            Anchor::BottomLeft => (0.0, 0.0),
            Anchor::BottomMid => (0.5, 0.0),
            Anchor::BottomRight => (1.0, 0.0),
            Anchor::LeftMid => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::RightMid => (1.0, 0.5),
            Anchor::TopLeft => (0.0, 1.0),
            Anchor::TopMid => (0.5, 1.0),
            Anchor::TopRight => (1.0, 1.0),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::BottomLeft => "bottom_left",
            Anchor::BottomMid => "bottom_mid",
            Anchor::BottomRight => "bottom_right",
            Anchor::LeftMid => "left_mid",
            Anchor::Center => "center",
            Anchor::RightMid => "right_mid",
            Anchor::TopLeft => "top_left",
            Anchor::TopMid => "top_mid",
            Anchor::TopRight => "top_right",
        };
        f.write_str(name)
    }
}

/// Resolve an anchor to its point on the rectangle
pub fn anchor_point(rect: &Rect, anchor: Anchor) -> Point {
    let (fx, fy) = anchor.fractions();
    Point::new(
        rect.ll.x + fx * rect.width(),
        rect.ll.y + fy * rect.height(),
    )
}

/// Units a page can be measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageUnit {
    #[default]
    Inches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// The page a layout is composed on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: PageUnit,
}

impl Page {
    /// Create a page in inches, rejecting non-positive sizes
    pub fn new(width: f64, height: f64) -> Result<Self, LayoutError> {
        let page = Self {
            width,
            height,
            unit: PageUnit::Inches,
        };
        page.bounds()?;
        Ok(page)
    }

    /// Landscape when wider than tall
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// The full page as a rectangle
    pub fn bounds(&self) -> Result<Rect, LayoutError> {
        rect(Point::new(0.0, 0.0), Point::new(self.width, self.height))
    }

    /// Check that a rectangle lies within the page (edges inclusive)
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.ll.x >= 0.0 && rect.ll.y >= 0.0 && rect.ur.x <= self.width && rect.ur.y <= self.height
    }
}
