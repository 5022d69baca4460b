//! Styling: symbol definitions, style tokens and their resolution
//!
//! Slots refer to styles either by a human-readable token looked up in the
//! active theme ("Esri Pin 1", "Glacier") or by a literal symbol.

pub mod resolver;
pub mod symbol;

pub use resolver::{StyleCatalog, StyleResolver};
pub use symbol::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of item a style token names in a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleItemType {
    PointSymbol,
    LineSymbol,
    PolygonSymbol,
    TextSymbol,
    NorthArrow,
    ScaleBar,
}

impl StyleItemType {
    /// Whether a symbol has the shape this item type requires
    pub fn accepts(self, symbol: &Symbol) -> bool {
        matches!(
            (self, symbol),
            (StyleItemType::PointSymbol, Symbol::Point(_))
                | (StyleItemType::LineSymbol, Symbol::Line(_))
                | (StyleItemType::PolygonSymbol, Symbol::Polygon(_))
                | (StyleItemType::TextSymbol, Symbol::Text(_))
                | (StyleItemType::NorthArrow, Symbol::NorthArrow(_))
                | (StyleItemType::ScaleBar, Symbol::ScaleBar(_))
        )
    }
}

impl fmt::Display for StyleItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleItemType::PointSymbol => "point symbol",
            StyleItemType::LineSymbol => "line symbol",
            StyleItemType::PolygonSymbol => "polygon symbol",
            StyleItemType::TextSymbol => "text symbol",
            StyleItemType::NorthArrow => "north arrow",
            StyleItemType::ScaleBar => "scale bar",
        };
        f.write_str(name)
    }
}

/// A catalog entry: a token bound to a concrete symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    pub token: String,
    pub item_type: StyleItemType,
    pub symbol: Symbol,
}

/// How a slot refers to a style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleRef {
    /// Look the token up in the active theme
    Token(String),
    /// Use this symbol as-is
    Symbol(Symbol),
}

impl StyleRef {
    pub fn token(token: impl Into<String>) -> Self {
        StyleRef::Token(token.into())
    }

    pub fn polygon(symbol: PolygonSymbol) -> Self {
        StyleRef::Symbol(Symbol::Polygon(symbol))
    }

    pub fn point(symbol: PointSymbol) -> Self {
        StyleRef::Symbol(Symbol::Point(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_accepts_matching_symbol() {
        let polygon = Symbol::Polygon(PolygonSymbol::filled(Color::WHITE));
        assert!(StyleItemType::PolygonSymbol.accepts(&polygon));
        assert!(!StyleItemType::PointSymbol.accepts(&polygon));
    }

    #[test]
    fn test_style_ref_toml_forms() {
        #[derive(Deserialize)]
        struct Holder {
            style: StyleRef,
        }
        let by_token: Holder = toml::from_str(r#"style = { token = "Glacier" }"#).unwrap();
        assert_eq!(by_token.style, StyleRef::token("Glacier"));

        let literal: Holder = toml::from_str(
            r#"
[style.symbol]
type = "polygon"
fill = { color = { r = 255, g = 255, b = 255, alpha = 50 } }
"#,
        )
        .unwrap();
        assert_eq!(
            literal.style,
            StyleRef::polygon(PolygonSymbol::new(
                Fill::solid(Color::rgba(255, 255, 255, 50)),
                None
            ))
        );
    }
}
