//! Style token resolution with a per-run cache

use std::collections::HashMap;

use tracing::debug;

use crate::layout::LayoutError;

use super::{Color, Font, StyleDefinition, StyleItemType, StyleRef, Symbol};

/// A source of named style definitions, grouped by theme
pub trait StyleCatalog {
    /// Look up a token of the given item type in a theme
    fn find(&self, theme: &str, item_type: StyleItemType, token: &str) -> Option<StyleDefinition>;
}

type CacheKey = (String, StyleItemType, String);

/// Resolves style tokens against a catalog for one composition run.
///
/// Lookups are memoized per (theme, item type, token). A resolver must not
/// outlive its run: themes can change between runs.
pub struct StyleResolver<'a> {
    catalog: &'a dyn StyleCatalog,
    theme: String,
    cache: HashMap<CacheKey, StyleDefinition>,
    catalog_lookups: usize,
}

impl<'a> StyleResolver<'a> {
    pub fn new(catalog: &'a dyn StyleCatalog, theme: impl Into<String>) -> Self {
        Self {
            catalog,
            theme: theme.into(),
            cache: HashMap::new(),
            catalog_lookups: 0,
        }
    }

    /// The theme tokens are resolved in
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Resolve a token in the active theme
    pub fn resolve(
        &mut self,
        item_type: StyleItemType,
        token: &str,
    ) -> Result<StyleDefinition, LayoutError> {
        let theme = self.theme.clone();
        self.resolve_in(&theme, item_type, token)
    }

    /// Resolve a token in an explicit theme.
    ///
    /// Fails with [`LayoutError::StyleNotFound`] when the catalog has no entry,
    /// or when the entry's symbol does not match `item_type`.
    pub fn resolve_in(
        &mut self,
        theme: &str,
        item_type: StyleItemType,
        token: &str,
    ) -> Result<StyleDefinition, LayoutError> {
        let key = (theme.to_string(), item_type, token.to_string());
        if let Some(found) = self.cache.get(&key) {
            return Ok(found.clone());
        }

        self.catalog_lookups += 1;
        let definition = self
            .catalog
            .find(theme, item_type, token)
            .filter(|def| item_type.accepts(&def.symbol))
            .ok_or_else(|| LayoutError::style_not_found(theme, item_type, token))?;

        debug!(theme, %item_type, token, "resolved style token");
        self.cache.insert(key, definition.clone());
        Ok(definition)
    }

    /// Resolve a slot's style reference to a symbol of the given item type
    pub fn resolve_ref(
        &mut self,
        item_type: StyleItemType,
        style: &StyleRef,
    ) -> Result<Symbol, LayoutError> {
        match style {
            StyleRef::Token(token) => Ok(self.resolve(item_type, token)?.symbol),
            StyleRef::Symbol(symbol) if item_type.accepts(symbol) => Ok(symbol.clone()),
            StyleRef::Symbol(_) => Err(LayoutError::StyleMismatch {
                expected: item_type,
            }),
        }
    }

    /// Font construction is a literal pass-through
    pub fn resolve_font(family: &str, style: &str) -> Font {
        Font::new(family, style)
    }

    /// Color construction is a literal pass-through; alpha is in percent
    pub fn resolve_color(r: u8, g: u8, b: u8, alpha: u8) -> Color {
        Color::rgba(r, g, b, alpha)
    }

    /// How many lookups reached the catalog (cache misses)
    pub fn catalog_lookups(&self) -> usize {
        self.catalog_lookups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{MarkerStyle, PointSymbol, PolygonSymbol};

    struct OneEntry;

    impl StyleCatalog for OneEntry {
        fn find(
            &self,
            theme: &str,
            item_type: StyleItemType,
            token: &str,
        ) -> Option<StyleDefinition> {
            (theme == "ArcGIS 2D" && item_type == StyleItemType::PointSymbol && token == "Esri Pin 1")
                .then(|| StyleDefinition {
                    token: token.to_string(),
                    item_type,
                    symbol: Symbol::Point(PointSymbol::new(MarkerStyle::Pin, 10.0, Color::RED)),
                })
        }
    }

    #[test]
    fn test_resolve_memoizes_per_key() {
        let catalog = OneEntry;
        let mut resolver = StyleResolver::new(&catalog, "ArcGIS 2D");
        let first = resolver.resolve(StyleItemType::PointSymbol, "Esri Pin 1").unwrap();
        let second = resolver.resolve(StyleItemType::PointSymbol, "Esri Pin 1").unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.catalog_lookups(), 1);
    }

    #[test]
    fn test_missing_token_fails_loudly() {
        let catalog = OneEntry;
        let mut resolver = StyleResolver::new(&catalog, "ArcGIS 2D");
        let err = resolver.resolve(StyleItemType::PolygonSymbol, "Esri Pin 1").unwrap_err();
        assert!(matches!(err, LayoutError::StyleNotFound { .. }));

        let mut other_theme = StyleResolver::new(&catalog, "Dark Theme");
        assert!(other_theme.resolve(StyleItemType::PointSymbol, "Esri Pin 1").is_err());
    }

    #[test]
    fn test_literal_ref_must_match_item_type() {
        let catalog = OneEntry;
        let mut resolver = StyleResolver::new(&catalog, "ArcGIS 2D");
        let literal = StyleRef::polygon(PolygonSymbol::filled(Color::WHITE));
        assert!(resolver.resolve_ref(StyleItemType::PolygonSymbol, &literal).is_ok());
        assert!(matches!(
            resolver.resolve_ref(StyleItemType::PointSymbol, &literal),
            Err(LayoutError::StyleMismatch { .. })
        ));
        assert_eq!(resolver.catalog_lookups(), 0);
    }

    #[test]
    fn test_literal_constructors() {
        assert_eq!(
            StyleResolver::resolve_color(0, 122, 194, 100),
            Color::rgb(0, 122, 194)
        );
        assert_eq!(
            StyleResolver::resolve_font("Arial", "Bold"),
            Font::new("Arial", "Bold")
        );
    }
}
