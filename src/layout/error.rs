//! Error and warning types for layout composition

use thiserror::Error;

use crate::error::BindingError;
use crate::host::HostError;
use crate::style::StyleItemType;

use super::geometry::{Point, Rect};

/// Errors that abort a composition run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Rectangle corners are inverted, degenerate or not finite
    #[error("invalid geometry: lower-left {ll} must lie strictly below and left of upper-right {ur}")]
    InvalidGeometry { ll: Point, ur: Point },

    /// Rectangle slot outside the page
    #[error("slot '{slot}' rectangle {rect} lies outside the {page_width}x{page_height} page")]
    OutOfPage {
        slot: String,
        rect: Rect,
        page_width: f64,
        page_height: f64,
    },

    /// Style token missing from the active theme
    #[error("style token '{token}' not found in theme '{theme}' ({item_type})")]
    StyleNotFound {
        theme: String,
        item_type: StyleItemType,
        token: String,
    },

    /// A literal symbol of the wrong kind was supplied
    #[error("expected a {expected} style")]
    StyleMismatch { expected: StyleItemType },

    /// Reference to a frame that no slot declares
    #[error("slot '{slot}' references undefined map frame '{frame}'")]
    DanglingFrameReference {
        slot: String,
        frame: String,
        suggestions: Vec<String>,
    },

    /// Reference to a frame that is only declared by a later slot
    #[error("slot '{slot}' (#{used_at}) references map frame '{frame}' which is declared later (#{declared_at}); declare producers before consumers")]
    SlotOrderingError {
        slot: String,
        frame: String,
        used_at: usize,
        declared_at: usize,
    },

    /// Two slots share an id
    #[error("duplicate slot id '{slot}'")]
    DuplicateSlot { slot: String },

    /// Dynamic text that does not parse
    #[error("invalid dynamic text in slot '{slot}': {}", format_binding_errors(.errors))]
    BindingSyntax {
        slot: String,
        content: String,
        errors: Vec<BindingError>,
    },

    /// Dynamic text that parses but binds to something that cannot exist
    #[error("invalid binding in slot '{slot}': {reason}")]
    InvalidBinding { slot: String, reason: String },

    /// A slot parameter out of range or not applicable to its element
    #[error("invalid parameter for slot '{slot}': {reason}")]
    InvalidParameter { slot: String, reason: String },

    /// The host has no map to bind a frame to
    #[error("no active map available for slot '{slot}'")]
    NoActiveMap { slot: String },

    /// A host collaborator call failed
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// `compose` was called on a composer that already ran
    #[error("composer already ran; create a new composer per composition")]
    ComposerSpent,
}

fn format_binding_errors(errors: &[BindingError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl LayoutError {
    /// Create an invalid geometry error
    pub fn invalid_geometry(ll: Point, ur: Point) -> Self {
        Self::InvalidGeometry { ll, ur }
    }

    /// Create a style-not-found error
    pub fn style_not_found(
        theme: impl Into<String>,
        item_type: StyleItemType,
        token: impl Into<String>,
    ) -> Self {
        Self::StyleNotFound {
            theme: theme.into(),
            item_type,
            token: token.into(),
        }
    }

    /// Create a dangling reference error with suggestions
    pub fn dangling(
        slot: impl Into<String>,
        frame: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self::DanglingFrameReference {
            slot: slot.into(),
            frame: frame.into(),
            suggestions,
        }
    }

    /// Create an ordering error
    pub fn ordering(
        slot: impl Into<String>,
        frame: impl Into<String>,
        used_at: usize,
        declared_at: usize,
    ) -> Self {
        Self::SlotOrderingError {
            slot: slot.into(),
            frame: frame.into(),
            used_at,
            declared_at,
        }
    }

    /// Create an invalid binding error
    pub fn invalid_binding(slot: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBinding {
            slot: slot.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(slot: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            slot: slot.into(),
            reason: reason.into(),
        }
    }

    /// The slot the error is attributed to, if any
    pub fn slot(&self) -> Option<&str> {
        match self {
            Self::OutOfPage { slot, .. }
            | Self::DanglingFrameReference { slot, .. }
            | Self::SlotOrderingError { slot, .. }
            | Self::DuplicateSlot { slot }
            | Self::BindingSyntax { slot, .. }
            | Self::InvalidBinding { slot, .. }
            | Self::InvalidParameter { slot, .. }
            | Self::NoActiveMap { slot } => Some(slot),
            _ => None,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::DanglingFrameReference { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

/// Recoverable conditions collected during composition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutWarning {
    /// Union-of-visible-layers extent requested, but no layer qualified;
    /// the frame keeps an unset camera.
    #[error("map frame '{frame}' (map '{map}') has no visible feature layers; camera left unset")]
    NoVisibleLayers { frame: String, map: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_not_found_display() {
        let err = LayoutError::style_not_found("ArcGIS 2D", StyleItemType::PointSymbol, "Esri Pin 1");
        insta::assert_snapshot!(
            err.to_string(),
            @"style token 'Esri Pin 1' not found in theme 'ArcGIS 2D' (point symbol)"
        );
    }

    #[test]
    fn test_ordering_display() {
        let err = LayoutError::ordering("Scale Bar", "Core Map Frame", 1, 4);
        assert!(err.to_string().contains("declared later"));
        assert_eq!(err.slot(), Some("Scale Bar"));
    }

    #[test]
    fn test_dangling_suggestions() {
        let err = LayoutError::dangling("Legend", "Core Map Frme", vec!["Core Map Frame".to_string()]);
        assert_eq!(err.suggestions(), Some(&["Core Map Frame".to_string()][..]));
        assert!(err.to_string().contains("Core Map Frme"));
    }

    #[test]
    fn test_no_visible_layers_display() {
        let warning = LayoutWarning::NoVisibleLayers {
            frame: "Core Map Frame".to_string(),
            map: "Empty".to_string(),
        };
        assert!(warning.to_string().contains("no visible feature layers"));
    }
}
