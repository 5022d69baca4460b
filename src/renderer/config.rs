//! Preview settings for the SVG surface

use crate::style::Color;

use super::RenderError;

/// How a composed page is drawn as SVG
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Output pixels per page inch; 96 matches CSS pixels
    pub pixels_per_inch: f64,

    /// Paper drawn under every element; `None` leaves the page transparent
    pub paper: Option<Color>,

    /// Placeholder fill for map frames, whose map content is not drawn
    pub frame_fill: Color,

    /// Label each frame with the name of the map it shows
    pub frame_labels: bool,

    /// Emit the XML declaration
    pub standalone: bool,

    pub pretty_print: bool,

    /// Prefix for CSS class names ("lc-" gives "lc-map-frame")
    pub class_prefix: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            pixels_per_inch: 96.0,
            paper: Some(Color::WHITE),
            frame_fill: Color::rgb(244, 244, 240),
            frame_labels: true,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("lc-".to_string()),
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// High resolution proof: 300 pixels per inch, no frame labels
    pub fn proof() -> Self {
        Self {
            pixels_per_inch: 300.0,
            frame_labels: false,
            ..Self::default()
        }
    }

    pub fn with_pixels_per_inch(mut self, ppi: f64) -> Self {
        self.pixels_per_inch = ppi;
        self
    }

    pub fn with_paper(mut self, paper: Color) -> Self {
        self.paper = Some(paper);
        self
    }

    pub fn without_paper(mut self) -> Self {
        self.paper = None;
        self
    }

    pub fn with_frame_fill(mut self, fill: Color) -> Self {
        self.frame_fill = fill;
        self
    }

    pub fn with_frame_labels(mut self, labels: bool) -> Self {
        self.frame_labels = labels;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Check the settings before drawing anything
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.pixels_per_inch > 0.0 && self.pixels_per_inch.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "pixels per inch must be positive, got {}",
                self.pixels_per_inch
            )));
        }
        if let Some(prefix) = &self.class_prefix {
            if prefix
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            {
                return Err(RenderError::InvalidConfig(format!(
                    "class prefix '{prefix}' may only hold letters, digits, '-' and '_'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SvgConfig::default();
        assert_eq!(config.pixels_per_inch, 96.0);
        assert_eq!(config.paper, Some(Color::WHITE));
        assert!(config.frame_labels);
        assert_eq!(config.class_prefix, Some("lc-".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_proof_preset() {
        let config = SvgConfig::proof().without_paper();
        assert_eq!(config.pixels_per_inch, 300.0);
        assert!(!config.frame_labels);
        assert_eq!(config.paper, None);
    }

    #[test]
    fn test_validate_rejects_bad_resolution() {
        for ppi in [0.0, -96.0, f64::NAN] {
            let err = SvgConfig::new().with_pixels_per_inch(ppi).validate().unwrap_err();
            assert!(matches!(err, RenderError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_validate_rejects_quoted_prefix() {
        let config = SvgConfig::new().with_class_prefix("lc\" onload=\"x");
        assert!(config.validate().is_err());
        assert!(SvgConfig::new().with_class_prefix("park_").validate().is_ok());
    }
}
