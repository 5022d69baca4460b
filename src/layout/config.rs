//! Configuration for the layout engine

/// Configuration options for layout composition
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Map units (meters) per page inch at scale 1
    pub map_units_per_inch: f64,

    /// Typographic points per page inch
    pub points_per_inch: f64,

    /// Average glyph advance as a fraction of the font size
    pub text_width_factor: f64,

    /// Line height as a multiple of the font size
    pub line_height: f64,

    /// Characters assumed for a binding whose value is only known at render time
    pub binding_placeholder_chars: usize,

    /// North arrow width divided by its height
    pub north_arrow_aspect: f64,

    /// North arrow height in inches when a slot does not set one
    pub north_arrow_height: f64,

    /// Scale bar height in inches for point-placed scale bars
    pub scale_bar_height: f64,

    /// Mantissas a scale bar division may round to (AdjustWidth)
    pub scale_bar_nice_steps: Vec<f64>,

    /// Legend patch size in inches (width, height)
    pub legend_patch_size: (f64, f64),

    /// Vertical gap between legend rows in inches
    pub legend_item_spacing: f64,

    /// Padding inside the legend frame in inches
    pub legend_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            map_units_per_inch: 0.0254,
            points_per_inch: 72.0,
            text_width_factor: 0.55,
            line_height: 1.2,
            binding_placeholder_chars: 16,
            north_arrow_aspect: 0.45,
            north_arrow_height: 1.0,
            scale_bar_height: 0.371,
            scale_bar_nice_steps: vec![1.0, 2.0, 2.5, 5.0, 10.0],
            legend_patch_size: (0.3, 0.15),
            legend_item_spacing: 0.05,
            legend_padding: 0.05,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the map units per page inch
    pub fn with_map_units_per_inch(mut self, units: f64) -> Self {
        self.map_units_per_inch = units;
        self
    }

    /// Set the text width estimate factor
    pub fn with_text_width_factor(mut self, factor: f64) -> Self {
        self.text_width_factor = factor;
        self
    }

    /// Set the line height multiple
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the default north arrow height
    pub fn with_north_arrow_height(mut self, height: f64) -> Self {
        self.north_arrow_height = height;
        self
    }

    /// Set the legend patch size
    pub fn with_legend_patch_size(mut self, width: f64, height: f64) -> Self {
        self.legend_patch_size = (width, height);
        self
    }

    /// Convert a size in points to inches
    pub fn points_to_inches(&self, points: f64) -> f64 {
        points / self.points_per_inch
    }

    /// Estimated extent in inches of a single line of text
    pub fn text_extent(&self, chars: usize, size_pt: f64) -> (f64, f64) {
        let size = self.points_to_inches(size_pt);
        (
            chars.max(1) as f64 * size * self.text_width_factor,
            size * self.line_height,
        )
    }
}
