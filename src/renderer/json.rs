use crate::layout::LayoutDocument;

use super::{RenderError, RenderSurface};

/// Keeps the last presented document as pretty JSON
#[derive(Debug, Default)]
pub struct JsonSurface {
    output: Option<String>,
}

impl JsonSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn into_output(self) -> Option<String> {
        self.output
    }
}

impl RenderSurface for JsonSurface {
    fn present(&mut self, document: LayoutDocument) -> Result<(), RenderError> {
        self.output = Some(document.to_json()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Page;

    #[test]
    fn test_present_stores_json() {
        let mut surface = JsonSurface::new();
        let doc = LayoutDocument::new("Sheet", "Parks", "ArcGIS 2D", Page::new(11.0, 8.5).unwrap());
        surface.present(doc.clone()).unwrap();
        let json = surface.into_output().unwrap();
        assert_eq!(LayoutDocument::from_json(&json).unwrap(), doc);
    }
}
