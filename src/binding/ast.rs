//! Dynamic text as data: literal runs and bindings
//!
//! A binding is a relation (kind, target name, property). It never points into
//! a frame; the frame is looked up by name whenever the text is evaluated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BindingError;

/// What a binding reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    MapFrame,
    Project,
    Layout,
}

impl BindingKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mapFrame" => Some(BindingKind::MapFrame),
            "project" => Some(BindingKind::Project),
            "layout" => Some(BindingKind::Layout),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindingKind::MapFrame => "mapFrame",
            BindingKind::Project => "project",
            BindingKind::Layout => "layout",
        }
    }

    /// Project bindings have no target; the others name a frame or layout
    pub fn takes_target(self) -> bool {
        !matches!(self, BindingKind::Project)
    }

    /// Properties that may follow this kind
    pub fn properties(self) -> &'static [BindingProperty] {
        match self {
            BindingKind::MapFrame => &[
                BindingProperty::MapName,
                BindingProperty::Description,
                BindingProperty::Scale,
            ],
            BindingKind::Project => &[BindingProperty::Name],
            BindingKind::Layout => &[BindingProperty::Name, BindingProperty::ServiceLayerCredits],
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingProperty {
    MapName,
    Description,
    Scale,
    Name,
    ServiceLayerCredits,
}

impl BindingProperty {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mapName" => Some(BindingProperty::MapName),
            "description" => Some(BindingProperty::Description),
            "scale" => Some(BindingProperty::Scale),
            "name" => Some(BindingProperty::Name),
            "serviceLayerCredits" => Some(BindingProperty::ServiceLayerCredits),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindingProperty::MapName => "mapName",
            BindingProperty::Description => "description",
            BindingProperty::Scale => "scale",
            BindingProperty::Name => "name",
            BindingProperty::ServiceLayerCredits => "serviceLayerCredits",
        }
    }
}

impl fmt::Display for BindingProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a property of a frame, the project or the layout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub kind: BindingKind,
    pub target: Option<String>,
    pub property: BindingProperty,
}

impl Binding {
    pub fn map_frame(frame: impl Into<String>, property: BindingProperty) -> Self {
        Self {
            kind: BindingKind::MapFrame,
            target: Some(frame.into()),
            property,
        }
    }

    pub fn project(property: BindingProperty) -> Self {
        Self {
            kind: BindingKind::Project,
            target: None,
            property,
        }
    }

    pub fn layout(name: impl Into<String>, property: BindingProperty) -> Self {
        Self {
            kind: BindingKind::Layout,
            target: Some(name.into()),
            property,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{{{}:{}.{}}}", self.kind, target, self.property),
            None => write!(f, "{{{}.{}}}", self.kind, self.property),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Binding(Binding),
}

/// Parsed dynamic text. Serializes as its source form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DynamicText {
    pub segments: Vec<Segment>,
}

impl DynamicText {
    /// Text with no bindings
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            segments: vec![Segment::Literal(text)],
        }
    }

    pub fn from_binding(binding: Binding) -> Self {
        Self {
            segments: vec![Segment::Binding(binding)],
        }
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Binding(b) => Some(b),
            Segment::Literal(_) => None,
        })
    }

    pub fn is_literal(&self) -> bool {
        self.bindings().next().is_none()
    }

    /// Characters known before evaluation, and the number of bindings
    pub fn measure(&self) -> (usize, usize) {
        self.segments.iter().fold((0, 0), |(chars, bindings), s| match s {
            Segment::Literal(text) => (chars + text.chars().count(), bindings),
            Segment::Binding(_) => (chars, bindings + 1),
        })
    }

    /// Substitute bindings; unresolved ones render empty
    pub fn evaluate(&self, mut lookup: impl FnMut(&Binding) -> Option<String>) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.clone(),
                Segment::Binding(b) => lookup(b).unwrap_or_default(),
            })
            .collect()
    }
}

impl fmt::Display for DynamicText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Binding(binding) => write!(f, "{binding}")?,
            }
        }
        Ok(())
    }
}

impl From<DynamicText> for String {
    fn from(text: DynamicText) -> Self {
        text.to_string()
    }
}

impl TryFrom<String> for DynamicText {
    type Error = BindingError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        super::parse(&source).map_err(|errors| {
            errors
                .into_iter()
                .next()
                .unwrap_or_else(|| BindingError::syntax(0..source.len(), "invalid dynamic text"))
        })
    }
}
