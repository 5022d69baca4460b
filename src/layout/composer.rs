//! The layout composer
//!
//! Turns a [`LayoutTemplate`] into a [`LayoutDocument`], resolving slots
//! strictly in declaration order. A composer runs once:
//!
//! ```text
//! Empty -> SlotsResolving -> Composed
//!                  \-------> Failed(first error)
//! ```
//!
//! Style tokens and frame references outside dynamic text are checked in a
//! pre-pass before any element is built or the host is touched, so those
//! failures leave the partial document empty. Any later failure keeps the
//! elements built before the failing slot.

use std::collections::HashSet;

use tracing::{debug, info, info_span};

use crate::host::{Host, MapId};
use crate::style::{StyleCatalog, StyleResolver};
use crate::template::{ElementSpec, LayoutTemplate, SlotSpec};

use super::builders::{
    build_credits, build_inset_frame, build_legend, build_map_frame, build_north_arrow,
    build_scale_bar, build_shape, build_text, credits_suppressor, BuildEnv, FrameRegistry,
    CREDITS_SLOT,
};
use super::config::LayoutConfig;
use super::document::{Composition, LayoutDocument};
use super::error::{LayoutError, LayoutWarning};

/// Host services and run parameters for one composition
pub struct DataContext<'h> {
    pub host: &'h mut dyn Host,
    pub styles: &'h dyn StyleCatalog,
    /// Theme style tokens resolve in
    pub theme: String,
    pub project_name: String,
    /// Map bound by frames that ask for the active map; the host's active map when unset
    pub primary_map: Option<MapId>,
}

impl<'h> DataContext<'h> {
    pub fn new(host: &'h mut dyn Host, styles: &'h dyn StyleCatalog) -> Self {
        Self {
            host,
            styles,
            theme: "ArcGIS 2D".to_string(),
            project_name: "Untitled".to_string(),
            primary_map: None,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_project(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn with_primary_map(mut self, map: MapId) -> Self {
        self.primary_map = Some(map);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposeState {
    Empty,
    SlotsResolving { resolved: usize },
    Composed,
    Failed(LayoutError),
}

impl ComposeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComposeState::Composed | ComposeState::Failed(_))
    }
}

/// Single-use composer for one template
pub struct Composer<'t> {
    template: &'t LayoutTemplate,
    config: LayoutConfig,
    state: ComposeState,
    partial: Option<LayoutDocument>,
}

impl<'t> Composer<'t> {
    pub fn new(template: &'t LayoutTemplate, config: LayoutConfig) -> Self {
        Self {
            template,
            config,
            state: ComposeState::Empty,
            partial: None,
        }
    }

    pub fn state(&self) -> &ComposeState {
        &self.state
    }

    /// The document as far as it got; after a failure, the elements built
    /// before the failing slot
    pub fn partial_document(&self) -> Option<&LayoutDocument> {
        self.partial.as_ref()
    }

    /// Run the composition. A composer that already ran fails with
    /// [`LayoutError::ComposerSpent`].
    pub fn compose(&mut self, ctx: &mut DataContext<'_>) -> Result<Composition, LayoutError> {
        if self.state.is_terminal() {
            return Err(LayoutError::ComposerSpent);
        }
        let template = self.template;
        let span = info_span!("compose", template = %template.name);
        let _enter = span.enter();

        let mut document = LayoutDocument::new(
            template.name.clone(),
            ctx.project_name.clone(),
            ctx.theme.clone(),
            template.page,
        );
        self.state = ComposeState::SlotsResolving { resolved: 0 };

        let result = run(template, &self.config, ctx, &mut document, &mut self.state);
        match result {
            Ok(warnings) => {
                info!(
                    elements = document.elements.len(),
                    warnings = warnings.len(),
                    "composition complete"
                );
                self.state = ComposeState::Composed;
                self.partial = Some(document.clone());
                Ok(Composition { document, warnings })
            }
            Err(err) => {
                debug!(error = %err, built = document.elements.len(), "composition failed");
                self.state = ComposeState::Failed(err.clone());
                self.partial = Some(document);
                Err(err)
            }
        }
    }
}

/// Compose `template` with the default layout configuration
pub fn compose(template: &LayoutTemplate, ctx: &mut DataContext<'_>) -> Result<Composition, LayoutError> {
    Composer::new(template, LayoutConfig::default()).compose(ctx)
}

fn run(
    template: &LayoutTemplate,
    config: &LayoutConfig,
    ctx: &mut DataContext<'_>,
    document: &mut LayoutDocument,
    state: &mut ComposeState,
) -> Result<Vec<LayoutWarning>, LayoutError> {
    template.page.bounds()?;

    let has_credits = template
        .slots
        .iter()
        .any(|s| matches!(s.element, ElementSpec::InvisibleCredits(_)));
    document.suppress_credits = template.suppress_credits || has_credits;
    let suppressor = (template.suppress_credits && !has_credits).then(|| {
        let name = if template.slot(CREDITS_SLOT).is_some() {
            format!("{CREDITS_SLOT} (credits)")
        } else {
            CREDITS_SLOT.to_string()
        };
        credits_suppressor(name)
    });
    let slots: Vec<&SlotSpec> = template.slots.iter().chain(suppressor.iter()).collect();

    let mut env = BuildEnv {
        config,
        page: template.page,
        layout_name: &template.name,
        primary_map: ctx.primary_map.clone(),
        resolver: StyleResolver::new(ctx.styles, ctx.theme.clone()),
        host: &mut *ctx.host,
        frames: FrameRegistry::default(),
        warnings: Vec::new(),
    };

    let mut seen = HashSet::new();
    for (index, slot) in slots.iter().enumerate() {
        if !seen.insert(slot.id.as_str()) {
            return Err(LayoutError::DuplicateSlot {
                slot: slot.id.clone(),
            });
        }
        if slot.element.declares_frame() {
            env.frames.declare(&slot.id, index);
        }
    }

    for slot in &slots {
        for (item_type, style) in slot.element.style_refs() {
            env.resolver.resolve_ref(item_type, style)?;
        }
    }
    for (index, slot) in slots.iter().enumerate() {
        for frame in slot.element.frame_references() {
            env.frames.check_declared(&slot.id, index, frame)?;
        }
    }

    for (index, slot) in slots.iter().enumerate() {
        let element = match &slot.element {
            ElementSpec::MapFrame(spec) => build_map_frame(&mut env, slot, index, spec),
            ElementSpec::InsetFrame(spec) => build_inset_frame(&mut env, slot, index, spec),
            ElementSpec::Text(spec) => build_text(&mut env, slot, index, spec),
            ElementSpec::NorthArrow(spec) => build_north_arrow(&mut env, slot, index, spec),
            ElementSpec::ScaleBar(spec) => build_scale_bar(&mut env, slot, index, spec),
            ElementSpec::Legend(spec) => build_legend(&mut env, slot, index, spec),
            ElementSpec::DecorativeShape(spec) => build_shape(&mut env, slot, index, spec),
            ElementSpec::InvisibleCredits(spec) => build_credits(&mut env, slot, index, spec),
        }?;
        debug!(slot = %slot.id, kind = %slot.kind(), bounds = %element.bounds, "resolved slot");
        document.elements.push(element);
        *state = ComposeState::SlotsResolving {
            resolved: index + 1,
        };
    }

    debug!(lookups = env.resolver.catalog_lookups(), "style catalog lookups");
    Ok(env.warnings)
}
