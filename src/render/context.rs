//! Rendering context - per-call inputs that affect generated geometry

use rustc_hash::FxHashMap;

use crate::element::ElementId;

use super::defaults;

/// State of the surrounding render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    /// Exports always regenerate and draw unvalidated embeds as placeholders
    pub is_exporting: bool,
    /// Fill color for outline arrowheads
    pub canvas_background_color: String,
    /// Validation status of embeddable links, by element id
    pub embeds_validation: Option<FxHashMap<ElementId, bool>>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            is_exporting: false,
            canvas_background_color: defaults::CANVAS_BACKGROUND.to_string(),
            embeds_validation: None,
        }
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exporting(mut self) -> Self {
        self.is_exporting = true;
        self
    }

    pub fn with_canvas_background(mut self, color: impl Into<String>) -> Self {
        self.canvas_background_color = color.into();
        self
    }

    pub fn with_embed_validation(mut self, id: ElementId, valid: bool) -> Self {
        self.embeds_validation
            .get_or_insert_with(FxHashMap::default)
            .insert(id, valid);
        self
    }

    /// Only an explicit `true` counts as validated
    pub fn is_embed_validated(&self, id: &ElementId) -> bool {
        self.embeds_validation
            .as_ref()
            .and_then(|map| map.get(id))
            .copied()
            .unwrap_or(false)
    }
}
