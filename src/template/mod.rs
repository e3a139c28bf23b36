//! Template Patching
//!
//! Splices generated fragments and scalar values into template sources.
//!
//! # Key Concepts
//!
//! - **Anchor**: a begin/end marker pair, or a labelled token such as
//!   `int IMAGE_WIDTH = 756`
//! - **Document**: template text cut into plain segments and named slots
//! - **TemplatePatch**: the required anchors of one file and what to put
//!   in each of them
//!
//! Identifier renaming (`TemplateGUI` -> `ChipGUI`) runs on the raw text
//! before any anchor is bound.

pub mod anchor;
pub mod document;

pub use anchor::{Anchor, AnchorKind};
pub use document::{replace_region, Document, Segment};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("{file}: missing anchor {anchor}")]
    MissingAnchor { file: String, anchor: String },
}

/// Replace every occurrence of the template prefix with the application
/// prefix.
pub fn rename_prefix(text: &str, template_prefix: &str, app_prefix: &str) -> String {
    if template_prefix.is_empty() {
        return text.to_string();
    }
    text.replace(template_prefix, app_prefix)
}

/// Required substitutions for one template file.
#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
    substitutions: Vec<(Anchor, String)>,
}

impl TemplatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `anchor` and replace its span with `value`.
    pub fn set(mut self, anchor: Anchor, value: impl Into<String>) -> Self {
        self.substitutions.push((anchor, value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    /// Bind every anchor against the original text, then fill them all.
    /// Regions are bound before tokens, so a token label quoted inside a
    /// region does not swallow part of it. Fails on the first anchor that
    /// does not match.
    pub fn apply(&self, file: &str, text: &str) -> Result<String, PatchError> {
        let mut doc = Document::parse(text);

        let (regions, tokens): (Vec<&Anchor>, Vec<&Anchor>) = self
            .substitutions
            .iter()
            .map(|(anchor, _)| anchor)
            .partition(|anchor| matches!(anchor.kind(), AnchorKind::Region { .. }));

        for anchor in regions.into_iter().chain(tokens) {
            if !doc.bind(anchor) {
                return Err(PatchError::MissingAnchor {
                    file: file.to_string(),
                    anchor: anchor.to_string(),
                });
            }
            tracing::trace!(file, anchor = anchor.name(), "bound anchor");
        }
        for (anchor, value) in &self.substitutions {
            doc.fill(anchor.name(), value.as_str());
        }

        Ok(doc.render())
    }
}
