//! Segment-based template documents
//!
//! A [`Document`] is a list of plain text segments and named slots.
//! Binding an anchor cuts the first matching span out of a text segment
//! and turns it into a slot; filling the slot changes what it renders.
//! Unfilled slots render their original text, so `render` after any
//! number of binds without fills returns the input unchanged.

use super::anchor::Anchor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Slot {
        name: String,
        original: String,
        value: Option<String>,
    },
}

impl Segment {
    fn rendered(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Slot {
                value: Some(value), ..
            } => value,
            Segment::Slot { original, .. } => original,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Self {
            segments: vec![Segment::Text(text.to_string())],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Turn the first span matched by `anchor` into a slot named after the
    /// anchor. Spans already bound are opaque to later anchors. Returns
    /// `false` when nothing matches.
    pub fn bind(&mut self, anchor: &Anchor) -> bool {
        for i in 0..self.segments.len() {
            let Segment::Text(text) = &self.segments[i] else {
                continue;
            };
            let Some((start, stop)) = anchor.find(text) else {
                continue;
            };

            let before = text[..start].to_string();
            let original = text[start..stop].to_string();
            let after = text[stop..].to_string();

            let mut replacement = Vec::with_capacity(3);
            if !before.is_empty() {
                replacement.push(Segment::Text(before));
            }
            replacement.push(Segment::Slot {
                name: anchor.name().to_string(),
                original,
                value: None,
            });
            if !after.is_empty() {
                replacement.push(Segment::Text(after));
            }
            self.segments.splice(i..=i, replacement);
            return true;
        }
        false
    }

    /// Original text of a bound slot.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.segments.iter().find_map(|s| match s {
            Segment::Slot {
                name: n, original, ..
            } if n.as_str() == name => Some(original.as_str()),
            _ => None,
        })
    }

    /// Fill the first slot called `name`. Returns `false` if unbound.
    pub fn fill(&mut self, name: &str, content: impl Into<String>) -> bool {
        for segment in &mut self.segments {
            if let Segment::Slot {
                name: n, value, ..
            } = segment
            {
                if n.as_str() == name {
                    *value = Some(content.into());
                    return true;
                }
            }
        }
        false
    }

    pub fn render(&self) -> String {
        self.segments.iter().map(Segment::rendered).collect()
    }
}

/// Replace the first `begin ... end` span of `text`, markers included.
/// Text without the marker pair is returned unchanged.
pub fn replace_region(text: &str, begin: &str, end: &str, replacement: &str) -> String {
    let anchor = Anchor::region("region", begin, end);
    let mut doc = Document::parse(text);
    if doc.bind(&anchor) {
        doc.fill("region", replacement);
    }
    doc.render()
}
