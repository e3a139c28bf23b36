//! Anchors locating editable spans in template text

use regex::Regex;
use std::fmt;

/// What an anchor matches.
#[derive(Debug, Clone)]
pub enum AnchorKind {
    /// `begin ... end`, both markers included in the span. The shortest
    /// span after the first begin marker is taken.
    Region { begin: String, end: String },
    /// A token following a fixed label. The pattern's `value` group is the
    /// replaced span; the rest of the match stays in place.
    Token(Regex),
}

/// A named anchor.
#[derive(Debug, Clone)]
pub struct Anchor {
    name: String,
    kind: AnchorKind,
}

impl Anchor {
    /// Region delimited by `// BEGIN <name>` and `// END <name>`.
    pub fn comment_region(name: &str) -> Self {
        Self::region(name, format!("// BEGIN {}", name), format!("// END {}", name))
    }

    pub fn region(name: impl Into<String>, begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AnchorKind::Region {
                begin: begin.into(),
                end: end.into(),
            },
        }
    }

    /// Integer literal right after `label`, e.g. `int IMAGE_WIDTH = 756`.
    pub fn integer(name: impl Into<String>, label: &str) -> Self {
        Self::token(name, &format!(r"{}(?P<value>\d+)", regex::escape(label)))
    }

    /// Quoted png filename right after `label`, e.g.
    /// `IMAGE_FILENAME = "template.png"`. The quotes are kept.
    pub fn quoted_png(name: impl Into<String>, label: &str) -> Self {
        Self::token(
            name,
            &format!(r#"{}"(?P<value>\w+.png)""#, regex::escape(label)),
        )
    }

    fn token(name: impl Into<String>, pattern: &str) -> Self {
        // labels are escaped, so the pattern is always well formed
        let re = Regex::new(pattern).expect("escaped anchor pattern");
        Self {
            name: name.into(),
            kind: AnchorKind::Token(re),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AnchorKind {
        &self.kind
    }

    /// Byte range of the first editable span in `text`.
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        match &self.kind {
            AnchorKind::Region { begin, end } => {
                let start = text.find(begin.as_str())?;
                let after_begin = start + begin.len();
                let stop = text[after_begin..].find(end.as_str())? + after_begin + end.len();
                Some((start, stop))
            }
            AnchorKind::Token(re) => {
                let value = re.captures(text)?.name("value")?;
                Some((value.start(), value.end()))
            }
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AnchorKind::Region { begin, end } => write!(f, "'{}' ... '{}'", begin, end),
            AnchorKind::Token(re) => write!(f, "{} ({})", self.name, re.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_is_shortest_after_first_begin() {
        let anchor = Anchor::comment_region("R");
        let text = "a // BEGIN R x // END R b // END R";
        let (start, stop) = anchor.find(text).unwrap();
        assert_eq!(&text[start..stop], "// BEGIN R x // END R");
    }

    #[test]
    fn test_region_needs_end_after_begin() {
        let anchor = Anchor::comment_region("R");
        assert_eq!(anchor.find("// END R then // BEGIN R"), None);
        assert_eq!(anchor.find("nothing"), None);
    }

    #[test]
    fn test_integer_token() {
        let anchor = Anchor::integer("width", "int IMAGE_WIDTH = ");
        let text = "protected static final int IMAGE_WIDTH = 756;";
        let (start, stop) = anchor.find(text).unwrap();
        assert_eq!(&text[start..stop], "756");
    }

    #[test]
    fn test_integer_token_skips_non_numeric_occurrence() {
        let anchor = Anchor::integer("width", "int IMAGE_WIDTH = ");
        let text = "int IMAGE_WIDTH = X; int IMAGE_WIDTH = 12;";
        let (start, stop) = anchor.find(text).unwrap();
        assert_eq!(&text[start..stop], "12");
    }

    #[test]
    fn test_quoted_png_token() {
        let anchor = Anchor::quoted_png("image", "IMAGE_FILENAME = ");
        let text = r#"String IMAGE_FILENAME = "template.png";"#;
        let (start, stop) = anchor.find(text).unwrap();
        assert_eq!(&text[start..stop], "template.png");
        assert_eq!(anchor.find(r#"IMAGE_FILENAME = "a.gif";"#), None);
    }
}
