//! Instruction name parsing
//!
//! Instruction names encode their position in a parameter grid:
//! `Pump_3_1` is instruction `Pump` at coordinates `(3, 1)`, while a
//! name without separators such as `Mix` carries no coordinates.

/// Separator between the base identifier and each coordinate.
pub const FIELD_SEPARATOR: char = '_';

/// A named control operation with its declaration-order index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub name: String,
    pub index: usize,
}

impl Instruction {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Result of splitting an instruction name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName<'a> {
    /// No separator: the whole name is the identifier.
    Plain(&'a str),
    /// Base identifier plus one coordinate per trailing segment.
    Parameterized { base: &'a str, coords: Vec<usize> },
    /// Has separators, but the base is empty or a trailing segment is not
    /// a non-negative integer. Handled as a plain instruction.
    NonNumeric { name: &'a str, segment: &'a str },
}

impl<'a> ParsedName<'a> {
    /// Base identifier used for grouping (`None` for non-numeric names).
    pub fn base(&self) -> Option<&'a str> {
        match self {
            ParsedName::Plain(name) => Some(name),
            ParsedName::Parameterized { base, .. } => Some(base),
            ParsedName::NonNumeric { .. } => None,
        }
    }

    /// Coordinates, empty for anything but a parameterized name.
    pub fn coords(&self) -> &[usize] {
        match self {
            ParsedName::Parameterized { coords, .. } => coords,
            _ => &[],
        }
    }
}

/// Split an instruction name into base identifier and coordinates.
pub fn parse_name(name: &str) -> ParsedName<'_> {
    let mut segments = name.split(FIELD_SEPARATOR);
    // split always yields at least one segment
    let base = segments.next().unwrap_or(name);
    let rest: Vec<&str> = segments.collect();

    if rest.is_empty() {
        return ParsedName::Plain(name);
    }
    if base.is_empty() {
        return ParsedName::NonNumeric {
            name,
            segment: base,
        };
    }

    let mut coords = Vec::with_capacity(rest.len());
    for segment in rest {
        match parse_coordinate(segment) {
            Some(value) => coords.push(value),
            None => return ParsedName::NonNumeric { name, segment },
        }
    }

    ParsedName::Parameterized { base, coords }
}

fn parse_coordinate(segment: &str) -> Option<usize> {
    // `usize::from_str` accepts a leading '+', which is not part of the grammar
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
