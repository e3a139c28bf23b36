//! Parameter group construction
//!
//! Instructions sharing a base identifier and a coordinate arity form a
//! group that can be addressed through one N-argument accessor.

use std::collections::HashMap;

use super::dense::cell_count;
use super::name::{parse_name, Instruction, ParsedName};
use super::Diagnostic;

/// One instruction's position inside its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub coords: Vec<usize>,
    pub index: usize,
}

/// A family of instructions addressable by coordinates.
///
/// `dims` holds per-axis sizes (maximum coordinate + 1), so every entry's
/// coordinates lie inside `dims`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterGroup {
    pub base_name: String,
    pub dims: Vec<usize>,
    pub entries: Vec<GroupEntry>,
}

impl ParameterGroup {
    /// Number of axes (= accessor argument count).
    pub fn arity(&self) -> usize {
        self.dims.len()
    }
}

/// Group under construction; `max` holds the running per-axis maximum.
#[derive(Debug)]
struct PendingGroup {
    base_name: String,
    max: Vec<usize>,
    entries: Vec<GroupEntry>,
}

/// Builds parameter groups from instructions in declaration order.
///
/// The base-name lookup lives inside the builder, so independent runs
/// never share state.
#[derive(Debug, Default)]
pub struct GroupBuilder {
    pending: Vec<PendingGroup>,
    by_base: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl GroupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one instruction. Must be called in increasing index order.
    pub fn add(&mut self, instruction: &Instruction) {
        let (base, coords) = match parse_name(&instruction.name) {
            ParsedName::Plain(_) => return,
            ParsedName::NonNumeric { name, segment } => {
                self.diagnostics.push(Diagnostic::NonNumericCoordinate {
                    name: name.to_string(),
                    segment: segment.to_string(),
                });
                return;
            }
            ParsedName::Parameterized { base, coords } => (base, coords),
        };

        match self.by_base.get(base) {
            None => {
                self.by_base.insert(base.to_string(), self.pending.len());
                self.pending.push(PendingGroup {
                    base_name: base.to_string(),
                    max: coords.clone(),
                    entries: vec![GroupEntry {
                        coords,
                        index: instruction.index,
                    }],
                });
            }
            Some(&slot) => {
                let group = &mut self.pending[slot];
                if group.max.len() != coords.len() {
                    self.diagnostics.push(Diagnostic::GroupMismatch {
                        name: instruction.name.clone(),
                        expected: group.max.len(),
                        found: coords.len(),
                    });
                    return;
                }
                for (max, &c) in group.max.iter_mut().zip(&coords) {
                    *max = (*max).max(c);
                }
                group.entries.push(GroupEntry {
                    coords,
                    index: instruction.index,
                });
            }
        }
    }

    /// Normalize running maxima into sizes and return groups in order of
    /// first appearance, together with the diagnostics seen so far. Groups
    /// whose lookup table would be too large are dropped with
    /// [`Diagnostic::OversizedGroup`]; their members keep plain accessors.
    pub fn finish(mut self) -> (Vec<ParameterGroup>, Vec<Diagnostic>) {
        let mut groups = Vec::with_capacity(self.pending.len());
        for g in self.pending {
            let dims: Option<Vec<usize>> = g.max.iter().map(|m| m.checked_add(1)).collect();
            match dims {
                Some(dims) if cell_count(&dims).is_some() => groups.push(ParameterGroup {
                    base_name: g.base_name,
                    dims,
                    entries: g.entries,
                }),
                _ => self.diagnostics.push(Diagnostic::OversizedGroup {
                    group: g.base_name,
                    max_coords: g.max,
                }),
            }
        }
        (groups, self.diagnostics)
    }
}

/// Group a full instruction list.
pub fn build_groups(instructions: &[Instruction]) -> (Vec<ParameterGroup>, Vec<Diagnostic>) {
    let mut builder = GroupBuilder::new();
    for instruction in instructions {
        builder.add(instruction);
    }
    builder.finish()
}
