//! Instruction Aliasing
//!
//! Turns the flat instruction list of a device data file into the tables
//! needed to emit named accessors:
//!
//! ```text
//! names -> parse_name -> GroupBuilder -> DenseMap -> AliasTable
//!          (base, coords)  (dims, entries)  (row-major cells)
//! ```
//!
//! Every instruction keeps a plain accessor. Instructions whose names share
//! a base and coordinate arity (`Pump_0_1`, `Pump_2_0`, ...) additionally
//! form a [`ParameterGroup`] addressed through a dense lookup table.

pub mod dense;
pub mod group;
pub mod name;

pub use dense::{cell_count, linear_offset, strides, DenseMap, MAX_CELLS, SENTINEL};
pub use group::{build_groups, GroupBuilder, GroupEntry, ParameterGroup};
pub use name::{parse_name, Instruction, ParsedName, FIELD_SEPARATOR};

use std::fmt;

/// Non-fatal findings while grouping instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Coordinate arity differs from the group's established arity; the
    /// instruction only keeps its plain accessors.
    GroupMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Name has separators but does not follow `Base_<int>_<int>...`.
    NonNumericCoordinate { name: String, segment: String },
    /// Lookup table for the group would overflow or exceed
    /// [`MAX_CELLS`]; its members only keep their plain accessors.
    OversizedGroup {
        group: String,
        max_coords: Vec<usize>,
    },
    /// Two instructions share a dense map cell; the later one wins.
    Collision {
        group: String,
        coords: Vec<usize>,
        overwritten: usize,
        index: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::GroupMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "ignoring {} for parameterized instruction method ({} coordinates, group has {})",
                name, found, expected
            ),
            Diagnostic::NonNumericCoordinate { name, segment } => write!(
                f,
                "ignoring {} for parameterized instruction method (segment '{}' is not a coordinate)",
                name, segment
            ),
            Diagnostic::OversizedGroup { group, max_coords } => write!(
                f,
                "ignoring parameterized instruction method {} (coordinates up to {:?} exceed {} table cells)",
                group, max_coords, MAX_CELLS
            ),
            Diagnostic::Collision {
                group,
                coords,
                overwritten,
                index,
            } => write!(
                f,
                "{}{:?}: instruction {} overwrites instruction {}",
                group, coords, index, overwritten
            ),
        }
    }
}

/// A parameter group with its dense lookup table.
#[derive(Debug, Clone)]
pub struct AliasGroup {
    pub group: ParameterGroup,
    pub map: DenseMap,
}

/// Everything needed to emit instruction accessors for one data file.
#[derive(Debug, Clone)]
pub struct AliasTable {
    pub instructions: Vec<Instruction>,
    pub groups: Vec<AliasGroup>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AliasTable {
    /// Build from instruction names in declaration order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let instructions: Vec<Instruction> = names
            .iter()
            .enumerate()
            .map(|(index, name)| Instruction::new(name.as_ref(), index))
            .collect();
        Self::build(instructions)
    }

    pub fn build(instructions: Vec<Instruction>) -> Self {
        let (parameter_groups, mut diagnostics) = build_groups(&instructions);

        let mut groups = Vec::with_capacity(parameter_groups.len());
        for group in parameter_groups.into_iter().filter(|g| !g.entries.is_empty()) {
            match DenseMap::build(&group) {
                Ok((map, collisions)) => {
                    diagnostics.extend(collisions);
                    groups.push(AliasGroup { group, map });
                }
                Err(oversized) => diagnostics.push(oversized),
            }
        }

        for diagnostic in &diagnostics {
            tracing::warn!("{}", diagnostic);
        }
        tracing::debug!(
            instructions = instructions.len(),
            groups = groups.len(),
            "built instruction alias table"
        );

        AliasTable {
            instructions,
            groups,
            diagnostics,
        }
    }

    pub fn group(&self, base_name: &str) -> Option<&AliasGroup> {
        self.groups.iter().find(|g| g.group.base_name == base_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_names() {
        let table = AliasTable::from_names(&["Pump_0", "Pump_1", "Mix"]);
        assert_eq!(table.instructions.len(), 3);
        assert_eq!(table.instructions[2], Instruction::new("Mix", 2));
        assert_eq!(table.groups.len(), 1);

        let pump = table.group("Pump").unwrap();
        assert_eq!(pump.map.cells(), &[0, 1]);
        assert!(table.diagnostics.is_empty());
    }

    #[test]
    fn test_diagnostics_are_collected() {
        let table = AliasTable::from_names(&["A_0", "A_0", "A_1_1"]);
        assert_eq!(table.diagnostics.len(), 2);
        assert!(table
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::GroupMismatch { .. })));
        assert!(table
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::Collision { index: 1, .. })));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::GroupMismatch {
            name: "A_1_1".to_string(),
            expected: 1,
            found: 2,
        };
        assert!(d.to_string().starts_with("ignoring A_1_1"));
    }

    #[test]
    fn test_huge_coordinates_keep_plain_accessors() {
        let table =
            AliasTable::from_names(&["A_4294967296_4294967296", "B_18446744073709551615", "C_1"]);
        assert_eq!(table.instructions.len(), 3);
        assert_eq!(table.groups.len(), 1);
        assert!(table.group("C").is_some());
        assert_eq!(
            table
                .diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::OversizedGroup { .. }))
                .count(),
            2
        );
    }
}
