//! Dense coordinate maps
//!
//! Flattens a group's sparse `coords -> index` entries into a row-major
//! array covering the whole bounding shape (last axis varies fastest).

use super::group::ParameterGroup;
use super::Diagnostic;

/// Cell value for coordinates no instruction supplies.
pub const SENTINEL: i64 = -1;

/// Largest dense map emitted as a lookup table.
pub const MAX_CELLS: usize = 1 << 20;

/// Row-major lookup table from coordinates to instruction index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMap {
    shape: Vec<usize>,
    strides: Vec<usize>,
    cells: Vec<i64>,
}

impl DenseMap {
    /// Build the map for a group. Colliding entries keep the later index and
    /// are reported as diagnostics. Shapes above [`MAX_CELLS`] are rejected
    /// with [`Diagnostic::OversizedGroup`].
    pub fn build(group: &ParameterGroup) -> Result<(Self, Vec<Diagnostic>), Diagnostic> {
        let shape = group.dims.clone();
        let (len, strides) = match (cell_count(&shape), strides(&shape)) {
            (Some(len), Some(strides)) => (len, strides),
            _ => {
                return Err(Diagnostic::OversizedGroup {
                    group: group.base_name.clone(),
                    max_coords: shape.iter().map(|d| d.saturating_sub(1)).collect(),
                })
            }
        };
        let mut cells = vec![SENTINEL; len];
        let mut diagnostics = Vec::new();

        for entry in &group.entries {
            let offset = linear_offset(&entry.coords, &strides);
            let Some(cell) = cells.get_mut(offset) else {
                continue;
            };
            if *cell != SENTINEL {
                diagnostics.push(Diagnostic::Collision {
                    group: group.base_name.clone(),
                    coords: entry.coords.clone(),
                    overwritten: *cell as usize,
                    index: entry.index,
                });
            }
            *cell = entry.index as i64;
        }

        Ok((
            DenseMap {
                shape,
                strides,
                cells,
            },
            diagnostics,
        ))
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn cells(&self) -> &[i64] {
        &self.cells
    }

    /// Offset of `coords`, or `None` when outside the shape.
    pub fn offset(&self, coords: &[usize]) -> Option<usize> {
        if coords.len() != self.shape.len() || coords.iter().zip(&self.shape).any(|(c, s)| c >= s)
        {
            return None;
        }
        Some(linear_offset(coords, &self.strides))
    }

    /// Instruction index at `coords`, `None` for unset or out-of-shape cells.
    pub fn get(&self, coords: &[usize]) -> Option<usize> {
        let cell = self.cells[self.offset(coords)?];
        (cell != SENTINEL).then_some(cell as usize)
    }
}

/// Number of cells of `shape`, `None` when it exceeds [`MAX_CELLS`].
pub fn cell_count(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &size| acc.checked_mul(size))
        .filter(|&len| len <= MAX_CELLS)
}

/// Row-major strides: last axis 1, each earlier axis the product of the
/// sizes after it. `None` on overflow.
pub fn strides(shape: &[usize]) -> Option<Vec<usize>> {
    let mut strides = vec![0; shape.len()];
    let mut step: usize = 1;
    for axis in (0..shape.len()).rev() {
        strides[axis] = step;
        step = step.checked_mul(shape[axis])?;
    }
    Some(strides)
}

/// Sum of `coords[i] * strides[i]`. Only meaningful for coordinates inside
/// a shape accepted by [`cell_count`].
pub fn linear_offset(coords: &[usize], strides: &[usize]) -> usize {
    coords.iter().zip(strides).map(|(c, s)| c * s).sum()
}
