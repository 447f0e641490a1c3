//! Row arithmetic for a perfect `arity`-ary tree stored row-major.
//!
//! Row 0 holds the leaves, the last row holds the root. Node indices run
//! through all of row 0, then all of row 1, and so on, so the root always
//! sits at `len - 1`.
//!
//! ```text
//! arity = 2, 8 leaves
//!
//!                      14
//!            12                    13
//!       8         9          10         11
//!     0   1     2   3      4    5     6    7
//! ```

use std::ops::Range;

use crate::{ArityMerkleError, error::Result};

/// Index layout of a tree with a given leaf count and arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    arity: usize,
    leaf_count: usize,
    /// First node index of each row, leaves first.
    row_starts: Vec<usize>,
    len: usize,
}

impl RowLayout {
    /// Compute the layout, rejecting shapes that do not form a perfect tree.
    ///
    /// Every row must divide exactly by `arity` until a single root remains,
    /// so `leaf_count` has to be a power of `arity` (and at least `arity`).
    pub fn new(leaf_count: usize, arity: usize) -> Result<Self> {
        if arity < 2 {
            return Err(ArityMerkleError::InvalidArity { arity });
        }
        if leaf_count < arity {
            return Err(ArityMerkleError::InvalidLeafCount {
                leaf_count,
                arity,
                reason: "fewer leaves than arity",
            });
        }
        if leaf_count % arity != 0 {
            return Err(ArityMerkleError::InvalidLeafCount {
                leaf_count,
                arity,
                reason: "leaf count is not divisible by arity",
            });
        }

        let mut row_starts = vec![0];
        let mut start = 0;
        let mut row_len = leaf_count;
        while row_len > 1 {
            if row_len % arity != 0 {
                return Err(ArityMerkleError::InvalidLeafCount {
                    leaf_count,
                    arity,
                    reason: "an inner row is not divisible by arity",
                });
            }
            start += row_len;
            row_len /= arity;
            row_starts.push(start);
        }

        Ok(Self {
            arity,
            leaf_count,
            row_starts,
            len: start + 1,
        })
    }

    /// Branching factor.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of nodes in row 0.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of rows from the leaves to the root, both included.
    pub fn row_count(&self) -> usize {
        self.row_starts.len()
    }

    /// Total number of nodes across all rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a valid layout holds at least `arity + 1` nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the root node.
    pub fn root_index(&self) -> usize {
        self.len - 1
    }

    /// Node indices covered by `row`.
    pub fn row_range(&self, row: usize) -> Result<Range<usize>> {
        let start = *self
            .row_starts
            .get(row)
            .ok_or(ArityMerkleError::IndexOutOfRange {
                index: row,
                bound: self.row_count(),
            })?;
        let end = self.row_starts.get(row + 1).copied().unwrap_or(self.len);
        Ok(start..end)
    }

    /// Row that node `index` belongs to.
    pub fn row_of(&self, index: usize) -> Result<usize> {
        self.check_node(index)?;
        Ok(match self.row_starts.binary_search(&index) {
            Ok(row) => row,
            Err(row) => row - 1,
        })
    }

    /// Parent of node `index` in the row above.
    pub fn parent(&self, index: usize) -> Result<usize> {
        let row = self.row_of(index)?;
        if index == self.root_index() {
            return Err(ArityMerkleError::RootHasNoParent(index));
        }
        let offset = index - self.row_starts[row];
        Ok(self.row_starts[row + 1] + offset / self.arity)
    }

    /// The `arity` contiguous children of node `index`, left to right.
    pub fn children(&self, index: usize) -> Result<Range<usize>> {
        let row = self.row_of(index)?;
        if row == 0 {
            return Err(ArityMerkleError::LeafHasNoChildren(index));
        }
        let offset = index - self.row_starts[row];
        let first = self.row_starts[row - 1] + offset * self.arity;
        Ok(first..first + self.arity)
    }

    /// Node indices from leaf `leaf_index` up to and including the root.
    pub fn path(&self, leaf_index: usize) -> Result<Vec<usize>> {
        if leaf_index >= self.leaf_count {
            return Err(ArityMerkleError::IndexOutOfRange {
                index: leaf_index,
                bound: self.leaf_count,
            });
        }
        let mut offset = leaf_index;
        let mut path = Vec::with_capacity(self.row_count());
        for &start in &self.row_starts {
            path.push(start + offset);
            offset /= self.arity;
        }
        Ok(path)
    }

    fn check_node(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(ArityMerkleError::IndexOutOfRange {
                index,
                bound: self.len,
            });
        }
        Ok(())
    }
}
