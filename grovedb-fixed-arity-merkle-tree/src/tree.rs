use std::{fmt, marker::PhantomData, ops::Range};

use tracing::{debug, trace};

use crate::{
    ArityMerkleError, MerkleHasher, RowLayout, TreeConfig, error::Result,
};

/// A fully materialized fixed-arity Merkle tree.
///
/// Digests are kept in one flat vector indexed row-major (see
/// [`RowLayout`]). Parent and child relations are computed from the index,
/// never stored. The tree is immutable once built.
#[derive(Clone, Debug)]
pub struct FixedArityMerkleTree<H: MerkleHasher> {
    layout: RowLayout,
    nodes: Vec<H::Digest>,
    _hasher: PhantomData<H>,
}

impl<H: MerkleHasher> FixedArityMerkleTree<H> {
    /// Build a tree over `leaves` with the given arity.
    ///
    /// `leaves.len()` must be a power of `arity`; otherwise returns
    /// [`ArityMerkleError::InvalidLeafCount`] before hashing anything.
    pub fn build<T>(leaves: &[T], arity: usize) -> Result<Self>
    where
        T: AsRef<[u8]> + Sync,
    {
        Self::build_with_config(leaves, &TreeConfig::with_arity(arity))
    }

    /// Build a tree over `leaves` using `config`.
    pub fn build_with_config<T>(leaves: &[T], config: &TreeConfig) -> Result<Self>
    where
        T: AsRef<[u8]> + Sync,
    {
        config.validate()?;
        let layout = RowLayout::new(leaves.len(), config.arity)?;

        let mut nodes = Vec::with_capacity(layout.len());
        nodes.extend(hash_leaves::<H, T>(leaves));
        trace!(row = 0, nodes = nodes.len(), "hashed leaf row");

        for row in 1..layout.row_count() {
            let below = layout.row_range(row - 1)?;
            let parents = hash_row::<H>(&nodes[below], layout.arity());
            trace!(row, nodes = parents.len(), "hashed inner row");
            nodes.extend(parents);
        }

        debug!(
            arity = layout.arity(),
            leaf_count = layout.leaf_count(),
            row_count = layout.row_count(),
            hash_calls = nodes.len(),
            root = %hex::encode(nodes[layout.root_index()].as_ref()),
            "built fixed arity merkle tree"
        );

        Ok(Self {
            layout,
            nodes,
            _hasher: PhantomData,
        })
    }

    /// Branching factor.
    pub fn arity(&self) -> usize {
        self.layout.arity()
    }

    /// Number of leaves the tree was built from.
    pub fn leaf_count(&self) -> usize {
        self.layout.leaf_count()
    }

    /// Number of rows, leaves and root included.
    pub fn row_count(&self) -> usize {
        self.layout.row_count()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// A built tree is never empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index arithmetic backing this tree.
    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// The root digest.
    pub fn root(&self) -> &H::Digest {
        &self.nodes[self.layout.root_index()]
    }

    /// Digest stored at node `index`.
    pub fn digest(&self, index: usize) -> Result<&H::Digest> {
        self.nodes
            .get(index)
            .ok_or(ArityMerkleError::IndexOutOfRange {
                index,
                bound: self.nodes.len(),
            })
    }

    /// All digests, row-major.
    pub fn nodes(&self) -> &[H::Digest] {
        &self.nodes
    }

    /// Leaf digests (row 0).
    pub fn leaves(&self) -> &[H::Digest] {
        &self.nodes[..self.layout.leaf_count()]
    }

    /// Digests of `row`.
    pub fn row(&self, row: usize) -> Result<&[H::Digest]> {
        let range = self.layout.row_range(row)?;
        Ok(&self.nodes[range])
    }

    /// Child indices of `index`, left to right.
    ///
    /// Fails with [`ArityMerkleError::LeafHasNoChildren`] on a leaf.
    pub fn children(&self, index: usize) -> Result<Range<usize>> {
        self.layout.children(index)
    }

    /// Parent index of `index`.
    ///
    /// Fails with [`ArityMerkleError::RootHasNoParent`] on the root.
    pub fn parent(&self, index: usize) -> Result<usize> {
        self.layout.parent(index)
    }

    /// Digests from leaf `leaf_index` up to and including the root.
    pub fn hash_path(&self, leaf_index: usize) -> Result<Vec<H::Digest>> {
        let path = self.layout.path(leaf_index)?;
        Ok(path
            .into_iter()
            .map(|index| self.nodes[index].clone())
            .collect())
    }
}

impl<H: MerkleHasher> std::ops::Index<usize> for FixedArityMerkleTree<H> {
    type Output = H::Digest;

    fn index(&self, index: usize) -> &H::Digest {
        &self.nodes[index]
    }
}

/// One line per node: `(index, digest)` followed by `--- leaf` or the
/// node's children.
impl<H: MerkleHasher> fmt::Display for FixedArityMerkleTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, digest) in self.nodes.iter().enumerate() {
            write!(f, "({}, {})", index, hex::encode(digest.as_ref()))?;
            match self.layout.children(index) {
                Ok(children) => {
                    write!(f, " <-- ")?;
                    for child in children {
                        write!(f, "({}, {})  ", child, hex::encode(self.nodes[child].as_ref()))?;
                    }
                }
                Err(_) => write!(f, " --- leaf")?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "parallel"))]
fn hash_leaves<H: MerkleHasher, T: AsRef<[u8]> + Sync>(leaves: &[T]) -> Vec<H::Digest> {
    leaves.iter().map(|leaf| H::hash(leaf.as_ref())).collect()
}

#[cfg(feature = "parallel")]
fn hash_leaves<H: MerkleHasher, T: AsRef<[u8]> + Sync>(leaves: &[T]) -> Vec<H::Digest> {
    use rayon::prelude::*;
    leaves.par_iter().map(|leaf| H::hash(leaf.as_ref())).collect()
}

/// Hash every consecutive group of `arity` digests into its parent.
#[cfg(not(feature = "parallel"))]
fn hash_row<H: MerkleHasher>(children: &[H::Digest], arity: usize) -> Vec<H::Digest> {
    children.chunks_exact(arity).map(H::hash_children).collect()
}

/// Hash every consecutive group of `arity` digests into its parent.
///
/// Parents within a row are independent, only rows depend on each other.
#[cfg(feature = "parallel")]
fn hash_row<H: MerkleHasher>(children: &[H::Digest], arity: usize) -> Vec<H::Digest> {
    use rayon::prelude::*;
    children
        .par_chunks_exact(arity)
        .map(H::hash_children)
        .collect()
}
