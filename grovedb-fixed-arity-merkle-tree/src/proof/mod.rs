//! Inclusion proof generation for the fixed-arity Merkle tree.
//!
//! Two proof shapes are produced:
//!
//! - [`PathProof`]: the digests on the path from a leaf to the root. It is
//!   checked against the tree that produced it, re-walking the stored
//!   digests rather than recomputing any hashes above the leaf.
//! - [`DetachedProof`]: the leaf value plus, for every level, the sibling
//!   digests and the slot the running digest occupies in its parent's
//!   concatenation. It is checked against a trusted root alone.

use std::marker::PhantomData;

use crate::{ArityMerkleError, FixedArityMerkleTree, MerkleHasher, error::Result};

mod tests;

/// Digests from a leaf up to and including the root.
#[derive(Debug, Clone)]
pub struct PathProof<H: MerkleHasher> {
    /// Leaf position the path starts at.
    pub leaf_index: usize,
    /// `path[0]` is the leaf digest, the last element the root.
    pub path: Vec<H::Digest>,
    pub(crate) _hasher: PhantomData<H>,
}

impl<H: MerkleHasher> PathProof<H> {
    /// Assemble a proof from raw parts.
    pub fn new(leaf_index: usize, path: Vec<H::Digest>) -> Self {
        Self {
            leaf_index,
            path,
            _hasher: PhantomData,
        }
    }

    /// The root digest the path ends at, if any.
    pub fn root(&self) -> Option<&H::Digest> {
        self.path.last()
    }
}

/// Siblings needed to lift a digest one row up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofLevel<D> {
    /// Slot of the running digest among its `arity` siblings.
    pub position: usize,
    /// The other `arity - 1` children of the parent, left to right.
    pub siblings: Vec<D>,
}

/// A self-contained inclusion proof that needs only a trusted root to
/// verify.
#[derive(Debug, Clone)]
pub struct DetachedProof<H: MerkleHasher> {
    /// Branching factor of the tree the proof was taken from.
    pub arity: usize,
    /// Leaf position being proved.
    pub leaf_index: usize,
    /// Raw leaf value, hashed during verification.
    pub leaf_value: Vec<u8>,
    /// One level per row below the root, leaves first.
    pub levels: Vec<ProofLevel<H::Digest>>,
    pub(crate) _hasher: PhantomData<H>,
}

impl<H: MerkleHasher> DetachedProof<H> {
    /// Assemble a proof from raw parts.
    pub fn new(
        arity: usize,
        leaf_index: usize,
        leaf_value: Vec<u8>,
        levels: Vec<ProofLevel<H::Digest>>,
    ) -> Self {
        Self {
            arity,
            leaf_index,
            leaf_value,
            levels,
            _hasher: PhantomData,
        }
    }
}

impl<H: MerkleHasher> FixedArityMerkleTree<H> {
    /// Path proof for `leaf_index`.
    ///
    /// Fails with [`ArityMerkleError::IndexOutOfRange`] when
    /// `leaf_index >= leaf_count`.
    pub fn prove(&self, leaf_index: usize) -> Result<PathProof<H>> {
        Ok(PathProof::new(leaf_index, self.hash_path(leaf_index)?))
    }

    /// Detached proof that `leaf_value` sits at `leaf_index`.
    ///
    /// The value must hash to the stored leaf digest; a proof for data the
    /// tree does not hold is never produced.
    pub fn prove_detached(
        &self,
        leaf_index: usize,
        leaf_value: impl AsRef<[u8]>,
    ) -> Result<DetachedProof<H>> {
        let layout = self.layout();
        let path = layout.path(leaf_index)?;
        let leaf_value = leaf_value.as_ref();

        if H::hash(leaf_value) != self.nodes()[leaf_index] {
            return Err(ArityMerkleError::InvalidProof(format!(
                "value does not match the digest stored at leaf {}",
                leaf_index
            )));
        }

        let nodes = self.nodes();
        let mut levels = Vec::with_capacity(path.len() - 1);
        for &index in &path[..path.len() - 1] {
            let siblings = layout.children(layout.parent(index)?)?;
            let position = index - siblings.start;
            levels.push(ProofLevel {
                position,
                siblings: siblings
                    .filter(|&sibling| sibling != index)
                    .map(|sibling| nodes[sibling].clone())
                    .collect(),
            });
        }

        Ok(DetachedProof::new(
            self.arity(),
            leaf_index,
            leaf_value.to_vec(),
            levels,
        ))
    }
}
