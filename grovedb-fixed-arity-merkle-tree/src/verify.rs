//! Proof verification for the fixed-arity Merkle tree.
//!
//! Path proofs are checked against the tree they came from: the claimed
//! value is hashed once and every digest on the path must equal the one the
//! tree stores at the corresponding ancestor.
//!
//! Detached proofs are pure: the root is recomputed level by level from the
//! leaf value and the carried siblings, then compared to a trusted root.

use tracing::debug;

use crate::{
    ArityMerkleError, DetachedProof, FixedArityMerkleTree, MerkleHasher, PathProof,
    error::Result,
};

/// Upper bound on proof levels; a tree of arity 2 over `usize` leaves never
/// needs more.
const MAX_PROOF_LEVELS: usize = usize::BITS as usize;

impl<H: MerkleHasher> FixedArityMerkleTree<H> {
    /// Whether `claimed` is the value stored at `leaf_index`.
    ///
    /// Returns `false` for an out-of-range index instead of an error.
    pub fn validate(&self, leaf_index: usize, claimed: impl AsRef<[u8]>) -> bool {
        match self.prove(leaf_index) {
            Ok(proof) => proof.validate(self, claimed),
            Err(_) => false,
        }
    }
}

impl<H: MerkleHasher> PathProof<H> {
    /// Check `claimed` against the leaf this proof starts at, and the path
    /// itself against `tree`'s recorded parent chain up to its root.
    pub fn validate(&self, tree: &FixedArityMerkleTree<H>, claimed: impl AsRef<[u8]>) -> bool {
        let indices = match tree.layout().path(self.leaf_index) {
            Ok(indices) => indices,
            Err(e) => {
                debug!(leaf_index = self.leaf_index, error = %e, "path proof rejected");
                return false;
            }
        };
        if indices.len() != self.path.len() {
            debug!(
                expected = indices.len(),
                got = self.path.len(),
                "path proof length does not match tree height"
            );
            return false;
        }

        if H::hash(claimed.as_ref()) != self.path[0] {
            return false;
        }

        let nodes = tree.nodes();
        if let Some(row) = indices
            .iter()
            .zip(&self.path)
            .position(|(&index, digest)| nodes[index] != *digest)
        {
            debug!(
                leaf_index = self.leaf_index,
                row, "path proof diverges from the tree"
            );
            return false;
        }

        self.root() == Some(tree.root())
    }
}

impl<H: MerkleHasher> DetachedProof<H> {
    /// Verify the proof against an expected root.
    pub fn verify(&self, expected_root: &H::Digest) -> Result<()> {
        let computed_root = self.verify_and_get_root()?;

        if &computed_root != expected_root {
            debug!(leaf_index = self.leaf_index, "detached proof root mismatch");
            return Err(ArityMerkleError::InvalidProof(format!(
                "root hash mismatch: expected {}, got {}",
                hex::encode(expected_root.as_ref()),
                hex::encode(computed_root.as_ref())
            )));
        }

        Ok(())
    }

    /// Whether `claimed`, in place of the carried leaf value, lifts to
    /// `expected_root`.
    pub fn validate(&self, claimed: impl AsRef<[u8]>, expected_root: &H::Digest) -> bool {
        match self.compute_root(&H::hash(claimed.as_ref())) {
            Ok(root) => &root == expected_root,
            Err(e) => {
                debug!(leaf_index = self.leaf_index, error = %e, "detached proof rejected");
                false
            }
        }
    }

    /// Validate the proof structure and recompute the root from the carried
    /// leaf value.
    pub fn verify_and_get_root(&self) -> Result<H::Digest> {
        self.compute_root(&H::hash(&self.leaf_value))
    }

    fn compute_root(&self, leaf_digest: &H::Digest) -> Result<H::Digest> {
        self.check_structure()?;

        let mut current = leaf_digest.clone();
        let mut children = Vec::with_capacity(self.arity);
        for level in &self.levels {
            children.clear();
            children.extend_from_slice(&level.siblings[..level.position]);
            children.push(current);
            children.extend_from_slice(&level.siblings[level.position..]);
            current = H::hash_children(&children);
        }
        Ok(current)
    }

    /// Reject proofs whose shape cannot come from a tree of `self.arity`.
    ///
    /// Each level's slot must be the matching base-`arity` digit of
    /// `leaf_index`, and the index must be exhausted by the last level.
    fn check_structure(&self) -> Result<()> {
        if self.arity < 2 {
            return Err(ArityMerkleError::InvalidProof(format!(
                "invalid arity {} in proof",
                self.arity
            )));
        }
        if self.levels.is_empty() {
            return Err(ArityMerkleError::InvalidProof(
                "proof has no levels".into(),
            ));
        }
        if self.levels.len() > MAX_PROOF_LEVELS {
            return Err(ArityMerkleError::InvalidProof(format!(
                "proof has {} levels (max {})",
                self.levels.len(),
                MAX_PROOF_LEVELS
            )));
        }

        let mut offset = self.leaf_index;
        for (row, level) in self.levels.iter().enumerate() {
            if level.siblings.len() != self.arity - 1 {
                return Err(ArityMerkleError::InvalidProof(format!(
                    "level {} has {} siblings, expected {}",
                    row,
                    level.siblings.len(),
                    self.arity - 1
                )));
            }
            if level.position != offset % self.arity {
                return Err(ArityMerkleError::InvalidProof(format!(
                    "level {} places the digest at slot {}, leaf {} requires slot {}",
                    row,
                    level.position,
                    self.leaf_index,
                    offset % self.arity
                )));
            }
            offset /= self.arity;
        }
        if offset != 0 {
            return Err(ArityMerkleError::InvalidProof(format!(
                "leaf index {} does not fit in {} levels of arity {}",
                self.leaf_index,
                self.levels.len(),
                self.arity
            )));
        }

        Ok(())
    }
}
