use crate::{ArityMerkleError, error::Result};

/// Branching factor used when none is given.
pub const DEFAULT_ARITY: usize = 2;

/// Construction parameters for a [`FixedArityMerkleTree`].
///
/// [`FixedArityMerkleTree`]: crate::FixedArityMerkleTree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Number of children of every internal node.
    pub arity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            arity: DEFAULT_ARITY,
        }
    }
}

impl TreeConfig {
    /// Config with the given arity.
    pub fn with_arity(arity: usize) -> Self {
        Self { arity }
    }

    /// Validate that arity is at least 2.
    pub fn validate(&self) -> Result<()> {
        if self.arity < 2 {
            return Err(ArityMerkleError::InvalidArity { arity: self.arity });
        }
        Ok(())
    }
}
