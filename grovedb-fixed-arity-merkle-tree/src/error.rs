use thiserror::Error;

/// Alias for `core::result::Result<T, ArityMerkleError>`.
pub type Result<T> = core::result::Result<T, ArityMerkleError>;

/// Errors from fixed-arity Merkle tree operations.
///
/// Every variant is a precondition violation detected before any hashing or
/// indexing takes place. None of them are transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityMerkleError {
    #[error("arity must be at least 2, got {arity}")]
    InvalidArity { arity: usize },
    #[error("invalid leaf count {leaf_count} for arity {arity}: {reason}")]
    InvalidLeafCount {
        leaf_count: usize,
        arity: usize,
        reason: &'static str,
    },
    #[error("index {index} is out of range (bound {bound})")]
    IndexOutOfRange { index: usize, bound: usize },
    #[error("node {0} is a leaf and has no children")]
    LeafHasNoChildren(usize),
    #[error("node {0} is the root and has no parent")]
    RootHasNoParent(usize),
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
