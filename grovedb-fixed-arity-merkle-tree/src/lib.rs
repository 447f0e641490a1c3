//! Fixed-arity Merkle tree with inclusion proofs.
//!
//! A perfect `arity`-ary tree built bottom-up over an ordered list of
//! leaves. Row 0 holds `H(leaf)`; every node above holds
//! `H(child_0 || child_1 || ... || child_{arity-1})`, children concatenated
//! left to right. All digests are stored in one row-major vector, so the
//! root is always the last node.
//!
//! The leaf count must be a power of the arity; nothing is padded.
//!
//! # Core types
//!
//! - [`FixedArityMerkleTree`] — build, root, children/parent lookups, hash
//!   paths.
//! - [`PathProof`] — leaf-to-root digests, validated against the tree.
//! - [`DetachedProof`] — sibling digests, verified against a trusted root.
//! - [`MerkleHasher`] — the hash capability, with [`Blake3Hasher`] and the
//!   RustCrypto [`DigestHasher`] adapter.

#![warn(missing_docs)]

mod config;
mod error;
pub(crate) mod hash;
/// Row-major index arithmetic.
pub mod layout;
pub(crate) mod proof;
pub(crate) mod tree;
mod verify;


pub use config::{DEFAULT_ARITY, TreeConfig};
pub use error::{ArityMerkleError, Result};
pub use hash::{Blake3Hasher, DigestHasher, MerkleHasher, Sha256Hasher};
pub use layout::RowLayout;
pub use proof::{DetachedProof, PathProof, ProofLevel};
pub use tree::FixedArityMerkleTree;
