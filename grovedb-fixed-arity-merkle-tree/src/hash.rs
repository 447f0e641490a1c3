use std::{fmt, marker::PhantomData};

use sha2::digest::{Digest, Output, typenum::Unsigned};

/// Hash capability the tree is generic over.
///
/// The tree never looks inside a digest: it only concatenates child digests
/// in left-to-right order and hashes the result, so any deterministic
/// mapping from bytes to a fixed-size digest works.
pub trait MerkleHasher: Clone + fmt::Debug + Send + Sync + 'static {
    /// Fixed-size output of the hash function.
    type Digest: AsRef<[u8]> + Clone + Eq + fmt::Debug + Send + Sync;

    /// Output length in bits.
    const DIGEST_BITS: usize;

    /// Output length in bytes, `ceil(DIGEST_BITS / 8)`.
    fn digest_size() -> usize {
        Self::DIGEST_BITS.div_ceil(8)
    }

    /// Hash an arbitrary byte sequence.
    fn hash(data: &[u8]) -> Self::Digest;

    /// Hash the concatenation of `children` in the order given.
    ///
    /// The buffer is `children.len() * digest_size()` bytes long. Swapping
    /// two children changes the result.
    fn hash_children(children: &[Self::Digest]) -> Self::Digest {
        let mut buffer = Vec::with_capacity(children.len() * Self::digest_size());
        for child in children {
            buffer.extend_from_slice(child.as_ref());
        }
        Self::hash(&buffer)
    }
}

/// Blake3, the hash used across GroveDB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    type Digest = [u8; 32];

    const DIGEST_BITS: usize = 256;

    fn hash(data: &[u8]) -> [u8; 32] {
        *blake3::hash(data).as_bytes()
    }

    fn hash_children(children: &[[u8; 32]]) -> [u8; 32] {
        // Streaming the children is byte-for-byte the same as hashing their
        // concatenation.
        let mut hasher = blake3::Hasher::new();
        for child in children {
            hasher.update(child);
        }
        *hasher.finalize().as_bytes()
    }
}

/// Adapter for any RustCrypto [`Digest`] implementation (SHA-2, MD5,
/// BLAKE2b, ...).
pub struct DigestHasher<D>(PhantomData<fn() -> D>);

/// SHA-256 through the RustCrypto adapter.
pub type Sha256Hasher = DigestHasher<sha2::Sha256>;

impl<D> Default for DigestHasher<D> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<D> Clone for DigestHasher<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for DigestHasher<D> {}

impl<D> fmt::Debug for DigestHasher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestHasher<{}>", std::any::type_name::<D>())
    }
}

impl<D: Digest + 'static> MerkleHasher for DigestHasher<D> {
    type Digest = Output<D>;

    const DIGEST_BITS: usize = <D::OutputSize as Unsigned>::USIZE * 8;

    fn hash(data: &[u8]) -> Output<D> {
        D::digest(data)
    }
}
