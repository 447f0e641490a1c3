#[cfg(test)]
mod proof_tests {
    use assert_matches::assert_matches;

    use crate::{
        ArityMerkleError, Blake3Hasher, DigestHasher, FixedArityMerkleTree, Sha256Hasher,
        proof::*,
    };

    type Md5Hasher = DigestHasher<md5::Md5>;

    fn leaves(count: u32) -> Vec<Vec<u8>> {
        (0..count).map(|i| format!("leaf-{}", i).into_bytes()).collect()
    }

    /// 27 leaves, arity 3 (rows of 27, 9, 3, 1).
    fn make_tree_ternary() -> (Vec<Vec<u8>>, FixedArityMerkleTree<Blake3Hasher>) {
        let leaves = leaves(27);
        let tree = FixedArityMerkleTree::build(&leaves, 3).expect("27 leaves, arity 3");
        (leaves, tree)
    }

    // ── PathProof ────────────────────────────────────────────────────

    #[test]
    fn test_path_proof_matches_hash_path() {
        let (_, tree) = make_tree_ternary();
        let proof = tree.prove(13).unwrap();
        assert_eq!(proof.leaf_index, 13);
        assert_eq!(proof.path, tree.hash_path(13).unwrap());
        assert_eq!(proof.path.len(), 4);
        assert_eq!(proof.root(), Some(tree.root()));
    }

    #[test]
    fn test_prove_out_of_range() {
        let (_, tree) = make_tree_ternary();
        assert_matches!(
            tree.prove(27),
            Err(ArityMerkleError::IndexOutOfRange {
                index: 27,
                bound: 27
            })
        );
    }

    #[test]
    fn test_path_proof_every_leaf() {
        let (leaves, tree) = make_tree_ternary();
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.prove(i).unwrap();
            assert!(proof.validate(&tree, leaf));
            assert!(!proof.validate(&tree, leaves[(i + 1) % leaves.len()].as_slice()));
        }
    }

    #[test]
    fn test_path_proof_from_other_tree_rejected() {
        let (leaves, tree) = make_tree_ternary();
        let mut other_leaves = leaves.clone();
        other_leaves[26] = b"different".to_vec();
        let other = FixedArityMerkleTree::<Blake3Hasher>::build(&other_leaves, 3).unwrap();

        // Leaf 0 is identical in both trees but its path ends at another root.
        let foreign = other.prove(0).unwrap();
        assert_eq!(foreign.path[0], tree.leaves()[0]);
        assert!(!foreign.validate(&tree, &leaves[0]));
        assert!(foreign.validate(&other, &leaves[0]));
    }

    #[test]
    fn test_path_proof_tampered_digest_rejected() {
        let (leaves, tree) = make_tree_ternary();
        let mut proof = tree.prove(5).unwrap();
        proof.path[2] = [0u8; 32];
        assert!(!proof.validate(&tree, &leaves[5]));
    }

    #[test]
    fn test_path_proof_wrong_length_rejected() {
        let (leaves, tree) = make_tree_ternary();
        let mut proof = tree.prove(5).unwrap();
        proof.path.pop();
        assert!(!proof.validate(&tree, &leaves[5]));

        let proof = PathProof::<Blake3Hasher>::new(5, Vec::new());
        assert!(!proof.validate(&tree, &leaves[5]));
        assert_eq!(proof.root(), None);
    }

    #[test]
    fn test_path_proof_index_swapped_rejected() {
        let (leaves, tree) = make_tree_ternary();
        let mut proof = tree.prove(5).unwrap();
        proof.leaf_index = 6;
        assert!(!proof.validate(&tree, &leaves[5]));
        assert!(!proof.validate(&tree, &leaves[6]));

        proof.leaf_index = 1000;
        assert!(!proof.validate(&tree, &leaves[5]));
    }

    // ── DetachedProof generation ─────────────────────────────────────

    #[test]
    fn test_detached_proof_structure() {
        let (leaves, tree) = make_tree_ternary();
        // 14 = 1*9 + 1*3 + 2, so slots are [2, 1, 1] from the leaves up.
        let proof = tree.prove_detached(14, &leaves[14]).unwrap();
        assert_eq!(proof.arity, 3);
        assert_eq!(proof.leaf_index, 14);
        assert_eq!(proof.leaf_value, leaves[14]);
        assert_eq!(proof.levels.len(), tree.row_count() - 1);
        let positions: Vec<usize> = proof.levels.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![2, 1, 1]);
        assert!(proof.levels.iter().all(|l| l.siblings.len() == 2));

        assert_eq!(proof.levels[0].siblings[0], tree.leaves()[12]);
        assert_eq!(proof.levels[0].siblings[1], tree.leaves()[13]);
    }

    #[test]
    fn test_detached_proof_wrong_value_not_produced() {
        let (leaves, tree) = make_tree_ternary();
        assert_matches!(
            tree.prove_detached(3, &leaves[4]),
            Err(ArityMerkleError::InvalidProof(_))
        );
        assert_matches!(
            tree.prove_detached(30, &leaves[4]),
            Err(ArityMerkleError::IndexOutOfRange { index: 30, .. })
        );
    }

    // ── DetachedProof verification ───────────────────────────────────

    #[test]
    fn test_detached_proof_every_leaf() {
        for arity in [2usize, 3, 4] {
            let leaves = leaves(arity.pow(3) as u32);
            let tree = FixedArityMerkleTree::<Sha256Hasher>::build(&leaves, arity).unwrap();
            for (i, leaf) in leaves.iter().enumerate() {
                let proof = tree.prove_detached(i, leaf).unwrap();
                proof
                    .verify(tree.root())
                    .expect("proof should verify against its own root");
                assert_eq!(&proof.verify_and_get_root().unwrap(), tree.root());
                assert!(proof.validate(leaf, tree.root()));
            }
        }
    }

    #[test]
    fn test_detached_proof_fixture_outcomes() {
        let leaves: Vec<[u8; 1]> = (b'0'..=b'7').map(|c| [c]).collect();
        let tree = FixedArityMerkleTree::<Md5Hasher>::build(&leaves, 2).unwrap();
        let proof = tree.prove_detached(0, leaves[0]).unwrap();
        assert!(proof.validate(leaves[0], tree.root()));
        assert!(!proof.validate(leaves[1], tree.root()));
        assert!(!proof.validate(b"message", tree.root()));
    }

    #[test]
    fn test_detached_proof_wrong_root() {
        let (leaves, tree) = make_tree_ternary();
        let proof = tree.prove_detached(0, &leaves[0]).unwrap();
        let err = proof.verify(&[0xAB; 32]).unwrap_err();
        assert_matches!(err, ArityMerkleError::InvalidProof(ref msg) if msg.starts_with("root hash mismatch"));
        assert!(!proof.validate(&leaves[0], &[0xAB; 32]));
    }

    #[test]
    fn test_detached_proof_tampered_value() {
        let (leaves, tree) = make_tree_ternary();
        let mut proof = tree.prove_detached(7, &leaves[7]).unwrap();
        proof.leaf_value = leaves[8].clone();
        assert!(proof.verify(tree.root()).is_err());
    }

    #[test]
    fn test_detached_proof_tampered_sibling() {
        let (leaves, tree) = make_tree_ternary();
        let mut proof = tree.prove_detached(7, &leaves[7]).unwrap();
        proof.levels[1].siblings[0][0] ^= 1;
        assert!(proof.verify(tree.root()).is_err());
    }

    #[test]
    fn test_detached_proof_swapped_siblings() {
        let (leaves, tree) = make_tree_ternary();
        let mut proof = tree.prove_detached(7, &leaves[7]).unwrap();
        proof.levels[2].siblings.swap(0, 1);
        assert!(proof.verify(tree.root()).is_err());
    }

    #[test]
    fn test_detached_proof_moved_slot_rejected() {
        let (leaves, tree) = make_tree_ternary();
        let mut proof = tree.prove_detached(7, &leaves[7]).unwrap();
        // 7 sits in slot 1 at the bottom level.
        assert_eq!(proof.levels[0].position, 1);
        proof.levels[0].position = 0;
        assert_matches!(
            proof.verify(tree.root()),
            Err(ArityMerkleError::InvalidProof(ref msg)) if msg.contains("slot")
        );

        // Moving the index along with the slot still hashes to another root.
        proof.leaf_index = 6;
        assert!(proof.verify(tree.root()).is_err());
    }

    #[test]
    fn test_detached_proof_malformed() {
        let (leaves, tree) = make_tree_ternary();
        let good = tree.prove_detached(7, &leaves[7]).unwrap();

        let mut proof = good.clone();
        proof.arity = 1;
        assert_matches!(proof.verify_and_get_root(), Err(ArityMerkleError::InvalidProof(_)));

        let mut proof = good.clone();
        proof.levels.clear();
        assert_matches!(proof.verify_and_get_root(), Err(ArityMerkleError::InvalidProof(_)));

        let mut proof = good.clone();
        proof.levels[1].siblings.pop();
        assert_matches!(proof.verify_and_get_root(), Err(ArityMerkleError::InvalidProof(_)));

        let mut proof = good.clone();
        proof.levels[0].position = 3;
        assert_matches!(proof.verify_and_get_root(), Err(ArityMerkleError::InvalidProof(_)));

        // 27 does not fit in three ternary levels.
        let mut proof = good.clone();
        proof.leaf_index = 27 + 7;
        assert_matches!(
            proof.verify_and_get_root(),
            Err(ArityMerkleError::InvalidProof(ref msg)) if msg.contains("does not fit")
        );

        let mut proof = good;
        proof.levels.pop();
        assert!(proof.verify(tree.root()).is_err());
    }

    #[test]
    fn test_detached_proof_from_parts() {
        let (leaves, tree) = make_tree_ternary();
        let proof = tree.prove_detached(25, &leaves[25]).unwrap();
        let rebuilt = DetachedProof::<Blake3Hasher>::new(
            proof.arity,
            proof.leaf_index,
            proof.leaf_value.clone(),
            proof.levels.clone(),
        );
        assert!(rebuilt.verify(tree.root()).is_ok());
        assert_eq!(
            rebuilt.levels[0],
            ProofLevel {
                position: 1,
                siblings: vec![tree.leaves()[24], tree.leaves()[26]],
            }
        );
    }
}
