//! Property tests over random item lists.

use proptest::prelude::*;

use crate::{Blake3Hash, Digest, HashFunction, MerkleTree, Sha256Hash, Side};

fn items_strategy(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9]{1,12}", 1..max_len)
}

proptest! {
    #[test]
    fn test_root_is_deterministic(items in items_strategy(40)) {
        let first = MerkleTree::<Blake3Hash>::from_items(items.clone()).unwrap();
        let second = MerkleTree::<Blake3Hash>::from_items(items).unwrap();
        prop_assert_eq!(first.root_digest(), second.root_digest());
    }

    #[test]
    fn test_every_proof_verifies(items in items_strategy(40)) {
        let tree = MerkleTree::<Blake3Hash>::from_items(items.clone()).unwrap();
        for (index, item) in items.iter().enumerate() {
            let proof = tree.prove_by_index(index).unwrap();
            prop_assert_eq!(proof.path.len(), tree.depth() - 1);
            prop_assert!(tree.verify(&proof));
            prop_assert!(tree.verify_item_against_proof(item.as_bytes(), &proof));
        }
    }

    #[test]
    fn test_add_keeps_old_indices_provable(items in items_strategy(30), extra in "[a-z]{1,8}") {
        let mut tree = MerkleTree::<Sha256Hash>::from_items(items.clone()).unwrap();
        let before = tree.leaf_count();
        tree.add(extra).unwrap();
        prop_assert_eq!(tree.leaf_count(), before + 1);
        for index in 0..before {
            let proof = tree.prove_by_index(index).unwrap();
            prop_assert_eq!(Some(&proof.root_digest), tree.root_digest());
            prop_assert!(tree.verify(&proof));
        }
    }

    #[test]
    fn test_bit_flip_in_path_breaks_proof(
        items in items_strategy(40),
        pick in any::<prop::sample::Index>(),
        step_pick in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        prop_assume!(items.len() > 1);
        let tree = MerkleTree::<Blake3Hash>::from_items(items.clone()).unwrap();
        let mut proof = tree.prove_by_index(pick.index(items.len())).unwrap();
        let step = step_pick.index(proof.path.len());
        let mut bytes = proof.path[step].digest.as_bytes().to_vec();
        bytes[0] ^= 1 << bit;
        proof.path[step].digest = Digest::new(bytes);
        prop_assert!(!tree.verify(&proof));
    }

    #[test]
    fn test_wrong_item_never_binds(items in items_strategy(20), other in "[a-z]{13,20}") {
        // `other` is longer than any generated item, so it is never in the tree.
        let tree = MerkleTree::<Blake3Hash>::from_items(items).unwrap();
        let proof = tree.prove_by_index(0).unwrap();
        prop_assert!(tree.verify(&proof));
        prop_assert!(!tree.verify_item_against_proof(other.as_bytes(), &proof));
    }
}

#[test]
fn test_independent_verifier_only_needs_proof_and_hash() {
    let tree = MerkleTree::<Sha256Hash>::from_items(["Block A", "Block B", "Block C", "Block D"])
        .unwrap();
    let proof = tree.prove_by_index(2).unwrap();
    drop(tree);

    let h = Sha256Hash;
    let mut computed = h.digest(b"Block C");
    for step in &proof.path {
        computed = match step.side {
            Side::Left => h.combine(&step.digest, &computed),
            Side::Right => h.combine(&computed, &step.digest),
        };
    }
    assert_eq!(computed, proof.root_digest);
    assert!(proof.verify(&h));
}
