use assert_matches::assert_matches;

use crate::{
    Blake3Hash, Digest, HashFunction, MerkleTree, MerkleTreeError, Node, NodePosition,
    RollingHash, Sha256Hash,
};

fn sha_tree(items: &[&str]) -> MerkleTree<Sha256Hash> {
    MerkleTree::from_items_with_hasher(items.iter().copied(), Sha256Hash).expect("build tree")
}

// ── construction ─────────────────────────────────────────────────────

#[test]
fn test_new_tree_is_empty_without_root() {
    let tree: MerkleTree = MerkleTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.leaf_count(), 0);
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.root_digest(), None);
    assert!(tree.levels().is_empty());
}

#[test]
fn test_from_items_rejects_empty_list() {
    let result = MerkleTree::<Blake3Hash>::from_items(Vec::<Vec<u8>>::new());
    assert_matches!(result, Err(MerkleTreeError::InvalidInput(_)));
}

#[test]
fn test_four_leaves_sha256_root_vector() {
    let tree = sha_tree(&["Transaction 1", "Transaction 2", "Transaction 3", "Transaction 4"]);
    assert_eq!(tree.leaf_count(), 4);
    assert_eq!(tree.depth(), 3);
    assert_eq!(
        tree.root_digest().expect("root").to_hex(),
        "fdf76ad58a4424e78b8a87bfcc90caa0c1299e9fd99d10f40588a838194b661f"
    );
}

#[test]
fn test_file_listing_sha256_root_vector() {
    let tree = sha_tree(&["config.json", "index.html", "main.js", "style.css"]);
    assert_eq!(
        tree.root_digest().expect("root").to_hex(),
        "49a43aadbca51e06c3a84ed4ccd8f4dd48f26020f8be1295ff308757dae0dae2"
    );
}

#[test]
fn test_odd_count_duplicates_last_node() {
    let h = Sha256Hash;
    let tree = sha_tree(&["A", "B", "C"]);

    let (a, b, c) = (h.digest(b"A"), h.digest(b"B"), h.digest(b"C"));
    let expected = h.combine(&h.combine(&a, &b), &h.combine(&c, &c));
    assert_eq!(tree.root_digest(), Some(&expected));
    assert_eq!(
        expected.to_hex(),
        "420940ee1c7a73de80cfa2554efb4e6cec7ea745fed73108ccb06886054df8c6"
    );
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.level(1).map(<[Digest]>::len), Some(2));
}

#[test]
fn test_rolling_hash_levels_vector() {
    let tree = MerkleTree::from_items_with_hasher(["T1", "T2", "T3", "T4"], RollingHash)
        .expect("build tree");
    let levels: Vec<Vec<String>> = tree
        .levels()
        .iter()
        .map(|level| level.iter().map(Digest::to_hex).collect())
        .collect();
    assert_eq!(
        levels,
        vec![
            vec!["00000a5d", "00000a5e", "00000a5f", "00000a60"],
            vec!["162f01a7", "164b30ab"],
            vec!["ae900a0f"],
        ]
    );
}

#[test]
fn test_single_leaf_root_is_leaf_digest() {
    let tree = MerkleTree::<Blake3Hash>::from_items(["A"]).expect("build tree");
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.root_digest(), Some(&Blake3Hash.digest(b"A")));
}

#[test]
fn test_build_is_deterministic() {
    let items = ["x", "y", "z", "w", "v"];
    let first = MerkleTree::<Blake3Hash>::from_items(items).expect("first");
    let second = MerkleTree::<Blake3Hash>::from_items(items).expect("second");
    assert_eq!(first.root_digest(), second.root_digest());
    assert_eq!(first.levels(), second.levels());
}

#[test]
fn test_depth_by_leaf_count() {
    for (count, expected_depth) in [(1, 1), (2, 2), (3, 3), (4, 3), (5, 4), (8, 4), (9, 5)] {
        let items: Vec<String> = (0..count).map(|i| format!("item-{}", i)).collect();
        let tree = MerkleTree::<Blake3Hash>::from_items(items).expect("build tree");
        assert_eq!(tree.depth(), expected_depth, "leaf count {}", count);
        let lens: Vec<usize> = tree.levels().iter().map(Vec::len).collect();
        for pair in lens.windows(2) {
            assert_eq!(pair[1], pair[0].div_ceil(2));
        }
        assert_eq!(lens.last(), Some(&1));
    }
}

// ── mutation ─────────────────────────────────────────────────────────

#[test]
fn test_add_to_empty_tree() {
    let mut tree: MerkleTree = MerkleTree::new();
    tree.add("first").expect("add");
    assert_eq!(tree.leaf_count(), 1);
    assert_eq!(tree.root_digest(), Some(&Blake3Hash.digest(b"first")));
}

#[test]
fn test_add_matches_full_build() {
    let mut tree = sha_tree(&["a", "b", "c"]);
    tree.add("d").expect("add");
    let rebuilt = sha_tree(&["a", "b", "c", "d"]);
    assert_eq!(tree.root_digest(), rebuilt.root_digest());
    assert_eq!(tree.leaf_count(), 4);
}

#[test]
fn test_add_rejects_blank_and_keeps_state() {
    let mut tree = sha_tree(&["a", "b"]);
    let root = tree.root_digest().cloned();
    assert_matches!(tree.add(""), Err(MerkleTreeError::InvalidInput(_)));
    assert_matches!(tree.add(" \t\n"), Err(MerkleTreeError::InvalidInput(_)));
    assert_eq!(tree.leaf_count(), 2);
    assert_eq!(tree.root_digest().cloned(), root);
}

#[test]
fn test_rebuild_replaces_items() {
    let mut tree = sha_tree(&["Version 1.0", "Version 1.1"]);
    assert_eq!(
        tree.root_digest().expect("root").short_hex(8),
        "7620ea4cbb1c034d"
    );

    tree.rebuild(["Version 2.0", "Version 2.1", "Version 2.2"])
        .expect("rebuild");
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(
        tree.root_digest().expect("root").short_hex(8),
        "278d301eaebac879"
    );
    assert!(tree.contains_item(b"Version 2.2"));
    assert!(!tree.contains_item(b"Version 1.0"));
}

#[test]
fn test_rebuild_rejects_empty_or_blank_and_keeps_state() {
    let mut tree = sha_tree(&["a", "b", "c"]);
    let before = tree.clone();

    assert_matches!(
        tree.rebuild(Vec::<&str>::new()),
        Err(MerkleTreeError::InvalidInput(_))
    );
    assert_matches!(tree.rebuild(["x", ""]), Err(MerkleTreeError::InvalidInput(_)));
    assert_matches!(tree.rebuild(["x", "   "]), Err(MerkleTreeError::InvalidInput(_)));

    assert_eq!(tree.items(), before.items());
    assert_eq!(tree.levels(), before.levels());
}

#[test]
fn test_duplicate_items_are_distinct_leaves() {
    let tree = sha_tree(&["dup", "other", "dup"]);
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.index_of_item(b"dup"), Some(0));
    let first = tree.leaf_at(0).expect("leaf 0");
    let last = tree.leaf_at(2).expect("leaf 2");
    assert_eq!(first.digest, last.digest);
    assert_ne!(first.index, last.index);
}

// ── queries ──────────────────────────────────────────────────────────

#[test]
fn test_leaf_at_bounds() {
    let tree = sha_tree(&["a", "b", "c"]);
    let leaf = tree.leaf_at(1).expect("leaf 1");
    assert_eq!(leaf.index, 1);
    assert_eq!(leaf.item, b"b");
    assert_eq!(leaf.digest, &Sha256Hash.digest(b"b"));

    assert_matches!(
        tree.leaf_at(3),
        Err(MerkleTreeError::IndexOutOfRange {
            index: 3,
            leaf_count: 3
        })
    );
}

#[test]
fn test_contains_and_index_of_item() {
    let tree = sha_tree(&["Contract v1.0", "Invoice #123", "Receipt #456"]);
    assert!(tree.contains_item(b"Invoice #123"));
    assert!(!tree.contains_item(b"Invoice #124"));
    assert_eq!(tree.index_of_item(b"Receipt #456"), Some(2));
    assert_eq!(tree.index_of_item(b"missing"), None);
}

#[test]
fn test_leaves_iterator_follows_item_order() {
    let tree = sha_tree(&["a", "b", "c"]);
    let items: Vec<&[u8]> = tree.leaves().map(|leaf| leaf.item).collect();
    assert_eq!(items, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
}

#[test]
fn test_node_at_links_children_arithmetically() {
    let tree = sha_tree(&["a", "b", "c"]);

    match tree.node_at(NodePosition::new(1, 1)).expect("node") {
        Node::Internal {
            left, right, digest, ..
        } => {
            assert_eq!(left, NodePosition::leaf(2));
            assert_eq!(right, NodePosition::leaf(2));
            let c = Sha256Hash.digest(b"c");
            assert_eq!(digest, &Sha256Hash.combine(&c, &c));
        }
        other => panic!("expected internal node, got {:?}", other),
    }

    let leaf = tree.node_at(NodePosition::leaf(0)).expect("leaf");
    assert!(leaf.is_leaf());
    assert_eq!(tree.node_at(NodePosition::new(3, 0)), None);
    assert_eq!(tree.node_at(NodePosition::new(1, 2)), None);
}

#[test]
fn test_path_to_root() {
    let tree = sha_tree(&["a", "b", "c", "d", "e"]);
    let path = tree.path_to_root(4).expect("path");
    assert_eq!(
        path,
        vec![
            NodePosition::new(0, 4),
            NodePosition::new(1, 2),
            NodePosition::new(2, 1),
            NodePosition::new(3, 0),
        ]
    );
    let root = tree.node_at(*path.last().expect("root")).expect("root node");
    assert_eq!(Some(root.digest()), tree.root_digest());
    assert_matches!(
        tree.path_to_root(5),
        Err(MerkleTreeError::IndexOutOfRange { .. })
    );
}

// ── summary ──────────────────────────────────────────────────────────

#[test]
fn test_summary_exposes_every_level() {
    let tree = sha_tree(&["A", "B", "C"]);
    let summary = tree.summary();

    assert_eq!(summary.leaf_count, 3);
    assert_eq!(summary.depth, 3);
    assert_eq!(summary.root_digest.as_ref(), tree.root_digest());
    assert_eq!(summary.leaves.len(), 3);
    assert_eq!(summary.leaves[2].item, b"C".to_vec());

    let level_lens: Vec<usize> = summary.levels.iter().map(Vec::len).collect();
    assert_eq!(level_lens, vec![3, 2, 1]);

    let leaf_node = &summary.levels[0][1];
    assert!(leaf_node.is_leaf);
    assert_eq!(leaf_node.item.as_deref(), Some(&b"B"[..]));
    assert_eq!(leaf_node.position, 1);

    let internal = &summary.levels[1][1];
    assert!(!internal.is_leaf);
    assert_eq!(internal.item, None);
    assert_eq!(Some(&internal.digest), tree.level(1).and_then(|l| l.get(1)));
}

#[test]
fn test_summary_of_empty_tree() {
    let tree: MerkleTree = MerkleTree::new();
    let summary = tree.summary();
    assert_eq!(summary.root_digest, None);
    assert_eq!(summary.depth, 0);
    assert!(summary.leaves.is_empty());
    assert!(summary.levels.is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn test_summary_serializes_as_text_and_hex() {
    let tree = sha_tree(&["A", "B"]);
    let json = serde_json::to_value(tree.summary()).expect("serialize");
    assert_eq!(json["leaf_count"], 2);
    assert_eq!(json["leaves"][0]["item"], "A");
    assert_eq!(
        json["leaves"][0]["digest"],
        "559aead08264d5795d3909718cdd05abd49572e84fe55590eef31a88a08fdffd"
    );
    assert_eq!(json["levels"][1][0]["item"], serde_json::Value::Null);
}

#[cfg(feature = "serde")]
#[test]
fn test_summary_keeps_binary_items_distinct() {
    let tree = MerkleTree::from_items_with_hasher([vec![0xffu8], vec![0xfe]], Blake3Hash)
        .expect("build tree");
    let json = serde_json::to_value(tree.summary()).expect("serialize");
    assert_eq!(json["leaves"][0]["item"], serde_json::json!({ "hex": "ff" }));
    assert_eq!(json["leaves"][1]["item"], serde_json::json!({ "hex": "fe" }));
    assert_ne!(json["leaves"][0]["item"], json["leaves"][1]["item"]);
    assert_eq!(json["levels"][0][1]["item"], serde_json::json!({ "hex": "fe" }));
}
