//! Tests for prefix tree construction and the header table.
mod common;
use common::*;
use kyoki::prelude::*;
use kyoki::tree::ROOT;

#[test]
fn test_header_orders_by_descending_count_then_id() {
    // Counts: A2 B3 C2
    let set = named(&[&["A", "B"], &["B", "C"], &["A", "B", "C"]]);
    let tree = FpTree::build(set.transactions(), 1);

    let header = tree.header();
    assert_eq!(header.items(), &[id(&set, "B"), id(&set, "A"), id(&set, "C")]);
    assert_eq!(header.count(id(&set, "B")), Some(3));
    assert_eq!(header.rank(id(&set, "B")), Some(0));
    assert_eq!(header.rank(id(&set, "A")), Some(1));
    assert_eq!(header.rank(id(&set, "C")), Some(2));

    let ascending: Vec<ItemId> = header.items_ascending().collect();
    assert_eq!(ascending, vec![id(&set, "C"), id(&set, "A"), id(&set, "B")]);
}

#[test]
fn test_shared_prefixes_are_merged() {
    let set = named(&[&["A", "B"], &["B", "C"], &["A", "B", "C"]]);
    let tree = FpTree::build(set.transactions(), 1);
    let (a, b, c) = (id(&set, "A"), id(&set, "B"), id(&set, "C"));

    // root -> B(3) -> A(2) -> C(1)
    //              -> C(1)
    assert_eq!(tree.node_count(), 4);
    assert_eq!(tree.root().child_count(), 1);

    let b_node = tree.root().child(b).expect("B under root");
    assert_eq!(tree.node(b_node).map(FpNode::count), Some(3));

    let b_children = tree.node(b_node).expect("B node");
    let a_node = b_children.child(a).expect("A under B");
    let c_direct = b_children.child(c).expect("C under B");
    assert_eq!(tree.node(a_node).map(FpNode::count), Some(2));
    assert_eq!(tree.node(c_direct).map(FpNode::count), Some(1));

    let c_deep = tree.node(a_node).and_then(|n| n.child(c)).expect("C under A");
    assert_eq!(tree.node(c_deep).map(FpNode::count), Some(1));
    assert_eq!(tree.node(c_deep).and_then(FpNode::parent), Some(a_node));
    assert_eq!(tree.node(b_node).and_then(FpNode::parent), Some(ROOT));
}

#[test]
fn test_same_item_chain_links_every_occurrence() {
    let set = named(&[&["A", "B"], &["B", "C"], &["A", "B", "C"]]);
    let tree = FpTree::build(set.transactions(), 1);
    let c = id(&set, "C");

    let chain = tree.header().chain(c);
    assert_eq!(chain.len(), 2);
    for node in chain {
        assert_eq!(tree.node(*node).and_then(FpNode::item), Some(c));
    }
    let total: u64 = chain
        .iter()
        .filter_map(|node| tree.node(*node))
        .map(FpNode::count)
        .sum();
    assert_eq!(Some(total), tree.header().count(c));
}

#[test]
fn test_infrequent_items_are_pruned() {
    let set = create_pair_scenario();
    let tree = FpTree::build(set.transactions(), 3);

    assert_eq!(tree.header().len(), 2);
    assert!(!tree.header().contains(id(&set, "C")));
    assert!(tree.header().chain(id(&set, "C")).is_empty());
    // A(4) -> B(3) is all that is left.
    assert_eq!(tree.node_count(), 2);
    assert_eq!(tree.single_path().map(|path| path.len()), Some(2));
}

#[test]
fn test_empty_input_builds_empty_tree() {
    let tree = FpTree::build(&[], 1);
    assert!(tree.is_empty());
    assert!(tree.header().is_empty());
    assert_eq!(tree.node_count(), 0);
    assert_eq!(tree.single_path(), Some(vec![]));
    assert!(tree.root().is_root());
}

#[test]
fn test_threshold_above_every_count_builds_empty_tree() {
    let set = create_pair_scenario();
    let tree = FpTree::build(set.transactions(), 5);
    assert!(tree.is_empty());
    assert!(tree.header().is_empty());
}

#[test]
fn test_branching_tree_is_not_a_single_path() {
    let set = named(&[&["A", "B"], &["B", "C"], &["A", "B", "C"]]);
    let tree = FpTree::build(set.transactions(), 1);
    assert!(tree.single_path().is_none());
}

#[test]
fn test_prefix_path_excludes_the_node_itself() {
    let set = named(&[&["A", "B"], &["B", "C"], &["A", "B", "C"]]);
    let tree = FpTree::build(set.transactions(), 1);
    let (a, b, c) = (id(&set, "A"), id(&set, "B"), id(&set, "C"));

    let b_node = tree.root().child(b).expect("B under root");
    let a_node = tree.node(b_node).and_then(|n| n.child(a)).expect("A under B");
    let c_deep = tree.node(a_node).and_then(|n| n.child(c)).expect("C under A");

    assert_eq!(tree.prefix_path(c_deep), vec![b, a]);
    assert_eq!(tree.prefix_path(b_node), Vec::<ItemId>::new());
}

#[test]
fn test_conditional_pattern_base_and_tree() {
    let set = named(&[&["A", "B"], &["B", "C"], &["A", "B", "C"]]);
    let tree = FpTree::build(set.transactions(), 1);
    let (a, b, c) = (id(&set, "A"), id(&set, "B"), id(&set, "C"));

    let base = tree.conditional_pattern_base(c);
    assert_eq!(base, vec![(vec![b], 1), (vec![b, a], 1)]);

    // Under min_support 2 only B (weight 2) survives in C's conditional tree.
    let conditional = tree.conditional_tree(c, 2);
    assert_eq!(conditional.header().items(), &[b]);
    assert_eq!(conditional.header().count(b), Some(2));
    assert_eq!(conditional.node_count(), 1);

    let loose = tree.conditional_tree(c, 1);
    assert_eq!(loose.header().count(a), Some(1));
    assert_eq!(loose.node_count(), 2);

    // Items hanging directly off the root have an empty base.
    assert!(tree.conditional_pattern_base(b).is_empty());
}

#[test]
fn test_transaction_normalises_items() {
    let t = Transaction::new([ItemId(3), ItemId(1), ItemId(3), ItemId(2)]);
    assert_eq!(t.items(), &[ItemId(1), ItemId(2), ItemId(3)]);
    assert!(t.contains_all(&[ItemId(1), ItemId(3)]));
    assert!(!t.contains(ItemId(4)));
}
