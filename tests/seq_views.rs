//! End-to-end tests for the shared node-sequence views
//!
//! Drives the container the way the toolkit does: a builder produces the
//! node sequence once, analysis passes consume it in whichever
//! representation they were written against.

use arbor::ast::{ConstNodePtr, ConstNodeSeq, NodePtr, NodeSeq};

/// Minimal closed node set standing in for a parsed tree
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Ident(String),
    IntLiteral(i64),
    Block { statements: usize },
}

fn build_sequence() -> NodeSeq<Node> {
    vec![
        NodePtr::new(Node::Ident("total".into())),
        NodePtr::new(Node::IntLiteral(42)),
        NodePtr::new(Node::Block { statements: 2 }),
    ]
    .into()
}

/// A pass written against the slice-of-read-only-handles shape
fn count_idents(nodes: &[ConstNodePtr<Node>]) -> usize {
    nodes
        .iter()
        .filter_map(|ptr| ptr.borrow())
        .filter(|node| matches!(**node, Node::Ident(_)))
        .count()
}

/// A pass written against the wrapped read-only view shape
fn first_ident(seq: &ConstNodeSeq<Node>) -> Option<String> {
    seq.iter().find_map(|ptr| {
        let node = ptr.borrow()?;
        match &*node {
            Node::Ident(name) => Some(name.clone()),
            _ => None,
        }
    })
}

/// A pass generic over every representation of the sequence
fn non_null_count<S: AsRef<[ConstNodePtr<Node>]>>(seq: S) -> usize {
    seq.as_ref().iter().filter(|ptr| !ptr.is_null()).count()
}

#[test]
fn test_one_sequence_serves_every_consumer_shape() {
    let seq = build_sequence();

    // No element-wise conversion at any call site.
    assert_eq!(count_idents(seq.const_nodes()), 1);
    assert_eq!(first_ident(seq.as_const()), Some("total".to_string()));
    assert_eq!(non_null_count(&seq), 3);
    assert_eq!(non_null_count(seq.to_const()), 3);

    let block = seq.nodes()[2].borrow().unwrap();
    assert!(matches!(&*block, Node::Block { statements: 2 }));
}

#[test]
fn test_all_representations_observe_the_same_nodes() {
    let seq = build_sequence();
    let standalone = seq.to_const();

    assert_eq!(seq.len(), seq.const_nodes().len());
    assert_eq!(seq.len(), standalone.len());
    for i in 0..seq.len() {
        assert!(seq.nodes()[i] == seq.const_nodes()[i]);
        assert!(seq.nodes()[i] == standalone[i]);
    }
}

#[test]
fn test_annotation_pass_updates_shared_nodes() {
    let seq = build_sequence();
    // Read-only consumers that were handed the view before the annotation
    // pass ran still observe the same referents afterwards.
    let view = seq.to_const();

    for ptr in &seq {
        if let Some(mut node) = ptr.borrow_mut() {
            if let Node::IntLiteral(value) = &mut *node {
                *value *= 2;
            }
        }
    }

    let literal = view[1].borrow().unwrap();
    assert_eq!(*literal, Node::IntLiteral(84));
}

#[test]
fn test_empty_sequence_in_every_representation() {
    let seq = NodeSeq::<Node>::new();
    assert!(seq.nodes().is_empty());
    assert!(seq.const_nodes().is_empty());
    assert!(seq.to_const().is_empty());
    assert_eq!(count_idents(seq.const_nodes()), 0);
}

#[test]
fn test_null_and_duplicate_entries_survive_hand_off() {
    let shared = NodePtr::new(Node::IntLiteral(7));
    let seq = NodeSeq::from(vec![shared.clone(), NodePtr::null(), shared.clone()]);

    assert_eq!(seq.len(), 3);
    assert!(seq.const_nodes()[1].is_null());
    assert!(seq.const_nodes()[0].ptr_eq(&seq.const_nodes()[2]));
    assert_eq!(non_null_count(&seq), 2);

    // Mutation through one duplicate is visible through the other.
    *seq.nodes()[0].borrow_mut().unwrap() = Node::IntLiteral(8);
    let other = seq.const_nodes()[2].borrow().unwrap();
    assert_eq!(*other, Node::IntLiteral(8));
}

#[test]
fn test_nodes_released_when_last_view_drops() {
    let probe = NodePtr::new(Node::IntLiteral(1));
    let seq = NodeSeq::from(vec![probe.clone()]);
    let view = seq.to_const();

    drop(seq);
    assert!(probe.strong_count() > 1);

    drop(view);
    assert_eq!(probe.strong_count(), 1);
}
