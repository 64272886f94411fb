//! Known-topology regression tests.
//!
//! Each test feeds a hand-drawn line shape through the public pipeline and
//! checks the exact result, so a change in tie-breaking or shortcut handling
//! shows up here first.

use transitmap_graph::{
    DirectedGraph, Graph, MutableGraph, Path, SortError, TraversalOrder,
    calculate_tgt_decomposition, cast_to_path, cast_to_tree, dfs_by_key,
    split_into_connected_components, stitch, topological_sort, transitive_reduction,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn paths(sequences: &[&[&'static str]]) -> Vec<Path<&'static str>> {
    sequences
        .iter()
        .map(|seq| Path::new(seq.iter().copied()).expect("unique labels"))
        .collect()
}

fn sorted_edges(graph: &Graph<&'static str>) -> Vec<(&'static str, &'static str)> {
    let mut edges: Vec<_> = graph.edges().map(|(a, b)| (*a, *b)).collect();
    edges.sort_unstable();
    edges
}

fn order_of(graph: &Graph<&'static str>) -> Vec<&'static str> {
    topological_sort(graph)
        .expect("acyclic")
        .ordered_labels()
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Stitch → sort pipeline
// ---------------------------------------------------------------------------

#[test]
fn express_and_local_stitch_to_local_run() {
    let graph = stitch(&paths(&[&["b", "w", "c"], &["b", "c"]]));
    assert_eq!(sorted_edges(&graph), vec![("b", "w"), ("w", "c")]);

    let line = cast_to_path(&graph).expect("still a straight line");
    assert_eq!(line.vertices().copied().collect::<Vec<_>>(), vec!["b", "w", "c"]);
}

#[test]
fn branching_terminal_is_sortable_but_not_a_path() {
    let graph = stitch(&paths(&[&["a", "b", "c"], &["a", "b", "d"]]));
    assert_eq!(sorted_edges(&graph), vec![("a", "b"), ("b", "c"), ("b", "d")]);
    assert!(cast_to_path(&graph).is_none());
    assert_eq!(order_of(&graph), vec!["a", "b", "c", "d"]);
}

#[test]
fn loop_line_cannot_sort() {
    let graph = Graph::build([("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")], []);
    assert!(matches!(
        topological_sort(&graph),
        Err(SortError::CannotSort { remaining: 4, .. })
    ));
}

#[test]
fn short_turn_and_extension_merge_into_one_line() {
    // Full line, a short turn, and a trip that starts one stop early.
    let graph = stitch(&paths(&[
        &["s2", "s3", "s4", "s5"],
        &["s2", "s3"],
        &["s1", "s2", "s3", "s4"],
    ]));
    let line = cast_to_path(&graph).expect("one straight line");
    assert_eq!(
        line.vertices().copied().collect::<Vec<_>>(),
        vec!["s1", "s2", "s3", "s4", "s5"]
    );
}

#[test]
fn diverging_branches_keep_each_branch_contiguous() {
    let graph = stitch(&paths(&[
        &["a", "b", "c", "n1", "n2"],
        &["a", "b", "c", "s1", "s2"],
    ]));
    assert_eq!(order_of(&graph), vec!["a", "b", "c", "n1", "n2", "s1", "s2"]);
}

#[test]
fn unrelated_lines_sort_one_after_the_other() {
    let graph = stitch(&paths(&[&["a", "b", "c"], &["x", "y", "z"]]));
    assert_eq!(order_of(&graph), vec!["a", "b", "c", "x", "y", "z"]);
    assert_eq!(split_into_connected_components(&graph).len(), 2);
}

#[test]
fn feeder_seen_after_another_line_still_sorts_with_its_trunk() {
    let graph = stitch(&paths(&[&["s1", "m", "n"], &["x", "y"], &["s2", "m"]]));
    assert_eq!(order_of(&graph), vec!["s1", "s2", "m", "n", "x", "y"]);
}

// ---------------------------------------------------------------------------
// Structural operations
// ---------------------------------------------------------------------------

#[test]
fn fan_in_fan_out_decomposes_around_one_join() {
    let graph = Graph::build(
        [("n1", "j"), ("n2", "j"), ("j", "s1"), ("j", "s2")],
        [],
    );
    let tgt = calculate_tgt_decomposition(&graph);
    let leading = tgt.leading.expect("leading tree");
    let trailing = tgt.trailing.expect("trailing tree");

    assert!(tgt.middle.is_none());
    assert_eq!(leading.root().label(), trailing.root().label());
    assert_eq!(leading.node_count(), 3);
    assert_eq!(trailing.node_count(), 3);
    assert_eq!(sorted_edges(trailing.graph()), vec![("j", "s1"), ("j", "s2")]);
}

#[test]
fn reduction_then_tree_cast() {
    let graph = Graph::build([("r", "a"), ("r", "b"), ("a", "c"), ("r", "c")], []);
    assert!(cast_to_tree(&graph).is_none());
    let reduced = transitive_reduction(&graph);
    let tree = cast_to_tree(&reduced).expect("reduction leaves a tree");
    assert_eq!(*tree.root().label(), "r");
    let visited: Vec<_> = dfs_by_key(tree.root(), TraversalOrder::Pre, false, |l| *l)
        .into_iter()
        .map(|node| *node.label())
        .collect();
    assert_eq!(visited, vec!["r", "a", "c", "b"]);
}

#[test]
fn mutable_edits_then_freeze() {
    let mut graph = MutableGraph::new();
    graph.create_node("a").expect("new node");
    graph.create_node("b").expect("new node");
    graph.create_node("c").expect("new node");
    graph.create_edge(&"a", &"b").expect("both nodes exist");
    graph.create_edge(&"b", &"c").expect("both nodes exist");
    graph.create_edge(&"a", &"c").expect("both nodes exist");
    graph.delete_node(&"b").expect("b exists");

    let frozen = graph.freeze();
    assert_eq!(frozen, Graph::build([("a", "c")], []));
    assert_eq!(frozen.labels().len(), 2);
}

#[test]
fn reversal_is_shared_by_views() {
    let graph = Graph::build([("a", "b"), ("b", "c")], []);
    let reversed = graph.reversed();
    let line = cast_to_path(&reversed).expect("reversed line");
    assert_eq!(line.vertices().copied().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    // The original handle keeps its orientation.
    assert!(graph.contains_edge(&"a", &"b"));
    assert!(reversed.contains_edge(&"b", &"a"));
}
