use stepreel::{
    Edge, FrameOrdering, Graph, fingerprint_frames, bellman_ford, dijkstra, kahn, kosaraju,
    merge_sort, prim,
};

fn mixed_graph() -> Graph {
    Graph::new(
        vec![
            "V1".into(),
            "V2".into(),
            "V3".into(),
            "V4".into(),
            "V5".into(),
        ],
        vec![
            Edge::new("V1", "V2", 3),
            Edge::new("V2", "V3", 4),
            Edge::new("V3", "V1", 8),
            Edge::new("V2", "V4", 2),
            Edge::new("V4", "V5", 6),
            Edge::new("V1", "V5", 1),
        ],
    )
    .unwrap()
}

#[test]
fn graph_runners_are_bitwise_repeatable() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let g = mixed_graph();

    let d1 = dijkstra::run(&g, "V1").unwrap();
    let d2 = dijkstra::run(&g, "V1").unwrap();
    assert_eq!(
        fingerprint_frames(&d1).unwrap(),
        fingerprint_frames(&d2).unwrap()
    );

    let b1 = bellman_ford::run(&g, "V1").unwrap();
    let b2 = bellman_ford::run(&g, "V1").unwrap();
    assert_eq!(
        fingerprint_frames(&b1).unwrap(),
        fingerprint_frames(&b2).unwrap()
    );

    let p1 = prim::run(&g, "V1").unwrap();
    let p2 = prim::run(&g, "V1").unwrap();
    assert_eq!(
        fingerprint_frames(&p1).unwrap(),
        fingerprint_frames(&p2).unwrap()
    );

    let k1 = kosaraju::run(&g).unwrap();
    let k2 = kosaraju::run(&g).unwrap();
    assert_eq!(
        fingerprint_frames(&k1).unwrap(),
        fingerprint_frames(&k2).unwrap()
    );

    let t1 = kahn::run(&g).unwrap();
    let t2 = kahn::run(&g).unwrap();
    assert_eq!(
        fingerprint_frames(&t1).unwrap(),
        fingerprint_frames(&t2).unwrap()
    );
}

#[test]
fn merge_sort_is_repeatable_in_both_orderings() {
    let values = [12, 5, 7, 3, 9, 1, 5, 0];
    for ordering in [FrameOrdering::Dfs, FrameOrdering::Phase] {
        let a = merge_sort::run(&values, ordering).unwrap();
        let b = merge_sort::run(&values, ordering).unwrap();
        assert_eq!(
            fingerprint_frames(&a).unwrap(),
            fingerprint_frames(&b).unwrap()
        );
    }
}

#[test]
fn narrations_are_repeatable_word_for_word() {
    let g = mixed_graph();
    let a: Vec<String> = dijkstra::run(&g, "V2")
        .unwrap()
        .iter()
        .map(|f| f.description.clone())
        .collect();
    let b: Vec<String> = dijkstra::run(&g, "V2")
        .unwrap()
        .iter()
        .map(|f| f.description.clone())
        .collect();
    assert_eq!(a, b);
}

#[test]
fn fingerprint_distinguishes_different_sources() {
    let g = mixed_graph();
    let from_v1 = dijkstra::run(&g, "V1").unwrap();
    let from_v3 = dijkstra::run(&g, "V3").unwrap();
    assert_ne!(
        fingerprint_frames(&from_v1).unwrap(),
        fingerprint_frames(&from_v3).unwrap()
    );
}

#[test]
fn fingerprint_distinguishes_dfs_from_phase_ordering() {
    let values = [9, 4, 6, 2];
    let dfs = merge_sort::run(&values, FrameOrdering::Dfs).unwrap();
    let phased = merge_sort::run(&values, FrameOrdering::Phase).unwrap();
    assert_ne!(
        fingerprint_frames(&dfs).unwrap(),
        fingerprint_frames(&phased).unwrap()
    );
}
