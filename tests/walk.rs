//! End-to-end scenarios driving the public API: build, seed, walk, read
//! history, and audit the partition from outside the incremental machinery.

use std::collections::VecDeque;

use gerrywalk::{Error, GraphBuilder, History, PrecinctGraph, Sampler, ScoreWeights};

fn triangle_pair() -> PrecinctGraph {
    let mut builder = GraphBuilder::new(6, 2, None).unwrap();
    for _ in 0..6 {
        builder.add_precinct(0, 1, 1).unwrap();
    }
    for (u, v) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
        builder.add_edge(u, v).unwrap();
    }
    builder.finish_loading().unwrap()
}

fn grid(side: u32, num_districts: u32) -> PrecinctGraph {
    let n = (side * side) as usize;
    let mut builder = GraphBuilder::new(n, num_districts, None).unwrap();
    for v in 0..n as u32 {
        builder.add_precinct(v / side, v % 5, 7).unwrap();
    }
    for row in 0..side {
        for col in 0..side {
            let v = row * side + col;
            if col + 1 < side { builder.add_edge(v, v + 1).unwrap(); }
            if row + 1 < side { builder.add_edge(v, v + side).unwrap(); }
        }
    }
    builder.finish_loading().unwrap()
}

/// Connectivity check written against the public API only, independent of
/// the oracle used inside the sampler.
fn district_is_connected(graph: &PrecinctGraph, district: u32) -> bool {
    let members = graph.members(district);
    let Some(&start) = members.first() else { return true };

    let mut seen = vec![false; graph.num_precincts()];
    seen[start as usize] = true;
    let mut reached = 1;

    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        for w in graph.neighbors(u) {
            if !seen[w as usize] && graph.district_of(w) == Some(district) {
                seen[w as usize] = true;
                reached += 1;
                queue.push_back(w);
            }
        }
    }
    reached == members.len()
}

#[test]
fn split_triangle_scores_like_the_hand_computation() {
    let mut builder = GraphBuilder::new(3, 2, Some(6)).unwrap();
    for _ in 0..3 {
        builder.add_precinct(0, 1, 1).unwrap();
    }
    for (u, v) in [(0, 1), (1, 2), (0, 2)] {
        builder.add_edge(u, v).unwrap();
    }
    let mut graph = builder.finish_loading().unwrap();
    graph.set_districts(&[0, 0, 1]).unwrap();

    // District 0 sends two crossing half-edges out of two members (4/2);
    // district 1 sends two out of one member (4/1). Population deviations
    // cancel and both minority shares sit at exactly one half.
    let breakdown = ScoreWeights::new(1.0, 1.0, 1.0, 1.0).evaluate(&graph);
    assert_eq!(breakdown.compactness, 6.0);
    assert_eq!(breakdown.population, 0.0);
    assert_eq!(breakdown.border, 0.0);
    assert_eq!(breakdown.vra, 0.0);
    assert_eq!(breakdown.total, 6.0);
}

#[test]
fn path_of_four_only_offers_safe_moves() {
    let mut builder = GraphBuilder::new(4, 2, None).unwrap();
    for _ in 0..4 {
        builder.add_precinct(0, 0, 10).unwrap();
    }
    for (u, v) in [(0, 1), (1, 2), (2, 3)] {
        builder.add_edge(u, v).unwrap();
    }
    let mut graph = builder.finish_loading().unwrap();
    graph.set_districts(&[0, 0, 1, 1]).unwrap();

    // Exactly one crossing edge between the contiguous halves.
    assert_eq!(graph.crossing_edge_count(), 1);
    assert!(graph.is_crossing(1, 2));

    // Walking keeps both districts contiguous and non-empty no matter which
    // endpoint the sampler keeps picking.
    let mut sampler = Sampler::with_seed(&mut graph, 21);
    sampler.set_districts(&[0, 0, 1, 1]).unwrap();
    sampler.walk(10, ScoreWeights::new(0.0, 0.0, 0.0, 0.0)).unwrap();

    let graph = sampler.graph();
    for k in 0..2 {
        assert!(!graph.members(k).is_empty());
        assert!(district_is_connected(graph, k));
    }
}

#[test]
fn disjoint_triangles_cannot_walk() {
    let mut graph = triangle_pair();
    let mut sampler = Sampler::with_seed(&mut graph, 1);
    sampler.set_districts(&[0, 0, 0, 1, 1, 1]).unwrap();

    assert_eq!(sampler.graph().crossing_edge_count(), 0);
    assert_eq!(sampler.walk(1, ScoreWeights::default()).unwrap_err(), Error::NoCrossingEdges);
}

#[test]
fn disconnected_graphs_fail_seeding() {
    // One district cannot grow across a missing edge: precinct 2 is
    // unreachable from the component holding the seed.
    let mut builder = GraphBuilder::new(3, 1, None).unwrap();
    for _ in 0..3 {
        builder.add_precinct(0, 1, 1).unwrap();
    }
    builder.add_edge(0, 1).unwrap();
    let mut graph = builder.finish_loading().unwrap();

    let err = Sampler::with_seed(&mut graph, 0).seed().unwrap_err();
    assert_eq!(err, Error::SeedingFailed { num_districts: 1 });
}

#[test]
fn every_accepted_step_is_a_legal_partition() {
    let mut graph = grid(6, 4);
    let mut sampler = Sampler::with_seed(&mut graph, 2024);
    sampler.seed().unwrap();
    sampler.walk(40, ScoreWeights::new(1.0, 1.0, 0.0, 1.0)).unwrap();

    assert_eq!(sampler.history().len(), 40);

    // Replay each recorded assignment into a fresh graph and audit it.
    for entry in sampler.history().entries() {
        let mut fresh = grid(6, 4);
        fresh.set_districts(&entry.assignments).unwrap();
        for k in 0..4 {
            assert!(!fresh.members(k).is_empty());
            assert!(district_is_connected(&fresh, k));
        }
    }
}

#[test]
fn walks_are_reproducible_for_a_fixed_seed() {
    let weights = ScoreWeights::new(2.0, 1.0, 0.0, 0.5);
    let run = |seed| {
        let mut graph = grid(5, 3);
        let mut sampler = Sampler::with_seed(&mut graph, seed);
        sampler.seed().unwrap();
        sampler.walk(12, weights).unwrap();
        sampler.maps()
    };

    assert_eq!(run(99), run(99));
    assert_ne!(run(99), run(100));
}

#[test]
fn history_json_round_trips_exactly() {
    let mut graph = grid(4, 2);
    let mut sampler = Sampler::with_seed(&mut graph, 8);
    sampler.seed().unwrap();
    sampler.walk(6, ScoreWeights::default()).unwrap();

    let json = serde_json::to_string(sampler.history()).unwrap();
    let restored: History = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, sampler.history());

    let maps = restored.assignment_vectors().map(<[u32]>::to_vec).collect::<Vec<_>>();
    assert_eq!(maps, sampler.maps());
}

#[test]
fn graph_file_to_walk_pipeline() {
    let source = "\
        # 3x1 strip plus a stub\n\
        4 2 40\n\
        0 2 8\n\
        0 2 8\n\
        1 2 8\n\
        1 2 8\n\
        0 1\n\
        1 2\n\
        2 3\n";

    let mut graph = gerrywalk::io::read_graph(source.as_bytes()).unwrap();
    let mut sampler = Sampler::with_seed(&mut graph, 4);
    sampler.seed().unwrap();
    sampler.walk(3, ScoreWeights::new(0.0, 0.0, 0.0, 0.0)).unwrap();
    assert_eq!(sampler.history().len(), 3);
}
