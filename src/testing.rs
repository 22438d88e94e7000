/// Generates randomized agreement tests for the shortest-path algorithms.
///
/// Every listed algorithm is compared against a naive relaxation-until-fixpoint reference on
/// random multigraphs over `0..n` with integer weights in `$min_weight..10`. If `$min_weight`
/// is negative, edges only run from smaller to larger vertices so no cycle exists.
macro_rules! test_shortest_paths {
    ($env:ident, $min_weight:literal, ($($algo:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{algo::*, testing::test_shortest_paths};
            use fxhash::FxHashMap;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            /// Creates a graph with at most `m_ub` random edges for vertices `0..n`
            fn random_graph<R: Rng>(rng: &mut R, n: u32, m_ub: u32) -> WeightedGraph<u32> {
                let mut graph = WeightedGraph::new(GraphConfig::multi());
                for u in 0..n {
                    graph.add_vertex(u);
                }

                for _ in 0..m_ub {
                    let mut u = rng.random_range(0..n);
                    let mut v = rng.random_range(0..n);
                    if $min_weight < 0 && u > v {
                        std::mem::swap(&mut u, &mut v);
                    }
                    let w = rng.random_range($min_weight..10i32) as f64;
                    graph.add_edge(WeightedEdge::new(u, v, w));
                }

                graph
            }

            /// Distances from `s` by relaxing all edges until nothing changes
            fn reference(graph: &WeightedGraph<u32>, s: u32) -> FxHashMap<u32, f64> {
                let mut distances: FxHashMap<u32, f64> =
                    graph.vertices().map(|&v| (v, f64::INFINITY)).collect();
                distances.insert(s, 0.0);

                let mut changed = true;
                while changed {
                    changed = false;
                    for (_, e) in graph.edges() {
                        let du = distances[e.source()];
                        if du + e.weight() < distances[e.target()] {
                            distances.insert(*e.target(), du + e.weight());
                            changed = true;
                        }
                    }
                }

                distances
            }

            /// Checks that `path` is a real path of `graph` whose weight matches `expected`
            fn check_path(graph: &WeightedGraph<u32>, path: &WeightedPath<u32>, expected: f64) {
                assert_eq!(path.distance(), expected);
                if !path.is_reachable() {
                    assert!(path.is_empty());
                    return;
                }

                let mut weight = 0.0;
                for (i, &e) in path.edges().iter().enumerate() {
                    let (u, v) = graph.endpoints(e).unwrap();
                    assert_eq!(*u, path.vertices()[i]);
                    assert_eq!(*v, path.vertices()[i + 1]);
                    weight += graph.edge(e).unwrap().weight();
                }
                assert_eq!(weight, expected);
            }

            /// Runs `check` for every source on a series of random graphs
            fn for_random_graphs<F>(mut check: F)
            where
                F: FnMut(&WeightedGraph<u32>, u32, &FxHashMap<u32, f64>),
            {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);

                for n in [5u32, 10, 20] {
                    for m_ub in [n, n * 3, n * 6] {
                        for _ in 0..3 {
                            let graph = random_graph(rng, n, m_ub);
                            for s in 0..n {
                                check(&graph, s, &reference(&graph, s));
                            }
                        }
                    }
                }
            }

            $(
                test_shortest_paths!(@algo $algo);
            )*
        }
    };
    (@algo Dijkstra) => {
        #[test]
        fn dijkstra_matches_reference() {
            for_random_graphs(|graph, s, expected| {
                let paths = Dijkstra::new().run_from(graph, &s).unwrap();
                for (t, &d) in expected {
                    check_path(graph, &paths[t], d);
                    match graph.dijkstra(&s, t).unwrap() {
                        Some(path) => check_path(graph, &path, d),
                        None => assert_eq!(d, f64::INFINITY),
                    }
                }
            });
        }
    };
    (@algo BellmanFord) => {
        #[test]
        fn bellman_ford_matches_reference() {
            for_random_graphs(|graph, s, expected| {
                let paths = graph.bellman_ford(&s).unwrap();
                assert_eq!(paths.len(), expected.len());
                for (t, &d) in expected {
                    check_path(graph, &paths[t], d);
                }
            });
        }
    };
    (@algo FloydWarshall) => {
        #[test]
        fn floyd_warshall_matches_reference() {
            let mut cached: Option<AllPairs<u32>> = None;
            for_random_graphs(|graph, s, expected| {
                if s == 0 {
                    cached = Some(graph.floyd_warshall().unwrap());
                }
                let Some(all_pairs) = &cached else {
                    panic!("sources start at 0");
                };
                for (t, &d) in expected {
                    check_path(graph, &all_pairs[&s][t], d);
                }
            });
        }
    };
    (@algo Johnson) => {
        #[test]
        fn johnson_matches_reference() {
            let mut cached: Option<AllPairs<u32>> = None;
            for_random_graphs(|graph, s, expected| {
                if s == 0 {
                    cached = Some(graph.johnson().unwrap());
                }
                let Some(all_pairs) = &cached else {
                    panic!("sources start at 0");
                };
                for (t, &d) in expected {
                    check_path(graph, &all_pairs[&s][t], d);
                }
            });
        }
    };
}

pub(crate) use test_shortest_paths;
