use dgraphs::{algo::*, prelude::*};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Creates a flow network with at most `m_ub` random edges for vertices `0..n`
fn random_network<R: Rng>(rng: &mut R, n: u32, m_ub: u32) -> FlowNetwork<u32> {
    let mut graph = FlowNetwork::new(GraphConfig::multi());
    for u in 0..n {
        graph.add_vertex(u);
    }
    for _ in 0..m_ub {
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        let capacity = rng.random_range(0..20u32) as f64;
        let cost = rng.random_range(0..8u32) as f64;
        graph.add_edge(FlowEdge::new(u, v, capacity).with_cost(cost));
    }
    graph
}

/// Asserts `0 <= flow <= capacity` on every edge and conservation at every inner vertex.
/// Returns the net flow into `t`.
fn check_flow(graph: &FlowNetwork<u32>, s: u32, t: u32) -> f64 {
    for (_, e) in graph.edges() {
        assert!(0.0 <= e.flow() && e.flow() <= e.capacity(), "{e:?}");
    }

    let balance = |v: &u32| {
        let inflow: f64 = graph.edges_to(v).map(|(_, e)| e.flow()).sum();
        let outflow: f64 = graph.edges_from(v).map(|(_, e)| e.flow()).sum();
        inflow - outflow
    };
    for v in graph.vertices() {
        if *v != s && *v != t {
            assert!(balance(v).abs() < 1e-9);
        }
    }
    assert!((balance(&s) + balance(&t)).abs() < 1e-9);
    balance(&t)
}

#[test]
fn both_algorithms_compute_the_same_maximum_flow() {
    let rng = &mut Pcg64Mcg::seed_from_u64(3);

    for n in [2u32, 5, 10, 20] {
        for m_ub in [n, n * 3, n * 6] {
            for _ in 0..5 {
                let mut graph = random_network(rng, n, m_ub);
                let (s, t) = (0, n - 1);

                let value = graph.max_flow(&s, &t).unwrap();
                assert!((check_flow(&graph, s, t) - value).abs() < 1e-9);

                let result = graph.min_cost_max_flow(&s, &t).unwrap();
                assert!((check_flow(&graph, s, t) - result.flow).abs() < 1e-9);
                assert!((value - result.flow).abs() < 1e-9);

                let cost: f64 = graph.edges().map(|(_, e)| e.flow() * e.cost()).sum();
                assert!((cost - result.cost).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn source_cut_bounds_the_flow() {
    let rng = &mut Pcg64Mcg::seed_from_u64(5);

    for _ in 0..20 {
        let mut graph = random_network(rng, 8, 30);
        let leaving: f64 = graph
            .edges_from(&0)
            .filter(|(_, e)| *e.target() != 0)
            .map(|(_, e)| e.capacity())
            .sum();
        let entering: f64 = graph.edges_to(&7).map(|(_, e)| e.capacity()).sum();

        let value = graph.max_flow(&0, &7).unwrap();
        assert!(value <= leaving.min(entering) + 1e-9);
    }
}

#[test]
fn custom_epsilon_is_respected() {
    let mut graph = FlowNetwork::from_edges(
        GraphConfig::simple(),
        [FlowEdge::new(0, 1, 1e-7), FlowEdge::new(1, 2, 1.0)],
    );

    assert_eq!(PushRelabel::new().epsilon(1e-6).run(&mut graph, &0, &2), Ok(0.0));
    assert!(
        (PushRelabel::new().epsilon(1e-12).run(&mut graph, &0, &2).unwrap() - 1e-7).abs()
            < 1e-15
    );

    let result = MinCostMaxFlow::new().epsilon(1e-6).run(&mut graph, &0, &2).unwrap();
    assert_eq!(result.flow, 0.0);
}

/// Random arcs `(u, v, capacity, cost)` over `0..n` with integer costs in `min_cost..8`.
/// With negative costs, arcs only run from smaller to larger vertices so no cycle exists.
fn random_arcs<R: Rng>(rng: &mut R, n: u32, m_ub: u32, min_cost: i32) -> Vec<(u32, u32, f64, f64)> {
    (0..m_ub)
        .filter_map(|_| {
            let mut u = rng.random_range(0..n);
            let mut v = rng.random_range(0..n);
            if min_cost < 0 {
                if u == v {
                    return None;
                }
                if u > v {
                    std::mem::swap(&mut u, &mut v);
                }
            }
            let capacity = rng.random_range(0..20u32) as f64;
            let cost = rng.random_range(min_cost..8) as f64;
            Some((u, v, capacity, cost))
        })
        .collect()
}

/// Successive shortest paths with plain Bellman-Ford over the residual arcs.
/// Returns the value and the cost of a cheapest maximum flow.
fn cheapest_max_flow_by_relaxation(
    n: usize,
    arcs: &[(u32, u32, f64, f64)],
    s: usize,
    t: usize,
) -> (f64, f64) {
    let mut flow = vec![0.0; arcs.len()];
    let (mut value, mut total_cost) = (0.0, 0.0);

    loop {
        let mut dist = vec![f64::INFINITY; n];
        let mut pred: Vec<Option<(usize, bool)>> = vec![None; n];
        dist[s] = 0.0;

        for _ in 0..n {
            let mut changed = false;
            for (i, &(u, v, capacity, cost)) in arcs.iter().enumerate() {
                let (u, v) = (u as usize, v as usize);
                if capacity - flow[i] > 1e-9 && dist[u] + cost < dist[v] {
                    dist[v] = dist[u] + cost;
                    pred[v] = Some((i, true));
                    changed = true;
                }
                if flow[i] > 1e-9 && dist[v] - cost < dist[u] {
                    dist[u] = dist[v] - cost;
                    pred[u] = Some((i, false));
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        if dist[t].is_infinite() {
            return (value, total_cost);
        }

        let mut path = Vec::new();
        let mut bottleneck = f64::INFINITY;
        let mut v = t;
        while v != s {
            let (i, forward) = pred[v].unwrap();
            let (a, b, capacity, _) = arcs[i];
            if forward {
                bottleneck = bottleneck.min(capacity - flow[i]);
                v = a as usize;
            } else {
                bottleneck = bottleneck.min(flow[i]);
                v = b as usize;
            }
            path.push((i, forward));
        }

        for (i, forward) in path {
            if forward {
                flow[i] += bottleneck;
            } else {
                flow[i] -= bottleneck;
            }
        }
        value += bottleneck;
        total_cost += bottleneck * dist[t];
    }
}

#[test]
fn min_cost_flow_matches_relaxation_reference() {
    let rng = &mut Pcg64Mcg::seed_from_u64(7);

    for min_cost in [0, -5] {
        for n in [2u32, 5, 10, 15] {
            for m_ub in [n, n * 3, n * 6] {
                for _ in 0..10 {
                    let arcs = random_arcs(rng, n, m_ub, min_cost);
                    let mut graph = FlowNetwork::new(GraphConfig::multi());
                    for u in 0..n {
                        graph.add_vertex(u);
                    }
                    for &(u, v, capacity, cost) in &arcs {
                        graph.add_edge(FlowEdge::new(u, v, capacity).with_cost(cost));
                    }

                    let (value, cost) =
                        cheapest_max_flow_by_relaxation(n as usize, &arcs, 0, n as usize - 1);
                    let result = graph.min_cost_max_flow(&0, &(n - 1)).unwrap();

                    assert!((result.flow - value).abs() < 1e-9, "{result:?} vs {value}");
                    assert!((result.cost - cost).abs() < 1e-6, "{result:?} vs {cost}");
                    assert!((check_flow(&graph, 0, n - 1) - value).abs() < 1e-9);
                }
            }
        }
    }
}
