/*!
# Min-Cost Max-Flow

Successive shortest augmenting paths. Every iteration runs Dijkstra on the residual network,
keyed by *reduced costs* `cost + pot(u) - pot(v)`, and pushes the bottleneck amount along the
cheapest path found. Afterwards the potentials of all reached vertices grow by their distance,
which keeps all reduced costs of residual arcs non-negative.

If the network starts with a residual arc of negative cost, the initial potentials come from a
Bellman-Ford pass over the residual network; otherwise they start at `0`.

A residual arc is
- *forward* along an edge with `capacity - flow > eps` and cost `cost`,
- *backward* against an edge with `flow > eps` and cost `-cost`.
*/

use tracing::{debug, trace};

use super::*;

/// Min-cost max-flow by successive shortest paths.
///
/// # Examples
/// ```
/// use dgraphs::{prelude::*, algo::*};
///
/// let mut graph = FlowNetwork::new(GraphConfig::multi());
/// graph.add_edge(FlowEdge::new('s', 'a', 2.0).with_cost(1.0));
/// graph.add_edge(FlowEdge::new('s', 'b', 1.0).with_cost(3.0));
/// graph.add_edge(FlowEdge::new('a', 't', 1.0).with_cost(1.0));
/// graph.add_edge(FlowEdge::new('b', 't', 2.0).with_cost(1.0));
/// graph.add_edge(FlowEdge::new('a', 'b', 1.0).with_cost(1.0));
///
/// let result = MinCostMaxFlow::new().run(&mut graph, &'s', &'t').unwrap();
/// assert_eq!(result.flow, 3.0);
/// assert_eq!(result.cost, 2.0 + 3.0 + 4.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MinCostMaxFlow {
    epsilon: Option<f64>,
    reset_flow: bool,
}

impl Default for MinCostMaxFlow {
    fn default() -> Self {
        Self {
            epsilon: None,
            reset_flow: true,
        }
    }
}

impl MinCostMaxFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tolerance used by this instance instead of [`flow_epsilon`].
    /// Non-positive or non-finite values are ignored.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        if epsilon > 0.0 && epsilon.is_finite() {
            self.epsilon = Some(epsilon);
        }
    }

    /// Sets the tolerance used by this instance instead of [`flow_epsilon`]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.set_epsilon(epsilon);
        self
    }

    /// If *true* (default), all flows are set to `0` before the computation.
    /// Otherwise the existing flows are augmented.
    pub fn set_reset_flow(&mut self, reset: bool) {
        self.reset_flow = reset;
    }

    /// See [`MinCostMaxFlow::set_reset_flow`]
    pub fn reset_flow(mut self, reset: bool) -> Self {
        self.set_reset_flow(reset);
        self
    }

    /// Pushes as much flow as possible from `source` to `sink` at minimum cost and stores the
    /// resulting flow in the edges of `graph`. The returned cost only accounts for the flow
    /// pushed by this call.
    ///
    /// # Errors
    /// - [`GraphError::UnknownVertex`] if `source` or `sink` is not in the graph,
    /// - [`GraphError::NegativeCapacity`] if any edge has a negative (or NaN) capacity.
    ///   The graph is left untouched in this case.
    #[tracing::instrument(level = "debug", skip_all, fields(source = ?source, sink = ?sink))]
    pub fn run<G>(&self, graph: &mut G, source: &G::Vertex, sink: &G::Vertex) -> Result<FlowResult>
    where
        G: EdgeAccessMut,
        G::Edge: FlowCarrying + Weighted,
    {
        let s = graph.id_of(source).ok_or_else(|| unknown_vertex(source))?;
        let t = graph.id_of(sink).ok_or_else(|| unknown_vertex(sink))?;

        let epsilon = self.epsilon.unwrap_or_else(flow_epsilon);
        let mut net = ResidualNetwork::new(graph, self.reset_flow, epsilon, |e| e.weight())?;
        let (s, t) = (net.vertex(s), net.vertex(t));

        let result = if s == t {
            FlowResult::default()
        } else {
            augment_cheapest_paths(&mut net, s, t)?
        };

        net.write_back(graph);
        debug!(flow = result.flow, cost = result.cost, "min-cost flow finished");
        Ok(result)
    }
}

/// Upper bound for the flow that can still leave `s`
fn source_capacity(net: &ResidualNetwork, s: usize) -> f64 {
    let forward: f64 = net.out[s]
        .iter()
        .map(|&e| net.residual(e))
        .filter(|&r| r > net.epsilon)
        .sum();
    let backward: f64 = net.inc[s]
        .iter()
        .map(|&e| net.flow[e])
        .filter(|&f| f > net.epsilon)
        .sum();
    forward + backward
}

/// Residual arcs leaving `u` as `(edge, forward, head, residual capacity, cost)`
fn residual_arcs(
    net: &ResidualNetwork,
    u: usize,
) -> impl Iterator<Item = (usize, bool, usize, f64, f64)> + '_ {
    let eps = net.epsilon;
    let forward = net.out[u]
        .iter()
        .map(|&e| (e, true, net.head[e], net.residual(e), net.cost[e]));
    let backward = net.inc[u]
        .iter()
        .map(|&e| (e, false, net.tail[e], net.flow[e], -net.cost[e]));
    forward.chain(backward).filter(move |arc| arc.3 > eps)
}

fn has_negative_arc(net: &ResidualNetwork) -> bool {
    (0..net.len()).any(|u| residual_arcs(net, u).any(|(.., cost)| cost < 0.0))
}

/// Shortest residual distances from `s` by Bellman-Ford; unreached vertices get `0`
fn initial_potentials(net: &ResidualNetwork, s: usize) -> Vec<f64> {
    let n = net.len();
    let mut potentials = vec![f64::INFINITY; n];
    potentials[s] = 0.0;

    for _ in 1..n {
        let mut changed = false;
        for u in 0..n {
            let du = potentials[u];
            if du == f64::INFINITY {
                continue;
            }
            for (_, _, v, _, cost) in residual_arcs(net, u) {
                if du + cost < potentials[v] {
                    potentials[v] = du + cost;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    for p in &mut potentials {
        if *p == f64::INFINITY {
            *p = 0.0;
        }
    }
    potentials
}

/// Cheapest residual path from `s` to `t` under reduced costs
struct Augmentation {
    distances: Vec<f64>,
    bottleneck: Vec<f64>,
    predecessors: Vec<Option<(usize, bool)>>,
}

fn cheapest_path(net: &ResidualNetwork, potentials: &[f64], s: usize) -> Result<Augmentation> {
    let n = net.len();
    let mut distances = vec![f64::INFINITY; n];
    let mut bottleneck = vec![0.0; n];
    let mut predecessors = vec![None; n];
    let mut handles: Vec<Option<HeapHandle>> = vec![None; n];
    let mut heap = FibonacciHeap::with_capacity(n);

    distances[s] = 0.0;
    bottleneck[s] = f64::INFINITY;
    handles[s] = Some(heap.enqueue(s, 0.0)?);

    while let Some(min) = heap.dequeue_min() {
        let u = min.value;
        for (e, forward, v, residual, cost) in residual_arcs(net, u) {
            // reduced costs are non-negative up to rounding
            let reduced = (cost + potentials[u] - potentials[v]).max(0.0);
            let candidate = distances[u] + reduced;
            if candidate < distances[v] {
                distances[v] = candidate;
                bottleneck[v] = bottleneck[u].min(residual);
                predecessors[v] = Some((e, forward));
                match handles[v] {
                    Some(handle) if !heap.is_dequeued(handle)? => {
                        heap.decrease_key(handle, candidate)?
                    }
                    _ => handles[v] = Some(heap.enqueue(v, candidate)?),
                }
            }
        }
    }

    Ok(Augmentation {
        distances,
        bottleneck,
        predecessors,
    })
}

fn augment_cheapest_paths(net: &mut ResidualNetwork, s: usize, t: usize) -> Result<FlowResult> {
    let target = source_capacity(net, s);
    let mut potentials = if has_negative_arc(net) {
        initial_potentials(net, s)
    } else {
        vec![0.0; net.len()]
    };

    let mut result = FlowResult::default();
    let mut iterations = 0usize;
    while target - result.flow > net.epsilon {
        let search = cheapest_path(net, &potentials, s)?;
        if search.distances[t] == f64::INFINITY {
            break;
        }

        for (p, &d) in potentials.iter_mut().zip(&search.distances) {
            if d < f64::INFINITY {
                *p += d;
            }
        }

        let delta = search.bottleneck[t].min(target - result.flow);
        if delta <= net.epsilon {
            break;
        }

        let mut v = t;
        while v != s {
            let Some((e, forward)) = search.predecessors[v] else {
                return Err(GraphError::InvariantViolation(format!(
                    "augmenting path broken at vertex {v}"
                )));
            };
            if forward {
                net.augment(e, delta);
                result.cost += delta * net.cost[e];
                v = net.tail[e];
            } else {
                net.augment(e, -delta);
                result.cost -= delta * net.cost[e];
                v = net.head[e];
            }
        }

        result.flow += delta;
        iterations += 1;
        trace!(iterations, delta, "augmented");
    }

    debug!(iterations, "successive shortest paths finished");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conserves_flow(graph: &FlowNetwork<u32>, s: u32, t: u32) -> bool {
        graph.vertices().all(|v| {
            let inflow: f64 = graph.edges_to(v).map(|(_, e)| e.flow()).sum();
            let outflow: f64 = graph.edges_from(v).map(|(_, e)| e.flow()).sum();
            *v == s || *v == t || (inflow - outflow).abs() < 1e-9
        })
    }

    fn network() -> FlowNetwork<u32> {
        FlowNetwork::from_edges(
            GraphConfig::multi(),
            [
                FlowEdge::new(0, 1, 4.0).with_cost(2.0),
                FlowEdge::new(0, 2, 2.0).with_cost(2.0),
                FlowEdge::new(1, 2, 2.0).with_cost(1.0),
                FlowEdge::new(1, 3, 3.0).with_cost(3.0),
                FlowEdge::new(2, 3, 5.0).with_cost(1.0),
            ],
        )
    }

    #[test]
    fn cheapest_maximum_flow() {
        let mut graph = network();
        let result = graph.min_cost_max_flow(&0, &3).unwrap();

        // 0-2-3 (2 units at 3), 0-1-2-3 (2 units at 4), 0-1-3 (2 units at 5)
        assert_eq!(result.flow, 6.0);
        assert_eq!(result.cost, 24.0);
        assert!(conserves_flow(&graph, 0, 3));
        assert!(graph.edges().all(|(_, e)| 0.0 <= e.flow() && e.flow() <= e.capacity()));

        let outflow: f64 = graph.edges_from(&0).map(|(_, e)| e.flow()).sum();
        let inflow: f64 = graph.edges_to(&3).map(|(_, e)| e.flow()).sum();
        assert_eq!(outflow, 6.0);
        assert_eq!(inflow, 6.0);
    }

    #[test]
    fn parallel_edges_prefer_the_cheaper() {
        let mut graph = FlowNetwork::from_edges(
            GraphConfig::multi(),
            [
                FlowEdge::new(0, 1, 1.0).with_cost(5.0),
                FlowEdge::new(0, 1, 1.0).with_cost(1.0),
                FlowEdge::new(1, 2, 1.0),
            ],
        );

        let result = graph.min_cost_max_flow(&0, &2).unwrap();
        assert_eq!(result, FlowResult { flow: 1.0, cost: 1.0 });
        let cheap = graph.edges_between(&0, &1).find(|(_, e)| e.cost() == 1.0).unwrap();
        assert_eq!(cheap.1.flow(), 1.0);
    }

    #[test]
    fn negative_costs_use_initial_potentials() {
        let mut graph = FlowNetwork::from_edges(
            GraphConfig::multi(),
            [
                FlowEdge::new(0, 1, 1.0).with_cost(1.0),
                FlowEdge::new(0, 2, 1.0).with_cost(4.0),
                FlowEdge::new(2, 1, 1.0).with_cost(-5.0),
                FlowEdge::new(1, 3, 1.0).with_cost(1.0),
                FlowEdge::new(2, 3, 1.0).with_cost(1.0),
            ],
        );

        let result = graph.min_cost_max_flow(&0, &3).unwrap();
        assert_eq!(result.flow, 2.0);
        // 0-2-1-3 (cost 0) followed by 0-1-2-3 cancelling the arc 2-1 (cost 7)
        assert_eq!(result.cost, 7.0);
        let back = graph.edges_between(&2, &1).next().unwrap();
        assert_eq!(back.1.flow(), 0.0);
        assert!(conserves_flow(&graph, 0, 3));
    }

    #[test]
    fn unreachable_sink_yields_zero() {
        let mut graph = network();
        graph.add_vertex(9);
        let result = graph.min_cost_max_flow(&0, &9).unwrap();
        assert_eq!(result, FlowResult::default());
        assert!(graph.edges().all(|(_, e)| e.flow() == 0.0));

        assert_eq!(graph.min_cost_max_flow(&0, &0).unwrap(), FlowResult::default());
        assert!(matches!(
            graph.min_cost_max_flow(&0, &42),
            Err(GraphError::UnknownVertex(_))
        ));
    }

    #[test]
    fn negative_capacity_leaves_graph_untouched() {
        let mut graph = network();
        graph.add_edge(FlowEdge::new(3, 4, -2.0));
        let result = graph.min_cost_max_flow(&0, &3);

        assert!(matches!(result, Err(GraphError::NegativeCapacity { .. })));
        assert!(graph.edges().all(|(_, e)| e.flow() == 0.0));
    }

    #[test]
    fn existing_flow_is_kept_or_reset() {
        let mut graph = network();
        graph.min_cost_max_flow(&0, &3).unwrap();

        let again = MinCostMaxFlow::new()
            .reset_flow(false)
            .run(&mut graph, &0, &3)
            .unwrap();
        assert_eq!(again.flow, 0.0);
        assert!(conserves_flow(&graph, 0, 3));

        let fresh = MinCostMaxFlow::new().epsilon(1e-6).run(&mut graph, &0, &3).unwrap();
        assert_eq!(fresh, FlowResult { flow: 6.0, cost: 24.0 });
    }
}
