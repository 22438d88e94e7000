/*!
# Push-Relabel

Maximum flow by the generic push-relabel method. The source starts at height `|V|` with all of
its residual arcs saturated; every other vertex starts at height `0`. Vertices with positive
excess (except source and sink) are processed in rounds: excess is pushed along residual arcs
to strictly lower neighbours, and a vertex that cannot push anything is lifted to one above
its lowest residual neighbour.

Residual arcs follow the same rules as in [`MinCostMaxFlow`]: forward while
`capacity - flow > eps`, backward while `flow > eps`.
*/

use tracing::{debug, warn};

use super::*;

/// Push-relabel maximum flow.
///
/// # Examples
/// ```
/// use dgraphs::{prelude::*, algo::*};
///
/// let mut graph = FlowNetwork::from_edges(
///     GraphConfig::multi(),
///     [
///         FlowEdge::new(0, 1, 3.0),
///         FlowEdge::new(0, 2, 2.0),
///         FlowEdge::new(1, 2, 5.0),
///         FlowEdge::new(1, 3, 2.0),
///         FlowEdge::new(2, 3, 3.0),
///     ],
/// );
///
/// assert_eq!(PushRelabel::new().run(&mut graph, &0, &3).unwrap(), 5.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PushRelabel {
    epsilon: Option<f64>,
    reset_flow: bool,
}

impl Default for PushRelabel {
    fn default() -> Self {
        Self {
            epsilon: None,
            reset_flow: true,
        }
    }
}

impl PushRelabel {
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
    /// Otherwise the existing flows form the initial preflow.
    pub fn set_reset_flow(&mut self, reset: bool) {
        self.reset_flow = reset;
    }

    /// See [`PushRelabel::set_reset_flow`]
    pub fn reset_flow(mut self, reset: bool) -> Self {
        self.set_reset_flow(reset);
        self
    }

    /// Computes a maximum flow from `source` to `sink`, stores it in the edges of `graph` and
    /// returns the net flow arriving at `sink`.
    ///
    /// # Errors
    /// - [`GraphError::UnknownVertex`] if `source` or `sink` is not in the graph,
    /// - [`GraphError::NegativeCapacity`] if any edge has a negative (or NaN) capacity.
    ///   The graph is left untouched in this case.
    #[tracing::instrument(level = "debug", skip_all, fields(source = ?source, sink = ?sink))]
    pub fn run<G>(&self, graph: &mut G, source: &G::Vertex, sink: &G::Vertex) -> Result<f64>
    where
        G: EdgeAccessMut,
        G::Edge: FlowCarrying,
    {
        let s = graph.id_of(source).ok_or_else(|| unknown_vertex(source))?;
        let t = graph.id_of(sink).ok_or_else(|| unknown_vertex(sink))?;

        let epsilon = self.epsilon.unwrap_or_else(flow_epsilon);
        let mut net = ResidualNetwork::new(graph, self.reset_flow, epsilon, |_| 0.0)?;
        let (s, t) = (net.vertex(s), net.vertex(t));
        if s == t {
            net.write_back(graph);
            return Ok(0.0);
        }

        let value = push_relabel(&mut net, s, t);
        net.write_back(graph);
        debug!(flow = value, "push-relabel finished");
        Ok(value)
    }
}

fn push_relabel(net: &mut ResidualNetwork, s: usize, t: usize) -> f64 {
    let n = net.len();
    let eps = net.epsilon;

    let mut height = vec![0usize; n];
    height[s] = n;
    let mut excess: Vec<f64> = (0..n).map(|u| net.excess(u)).collect();

    // saturate every residual arc leaving the source
    for i in 0..net.out[s].len() {
        let e = net.out[s][i];
        let delta = net.residual(e);
        if delta > eps {
            net.augment(e, delta);
            excess[net.head[e]] += delta;
            excess[s] -= delta;
        }
    }
    for i in 0..net.inc[s].len() {
        let e = net.inc[s][i];
        let delta = net.flow[e];
        if delta > eps {
            net.augment(e, -delta);
            excess[net.tail[e]] += delta;
            excess[s] -= delta;
        }
    }

    let mut queued = VertexBitSet::new(n as NumVertices);
    let mut active = Vec::new();
    for u in 0..n {
        if u != s && u != t && excess[u] > eps {
            queued.set_bit(u as VertexId);
            active.push(u);
        }
    }

    let mut rounds = 0usize;
    let mut relabels = 0usize;
    while !active.is_empty() {
        rounds += 1;
        let mut next = Vec::new();

        for u in std::mem::take(&mut active) {
            queued.clear_bit(u as VertexId);
            let mut pushed = false;

            for i in 0..net.out[u].len() {
                if excess[u] <= eps {
                    break;
                }
                let e = net.out[u][i];
                let v = net.head[e];
                let residual = net.residual(e);
                if residual > eps && height[u] > height[v] {
                    let delta = excess[u].min(residual);
                    net.augment(e, delta);
                    excess[u] -= delta;
                    excess[v] += delta;
                    pushed = true;
                    if v != s && v != t && excess[v] > eps && !queued.set_bit(v as VertexId) {
                        next.push(v);
                    }
                }
            }

            for i in 0..net.inc[u].len() {
                if excess[u] <= eps {
                    break;
                }
                let e = net.inc[u][i];
                let v = net.tail[e];
                let residual = net.flow[e];
                if residual > eps && height[u] > height[v] {
                    let delta = excess[u].min(residual);
                    net.augment(e, -delta);
                    excess[u] -= delta;
                    excess[v] += delta;
                    pushed = true;
                    if v != s && v != t && excess[v] > eps && !queued.set_bit(v as VertexId) {
                        next.push(v);
                    }
                }
            }

            if excess[u] <= eps {
                continue;
            }

            if !pushed {
                let lowest = net.out[u]
                    .iter()
                    .filter(|&&e| net.residual(e) > eps)
                    .map(|&e| height[net.head[e]])
                    .chain(
                        net.inc[u]
                            .iter()
                            .filter(|&&e| net.flow[e] > eps)
                            .map(|&e| height[net.tail[e]]),
                    )
                    .min();

                let Some(lowest) = lowest else {
                    warn!(vertex = u, excess = excess[u], "excess without residual arcs");
                    continue;
                };
                height[u] = lowest + 1;
                relabels += 1;
            }

            if !queued.set_bit(u as VertexId) {
                next.push(u);
            }
        }

        active = next;
    }

    debug!(rounds, relabels, "preflow became a flow");
    excess[t]
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn conserves_flow(graph: &FlowNetwork<u32>, s: u32, t: u32) -> bool {
        graph.vertices().all(|v| {
            let inflow: f64 = graph.edges_to(v).map(|(_, e)| e.flow()).sum();
            let outflow: f64 = graph.edges_from(v).map(|(_, e)| e.flow()).sum();
            *v == s || *v == t || (inflow - outflow).abs() < 1e-9
        })
    }

    fn respects_capacities(graph: &FlowNetwork<u32>) -> bool {
        graph
            .edges()
            .all(|(_, e)| 0.0 <= e.flow() && e.flow() <= e.capacity())
    }

    #[test]
    fn classic_network() {
        // CLRS figure 26.1
        let mut graph = FlowNetwork::from_edges(
            GraphConfig::multi(),
            [
                FlowEdge::new(0, 1, 16.0),
                FlowEdge::new(0, 2, 13.0),
                FlowEdge::new(2, 1, 4.0),
                FlowEdge::new(1, 3, 12.0),
                FlowEdge::new(3, 2, 9.0),
                FlowEdge::new(2, 4, 14.0),
                FlowEdge::new(4, 3, 7.0),
                FlowEdge::new(3, 5, 20.0),
                FlowEdge::new(4, 5, 4.0),
            ],
        );

        assert_eq!(graph.max_flow(&0, &5).unwrap(), 23.0);
        assert!(conserves_flow(&graph, 0, 5));
        assert!(respects_capacities(&graph));

        let into_sink: f64 = graph.edges_to(&5).map(|(_, e)| e.flow()).sum();
        assert_eq!(into_sink, 23.0);
    }

    #[test]
    fn agrees_with_min_cost_flow() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        for _ in 0..20 {
            let n = rng.random_range(2..12u32);
            let mut graph = FlowNetwork::new(GraphConfig::multi());
            for u in 0..n {
                graph.add_vertex(u);
            }
            for _ in 0..rng.random_range(0..(n * n)) {
                let u = rng.random_range(0..n);
                let v = rng.random_range(0..n);
                let capacity = rng.random_range(0..10u32) as f64;
                let cost = rng.random_range(0..5u32) as f64;
                graph.add_edge(FlowEdge::new(u, v, capacity).with_cost(cost));
            }

            let value = graph.max_flow(&0, &(n - 1)).unwrap();
            assert!(conserves_flow(&graph, 0, n - 1));
            assert!(respects_capacities(&graph));

            let mut copy = graph.clone();
            let result = copy.min_cost_max_flow(&0, &(n - 1)).unwrap();
            assert!((value - result.flow).abs() < 1e-6);
        }
    }

    #[test]
    fn loops_and_missing_paths() {
        let mut graph = FlowNetwork::from_edges(
            GraphConfig::multi().with_loops(true),
            [
                FlowEdge::new(0, 0, 5.0),
                FlowEdge::new(0, 1, 2.0),
                FlowEdge::new(1, 1, 3.0),
                FlowEdge::new(2, 1, 1.0),
            ],
        );

        assert_eq!(graph.max_flow(&0, &1).unwrap(), 2.0);
        assert_eq!(graph.max_flow(&0, &2).unwrap(), 0.0);
        assert!(graph.edges().all(|(_, e)| e.flow() == 0.0));
        assert_eq!(graph.max_flow(&1, &1).unwrap(), 0.0);
    }

    #[test]
    fn existing_flow_is_extended() {
        let mut graph = FlowNetwork::from_edges(
            GraphConfig::multi(),
            [
                FlowEdge::new(0, 1, 2.0).with_flow(1.0),
                FlowEdge::new(1, 2, 2.0).with_flow(1.0),
                FlowEdge::new(0, 2, 1.0),
            ],
        );

        let value = PushRelabel::new()
            .reset_flow(false)
            .run(&mut graph, &0, &2)
            .unwrap();
        assert_eq!(value, 3.0);
        assert!(conserves_flow(&graph, 0, 2));
    }

    #[test]
    fn invalid_input() {
        let mut graph = FlowNetwork::from_edges(
            GraphConfig::multi(),
            [FlowEdge::new(0, 1, 2.0), FlowEdge::new(1, 2, f64::NAN)],
        );

        assert!(matches!(
            graph.max_flow(&0, &2),
            Err(GraphError::NegativeCapacity { .. })
        ));
        assert!(matches!(
            graph.max_flow(&7, &2),
            Err(GraphError::UnknownVertex(_))
        ));
        assert!(graph.edges().all(|(_, e)| e.flow() == 0.0));
    }
}
