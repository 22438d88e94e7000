/*!
# Network Flows

Shared plumbing of the flow algorithms:
- the process-wide comparison tolerance ([`flow_epsilon`] / [`set_flow_epsilon`]),
- the [`FlowResult`] returned by the algorithms,
- the [`NetworkFlow`] extension trait,
- a dense residual network snapshot the algorithms run on.

The algorithms copy capacities, flows and costs of the graph into the snapshot, validate them
and only write flows back after they finished. A rejected graph therefore never sees partial
flow updates.
*/

use std::sync::atomic::{AtomicU64, Ordering};

use super::*;

/// Tolerance used when no other value was set
pub const DEFAULT_FLOW_EPSILON: f64 = 1e-10;

static FLOW_EPSILON: AtomicU64 = AtomicU64::new(DEFAULT_FLOW_EPSILON.to_bits());

/// Returns the process-wide tolerance for comparing flows and capacities
pub fn flow_epsilon() -> f64 {
    f64::from_bits(FLOW_EPSILON.load(Ordering::Relaxed))
}

/// Sets the process-wide tolerance for comparing flows and capacities.
/// Only positive finite values are accepted; returns *false* otherwise.
pub fn set_flow_epsilon(epsilon: f64) -> bool {
    if epsilon > 0.0 && epsilon.is_finite() {
        FLOW_EPSILON.store(epsilon.to_bits(), Ordering::Relaxed);
        true
    } else {
        false
    }
}

/// Value and cost of a computed flow
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowResult {
    /// Amount of flow arriving at the sink
    pub flow: f64,
    /// Sum of `flow * cost` over the pushed flow
    pub cost: f64,
}

/// Flow algorithms exposed as methods on graphs
pub trait NetworkFlow: EdgeAccessMut + Sized {
    /// Min-cost max-flow by successive shortest paths; see [`MinCostMaxFlow::run`]
    fn min_cost_max_flow(
        &mut self,
        source: &Self::Vertex,
        sink: &Self::Vertex,
    ) -> Result<FlowResult>
    where
        Self::Edge: FlowCarrying + Weighted,
    {
        MinCostMaxFlow::new().run(self, source, sink)
    }

    /// Max-flow value by push-relabel; see [`PushRelabel::run`]
    fn max_flow(&mut self, source: &Self::Vertex, sink: &Self::Vertex) -> Result<f64>
    where
        Self::Edge: FlowCarrying,
    {
        PushRelabel::new().run(self, source, sink)
    }
}

impl<G: EdgeAccessMut> NetworkFlow for G {}

/// Dense snapshot of a flow network. Edge `e` runs from `tail[e]` to `head[e]`; vertices are
/// numbered `0..n` in the order of [`GraphOrder::vertex_ids`]. Loops are kept for writing back
/// but never appear in the adjacency lists.
pub(crate) struct ResidualNetwork {
    pub(crate) ids: Vec<EdgeId>,
    pub(crate) tail: Vec<usize>,
    pub(crate) head: Vec<usize>,
    pub(crate) capacity: Vec<f64>,
    pub(crate) flow: Vec<f64>,
    pub(crate) cost: Vec<f64>,
    pub(crate) out: Vec<Vec<usize>>,
    pub(crate) inc: Vec<Vec<usize>>,
    pub(crate) index: Vec<usize>,
    pub(crate) epsilon: f64,
}

impl ResidualNetwork {
    /// Copies all edges of `graph`.
    ///
    /// # Errors
    /// [`GraphError::NegativeCapacity`] if any capacity is negative or NaN.
    pub(crate) fn new<G, C>(graph: &G, reset_flow: bool, epsilon: f64, cost_of: C) -> Result<Self>
    where
        G: EdgeAccess,
        G::Edge: FlowCarrying,
        C: Fn(&G::Edge) -> f64,
    {
        let mut index = vec![usize::MAX; graph.vertex_bound()];
        let mut n = 0;
        for u in graph.vertex_ids() {
            index[u as usize] = n;
            n += 1;
        }

        let m = graph.number_of_edges() as usize;
        let mut net = Self {
            ids: Vec::with_capacity(m),
            tail: Vec::with_capacity(m),
            head: Vec::with_capacity(m),
            capacity: Vec::with_capacity(m),
            flow: Vec::with_capacity(m),
            cost: Vec::with_capacity(m),
            out: vec![Vec::new(); n],
            inc: vec![Vec::new(); n],
            index,
            epsilon,
        };

        for id in graph.edge_ids() {
            let (Some(edge), Some((u, v))) = (graph.edge_at(id), graph.endpoints_of(id)) else {
                continue;
            };

            let capacity = edge.capacity();
            if capacity.is_nan() || capacity < 0.0 {
                return Err(GraphError::NegativeCapacity { capacity });
            }

            let e = net.ids.len();
            let (u, v) = (net.index[u as usize], net.index[v as usize]);
            net.ids.push(id);
            net.tail.push(u);
            net.head.push(v);
            net.capacity.push(capacity);
            net.flow.push(if reset_flow { 0.0 } else { edge.flow() });
            net.cost.push(cost_of(edge));

            if u != v {
                net.out[u].push(e);
                net.inc[v].push(e);
            }
        }

        Ok(net)
    }

    /// Returns the number of vertices
    pub(crate) fn len(&self) -> usize {
        self.out.len()
    }

    /// Returns the dense index of a vertex id
    pub(crate) fn vertex(&self, u: VertexId) -> usize {
        self.index[u as usize]
    }

    /// Returns the spare capacity of edge `e`
    pub(crate) fn residual(&self, e: usize) -> f64 {
        self.capacity[e] - self.flow[e]
    }

    /// Returns inflow minus outflow of `u`
    pub(crate) fn excess(&self, u: usize) -> f64 {
        let inflow: f64 = self.inc[u].iter().map(|&e| self.flow[e]).sum();
        let outflow: f64 = self.out[u].iter().map(|&e| self.flow[e]).sum();
        inflow - outflow
    }

    /// Changes the flow of `e` by `delta`, clamped to `[0, capacity]`
    pub(crate) fn augment(&mut self, e: usize, delta: f64) {
        self.flow[e] = (self.flow[e] + delta).clamp(0.0, self.capacity[e]);
    }

    /// Stores the computed flows in the edges of `graph`
    pub(crate) fn write_back<G>(&self, graph: &mut G)
    where
        G: EdgeAccessMut,
        G::Edge: FlowCarrying,
    {
        for (&id, &flow) in self.ids.iter().zip(&self.flow) {
            if let Some(edge) = graph.edge_at_mut(id) {
                edge.set_flow(flow);
            }
        }
    }
}
