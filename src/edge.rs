use std::fmt::{Debug, Display};

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = u32;

/// Handle of an edge stored in a [`GraphStore`](crate::repr::GraphStore).
///
/// Consists of the slot index and the generation of that slot, so a handle of a removed edge
/// never aliases an edge that later re-uses the slot.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl EdgeId {
    /// Returns the slot index of the edge
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}.{}", self.index, self.generation)
    }
}

impl Debug for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

/// An edge is defined by its two endpoints, the source and the target.
/// The endpoints of an edge never change once it is constructed.
pub trait DirectedEdge<V> {
    /// Returns the vertex the edge leaves
    fn source(&self) -> &V;

    /// Returns the vertex the edge enters
    fn target(&self) -> &V;

    /// Returns *true* if both endpoints are equal
    fn is_loop(&self) -> bool
    where
        V: PartialEq,
    {
        self.source() == self.target()
    }
}

/// Edges carrying a real-valued weight (or cost)
pub trait Weighted {
    /// Returns the weight of the edge
    fn weight(&self) -> f64;

    /// Overwrites the weight of the edge
    fn set_weight(&mut self, weight: f64);
}

/// Edges of a flow network
pub trait FlowCarrying {
    /// Returns the capacity of the edge
    fn capacity(&self) -> f64;

    /// Returns the flow currently routed over the edge
    fn flow(&self) -> f64;

    /// Overwrites the flow of the edge
    fn set_flow(&mut self, flow: f64);

    /// Returns the capacity that is still unused
    fn residual_capacity(&self) -> f64 {
        self.capacity() - self.flow()
    }
}

/// Plain edge without any payload
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Edge<V> {
    source: V,
    target: V,
}

impl<V> Edge<V> {
    pub fn new(source: V, target: V) -> Self {
        Self { source, target }
    }
}

impl<V> DirectedEdge<V> for Edge<V> {
    fn source(&self) -> &V {
        &self.source
    }

    fn target(&self) -> &V {
        &self.target
    }
}

impl<V> From<(V, V)> for Edge<V> {
    fn from(value: (V, V)) -> Self {
        Edge::new(value.0, value.1)
    }
}

impl<V: Display> Display for Edge<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.source, self.target)
    }
}

impl<V: Debug> Debug for Edge<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?},{:?})", self.source, self.target)
    }
}

/// Edge with a mutable weight
#[derive(Copy, Clone, PartialEq)]
pub struct WeightedEdge<V> {
    source: V,
    target: V,
    weight: f64,
}

impl<V> WeightedEdge<V> {
    /// Weight given to edges created without an explicit weight
    pub const DEFAULT_WEIGHT: f64 = 0.0;

    pub fn new(source: V, target: V, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Creates an edge of weight [`Self::DEFAULT_WEIGHT`]
    pub fn unweighted(source: V, target: V) -> Self {
        Self::new(source, target, Self::DEFAULT_WEIGHT)
    }
}

impl<V> DirectedEdge<V> for WeightedEdge<V> {
    fn source(&self) -> &V {
        &self.source
    }

    fn target(&self) -> &V {
        &self.target
    }
}

impl<V> Weighted for WeightedEdge<V> {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}

impl<V> From<(V, V)> for WeightedEdge<V> {
    fn from(value: (V, V)) -> Self {
        WeightedEdge::unweighted(value.0, value.1)
    }
}

impl<V> From<(V, V, f64)> for WeightedEdge<V> {
    fn from(value: (V, V, f64)) -> Self {
        WeightedEdge::new(value.0, value.1, value.2)
    }
}

impl<V: Display> Display for WeightedEdge<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.source, self.target, self.weight)
    }
}

impl<V: Debug> Debug for WeightedEdge<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?},{:?},{})", self.source, self.target, self.weight)
    }
}

/// Edge of a flow network with capacity, flow and a per-unit cost.
///
/// The cost doubles as the edge's [`Weighted::weight`], so flow edges can be fed into
/// shortest-path algorithms as well.
#[derive(Copy, Clone, PartialEq)]
pub struct FlowEdge<V> {
    source: V,
    target: V,
    capacity: f64,
    flow: f64,
    cost: f64,
}

impl<V> FlowEdge<V> {
    /// Creates an edge with the given capacity, no flow and zero cost
    pub fn new(source: V, target: V, capacity: f64) -> Self {
        Self {
            source,
            target,
            capacity,
            flow: 0.0,
            cost: 0.0,
        }
    }

    /// Sets the per-unit cost of the edge
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Sets the initial flow of the edge
    pub fn with_flow(mut self, flow: f64) -> Self {
        self.flow = flow;
        self
    }

    /// Returns the per-unit cost of the edge
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

impl<V> DirectedEdge<V> for FlowEdge<V> {
    fn source(&self) -> &V {
        &self.source
    }

    fn target(&self) -> &V {
        &self.target
    }
}

impl<V> Weighted for FlowEdge<V> {
    fn weight(&self) -> f64 {
        self.cost
    }

    fn set_weight(&mut self, weight: f64) {
        self.cost = weight;
    }
}

impl<V> FlowCarrying for FlowEdge<V> {
    fn capacity(&self) -> f64 {
        self.capacity
    }

    fn flow(&self) -> f64 {
        self.flow
    }

    fn set_flow(&mut self, flow: f64) {
        self.flow = flow;
    }
}

impl<V: Display> Display for FlowEdge<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{},{}/{})",
            self.source, self.target, self.flow, self.capacity
        )
    }
}

impl<V: Debug> Debug for FlowEdge<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:?},{:?},{}/{},cost={})",
            self.source, self.target, self.flow, self.capacity, self.cost
        )
    }
}
