/*!
`dgraphs` is an in-memory library for **d**irected graphs with arbitrary vertex values and
edge payloads, together with a set of classic path and flow algorithms.

# Representation

Vertices are arbitrary hashable values (see [`Vertex`](crate::node::Vertex)). Internally every
vertex is interned to a dense [`VertexId`](crate::node::VertexId) (`u32`) so that algorithms
can work on plain vectors instead of hash maps. Edges are owned by the graph and addressed by
a generational [`EdgeId`](crate::edge::EdgeId), which never aliases a later edge after removal.

Three edge payloads are provided:
- [`Edge`](crate::edge::Edge): source and target only,
- [`WeightedEdge`](crate::edge::WeightedEdge): additionally a real weight,
- [`FlowEdge`](crate::edge::FlowEdge): capacity, flow and a per-unit cost.

### Simple vs Multi

A [`GraphConfig`](crate::repr::GraphConfig) decides whether parallel edges between the same
ordered pair are allowed ([`EdgePolicy::Multi`](crate::repr::EdgePolicy)) or rejected
([`EdgePolicy::Simple`](crate::repr::EdgePolicy)), and whether loops are accepted.

### Views

Besides its own methods, a [`GraphStore`](crate::repr::GraphStore) hands out lightweight
[`EdgeView`](crate::repr::EdgeView) handles for the outgoing edges of a vertex, the incoming
edges of a vertex or the bundle of edges between two vertices. Views are backed by the store:
edits through a view are edits of the graph and vice versa. A view whose scope disappears
(its vertex or its last edge is removed) detaches permanently.

# Design

All algorithms are provided as configurable structs that one can alter using either the
*Builder* / *Setter* pattern before running them on a graph. The most common functionality is
also implemented via extension traits on the graph itself, so that
`graph.dijkstra(&s, &t)` or `graph.max_flow(&s, &t)` work without configuring anything.

Fallible operations return [`Result`](crate::error::Result) with a
[`GraphError`](crate::error::GraphError). Absence (an unreachable target, a missing edge) is
never an error and is reported through `Option` or an infinite distance instead.

The library logs through [`tracing`](https://docs.rs/tracing) but never installs a subscriber.

# Usage

There are *4* submodules you probably want to interact with:
- [`prelude`] includes vertices, edges, the graph operation traits, the store and the error type,
- [`algo`] includes traversal, shortest path and flow algorithms,
- [`utils`] includes the [`FibonacciHeap`](crate::utils::FibonacciHeap) used by the algorithms,
- [`error`] includes the error type and its classification.

In most use-cases, `use dgraphs::{prelude::*, algo::*};` suffices for your needs.

```
use dgraphs::{prelude::*, algo::*};

let mut graph = WeightedGraph::new(GraphConfig::multi());
graph.add_edge(WeightedEdge::new("a", "b", 1.0));
graph.add_edge(WeightedEdge::new("b", "c", 2.0));
graph.add_edge(WeightedEdge::new("a", "c", 5.0));

let path = graph.dijkstra(&"a", &"c").unwrap().unwrap();
assert_eq!(path.distance(), 3.0);
assert_eq!(path.vertices(), &["a", "b", "c"]);
```
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod node;
pub mod ops;
pub mod repr;
pub(crate) mod testing;
pub mod utils;

/// `dgraphs::prelude` includes definitions for vertices and edges, all graph operation traits,
/// the graph store as well as the error type.
pub mod prelude {
    pub use super::{edge::*, error::GraphError, node::*, ops::*, repr::*};
}
