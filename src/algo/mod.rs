/*!
# Graph Algorithms

This module provides the path and flow algorithms built on top of the [`GraphStore`] and the
[`FibonacciHeap`]. All algorithms are re-exported at the top level of this module, so you can
simply do:
```rust
use dgraphs::algo::*;
```

Every algorithm is available in two forms:
- as a configurable struct following the *Builder* / *Setter* pattern
  ([`Dijkstra`], [`BellmanFord`], [`FloydWarshall`], [`Johnson`], [`MinCostMaxFlow`],
  [`PushRelabel`]),
- as a method of an extension trait implemented for every graph exposing the
  [`ops`](crate::ops) traits ([`PathSearch`], [`ShortestPath`], [`AllPairsShortestPaths`],
  [`NetworkFlow`]) using the default configuration.
*/

mod bellman_ford;
mod dijkstra;
mod flow;
mod floyd_warshall;
mod johnson;
mod min_cost_flow;
mod path;
mod push_relabel;
mod traversal;

use crate::{error::*, prelude::*, testing::test_shortest_paths, utils::*};

pub use bellman_ford::*;
pub use dijkstra::*;
pub use flow::*;
pub use floyd_warshall::*;
pub use johnson::*;
pub use min_cost_flow::*;
pub use path::*;
pub use push_relabel::*;
pub use traversal::*;

/// Shortest paths from one source, keyed by target vertex
pub type ShortestPaths<V> = fxhash::FxHashMap<V, WeightedPath<V>>;

/// Shortest paths between all pairs, keyed by source and then by target vertex
pub type AllPairs<V> = fxhash::FxHashMap<V, ShortestPaths<V>>;

fn unknown_vertex<V: std::fmt::Debug>(v: &V) -> GraphError {
    GraphError::UnknownVertex(format!("{v:?}"))
}

test_shortest_paths!(
    test_non_negative_weights,
    0,
    (Dijkstra, BellmanFord, FloydWarshall, Johnson)
);
test_shortest_paths!(
    test_acyclic_negative_weights,
    -5,
    (BellmanFord, FloydWarshall, Johnson)
);
