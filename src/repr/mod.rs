/*!
# Graph Representation

The crate has a single mutable representation, the [`GraphStore`]. It keeps one adjacency
structure per vertex (outgoing bundles keyed by target, plus the set of sources with an edge
into the vertex) and derives all five views from it:

| View                | Store method                        | Handle view                      |
|---------------------|-------------------------------------|----------------------------------|
| all vertices        | [`GraphStore::vertices`]            | -                                |
| all edges           | [`GraphStore::edges`]               | -                                |
| outgoing of `v`     | [`GraphStore::edges_from`]          | [`GraphStore::outgoing_view`]    |
| incoming of `v`     | [`GraphStore::edges_to`]            | [`GraphStore::incoming_view`]    |
| bundle `(s, t)`     | [`GraphStore::edges_between`]       | [`GraphStore::bundle_view`]      |

Handle views ([`EdgeView`]) can be kept across mutations and allow mutation through the view.
Once the backing set is structurally removed (its vertex removed, its bundle emptied, or the
store cleared), the handle is *detached*: it reports no edges and rejects every mutation.

Behaviour of the store is configured by a [`GraphConfig`]:
- [`EdgePolicy::Simple`]: at most one edge per ordered pair `(source, target)`,
- [`EdgePolicy::Multi`]: every inserted edge is distinct, parallel edges are allowed,
- `allow_loops`: whether edges with `source == target` are accepted.
*/

use crate::edge::{Edge, FlowEdge, WeightedEdge};

mod store;
mod views;

pub use store::*;
pub use views::*;

/// Decides whether parallel edges are allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// At most one edge per ordered vertex pair
    #[default]
    Simple,
    /// Any number of edges per ordered vertex pair
    Multi,
}

/// Configuration of a [`GraphStore`].
///
/// Loops are rejected unless enabled via [`GraphConfig::with_loops`].
///
/// # Examples
/// ```
/// use dgraphs::prelude::*;
///
/// let config = GraphConfig::multi().with_loops(true);
/// assert_eq!(config.policy(), EdgePolicy::Multi);
/// assert!(config.allows_loops());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphConfig {
    policy: EdgePolicy,
    allow_loops: bool,
}

impl GraphConfig {
    /// Configuration for simple digraphs without loops
    pub fn simple() -> Self {
        Self {
            policy: EdgePolicy::Simple,
            allow_loops: false,
        }
    }

    /// Configuration for multigraphs without loops
    pub fn multi() -> Self {
        Self {
            policy: EdgePolicy::Multi,
            allow_loops: false,
        }
    }

    /// Sets whether loops are accepted
    pub fn set_allow_loops(&mut self, allow_loops: bool) {
        self.allow_loops = allow_loops;
    }

    /// Sets whether loops are accepted
    pub fn with_loops(mut self, allow_loops: bool) -> Self {
        self.set_allow_loops(allow_loops);
        self
    }

    /// Returns the edge policy
    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Returns *true* if parallel edges are allowed
    pub fn is_multi(&self) -> bool {
        self.policy == EdgePolicy::Multi
    }

    /// Returns *true* if loops are accepted
    pub fn allows_loops(&self) -> bool {
        self.allow_loops
    }
}

/// Store of payload-free edges
pub type Digraph<V> = GraphStore<V, Edge<V>>;

/// Store of edges with a real weight
pub type WeightedGraph<V> = GraphStore<V, WeightedEdge<V>>;

/// Store of edges with capacity, flow and cost
pub type FlowNetwork<V> = GraphStore<V, FlowEdge<V>>;
