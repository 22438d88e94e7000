/*!
Graph traversal and unweighted path search.

This module provides:
- A generic traversal iterator ([`TraversalSearch`]) parameterized by its frontier:
  a queue yields **BFS**, a stack yields **DFS**.
- The [`PathSearch`] trait exposing traversals and BFS/DFS path searches directly as methods
  on every graph implementing [`EdgeAccess`].

Traversals ignore edge payloads entirely and therefore work on any edge type.
*/

use std::collections::VecDeque;

use tracing::debug;

use super::*;

/// Abstraction for the traversal frontier data structure.
///
/// - [`VecDeque`] -> queue semantics -> **BFS**
/// - [`Vec`] -> stack semantics -> **DFS**
pub trait NodeSequencer<T> {
    /// Creates a new sequencer initialized with a single item.
    fn init(u: T) -> Self;

    /// Pushes an item into the frontier.
    fn push(&mut self, item: T);

    /// Removes and returns the next item from the frontier.
    fn pop(&mut self) -> Option<T>;

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;
}

impl<T> NodeSequencer<T> for VecDeque<T> {
    fn init(u: T) -> Self {
        Self::from(vec![u])
    }
    fn push(&mut self, u: T) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl<T> NodeSequencer<T> for Vec<T> {
    fn init(u: T) -> Self {
        vec![u]
    }
    fn push(&mut self, u: T) {
        self.push(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

/// A vertex yielded by a traversal together with the edge it was discovered by
/// (`None` for the start vertex).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub vertex: VertexId,
    pub via: Option<EdgeId>,
}

/// Generic traversal iterator supporting BFS and DFS variants.
///
/// A vertex is marked as discovered when it is pushed onto the frontier, so every vertex is
/// yielded at most once.
pub struct TraversalSearch<'a, G, S>
where
    G: EdgeAccess,
    S: NodeSequencer<Visit>,
{
    graph: &'a G,
    visited: VertexBitSet,
    sequencer: S,
    stop_at: Option<VertexId>,
}

/// A BFS traversal iterator visiting vertices in breadth-first order.
pub type BFS<'a, G> = TraversalSearch<'a, G, VecDeque<Visit>>;

/// A DFS traversal iterator visiting vertices in depth-first order.
pub type DFS<'a, G> = TraversalSearch<'a, G, Vec<Visit>>;

impl<G, S> Iterator for TraversalSearch<'_, G, S>
where
    G: EdgeAccess,
    S: NodeSequencer<Visit>,
{
    type Item = Visit;

    fn next(&mut self) -> Option<Self::Item> {
        let popped = self.sequencer.pop()?;
        let u = popped.vertex;

        if self.stop_at == Some(u) {
            while self.sequencer.pop().is_some() {} // drop all
        } else {
            for (e, v) in self.graph.out_edges_of(u) {
                if !self.visited.set_bit(v) {
                    self.sequencer.push(Visit {
                        vertex: v,
                        via: Some(e),
                    });
                }
            }
        }

        Some(popped)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.sequencer.cardinality(), Some(self.graph.len()))
    }
}

impl<'a, G, S> TraversalSearch<'a, G, S>
where
    G: EdgeAccess,
    S: NodeSequencer<Visit>,
{
    /// Creates a new traversal iterator starting from `start`.
    /// ** Panics if `start` is not below `graph.vertex_bound()` **
    pub fn new(graph: &'a G, start: VertexId) -> Self {
        let mut visited = VertexBitSet::new(graph.vertex_bound() as NumVertices);
        visited.set_bit(start);
        Self {
            graph,
            visited,
            sequencer: S::init(Visit {
                vertex: start,
                via: None,
            }),
            stop_at: None,
        }
    }

    /// Sets a stopper vertex. If this vertex is reached, the iterator returns it and afterwards only None.
    pub fn set_stop_at(&mut self, stopper: VertexId) {
        self.stop_at = Some(stopper);
    }

    /// Sets a stopper vertex. If this vertex is reached, the iterator returns it and afterwards only None.
    pub fn stop_at(mut self, stopper: VertexId) -> Self {
        self.set_stop_at(stopper);
        self
    }

    /// Excludes a vertex from the search. It will be treated as if it was already visited.
    ///
    /// # Warning
    /// Calling this method has no effect if the vertex is already on the frontier. It is
    /// therefore highly recommended to call this method directly after the constructor.
    pub fn with_vertex_excluded(mut self, u: VertexId) -> Self {
        if u < self.visited.number_of_bits() {
            self.visited.set_bit(u);
        }
        self
    }

    /// Returns *true* if `u` was discovered so far
    pub fn did_visit(&self, u: VertexId) -> bool {
        u < self.visited.number_of_bits() && self.visited.get_bit(u)
    }

    /// Consumes the search and returns the discovery edge of every visited vertex,
    /// indexed by [`VertexId`].
    pub fn predecessors(self) -> Vec<Option<EdgeId>> {
        let mut predecessors = vec![None; self.graph.vertex_bound()];
        for visit in self {
            predecessors[visit.vertex as usize] = visit.via;
        }
        predecessors
    }
}

/// Traversal algorithms exposed as methods on graphs
pub trait PathSearch: EdgeAccess + Sized {
    /// Returns an iterator traversing vertices in breadth-first-search order
    /// ** Panics if `start` is not below `vertex_bound()` **
    fn bfs(&self, start: VertexId) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Returns an iterator traversing vertices in depth-first-search order
    /// ** Panics if `start` is not below `vertex_bound()` **
    fn dfs(&self, start: VertexId) -> DFS<'_, Self> {
        DFS::new(self, start)
    }

    /// Returns a path with the fewest edges from `source` to `target`, or `None` if
    /// `target` is unreachable or either vertex is unknown.
    ///
    /// # Examples
    /// ```
    /// use dgraphs::{prelude::*, algo::*};
    ///
    /// let graph = Digraph::from_edges(GraphConfig::simple(), [(0, 1), (1, 2), (0, 3), (3, 2)]);
    /// let path = graph.bfs_path(&0, &2).unwrap();
    /// assert_eq!(path.len(), 2);
    /// assert!(graph.bfs_path(&2, &0).is_none());
    /// ```
    fn bfs_path(&self, source: &Self::Vertex, target: &Self::Vertex) -> Option<Path<Self::Vertex>> {
        search_path::<Self, VecDeque<Visit>>(self, source, target)
    }

    /// Returns some path from `source` to `target` found by depth-first search, or `None` if
    /// `target` is unreachable or either vertex is unknown.
    fn dfs_path(&self, source: &Self::Vertex, target: &Self::Vertex) -> Option<Path<Self::Vertex>> {
        search_path::<Self, Vec<Visit>>(self, source, target)
    }

    /// Returns *true* if there is a directed path from `source` to `target`
    fn is_reachable(&self, source: &Self::Vertex, target: &Self::Vertex) -> bool {
        match (self.id_of(source), self.id_of(target)) {
            (Some(s), Some(t)) => self.bfs(s).stop_at(t).any(|visit| visit.vertex == t),
            _ => false,
        }
    }
}

impl<G: EdgeAccess> PathSearch for G {}

fn search_path<G, S>(graph: &G, source: &G::Vertex, target: &G::Vertex) -> Option<Path<G::Vertex>>
where
    G: EdgeAccess,
    S: NodeSequencer<Visit>,
{
    let (s, t) = (graph.id_of(source)?, graph.id_of(target)?);

    let mut predecessors = vec![None; graph.vertex_bound()];
    let mut visited = 0usize;
    let mut found = false;
    for visit in TraversalSearch::<G, S>::new(graph, s).stop_at(t) {
        predecessors[visit.vertex as usize] = visit.via;
        visited += 1;
        found |= visit.vertex == t;
    }

    debug!(?source, ?target, visited, found, "path search finished");
    if !found {
        return None;
    }

    PathBuilder::new(graph)
        .build(s, t, &predecessors)
        .ok()
        .flatten()
}
