/*!
# Graph Store

[`GraphStore`] owns all vertices and edges of a directed (multi-)graph.

## Layout
- Vertices are interned into dense slots addressed by [`VertexId`]. Removed slots are re-used.
- Edges live in a generational arena addressed by [`EdgeId`]. A removed edge bumps the
  generation of its slot, so stale ids never alias a later edge.
- Every vertex slot stores its outgoing *bundles* (target -> edges to that target) and the set
  of sources that have at least one edge into the vertex. This single structure is the source
  of truth for all views; nothing else is materialized.

Every public mutation either updates all of the above or is rejected before touching any of it.
[`GraphStore::validate`] cross-checks the structure and is meant for tests and debugging.
*/

use std::{
    borrow::Borrow,
    fmt::{Debug, Display},
    sync::Arc,
};

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::GraphConfig;
use crate::{edge::*, error::*, node::*, ops::*};

/// Creates the edge payload for the two-argument add operations
pub type EdgeFactory<V, E> = Arc<dyn Fn(&V, &V) -> E + Send + Sync>;

/// All edges from one source to one target
#[derive(Clone, Debug)]
pub(super) struct Bundle {
    pub(super) edges: SmallVec<[EdgeId; 1]>,
    pub(super) epoch: u64,
}

#[derive(Clone, Debug)]
pub(super) struct VertexSlot<V> {
    pub(super) vertex: V,
    pub(super) out: FxHashMap<VertexId, Bundle>,
    pub(super) sources: FxHashSet<VertexId>,
    pub(super) out_degree: usize,
    pub(super) in_degree: usize,
    pub(super) epoch: u64,
}

#[derive(Clone, Debug)]
struct StoredEdge<E> {
    edge: E,
    source: VertexId,
    target: VertexId,
}

#[derive(Clone, Debug)]
struct EdgeSlot<E> {
    generation: u32,
    entry: Option<StoredEdge<E>>,
}

/// Mutable directed graph with synchronized vertex, edge, outgoing, incoming and bundle views.
///
/// # Examples
/// ```
/// use dgraphs::prelude::*;
///
/// let mut graph = WeightedGraph::with_default_edges(GraphConfig::multi());
/// graph.add_edge(WeightedEdge::new(0, 1, 2.0));
/// graph.add_edge(WeightedEdge::new(0, 1, 3.0));
/// graph.connect(&1, &2).unwrap();
///
/// assert_eq!(graph.size_of_vertices(), 3);
/// assert_eq!(graph.size_of_edges(), 3);
/// assert_eq!(graph.edges_between(&0, &1).count(), 2);
/// assert_eq!(graph.in_degree(&1), Some(2));
///
/// assert!(graph.remove_vertex(&1));
/// assert_eq!(graph.size_of_edges(), 0);
/// ```
#[derive(Clone)]
pub struct GraphStore<V, E> {
    config: GraphConfig,
    factory: Option<EdgeFactory<V, E>>,
    ids: FxHashMap<V, VertexId>,
    pub(super) slots: Vec<Option<VertexSlot<V>>>,
    free_vertices: Vec<VertexId>,
    edges: Vec<EdgeSlot<E>>,
    free_edges: Vec<u32>,
    num_vertices: NumVertices,
    num_edges: NumEdges,
    next_epoch: u64,
}

impl<V, E> GraphStore<V, E>
where
    V: Vertex,
    E: DirectedEdge<V>,
{
    /// Creates an empty store without edge factory
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            factory: None,
            ids: FxHashMap::default(),
            slots: Vec::new(),
            free_vertices: Vec::new(),
            edges: Vec::new(),
            free_edges: Vec::new(),
            num_vertices: 0,
            num_edges: 0,
            next_epoch: 0,
        }
    }

    /// Creates an empty store that builds edges for [`GraphStore::connect`] with `factory`
    pub fn with_edge_factory<F>(config: GraphConfig, factory: F) -> Self
    where
        F: Fn(&V, &V) -> E + Send + Sync + 'static,
    {
        let mut graph = Self::new(config);
        graph.factory = Some(Arc::new(factory));
        graph
    }

    /// Creates an empty store whose edge factory is `E::from((source, target))`
    pub fn with_default_edges(config: GraphConfig) -> Self
    where
        V: 'static,
        E: From<(V, V)> + 'static,
    {
        Self::with_edge_factory(config, |u: &V, v: &V| E::from((u.clone(), v.clone())))
    }

    /// Creates a store from a list of edges. Rejected edges (loops, duplicates under the
    /// simple policy) are skipped.
    pub fn from_edges<I>(config: GraphConfig, edges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<E>,
    {
        let mut graph = Self::new(config);
        for e in edges {
            graph.add_edge(e.into());
        }
        graph
    }

    /// Returns the configuration of the store
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Returns the number of vertices
    pub fn size_of_vertices(&self) -> usize {
        self.num_vertices as usize
    }

    /// Returns the number of edges
    pub fn size_of_edges(&self) -> usize {
        self.num_edges as usize
    }

    /// Adds a vertex. Returns *false* if it was already present.
    pub fn add_vertex(&mut self, v: V) -> bool {
        if self.ids.contains_key(&v) {
            return false;
        }
        self.insert_vertex(v);
        true
    }

    /// Adds an edge, inserting missing endpoints. Returns *false* if the edge was rejected.
    /// See [`GraphStore::insert_edge`].
    pub fn add_edge(&mut self, edge: E) -> bool {
        self.insert_edge(edge).is_some()
    }

    /// Adds an edge and returns its id. Missing endpoints are inserted first.
    ///
    /// Returns `None` without changing anything if
    /// - the edge is a loop and loops are not allowed, or
    /// - the store uses the simple policy and an edge between both endpoints already exists.
    pub fn insert_edge(&mut self, edge: E) -> Option<EdgeId> {
        let (source, target) = (edge.source(), edge.target());

        if source == target && !self.config.allows_loops() {
            warn!(vertex = ?source, "rejected loop");
            return None;
        }

        if !self.config.is_multi() && self.contains_edge_between(source, target) {
            trace!(?source, ?target, "rejected parallel edge");
            return None;
        }

        let s = self.intern(source);
        let t = self.intern(target);
        let id = self.alloc_edge(StoredEdge {
            edge,
            source: s,
            target: t,
        });
        self.link(id, s, t);

        Some(id)
    }

    /// Adds an edge between `u` and `v` built by the edge factory.
    ///
    /// # Errors
    /// [`GraphError::MissingEdgeFactory`] if the store has no edge factory.
    pub fn connect(&mut self, u: &V, v: &V) -> Result<bool> {
        let edge = self.make_edge(u, v)?;
        Ok(self.add_edge(edge))
    }

    /// Like [`GraphStore::connect`] but sets the weight of the new edge
    pub fn connect_weighted(&mut self, u: &V, v: &V, weight: f64) -> Result<bool>
    where
        E: Weighted,
    {
        let mut edge = self.make_edge(u, v)?;
        edge.set_weight(weight);
        Ok(self.add_edge(edge))
    }

    fn make_edge(&self, u: &V, v: &V) -> Result<E> {
        match &self.factory {
            Some(factory) => Ok(factory(u, v)),
            None => {
                warn!("connect called on a store without edge factory");
                Err(GraphError::MissingEdgeFactory)
            }
        }
    }

    /// Returns *true* if `v` is a vertex of the graph
    pub fn contains_vertex(&self, v: &V) -> bool {
        self.ids.contains_key(v)
    }

    /// Returns *true* if `id` names a live edge
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.entry(id).is_some()
    }

    /// Returns *true* if there is at least one edge from `u` to `v`
    pub fn contains_edge_between(&self, u: &V, v: &V) -> bool {
        match (self.id_of(u), self.id_of(v)) {
            (Some(u), Some(v)) => self.slot(u).is_some_and(|slot| slot.out.contains_key(&v)),
            _ => false,
        }
    }

    /// Returns the payload of an edge
    pub fn edge(&self, id: EdgeId) -> Option<&E> {
        self.entry(id).map(|stored| &stored.edge)
    }

    /// Returns the payload of an edge for mutation (weight, flow, ...).
    /// ** The endpoints of the payload must not be changed **
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut E> {
        self.edges
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
            .map(|stored| &mut stored.edge)
    }

    /// Returns the endpoints of an edge
    pub fn endpoints(&self, id: EdgeId) -> Option<(&V, &V)> {
        let stored = self.entry(id)?;
        Some((
            &self.slot(stored.source)?.vertex,
            &self.slot(stored.target)?.vertex,
        ))
    }

    /// Iterates over all vertices
    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.slots.iter().flatten().map(|slot| &slot.vertex)
    }

    /// Iterates over all edges
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.edges.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|stored| {
                (
                    EdgeId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    &stored.edge,
                )
            })
        })
    }

    /// Iterates over all edges leaving `v`. Empty if `v` is unknown.
    pub fn edges_from(&self, v: &V) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.id_of(v)
            .into_iter()
            .flat_map(|u| self.out_edges_of(u))
            .filter_map(|(id, _)| self.edge(id).map(|e| (id, e)))
    }

    /// Iterates over all edges entering `v`. Empty if `v` is unknown.
    pub fn edges_to(&self, v: &V) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.id_of(v)
            .into_iter()
            .flat_map(|u| self.in_edges_of(u))
            .filter_map(|(id, _)| self.edge(id).map(|e| (id, e)))
    }

    /// Iterates over all edges from `u` to `v`. Empty if either is unknown.
    pub fn edges_between(&self, u: &V, v: &V) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.id_of(u)
            .zip(self.id_of(v))
            .into_iter()
            .flat_map(|(u, v)| self.edges_between_ids(u, v))
            .filter_map(|id| self.edge(id).map(|e| (id, e)))
    }

    /// Returns the number of edges leaving `v` or `None` if `v` is unknown
    pub fn out_degree(&self, v: &V) -> Option<usize> {
        self.id_of(v).map(|u| self.out_degree_of(u))
    }

    /// Returns the number of edges entering `v` or `None` if `v` is unknown
    pub fn in_degree(&self, v: &V) -> Option<usize> {
        self.id_of(v).map(|u| self.in_degree_of(u))
    }

    /// Removes an edge. Returns *false* if `id` does not name a live edge.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        self.take_edge(id).is_some()
    }

    /// Removes an edge and returns its payload
    pub fn take_edge(&mut self, id: EdgeId) -> Option<E> {
        let stored = self.free_edge(id)?;
        self.unlink(id, stored.source, stored.target);
        Some(stored.edge)
    }

    /// Removes a vertex together with all incident edges.
    /// Returns *false* if `v` is unknown.
    pub fn remove_vertex(&mut self, v: &V) -> bool {
        let Some(u) = self.id_of(v) else {
            return false;
        };

        // Loops show up in both directions; the second removal is a no-op
        let incident = self
            .out_edges_of(u)
            .chain(self.in_edges_of(u))
            .map(|(id, _)| id)
            .collect_vec();
        let removed = incident.into_iter().filter(|&id| self.remove_edge(id)).count();

        self.ids.remove(v);
        self.slots[u as usize] = None;
        self.free_vertices.push(u);
        self.num_vertices -= 1;

        debug!(vertex = ?v, removed_edges = removed, "removed vertex");
        true
    }

    /// Removes all given edges. Returns *true* if at least one edge was removed.
    pub fn remove_all_edges<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = EdgeId>,
    {
        ids.into_iter()
            .fold(false, |changed, id| self.remove_edge(id) | changed)
    }

    /// Removes all given vertices and their incident edges.
    /// Returns *true* if at least one vertex was removed.
    pub fn remove_all_vertices<I>(&mut self, vertices: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        vertices
            .into_iter()
            .fold(false, |changed, v| self.remove_vertex(v.borrow()) | changed)
    }

    /// Keeps only the edges for which `predicate` returns *true*.
    /// Returns the number of removed edges.
    pub fn retain_edges<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&E) -> bool,
    {
        let doomed = self
            .edges()
            .filter(|(_, e)| !predicate(e))
            .map(|(id, _)| id)
            .collect_vec();

        let removed = doomed.len();
        self.remove_all_edges(doomed);
        removed
    }

    /// Removes all vertices and edges. Every previously obtained view detaches and every
    /// previously returned [`EdgeId`] becomes stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.edges.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_edges.push(index as u32);
            }
        }

        self.ids.clear();
        self.slots.clear();
        self.free_vertices.clear();
        self.num_vertices = 0;
        self.num_edges = 0;
    }

    /// Cross-checks all indices of the store.
    ///
    /// # Errors
    /// [`GraphError::InvariantViolation`] describing the first inconsistency found.
    /// Under correct usage this never fails.
    pub fn validate(&self) -> Result<()> {
        let violation = |msg: String| Err(GraphError::InvariantViolation(msg));

        let mut edge_count = 0usize;
        for (id, stored) in self.stored_edges() {
            edge_count += 1;

            let (Some(s), Some(t)) = (self.slot(stored.source), self.slot(stored.target)) else {
                return violation(format!("edge {id} has a removed endpoint"));
            };
            if stored.edge.source() != &s.vertex || stored.edge.target() != &t.vertex {
                return violation(format!("payload endpoints of edge {id} were changed"));
            }
            if !s
                .out
                .get(&stored.target)
                .is_some_and(|bundle| bundle.edges.contains(&id))
            {
                return violation(format!("edge {id} is missing from its bundle"));
            }
            if !t.sources.contains(&stored.source) {
                return violation(format!("edge {id} is missing from the incoming view"));
            }
        }
        if edge_count != self.size_of_edges() {
            return violation(format!(
                "edge count {} differs from {edge_count} stored edges",
                self.num_edges
            ));
        }

        let mut vertex_count = 0usize;
        for (u, slot) in self.slots.iter().enumerate() {
            let Some(slot) = slot else {
                continue;
            };
            let u = u as VertexId;
            vertex_count += 1;

            if self.ids.get(&slot.vertex) != Some(&u) {
                return violation(format!("vertex {:?} is not interned", slot.vertex));
            }

            let mut out_degree = 0;
            for (&t, bundle) in &slot.out {
                if bundle.edges.is_empty() {
                    return violation(format!("empty bundle {u} -> {t} is retained"));
                }
                out_degree += bundle.edges.len();

                for &id in &bundle.edges {
                    if self.endpoints_of(id) != Some((u, t)) {
                        return violation(format!("bundle {u} -> {t} holds foreign edge {id}"));
                    }
                }
                if !self.slot(t).is_some_and(|ts| ts.sources.contains(&u)) {
                    return violation(format!("source {u} missing at target {t}"));
                }
            }
            if out_degree != slot.out_degree {
                return violation(format!("out-degree of {u} is out of sync"));
            }

            let mut in_degree = 0;
            for &s in &slot.sources {
                match self.slot(s).and_then(|ss| ss.out.get(&u)) {
                    Some(bundle) => in_degree += bundle.edges.len(),
                    None => return violation(format!("stale source {s} at target {u}")),
                }
            }
            if in_degree != slot.in_degree {
                return violation(format!("in-degree of {u} is out of sync"));
            }
        }
        if vertex_count != self.size_of_vertices() || self.ids.len() != vertex_count {
            return violation(format!(
                "vertex count {} differs from {vertex_count} slots",
                self.num_vertices
            ));
        }

        Ok(())
    }

    fn insert_vertex(&mut self, v: V) -> VertexId {
        let slot = VertexSlot {
            vertex: v.clone(),
            out: FxHashMap::default(),
            sources: FxHashSet::default(),
            out_degree: 0,
            in_degree: 0,
            epoch: self.fresh_epoch(),
        };

        let u = match self.free_vertices.pop() {
            Some(u) => {
                self.slots[u as usize] = Some(slot);
                u
            }
            None => {
                self.slots.push(Some(slot));
                (self.slots.len() - 1) as VertexId
            }
        };

        self.ids.insert(v, u);
        self.num_vertices += 1;
        u
    }

    fn intern(&mut self, v: &V) -> VertexId {
        match self.id_of(v) {
            Some(u) => u,
            None => self.insert_vertex(v.clone()),
        }
    }

    fn alloc_edge(&mut self, stored: StoredEdge<E>) -> EdgeId {
        self.num_edges += 1;
        match self.free_edges.pop() {
            Some(index) => {
                let slot = &mut self.edges[index as usize];
                slot.entry = Some(stored);
                EdgeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.edges.push(EdgeSlot {
                    generation: 0,
                    entry: Some(stored),
                });
                EdgeId {
                    index: (self.edges.len() - 1) as u32,
                    generation: 0,
                }
            }
        }
    }

    fn free_edge(&mut self, id: EdgeId) -> Option<StoredEdge<E>> {
        let slot = self
            .edges
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)?;
        let stored = slot.entry.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free_edges.push(id.index);
        self.num_edges -= 1;
        Some(stored)
    }

    fn link(&mut self, id: EdgeId, s: VertexId, t: VertexId) {
        let epoch = self.fresh_epoch();

        if let Some(slot) = self.slots[s as usize].as_mut() {
            slot.out
                .entry(t)
                .or_insert_with(|| Bundle {
                    edges: SmallVec::new(),
                    epoch,
                })
                .edges
                .push(id);
            slot.out_degree += 1;
        }

        if let Some(slot) = self.slots[t as usize].as_mut() {
            slot.sources.insert(s);
            slot.in_degree += 1;
        }
    }

    fn unlink(&mut self, id: EdgeId, s: VertexId, t: VertexId) {
        let mut emptied = false;

        if let Some(slot) = self.slots[s as usize].as_mut() {
            if let Some(bundle) = slot.out.get_mut(&t) {
                let before = bundle.edges.len();
                bundle.edges.retain(|e| *e != id);
                debug_assert_eq!(before, bundle.edges.len() + 1, "edge missing from bundle");

                if bundle.edges.is_empty() {
                    slot.out.remove(&t);
                    emptied = true;
                }
            }
            slot.out_degree -= 1;
        }

        if let Some(slot) = self.slots[t as usize].as_mut() {
            if emptied {
                slot.sources.remove(&s);
            }
            slot.in_degree -= 1;
        }
    }

    pub(super) fn fresh_epoch(&mut self) -> u64 {
        self.next_epoch += 1;
        self.next_epoch
    }

    pub(super) fn slot(&self, u: VertexId) -> Option<&VertexSlot<V>> {
        self.slots.get(u as usize).and_then(Option::as_ref)
    }

    fn entry(&self, id: EdgeId) -> Option<&StoredEdge<E>> {
        self.edges
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn stored_edges(&self) -> impl Iterator<Item = (EdgeId, &StoredEdge<E>)> + '_ {
        self.edges.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|stored| {
                (
                    EdgeId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    stored,
                )
            })
        })
    }
}

impl<V, E> GraphOrder for GraphStore<V, E>
where
    V: Vertex,
    E: DirectedEdge<V>,
{
    type Vertex = V;

    fn number_of_vertices(&self) -> NumVertices {
        self.num_vertices
    }

    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }

    fn vertex_bound(&self) -> usize {
        self.slots.len()
    }

    fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(u, slot)| slot.as_ref().map(|_| u as VertexId))
    }

    fn id_of(&self, v: &V) -> Option<VertexId> {
        self.ids.get(v).copied()
    }

    fn vertex_of(&self, u: VertexId) -> Option<&V> {
        self.slot(u).map(|slot| &slot.vertex)
    }
}

impl<V, E> EdgeAccess for GraphStore<V, E>
where
    V: Vertex,
    E: DirectedEdge<V>,
{
    type Edge = E;

    fn edge_at(&self, id: EdgeId) -> Option<&E> {
        self.entry(id).map(|stored| &stored.edge)
    }

    fn endpoints_of(&self, id: EdgeId) -> Option<(VertexId, VertexId)> {
        self.entry(id).map(|stored| (stored.source, stored.target))
    }

    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.stored_edges().map(|(id, _)| id)
    }

    fn out_edges_of(&self, u: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.slot(u).into_iter().flat_map(|slot| {
            slot.out
                .iter()
                .flat_map(|(&t, bundle)| bundle.edges.iter().map(move |&id| (id, t)))
        })
    }

    fn in_edges_of(&self, u: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.slot(u).into_iter().flat_map(move |slot| {
            slot.sources.iter().flat_map(move |&s| {
                self.slot(s)
                    .and_then(|source| source.out.get(&u))
                    .into_iter()
                    .flat_map(move |bundle| bundle.edges.iter().map(move |&id| (id, s)))
            })
        })
    }

    fn edges_between_ids(&self, u: VertexId, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.slot(u)
            .and_then(|slot| slot.out.get(&v))
            .into_iter()
            .flat_map(|bundle| bundle.edges.iter().copied())
    }

    fn out_degree_of(&self, u: VertexId) -> usize {
        self.slot(u).map_or(0, |slot| slot.out_degree)
    }

    fn in_degree_of(&self, u: VertexId) -> usize {
        self.slot(u).map_or(0, |slot| slot.in_degree)
    }
}

impl<V, E> EdgeAccessMut for GraphStore<V, E>
where
    V: Vertex,
    E: DirectedEdge<V>,
{
    fn edge_at_mut(&mut self, id: EdgeId) -> Option<&mut E> {
        self.edge_mut(id)
    }
}

impl<V, E> Display for GraphStore<V, E>
where
    V: Vertex,
    E: DirectedEdge<V> + Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Graph:[{}]", self.edges().map(|(_, e)| e).join(", "))
    }
}

impl<V, E> Debug for GraphStore<V, E>
where
    V: Vertex,
    E: DirectedEdge<V> + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("config", &self.config)
            .field("vertices", &self.vertices().collect_vec())
            .field("edges", &self.edges().map(|(_, e)| e).collect_vec())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    fn scenario() -> WeightedGraph<u32> {
        WeightedGraph::from_edges(
            GraphConfig::multi(),
            [
                (0, 1, 2.0),
                (0, 1, 3.0),
                (1, 2, 4.0),
                (0, 3, 0.0),
                (3, 1, 5.0),
                (3, 2, 2.0),
                (2, 4, 2.0),
            ],
        )
    }

    #[test]
    fn add_and_count() {
        let graph = scenario();
        assert_eq!(graph.size_of_vertices(), 5);
        assert_eq!(graph.size_of_edges(), 7);
        assert_eq!(graph.out_degree(&0), Some(3));
        assert_eq!(graph.in_degree(&1), Some(3));
        assert_eq!(graph.in_degree(&7), None);
        assert_eq!(graph.edges_between(&0, &1).count(), 2);
        assert!(graph.contains_edge_between(&3, &2));
        assert!(!graph.contains_edge_between(&2, &3));
        graph.validate().unwrap();
    }

    #[test]
    fn simple_policy_rejects_parallel_edges() {
        let mut graph = Digraph::new(GraphConfig::simple());
        assert!(graph.add_edge(Edge::new(0, 1)));
        assert!(!graph.add_edge(Edge::new(0, 1)));
        assert!(graph.add_edge(Edge::new(1, 0)));
        assert_eq!(graph.size_of_edges(), 2);
        graph.validate().unwrap();
    }

    #[test]
    fn loop_policy() {
        let mut graph = Digraph::new(GraphConfig::multi());
        assert!(!graph.add_edge(Edge::new(4, 4)));
        assert_eq!(graph.size_of_vertices(), 0);
        assert_eq!(graph.size_of_edges(), 0);

        let mut graph = Digraph::new(GraphConfig::multi().with_loops(true));
        let id = graph.insert_edge(Edge::new(4, 4)).unwrap();
        assert_eq!(graph.in_degree(&4), Some(1));
        assert_eq!(graph.out_degree(&4), Some(1));
        assert!(graph.remove_vertex(&4));
        assert!(!graph.contains_edge(id));
        graph.validate().unwrap();
    }

    #[test]
    fn remove_vertex_cascades() {
        let mut graph = scenario();
        assert!(graph.remove_vertex(&1));
        assert_eq!(graph.size_of_vertices(), 4);
        assert_eq!(graph.size_of_edges(), 3);
        assert_eq!(graph.out_degree(&0), Some(1));
        assert_eq!(graph.in_degree(&2), Some(1));
        assert!(!graph.remove_vertex(&1));
        graph.validate().unwrap();
    }

    #[test]
    fn stale_edge_ids() {
        let mut graph = scenario();
        let (id, _) = graph.edges_from(&2).next().unwrap();
        assert!(graph.remove_edge(id));
        assert!(!graph.remove_edge(id));
        assert_eq!(graph.size_of_edges(), 6);

        // the slot is re-used, the old id must not alias the new edge
        let new_id = graph.insert_edge(WeightedEdge::new(4, 2, 1.0)).unwrap();
        assert_eq!(new_id.index(), id.index());
        assert!(!graph.contains_edge(id));
        assert!(graph.edge(id).is_none());
        assert_eq!(graph.edge(new_id).map(|e| e.weight()), Some(1.0));
    }

    #[test]
    fn connect_requires_factory() {
        let mut graph = WeightedGraph::new(GraphConfig::simple());
        assert_eq!(graph.connect(&0, &1), Err(GraphError::MissingEdgeFactory));
        assert_eq!(graph.size_of_vertices(), 0);

        let mut graph = WeightedGraph::with_default_edges(GraphConfig::simple());
        assert_eq!(graph.connect(&0, &1), Ok(true));
        assert_eq!(graph.connect(&0, &1), Ok(false));
        assert_eq!(graph.connect_weighted(&1, &2, 7.5), Ok(true));
        let weights = graph.edges().map(|(_, e)| e.weight()).sorted_by(f64::total_cmp);
        assert_eq!(weights.collect_vec(), vec![WeightedEdge::<u32>::DEFAULT_WEIGHT, 7.5]);
    }

    #[test]
    fn retain_and_clear() {
        let mut graph = scenario();
        assert_eq!(graph.retain_edges(|e| e.weight() >= 3.0), 4);
        assert_eq!(graph.size_of_edges(), 3);
        assert_eq!(graph.size_of_vertices(), 5);
        graph.validate().unwrap();

        let id = graph.edges().next().unwrap().0;
        graph.clear();
        assert_eq!(graph.size_of_vertices(), 0);
        assert_eq!(graph.size_of_edges(), 0);
        assert!(!graph.contains_edge(id));
        assert!(!graph.remove_vertex(&0));
        graph.validate().unwrap();

        graph.add_edge(WeightedEdge::new(0, 1, 1.0));
        assert!(!graph.contains_edge(id));
        graph.validate().unwrap();
    }

    #[test]
    fn remove_all() {
        let mut graph = scenario();
        let ids = graph.edges_from(&0).map(|(id, _)| id).collect_vec();
        assert!(graph.remove_all_edges(ids.clone()));
        assert!(!graph.remove_all_edges(ids));
        assert_eq!(graph.out_degree(&0), Some(0));

        assert!(graph.remove_all_vertices([2u32, 3, 9]));
        assert!(!graph.remove_all_vertices(&[9u32]));
        assert_eq!(graph.size_of_vertices(), 3);
        assert_eq!(graph.size_of_edges(), 0);
        graph.validate().unwrap();
    }

    #[test]
    fn display() {
        let graph = WeightedGraph::from_edges(GraphConfig::simple(), [(0, 1, 2.5)]);
        assert_eq!(graph.to_string(), "Graph:[(0,1,2.5)]");
    }

    #[test]
    fn randomized_mutations_stay_consistent() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);

        for config in [
            GraphConfig::simple(),
            GraphConfig::multi(),
            GraphConfig::multi().with_loops(true),
        ] {
            let mut graph = Digraph::new(config);

            for _ in 0..2000 {
                match rng.random_range(0..10) {
                    0..6 => {
                        let u = rng.random_range(0..30u32);
                        let v = rng.random_range(0..30u32);
                        let had = graph.contains_edge_between(&u, &v);
                        let added = graph.add_edge(Edge::new(u, v));
                        if u == v && !config.allows_loops() {
                            assert!(!added);
                        } else if !config.is_multi() {
                            assert_eq!(added, !had);
                        } else {
                            assert!(added);
                        }
                    }
                    6..8 => {
                        let picked = graph.edges().nth(rng.random_range(0..8)).map(|(id, _)| id);
                        if let Some(id) = picked {
                            assert!(graph.remove_edge(id));
                        }
                    }
                    8 => {
                        graph.remove_vertex(&rng.random_range(0..30u32));
                    }
                    _ => {
                        graph.add_vertex(rng.random_range(0..40u32));
                    }
                }

                graph.validate().unwrap();

                let out: usize = graph.vertices().map(|v| graph.out_degree(v).unwrap()).sum();
                let inc: usize = graph.vertices().map(|v| graph.in_degree(v).unwrap()).sum();
                assert_eq!(out, graph.size_of_edges());
                assert_eq!(inc, graph.size_of_edges());
            }
        }
    }
}
