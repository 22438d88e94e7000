/*!
# Graph Operations

Read access used by the algorithms in [`crate::algo`]. Algorithms never see vertex values
directly while running; they work on dense [`VertexId`]s and [`EdgeId`]s and only translate
back to vertex values when building results.

- [`GraphOrder`]: vertex count, edge count and the mapping between vertices and their ids,
- [`EdgeAccess`]: edge payloads, endpoints and adjacency by id,
- [`EdgeAccessMut`]: mutable edge payloads (used by the flow algorithms to store flows).
*/

use itertools::Itertools;

use crate::{edge::*, node::*};

/// Provides getters pertaining to the vertex-size of a graph
pub trait GraphOrder {
    /// Type of the vertex values
    type Vertex: Vertex;

    /// Returns the number of vertices of the graph
    fn number_of_vertices(&self) -> NumVertices;

    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;

    /// Returns an upper bound on all vertex ids (exclusive).
    /// Tables indexed by [`VertexId`] need this many entries.
    fn vertex_bound(&self) -> usize;

    /// Returns an iterator over the ids of all vertices
    fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_;

    /// Returns the id of a vertex or `None` if the vertex is unknown
    fn id_of(&self, v: &Self::Vertex) -> Option<VertexId>;

    /// Returns the vertex value stored under an id
    fn vertex_of(&self, u: VertexId) -> Option<&Self::Vertex>;

    /// Return the number of vertices as usize
    fn len(&self) -> usize {
        self.number_of_vertices() as usize
    }

    /// Returns *true* if the graph has no vertices (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Traits pertaining getters for edges and adjacencies
pub trait EdgeAccess: GraphOrder {
    /// Type of the edge payloads
    type Edge;

    /// Returns the payload of an edge or `None` if `id` is stale
    fn edge_at(&self, id: EdgeId) -> Option<&Self::Edge>;

    /// Returns the ids of source and target of an edge
    fn endpoints_of(&self, id: EdgeId) -> Option<(VertexId, VertexId)>;

    /// Returns an iterator over the ids of all edges
    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_;

    /// Returns an iterator over `(edge, target)` for all edges leaving `u`.
    /// Empty if `u` is not a live vertex.
    fn out_edges_of(&self, u: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_;

    /// Returns an iterator over `(edge, source)` for all edges entering `u`.
    /// Empty if `u` is not a live vertex.
    fn in_edges_of(&self, u: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_;

    /// Returns an iterator over all edges from `u` to `v`
    fn edges_between_ids(&self, u: VertexId, v: VertexId) -> impl Iterator<Item = EdgeId> + '_;

    /// Returns the number of edges leaving `u`
    fn out_degree_of(&self, u: VertexId) -> usize;

    /// Returns the number of edges entering `u`
    fn in_degree_of(&self, u: VertexId) -> usize;

    /// Returns an iterator over the distinct targets of edges leaving `u`
    fn out_neighbors_of(&self, u: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.out_edges_of(u).map(|(_, v)| v).unique()
    }

    /// Returns the weight of an edge
    fn weight_of(&self, id: EdgeId) -> Option<f64>
    where
        Self::Edge: Weighted,
    {
        self.edge_at(id).map(Weighted::weight)
    }

    /// Returns an iterator over `(edge, source, target, weight)` for all edges
    fn weighted_edges(&self) -> impl Iterator<Item = (EdgeId, VertexId, VertexId, f64)> + '_
    where
        Self::Edge: Weighted,
    {
        self.edge_ids().filter_map(|id| {
            let (u, v) = self.endpoints_of(id)?;
            Some((id, u, v, self.weight_of(id)?))
        })
    }
}

/// Provides mutable access to edge payloads
pub trait EdgeAccessMut: EdgeAccess {
    /// Returns the payload of an edge for mutation or `None` if `id` is stale.
    /// ** Implementations may assume that the endpoints of the payload are not changed **
    fn edge_at_mut(&mut self, id: EdgeId) -> Option<&mut Self::Edge>;
}
