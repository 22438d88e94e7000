/*!
# Vertex Representation

Vertices are caller-supplied values: anything that is `Eq + Hash + Clone + Debug` can be used.
The store keeps exactly one copy of every vertex and interns it into a dense slot index,
the [`VertexId`]. Slots are re-used after a vertex is removed, so a `VertexId` is only
meaningful as long as the graph is not structurally modified.

We choose `VertexId = u32` as graphs with more than `2^32` vertices do not fit the in-memory
use-case of this crate anyway, and it halves the size of the per-run tables compared to `usize`.
*/

use std::{fmt::Debug, hash::Hash};

use stream_bitset::bitset::BitSetImpl;

/// Marker trait for types usable as vertices
pub trait Vertex: Eq + Hash + Clone + Debug {}

impl<T> Vertex for T where T: Eq + Hash + Clone + Debug {}

/// Dense slot index of an interned vertex
pub type VertexId = u32;

/// There can be at most `2^32 - 1` vertices in a graph!
pub type NumVertices = u32;

/// BitSet over vertex ids
pub type VertexBitSet = BitSetImpl<VertexId>;
