/*!
# Paths

Result types of the path searches and the [`PathBuilder`] that turns a predecessor map
(vertex -> edge it was reached by) into an ordered path.

A [`WeightedPath`] additionally carries the total distance: the sum of its edge weights,
`0` if source and target coincide and `+inf` if the target is unreachable.
*/

use std::fmt::Display;

use itertools::Itertools;

use super::*;

/// An ordered sequence of edges from `source` to `target`
#[derive(Debug, Clone, PartialEq)]
pub struct Path<V> {
    source: V,
    target: V,
    edges: Vec<EdgeId>,
    vertices: Vec<V>,
}

impl<V> Path<V> {
    /// Returns the first vertex of the path
    pub fn source(&self) -> &V {
        &self.source
    }

    /// Returns the last vertex of the path
    pub fn target(&self) -> &V {
        &self.target
    }

    /// Returns the edges of the path in order
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Returns the vertices of the path in order (`edges().len() + 1` many if reachable)
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Returns the number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns *true* if the path has no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<V: Display> Display for Path<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Path:[{}]", self.vertices.iter().join(", "))
    }
}

/// A [`Path`] together with its total distance
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPath<V> {
    path: Path<V>,
    distance: f64,
}

impl<V> WeightedPath<V> {
    /// Creates the path for a target that cannot be reached from `source`
    pub fn unreachable(source: V, target: V) -> Self {
        Self {
            path: Path {
                source,
                target,
                edges: Vec::new(),
                vertices: Vec::new(),
            },
            distance: f64::INFINITY,
        }
    }

    /// Returns the total distance of the path; `+inf` if unreachable
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns *true* if the target can be reached
    pub fn is_reachable(&self) -> bool {
        self.distance < f64::INFINITY
    }

    /// Returns the underlying unweighted path
    pub fn path(&self) -> &Path<V> {
        &self.path
    }

    /// Consumes `self` and returns the underlying unweighted path
    pub fn into_path(self) -> Path<V> {
        self.path
    }

    pub fn source(&self) -> &V {
        self.path.source()
    }

    pub fn target(&self) -> &V {
        self.path.target()
    }

    pub fn edges(&self) -> &[EdgeId] {
        self.path.edges()
    }

    pub fn vertices(&self) -> &[V] {
        self.path.vertices()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

impl<V: Display> Display for WeightedPath<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Path({:.2}):[{}]",
            self.distance,
            self.path.vertices.iter().join(", ")
        )
    }
}

/// Reconstructs paths from predecessor maps
pub struct PathBuilder<'a, G> {
    graph: &'a G,
}

impl<'a, G> PathBuilder<'a, G>
where
    G: EdgeAccess,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Walks backwards from `target` following `predecessor` until `source` is reached.
    /// Returns `Ok(None)` if the walk hits a vertex without predecessor.
    ///
    /// # Errors
    /// [`GraphError::NegativeCycle`] if the predecessor map contains a cycle
    /// (which only happens if distances were computed on a graph with a negative cycle).
    pub fn build_with<P>(
        &self,
        source: VertexId,
        target: VertexId,
        predecessor: P,
    ) -> Result<Option<Path<G::Vertex>>>
    where
        P: Fn(VertexId) -> Option<EdgeId>,
    {
        let (Some(s), Some(t)) = (self.graph.vertex_of(source), self.graph.vertex_of(target))
        else {
            return Ok(None);
        };

        let mut edges = Vec::new();
        let mut vertices = vec![t.clone()];
        let mut v = target;
        while v != source {
            let Some(e) = predecessor(v) else {
                return Ok(None);
            };
            let Some((u, _)) = self.graph.endpoints_of(e) else {
                return Ok(None);
            };

            if edges.len() >= self.graph.len() {
                return Err(GraphError::NegativeCycle);
            }

            edges.push(e);
            if let Some(x) = self.graph.vertex_of(u) {
                vertices.push(x.clone());
            }
            v = u;
        }

        edges.reverse();
        vertices.reverse();

        Ok(Some(Path {
            source: s.clone(),
            target: t.clone(),
            edges,
            vertices,
        }))
    }

    /// Like [`PathBuilder::build_with`] with a predecessor table indexed by [`VertexId`]
    pub fn build(
        &self,
        source: VertexId,
        target: VertexId,
        predecessors: &[Option<EdgeId>],
    ) -> Result<Option<Path<G::Vertex>>> {
        self.build_with(source, target, |v| {
            predecessors.get(v as usize).copied().flatten()
        })
    }

    /// Builds the weighted path from `source` to `target`. The distance is the sum of the
    /// edge weights along the path; unreachable targets get an empty path of distance `+inf`.
    ///
    /// # Errors
    /// As [`PathBuilder::build_with`].
    pub fn build_weighted_with<P>(
        &self,
        source: VertexId,
        target: VertexId,
        predecessor: P,
    ) -> Result<Option<WeightedPath<G::Vertex>>>
    where
        P: Fn(VertexId) -> Option<EdgeId>,
        G::Edge: Weighted,
    {
        let (Some(s), Some(t)) = (self.graph.vertex_of(source), self.graph.vertex_of(target))
        else {
            return Ok(None);
        };

        Ok(Some(match self.build_with(source, target, predecessor)? {
            Some(path) => {
                let distance = path
                    .edges
                    .iter()
                    .filter_map(|&e| self.graph.weight_of(e))
                    .sum();
                WeightedPath { path, distance }
            }
            None => WeightedPath::unreachable(s.clone(), t.clone()),
        }))
    }

    /// Like [`PathBuilder::build_weighted_with`] with a predecessor table indexed by [`VertexId`]
    pub fn build_weighted(
        &self,
        source: VertexId,
        target: VertexId,
        predecessors: &[Option<EdgeId>],
    ) -> Result<Option<WeightedPath<G::Vertex>>>
    where
        G::Edge: Weighted,
    {
        self.build_weighted_with(source, target, |v| {
            predecessors.get(v as usize).copied().flatten()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstruct_from_predecessors() {
        let mut graph = WeightedGraph::new(GraphConfig::simple());
        let a = graph.insert_edge(WeightedEdge::new(0, 1, 1.5)).unwrap();
        let b = graph.insert_edge(WeightedEdge::new(1, 2, 2.0)).unwrap();
        graph.add_edge(WeightedEdge::new(0, 2, 9.0));

        let id = |v: u32| graph.id_of(&v).unwrap();
        let mut pred = vec![None; graph.vertex_bound()];
        pred[id(1) as usize] = Some(a);
        pred[id(2) as usize] = Some(b);

        let builder = PathBuilder::new(&graph);
        let path = builder
            .build_weighted(id(0), id(2), &pred)
            .unwrap()
            .unwrap();
        assert_eq!(path.edges(), &[a, b]);
        assert_eq!(path.vertices(), &[0, 1, 2]);
        assert_eq!(path.distance(), 3.5);
        assert!(path.is_reachable());
        assert_eq!(path.to_string(), "Path(3.50):[0, 1, 2]");

        let trivial = builder.build_weighted(id(1), id(1), &pred).unwrap().unwrap();
        assert_eq!(trivial.distance(), 0.0);
        assert!(trivial.is_empty());
        assert_eq!(trivial.vertices(), &[1]);

        let unreachable = builder.build_weighted(id(2), id(0), &pred).unwrap().unwrap();
        assert_eq!(unreachable.distance(), f64::INFINITY);
        assert!(!unreachable.is_reachable());
        assert_eq!(*unreachable.target(), 0);
    }

    #[test]
    fn predecessor_cycle_is_reported() {
        let mut graph = WeightedGraph::new(GraphConfig::simple());
        let a = graph.insert_edge(WeightedEdge::new(1, 2, -1.0)).unwrap();
        let b = graph.insert_edge(WeightedEdge::new(2, 1, -1.0)).unwrap();
        graph.add_vertex(0);

        let id = |v: u32| graph.id_of(&v).unwrap();
        let mut pred = vec![None; graph.vertex_bound()];
        pred[id(1) as usize] = Some(b);
        pred[id(2) as usize] = Some(a);

        let result = PathBuilder::new(&graph).build(id(0), id(2), &pred);
        assert_eq!(result, Err(GraphError::NegativeCycle));
    }
}
