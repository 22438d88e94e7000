/*!
# Johnson

All-pairs shortest paths for sparse graphs with negative weights. A Bellman-Ford style pass
from a virtual source (every vertex starts at potential `0`, no dummy vertex is inserted)
computes potentials `h`. Reweighting every edge to `w + h(source) - h(target)` makes all
weights non-negative, after which Dijkstra runs from every vertex.
*/

use itertools::Itertools;
use tracing::debug;

use super::{bellman_ford::*, dijkstra::best_first_search, *};

/// Johnson's all-pairs shortest paths.
///
/// # Examples
/// ```
/// use dgraphs::{prelude::*, algo::*};
///
/// let graph = WeightedGraph::from_edges(
///     GraphConfig::simple(),
///     [(0, 1, 3.0), (1, 2, -1.0), (0, 2, 4.0)],
/// );
///
/// let paths = Johnson::new().run(&graph).unwrap();
/// assert_eq!(paths[&0][&2].distance(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Johnson;

impl Johnson {
    pub fn new() -> Self {
        Self
    }

    /// Computes the vertex potentials, indexed by [`VertexId`].
    ///
    /// # Errors
    /// [`GraphError::NegativeCycle`] if the graph contains a negative cycle.
    pub fn potentials<G>(&self, graph: &G) -> Result<Vec<f64>>
    where
        G: EdgeAccess,
        G::Edge: Weighted,
    {
        let edges = graph.weighted_edges().collect_vec();
        let (potentials, _) = relax_all(
            graph.vertex_bound(),
            &edges,
            graph.len().saturating_sub(1),
            |d| d.fill(0.0),
        );

        if has_improvable_edge(&potentials, &edges) {
            debug!("negative cycle detected");
            return Err(GraphError::NegativeCycle);
        }
        Ok(potentials)
    }

    /// Computes shortest paths between all ordered pairs of vertices.
    /// Unreachable pairs map to a path of distance `+inf`.
    ///
    /// # Errors
    /// [`GraphError::NegativeCycle`] if the graph contains a negative cycle.
    #[tracing::instrument(level = "debug", skip_all, fields(vertices = graph.len()))]
    pub fn run<G>(&self, graph: &G) -> Result<AllPairs<G::Vertex>>
    where
        G: EdgeAccess,
        G::Edge: Weighted,
    {
        let h = self.potentials(graph)?;

        let builder = PathBuilder::new(graph);
        let mut all_pairs = AllPairs::default();
        for s in graph.vertex_ids() {
            // Reduced weights are non-negative up to rounding
            let tree = best_first_search(
                graph,
                s,
                None,
                "Johnson",
                |e, u, v| {
                    let w = graph.weight_of(e).unwrap_or(f64::INFINITY);
                    (w + h[u as usize] - h[v as usize]).max(0.0)
                },
                |_| 0.0,
            )?;

            let mut paths = ShortestPaths::default();
            for t in graph.vertex_ids() {
                if let Some(path) = builder.build_weighted(s, t, &tree.predecessors)? {
                    paths.insert(path.target().clone(), path);
                }
            }
            if let Some(source) = graph.vertex_of(s) {
                all_pairs.insert(source.clone(), paths);
            }
        }

        Ok(all_pairs)
    }
}
