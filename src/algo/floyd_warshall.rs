/*!
# Floyd-Warshall

All-pairs shortest paths on a dense `|V| x |V|` distance matrix. The matrix starts with `0` on
the diagonal, the lightest parallel edge for every directly connected pair and `+inf`
elsewhere. A second matrix records the last edge of the best known path for every pair and
is updated in lock-step with the distances. A negative diagonal entry after the main loop
signals a negative cycle.
*/

use tracing::debug;

use super::*;

/// Floyd-Warshall all-pairs shortest paths.
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
/// let paths = FloydWarshall::new().run(&graph).unwrap();
/// assert_eq!(paths[&0][&2].distance(), 2.0);
/// assert!(!paths[&2][&0].is_reachable());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydWarshall;

impl FloydWarshall {
    pub fn new() -> Self {
        Self
    }

    /// Computes shortest paths between all ordered pairs of vertices.
    ///
    /// # Errors
    /// [`GraphError::NegativeCycle`] if the graph contains a negative cycle.
    #[tracing::instrument(level = "debug", skip_all, fields(vertices = graph.len()))]
    pub fn run<G>(&self, graph: &G) -> Result<AllPairs<G::Vertex>>
    where
        G: EdgeAccess,
        G::Edge: Weighted,
    {
        let ids: Vec<VertexId> = graph.vertex_ids().collect();
        let n = ids.len();
        let mut index = vec![usize::MAX; graph.vertex_bound()];
        for (i, &u) in ids.iter().enumerate() {
            index[u as usize] = i;
        }

        let mut distances = vec![f64::INFINITY; n * n];
        let mut last_edge: Vec<Option<EdgeId>> = vec![None; n * n];
        for i in 0..n {
            distances[i * n + i] = 0.0;
        }
        for (e, u, v, w) in graph.weighted_edges() {
            let ij = index[u as usize] * n + index[v as usize];
            if w < distances[ij] {
                distances[ij] = w;
                last_edge[ij] = Some(e);
            }
        }

        for k in 0..n {
            for i in 0..n {
                let dik = distances[i * n + k];
                if dik == f64::INFINITY {
                    continue;
                }
                for j in 0..n {
                    let candidate = dik + distances[k * n + j];
                    if candidate < distances[i * n + j] {
                        distances[i * n + j] = candidate;
                        last_edge[i * n + j] = last_edge[k * n + j];
                    }
                }
            }
        }

        if (0..n).any(|i| distances[i * n + i] < 0.0) {
            debug!("negative cycle detected");
            return Err(GraphError::NegativeCycle);
        }

        let builder = PathBuilder::new(graph);
        let mut all_pairs = AllPairs::default();
        for (i, &s) in ids.iter().enumerate() {
            let row = &last_edge[i * n..(i + 1) * n];
            let mut paths = ShortestPaths::default();
            for &t in &ids {
                let path = builder.build_weighted_with(s, t, |v| {
                    index.get(v as usize).and_then(|&j| row.get(j)).copied().flatten()
                })?;
                if let Some(path) = path {
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

/// All-pairs shortest path algorithms exposed as methods on graphs
pub trait AllPairsShortestPaths: EdgeAccess + Sized {
    /// All-pairs shortest paths by Floyd-Warshall; see [`FloydWarshall::run`]
    fn floyd_warshall(&self) -> Result<AllPairs<Self::Vertex>>
    where
        Self::Edge: Weighted,
    {
        FloydWarshall::new().run(self)
    }

    /// All-pairs shortest paths by Johnson's algorithm; see [`Johnson::run`]
    fn johnson(&self) -> Result<AllPairs<Self::Vertex>>
    where
        Self::Edge: Weighted,
    {
        Johnson::new().run(self)
    }
}

impl<G: EdgeAccess> AllPairsShortestPaths for G {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_edges_use_the_lightest() {
        let graph = WeightedGraph::from_edges(
            GraphConfig::multi(),
            [(0, 1, 5.0), (0, 1, 2.0), (0, 1, 3.0), (1, 2, 1.0)],
        );
        let paths = graph.floyd_warshall().unwrap();

        assert_eq!(paths[&0][&1].distance(), 2.0);
        let e = paths[&0][&1].edges()[0];
        assert_eq!(graph.edge(e).unwrap().weight(), 2.0);
        assert_eq!(paths[&0][&2].distance(), 3.0);
        assert_eq!(paths[&0][&2].vertices(), &[0, 1, 2]);
    }

    #[test]
    fn all_pairs_are_present() {
        let mut graph = WeightedGraph::from_edges(
            GraphConfig::simple(),
            [(0, 1, 1.0), (1, 2, -2.0), (2, 3, 1.0), (0, 3, 1.0)],
        );
        graph.add_vertex(4);
        let paths = graph.floyd_warshall().unwrap();

        assert_eq!(paths.len(), 5);
        assert!(paths.values().all(|row| row.len() == 5));
        assert_eq!(paths[&0][&3].distance(), 0.0);
        assert_eq!(paths[&0][&3].len(), 3);
        assert_eq!(paths[&3][&3].distance(), 0.0);
        assert!(!paths[&4][&0].is_reachable());
        assert!(!paths[&0][&4].is_reachable());
    }

    #[test]
    fn negative_cycle_is_detected() {
        let graph = WeightedGraph::from_edges(
            GraphConfig::simple(),
            [(0, 1, 1.0), (1, 2, -2.0), (2, 1, 1.0)],
        );
        assert_eq!(graph.floyd_warshall(), Err(GraphError::NegativeCycle));
    }

    #[test]
    fn negative_loop_is_a_negative_cycle() {
        let graph = WeightedGraph::from_edges(
            GraphConfig::simple().with_loops(true),
            [(0, 1, 1.0), (1, 1, -0.5)],
        );
        assert_eq!(graph.floyd_warshall(), Err(GraphError::NegativeCycle));
    }
}
