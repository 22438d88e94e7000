/*!
# Bellman-Ford

Single-source shortest paths for arbitrary real edge weights. Runs up to `|V| - 1` rounds of
relaxing every edge whose source already has a finite distance and stops early once a round
changes nothing. An optional verification pass (on by default) reports a negative cycle
reachable from the source as [`GraphError::NegativeCycle`].
*/

use itertools::Itertools;
use tracing::debug;

use super::{dijkstra::SearchTree, *};

/// Bellman-Ford shortest paths.
///
/// # Examples
/// ```
/// use dgraphs::{prelude::*, algo::*};
///
/// let graph = WeightedGraph::from_edges(
///     GraphConfig::simple(),
///     [(0, 1, 4.0), (0, 2, 1.0), (2, 1, -2.0)],
/// );
///
/// let paths = BellmanFord::new().run(&graph, &0).unwrap();
/// assert_eq!(paths[&1].distance(), -1.0);
/// assert_eq!(paths[&1].vertices(), &[0, 2, 1]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BellmanFord {
    check_negative_cycles: bool,
}

impl Default for BellmanFord {
    fn default() -> Self {
        Self {
            check_negative_cycles: true,
        }
    }
}

impl BellmanFord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the final negative-cycle verification pass
    pub fn set_check_negative_cycles(&mut self, check: bool) {
        self.check_negative_cycles = check;
    }

    /// Enables or disables the final negative-cycle verification pass
    pub fn check_negative_cycles(mut self, check: bool) -> Self {
        self.set_check_negative_cycles(check);
        self
    }

    /// Computes shortest paths from `source` to every vertex. Unreachable vertices map to a
    /// path of distance `+inf`, `source` itself to an empty path of distance `0`.
    ///
    /// # Errors
    /// - [`GraphError::UnknownVertex`] if `source` is not in the graph,
    /// - [`GraphError::NegativeCycle`] if a negative cycle is reachable from `source`. Without
    ///   verification pass this error can still surface while reconstructing a path running
    ///   into the cycle.
    #[tracing::instrument(level = "debug", skip_all, fields(source = ?source))]
    pub fn run<G>(&self, graph: &G, source: &G::Vertex) -> Result<ShortestPaths<G::Vertex>>
    where
        G: EdgeAccess,
        G::Edge: Weighted,
    {
        let s = graph.id_of(source).ok_or_else(|| unknown_vertex(source))?;
        let tree = self.search(graph, s)?;

        let builder = PathBuilder::new(graph);
        let mut paths = ShortestPaths::default();
        for t in graph.vertex_ids() {
            if let Some(path) = builder.build_weighted(s, t, &tree.predecessors)? {
                paths.insert(path.target().clone(), path);
            }
        }
        Ok(paths)
    }

    /// Computes the distance and predecessor tables from `source`
    pub(crate) fn search<G>(&self, graph: &G, source: VertexId) -> Result<SearchTree>
    where
        G: EdgeAccess,
        G::Edge: Weighted,
    {
        let edges = graph.weighted_edges().collect_vec();
        let (distances, predecessors) = relax_all(
            graph.vertex_bound(),
            &edges,
            graph.len().saturating_sub(1),
            |d| d[source as usize] = 0.0,
        );

        if self.check_negative_cycles && has_improvable_edge(&distances, &edges) {
            debug!("negative cycle detected");
            return Err(GraphError::NegativeCycle);
        }

        Ok(SearchTree {
            distances,
            predecessors,
        })
    }
}

/// Runs up to `rounds` relaxation rounds over `edges` on distances initialized to `+inf` and
/// then adjusted by `init`. Edges leaving vertices at `+inf` are skipped.
pub(crate) fn relax_all<I>(
    bound: usize,
    edges: &[(EdgeId, VertexId, VertexId, f64)],
    rounds: usize,
    init: I,
) -> (Vec<f64>, Vec<Option<EdgeId>>)
where
    I: FnOnce(&mut [f64]),
{
    let mut distances = vec![f64::INFINITY; bound];
    let mut predecessors = vec![None; bound];
    init(&mut distances);

    let mut performed = 0;
    for _ in 0..rounds {
        performed += 1;
        let mut changed = false;
        for &(e, u, v, w) in edges {
            let du = distances[u as usize];
            if du < f64::INFINITY && du + w < distances[v as usize] {
                distances[v as usize] = du + w;
                predecessors[v as usize] = Some(e);
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    debug!(rounds = performed, edges = edges.len(), "relaxation finished");
    (distances, predecessors)
}

/// Returns *true* if some edge could still be relaxed
pub(crate) fn has_improvable_edge(
    distances: &[f64],
    edges: &[(EdgeId, VertexId, VertexId, f64)],
) -> bool {
    edges.iter().any(|&(_, u, v, w)| {
        let du = distances[u as usize];
        du < f64::INFINITY && du + w < distances[v as usize]
    })
}
