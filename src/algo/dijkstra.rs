/*!
# Dijkstra and A*

Single-source shortest paths for graphs with non-negative edge weights, driven by a
[`FibonacciHeap`] keyed by tentative distance. With a heuristic configured, the heap is keyed
by `distance + heuristic(vertex, target)` instead (A*); the distance table always holds the
true distances.

A negative weight encountered during relaxation aborts the search with
[`GraphError::NegativeWeight`].
*/

use tracing::debug;

use super::*;

/// Distance and predecessor tables of a single-source search, indexed by [`VertexId`]
pub(crate) struct SearchTree {
    pub(crate) distances: Vec<f64>,
    pub(crate) predecessors: Vec<Option<EdgeId>>,
}

/// Heap-driven best-first search from `source`. Stops once `target` is extracted (if given).
/// `weight` yields the weight of an edge given its id and endpoints; `heuristic` is added to
/// the heap priority of every vertex.
pub(crate) fn best_first_search<G, W, H>(
    graph: &G,
    source: VertexId,
    target: Option<VertexId>,
    algorithm: &'static str,
    weight: W,
    heuristic: H,
) -> Result<SearchTree>
where
    G: EdgeAccess,
    W: Fn(EdgeId, VertexId, VertexId) -> f64,
    H: Fn(VertexId) -> f64,
{
    let n = graph.vertex_bound();
    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors = vec![None; n];
    let mut handles: Vec<Option<HeapHandle>> = vec![None; n];
    let mut heap = FibonacciHeap::with_capacity(graph.len());

    distances[source as usize] = 0.0;
    handles[source as usize] = Some(heap.enqueue(source, heuristic(source))?);

    let mut settled = 0usize;
    while let Some(min) = heap.dequeue_min() {
        let u = min.value;
        settled += 1;
        if Some(u) == target {
            break;
        }

        for (e, v) in graph.out_edges_of(u) {
            let w = weight(e, u, v);
            if w < 0.0 {
                return Err(GraphError::NegativeWeight {
                    algorithm,
                    weight: w,
                });
            }

            let candidate = distances[u as usize] + w;
            if candidate < distances[v as usize] {
                distances[v as usize] = candidate;
                predecessors[v as usize] = Some(e);

                let priority = candidate + heuristic(v);
                match handles[v as usize] {
                    Some(handle) if !heap.is_dequeued(handle)? => {
                        heap.decrease_key(handle, priority)?
                    }
                    _ => handles[v as usize] = Some(heap.enqueue(v, priority)?),
                }
            }
        }
    }

    debug!(algorithm, settled, "best-first search finished");
    Ok(SearchTree {
        distances,
        predecessors,
    })
}

/// Dijkstra's algorithm, optionally guided by a heuristic (A*).
///
/// # Examples
/// ```
/// use dgraphs::{prelude::*, algo::*};
///
/// let graph = WeightedGraph::from_edges(
///     GraphConfig::simple(),
///     [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)],
/// );
///
/// let path = Dijkstra::new().run(&graph, &0, &2).unwrap().unwrap();
/// assert_eq!(path.distance(), 2.0);
/// assert_eq!(path.vertices(), &[0, 1, 2]);
/// ```
pub struct Dijkstra<'h, V> {
    heuristic: Option<Box<dyn Fn(&V, &V) -> f64 + 'h>>,
}

impl<V> Default for Dijkstra<'_, V> {
    fn default() -> Self {
        Self { heuristic: None }
    }
}

impl<'h, V: Vertex> Dijkstra<'h, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the heuristic `h(vertex, target)` turning the search into A*.
    /// For optimal results it must never overestimate the remaining distance.
    pub fn set_heuristic<H>(&mut self, heuristic: H)
    where
        H: Fn(&V, &V) -> f64 + 'h,
    {
        self.heuristic = Some(Box::new(heuristic));
    }

    /// Sets the heuristic `h(vertex, target)` turning the search into A*.
    pub fn with_heuristic<H>(mut self, heuristic: H) -> Self
    where
        H: Fn(&V, &V) -> f64 + 'h,
    {
        self.set_heuristic(heuristic);
        self
    }

    fn name(&self) -> &'static str {
        if self.heuristic.is_some() {
            "A*"
        } else {
            "Dijkstra"
        }
    }

    /// Computes a shortest path from `source` to `target`.
    /// Returns `Ok(None)` if `target` cannot be reached.
    ///
    /// # Errors
    /// - [`GraphError::UnknownVertex`] if `source` or `target` is not in the graph,
    /// - [`GraphError::NegativeWeight`] if a negative edge weight is relaxed,
    /// - [`GraphError::InvalidPriority`] if the heuristic returns NaN.
    #[tracing::instrument(level = "debug", skip_all, fields(algorithm = self.name(), source = ?source, target = ?target))]
    pub fn run<G>(&self, graph: &G, source: &V, target: &V) -> Result<Option<WeightedPath<V>>>
    where
        G: EdgeAccess<Vertex = V>,
        G::Edge: Weighted,
    {
        let s = graph.id_of(source).ok_or_else(|| unknown_vertex(source))?;
        let t = graph.id_of(target).ok_or_else(|| unknown_vertex(target))?;

        let tree = best_first_search(
            graph,
            s,
            Some(t),
            self.name(),
            |e, _, _| graph.weight_of(e).unwrap_or(f64::INFINITY),
            |v| match (&self.heuristic, graph.vertex_of(v)) {
                (Some(h), Some(x)) => h(x, target),
                _ => 0.0,
            },
        )?;

        if tree.distances[t as usize] == f64::INFINITY {
            return Ok(None);
        }
        PathBuilder::new(graph).build_weighted(s, t, &tree.predecessors)
    }

    /// Computes shortest paths from `source` to every vertex of the graph.
    /// Unreachable vertices map to a path of distance `+inf`. The heuristic is not used.
    ///
    /// # Errors
    /// As [`Dijkstra::run`].
    #[tracing::instrument(level = "debug", skip_all, fields(source = ?source))]
    pub fn run_from<G>(&self, graph: &G, source: &V) -> Result<ShortestPaths<V>>
    where
        G: EdgeAccess<Vertex = V>,
        G::Edge: Weighted,
    {
        let s = graph.id_of(source).ok_or_else(|| unknown_vertex(source))?;
        let tree = best_first_search(
            graph,
            s,
            None,
            "Dijkstra",
            |e, _, _| graph.weight_of(e).unwrap_or(f64::INFINITY),
            |_| 0.0,
        )?;

        let builder = PathBuilder::new(graph);
        let mut paths = ShortestPaths::default();
        for t in graph.vertex_ids() {
            if let Some(path) = builder.build_weighted(s, t, &tree.predecessors)? {
                paths.insert(path.target().clone(), path);
            }
        }
        Ok(paths)
    }
}

/// Single-source shortest path algorithms exposed as methods on graphs
pub trait ShortestPath: EdgeAccess + Sized {
    /// Shortest path by Dijkstra's algorithm; see [`Dijkstra::run`]
    fn dijkstra(
        &self,
        source: &Self::Vertex,
        target: &Self::Vertex,
    ) -> Result<Option<WeightedPath<Self::Vertex>>>
    where
        Self::Edge: Weighted,
    {
        Dijkstra::new().run(self, source, target)
    }

    /// Shortest path by A* with the given heuristic; see [`Dijkstra::with_heuristic`]
    fn astar<H>(
        &self,
        source: &Self::Vertex,
        target: &Self::Vertex,
        heuristic: H,
    ) -> Result<Option<WeightedPath<Self::Vertex>>>
    where
        Self::Edge: Weighted,
        H: Fn(&Self::Vertex, &Self::Vertex) -> f64,
    {
        Dijkstra::new()
            .with_heuristic(heuristic)
            .run(self, source, target)
    }

    /// Shortest paths to all vertices by Bellman-Ford with negative-cycle check;
    /// see [`BellmanFord::run`]
    fn bellman_ford(&self, source: &Self::Vertex) -> Result<ShortestPaths<Self::Vertex>>
    where
        Self::Edge: Weighted,
    {
        BellmanFord::new().run(self, source)
    }
}

impl<G: EdgeAccess> ShortestPath for G {}
