/*!
# Edge Views

An [`EdgeView`] is a handle onto one of the per-vertex or per-pair edge sets of a
[`GraphStore`]. It does not borrow the store: queries and mutations go through the store and
take the view as an argument, so a view can be kept while the store changes.

Each backing set carries an epoch assigned when it was created. A view remembers the epoch it
was obtained for; once the backing set disappears (vertex removed, bundle emptied, store
cleared) any set re-created later gets a new epoch and the view stays *detached* for good.
*/

use tracing::trace;

use super::GraphStore;
use crate::{edge::*, node::*, ops::*};

/// The edge set a view is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewScope {
    /// All edges leaving a vertex
    Outgoing(VertexId),
    /// All edges entering a vertex
    Incoming(VertexId),
    /// All edges from the first to the second vertex
    Bundle(VertexId, VertexId),
}

/// Handle onto a live edge set of a [`GraphStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeView {
    scope: ViewScope,
    epoch: u64,
}

impl EdgeView {
    /// Returns the edge set this view is scoped to
    pub fn scope(&self) -> ViewScope {
        self.scope
    }
}

impl<V, E> GraphStore<V, E>
where
    V: Vertex,
    E: DirectedEdge<V>,
{
    /// Returns a view onto all edges leaving `v`, or `None` if `v` is unknown
    pub fn outgoing_view(&self, v: &V) -> Option<EdgeView> {
        let u = self.id_of(v)?;
        Some(EdgeView {
            scope: ViewScope::Outgoing(u),
            epoch: self.slot(u)?.epoch,
        })
    }

    /// Returns a view onto all edges entering `v`, or `None` if `v` is unknown
    pub fn incoming_view(&self, v: &V) -> Option<EdgeView> {
        let u = self.id_of(v)?;
        Some(EdgeView {
            scope: ViewScope::Incoming(u),
            epoch: self.slot(u)?.epoch,
        })
    }

    /// Returns a view onto all edges from `u` to `v`, or `None` if there is no such edge
    pub fn bundle_view(&self, u: &V, v: &V) -> Option<EdgeView> {
        let (s, t) = (self.id_of(u)?, self.id_of(v)?);
        Some(EdgeView {
            scope: ViewScope::Bundle(s, t),
            epoch: self.slot(s)?.out.get(&t)?.epoch,
        })
    }

    /// Returns *true* if the backing set of `view` still exists
    pub fn view_is_live(&self, view: &EdgeView) -> bool {
        match view.scope {
            ViewScope::Outgoing(u) | ViewScope::Incoming(u) => {
                self.slot(u).is_some_and(|slot| slot.epoch == view.epoch)
            }
            ViewScope::Bundle(s, t) => self
                .slot(s)
                .and_then(|slot| slot.out.get(&t))
                .is_some_and(|bundle| bundle.epoch == view.epoch),
        }
    }

    /// Returns the number of edges in the view; `0` if detached
    pub fn view_len(&self, view: &EdgeView) -> usize {
        if !self.view_is_live(view) {
            return 0;
        }

        match view.scope {
            ViewScope::Outgoing(u) => self.out_degree_of(u),
            ViewScope::Incoming(u) => self.in_degree_of(u),
            ViewScope::Bundle(s, t) => self.edges_between_ids(s, t).count(),
        }
    }

    /// Iterates over the ids of all edges in the view; empty if detached
    pub fn view_edges(&self, view: &EdgeView) -> impl Iterator<Item = EdgeId> + '_ {
        let live = self.view_is_live(view);
        let (outgoing, incoming, bundle) = match view.scope {
            ViewScope::Outgoing(u) => (Some(u), None, None),
            ViewScope::Incoming(u) => (None, Some(u), None),
            ViewScope::Bundle(s, t) => (None, None, Some((s, t))),
        };

        let outgoing = outgoing.filter(|_| live).into_iter();
        let incoming = incoming.filter(|_| live).into_iter();
        let bundle = bundle.filter(|_| live).into_iter();

        outgoing
            .flat_map(|u| self.out_edges_of(u).map(|(id, _)| id))
            .chain(incoming.flat_map(|u| self.in_edges_of(u).map(|(id, _)| id)))
            .chain(bundle.flat_map(|(s, t)| self.edges_between_ids(s, t)))
    }

    /// Returns *true* if the view is live and `id` is one of its edges
    pub fn view_contains(&self, view: &EdgeView, id: EdgeId) -> bool {
        self.view_is_live(view)
            && self
                .endpoints_of(id)
                .is_some_and(|(s, t)| Self::in_scope(view.scope, s, t))
    }

    /// Adds an edge through the view. Fails (returns *false*) if the view is detached, if the
    /// endpoints of `edge` do not match the scope of the view, or if the store rejects the edge.
    pub fn view_add(&mut self, view: &EdgeView, edge: E) -> bool {
        if !self.view_is_live(view) {
            trace!(scope = ?view.scope, "add through detached view");
            return false;
        }

        // Endpoints outside the graph can only match an outgoing/incoming scope on the far side
        let s = self.id_of(edge.source());
        let t = self.id_of(edge.target());
        let matches = match view.scope {
            ViewScope::Outgoing(u) => s == Some(u),
            ViewScope::Incoming(u) => t == Some(u),
            ViewScope::Bundle(u, v) => s == Some(u) && t == Some(v),
        };

        matches && self.add_edge(edge)
    }

    /// Removes an edge through the view. Returns *false* if the view is detached or the edge
    /// is not part of it.
    pub fn view_remove(&mut self, view: &EdgeView, id: EdgeId) -> bool {
        self.view_contains(view, id) && self.remove_edge(id)
    }

    /// Removes all edges of the view. Clearing a bundle view detaches it.
    /// Returns *true* if at least one edge was removed.
    pub fn view_clear(&mut self, view: &EdgeView) -> bool {
        let doomed: Vec<EdgeId> = self.view_edges(view).collect();
        self.remove_all_edges(doomed)
    }

    fn in_scope(scope: ViewScope, s: VertexId, t: VertexId) -> bool {
        match scope {
            ViewScope::Outgoing(u) => s == u,
            ViewScope::Incoming(u) => t == u,
            ViewScope::Bundle(u, v) => s == u && t == v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::*;

    fn graph() -> Digraph<&'static str> {
        Digraph::from_edges(
            GraphConfig::multi(),
            [("a", "b"), ("a", "b"), ("a", "c"), ("c", "b")],
        )
    }

    #[test]
    fn views_follow_the_store() {
        let mut graph = graph();
        let out = graph.outgoing_view(&"a").unwrap();
        let inc = graph.incoming_view(&"b").unwrap();
        let bundle = graph.bundle_view(&"a", &"b").unwrap();

        assert_eq!(graph.view_len(&out), 3);
        assert_eq!(graph.view_len(&inc), 3);
        assert_eq!(graph.view_len(&bundle), 2);

        // mutation through the store shows up in every view
        graph.add_edge(Edge::new("a", "b"));
        assert_eq!(graph.view_len(&out), 4);
        assert_eq!(graph.view_len(&inc), 4);
        assert_eq!(graph.view_edges(&bundle).count(), 3);

        // mutation through a view shows up in the store and in other views
        let id = graph.view_edges(&bundle).next().unwrap();
        assert!(graph.view_remove(&out, id));
        assert!(!graph.contains_edge(id));
        assert_eq!(graph.view_len(&inc), 3);
        assert_eq!(graph.size_of_edges(), 4);
        graph.validate().unwrap();
    }

    #[test]
    fn add_through_view_checks_scope() {
        let mut graph = graph();
        let out = graph.outgoing_view(&"c").unwrap();
        let bundle = graph.bundle_view(&"c", &"b").unwrap();

        assert!(!graph.view_add(&out, Edge::new("a", "d")));
        assert!(graph.view_add(&out, Edge::new("c", "d")));
        assert!(graph.contains_vertex(&"d"));

        assert!(!graph.view_add(&bundle, Edge::new("c", "d")));
        assert!(graph.view_add(&bundle, Edge::new("c", "b")));
        assert_eq!(graph.view_len(&bundle), 2);
        graph.validate().unwrap();
    }

    #[test]
    fn remove_through_view_checks_membership() {
        let mut graph = graph();
        let inc = graph.incoming_view(&"c").unwrap();
        let (foreign, _) = graph.edges_between(&"c", &"b").next().unwrap();

        assert!(!graph.view_remove(&inc, foreign));
        assert!(graph.contains_edge(foreign));
        assert!(graph.view_clear(&inc));
        assert_eq!(graph.in_degree(&"c"), Some(0));
        assert!(!graph.view_clear(&inc));
    }

    #[test]
    fn emptied_bundle_detaches() {
        let mut graph = graph();
        let bundle = graph.bundle_view(&"a", &"b").unwrap();

        assert!(graph.view_clear(&bundle));
        assert!(!graph.view_is_live(&bundle));
        assert!(graph.bundle_view(&"a", &"b").is_none());

        // a detached bundle is never resurrected through the old handle
        assert!(!graph.view_add(&bundle, Edge::new("a", "b")));
        assert_eq!(graph.view_edges(&bundle).count(), 0);
        assert!(!graph.contains_edge_between(&"a", &"b"));

        // re-creating the pair through the store yields a new, independent bundle
        graph.add_edge(Edge::new("a", "b"));
        assert!(!graph.view_is_live(&bundle));
        assert_eq!(graph.view_len(&bundle), 0);
        let fresh = graph.bundle_view(&"a", &"b").unwrap();
        assert_eq!(graph.view_len(&fresh), 1);
        graph.validate().unwrap();
    }

    #[test]
    fn removed_vertex_detaches_views() {
        let mut graph = graph();
        let out = graph.outgoing_view(&"c").unwrap();
        let inc = graph.incoming_view(&"c").unwrap();

        assert!(graph.remove_vertex(&"c"));
        assert!(!graph.view_is_live(&out));
        assert!(!graph.view_is_live(&inc));

        // the slot of "c" is re-used by "x", old views must not see it
        graph.add_edge(Edge::new("x", "a"));
        assert_eq!(graph.view_len(&out), 0);
        assert!(!graph.view_add(&out, Edge::new("x", "b")));
        assert_eq!(graph.size_of_edges(), 3);

        let cleared = graph.outgoing_view(&"a").unwrap();
        graph.clear();
        assert!(!graph.view_is_live(&cleared));
        graph.validate().unwrap();
    }
}
