/*!
# Fibonacci Heap

A mergeable min-priority queue with handle-based `decrease_key` and `delete`:

| Operation      | Amortized cost                 |
|----------------|--------------------------------|
| `enqueue`      | O(1)                           |
| `get_min`      | O(1)                           |
| `decrease_key` | O(1)                           |
| `merge`        | O(1) per arena segment moved   |
| `dequeue_min`  | O(log n)                       |
| `delete`       | O(log n)                       |

Nodes live in arena segments owned by the heap; the parent/child/sibling links of the classic
pointer structure are (segment, slot) positions. A heap that never absorbed another one owns a
single segment. [`FibonacciHeap::merge`] moves the segments of the other heap over without
touching their nodes: every segment carries a `base` that is added to the segment part of all
links stored inside it, so shifting a whole segment is a single addition.

Slots of extracted nodes go to a free list and are reused by later enqueues. Every slot has a
generation that is bumped on extraction, so a [`HeapHandle`] of an extracted value is reported
as dequeued and never aliases the value that reuses its slot.

Every handle carries the identity of the heap that issued it. Passing a handle to another heap
is rejected with [`GraphError::ForeignHandle`], with one exception: after a merge, handles of
the absorbed heap remain valid on the merged heap.
*/

use std::sync::atomic::{AtomicU64, Ordering};

use fxhash::FxHashMap;
use num::Float;

use crate::error::{GraphError, Result};

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(0);

fn next_heap_id() -> u64 {
    NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed)
}

/// Opaque handle to a value stored in a [`FibonacciHeap`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HeapHandle {
    heap: u64,
    slot: u32,
    generation: u32,
}

/// A value removed by [`FibonacciHeap::dequeue_min`] together with its final priority
#[derive(Debug, Clone, PartialEq)]
pub struct HeapEntry<T, P> {
    pub handle: HeapHandle,
    pub value: T,
    pub priority: P,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct NodeRef {
    seg: u32,
    slot: u32,
}

struct HeapNode<T, P> {
    // None iff the slot is on the free list
    value: Option<T>,
    priority: P,
    generation: u32,
    // Links are relative to the `base` of the segment holding this node
    parent: Option<NodeRef>,
    child: Option<NodeRef>,
    // Circular doubly-linked sibling list; a singleton points to itself
    left: NodeRef,
    right: NodeRef,
    rank: u32,
    marked: bool,
}

struct Segment<T, P> {
    // Heap that issued the handles of this segment
    origin: u64,
    base: u32,
    nodes: Vec<HeapNode<T, P>>,
    free: Vec<u32>,
}

impl<T, P> Segment<T, P> {
    fn new(origin: u64, capacity: usize) -> Self {
        Self {
            origin,
            base: 0,
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }
}

/// Fibonacci heap over values `T` ordered by priorities `P`.
///
/// # Examples
/// ```
/// use dgraphs::utils::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let a = heap.enqueue("a", 5.0).unwrap();
/// heap.enqueue("b", 3.0).unwrap();
/// heap.decrease_key(a, 1.0).unwrap();
///
/// let min = heap.dequeue_min().unwrap();
/// assert_eq!(min.value, "a");
/// assert_eq!(min.priority, 1.0);
/// assert!(heap.is_dequeued(a).unwrap());
/// assert_eq!(heap.len(), 1);
/// ```
pub struct FibonacciHeap<T, P = f64> {
    id: u64,
    // Segment 0 is always the heap's own segment with base 0
    segments: Vec<Segment<T, P>>,
    origins: FxHashMap<u64, u32>,
    // Segments whose free list may be non-empty
    reusable: Vec<u32>,
    min: Option<NodeRef>,
    size: usize,
}

impl<T, P: Float> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Float> FibonacciHeap<T, P> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty heap with space for `capacity` values without reallocation
    pub fn with_capacity(capacity: usize) -> Self {
        let id = next_heap_id();
        let mut origins = FxHashMap::default();
        origins.insert(id, 0);

        Self {
            id,
            segments: vec![Segment::new(id, capacity)],
            origins,
            reusable: Vec::new(),
            min: None,
            size: 0,
        }
    }

    /// Returns the number of values currently in the heap
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns *true* if the heap holds no values
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the handle of a value with minimum priority
    pub fn get_min(&self) -> Option<HeapHandle> {
        self.min.map(|x| self.handle_of(x))
    }

    /// Inserts `value` with the given priority and returns its handle.
    ///
    /// # Errors
    /// - [`GraphError::InvalidPriority`] if `priority` is NaN,
    /// - [`GraphError::HeapCapacityExceeded`] if the arena segment of this heap already has `2^32` slots.
    pub fn enqueue(&mut self, value: T, priority: P) -> Result<HeapHandle> {
        if priority.is_nan() {
            return Err(GraphError::InvalidPriority);
        }

        let x = self.allocate(priority)?;
        let node = self.node_mut(x);
        node.value = Some(value);
        node.priority = priority;
        node.child = None;
        node.rank = 0;
        node.marked = false;

        self.insert_root(x);
        self.size += 1;

        Ok(self.handle_of(x))
    }

    /// Lowers the priority of the value behind `handle` to `priority`.
    ///
    /// # Errors
    /// - [`GraphError::InvalidPriority`] if `priority` is NaN,
    /// - [`GraphError::ForeignHandle`] if the handle was issued by another heap,
    /// - [`GraphError::DequeuedHandle`] if the value was already extracted,
    /// - [`GraphError::PriorityIncrease`] if `priority` exceeds the current priority.
    pub fn decrease_key(&mut self, handle: HeapHandle, priority: P) -> Result<()> {
        if priority.is_nan() {
            return Err(GraphError::InvalidPriority);
        }

        let x = self.resolve(handle)?;
        let current = self.node(x).priority;
        if priority > current {
            return Err(GraphError::PriorityIncrease {
                current: current.to_f64().unwrap_or(f64::NAN),
                new: priority.to_f64().unwrap_or(f64::NAN),
            });
        }

        self.node_mut(x).priority = priority;
        match self.parent(x) {
            None => {
                if self
                    .min
                    .is_none_or(|m| priority <= self.node(m).priority)
                {
                    self.min = Some(x);
                }
            }
            Some(parent) => {
                if priority >= self.node(parent).priority {
                    return Ok(());
                }
                self.cut(x, parent);
                self.cascading_cut(parent);
            }
        }

        Ok(())
    }

    /// Removes the value behind `handle` from the heap and returns it.
    ///
    /// # Errors
    /// [`GraphError::ForeignHandle`] or [`GraphError::DequeuedHandle`] as for
    /// [`FibonacciHeap::decrease_key`].
    pub fn delete(&mut self, handle: HeapHandle) -> Result<T> {
        let x = self.resolve(handle)?;

        // Equivalent to decreasing the key to negative infinity; the node is forced to the
        // root list even if its parent has negative infinite priority as well
        self.node_mut(x).priority = P::neg_infinity();
        if let Some(parent) = self.parent(x) {
            self.cut(x, parent);
            self.cascading_cut(parent);
        }
        self.min = Some(x);

        self.dequeue_min()
            .map(|entry| entry.value)
            .ok_or_else(|| GraphError::InvariantViolation("deleted node vanished from heap".into()))
    }

    /// Removes a value with minimum priority and returns it with its priority and handle.
    /// The handle is reported as dequeued from now on.
    pub fn dequeue_min(&mut self) -> Option<HeapEntry<T, P>> {
        let z = self.min?;
        let handle = self.handle_of(z);
        let value = self.node_mut(z).value.take()?;
        let priority = self.node(z).priority;

        let mut roots: Vec<NodeRef> = self.siblings(z).into_iter().filter(|&x| x != z).collect();
        if let Some(child) = self.child(z) {
            for x in self.siblings(child) {
                self.set_parent(x, None);
                roots.push(x);
            }
        }
        self.release(z);

        self.size -= 1;
        self.min = None;
        self.consolidate(roots);

        Some(HeapEntry {
            handle,
            value,
            priority,
        })
    }

    /// Moves all values of `other` into `self`. Afterwards, `other` is empty and handles it
    /// issued before the merge are valid on `self` (and foreign to `other`).
    ///
    /// The arena segments of `other` are moved over as a whole; no node is copied.
    pub fn merge(&mut self, other: &mut Self) {
        let fresh = next_heap_id();
        let absorbed = std::mem::replace(&mut other.segments, vec![Segment::new(fresh, 0)]);
        other.origins.clear();
        other.origins.insert(fresh, 0);
        other.reusable.clear();
        other.id = fresh;

        // Only the own segment of `other` can be empty and no handle or link names it then
        let skip = u32::from(absorbed.first().is_some_and(|s| s.nodes.is_empty()));
        let shift = (self.segments.len() as u32).wrapping_sub(skip);

        for mut segment in absorbed.into_iter().skip(skip as usize) {
            let seg = self.segments.len() as u32;
            segment.base = segment.base.wrapping_add(shift);
            self.origins.insert(segment.origin, seg);
            if !segment.free.is_empty() {
                self.reusable.push(seg);
            }
            self.segments.push(segment);
        }

        let other_min = other.min.take().map(|m| NodeRef {
            seg: m.seg.wrapping_add(shift),
            slot: m.slot,
        });
        if let Some(other_min) = other_min {
            match self.min {
                None => self.min = Some(other_min),
                Some(m) => {
                    // Concatenate both circular root lists
                    let m_right = self.right(m);
                    let other_left = self.left(other_min);
                    self.set_right(m, other_min);
                    self.set_left(other_min, m);
                    self.set_right(other_left, m_right);
                    self.set_left(m_right, other_left);

                    if self.node(other_min).priority < self.node(m).priority {
                        self.min = Some(other_min);
                    }
                }
            }
        }

        self.size += other.size;
        other.size = 0;
    }

    /// Returns the value behind `handle`
    pub fn value(&self, handle: HeapHandle) -> Result<&T> {
        let x = self.resolve(handle)?;
        self.node(x).value.as_ref().ok_or(GraphError::DequeuedHandle)
    }

    /// Returns the current priority of the value behind `handle`
    pub fn priority(&self, handle: HeapHandle) -> Result<P> {
        self.resolve(handle).map(|x| self.node(x).priority)
    }

    /// Returns *true* if the value behind `handle` was extracted or deleted
    pub fn is_dequeued(&self, handle: HeapHandle) -> Result<bool> {
        let node = self.node(self.locate(handle)?);
        Ok(node.generation != handle.generation || node.value.is_none())
    }

    /// Removes all values. All handles issued so far become foreign to this heap.
    pub fn clear(&mut self) {
        let id = next_heap_id();
        self.segments.truncate(1);
        self.segments[0].origin = id;
        self.segments[0].nodes.clear();
        self.segments[0].free.clear();
        self.origins.clear();
        self.origins.insert(id, 0);
        self.reusable.clear();
        self.min = None;
        self.size = 0;
        self.id = id;
    }

    fn node(&self, x: NodeRef) -> &HeapNode<T, P> {
        &self.segments[x.seg as usize].nodes[x.slot as usize]
    }

    fn node_mut(&mut self, x: NodeRef) -> &mut HeapNode<T, P> {
        &mut self.segments[x.seg as usize].nodes[x.slot as usize]
    }

    /// Turns a link stored in node `x` into a position
    fn decode(&self, x: NodeRef, link: NodeRef) -> NodeRef {
        NodeRef {
            seg: link.seg.wrapping_add(self.segments[x.seg as usize].base),
            slot: link.slot,
        }
    }

    /// Turns a position into a link storable in node `x`
    fn encode(&self, x: NodeRef, target: NodeRef) -> NodeRef {
        NodeRef {
            seg: target.seg.wrapping_sub(self.segments[x.seg as usize].base),
            slot: target.slot,
        }
    }

    fn left(&self, x: NodeRef) -> NodeRef {
        self.decode(x, self.node(x).left)
    }

    fn right(&self, x: NodeRef) -> NodeRef {
        self.decode(x, self.node(x).right)
    }

    fn parent(&self, x: NodeRef) -> Option<NodeRef> {
        self.node(x).parent.map(|p| self.decode(x, p))
    }

    fn child(&self, x: NodeRef) -> Option<NodeRef> {
        self.node(x).child.map(|c| self.decode(x, c))
    }

    fn set_left(&mut self, x: NodeRef, y: NodeRef) {
        let link = self.encode(x, y);
        self.node_mut(x).left = link;
    }

    fn set_right(&mut self, x: NodeRef, y: NodeRef) {
        let link = self.encode(x, y);
        self.node_mut(x).right = link;
    }

    fn set_parent(&mut self, x: NodeRef, parent: Option<NodeRef>) {
        let link = parent.map(|p| self.encode(x, p));
        self.node_mut(x).parent = link;
    }

    fn set_child(&mut self, x: NodeRef, child: Option<NodeRef>) {
        let link = child.map(|c| self.encode(x, c));
        self.node_mut(x).child = link;
    }

    /// Returns a vacant slot, reusing freed ones first
    fn allocate(&mut self, priority: P) -> Result<NodeRef> {
        while let Some(&seg) = self.reusable.last() {
            let free = &mut self.segments[seg as usize].free;
            let slot = free.pop();
            if free.is_empty() {
                self.reusable.pop();
            }
            if let Some(slot) = slot {
                return Ok(NodeRef { seg, slot });
            }
        }

        let own = &mut self.segments[0];
        let slot = u32::try_from(own.nodes.len()).map_err(|_| GraphError::HeapCapacityExceeded)?;
        let x = NodeRef { seg: 0, slot };
        own.nodes.push(HeapNode {
            value: None,
            priority,
            generation: 0,
            parent: None,
            child: None,
            left: x,
            right: x,
            rank: 0,
            marked: false,
        });
        Ok(x)
    }

    /// Returns the slot of an extracted node to the free list
    fn release(&mut self, x: NodeRef) {
        let segment = &mut self.segments[x.seg as usize];
        let node = &mut segment.nodes[x.slot as usize];
        node.value = None;
        node.generation = node.generation.wrapping_add(1);
        node.parent = None;
        node.child = None;
        node.rank = 0;
        node.marked = false;

        if segment.free.is_empty() {
            self.reusable.push(x.seg);
        }
        segment.free.push(x.slot);
    }

    fn handle_of(&self, x: NodeRef) -> HeapHandle {
        HeapHandle {
            heap: self.segments[x.seg as usize].origin,
            slot: x.slot,
            generation: self.node(x).generation,
        }
    }

    /// Finds the slot named by `handle` without checking whether it is still queued
    fn locate(&self, handle: HeapHandle) -> Result<NodeRef> {
        let seg = *self
            .origins
            .get(&handle.heap)
            .ok_or(GraphError::ForeignHandle)?;

        if handle.slot as usize >= self.segments[seg as usize].nodes.len() {
            return Err(GraphError::ForeignHandle);
        }
        Ok(NodeRef {
            seg,
            slot: handle.slot,
        })
    }

    /// Finds the queued node named by `handle`
    fn resolve(&self, handle: HeapHandle) -> Result<NodeRef> {
        let x = self.locate(handle)?;
        let node = self.node(x);
        if node.generation != handle.generation || node.value.is_none() {
            return Err(GraphError::DequeuedHandle);
        }
        Ok(x)
    }

    /// Returns `start` and all its siblings in list order
    fn siblings(&self, start: NodeRef) -> Vec<NodeRef> {
        let mut list = vec![start];
        let mut x = self.right(start);
        while x != start {
            list.push(x);
            x = self.right(x);
        }
        list
    }

    /// Splices `x` into the root list and updates the minimum
    fn insert_root(&mut self, x: NodeRef) {
        self.set_parent(x, None);
        match self.min {
            None => {
                self.set_left(x, x);
                self.set_right(x, x);
                self.min = Some(x);
            }
            Some(m) => {
                let m_right = self.right(m);
                self.set_left(x, m);
                self.set_right(x, m_right);
                self.set_left(m_right, x);
                self.set_right(m, x);

                if self.node(x).priority < self.node(m).priority {
                    self.min = Some(x);
                }
            }
        }
    }

    /// Makes `y` a child of the root `x`
    fn link(&mut self, y: NodeRef, x: NodeRef) {
        self.set_parent(y, Some(x));
        self.node_mut(y).marked = false;

        match self.child(x) {
            None => {
                self.set_left(y, y);
                self.set_right(y, y);
                self.set_child(x, Some(y));
            }
            Some(c) => {
                let c_right = self.right(c);
                self.set_left(y, c);
                self.set_right(y, c_right);
                self.set_left(c_right, y);
                self.set_right(c, y);
            }
        }

        self.node_mut(x).rank += 1;
    }

    /// Merges roots of equal rank until all ranks are distinct and rebuilds the root list
    fn consolidate(&mut self, roots: Vec<NodeRef>) {
        if roots.is_empty() {
            return;
        }

        // ceil(log2(n)) + 1 suffices in most cases; the table grows if a larger rank shows up
        let bound = (usize::BITS - self.size.leading_zeros()) as usize + 1;
        let mut by_rank: Vec<Option<NodeRef>> = vec![None; bound];

        for mut x in roots {
            loop {
                let rank = self.node(x).rank as usize;
                if rank >= by_rank.len() {
                    by_rank.resize(rank + 1, None);
                }

                match by_rank[rank].take() {
                    None => {
                        by_rank[rank] = Some(x);
                        break;
                    }
                    Some(mut y) => {
                        if self.node(y).priority < self.node(x).priority {
                            std::mem::swap(&mut x, &mut y);
                        }
                        self.link(y, x);
                    }
                }
            }
        }

        for x in by_rank.into_iter().flatten() {
            self.insert_root(x);
        }
    }

    /// Moves `x` from the child list of `parent` into the root list
    fn cut(&mut self, x: NodeRef, parent: NodeRef) {
        let right = self.right(x);
        if right == x {
            self.set_child(parent, None);
        } else {
            let left = self.left(x);
            self.set_right(left, right);
            self.set_left(right, left);
            if self.child(parent) == Some(x) {
                self.set_child(parent, Some(right));
            }
        }

        self.node_mut(parent).rank -= 1;
        self.node_mut(x).marked = false;
        self.insert_root(x);
    }

    /// Marks `y` if it lost its first child, cuts it if it already lost one before
    fn cascading_cut(&mut self, mut y: NodeRef) {
        while let Some(parent) = self.parent(y) {
            if !self.node(y).marked {
                self.node_mut(y).marked = true;
                return;
            }
            self.cut(y, parent);
            y = parent;
        }
    }
}

impl<T, P: Float> std::fmt::Debug for FibonacciHeap<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("id", &self.id)
            .field("len", &self.size)
            .field("segments", &self.segments.len())
            .field(
                "min_priority",
                &self.min.and_then(|m| self.node(m).priority.to_f64()),
            )
            .finish()
    }
}
