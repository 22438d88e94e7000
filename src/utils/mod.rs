/*!
# Utilities

Data structures the algorithms are built on. Currently this is the [`FibonacciHeap`], the
priority queue driving Dijkstra, A*, Johnson and the min-cost flow search.
*/

pub mod fibonacci_heap;

pub use fibonacci_heap::*;
