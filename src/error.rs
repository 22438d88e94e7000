/*!
# Errors

All fallible operations of this crate return [`Result<T>`] with a [`GraphError`].

Errors fall into three groups:
- **usage errors**: the caller passed something the operation cannot accept (a NaN priority,
  a handle of another heap, a negative weight for Dijkstra, ...),
- **data errors**: the graph itself has a shape the algorithm cannot handle (a negative cycle),
- **defects**: the store detected that its indices are out of sync. This never happens under
  correct usage and must not be caught-and-continued.

Absence (no path, unknown vertex in a query) is never an error; such operations return `None`
or an unreachable path instead.
*/

use thiserror::Error;

/// Errors produced by the graph store, the Fibonacci heap and the algorithms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    // Usage errors
    #[error("priority must not be NaN")]
    InvalidPriority,

    #[error("new priority {new} exceeds current priority {current}")]
    PriorityIncrease { current: f64, new: f64 },

    #[error("handle does not belong to this heap")]
    ForeignHandle,

    #[error("heap node was already dequeued")]
    DequeuedHandle,

    #[error("heap arena cannot address more than 2^32 nodes")]
    HeapCapacityExceeded,

    #[error("{algorithm} requires non-negative edge weights, found {weight}")]
    NegativeWeight {
        algorithm: &'static str,
        weight: f64,
    },

    #[error("edge capacity must be non-negative, found {capacity}")]
    NegativeCapacity { capacity: f64 },

    #[error("graph has no edge factory configured")]
    MissingEdgeFactory,

    #[error("vertex {0} is not part of the graph")]
    UnknownVertex(String),

    // Data errors
    #[error("graph contains a negative-weight cycle")]
    NegativeCycle,

    // Defects
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl GraphError {
    /// Returns *true* if the caller can fix this error by changing the arguments
    pub fn is_usage_error(&self) -> bool {
        !self.is_data_error() && !self.is_defect()
    }

    /// Returns *true* if the error describes a property of the graph's data
    pub fn is_data_error(&self) -> bool {
        matches!(self, GraphError::NegativeCycle)
    }

    /// Returns *true* if the error signals an internal inconsistency (a bug)
    pub fn is_defect(&self) -> bool {
        matches!(self, GraphError::InvariantViolation(_))
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, GraphError>;
