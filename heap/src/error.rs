use thiserror::Error;

/// Failures reported by [`DHeap`](crate::DHeap) operations.
///
/// Every check runs before the heap is touched, so an `Err` never leaves a
/// partially mutated heap behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The branching factor passed at construction is below 2.
    #[error("branching factor must be at least 2, got {branching_factor}")]
    Domain { branching_factor: usize },

    /// A sift primitive was called with an index outside `0..size`.
    #[error("index {index} is out of range for a heap of size {size}")]
    Range { index: usize, size: usize },

    #[error("heap is empty")]
    Empty,

    /// `update` could not find the requested element.
    #[error("element not found in heap")]
    NotFound,
}

pub type Result<T, E = HeapError> = std::result::Result<T, E>;
