//! An array-backed max-priority queue with a configurable branching factor.
//!
//! ```
//! use dheap::DHeap;
//!
//! let mut heap = DHeap::from_entries([("a", 48), ("b", 15), ("c", 96)], 3)?;
//! heap.insert("d", 98);
//! heap.update("b", 99)?;
//!
//! assert_eq!(heap.top()?.element, "b");
//! assert_eq!(heap.top()?.element, "d");
//! assert!(heap.validate());
//! # Ok::<(), dheap::HeapError>(())
//! ```
//!
//! Larger branching factors make the tree shallower, which speeds up
//! insertions, at the cost of comparing more children on every step of a
//! push-down.

mod d_way_heap;
mod error;

pub use d_way_heap::{DHeap, Entry, IntoSorted, PeekMut, DEFAULT_BRANCHING_FACTOR};
pub use error::{HeapError, Result};
