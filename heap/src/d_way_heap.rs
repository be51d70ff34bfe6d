use crate::error::{HeapError, Result};
use log::{debug, trace};
use std::borrow::Borrow;
use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Deref, DerefMut, Range};
use std::slice;

pub const DEFAULT_BRANCHING_FACTOR: usize = 3;

/// An element stored in the heap together with its priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T, P = i64> {
    pub element: T,
    pub priority: P,
}

impl<T, P> Entry<T, P> {
    pub fn new(element: T, priority: P) -> Self {
        Entry { element, priority }
    }

    pub fn into_pair(self) -> (T, P) {
        (self.element, self.priority)
    }
}

impl<T, P> From<(T, P)> for Entry<T, P> {
    fn from((element, priority): (T, P)) -> Self {
        Entry::new(element, priority)
    }
}

/// Max-priority queue laid out as a complete d-ary tree in a `Vec`.
///
/// Node `i` has its children at `i*d+1 ..= i*d+d` and its parent at
/// `(i-1)/d`. The entry with the highest priority is always at index 0.
#[derive(Debug, Clone)]
pub struct DHeap<T, P: Ord = i64> {
    data: Vec<Entry<T, P>>,
    branching_factor: usize,
}

fn check_branching_factor(branching_factor: usize) -> Result<()> {
    if branching_factor < 2 {
        Err(HeapError::Domain { branching_factor })
    } else {
        Ok(())
    }
}

impl<T, P: Ord> DHeap<T, P> {
    /// Empty heap with [`DEFAULT_BRANCHING_FACTOR`].
    pub fn new() -> Self {
        DHeap {
            data: Vec::new(),
            branching_factor: DEFAULT_BRANCHING_FACTOR,
        }
    }

    pub fn with_branching_factor(branching_factor: usize) -> Result<Self> {
        Self::with_capacity(branching_factor, 0)
    }

    pub fn with_capacity(branching_factor: usize, cap: usize) -> Result<Self> {
        check_branching_factor(branching_factor)?;
        Ok(DHeap {
            data: Vec::with_capacity(cap),
            branching_factor,
        })
    }

    /// Builds a heap out of `entries` in O(n).
    ///
    /// The entries are stored in input order and then heapified bottom-up,
    /// starting from the last node that has children.
    pub fn from_entries<I>(entries: I, branching_factor: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (T, P)>,
    {
        check_branching_factor(branching_factor)?;
        let data = entries.into_iter().map(Entry::from).collect();
        Ok(Self::from_vec(data, branching_factor))
    }

    // `branching_factor` must already be validated.
    fn from_vec(data: Vec<Entry<T, P>>, branching_factor: usize) -> Self {
        let mut h = DHeap {
            data,
            branching_factor,
        };
        if h.data.len() > 1 {
            for i in (0..=(h.data.len() - 1) / branching_factor).rev() {
                h.sift_down(i);
            }
        }
        debug!(
            "heapified {} entries with branching factor {}",
            h.data.len(),
            branching_factor
        );
        h
    }

    pub fn branching_factor(&self) -> usize {
        self.branching_factor
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }

    fn parent_of(&self, i: usize) -> usize {
        debug_assert!(i > 0, "the root has no parent");
        (i - 1) / self.branching_factor
    }

    /// Indices of the children of `i`, clipped to the current size.
    fn child_range(&self, i: usize) -> Range<usize> {
        let len = self.data.len();
        // saturate so that huge branching factors clip to `len`
        let first = i.saturating_mul(self.branching_factor).saturating_add(1);
        first.min(len)..first.saturating_add(self.branching_factor).min(len)
    }

    // Indices at or past this one are leaves.
    fn first_leaf_index(&self) -> usize {
        match self.data.len() {
            0 | 1 => 0,
            len => (len - 2) / self.branching_factor + 1,
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.data.len() {
            Ok(())
        } else {
            Err(HeapError::Range {
                index,
                size: self.data.len(),
            })
        }
    }

    /// Leftmost child holding the maximum priority among the children of `i`.
    fn highest_priority_child(&self, i: usize) -> Option<usize> {
        let mut children = self.child_range(i);
        let mut best = children.next()?;
        for ci in children {
            if self.data[ci].priority > self.data[best].priority {
                best = ci;
            }
        }
        Some(best)
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let pi = self.parent_of(i);
            if self.data[pi].priority >= self.data[i].priority {
                break;
            }
            self.data.swap(i, pi);
            i = pi;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) -> usize {
        let first_leaf = self.first_leaf_index();
        while i < first_leaf {
            let Some(ci) = self.highest_priority_child(i) else {
                break;
            };
            if self.data[ci].priority <= self.data[i].priority {
                break;
            }
            self.data.swap(i, ci);
            i = ci;
        }
        i
    }

    /// Moves the entry at `index` towards the root while its parent has a
    /// strictly lower priority. Returns the index where the entry settled.
    pub fn bubble_up(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.sift_up(index))
    }

    /// Moves the entry at `index` towards the leaves while one of its
    /// children has a strictly higher priority. Among equal children the
    /// leftmost one is promoted. Returns the index where the entry settled.
    pub fn push_down(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.sift_down(index))
    }

    pub fn insert(&mut self, element: T, priority: P) {
        self.data.push(Entry::new(element, priority));
        let last = self.data.len() - 1;
        self.sift_up(last);
    }

    pub fn peek(&self) -> Result<&Entry<T, P>> {
        self.data.first().ok_or(HeapError::Empty)
    }

    /// Similar to std::BinaryHeap::peek_mut.
    ///
    /// The root is pushed back into place when the returned guard is dropped,
    /// so both the element and the priority may be changed through it.
    pub fn peek_mut(&mut self) -> Result<PeekMut<'_, T, P>> {
        if self.data.is_empty() {
            Err(HeapError::Empty)
        } else {
            Ok(PeekMut {
                heap: self,
                sift: true,
            })
        }
    }

    /// Removes and returns the entry with the highest priority.
    pub fn top(&mut self) -> Result<Entry<T, P>> {
        self.pop().ok_or(HeapError::Empty)
    }

    pub fn pop(&mut self) -> Option<Entry<T, P>> {
        if self.data.len() <= 1 {
            self.data.pop()
        } else {
            let ret = self.data.swap_remove(0);
            self.sift_down(0);
            Some(ret)
        }
    }

    /// Changes the priority of the first entry whose element equals
    /// `element` and restores the heap order around it.
    ///
    /// Returns the index the entry ends up at. Setting the same priority
    /// again leaves the heap untouched.
    pub fn update<Q>(&mut self, element: &Q, priority: P) -> Result<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let index = self
            .data
            .iter()
            .position(|e| e.element.borrow() == element)
            .ok_or(HeapError::NotFound)?;
        trace!("update: element found at index {}", index);

        let entry = &mut self.data[index];
        match priority.cmp(&entry.priority) {
            Ordering::Greater => {
                entry.priority = priority;
                trace!("update: bubbling up from {}", index);
                Ok(self.sift_up(index))
            }
            Ordering::Less => {
                entry.priority = priority;
                trace!("update: pushing down from {}", index);
                Ok(self.sift_down(index))
            }
            Ordering::Equal => Ok(index),
        }
    }

    /// Returns a new heap holding the `k` entries with the highest
    /// priorities. `self` is left as is.
    ///
    /// The entries are scanned in storage order while a min-heap of the best
    /// `k` seen so far is kept; a candidate replaces the smallest kept entry
    /// only if its priority is strictly greater, so on ties the entry met
    /// first wins.
    pub fn top_k(&self, k: usize) -> DHeap<T, P>
    where
        T: Clone,
        P: Clone,
    {
        let mut kept: DHeap<usize, Reverse<&P>> = DHeap {
            data: Vec::with_capacity(k.min(self.data.len())),
            branching_factor: self.branching_factor,
        };
        for (index, entry) in self.data.iter().enumerate() {
            if kept.len() < k {
                kept.insert(index, Reverse(&entry.priority));
            } else if kept
                .peek()
                .map_or(false, |min| entry.priority > *min.priority.0)
            {
                kept.data[0] = Entry::new(index, Reverse(&entry.priority));
                kept.sift_down(0);
            }
        }

        let mut selected: Vec<usize> = kept.data.into_iter().map(|e| e.element).collect();
        selected.sort_unstable();
        debug!("top_k: kept {} of {} entries", selected.len(), self.data.len());

        let data = selected.into_iter().map(|i| self.data[i].clone()).collect();
        DHeap::from_vec(data, self.branching_factor)
    }

    /// Checks that every node has a priority greater than or equal to all of
    /// its descendants.
    pub fn validate(&self) -> bool {
        self.data.is_empty() || self.validate_from(0)
    }

    fn validate_from(&self, i: usize) -> bool {
        self.child_range(i)
            .all(|ci| self.data[ci].priority <= self.data[i].priority && self.validate_from(ci))
    }

    /// Iterates over the entries in storage order, which is not sorted.
    pub fn iter(&self) -> slice::Iter<'_, Entry<T, P>> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[Entry<T, P>] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<Entry<T, P>> {
        self.data
    }

    /// Consumes the heap, yielding entries from the highest priority down.
    pub fn into_sorted(self) -> IntoSorted<T, P> {
        IntoSorted { heap: self }
    }
}

impl<T, P: Ord> Default for DHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> FromIterator<(T, P)> for DHeap<T, P> {
    fn from_iter<I: IntoIterator<Item = (T, P)>>(iter: I) -> Self {
        let data = iter.into_iter().map(Entry::from).collect();
        DHeap::from_vec(data, DEFAULT_BRANCHING_FACTOR)
    }
}

impl<T, P: Ord> Extend<(T, P)> for DHeap<T, P> {
    fn extend<I: IntoIterator<Item = (T, P)>>(&mut self, iter: I) {
        for (element, priority) in iter {
            self.insert(element, priority);
        }
    }
}

impl<T, P: Ord> IntoIterator for DHeap<T, P> {
    type Item = Entry<T, P>;
    type IntoIter = IntoSorted<T, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_sorted()
    }
}

impl<'a, T, P: Ord> IntoIterator for &'a DHeap<T, P> {
    type Item = &'a Entry<T, P>;
    type IntoIter = slice::Iter<'a, Entry<T, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Draining iterator returned by [`DHeap::into_sorted`].
#[derive(Debug, Clone)]
pub struct IntoSorted<T, P: Ord = i64> {
    heap: DHeap<T, P>,
}

impl<T, P: Ord> Iterator for IntoSorted<T, P> {
    type Item = Entry<T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<T, P: Ord> ExactSizeIterator for IntoSorted<T, P> {}

impl<T, P: Ord> FusedIterator for IntoSorted<T, P> {}

/// Mutable access to the root of a [`DHeap`], see [`DHeap::peek_mut`].
///
/// Note: the heap order is only restored when the guard is dropped; leaking
/// it (e.g. with `mem::forget`) after changing the priority leaves the heap
/// invalid.
pub struct PeekMut<'a, T, P: Ord = i64> {
    heap: &'a mut DHeap<T, P>,
    sift: bool,
}

impl<'a, T, P: Ord> PeekMut<'a, T, P> {
    /// Removes the peeked entry from the heap.
    pub fn pop(mut this: Self) -> Entry<T, P> {
        this.sift = false;
        let heap = &mut *this.heap;
        let ret = heap.data.swap_remove(0);
        if !heap.data.is_empty() {
            heap.sift_down(0);
        }
        ret
    }
}

impl<'a, T, P: Ord> Deref for PeekMut<'a, T, P> {
    type Target = Entry<T, P>;

    fn deref(&self) -> &Self::Target {
        &self.heap.data[0]
    }
}

impl<'a, T, P: Ord> DerefMut for PeekMut<'a, T, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.heap.data[0]
    }
}

impl<'a, T, P: Ord> Drop for PeekMut<'a, T, P> {
    fn drop(&mut self) {
        if self.sift {
            self.heap.sift_down(0);
        }
    }
}

impl<'a, T: fmt::Debug, P: Ord + fmt::Debug> fmt::Debug for PeekMut<'a, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PeekMut").field(&self.heap.data[0]).finish()
    }
}
