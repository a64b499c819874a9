use std::cmp::Ordering;
use std::fmt;

use crate::error::CollectionError;

/// Ordering used by a [`RankIndex`]. `Greater` ranks higher.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Binary max-heap over a caller-supplied comparator.
///
/// Ranked enumeration is non-destructive when performed on a clone; the live
/// index is only mutated by `insert`, `extract_max`, `clear` and `rebuild`.
/// With a total-order comparator the extraction sequence is independent of
/// insertion order.
#[derive(Clone)]
pub struct RankIndex<T> {
    heap: Vec<T>,
    compare: Comparator<T>,
}

impl<T> RankIndex<T> {
    /// Create an empty index ordered by `compare`.
    pub fn new(compare: Comparator<T>) -> Self {
        Self {
            heap: Vec::new(),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Highest-ranked item, if any.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Add an item and restore the heap property.
    pub fn insert(&mut self, value: T) {
        self.heap.push(value);
        self.sift_up(self.heap.len() - 1);
    }

    /// Remove and return the highest-ranked item.
    ///
    /// Calling this on an empty index is a caller bug and is reported as
    /// [`CollectionError::EmptyIndex`].
    pub fn extract_max(&mut self) -> Result<T, CollectionError> {
        if self.heap.is_empty() {
            return Err(CollectionError::EmptyIndex);
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let max = self.heap.pop().ok_or(CollectionError::EmptyIndex)?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(max)
    }

    /// Replace the contents with `items`.
    pub fn rebuild(&mut self, items: impl IntoIterator<Item = T>) {
        self.clear();
        for item in items {
            self.insert(item);
        }
    }

    /// Extract up to `limit` items (all of them when `None`), highest first.
    ///
    /// Checks emptiness before every extraction, so it never trips
    /// [`CollectionError::EmptyIndex`] itself.
    pub fn drain_ranked(&mut self, limit: Option<usize>) -> Result<Vec<T>, CollectionError> {
        let cap = limit.map_or(self.len(), |n| n.min(self.len()));
        let mut out = Vec::with_capacity(cap);
        while !self.is_empty() && out.len() < cap {
            out.push(self.extract_max()?);
        }
        Ok(out)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if (self.compare)(&self.heap[parent], &self.heap[i]) == Ordering::Less {
                self.heap.swap(parent, i);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut largest = i;

            if left < len && (self.compare)(&self.heap[largest], &self.heap[left]) == Ordering::Less
            {
                largest = left;
            }
            if right < len
                && (self.compare)(&self.heap[largest], &self.heap[right]) == Ordering::Less
            {
                largest = right;
            }
            if largest == i {
                break;
            }
            self.heap.swap(i, largest);
            i = largest;
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RankIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankIndex")
            .field("heap", &self.heap)
            .finish_non_exhaustive()
    }
}
