//! Bounded top-`m` selection over approximate distances.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::Label;

/// A training record ranked by approximate distance to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the record in training order.
    pub index: usize,
    /// The record's label.
    pub label: Label,
    /// Approximate squared distance to the query.
    pub distance: f64,
}

/// Heap entry ordered by `(distance, index)`, largest first.
///
/// Ordering on the record index as a secondary key makes selection
/// deterministic: among equal distances the lower index wins.
#[derive(Debug, Clone, Copy)]
struct MaxHeapEntry {
    distance: f64,
    index: usize,
}

impl MaxHeapEntry {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance).then(self.index.cmp(&other.index))
    }
}

impl PartialEq for MaxHeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for MaxHeapEntry {}

impl PartialOrd for MaxHeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MaxHeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other)
    }
}

/// Select the `m` smallest `(index, distance)` pairs, sorted ascending by
/// distance then index.
///
/// Runs in `O(N log m)` with `O(m)` extra memory.
pub(crate) fn select_nearest<I>(distances: I, m: usize) -> Vec<(usize, f64)>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    if m == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<MaxHeapEntry> = BinaryHeap::with_capacity(m.saturating_add(1));

    for (index, distance) in distances {
        let entry = MaxHeapEntry { distance, index };
        if heap.len() < m {
            heap.push(entry);
        } else if let Some(worst) = heap.peek() {
            if entry < *worst {
                heap.pop();
                heap.push(entry);
            }
        }
    }

    heap.into_sorted_vec().into_iter().map(|e| (e.index, e.distance)).collect()
}
