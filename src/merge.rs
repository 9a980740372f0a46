//! Tagged k-way merge of individually sorted runs.
//!
//! Used by the MDSP rebuild path, where every level handed back by `unbuild`
//! is already sorted and a full re-sort of their union would waste
//! `O(n log n)` work.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::vec;

/// Heap entry for the k-way merge. Orders by record, then by source run so
/// that equal records come out in run order.
struct HeapEntry<R> {
    record: R,
    run: usize,
}

impl<R: Ord> PartialEq for HeapEntry<R> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<R: Ord> Eq for HeapEntry<R> {}

impl<R: Ord> PartialOrd for HeapEntry<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: Ord> Ord for HeapEntry<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.record
            .cmp(&other.record)
            .then_with(|| self.run.cmp(&other.run))
    }
}

/// Merge sorted `runs` into a single sorted vector.
///
/// Every run must already be sorted ascending. The merge is stable across
/// runs: for equal records, the one from the lower-indexed run comes first.
/// Runs `O(n log k)` for `n` total records over `k` runs.
pub fn merge_sorted_runs<R: Ord>(mut runs: Vec<Vec<R>>) -> Vec<R> {
    runs.retain(|run| !run.is_empty());
    match runs.len() {
        0 => return Vec::new(),
        1 => return runs.pop().unwrap_or_default(),
        _ => {}
    }

    let total: usize = runs.iter().map(Vec::len).sum();
    let mut cursors: Vec<vec::IntoIter<R>> = runs.into_iter().map(Vec::into_iter).collect();
    let mut heap: BinaryHeap<Reverse<HeapEntry<R>>> = BinaryHeap::with_capacity(cursors.len());

    // Seed the min-heap.
    for (run, cursor) in cursors.iter_mut().enumerate() {
        if let Some(record) = cursor.next() {
            heap.push(Reverse(HeapEntry { record, run }));
        }
    }

    let mut merged = Vec::with_capacity(total);
    while let Some(Reverse(HeapEntry { record, run })) = heap.pop() {
        debug_assert!(
            merged.last().map_or(true, |prev| *prev <= record),
            "run {run} is not sorted"
        );
        merged.push(record);

        // Advance this run's cursor.
        if let Some(next) = cursors[run].next() {
            heap.push(Reverse(HeapEntry { record: next, run }));
        }
    }

    merged
}

/// Two-way variant of [`merge_sorted_runs`]; `left` wins ties.
pub fn merge_two<R: Ord>(left: Vec<R>, right: Vec<R>) -> Vec<R> {
    if right.is_empty() {
        return left;
    }
    if left.is_empty() {
        return right;
    }

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => l <= r,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}
