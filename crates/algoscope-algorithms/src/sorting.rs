//! Instrumented comparison sorts.
//!
//! Every comparison emits a `Comparison` step before any conditional
//! movement, and every movement (swap, shift or write-back) emits a
//! `Mutation` step whose snapshot reflects the array after the movement.
//! Comparisons are strict `<`/`>` on [`SortItem::key`].
//!
//! The runners are generic over the item type so that properties such as
//! merge-sort stability can be observed with tagged items; the snapshot
//! always exposes keys only.

use crate::dataset::{Dataset, Value};
use crate::step::{Flow, Halt, Outcome, Step, StepSink};

/// An element that sorts by an integer key.
pub trait SortItem: Clone {
    fn key(&self) -> Value;
}

impl SortItem for Value {
    fn key(&self) -> Value {
        *self
    }
}

impl<T: Clone> SortItem for (Value, T) {
    fn key(&self) -> Value {
        self.0
    }
}

/// Wraps the slice being sorted and the sink steps go to.
struct Tracker<'a, T, S: ?Sized> {
    items: &'a mut [T],
    sink: &'a mut S,
}

impl<'a, T: SortItem, S: StepSink + ?Sized> Tracker<'a, T, S> {
    fn new(items: &'a mut [T], sink: &'a mut S) -> Self {
        Self { items, sink }
    }

    fn snapshot(&self) -> Dataset {
        Dataset::Array(self.items.iter().map(SortItem::key).collect())
    }

    fn key(&self, index: usize) -> Value {
        self.items[index].key()
    }

    fn compare(&mut self, indices: Vec<usize>) -> Flow {
        let step = Step::comparison(indices, self.snapshot());
        self.sink.emit(step)
    }

    fn compare_sub(&mut self, indices: Vec<usize>) -> Flow {
        let step = Step::comparison(indices, self.snapshot()).sub_step();
        self.sink.emit(step)
    }

    fn swap(&mut self, a: usize, b: usize) -> Flow {
        self.items.swap(a, b);
        let step = Step::mutation(vec![a, b], self.snapshot());
        self.sink.emit(step)
    }

    fn write(&mut self, index: usize, item: T, highlight: Vec<usize>) -> Flow {
        self.items[index] = item;
        let step = Step::mutation(highlight, self.snapshot());
        self.sink.emit(step)
    }

    fn finish(&mut self) -> Flow {
        let step = Step::done(Outcome::Sorted, self.snapshot());
        self.sink.emit(step)
    }
}

/// Bubble sort over the full nested loop, without the early-exit check.
pub fn bubble_sort<T: SortItem, S: StepSink + ?Sized>(items: &mut [T], sink: &mut S) -> Flow {
    let n = items.len();
    let mut t = Tracker::new(items, sink);

    for i in 0..n.saturating_sub(1) {
        for j in 0..n - 1 - i {
            t.compare(vec![j, j + 1])?;
            if t.key(j) > t.key(j + 1) {
                t.swap(j, j + 1)?;
            }
        }
    }
    t.finish()
}

/// Selection sort. Inner-loop comparisons are sub-steps, and the swap is
/// skipped when the minimum is already in place.
pub fn selection_sort<T: SortItem, S: StepSink + ?Sized>(items: &mut [T], sink: &mut S) -> Flow {
    let n = items.len();
    let mut t = Tracker::new(items, sink);

    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..n {
            t.compare_sub(vec![j, min])?;
            if t.key(j) < t.key(min) {
                min = j;
            }
        }
        if min != i {
            t.swap(i, min)?;
        }
    }
    t.finish()
}

/// Insertion sort with shifting. The held key is written back only if it moved.
pub fn insertion_sort<T: SortItem, S: StepSink + ?Sized>(items: &mut [T], sink: &mut S) -> Flow {
    let n = items.len();
    let mut t = Tracker::new(items, sink);

    for i in 1..n {
        let held = t.items[i].clone();
        let mut j = i;
        while j > 0 {
            t.compare(vec![j - 1, j])?;
            if t.key(j - 1) > held.key() {
                let shifted = t.items[j - 1].clone();
                t.write(j, shifted, vec![j - 1, j])?;
                j -= 1;
            } else {
                break;
            }
        }
        if j != i {
            t.write(j, held, vec![j])?;
        }
    }
    t.finish()
}

/// Top-down merge sort; stable because ties take the left element.
pub fn merge_sort<T: SortItem, S: StepSink + ?Sized>(items: &mut [T], sink: &mut S) -> Flow {
    let n = items.len();
    let mut t = Tracker::new(items, sink);
    merge_range(&mut t, 0, n)?;
    t.finish()
}

fn merge_range<T: SortItem, S: StepSink + ?Sized>(
    t: &mut Tracker<'_, T, S>,
    lo: usize,
    hi: usize,
) -> Flow {
    if hi - lo < 2 {
        return Ok(());
    }
    let mid = lo + (hi - lo) / 2;
    merge_range(t, lo, mid)?;
    merge_range(t, mid, hi)?;

    let left = t.items[lo..mid].to_vec();
    let right = t.items[mid..hi].to_vec();
    let (mut i, mut j, mut k) = (0, 0, lo);

    while i < left.len() && j < right.len() {
        t.compare_sub(vec![k, mid + j])?;
        if right[j].key() < left[i].key() {
            t.write(k, right[j].clone(), vec![k])?;
            j += 1;
        } else {
            t.write(k, left[i].clone(), vec![k])?;
            i += 1;
        }
        k += 1;
    }
    for item in left[i..].iter().chain(&right[j..]) {
        t.write(k, item.clone(), vec![k])?;
        k += 1;
    }
    Ok(())
}

/// Quick sort with a Lomuto partition on the last element.
pub fn quick_sort<T: SortItem, S: StepSink + ?Sized>(items: &mut [T], sink: &mut S) -> Flow {
    let n = items.len();
    let mut t = Tracker::new(items, sink);
    if n > 1 {
        quick_range(&mut t, 0, n - 1)?;
    }
    t.finish()
}

// `hi` is inclusive.
fn quick_range<T: SortItem, S: StepSink + ?Sized>(
    t: &mut Tracker<'_, T, S>,
    lo: usize,
    hi: usize,
) -> Flow {
    if lo >= hi {
        return Ok(());
    }
    let pivot = partition(t, lo, hi)?;
    if pivot > lo {
        quick_range(t, lo, pivot - 1)?;
    }
    quick_range(t, pivot + 1, hi)
}

fn partition<T: SortItem, S: StepSink + ?Sized>(
    t: &mut Tracker<'_, T, S>,
    lo: usize,
    hi: usize,
) -> Result<usize, Halt> {
    let pivot = t.key(hi);
    let mut boundary = lo;
    for j in lo..hi {
        t.compare(vec![j, hi])?;
        if t.key(j) < pivot {
            if boundary != j {
                t.swap(boundary, j)?;
            }
            boundary += 1;
        }
    }
    if boundary != hi {
        t.swap(boundary, hi)?;
    }
    Ok(boundary)
}

/// Heap sort: bottom-up max-heap build, then repeated root extraction.
pub fn heap_sort<T: SortItem, S: StepSink + ?Sized>(items: &mut [T], sink: &mut S) -> Flow {
    let n = items.len();
    let mut t = Tracker::new(items, sink);

    for root in (0..n / 2).rev() {
        heapify(&mut t, n, root)?;
    }
    for end in (1..n).rev() {
        t.swap(0, end)?;
        heapify(&mut t, end, 0)?;
    }
    t.finish()
}

fn heapify<T: SortItem, S: StepSink + ?Sized>(
    t: &mut Tracker<'_, T, S>,
    size: usize,
    root: usize,
) -> Flow {
    let mut largest = root;
    let left = 2 * root + 1;
    let right = 2 * root + 2;

    if left < size {
        t.compare(vec![left, largest])?;
        if t.key(left) > t.key(largest) {
            largest = left;
        }
    }
    if right < size {
        t.compare(vec![right, largest])?;
        if t.key(right) > t.key(largest) {
            largest = right;
        }
    }
    if largest != root {
        t.swap(root, largest)?;
        heapify(t, size, largest)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{Recorder, StepKind};
    use proptest::prelude::*;

    type SortFn = fn(&mut [Value], &mut Recorder) -> Flow;

    const ALL: [(&str, SortFn); 6] = [
        ("bubble", bubble_sort::<Value, Recorder>),
        ("selection", selection_sort::<Value, Recorder>),
        ("insertion", insertion_sort::<Value, Recorder>),
        ("merge", merge_sort::<Value, Recorder>),
        ("quick", quick_sort::<Value, Recorder>),
        ("heap", heap_sort::<Value, Recorder>),
    ];

    fn run(sort: SortFn, input: &[Value]) -> (Vec<Value>, Vec<crate::Step>) {
        let mut items = input.to_vec();
        let mut recorder = Recorder::new();
        sort(&mut items, &mut recorder).unwrap();
        (items, recorder.into_steps())
    }

    fn count(steps: &[crate::Step], kind: StepKind) -> usize {
        steps.iter().filter(|s| s.kind == kind).count()
    }

    #[test]
    fn bubble_sort_reference_scenario() {
        let (sorted, steps) = run(ALL[0].1, &[5, 3, 8, 1]);
        assert_eq!(sorted, vec![1, 3, 5, 8]);
        assert_eq!(count(&steps, StepKind::Comparison), 6);
        // One swap per inversion: (5,3) (5,1) (3,1) (8,1).
        assert_eq!(count(&steps, StepKind::Mutation), 4);
        assert_eq!(steps.last().unwrap().snapshot, Dataset::Array(vec![1, 3, 5, 8]));
    }

    #[test]
    fn comparison_precedes_each_swap() {
        let (_, steps) = run(ALL[0].1, &[2, 1]);
        let kinds: Vec<_> = steps.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StepKind::Comparison, StepKind::Mutation, StepKind::Done]);
        assert_eq!(steps[0].snapshot, Dataset::Array(vec![2, 1]));
        assert_eq!(steps[1].snapshot, Dataset::Array(vec![1, 2]));
    }

    #[test]
    fn simple_sorts_do_not_move_sorted_input() {
        let input = [10, 20, 20, 30, 40];
        for (name, sort) in &ALL[..3] {
            let (_, steps) = run(*sort, &input);
            assert_eq!(count(&steps, StepKind::Mutation), 0, "{name} moved sorted input");
        }
    }

    #[test]
    fn selection_sort_comparisons_are_sub_steps() {
        let (_, steps) = run(ALL[1].1, &[3, 1, 2]);
        assert!(steps
            .iter()
            .filter(|s| s.kind == StepKind::Comparison)
            .all(|s| s.pace == crate::Pace::Sub));
        assert!(steps
            .iter()
            .filter(|s| s.kind == StepKind::Mutation)
            .all(|s| s.pace == crate::Pace::Full));
    }

    #[test]
    fn merge_sort_is_stable() {
        let mut items: Vec<(Value, char)> =
            vec![(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (1, 'e'), (3, 'f')];
        let mut recorder = Recorder::new();
        merge_sort(&mut items, &mut recorder).unwrap();
        let tags: String = items.iter().map(|(_, tag)| *tag).collect();
        assert_eq!(tags, "bedacf");
    }

    #[test]
    fn merge_sort_comparison_count() {
        // One decision per pair, then two before the right run is exhausted.
        let (sorted, steps) = run(ALL[3].1, &[4, 3, 2, 1]);
        assert_eq!(sorted, vec![1, 2, 3, 4]);
        assert_eq!(count(&steps, StepKind::Comparison), 4);
    }

    #[test]
    fn quick_sort_partitions_around_last_element() {
        let (_, steps) = run(ALL[4].1, &[3, 1, 2]);
        // First partition: pivot 2 at index 2, compared against indices 0 and 1.
        assert_eq!(steps[0].indices, vec![0, 2]);
        assert_eq!(steps[1].indices, vec![1, 2]);
        // 1 < 2 moves to the boundary, then the pivot lands at index 1.
        assert_eq!(steps[2].snapshot, Dataset::Array(vec![1, 3, 2]));
        assert_eq!(steps[3].snapshot, Dataset::Array(vec![1, 2, 3]));
    }

    #[test]
    fn heap_sort_builds_max_heap_first() {
        let (_, steps) = run(ALL[5].1, &[1, 2, 3]);
        // heapify(root 0): compare left, then right, then move the largest up.
        assert_eq!(steps[0].indices, vec![1, 0]);
        assert_eq!(steps[1].indices, vec![2, 1]);
        assert_eq!(steps[2].snapshot, Dataset::Array(vec![3, 2, 1]));
    }

    #[test]
    fn trivial_inputs_emit_only_done() {
        for (name, sort) in &ALL {
            for input in [vec![], vec![7]] {
                let (_, steps) = run(*sort, &input);
                assert_eq!(steps.len(), 1, "{name}");
                assert_eq!(steps[0].outcome, Some(Outcome::Sorted));
            }
        }
    }

    #[test]
    fn halting_stops_mid_sort() {
        let mut items = vec![5, 4, 3, 2, 1];
        let mut recorder = Recorder::with_limit(3);
        assert_eq!(bubble_sort(&mut items, &mut recorder), Err(Halt));
        assert_eq!(recorder.steps().len(), 3);
        assert_eq!(recorder.steps()[2].kind, StepKind::Comparison);
        assert_eq!(recorder.steps()[2].snapshot, Dataset::Array(vec![4, 5, 3, 2, 1]));
    }

    proptest! {
        #[test]
        fn every_sort_yields_sorted_permutation(input in prop::collection::vec(-50i64..50, 0..40)) {
            let mut expected = input.clone();
            expected.sort();
            for (name, sort) in &ALL {
                let (sorted, steps) = run(*sort, &input);
                prop_assert_eq!(&sorted, &expected, "{} output", name);
                let last = steps.last().unwrap();
                prop_assert!(last.is_done());
                prop_assert_eq!(&last.snapshot, &Dataset::Array(expected.clone()));
                prop_assert_eq!(steps.iter().filter(|s| s.is_done()).count(), 1);
            }
        }

        #[test]
        fn merge_sort_keeps_equal_keys_in_order(keys in prop::collection::vec(0i64..5, 0..30)) {
            let mut items: Vec<(Value, usize)> = keys.iter().copied().zip(0..).collect();
            merge_sort(&mut items, &mut Recorder::new()).unwrap();
            for pair in items.windows(2) {
                if pair[0].0 == pair[1].0 {
                    prop_assert!(pair[0].1 < pair[1].1);
                }
            }
        }
    }
}
