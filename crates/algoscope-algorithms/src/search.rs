//! Linear and binary search over arrays.

use crate::dataset::{Dataset, Value};
use crate::step::{Flow, Outcome, Step, StepSink};

/// Scan left to right, visiting every index until the first exact match.
///
/// Ends with `Found { index }` at the first match, or `NotFound` after
/// exactly `values.len()` visits.
pub fn linear_search<S: StepSink + ?Sized>(values: &[Value], target: Value, sink: &mut S) -> Flow {
    let snapshot = Dataset::Array(values.to_vec());
    for (index, value) in values.iter().enumerate() {
        sink.emit(Step::visit(vec![index], snapshot.clone()))?;
        if *value == target {
            return sink.emit(Step::done(Outcome::Found { index }, snapshot));
        }
    }
    sink.emit(Step::done(Outcome::NotFound, snapshot))
}

/// Classic binary search with an inclusive window and `mid = (low + high) / 2`.
///
/// `values` must be sorted ascending; [`Algorithm::validate`](crate::Algorithm::validate)
/// rejects unsorted input before a run starts. Each probe emits one
/// `Comparison`, so a run takes at most `floor(log2 n) + 1` comparisons.
pub fn binary_search<S: StepSink + ?Sized>(values: &[Value], target: Value, sink: &mut S) -> Flow {
    debug_assert!(crate::dataset::is_sorted(values), "binary search needs sorted input");

    let snapshot = Dataset::Array(values.to_vec());
    if values.is_empty() {
        return sink.emit(Step::done(Outcome::NotFound, snapshot));
    }

    let mut low = 0usize;
    let mut high = values.len() - 1;
    while low <= high {
        let mid = (low + high) / 2;
        sink.emit(Step::comparison(vec![mid], snapshot.clone()))?;
        if values[mid] == target {
            return sink.emit(Step::done(Outcome::Found { index: mid }, snapshot));
        }
        if values[mid] < target {
            low = mid + 1;
        } else if mid == 0 {
            break;
        } else {
            high = mid - 1;
        }
    }
    sink.emit(Step::done(Outcome::NotFound, snapshot))
}
