//! Observable micro-steps and the contract runners emit them through.
//!
//! Every runner reports each comparison, mutation and visit as a [`Step`]
//! handed to a [`StepSink`]. The sink decides what happens next: a
//! [`Recorder`] keeps everything, a paced stream forwards to a renderer.
//! When the consumer is no longer interested the sink answers with
//! [`Halt`], and runners unwind by propagating it with `?`.

use std::fmt;

use crate::dataset::{Dataset, Value};
use crate::tree::TraversalOrder;

/// What a step represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepKind {
    /// Two elements (or an element and a key) were compared.
    Comparison,
    /// The dataset changed: swap, shift, write-back, insert or removal.
    Mutation,
    /// An element was read without comparison semantics.
    Visit,
    /// The run finished; the step carries an [`Outcome`].
    Done,
}

/// Relative pacing hint for the playback layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pace {
    /// Wait the full inter-step delay.
    #[default]
    Full,
    /// High-frequency step; wait the configured sub-step fraction.
    Sub,
}

/// Terminal result of a run, attached to the `Done` step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Outcome {
    /// The array is in non-decreasing order.
    Sorted,
    /// The key was found at this position.
    Found { index: usize },
    /// The key is absent.
    NotFound,
    /// A value was inserted at this position.
    Inserted { index: usize },
    /// The value already existed; nothing changed.
    Duplicate { value: Value },
    /// The removed value, or `None` when the structure was empty.
    Removed { value: Option<Value> },
    /// The value at the access end, or `None` when empty.
    Peeked { value: Option<Value> },
    /// Values in the order a traversal visited them.
    Traversal {
        order: TraversalOrder,
        values: Vec<Value>,
    },
    /// Distances from `source`; `None` for unreachable nodes.
    ShortestPaths {
        source: usize,
        distances: Vec<Option<u64>>,
    },
    /// Indices of the accepted edges and their summed weight.
    SpanningTree { edges: Vec<usize>, total_weight: u64 },
}

/// A single self-describing event.
///
/// Steps are values: once emitted they never change, and each one carries
/// the full dataset snapshot so a renderer never needs earlier steps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub kind: StepKind,
    /// Positions to highlight, in the snapshot's natural order.
    pub indices: Vec<usize>,
    /// Dataset state after this step.
    pub snapshot: Dataset,
    /// Set only on `Done`.
    pub outcome: Option<Outcome>,
    pub pace: Pace,
}

impl Step {
    pub fn comparison(indices: Vec<usize>, snapshot: Dataset) -> Self {
        Self::new(StepKind::Comparison, indices, snapshot)
    }

    pub fn mutation(indices: Vec<usize>, snapshot: Dataset) -> Self {
        Self::new(StepKind::Mutation, indices, snapshot)
    }

    pub fn visit(indices: Vec<usize>, snapshot: Dataset) -> Self {
        Self::new(StepKind::Visit, indices, snapshot)
    }

    /// Terminal step. Highlights whatever the outcome points at.
    pub fn done(outcome: Outcome, snapshot: Dataset) -> Self {
        let indices = match &outcome {
            Outcome::Found { index } | Outcome::Inserted { index } => vec![*index],
            _ => Vec::new(),
        };
        Self {
            kind: StepKind::Done,
            indices,
            snapshot,
            outcome: Some(outcome),
            pace: Pace::Full,
        }
    }

    fn new(kind: StepKind, indices: Vec<usize>, snapshot: Dataset) -> Self {
        Self {
            kind,
            indices,
            snapshot,
            outcome: None,
            pace: Pace::Full,
        }
    }

    /// Mark this step as a high-frequency sub-step.
    #[must_use]
    pub fn sub_step(mut self) -> Self {
        self.pace = Pace::Sub;
        self
    }

    pub fn is_done(&self) -> bool {
        self.kind == StepKind::Done
    }
}

/// The consumer stopped pulling steps; the runner must unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt;

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("step consumer halted")
    }
}

impl std::error::Error for Halt {}

/// Result of emitting a step.
pub type Flow = Result<(), Halt>;

/// Receives steps from a runner.
pub trait StepSink {
    /// Deliver one step. Returning `Err(Halt)` stops the runner.
    fn emit(&mut self, step: Step) -> Flow;
}

impl<S: StepSink + ?Sized> StepSink for &mut S {
    fn emit(&mut self, step: Step) -> Flow {
        (**self).emit(step)
    }
}

/// Collects steps in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    steps: Vec<Step>,
    limit: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that halts the runner once `limit` steps were collected.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            steps: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

impl StepSink for Recorder {
    fn emit(&mut self, step: Step) -> Flow {
        if self.limit.is_some_and(|limit| self.steps.len() >= limit) {
            return Err(Halt);
        }
        self.steps.push(step);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_step_highlights_found_index() {
        let step = Step::done(Outcome::Found { index: 3 }, Dataset::Array(vec![]));
        assert!(step.is_done());
        assert_eq!(step.indices, vec![3]);
        assert_eq!(step.outcome, Some(Outcome::Found { index: 3 }));
    }

    #[test]
    fn not_found_has_no_highlight() {
        let step = Step::done(Outcome::NotFound, Dataset::Array(vec![1]));
        assert!(step.indices.is_empty());
    }

    #[test]
    fn sub_step_changes_pace_only() {
        let step = Step::comparison(vec![0, 1], Dataset::Array(vec![2, 1])).sub_step();
        assert_eq!(step.pace, Pace::Sub);
        assert_eq!(step.kind, StepKind::Comparison);
    }

    #[test]
    fn recorder_limit_halts() {
        let mut recorder = Recorder::with_limit(2);
        let snapshot = Dataset::Array(vec![1]);
        assert!(recorder.emit(Step::visit(vec![0], snapshot.clone())).is_ok());
        assert!(recorder.emit(Step::visit(vec![0], snapshot.clone())).is_ok());
        assert_eq!(recorder.emit(Step::visit(vec![0], snapshot)), Err(Halt));
        assert_eq!(recorder.steps().len(), 2);
    }
}
