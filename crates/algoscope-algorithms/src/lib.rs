//! Algoscope Algorithms
//!
//! Instrumented runners for classic sorting, searching, tree, list and graph
//! algorithms. Each runner performs the textbook algorithm on its own copy
//! of a dataset and reports every comparison, mutation and visit as a
//! [`Step`] through a [`StepSink`].
//!
//! # Steps
//!
//! A step is a self-describing value: its kind, the positions to highlight,
//! and a full snapshot of the dataset after the step. Renderers never need
//! to look at earlier steps, and nothing here knows how steps are drawn or
//! paced.
//!
//! # Cancellation
//!
//! A sink may answer [`Halt`] at any point. Runners propagate it with `?`
//! through every level of recursion, so a consumer that stops pulling
//! steps stops the algorithm at the next emission.
//!
//! # Example
//!
//! ```
//! use algoscope_algorithms::{Algorithm, Dataset, Outcome, StepKind};
//!
//! let steps = Algorithm::BubbleSort.record(Dataset::Array(vec![5, 3, 8, 1])).unwrap();
//! let comparisons = steps.iter().filter(|s| s.kind == StepKind::Comparison).count();
//!
//! assert_eq!(comparisons, 6);
//! assert_eq!(steps.last().unwrap().outcome, Some(Outcome::Sorted));
//! assert_eq!(steps.last().unwrap().snapshot, Dataset::Array(vec![1, 3, 5, 8]));
//! ```

mod algorithm;
mod dataset;
mod error;
mod generator;
mod step;

pub mod graph;
pub mod list;
pub mod search;
pub mod sorting;
pub mod tree;

pub use algorithm::{Algorithm, PreparedRun};
pub use dataset::{is_sorted, Dataset, DatasetKind, Scenario, Value};
pub use error::{Error, Result};
pub use generator::{DatasetGenerator, GeneratorOptions, DEFAULT_MAX, DEFAULT_MIN, DEFAULT_SIZE};
pub use graph::{Edge, Graph};
pub use list::LinkedList;
pub use step::{Flow, Halt, Outcome, Pace, Recorder, Step, StepKind, StepSink};
pub use tree::{BinaryTree, TraversalOrder, TreeNode};
