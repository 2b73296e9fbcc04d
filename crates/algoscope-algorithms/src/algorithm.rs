//! Algorithm selection, validation and dispatch.
//!
//! An [`Algorithm`] names a runner together with its key or position.
//! [`Algorithm::prepare`] checks it against a dataset and yields a
//! [`PreparedRun`] that can no longer fail: the only way a prepared run
//! stops early is its sink answering with [`Halt`](crate::Halt).

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::dataset::{is_sorted, Dataset, DatasetKind, Scenario, Value};
use crate::error::{Error, Result};
use crate::graph::{self, Graph, REFERENCE_LABELS};
use crate::list::{self, LinkedList};
use crate::search;
use crate::sorting;
use crate::step::{Flow, Recorder, Step, StepSink};
use crate::tree::{self, BinaryTree, TraversalOrder};

/// A runnable algorithm with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "algorithm", rename_all = "snake_case"))]
pub enum Algorithm {
    BubbleSort,
    SelectionSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    HeapSort,
    LinearSearch { target: Value },
    /// Requires an array sorted ascending.
    BinarySearch { target: Value },
    TreeInsert { value: Value },
    TreeSearch { value: Value },
    TreeTraversal { order: TraversalOrder },
    ListAppend { value: Value },
    ListPrepend { value: Value },
    ListInsertAt { index: usize, value: Value },
    ListRemoveAt { index: usize },
    ListFind { value: Value },
    StackPush { value: Value },
    StackPop,
    StackPeek,
    QueueEnqueue { value: Value },
    QueueDequeue,
    QueuePeek,
    ShortestPath { source: usize },
    MinimumSpanningTree,
}

impl Algorithm {
    /// The six sorting runners, in menu order.
    pub const SORTS: [Algorithm; 6] = [
        Algorithm::BubbleSort,
        Algorithm::SelectionSort,
        Algorithm::InsertionSort,
        Algorithm::MergeSort,
        Algorithm::QuickSort,
        Algorithm::HeapSort,
    ];

    /// Stable identifier, also the prefix accepted by [`FromStr`].
    pub const fn id(&self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "bubble",
            Algorithm::SelectionSort => "selection",
            Algorithm::InsertionSort => "insertion",
            Algorithm::MergeSort => "merge",
            Algorithm::QuickSort => "quick",
            Algorithm::HeapSort => "heap",
            Algorithm::LinearSearch { .. } => "linear",
            Algorithm::BinarySearch { .. } => "binary",
            Algorithm::TreeInsert { .. } => "tree-insert",
            Algorithm::TreeSearch { .. } => "tree-search",
            Algorithm::TreeTraversal { .. } => "tree-traverse",
            Algorithm::ListAppend { .. } => "list-append",
            Algorithm::ListPrepend { .. } => "list-prepend",
            Algorithm::ListInsertAt { .. } => "list-insert",
            Algorithm::ListRemoveAt { .. } => "list-remove",
            Algorithm::ListFind { .. } => "list-find",
            Algorithm::StackPush { .. } => "push",
            Algorithm::StackPop => "pop",
            Algorithm::StackPeek => "peek",
            Algorithm::QueueEnqueue { .. } => "enqueue",
            Algorithm::QueueDequeue => "dequeue",
            Algorithm::QueuePeek => "front",
            Algorithm::ShortestPath { .. } => "dijkstra",
            Algorithm::MinimumSpanningTree => "mst",
        }
    }

    /// The scenario whose generated dataset this algorithm runs on.
    pub const fn scenario(&self) -> Scenario {
        match self {
            Algorithm::BubbleSort
            | Algorithm::SelectionSort
            | Algorithm::InsertionSort
            | Algorithm::MergeSort
            | Algorithm::QuickSort
            | Algorithm::HeapSort => Scenario::Sorting,
            Algorithm::LinearSearch { .. } | Algorithm::BinarySearch { .. } => Scenario::Search,
            Algorithm::TreeInsert { .. }
            | Algorithm::TreeSearch { .. }
            | Algorithm::TreeTraversal { .. } => Scenario::Tree,
            Algorithm::ListAppend { .. }
            | Algorithm::ListPrepend { .. }
            | Algorithm::ListInsertAt { .. }
            | Algorithm::ListRemoveAt { .. }
            | Algorithm::ListFind { .. } => Scenario::List,
            Algorithm::StackPush { .. } | Algorithm::StackPop | Algorithm::StackPeek => {
                Scenario::Stack
            }
            Algorithm::QueueEnqueue { .. } | Algorithm::QueueDequeue | Algorithm::QueuePeek => {
                Scenario::Queue
            }
            Algorithm::ShortestPath { .. } | Algorithm::MinimumSpanningTree => Scenario::Graph,
        }
    }

    /// Shape of dataset this algorithm accepts.
    pub const fn dataset_kind(&self) -> DatasetKind {
        self.scenario().dataset_kind()
    }

    pub const fn is_sort(&self) -> bool {
        matches!(self.scenario(), Scenario::Sorting)
    }

    /// Check preconditions without running anything.
    pub fn validate(&self, dataset: &Dataset) -> Result<()> {
        self.prepare(dataset.clone()).map(|_| ())
    }

    /// Validate `dataset` and bind it to this algorithm.
    ///
    /// # Errors
    ///
    /// - [`Error::DatasetMismatch`] when the dataset has the wrong shape.
    /// - [`Error::InvalidPrecondition`] for binary search on unsorted data.
    /// - [`Error::InvalidInput`] for list positions or graph sources out of range.
    pub fn prepare(self, dataset: Dataset) -> Result<PreparedRun> {
        let mismatch = |actual: &Dataset| Error::DatasetMismatch {
            expected: self.dataset_kind(),
            actual: actual.kind(),
        };

        let job = match (self, dataset) {
            (Algorithm::BubbleSort, Dataset::Array(values)) => Job::Sort(SortKind::Bubble, values),
            (Algorithm::SelectionSort, Dataset::Array(values)) => {
                Job::Sort(SortKind::Selection, values)
            }
            (Algorithm::InsertionSort, Dataset::Array(values)) => {
                Job::Sort(SortKind::Insertion, values)
            }
            (Algorithm::MergeSort, Dataset::Array(values)) => Job::Sort(SortKind::Merge, values),
            (Algorithm::QuickSort, Dataset::Array(values)) => Job::Sort(SortKind::Quick, values),
            (Algorithm::HeapSort, Dataset::Array(values)) => Job::Sort(SortKind::Heap, values),
            (Algorithm::LinearSearch { target }, Dataset::Array(values)) => {
                Job::LinearSearch(values, target)
            }
            (Algorithm::BinarySearch { target }, Dataset::Array(values)) => {
                if !is_sorted(&values) {
                    return Err(Error::InvalidPrecondition(
                        "binary search requires values sorted ascending".into(),
                    ));
                }
                Job::BinarySearch(values, target)
            }
            (Algorithm::TreeInsert { value }, Dataset::Tree(tree)) => Job::TreeInsert(tree, value),
            (Algorithm::TreeSearch { value }, Dataset::Tree(tree)) => Job::TreeSearch(tree, value),
            (Algorithm::TreeTraversal { order }, Dataset::Tree(tree)) => {
                Job::TreeTraversal(tree, order)
            }
            (Algorithm::ListAppend { value }, Dataset::List(list)) => {
                let index = list.len();
                Job::ListInsert(list, index, value)
            }
            (Algorithm::ListPrepend { value }, Dataset::List(list)) => Job::ListInsert(list, 0, value),
            (Algorithm::ListInsertAt { index, value }, Dataset::List(list)) => {
                if index > list.len() {
                    return Err(Error::InvalidInput(format!(
                        "insert position {index} is past the end of a list of {}",
                        list.len()
                    )));
                }
                Job::ListInsert(list, index, value)
            }
            (Algorithm::ListRemoveAt { index }, Dataset::List(list)) => {
                if index >= list.len() {
                    return Err(Error::InvalidInput(format!(
                        "no node at position {index} in a list of {}",
                        list.len()
                    )));
                }
                Job::ListRemove(list, index)
            }
            (Algorithm::ListFind { value }, Dataset::List(list)) => Job::ListFind(list, value),
            (Algorithm::StackPush { value }, Dataset::Stack(stack)) => Job::StackPush(stack, value),
            (Algorithm::StackPop, Dataset::Stack(stack)) => Job::StackPop(stack),
            (Algorithm::StackPeek, Dataset::Stack(stack)) => Job::StackPeek(stack),
            (Algorithm::QueueEnqueue { value }, Dataset::Queue(queue)) => Job::Enqueue(queue, value),
            (Algorithm::QueueDequeue, Dataset::Queue(queue)) => Job::Dequeue(queue),
            (Algorithm::QueuePeek, Dataset::Queue(queue)) => Job::QueuePeek(queue),
            (Algorithm::ShortestPath { source }, Dataset::Graph(graph)) => {
                if source >= graph.node_count() {
                    return Err(Error::InvalidInput(format!(
                        "source node {source} is not in a graph of {} nodes",
                        graph.node_count()
                    )));
                }
                Job::ShortestPath(graph, source)
            }
            (Algorithm::MinimumSpanningTree, Dataset::Graph(graph)) => Job::SpanningTree(graph),
            (_, other) => return Err(mismatch(&other)),
        };

        Ok(PreparedRun {
            algorithm: self,
            job,
        })
    }

    /// Run to completion and collect every step.
    ///
    /// A fresh call regenerates an equivalent sequence from the same inputs.
    pub fn record(self, dataset: Dataset) -> Result<Vec<Step>> {
        let mut recorder = Recorder::new();
        // A recorder without a limit never halts.
        let _ = self.prepare(dataset)?.execute(&mut recorder);
        Ok(recorder.into_steps())
    }
}

#[derive(Debug, Clone, Copy)]
enum SortKind {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
}

/// An algorithm bound to its own validated dataset copy.
#[derive(Debug)]
pub struct PreparedRun {
    algorithm: Algorithm,
    job: Job,
}

#[derive(Debug)]
enum Job {
    Sort(SortKind, Vec<Value>),
    LinearSearch(Vec<Value>, Value),
    BinarySearch(Vec<Value>, Value),
    TreeInsert(BinaryTree, Value),
    TreeSearch(BinaryTree, Value),
    TreeTraversal(BinaryTree, TraversalOrder),
    ListInsert(LinkedList, usize, Value),
    ListRemove(LinkedList, usize),
    ListFind(LinkedList, Value),
    StackPush(Vec<Value>, Value),
    StackPop(Vec<Value>),
    StackPeek(Vec<Value>),
    Enqueue(VecDeque<Value>, Value),
    Dequeue(VecDeque<Value>),
    QueuePeek(VecDeque<Value>),
    ShortestPath(Graph, usize),
    SpanningTree(Graph),
}

impl PreparedRun {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Drive the runner, emitting every step into `sink`.
    ///
    /// The last step is always `Done` unless the sink halts first.
    pub fn execute(self, sink: &mut dyn StepSink) -> Flow {
        match self.job {
            Job::Sort(kind, mut values) => match kind {
                SortKind::Bubble => sorting::bubble_sort(&mut values, sink),
                SortKind::Selection => sorting::selection_sort(&mut values, sink),
                SortKind::Insertion => sorting::insertion_sort(&mut values, sink),
                SortKind::Merge => sorting::merge_sort(&mut values, sink),
                SortKind::Quick => sorting::quick_sort(&mut values, sink),
                SortKind::Heap => sorting::heap_sort(&mut values, sink),
            },
            Job::LinearSearch(values, target) => search::linear_search(&values, target, sink),
            Job::BinarySearch(values, target) => search::binary_search(&values, target, sink),
            Job::TreeInsert(mut tree, value) => tree::insert(&mut tree, value, sink),
            Job::TreeSearch(tree, value) => tree::search(&tree, value, sink),
            Job::TreeTraversal(tree, order) => tree::traverse(&tree, order, sink),
            Job::ListInsert(mut list, index, value) => list::insert_at(&mut list, index, value, sink),
            Job::ListRemove(mut list, index) => list::remove_at(&mut list, index, sink),
            Job::ListFind(list, value) => list::find(&list, value, sink),
            Job::StackPush(mut stack, value) => list::stack_push(&mut stack, value, sink),
            Job::StackPop(mut stack) => list::stack_pop(&mut stack, sink),
            Job::StackPeek(stack) => list::stack_peek(&stack, sink),
            Job::Enqueue(mut queue, value) => list::enqueue(&mut queue, value, sink),
            Job::Dequeue(mut queue) => list::dequeue(&mut queue, sink),
            Job::QueuePeek(queue) => list::queue_peek(&queue, sink),
            Job::ShortestPath(graph, source) => graph::shortest_paths(&graph, source, sink),
            Job::SpanningTree(graph) => graph::minimum_spanning_tree(&graph, sink),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())?;
        match self {
            Algorithm::LinearSearch { target } | Algorithm::BinarySearch { target } => {
                write!(f, ":{target}")
            }
            Algorithm::TreeInsert { value }
            | Algorithm::TreeSearch { value }
            | Algorithm::ListAppend { value }
            | Algorithm::ListPrepend { value }
            | Algorithm::ListFind { value }
            | Algorithm::StackPush { value }
            | Algorithm::QueueEnqueue { value } => write!(f, ":{value}"),
            Algorithm::TreeTraversal { order } => write!(f, ":{order}"),
            Algorithm::ListInsertAt { index, value } => write!(f, ":{index}:{value}"),
            Algorithm::ListRemoveAt { index } => write!(f, ":{index}"),
            Algorithm::ShortestPath { source } => write!(f, ":{source}"),
            _ => Ok(()),
        }
    }
}

/// Parses `id[:arg[:arg]]`, the same form [`Display`](fmt::Display) writes.
///
/// ```
/// use algoscope_algorithms::Algorithm;
///
/// assert_eq!("binary:30".parse::<Algorithm>().unwrap(), Algorithm::BinarySearch { target: 30 });
/// assert_eq!("list-insert:2:7".parse::<Algorithm>().unwrap().to_string(), "list-insert:2:7");
/// ```
impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split(':');
        let args = Args {
            id: parts.next().unwrap_or_default(),
            rest: parts.collect(),
        };
        let algorithm = match args.id {
            "bubble" => Algorithm::BubbleSort,
            "selection" => Algorithm::SelectionSort,
            "insertion" => Algorithm::InsertionSort,
            "merge" => Algorithm::MergeSort,
            "quick" => Algorithm::QuickSort,
            "heap" => Algorithm::HeapSort,
            "linear" => Algorithm::LinearSearch { target: args.value(0)? },
            "binary" => Algorithm::BinarySearch { target: args.value(0)? },
            "tree-insert" => Algorithm::TreeInsert { value: args.value(0)? },
            "tree-search" => Algorithm::TreeSearch { value: args.value(0)? },
            "tree-traverse" => Algorithm::TreeTraversal {
                order: args.rest.first().copied().unwrap_or("inorder").parse()?,
            },
            "list-append" => Algorithm::ListAppend { value: args.value(0)? },
            "list-prepend" => Algorithm::ListPrepend { value: args.value(0)? },
            "list-insert" => Algorithm::ListInsertAt {
                index: args.index(0)?,
                value: args.value(1)?,
            },
            "list-remove" => Algorithm::ListRemoveAt { index: args.index(0)? },
            "list-find" => Algorithm::ListFind { value: args.value(0)? },
            "push" => Algorithm::StackPush { value: args.value(0)? },
            "pop" => Algorithm::StackPop,
            "peek" => Algorithm::StackPeek,
            "enqueue" => Algorithm::QueueEnqueue { value: args.value(0)? },
            "dequeue" => Algorithm::QueueDequeue,
            "front" => Algorithm::QueuePeek,
            "dijkstra" => {
                let raw = args.rest.first().copied().unwrap_or("A");
                let source = match REFERENCE_LABELS.iter().position(|l| *l == raw) {
                    Some(node) => node,
                    None => args.index(0)?,
                };
                Algorithm::ShortestPath { source }
            }
            "mst" => Algorithm::MinimumSpanningTree,
            other => return Err(Error::InvalidInput(format!("unknown algorithm '{other}'"))),
        };
        Ok(algorithm)
    }
}

struct Args<'a> {
    id: &'a str,
    rest: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn raw(&self, position: usize, name: &str) -> Result<&'a str> {
        self.rest
            .get(position)
            .copied()
            .ok_or_else(|| Error::InvalidInput(format!("'{}' needs a {name}", self.id)))
    }

    fn value(&self, position: usize) -> Result<Value> {
        let raw = self.raw(position, "value")?;
        raw.parse()
            .map_err(|_| Error::InvalidInput(format!("'{raw}' is not an integer")))
    }

    fn index(&self, position: usize) -> Result<usize> {
        let raw = self.raw(position, "position")?;
        raw.parse()
            .map_err(|_| Error::InvalidInput(format!("'{raw}' is not a position")))
    }
}
