//! Datasets that runners operate on.
//!
//! A dataset is either a flat array of values (sorting and search) or one of
//! the node structures used by the tree, list, stack, queue and graph
//! runners. Renderers only ever see a dataset through a [`Step`](crate::Step)
//! snapshot; the live copy belongs to whoever drives the run.

use std::collections::VecDeque;
use std::fmt;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::list::LinkedList;
use crate::tree::BinaryTree;

/// A single validated value.
pub type Value = i64;

/// Shape of a dataset, used for validation and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DatasetKind {
    Array,
    Tree,
    List,
    Stack,
    Queue,
    Graph,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Array => "array",
            DatasetKind::Tree => "tree",
            DatasetKind::List => "linked list",
            DatasetKind::Stack => "stack",
            DatasetKind::Queue => "queue",
            DatasetKind::Graph => "graph",
        };
        f.write_str(name)
    }
}

/// What the user is about to visualize. Decides how a dataset is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scenario {
    /// Random values in generation order.
    Sorting,
    /// Random values sorted ascending, so binary search applies.
    Search,
    Tree,
    List,
    Stack,
    Queue,
    /// The fixed reference topology.
    Graph,
}

impl Scenario {
    /// The dataset shape this scenario produces.
    pub const fn dataset_kind(&self) -> DatasetKind {
        match self {
            Scenario::Sorting | Scenario::Search => DatasetKind::Array,
            Scenario::Tree => DatasetKind::Tree,
            Scenario::List => DatasetKind::List,
            Scenario::Stack => DatasetKind::Stack,
            Scenario::Queue => DatasetKind::Queue,
            Scenario::Graph => DatasetKind::Graph,
        }
    }
}

/// A dataset snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "data"))]
pub enum Dataset {
    /// Ordered values for sorting and searching.
    Array(Vec<Value>),
    /// Binary search tree.
    Tree(BinaryTree),
    /// Singly linked list.
    List(LinkedList),
    /// Stack; the top is the last element.
    Stack(Vec<Value>),
    /// Queue; the head is the front.
    Queue(VecDeque<Value>),
    /// Weighted undirected graph.
    Graph(Graph),
}

impl Dataset {
    /// Parse user-entered values separated by commas and/or whitespace.
    ///
    /// ```
    /// use algoscope_algorithms::Dataset;
    ///
    /// let dataset = Dataset::parse_values("5, 3 8,1").unwrap();
    /// assert_eq!(dataset, Dataset::Array(vec![5, 3, 8, 1]));
    /// assert!(Dataset::parse_values("5, x").is_err());
    /// ```
    pub fn parse_values(input: &str) -> Result<Self> {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<Value>()
                    .map_err(|_| Error::InvalidInput(format!("'{token}' is not an integer")))
            })
            .collect::<Result<Vec<_>>>()
            .map(Dataset::Array)
    }

    /// Shape of this dataset.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Dataset::Array(_) => DatasetKind::Array,
            Dataset::Tree(_) => DatasetKind::Tree,
            Dataset::List(_) => DatasetKind::List,
            Dataset::Stack(_) => DatasetKind::Stack,
            Dataset::Queue(_) => DatasetKind::Queue,
            Dataset::Graph(_) => DatasetKind::Graph,
        }
    }

    /// An empty dataset of the given shape. Graphs start as the reference topology.
    pub fn empty(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Array => Dataset::Array(Vec::new()),
            DatasetKind::Tree => Dataset::Tree(BinaryTree::new()),
            DatasetKind::List => Dataset::List(LinkedList::new()),
            DatasetKind::Stack => Dataset::Stack(Vec::new()),
            DatasetKind::Queue => Dataset::Queue(VecDeque::new()),
            DatasetKind::Graph => Dataset::Graph(Graph::reference()),
        }
    }

    /// Number of elements (nodes for trees and graphs).
    pub fn len(&self) -> usize {
        match self {
            Dataset::Array(values) | Dataset::Stack(values) => values.len(),
            Dataset::Tree(tree) => tree.len(),
            Dataset::List(list) => list.len(),
            Dataset::Queue(queue) => queue.len(),
            Dataset::Graph(graph) => graph.node_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in the dataset's natural order.
    ///
    /// Step indices refer to positions in this sequence: array index,
    /// list/stack/queue position, or in-order rank for trees. Graphs have no
    /// values and return an empty sequence.
    pub fn values(&self) -> Vec<Value> {
        match self {
            Dataset::Array(values) | Dataset::Stack(values) => values.clone(),
            Dataset::Tree(tree) => tree.in_order(),
            Dataset::List(list) => list.values(),
            Dataset::Queue(queue) => queue.iter().copied().collect(),
            Dataset::Graph(_) => Vec::new(),
        }
    }

    /// Borrow the array contents, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Dataset::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl From<Vec<Value>> for Dataset {
    fn from(values: Vec<Value>) -> Self {
        Dataset::Array(values)
    }
}

/// Whether `values` is in non-decreasing order.
pub fn is_sorted(values: &[Value]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_mixed_separators() {
        let dataset = Dataset::parse_values(" 10,20  30,\n-4 ").unwrap();
        assert_eq!(dataset, Dataset::Array(vec![10, 20, 30, -4]));
    }

    #[test]
    fn parse_rejects_non_numeric_entries() {
        let err = Dataset::parse_values("1, two, 3").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("two")));
    }

    #[test]
    fn parse_empty_input_is_empty_array() {
        assert_eq!(Dataset::parse_values("").unwrap(), Dataset::Array(vec![]));
    }

    #[test]
    fn empty_datasets_have_expected_shape() {
        for kind in [
            DatasetKind::Array,
            DatasetKind::Tree,
            DatasetKind::List,
            DatasetKind::Stack,
            DatasetKind::Queue,
        ] {
            let dataset = Dataset::empty(kind);
            assert_eq!(dataset.kind(), kind);
            assert!(dataset.is_empty());
        }
        assert_eq!(Dataset::empty(DatasetKind::Graph).len(), 6);
    }

    #[test]
    fn sortedness_check() {
        assert!(is_sorted(&[]));
        assert!(is_sorted(&[1]));
        assert!(is_sorted(&[1, 1, 2]));
        assert!(!is_sorted(&[2, 1]));
    }
}
