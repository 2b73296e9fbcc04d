//! Binary search tree and its runners.
//!
//! Nodes own their children; there are no parent pointers. Step indices for
//! tree runs are in-order ranks within the step's snapshot, which for a BST
//! with unique values is the node's position in sorted order.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::dataset::{Dataset, Value};
use crate::error::Error;
use crate::step::{Flow, Outcome, Step, StepSink};

/// A tree node. `left` holds smaller values, `right` larger ones.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    pub value: Value,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub const fn leaf(value: Value) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }
}

/// Binary search tree without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryTree {
    root: Option<Box<TreeNode>>,
    len: usize,
}

impl BinaryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree by inserting `values` in order. Duplicates are dropped.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value);
        }
        tree
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `value`. Returns `false` (and changes nothing) for a duplicate.
    pub fn insert(&mut self, value: Value) -> bool {
        let inserted = insert_into(&mut self.root, value);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub fn contains(&self, value: Value) -> bool {
        self.search_path(value).last() == Some(&value)
    }

    /// Values compared while descending towards `value`, root first.
    pub fn search_path(&self, value: Value) -> Vec<Value> {
        let mut path = Vec::new();
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            path.push(node.value);
            cursor = match value.cmp(&node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => None,
            };
        }
        path
    }

    /// In-order rank of `value`, if present.
    pub fn rank_of(&self, value: Value) -> Option<usize> {
        self.in_order().binary_search(&value).ok()
    }

    pub fn in_order(&self) -> Vec<Value> {
        self.traverse(TraversalOrder::InOrder)
    }

    pub fn traverse(&self, order: TraversalOrder) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.len);
        walk(self.root.as_deref(), order, &mut out);
        out
    }

    /// Number of levels; an empty tree has height 0.
    pub fn height(&self) -> usize {
        fn height_of(node: Option<&TreeNode>) -> usize {
            node.map_or(0, |n| {
                1 + height_of(n.left.as_deref()).max(height_of(n.right.as_deref()))
            })
        }
        height_of(self.root.as_deref())
    }

    /// Values grouped by depth, breadth-first.
    pub fn levels(&self) -> Vec<Vec<Value>> {
        let mut levels: Vec<Vec<Value>> = Vec::new();
        let mut queue: VecDeque<(&TreeNode, usize)> = VecDeque::new();
        if let Some(root) = self.root.as_deref() {
            queue.push_back((root, 0));
        }
        while let Some((node, depth)) = queue.pop_front() {
            if levels.len() <= depth {
                levels.push(Vec::new());
            }
            levels[depth].push(node.value);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                queue.push_back((child, depth + 1));
            }
        }
        levels
    }
}

fn insert_into(link: &mut Option<Box<TreeNode>>, value: Value) -> bool {
    match link {
        None => {
            *link = Some(Box::new(TreeNode::leaf(value)));
            true
        }
        Some(node) => match value.cmp(&node.value) {
            Ordering::Less => insert_into(&mut node.left, value),
            Ordering::Greater => insert_into(&mut node.right, value),
            Ordering::Equal => false,
        },
    }
}

fn walk(node: Option<&TreeNode>, order: TraversalOrder, out: &mut Vec<Value>) {
    let Some(node) = node else { return };
    if order == TraversalOrder::PreOrder {
        out.push(node.value);
    }
    walk(node.left.as_deref(), order, out);
    if order == TraversalOrder::InOrder {
        out.push(node.value);
    }
    walk(node.right.as_deref(), order, out);
    if order == TraversalOrder::PostOrder {
        out.push(node.value);
    }
}

/// Depth-first traversal orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraversalOrder {
    InOrder,
    PreOrder,
    PostOrder,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraversalOrder::InOrder => "inorder",
            TraversalOrder::PreOrder => "preorder",
            TraversalOrder::PostOrder => "postorder",
        })
    }
}

impl FromStr for TraversalOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inorder" | "in" => Ok(TraversalOrder::InOrder),
            "preorder" | "pre" => Ok(TraversalOrder::PreOrder),
            "postorder" | "post" => Ok(TraversalOrder::PostOrder),
            other => Err(Error::InvalidInput(format!("unknown traversal order '{other}'"))),
        }
    }
}

fn rank_in(order: &[Value], value: Value) -> usize {
    order.binary_search(&value).unwrap_or_else(|insert_at| insert_at)
}

/// Insert `value`, comparing against every node on the way down.
///
/// An equal value is dropped: the run ends with `Duplicate` and the tree is
/// left untouched.
pub fn insert<S: StepSink + ?Sized>(tree: &mut BinaryTree, value: Value, sink: &mut S) -> Flow {
    let before = Dataset::Tree(tree.clone());
    let sorted = tree.in_order();
    for node_value in tree.search_path(value) {
        sink.emit(Step::comparison(vec![rank_in(&sorted, node_value)], before.clone()))?;
    }

    if !tree.insert(value) {
        return sink.emit(Step::done(Outcome::Duplicate { value }, before));
    }
    let index = rank_in(&tree.in_order(), value);
    let after = Dataset::Tree(tree.clone());
    sink.emit(Step::mutation(vec![index], after.clone()))?;
    sink.emit(Step::done(Outcome::Inserted { index }, after))
}

/// Look `value` up along its search path.
pub fn search<S: StepSink + ?Sized>(tree: &BinaryTree, value: Value, sink: &mut S) -> Flow {
    let snapshot = Dataset::Tree(tree.clone());
    let sorted = tree.in_order();
    let path = tree.search_path(value);
    for node_value in &path {
        sink.emit(Step::comparison(vec![rank_in(&sorted, *node_value)], snapshot.clone()))?;
    }
    let outcome = if path.last() == Some(&value) {
        Outcome::Found {
            index: rank_in(&sorted, value),
        }
    } else {
        Outcome::NotFound
    };
    sink.emit(Step::done(outcome, snapshot))
}

/// Read-only walk; one `Visit` per node in traversal order.
pub fn traverse<S: StepSink + ?Sized>(
    tree: &BinaryTree,
    order: TraversalOrder,
    sink: &mut S,
) -> Flow {
    let snapshot = Dataset::Tree(tree.clone());
    let sorted = tree.in_order();
    let values = tree.traverse(order);
    for value in &values {
        sink.emit(Step::visit(vec![rank_in(&sorted, *value)], snapshot.clone()))?;
    }
    sink.emit(Step::done(Outcome::Traversal { order, values }, snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{Recorder, StepKind};
    use proptest::prelude::*;

    fn sample() -> BinaryTree {
        //        50
        //      /    \
        //    30      70
        //   /  \       \
        //  20  40       80
        BinaryTree::from_values([50, 30, 70, 20, 40, 80])
    }

    #[test]
    fn traversal_orders() {
        let tree = sample();
        assert_eq!(tree.traverse(TraversalOrder::InOrder), vec![20, 30, 40, 50, 70, 80]);
        assert_eq!(tree.traverse(TraversalOrder::PreOrder), vec![50, 30, 20, 40, 70, 80]);
        assert_eq!(tree.traverse(TraversalOrder::PostOrder), vec![20, 40, 30, 80, 70, 50]);
    }

    #[test]
    fn structure_queries() {
        let tree = sample();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.levels(), vec![vec![50], vec![30, 70], vec![20, 40, 80]]);
        assert_eq!(tree.search_path(45), vec![50, 30, 40]);
        assert_eq!(tree.rank_of(70), Some(4));
        assert_eq!(tree.rank_of(71), None);
    }

    #[test]
    fn insert_compares_along_path_then_mutates() {
        let mut tree = sample();
        let mut recorder = Recorder::new();
        insert(&mut tree, 45, &mut recorder).unwrap();

        let steps = recorder.into_steps();
        let kinds: Vec<_> = steps.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Comparison,
                StepKind::Comparison,
                StepKind::Comparison,
                StepKind::Mutation,
                StepKind::Done
            ]
        );
        // 50, 30, 40 have in-order ranks 3, 1, 2 before insertion.
        assert_eq!(steps[0].indices, vec![3]);
        assert_eq!(steps[1].indices, vec![1]);
        assert_eq!(steps[2].indices, vec![2]);
        assert_eq!(steps[4].outcome, Some(Outcome::Inserted { index: 3 }));
        assert!(tree.contains(45));
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut tree = sample();
        let mut recorder = Recorder::new();
        insert(&mut tree, 40, &mut recorder).unwrap();

        let steps = recorder.into_steps();
        assert!(steps.iter().all(|s| s.kind != StepKind::Mutation));
        assert_eq!(steps.last().unwrap().outcome, Some(Outcome::Duplicate { value: 40 }));
        assert_eq!(tree, sample());
    }

    #[test]
    fn search_reports_rank_or_not_found() {
        let tree = sample();
        let mut recorder = Recorder::new();
        search(&tree, 80, &mut recorder).unwrap();
        assert_eq!(
            recorder.steps().last().unwrap().outcome,
            Some(Outcome::Found { index: 5 })
        );

        let mut recorder = Recorder::new();
        search(&tree, 10, &mut recorder).unwrap();
        let steps = recorder.into_steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[3].outcome, Some(Outcome::NotFound));
    }

    #[test]
    fn traversal_visits_every_node_without_mutating() {
        let tree = sample();
        let mut recorder = Recorder::new();
        traverse(&tree, TraversalOrder::PreOrder, &mut recorder).unwrap();

        let steps = recorder.into_steps();
        let visits: Vec<_> = steps
            .iter()
            .filter(|s| s.kind == StepKind::Visit)
            .map(|s| s.indices[0])
            .collect();
        assert_eq!(visits, vec![3, 1, 0, 2, 4, 5]);
        assert!(steps.iter().all(|s| s.snapshot == Dataset::Tree(sample())));
    }

    #[test]
    fn empty_tree_runs() {
        let mut tree = BinaryTree::new();
        let mut recorder = Recorder::new();
        traverse(&tree, TraversalOrder::InOrder, &mut recorder).unwrap();
        assert_eq!(recorder.steps().len(), 1);

        let mut recorder = Recorder::new();
        insert(&mut tree, 5, &mut recorder).unwrap();
        assert_eq!(
            recorder.steps().last().unwrap().outcome,
            Some(Outcome::Inserted { index: 0 })
        );
    }

    #[test]
    fn traversal_order_parsing() {
        assert_eq!("pre".parse::<TraversalOrder>().unwrap(), TraversalOrder::PreOrder);
        assert_eq!("inorder".parse::<TraversalOrder>().unwrap(), TraversalOrder::InOrder);
        assert!("sideways".parse::<TraversalOrder>().is_err());
    }

    proptest! {
        #[test]
        fn insert_then_in_order_contains_value_once(
            existing in prop::collection::vec(-100i64..100, 0..30),
            value in -100i64..100,
        ) {
            let mut tree = BinaryTree::from_values(existing.clone());
            let before = tree.in_order();
            insert(&mut tree, value, &mut Recorder::new()).unwrap();
            let after = tree.in_order();

            prop_assert_eq!(after.iter().filter(|v| **v == value).count(), 1);
            prop_assert!(after.windows(2).all(|w| w[0] < w[1]));
            if before.contains(&value) {
                prop_assert_eq!(before, after);
            } else {
                prop_assert_eq!(after.len(), before.len() + 1);
            }
        }
    }
}
