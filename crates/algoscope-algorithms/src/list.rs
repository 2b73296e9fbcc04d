//! Singly linked list, stack and queue runners.
//!
//! The list has no back-pointers, so every positional operation walks from
//! the head and reports one `Visit` per node it passes. A stack is accessed
//! only at its tail; a queue enqueues at the tail and dequeues at the head.

use std::collections::VecDeque;

use crate::dataset::{Dataset, Value};
use crate::step::{Flow, Outcome, Step, StepSink};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListNode {
    pub value: Value,
    pub next: Option<Box<ListNode>>,
}

/// Singly linked list with positional (0-based) access.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkedList {
    head: Option<Box<ListNode>>,
    len: usize,
}

impl LinkedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut list = Self::new();
        for value in values {
            list.insert_at(list.len, value);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    pub fn values(&self) -> Vec<Value> {
        self.iter().collect()
    }

    /// Insert before position `index`; `index == len` appends.
    ///
    /// Returns `false` without changes when `index > len`.
    pub fn insert_at(&mut self, index: usize, value: Value) -> bool {
        if index > self.len {
            return false;
        }
        let mut cursor = &mut self.head;
        for _ in 0..index {
            match cursor {
                Some(node) => cursor = &mut node.next,
                None => return false,
            }
        }
        let next = cursor.take();
        *cursor = Some(Box::new(ListNode { value, next }));
        self.len += 1;
        true
    }

    /// Remove and return the value at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Value> {
        if index >= self.len {
            return None;
        }
        let mut cursor = &mut self.head;
        for _ in 0..index {
            match cursor {
                Some(node) => cursor = &mut node.next,
                None => return None,
            }
        }
        let mut node = cursor.take()?;
        *cursor = node.next.take();
        self.len -= 1;
        Some(node.value)
    }
}

impl Drop for LinkedList {
    // Unlink iteratively so long lists do not recurse through `Box` drops.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

pub struct Iter<'a> {
    next: Option<&'a ListNode>,
}

impl Iterator for Iter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            node.value
        })
    }
}

/// Walk positions `0..count`, emitting a visit for each node passed.
fn walk<S: StepSink + ?Sized>(count: usize, snapshot: &Dataset, sink: &mut S) -> Flow {
    for position in 0..count {
        sink.emit(Step::visit(vec![position], snapshot.clone()))?;
    }
    Ok(())
}

/// Insert `value` before `index`, visiting the `index` nodes in front of it.
///
/// `index` must be at most `list.len()`.
pub fn insert_at<S: StepSink + ?Sized>(
    list: &mut LinkedList,
    index: usize,
    value: Value,
    sink: &mut S,
) -> Flow {
    walk(index, &Dataset::List(list.clone()), sink)?;
    list.insert_at(index, value);
    let after = Dataset::List(list.clone());
    sink.emit(Step::mutation(vec![index], after.clone()))?;
    sink.emit(Step::done(Outcome::Inserted { index }, after))
}

/// Append at the tail; walks the whole list first.
pub fn append<S: StepSink + ?Sized>(list: &mut LinkedList, value: Value, sink: &mut S) -> Flow {
    let index = list.len();
    insert_at(list, index, value, sink)
}

pub fn prepend<S: StepSink + ?Sized>(list: &mut LinkedList, value: Value, sink: &mut S) -> Flow {
    insert_at(list, 0, value, sink)
}

/// Remove the node at `index`. Costs `index + 1` visits.
///
/// `index` must be below `list.len()`.
pub fn remove_at<S: StepSink + ?Sized>(list: &mut LinkedList, index: usize, sink: &mut S) -> Flow {
    walk(index + 1, &Dataset::List(list.clone()), sink)?;
    let value = list.remove_at(index);
    let after = Dataset::List(list.clone());
    sink.emit(Step::mutation(vec![index], after.clone()))?;
    sink.emit(Step::done(Outcome::Removed { value }, after))
}

/// Find the first node holding `value`.
pub fn find<S: StepSink + ?Sized>(list: &LinkedList, value: Value, sink: &mut S) -> Flow {
    let snapshot = Dataset::List(list.clone());
    for (index, current) in list.iter().enumerate() {
        sink.emit(Step::visit(vec![index], snapshot.clone()))?;
        if current == value {
            return sink.emit(Step::done(Outcome::Found { index }, snapshot));
        }
    }
    sink.emit(Step::done(Outcome::NotFound, snapshot))
}

pub fn stack_push<S: StepSink + ?Sized>(stack: &mut Vec<Value>, value: Value, sink: &mut S) -> Flow {
    stack.push(value);
    let index = stack.len() - 1;
    let after = Dataset::Stack(stack.clone());
    sink.emit(Step::mutation(vec![index], after.clone()))?;
    sink.emit(Step::done(Outcome::Inserted { index }, after))
}

/// Pop the top. An empty stack ends with `Removed { value: None }`.
pub fn stack_pop<S: StepSink + ?Sized>(stack: &mut Vec<Value>, sink: &mut S) -> Flow {
    let Some(top) = stack.len().checked_sub(1) else {
        return sink.emit(Step::done(Outcome::Removed { value: None }, Dataset::Stack(Vec::new())));
    };
    sink.emit(Step::visit(vec![top], Dataset::Stack(stack.clone())))?;
    let value = stack.pop();
    let after = Dataset::Stack(stack.clone());
    sink.emit(Step::mutation(vec![top], after.clone()))?;
    sink.emit(Step::done(Outcome::Removed { value }, after))
}

pub fn stack_peek<S: StepSink + ?Sized>(stack: &[Value], sink: &mut S) -> Flow {
    let snapshot = Dataset::Stack(stack.to_vec());
    if let Some(top) = stack.len().checked_sub(1) {
        sink.emit(Step::visit(vec![top], snapshot.clone()))?;
    }
    let value = stack.last().copied();
    sink.emit(Step::done(Outcome::Peeked { value }, snapshot))
}

pub fn enqueue<S: StepSink + ?Sized>(queue: &mut VecDeque<Value>, value: Value, sink: &mut S) -> Flow {
    queue.push_back(value);
    let index = queue.len() - 1;
    let after = Dataset::Queue(queue.clone());
    sink.emit(Step::mutation(vec![index], after.clone()))?;
    sink.emit(Step::done(Outcome::Inserted { index }, after))
}

/// Remove the head. An empty queue ends with `Removed { value: None }`.
pub fn dequeue<S: StepSink + ?Sized>(queue: &mut VecDeque<Value>, sink: &mut S) -> Flow {
    if queue.is_empty() {
        return sink.emit(Step::done(Outcome::Removed { value: None }, Dataset::Queue(VecDeque::new())));
    }
    sink.emit(Step::visit(vec![0], Dataset::Queue(queue.clone())))?;
    let value = queue.pop_front();
    let after = Dataset::Queue(queue.clone());
    sink.emit(Step::mutation(vec![0], after.clone()))?;
    sink.emit(Step::done(Outcome::Removed { value }, after))
}

pub fn queue_peek<S: StepSink + ?Sized>(queue: &VecDeque<Value>, sink: &mut S) -> Flow {
    let snapshot = Dataset::Queue(queue.clone());
    if !queue.is_empty() {
        sink.emit(Step::visit(vec![0], snapshot.clone()))?;
    }
    let value = queue.front().copied();
    sink.emit(Step::done(Outcome::Peeked { value }, snapshot))
}
