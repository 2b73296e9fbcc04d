//! Weighted undirected graph with shortest-path and spanning-tree runners.
//!
//! Graph mode uses one fixed reference topology that regenerates identically
//! on every request. Step indices are node indices.

use crate::dataset::Dataset;
use crate::step::{Flow, Outcome, Step, StepSink};

/// Undirected weighted edge between two node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: u64,
}

impl Edge {
    pub const fn new(from: usize, to: usize, weight: u64) -> Self {
        Self { from, to, weight }
    }

    /// The endpoint opposite `node`, if `node` touches this edge.
    pub fn other(&self, node: usize) -> Option<usize> {
        if self.from == node {
            Some(self.to)
        } else if self.to == node {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    labels: Vec<String>,
    edges: Vec<Edge>,
}

/// Labels of the reference topology.
pub const REFERENCE_LABELS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Edges of the reference topology as (from, to, weight).
pub const REFERENCE_EDGES: [(usize, usize, u64); 9] = [
    (0, 1, 4),
    (0, 2, 2),
    (1, 2, 1),
    (1, 3, 5),
    (2, 3, 8),
    (2, 4, 10),
    (3, 4, 2),
    (3, 5, 6),
    (4, 5, 3),
];

impl Graph {
    /// Build a graph. Edges whose endpoints fall outside `labels` are dropped.
    pub fn new(labels: Vec<String>, edges: Vec<Edge>) -> Self {
        let n = labels.len();
        let edges = edges.into_iter().filter(|e| e.from < n && e.to < n).collect();
        Self { labels, edges }
    }

    /// Six labelled nodes A–F with a fixed weighted edge set.
    pub fn reference() -> Self {
        Self::new(
            REFERENCE_LABELS.iter().map(|l| l.to_string()).collect(),
            REFERENCE_EDGES
                .iter()
                .map(|&(from, to, weight)| Edge::new(from, to, weight))
                .collect(),
        )
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, node: usize) -> Option<&str> {
        self.labels.get(node).map(String::as_str)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Index of the node labelled `label`.
    pub fn node_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

/// Dijkstra's algorithm with a linear scan for the closest unsettled node.
///
/// Emits a `Visit` when a node settles and a `Comparison` per relaxation.
/// Ties between equally distant nodes go to the lower index.
pub fn shortest_paths<S: StepSink + ?Sized>(graph: &Graph, source: usize, sink: &mut S) -> Flow {
    let snapshot = Dataset::Graph(graph.clone());
    let n = graph.node_count();
    let mut distances: Vec<Option<u64>> = vec![None; n];
    let mut settled = vec![false; n];
    if source < n {
        distances[source] = Some(0);
    }

    loop {
        let next = (0..n)
            .filter(|&node| !settled[node])
            .filter_map(|node| distances[node].map(|d| (d, node)))
            .min();
        let Some((distance, node)) = next else { break };

        settled[node] = true;
        sink.emit(Step::visit(vec![node], snapshot.clone()))?;

        for edge in graph.edges() {
            let Some(neighbor) = edge.other(node) else { continue };
            if settled[neighbor] {
                continue;
            }
            sink.emit(Step::comparison(vec![node, neighbor], snapshot.clone()))?;
            let candidate = distance.saturating_add(edge.weight);
            if distances[neighbor].map_or(true, |current| candidate < current) {
                distances[neighbor] = Some(candidate);
            }
        }
    }

    sink.emit(Step::done(Outcome::ShortestPaths { source, distances }, snapshot))
}

/// Kruskal's algorithm over edges sorted by weight (ties by edge index).
///
/// Emits a `Comparison` per candidate edge and a `Visit` per accepted one,
/// stopping once the forest spans every node it can.
pub fn minimum_spanning_tree<S: StepSink + ?Sized>(graph: &Graph, sink: &mut S) -> Flow {
    let snapshot = Dataset::Graph(graph.clone());
    let n = graph.node_count();
    let mut order: Vec<usize> = (0..graph.edges().len()).collect();
    order.sort_by_key(|&i| (graph.edges()[i].weight, i));

    let mut sets = DisjointSets::new(n);
    let mut accepted = Vec::new();
    let mut total_weight: u64 = 0;

    for index in order {
        if accepted.len() + 1 >= n {
            break;
        }
        let edge = graph.edges()[index];
        sink.emit(Step::comparison(vec![edge.from, edge.to], snapshot.clone()))?;
        if sets.union(edge.from, edge.to) {
            accepted.push(index);
            total_weight = total_weight.saturating_add(edge.weight);
            sink.emit(Step::visit(vec![edge.from, edge.to], snapshot.clone()))?;
        }
    }

    sink.emit(Step::done(
        Outcome::SpanningTree {
            edges: accepted,
            total_weight,
        },
        snapshot,
    ))
}

struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Merge the sets of `a` and `b`; `false` if they were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[rb] = ra;
        true
    }
}
