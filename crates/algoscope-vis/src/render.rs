//! Render adapters.
//!
//! The controller hands every delivered step to a [`RenderAdapter`] as a
//! [`Frame`]. Adapters only draw; they never influence the run.

use std::io::Write;

use algoscope_algorithms::{Dataset, Graph, Outcome, Step, Value};
use serde::Serialize;

use crate::error::Result;
use crate::playback::{RunOutcome, RunReport};
use crate::stats::Stats;

/// Everything a renderer needs for one delivered step.
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    /// 1-based position of this step in the run
    pub sequence: u64,
    pub step: &'a Step,
    /// Dataset after the step
    pub dataset: &'a Dataset,
    pub highlights: &'a [usize],
    pub stats: Stats,
}

/// Draws frames. Called in strict emission order from the drive task.
pub trait RenderAdapter: Send + 'static {
    /// Draw one delivered step.
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;

    /// Called once when the run completes or is cancelled.
    ///
    /// Not called when delivery fails, whether from a render error or a
    /// runner that stopped early; that error is returned by
    /// [`RunHandle::finished`](crate::RunHandle::finished) instead.
    fn finish(&mut self, _report: &RunReport) -> Result<()> {
        Ok(())
    }
}

impl RenderAdapter for Box<dyn RenderAdapter> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).render(frame)
    }

    fn finish(&mut self, report: &RunReport) -> Result<()> {
        (**self).finish(report)
    }
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl RenderAdapter for NullRenderer {
    fn render(&mut self, _frame: &Frame<'_>) -> Result<()> {
        Ok(())
    }
}

const BAR_WIDTH: usize = 40;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Plain-text renderer: arrays as bar rows, other datasets as value rows.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
    clear: bool,
}

impl<W: Write + Send + 'static> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, clear: false }
    }

    /// Clear the terminal before each frame.
    #[must_use]
    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_array(&mut self, values: &[Value], highlights: &[usize]) -> Result<()> {
        let max = values.iter().copied().max().unwrap_or(0).max(1);
        for (index, &value) in values.iter().enumerate() {
            let marker = if highlights.contains(&index) { '>' } else { ' ' };
            let len = if value > 0 {
                ((value as u128 * BAR_WIDTH as u128) / max as u128).max(1) as usize
            } else {
                0
            };
            writeln!(self.out, "{marker} {index:>3} {value:>6} {}", "#".repeat(len))?;
        }
        Ok(())
    }

    fn write_row(&mut self, label: &str, values: &[Value], highlights: &[usize], sep: &str) -> Result<()> {
        let cells: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| mark(&v.to_string(), highlights.contains(&i)))
            .collect();
        writeln!(self.out, "{label}: {}", cells.join(sep))?;
        Ok(())
    }

    fn write_graph(&mut self, graph: &Graph, highlights: &[usize]) -> Result<()> {
        let nodes: Vec<String> = graph
            .labels()
            .iter()
            .enumerate()
            .map(|(i, l)| mark(l, highlights.contains(&i)))
            .collect();
        writeln!(self.out, "nodes: {}", nodes.join(" "))?;
        for edge in graph.edges() {
            let active = highlights.contains(&edge.from) && highlights.contains(&edge.to);
            let from = graph.label(edge.from).unwrap_or("?");
            let to = graph.label(edge.to).unwrap_or("?");
            let line = format!("{from}-{to} ({})", edge.weight);
            writeln!(self.out, "  {}", mark(&line, active))?;
        }
        Ok(())
    }
}

fn mark(text: &str, highlighted: bool) -> String {
    if highlighted {
        format!("[{text}]")
    } else {
        text.to_string()
    }
}

impl<W: Write + Send + 'static> RenderAdapter for TextRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        if self.clear {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        let stats = frame.stats;
        writeln!(
            self.out,
            "step {} {:?} | comparisons {} swaps {} visits {}",
            frame.sequence, frame.step.kind, stats.comparisons, stats.swaps(), stats.visits
        )?;

        match frame.dataset {
            Dataset::Array(values) => self.write_array(values, frame.highlights)?,
            Dataset::Tree(tree) => self.write_row("tree", &tree.in_order(), frame.highlights, " ")?,
            Dataset::List(list) => self.write_row("list", &list.values(), frame.highlights, " -> ")?,
            Dataset::Stack(stack) => self.write_row("stack (top last)", stack, frame.highlights, " | ")?,
            Dataset::Queue(queue) => {
                let values: Vec<Value> = queue.iter().copied().collect();
                self.write_row("queue (front first)", &values, frame.highlights, " | ")?
            }
            Dataset::Graph(graph) => self.write_graph(graph, frame.highlights)?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self, report: &RunReport) -> Result<()> {
        match &report.outcome {
            RunOutcome::Completed(outcome) => {
                writeln!(self.out, "{}: {}", report.algorithm, describe(outcome, &report.dataset))?
            }
            RunOutcome::Cancelled { delivered } => {
                writeln!(self.out, "{}: cancelled after {delivered} steps", report.algorithm)?
            }
        }
        let stats = report.stats;
        writeln!(
            self.out,
            "comparisons {} swaps {} visits {} steps {}",
            stats.comparisons,
            stats.swaps(),
            stats.visits,
            stats.steps
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Human-readable summary of an outcome.
pub fn describe(outcome: &Outcome, dataset: &Dataset) -> String {
    let label = |node: usize| match dataset {
        Dataset::Graph(graph) => graph.label(node).map(str::to_string),
        _ => None,
    }
    .unwrap_or_else(|| node.to_string());

    match outcome {
        Outcome::Sorted => "sorted".to_string(),
        Outcome::Found { index } => format!("found at index {index}"),
        Outcome::NotFound => "not found".to_string(),
        Outcome::Inserted { index } => format!("inserted at index {index}"),
        Outcome::Duplicate { value } => format!("{value} is already present"),
        Outcome::Removed { value: Some(value) } => format!("removed {value}"),
        Outcome::Removed { value: None } => "nothing to remove".to_string(),
        Outcome::Peeked { value: Some(value) } => format!("next is {value}"),
        Outcome::Peeked { value: None } => "empty".to_string(),
        Outcome::Traversal { order, values } => {
            let values: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("{order}: {}", values.join(" "))
        }
        Outcome::ShortestPaths { source, distances } => {
            let parts: Vec<String> = distances
                .iter()
                .enumerate()
                .map(|(node, d)| match d {
                    Some(d) => format!("{}={d}", label(node)),
                    None => format!("{}=unreachable", label(node)),
                })
                .collect();
            format!("distances from {}: {}", label(*source), parts.join(" "))
        }
        Outcome::SpanningTree { edges, total_weight } => {
            format!("spanning tree of {} edges, total weight {total_weight}", edges.len())
        }
    }
}

/// One JSON object per frame, plus a final report line.
#[derive(Debug)]
pub struct JsonLinesRenderer<W> {
    out: W,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Line<'a> {
    Frame(&'a Frame<'a>),
    Report(&'a RunReport),
}

impl<W: Write + Send + 'static> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &Line<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write + Send + 'static> RenderAdapter for JsonLinesRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.write_line(&Line::Frame(frame))
    }

    fn finish(&mut self, report: &RunReport) -> Result<()> {
        self.write_line(&Line::Report(report))?;
        self.out.flush()?;
        Ok(())
    }
}
