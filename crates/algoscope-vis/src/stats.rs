//! Per-run operation counters.

use algoscope_algorithms::{Step, StepKind};
use serde::{Deserialize, Serialize};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub comparisons: u64,
    /// Mutation steps, reported to users as swaps
    pub mutations: u64,
    pub visits: u64,
    /// Every delivered step, including `Done`
    pub steps: u64,
}

impl Stats {
    /// Mutation count under its user-facing name.
    pub fn swaps(&self) -> u64 {
        self.mutations
    }
}

/// Accumulates [`Stats`] from delivered steps.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    stats: Stats,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: &Step) {
        match step.kind {
            StepKind::Comparison => self.stats.comparisons += 1,
            StepKind::Mutation => self.stats.mutations += 1,
            StepKind::Visit => self.stats.visits += 1,
            StepKind::Done => {}
        }
        self.stats.steps += 1;
    }

    pub fn reset(&mut self) {
        self.stats = Stats::default();
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_algorithms::{Algorithm, Dataset};

    #[test]
    fn counts_bubble_sort() {
        let mut recorder = StatsRecorder::new();
        for step in Algorithm::BubbleSort
            .record(Dataset::Array(vec![5, 3, 8, 1]))
            .unwrap()
        {
            recorder.record(&step);
        }
        let stats = recorder.stats();
        assert_eq!(stats.comparisons, 6);
        assert_eq!(stats.swaps(), 4);
        assert_eq!(stats.visits, 0);
        assert_eq!(stats.steps, 11);
    }

    #[test]
    fn reset_clears_everything() {
        let mut recorder = StatsRecorder::new();
        recorder.record(&Step::visit(vec![0], Dataset::Array(vec![1])));
        assert_eq!(recorder.stats().visits, 1);
        recorder.reset();
        assert_eq!(recorder.stats(), Stats::default());
    }
}
