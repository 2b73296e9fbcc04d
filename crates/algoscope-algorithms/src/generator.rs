//! Dataset generation.
//!
//! Arrays are drawn uniformly from a bounded range; search arrays come back
//! sorted. Structures that the user builds element by element (tree, list,
//! stack, queue) start empty, and graph mode always yields the reference
//! topology.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::dataset::{Dataset, Scenario, Value};

/// Number of values in a generated array unless configured otherwise.
pub const DEFAULT_SIZE: usize = 20;

/// Smallest generated value.
pub const DEFAULT_MIN: Value = 10;

/// Largest generated value (inclusive).
pub const DEFAULT_MAX: Value = 109;

/// Generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub min: Value,
    /// Inclusive upper bound.
    pub max: Value,
    /// Fixed seed for reproducible datasets; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            seed: None,
        }
    }
}

impl GeneratorOptions {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: Value, max: Value) -> Self {
        self.min = min.min(max);
        self.max = max.max(min);
        self
    }
}

/// Produces initial datasets.
#[derive(Debug)]
pub struct DatasetGenerator {
    options: GeneratorOptions,
    rng: StdRng,
}

impl DatasetGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { options, rng }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate the starting dataset for `scenario`.
    ///
    /// `size` only applies to array scenarios.
    pub fn generate(&mut self, scenario: Scenario, size: usize) -> Dataset {
        match scenario {
            Scenario::Sorting => Dataset::Array(self.random_values(size)),
            Scenario::Search => {
                let mut values = self.random_values(size);
                values.sort_unstable();
                Dataset::Array(values)
            }
            other => Dataset::empty(other.dataset_kind()),
        }
    }

    /// Pick a target uniformly from the dataset's values, so a search for it
    /// always succeeds. `None` for empty datasets and graphs.
    pub fn choose_target(&mut self, dataset: &Dataset) -> Option<Value> {
        dataset.values().choose(&mut self.rng).copied()
    }

    /// A sorted search dataset together with a target drawn from it.
    pub fn search_case(&mut self, size: usize) -> (Dataset, Option<Value>) {
        let dataset = self.generate(Scenario::Search, size);
        let target = self.choose_target(&dataset);
        (dataset, target)
    }

    /// A single value from the configured range, for user-driven inserts.
    pub fn random_value(&mut self) -> Value {
        self.rng.gen_range(self.options.min..=self.options.max)
    }

    fn random_values(&mut self, size: usize) -> Vec<Value> {
        (0..size).map(|_| self.random_value()).collect()
    }
}

impl Default for DatasetGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{is_sorted, DatasetKind};
    use crate::graph::Graph;

    fn seeded() -> DatasetGenerator {
        DatasetGenerator::new(GeneratorOptions::default().with_seed(7))
    }

    #[test]
    fn sorting_values_stay_in_range() {
        let dataset = seeded().generate(Scenario::Sorting, DEFAULT_SIZE);
        let values = dataset.as_array().unwrap();
        assert_eq!(values.len(), DEFAULT_SIZE);
        assert!(values.iter().all(|v| (DEFAULT_MIN..=DEFAULT_MAX).contains(v)));
    }

    #[test]
    fn search_values_are_sorted_and_target_present() {
        let (dataset, target) = seeded().search_case(DEFAULT_SIZE);
        let values = dataset.as_array().unwrap();
        assert!(is_sorted(values));
        assert!(values.contains(&target.unwrap()));
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = seeded().generate(Scenario::Sorting, 50);
        let b = seeded().generate(Scenario::Sorting, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn structures_start_empty() {
        let mut generator = seeded();
        for scenario in [Scenario::Tree, Scenario::List, Scenario::Stack, Scenario::Queue] {
            let dataset = generator.generate(scenario, DEFAULT_SIZE);
            assert!(dataset.is_empty());
            assert_eq!(dataset.kind(), scenario.dataset_kind());
        }
    }

    #[test]
    fn graph_is_the_reference_topology() {
        let mut generator = DatasetGenerator::default();
        assert_eq!(generator.generate(Scenario::Graph, 3), Dataset::Graph(Graph::reference()));
        assert_eq!(Scenario::Graph.dataset_kind(), DatasetKind::Graph);
    }

    #[test]
    fn custom_range_is_respected() {
        let mut generator =
            DatasetGenerator::new(GeneratorOptions::default().with_range(5, 1).with_seed(1));
        assert_eq!(generator.options().min, 1);
        for _ in 0..100 {
            assert!((1..=5).contains(&generator.random_value()));
        }
    }

    #[test]
    fn empty_dataset_has_no_target() {
        assert_eq!(seeded().choose_target(&Dataset::Array(vec![])), None);
    }
}
