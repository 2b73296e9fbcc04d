//! Algoscope terminal player
//!
//! Generate a dataset (or take one from `--values`), play an algorithm over
//! it in the terminal and print the final statistics.
//!
//! ```text
//! algoscope <algorithm> [size] [speed_ms] [--values LIST] [--json]
//! ```

use std::io::IsTerminal;

use algoscope_algorithms::{
    Algorithm, BinaryTree, Dataset, DatasetGenerator, Error, LinkedList, Scenario, Value,
};
use algoscope_vis::{
    JsonLinesRenderer, PlaybackConfig, PlaybackController, RenderAdapter, RunOutcome, TextRenderer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: algoscope <algorithm> [size] [speed_ms] [--values LIST] [--json]

algorithms:
  bubble selection insertion merge quick heap
  linear[:target] binary[:target]
  tree-insert:V tree-search:V tree-traverse[:in|pre|post]
  list-append:V list-prepend:V list-insert:I:V list-remove:I list-find:V
  push:V pop peek enqueue:V dequeue front
  dijkstra[:A-F] mst

options:
  --values LIST  play over these integers (e.g. \"5,3,8,1\") instead of generating
  --json         write frames as JSON lines";

/// Values pre-loaded into structures so operations have something to work on.
const STRUCTURE_FILL: usize = 7;

/// Parsed command line.
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Play(Options),
}

#[derive(Debug, PartialEq)]
struct Options {
    spec: String,
    size: Option<usize>,
    speed_ms: Option<u64>,
    values: Option<Vec<Value>>,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Frames go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoscope=info,algoscope_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Play(options)) => options,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(message) => {
            eprintln!("algoscope: {message}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config = PlaybackConfig::from_env()?;
    let size = options.size.unwrap_or(config.dataset_size);
    let speed_ms = options.speed_ms.unwrap_or(config.default_speed_ms);

    let mut generator = DatasetGenerator::new(config.generator_options());
    let (algorithm, dataset) = prepare(&options.spec, size, options.values, &mut generator)?;
    tracing::info!(%algorithm, size = dataset.len(), "prepared");

    let renderer: Box<dyn RenderAdapter> = if options.json {
        Box::new(JsonLinesRenderer::new(std::io::stdout()))
    } else {
        let clear = std::io::stdout().is_terminal();
        Box::new(TextRenderer::new(std::io::stdout()).with_clear(clear))
    };

    let controller = PlaybackController::new(config);
    let handle = controller
        .start_with(algorithm, dataset, speed_ms, renderer)
        .await?;

    let token = handle.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let report = handle.finished().await?;
    if let RunOutcome::Cancelled { .. } = report.outcome {
        std::process::exit(130);
    }
    Ok(())
}

/// Parse everything after the program name.
fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut json = false;
    let mut values = None;
    let mut positional = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => return Ok(Command::Help),
            "--values" => {
                let list = args.next().ok_or("--values needs a list of integers")?;
                let dataset = Dataset::parse_values(&list).map_err(|e| e.to_string())?;
                values = Some(dataset.values());
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let spec = positional.next().ok_or("missing algorithm")?;
    let size = positional
        .next()
        .map(|s| s.parse().map_err(|_| format!("size must be a count, got '{s}'")))
        .transpose()?;
    let speed_ms = positional
        .next()
        .map(|s| s.parse().map_err(|_| format!("speed_ms must be milliseconds, got '{s}'")))
        .transpose()?;
    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument '{extra}'"));
    }

    Ok(Command::Play(Options {
        spec,
        size,
        speed_ms,
        values,
        json,
    }))
}

/// Resolve the algorithm argument and build the dataset it runs on.
///
/// A bare `linear` or `binary` searches for a value drawn from the data.
/// Given `values`, those are used instead of generated ones.
fn prepare(
    spec: &str,
    size: usize,
    values: Option<Vec<Value>>,
    generator: &mut DatasetGenerator,
) -> algoscope_algorithms::Result<(Algorithm, Dataset)> {
    match spec {
        "linear" | "binary" => {
            let (dataset, target) = match values {
                Some(values) => {
                    let dataset = Dataset::Array(values);
                    let target = generator.choose_target(&dataset);
                    (dataset, target)
                }
                None => generator.search_case(size),
            };
            let target = target.unwrap_or_else(|| generator.random_value());
            let algorithm = if spec == "linear" {
                Algorithm::LinearSearch { target }
            } else {
                Algorithm::BinarySearch { target }
            };
            Ok((algorithm, dataset))
        }
        _ => {
            let algorithm: Algorithm = spec.parse()?;
            let scenario = algorithm.scenario();
            let dataset = match (scenario, values) {
                (Scenario::Graph, Some(_)) => {
                    return Err(Error::InvalidInput(format!(
                        "{algorithm} runs on the reference graph and takes no values"
                    )))
                }
                (Scenario::Sorting | Scenario::Search, Some(values)) => Dataset::Array(values),
                (Scenario::Sorting | Scenario::Search | Scenario::Graph, None) => {
                    generator.generate(scenario, size)
                }
                (_, values) => {
                    let values = values.unwrap_or_else(|| fill(generator));
                    match scenario {
                        Scenario::Tree => Dataset::Tree(BinaryTree::from_values(values)),
                        Scenario::List => Dataset::List(LinkedList::from_values(values)),
                        Scenario::Queue => Dataset::Queue(values.into()),
                        _ => Dataset::Stack(values),
                    }
                }
            };
            Ok((algorithm, dataset))
        }
    }
}

fn fill(generator: &mut DatasetGenerator) -> Vec<Value> {
    (0..STRUCTURE_FILL).map(|_| generator.random_value()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_algorithms::GeneratorOptions;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn generator() -> DatasetGenerator {
        DatasetGenerator::new(GeneratorOptions::default().with_seed(11))
    }

    #[test]
    fn positional_size_and_speed() {
        let Command::Play(options) = parse_args(args(&["quick", "12", "40", "--json"])).unwrap() else {
            panic!("expected a run");
        };
        assert_eq!(options.spec, "quick");
        assert_eq!(options.size, Some(12));
        assert_eq!(options.speed_ms, Some(40));
        assert!(options.json);
        assert_eq!(options.values, None);
    }

    #[test]
    fn malformed_numbers_are_usage_errors() {
        let err = parse_args(args(&["bubble", "ten"])).unwrap_err();
        assert!(err.contains("'ten'"), "{err}");
        let err = parse_args(args(&["bubble", "10", "-5"])).unwrap_err();
        assert!(err.contains("'-5'"), "{err}");
        assert!(parse_args(args(&["bubble", "10", "20", "30"])).is_err());
        assert!(parse_args(args(&["bubble", "--fast"])).is_err());
        assert!(parse_args(args(&[])).is_err());
    }

    #[test]
    fn values_flag_is_parsed() {
        let Command::Play(options) = parse_args(args(&["bubble", "--values", "5, 3 8,1"])).unwrap()
        else {
            panic!("expected a run");
        };
        assert_eq!(options.values, Some(vec![5, 3, 8, 1]));

        assert!(parse_args(args(&["bubble", "--values", "5,x"])).is_err());
        assert!(parse_args(args(&["bubble", "--values"])).is_err());
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse_args(args(&["bubble", "--help"])), Ok(Command::Help));
    }

    #[test]
    fn given_values_replace_generated_ones() {
        let mut generator = generator();
        let (algorithm, dataset) = prepare("bubble", 30, Some(vec![5, 3, 8, 1]), &mut generator).unwrap();
        assert_eq!(algorithm, Algorithm::BubbleSort);
        assert_eq!(dataset, Dataset::Array(vec![5, 3, 8, 1]));

        let (_, dataset) = prepare("pop", 30, Some(vec![1, 2]), &mut generator).unwrap();
        assert_eq!(dataset, Dataset::Stack(vec![1, 2]));

        let (algorithm, dataset) = prepare("linear", 30, Some(vec![4, 9, 2]), &mut generator).unwrap();
        let Algorithm::LinearSearch { target } = algorithm else {
            panic!("expected linear search, got {algorithm}");
        };
        assert!([4, 9, 2].contains(&target));
        assert_eq!(dataset.len(), 3);

        assert!(prepare("mst", 30, Some(vec![1]), &mut generator).is_err());
    }

    #[test]
    fn structures_are_prefilled() {
        let (_, dataset) = prepare("dequeue", 30, None, &mut generator()).unwrap();
        assert_eq!(dataset.len(), STRUCTURE_FILL);
    }
}
