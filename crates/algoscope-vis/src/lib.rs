//! Algoscope Playback
//!
//! Turns algorithm step streams into paced, cancellable visualizations.
//!
//! # Architecture
//!
//! - **Stream**: runs an algorithm on its own thread, one step per pull
//! - **Playback**: paces delivery, tracks run state, handles cancellation
//! - **Stats**: counts comparisons, swaps and visits per run
//! - **Render**: pluggable adapters for terminal text and JSON lines
//!
//! # Usage
//!
//! ```no_run
//! use algoscope_algorithms::{Algorithm, Dataset};
//! use algoscope_vis::{PlaybackConfig, PlaybackController, TextRenderer};
//!
//! # async fn demo() -> algoscope_vis::Result<()> {
//! let controller = PlaybackController::new(PlaybackConfig::default());
//! let handle = controller
//!     .start_with(
//!         Algorithm::QuickSort,
//!         Dataset::Array(vec![42, 17, 99, 3]),
//!         100,
//!         TextRenderer::new(std::io::stdout()),
//!     )
//!     .await?;
//! let report = handle.finished().await?;
//! println!("{} comparisons", report.stats.comparisons);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod playback;
mod render;
mod stats;
mod stream;

pub use config::{PlaybackConfig, ENV_DATASET_SIZE, ENV_SEED, ENV_SPEED_MS, ENV_SUB_STEP_RATIO};
pub use error::{Error, Result};
pub use playback::{PlaybackController, PlaybackState, PlaybackStatus, RunHandle, RunOutcome, RunReport};
pub use render::{describe, Frame, JsonLinesRenderer, NullRenderer, RenderAdapter, TextRenderer};
pub use stats::{Stats, StatsRecorder};
pub use stream::StepStream;

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_algorithms::{Algorithm, Dataset, DatasetGenerator, Outcome, Scenario};

    #[tokio::test(start_paused = true)]
    async fn text_playback_ends_with_summary() {
        let controller = PlaybackController::new(PlaybackConfig::default());
        let handle = controller
            .start_with(
                Algorithm::LinearSearch { target: 7 },
                Dataset::Array(vec![3, 7, 7]),
                50,
                TextRenderer::new(Vec::new()),
            )
            .await
            .unwrap();
        let report = handle.finished().await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed(Outcome::Found { index: 1 }));
        assert_eq!(report.stats.visits, 2);
        assert_eq!(report.stats.steps, 3);
    }

    #[test]
    fn config_seed_makes_generation_reproducible() {
        let config = PlaybackConfig {
            seed: Some(17),
            ..PlaybackConfig::default()
        };
        let a = DatasetGenerator::new(config.generator_options())
            .generate(Scenario::Sorting, config.dataset_size);
        let b = DatasetGenerator::new(config.generator_options())
            .generate(Scenario::Sorting, config.dataset_size);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }
}
