//! Paced playback of step streams.
//!
//! A [`PlaybackController`] owns one run at a time. Starting a run spawns a
//! drive task that pulls steps from a [`StepStream`], records them, hands
//! them to a [`RenderAdapter`] and then sleeps for the configured delay.
//! Cancellation is observed before pulling, before delivering and while
//! sleeping; a step is either fully delivered or not at all.

use std::sync::Arc;

use algoscope_algorithms::{Algorithm, Dataset, DatasetGenerator, Outcome, Step};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::PlaybackConfig;
use crate::error::{Error, Result};
use crate::render::{Frame, RenderAdapter};
use crate::stats::{Stats, StatsRecorder};
use crate::stream::StepStream;

/// Current state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No run in progress
    Idle,
    /// A drive task is delivering steps
    Running,
    /// The last run was cancelled; behaves like `Idle`
    Cancelled,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The runner reached `Done`
    Completed(Outcome),
    /// Stopped early after `delivered` steps
    Cancelled { delivered: u64 },
}

/// Final result of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub outcome: RunOutcome,
    pub stats: Stats,
    /// Dataset after the last delivered step
    pub dataset: Dataset,
}

impl RunReport {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, RunOutcome::Cancelled { .. })
    }
}

/// Mutable state shared between the controller and its drive task.
#[derive(Debug)]
struct RunState {
    algorithm: Algorithm,
    dataset: Dataset,
    speed_ms: u64,
    state: PlaybackState,
    stats: StatsRecorder,
    highlights: Vec<usize>,
    token: Option<CancellationToken>,
}

/// Point-in-time view of the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub algorithm: Algorithm,
    pub dataset: Dataset,
    pub speed_ms: u64,
    pub state: PlaybackState,
    pub stats: Stats,
    pub highlights: Vec<usize>,
}

impl RunState {
    fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            algorithm: self.algorithm,
            dataset: self.dataset.clone(),
            speed_ms: self.speed_ms,
            state: self.state,
            stats: self.stats.stats(),
            highlights: self.highlights.clone(),
        }
    }
}

/// Drives one run at a time.
///
/// Controllers share nothing with each other; any number can run side by
/// side.
#[derive(Debug)]
pub struct PlaybackController {
    config: Arc<PlaybackConfig>,
    run: Arc<RwLock<RunState>>,
}

/// Handle to a started run.
#[derive(Debug)]
pub struct RunHandle {
    token: CancellationToken,
    task: JoinHandle<Result<RunReport>>,
}

impl RunHandle {
    /// Request cancellation. Takes effect at the next suspension point.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A token that cancels this run when fired.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the drive task and return its report.
    pub async fn finished(self) -> Result<RunReport> {
        self.task.await?
    }
}

impl PlaybackController {
    /// Create an idle controller with bubble sort over an empty array selected.
    pub fn new(config: PlaybackConfig) -> Self {
        let run = RunState {
            algorithm: Algorithm::BubbleSort,
            dataset: Dataset::Array(Vec::new()),
            speed_ms: config.clamp_speed(config.default_speed_ms),
            state: PlaybackState::Idle,
            stats: StatsRecorder::new(),
            highlights: Vec::new(),
            token: None,
        };
        Self {
            config: Arc::new(config),
            run: Arc::new(RwLock::new(run)),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub async fn state(&self) -> PlaybackState {
        self.run.read().await.state
    }

    pub async fn status(&self) -> PlaybackStatus {
        self.run.read().await.status()
    }

    /// Start the selected algorithm on the loaded dataset.
    pub async fn start<R: RenderAdapter>(&self, renderer: R) -> Result<RunHandle> {
        let mut run = self.run.write().await;
        ensure_idle(&run, "start")?;
        let stream = StepStream::spawn(run.algorithm, run.dataset.clone())
            .inspect_err(|e| warn!(algorithm = %run.algorithm, error = %e, "rejected: invalid run"))?;
        Ok(self.launch(&mut run, stream, renderer))
    }

    /// Select, load and start in one step.
    ///
    /// Nothing changes when the run is rejected.
    pub async fn start_with<R: RenderAdapter>(
        &self,
        algorithm: Algorithm,
        dataset: Dataset,
        speed_ms: u64,
        renderer: R,
    ) -> Result<RunHandle> {
        let mut run = self.run.write().await;
        ensure_idle(&run, "start")?;
        let stream = StepStream::spawn(algorithm, dataset.clone())
            .inspect_err(|e| warn!(%algorithm, error = %e, "rejected: invalid run"))?;
        run.algorithm = algorithm;
        run.dataset = dataset;
        run.speed_ms = self.config.clamp_speed(speed_ms);
        Ok(self.launch(&mut run, stream, renderer))
    }

    fn launch<R: RenderAdapter>(
        &self,
        run: &mut RunState,
        stream: StepStream,
        renderer: R,
    ) -> RunHandle {
        let token = CancellationToken::new();
        run.stats.reset();
        run.highlights.clear();
        run.state = PlaybackState::Running;
        run.token = Some(token.clone());

        info!(
            algorithm = %run.algorithm,
            size = run.dataset.len(),
            speed_ms = run.speed_ms,
            "run started"
        );

        let drive = Drive {
            run: Arc::clone(&self.run),
            config: Arc::clone(&self.config),
            algorithm: run.algorithm,
            speed_ms: run.speed_ms,
            token: token.clone(),
        };
        let drive = tokio::spawn(drive.run(stream, renderer));
        let task = tokio::spawn(supervise(Arc::clone(&self.run), run.algorithm, drive));
        RunHandle { token, task }
    }

    /// Cancel the active run, if any.
    pub async fn cancel(&self) {
        let run = self.run.read().await;
        if let Some(token) = &run.token {
            token.cancel();
        }
    }

    /// Select the algorithm for the next run.
    ///
    /// When it needs a different kind of dataset the loaded one is replaced
    /// with an empty one of the right kind.
    pub async fn select_algorithm(&self, algorithm: Algorithm) -> Result<()> {
        let mut run = self.run.write().await;
        ensure_idle(&run, "select_algorithm")?;
        if run.dataset.kind() != algorithm.dataset_kind() {
            run.dataset = Dataset::empty(algorithm.dataset_kind());
            run.highlights.clear();
        }
        run.algorithm = algorithm;
        debug!(%algorithm, "algorithm selected");
        Ok(())
    }

    /// Replace the dataset for the next run.
    pub async fn load_dataset(&self, dataset: Dataset) -> Result<()> {
        let mut run = self.run.write().await;
        ensure_idle(&run, "load_dataset")?;
        debug!(kind = %dataset.kind(), size = dataset.len(), "dataset loaded");
        run.dataset = dataset;
        run.highlights.clear();
        Ok(())
    }

    /// Generate a fresh dataset for the selected algorithm and load it.
    pub async fn regenerate(&self, generator: &mut DatasetGenerator, size: usize) -> Result<Dataset> {
        let mut run = self.run.write().await;
        ensure_idle(&run, "regenerate")?;
        let dataset = generator.generate(run.algorithm.scenario(), size);
        run.dataset = dataset.clone();
        run.highlights.clear();
        Ok(dataset)
    }

    /// Set the delay between steps, clamped to the configured range.
    ///
    /// Returns the delay actually applied.
    pub async fn set_speed(&self, speed_ms: u64) -> Result<u64> {
        let mut run = self.run.write().await;
        ensure_idle(&run, "set_speed")?;
        run.speed_ms = self.config.clamp_speed(speed_ms);
        Ok(run.speed_ms)
    }
}

fn ensure_idle(run: &RunState, action: &str) -> Result<()> {
    if run.state == PlaybackState::Running {
        warn!(action, algorithm = %run.algorithm, "rejected: run in progress");
        return Err(Error::AlreadyRunning);
    }
    Ok(())
}

/// Wait for the drive task and put the controller back to `Idle` if it died
/// before doing so itself.
async fn supervise(
    run: Arc<RwLock<RunState>>,
    algorithm: Algorithm,
    drive: JoinHandle<Result<RunReport>>,
) -> Result<RunReport> {
    match drive.await {
        Ok(result) => result,
        Err(e) => {
            warn!(%algorithm, error = %e, "drive task failed");
            let mut run = run.write().await;
            run.state = PlaybackState::Idle;
            run.token = None;
            Err(e.into())
        }
    }
}

/// The spawned half of a run.
struct Drive {
    run: Arc<RwLock<RunState>>,
    config: Arc<PlaybackConfig>,
    algorithm: Algorithm,
    speed_ms: u64,
    token: CancellationToken,
}

impl Drive {
    async fn run<R: RenderAdapter>(self, mut stream: StepStream, mut renderer: R) -> Result<RunReport> {
        let result = self.deliver(&mut stream, &mut renderer).await;
        // Unblocks the runner thread if it is still producing.
        drop(stream);

        let report = {
            let mut run = self.run.write().await;
            run.token = None;
            run.state = match &result {
                Ok(RunOutcome::Cancelled { .. }) => PlaybackState::Cancelled,
                _ => PlaybackState::Idle,
            };
            match result {
                Ok(outcome) => RunReport {
                    algorithm: self.algorithm,
                    outcome,
                    stats: run.stats.stats(),
                    dataset: run.dataset.clone(),
                },
                Err(e) => {
                    // The renderer is not finished on failure; the error goes to the handle.
                    warn!(algorithm = %self.algorithm, error = %e, "run failed");
                    return Err(e);
                }
            }
        };

        match &report.outcome {
            RunOutcome::Completed(_) => {
                info!(algorithm = %self.algorithm, steps = report.stats.steps, "run completed")
            }
            RunOutcome::Cancelled { delivered } => {
                info!(algorithm = %self.algorithm, delivered, "run cancelled")
            }
        }
        renderer.finish(&report)?;
        Ok(report)
    }

    async fn deliver<R: RenderAdapter>(
        &self,
        stream: &mut StepStream,
        renderer: &mut R,
    ) -> Result<RunOutcome> {
        let mut delivered = 0;
        loop {
            let step = tokio::select! {
                biased;
                _ = self.token.cancelled() => return Ok(RunOutcome::Cancelled { delivered }),
                step = stream.next_step() => step,
            };
            let Some(step) = step else {
                return Err(Error::Join(format!("{} runner stopped before finishing", self.algorithm)));
            };
            if self.token.is_cancelled() {
                return Ok(RunOutcome::Cancelled { delivered });
            }

            delivered += 1;
            let stats = self.commit(&step).await;
            trace!(kind = ?step.kind, indices = ?step.indices, "step");
            debug!(sequence = delivered, comparisons = stats.comparisons, swaps = stats.swaps(), "step delivered");
            renderer.render(&Frame {
                sequence: delivered,
                step: &step,
                dataset: &step.snapshot,
                highlights: &step.indices,
                stats,
            })?;

            if let Some(outcome) = step.outcome {
                return Ok(RunOutcome::Completed(outcome));
            }

            let delay = self.config.delay(step.pace, self.speed_ms);
            if delay.is_zero() {
                tokio::task::yield_now().await;
                continue;
            }
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return Ok(RunOutcome::Cancelled { delivered }),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Adopt the step's snapshot and count it.
    async fn commit(&self, step: &Step) -> Stats {
        let mut run = self.run.write().await;
        run.stats.record(step);
        run.dataset = step.snapshot.clone();
        run.highlights = step.indices.clone();
        run.stats.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullRenderer;
    use algoscope_algorithms::{DatasetKind, GeneratorOptions, Scenario};
    use tokio_test::{assert_err, assert_ok};

    fn controller() -> PlaybackController {
        PlaybackController::new(PlaybackConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn completes_and_returns_to_idle() {
        let controller = controller();
        let handle = controller
            .start_with(
                Algorithm::BubbleSort,
                Dataset::Array(vec![5, 3, 8, 1]),
                10,
                NullRenderer,
            )
            .await
            .unwrap();
        let report = handle.finished().await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed(Outcome::Sorted));
        assert_eq!(report.stats.comparisons, 6);
        assert_eq!(report.dataset, Dataset::Array(vec![1, 3, 5, 8]));
        assert_eq!(controller.state().await, PlaybackState::Idle);
        assert_eq!(controller.status().await.dataset, report.dataset);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_rejected() {
        let controller = controller();
        let handle = controller
            .start_with(
                Algorithm::SelectionSort,
                Dataset::Array(vec![4, 3, 2, 1]),
                500,
                NullRenderer,
            )
            .await
            .unwrap();

        let err = controller.start(NullRenderer).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyRunning));
        assert_err!(controller.set_speed(20).await);
        assert_err!(controller.load_dataset(Dataset::Array(vec![1])).await);
        assert_err!(controller.select_algorithm(Algorithm::HeapSort).await);
        assert_eq!(controller.status().await.algorithm, Algorithm::SelectionSort);

        handle.cancel();
        let report = handle.finished().await.unwrap();
        assert!(report.is_cancelled());
        assert_eq!(controller.state().await, PlaybackState::Cancelled);
        assert_ok!(controller.set_speed(20).await);
    }

    #[tokio::test]
    async fn invalid_dataset_leaves_controller_idle() {
        let controller = controller();
        let err = controller
            .start_with(
                Algorithm::BinarySearch { target: 2 },
                Dataset::Array(vec![3, 1, 2]),
                100,
                NullRenderer,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Algorithm(_)));
        let status = controller.status().await;
        assert_eq!(status.state, PlaybackState::Idle);
        assert_eq!(status.algorithm, Algorithm::BubbleSort);
    }

    #[tokio::test]
    async fn speed_is_clamped() {
        let controller = controller();
        assert_eq!(controller.set_speed(1).await.unwrap(), 10);
        assert_eq!(controller.set_speed(9_999).await.unwrap(), 500);
        assert_eq!(controller.status().await.speed_ms, 500);
    }

    #[tokio::test]
    async fn selecting_another_kind_swaps_the_dataset() {
        let controller = controller();
        controller.select_algorithm(Algorithm::StackPop).await.unwrap();
        let status = controller.status().await;
        assert_eq!(status.dataset.kind(), DatasetKind::Stack);
        assert!(status.dataset.is_empty());
    }

    #[tokio::test]
    async fn regenerate_uses_the_selected_scenario() {
        let controller = controller();
        let mut generator = DatasetGenerator::new(GeneratorOptions::default().with_seed(5));
        controller
            .select_algorithm(Algorithm::BinarySearch { target: 0 })
            .await
            .unwrap();
        let dataset = controller.regenerate(&mut generator, 12).await.unwrap();

        let expected = DatasetGenerator::new(GeneratorOptions::default().with_seed(5))
            .generate(Scenario::Search, 12);
        assert_eq!(dataset, expected);
        assert_eq!(controller.status().await.dataset, expected);
    }
}
