//! Lazy, forward-only step streams.
//!
//! A [`StepStream`] runs one algorithm on a dedicated thread. Each pull sends
//! the runner a one-shot reply slot; the runner does not start until the
//! first slot arrives, and after filling one it parks until the next, so no
//! step is computed ahead of the consumer. Dropping the stream closes the
//! request channel; the parked runner answers [`Halt`] and the thread unwinds.

use std::thread::{self, JoinHandle};

use algoscope_algorithms::{Algorithm, Dataset, Flow, Halt, Step, StepSink};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::error::{Error, Result};

type Reply = oneshot::Sender<Step>;

/// Steps of one run, in emission order, ending after `Done`.
#[derive(Debug)]
pub struct StepStream {
    algorithm: Algorithm,
    requests: mpsc::Sender<Reply>,
    runner: JoinHandle<()>,
}

/// Answers pulls from the stream, one step per request.
struct ChannelSink {
    requests: mpsc::Receiver<Reply>,
    reply: Option<Reply>,
}

impl ChannelSink {
    fn wait(&mut self) -> std::result::Result<Reply, Halt> {
        self.requests.blocking_recv().ok_or(Halt)
    }
}

impl StepSink for ChannelSink {
    fn emit(&mut self, step: Step) -> Flow {
        let reply = match self.reply.take() {
            Some(reply) => reply,
            None => self.wait()?,
        };
        let last = step.is_done();
        reply.send(step).map_err(|_| Halt)?;
        if !last {
            self.reply = Some(self.wait()?);
        }
        Ok(())
    }
}

impl StepStream {
    /// Validate `dataset` for `algorithm` and start the runner.
    ///
    /// The runner computes nothing until the first step is pulled.
    pub fn spawn(algorithm: Algorithm, dataset: Dataset) -> Result<Self> {
        let run = algorithm.prepare(dataset)?;
        Self::with_runner(algorithm, move |sink| run.execute(sink))
    }

    fn with_runner<F>(algorithm: Algorithm, job: F) -> Result<Self>
    where
        F: FnOnce(&mut ChannelSink) -> Flow + Send + 'static,
    {
        let (requests, mut pending) = mpsc::channel::<Reply>(1);

        let runner = thread::Builder::new()
            .name(format!("algoscope-{}", algorithm.id()))
            .spawn(move || {
                let Some(first) = pending.blocking_recv() else {
                    trace!(%algorithm, "stream dropped before the first pull");
                    return;
                };
                let mut sink = ChannelSink {
                    requests: pending,
                    reply: Some(first),
                };
                match job(&mut sink) {
                    Ok(()) => trace!(%algorithm, "runner finished"),
                    Err(Halt) => debug!(%algorithm, "runner halted by consumer"),
                }
            })?;

        Ok(Self {
            algorithm,
            requests,
            runner,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Pull the next step. `None` once the run is over.
    ///
    /// Dropping the returned future before it resolves halts the runner.
    pub async fn next_step(&mut self) -> Option<Step> {
        let (reply, step) = oneshot::channel();
        self.requests.send(reply).await.ok()?;
        step.await.ok()
    }

    /// Stop the runner and wait for its thread to exit.
    ///
    /// Blocks the calling thread; use plain `drop` from async code.
    pub fn close(self) -> Result<()> {
        let StepStream {
            algorithm,
            requests,
            runner,
        } = self;
        drop(requests);
        runner
            .join()
            .map_err(|_| Error::Join(format!("{algorithm} runner panicked")))
    }
}

/// Blocking iteration for synchronous consumers.
///
/// Must not be used from inside an async runtime.
impl Iterator for StepStream {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let (reply, step) = oneshot::channel();
        self.requests.blocking_send(reply).ok()?;
        step.blocking_recv().ok()
    }
}
