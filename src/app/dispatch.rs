use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

/// A state mutation waiting to be applied.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The one place observable controller state is mutated from.
///
/// Background fetches never touch published state directly; they hand a
/// job to the dispatcher and the dispatcher decides where it runs.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, job: Job);
}

/// Runs every job immediately on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct Inline;

impl Dispatcher for Inline {
    fn dispatch(&self, job: Job) {
        job()
    }
}

/// A single-consumer job queue drained by whoever owns the loop.
pub struct MainLoop {
    tx: mpsc::UnboundedSender<Job>,
    rx: mpsc::UnboundedReceiver<Job>,
}

#[derive(Clone)]
struct QueueDispatcher {
    tx: mpsc::UnboundedSender<Job>,
}

impl Dispatcher for QueueDispatcher {
    fn dispatch(&self, job: Job) {
        if self.tx.send(job).is_err() {
            warn!("Main loop is gone, dropping state update");
        }
    }
}

impl Default for MainLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl MainLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn dispatcher(&self) -> Arc<dyn Dispatcher> {
        Arc::new(QueueDispatcher {
            tx: self.tx.clone(),
        })
    }

    /// Apply queued jobs, waiting for new ones, until `done` holds.
    pub async fn run_until(&mut self, mut done: impl FnMut() -> bool) {
        while !done() {
            match self.rx.recv().await {
                Some(job) => job(),
                None => break,
            }
        }
    }

    /// Apply whatever is queued right now without waiting.
    pub fn run_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            applied += 1;
        }
        applied
    }
}
