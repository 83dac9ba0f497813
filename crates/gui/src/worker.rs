//! Background execution of generation effects for the UI thread.
//!
//! Effects run on a tokio runtime; their completions are queued on a channel
//! and drained once per frame with [`GenerationWorker::poll`]. The
//! orchestrator itself is never touched off the UI thread.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::driver::{self, Collaborators};
use crate::orchestrator::{Completion, Effect};

type RepaintFn = Arc<dyn Fn() + Send + Sync>;

pub struct GenerationWorker {
    handle: Handle,
    collaborators: Collaborators,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    repaint: Option<RepaintFn>,
}

impl GenerationWorker {
    pub fn new(handle: Handle, collaborators: Collaborators) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handle,
            collaborators,
            tx,
            rx,
            repaint: None,
        }
    }

    /// Called from the runtime whenever a completion is queued
    pub fn with_repaint(mut self, repaint: impl Fn() + Send + Sync + 'static) -> Self {
        self.repaint = Some(Arc::new(repaint));
        self
    }

    pub fn spawn(&self, effect: Effect) {
        let collaborators = self.collaborators.clone();
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        self.handle.spawn(async move {
            if let Some(completion) = driver::execute(effect, &collaborators).await {
                if tx.send(completion).is_ok() {
                    if let Some(repaint) = repaint {
                        repaint();
                    }
                }
            }
        });
    }

    /// Drain every completion that has arrived, without blocking
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut out = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            out.push(completion);
        }
        out
    }

    /// Wait for the next completion
    pub async fn recv(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }
}
