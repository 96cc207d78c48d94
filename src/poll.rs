//! Background ingestion cycles.
//!
//! Cycles run as tasks on the tokio runtime; each one renders into its own
//! [`ChannelSurface`], which delivers a single [`SurfaceUpdate`] to the UI
//! thread over an [`mpsc`] channel when the cycle finishes.
//!
//! There is no timer: one cycle runs at startup and further cycles only run
//! when the user asks for a refresh.  Triggers that arrive while a cycle is in
//! flight are refused by [`Poller::trigger`].

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::ingest::FeedIngestor;
use crate::source::{FeedFetcher, FeedSource};
use crate::surface::{ChannelSurface, SurfaceUpdate};

pub struct Poller<F> {
    ingestor: Arc<FeedIngestor<F>>,
    source: Arc<FeedSource>,
    tx: mpsc::Sender<SurfaceUpdate>,
    runtime: Handle,
}

impl<F: FeedFetcher + 'static> Poller<F> {
    /// Create a poller and the receiver the main loop should drain each tick.
    pub fn new(
        ingestor: FeedIngestor<F>,
        source: FeedSource,
        runtime: Handle,
    ) -> (Self, mpsc::Receiver<SurfaceUpdate>) {
        let (tx, rx) = mpsc::channel();
        let poller = Self {
            ingestor: Arc::new(ingestor),
            source: Arc::new(source),
            tx,
            runtime,
        };
        (poller, rx)
    }

    /// Start a cycle in the background.  Returns `false` when one is already
    /// running and this trigger was dropped.
    ///
    /// The in-flight flag is claimed here, before spawning, so a `true`
    /// always means a cycle will run and deliver an update.
    pub fn trigger(&self) -> bool {
        let Some(claim) = self.ingestor.try_claim() else {
            tracing::debug!("refresh requested while a cycle is in flight");
            return false;
        };

        let ingestor = Arc::clone(&self.ingestor);
        let source = Arc::clone(&self.source);
        let mut surface = ChannelSurface::new(self.tx.clone());

        self.runtime.spawn(async move {
            let outcome = ingestor.render_claimed(claim, &source, &mut surface).await;
            tracing::debug!("background cycle finished: {outcome:?}");
        });
        true
    }
}
