//! The ingestion cycle: fetch, parse, derive, render.
//!
//! [`FeedIngestor::fetch_and_render`] is the only entry point.  It never
//! returns an error: every failure becomes a placeholder on the surface, and
//! the returned [`CycleOutcome`] exists only so callers can log what happened.
//!
//! All fallible work (network, envelope, parse) finishes before the first
//! surface write, so a surface is either fully rendered or fully placeholder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::card::DisplayCard;
use crate::error::Result;
use crate::motion::FloatMotion;
use crate::source::{parse_items, FeedFetcher, FeedSource};
use crate::surface::{Placeholder, RenderSurface};

/// What a single cycle ended up rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// This many cards were rendered.
    Rendered(usize),
    /// The feed had no usable entries; the empty-state placeholder is shown.
    Empty,
    /// Something failed; the failure placeholder is shown.
    Failed,
    /// Another cycle was already in flight; the surface was not touched.
    Skipped,
}

/// Holds the in-flight flag; releases it when dropped, including on early
/// return or when the owning task is cancelled.
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FeedIngestor<F> {
    fetcher: F,
    in_flight: Arc<AtomicBool>,
}

impl<F: FeedFetcher> FeedIngestor<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    #[cfg(test)]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the ingestor for one cycle, or `None` if a cycle is running.
    ///
    /// The guard can be taken on one thread and moved into the task that
    /// later calls [`FeedIngestor::render_claimed`].
    pub fn try_claim(&self) -> Option<InFlight> {
        InFlight::acquire(&self.in_flight)
    }

    /// Run one cycle against `source`, replacing whatever `surface` shows.
    ///
    /// A call made while another is still running returns
    /// [`CycleOutcome::Skipped`] immediately.
    pub async fn fetch_and_render<S>(&self, source: &FeedSource, surface: &mut S) -> CycleOutcome
    where
        S: RenderSurface + ?Sized,
    {
        let Some(claim) = self.try_claim() else {
            tracing::info!("ingestion already in flight, ignoring trigger");
            return CycleOutcome::Skipped;
        };
        self.render_claimed(claim, source, surface).await
    }

    /// Run a cycle already claimed with [`FeedIngestor::try_claim`].  The
    /// flag is released when this returns.
    pub async fn render_claimed<S>(
        &self,
        _claim: InFlight,
        source: &FeedSource,
        surface: &mut S,
    ) -> CycleOutcome
    where
        S: RenderSurface + ?Sized,
    {
        tracing::info!("ingestion cycle started for feed {:?}", source.feed_id);

        let cards = match self.collect_cards(source).await {
            Ok(cards) => cards,
            Err(e) => {
                if e.is_timeout() {
                    tracing::error!("feed fetch timed out after {:?}: {e}", source.timeout);
                } else {
                    tracing::error!("ingestion cycle failed: {e}");
                }
                render_placeholder(surface, Placeholder::LoadFailed);
                return CycleOutcome::Failed;
            }
        };

        if cards.is_empty() {
            tracing::info!("feed has no entries to show");
            render_placeholder(surface, Placeholder::NoEntries);
            return CycleOutcome::Empty;
        }

        let count = cards.len();
        surface.clear();
        for card in cards {
            surface.append_card(card);
        }
        if source.idle_motion {
            let mut rng = rand::thread_rng();
            for index in 0..count {
                surface.attach_idle_motion(index, FloatMotion::for_card(index, &mut rng));
            }
        }
        surface.notify_layout_changed();

        tracing::info!("ingestion cycle rendered {count} cards");
        CycleOutcome::Rendered(count)
    }

    async fn collect_cards(&self, source: &FeedSource) -> Result<Vec<DisplayCard>> {
        let markup = self.fetcher.fetch_markup(source).await?;
        let items = parse_items(&markup)?;
        Ok(items
            .iter()
            .map(|item| DisplayCard::from_raw(item, &source.placeholder_image))
            .collect())
    }
}

fn render_placeholder<S: RenderSurface + ?Sized>(surface: &mut S, placeholder: Placeholder) {
    surface.clear();
    surface.show_placeholder(placeholder);
    surface.notify_layout_changed();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
