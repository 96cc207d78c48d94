//! The rendering surface abstraction.
//!
//! The ingestion cycle never touches the terminal.  It writes to a
//! [`RenderSurface`], which is either a [`ChannelSurface`] forwarding frames
//! to the UI thread, or an in-memory recorder in tests.
//!
//! ## Frames
//!
//! A cycle always ends with [`RenderSurface::notify_layout_changed`].  The
//! channel surface buffers everything up to that call and sends it as one
//! [`SurfaceUpdate`], so the UI applies a whole cycle at once and never draws a
//! half-populated list.

use std::fmt;
use std::sync::mpsc;

use crate::card::DisplayCard;
use crate::motion::FloatMotion;

/// Static message shown instead of cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// The feed was fetched and parsed but had nothing to show.
    NoEntries,
    /// The cycle failed somewhere between request and parse.
    LoadFailed,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEntries => f.write_str("No articles found."),
            Self::LoadFailed => f.write_str("Failed to load articles."),
        }
    }
}

/// Capability interface the ingestion cycle renders through.
///
/// Implementations must be [`Send`] because cycles run on the async runtime,
/// not the UI thread.
pub trait RenderSurface: Send {
    /// Drop every card and placeholder currently shown.
    fn clear(&mut self);

    fn append_card(&mut self, card: DisplayCard);

    fn show_placeholder(&mut self, placeholder: Placeholder);

    /// Tell whatever measures the surface that its contents changed.
    fn notify_layout_changed(&mut self);

    /// Attach an idle float to the card at `index`.  Optional.
    fn attach_idle_motion(&mut self, _index: usize, _motion: FloatMotion) {}
}

/// What a surface currently holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Content {
    /// Nothing has been rendered yet.
    #[default]
    Loading,
    Cards(Vec<DisplayCard>),
    Placeholder(Placeholder),
}

/// One complete, replace-everything update for the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceUpdate {
    pub content: Content,
    pub motions: Vec<(usize, FloatMotion)>,
}

/// Shared bookkeeping for surfaces that replay operations into a [`Content`].
#[derive(Debug, Default)]
struct Pending {
    content: Content,
    motions: Vec<(usize, FloatMotion)>,
}

impl Pending {
    fn clear(&mut self) {
        self.content = Content::Cards(Vec::new());
        self.motions.clear();
    }

    fn append_card(&mut self, card: DisplayCard) {
        match &mut self.content {
            Content::Cards(cards) => cards.push(card),
            other => *other = Content::Cards(vec![card]),
        }
    }

    fn take(&mut self) -> SurfaceUpdate {
        let pending = std::mem::take(self);
        SurfaceUpdate {
            content: pending.content,
            motions: pending.motions,
        }
    }
}

/// Forwards each completed cycle to the UI thread as one [`SurfaceUpdate`].
pub struct ChannelSurface {
    tx: mpsc::Sender<SurfaceUpdate>,
    pending: Pending,
}

impl ChannelSurface {
    pub fn new(tx: mpsc::Sender<SurfaceUpdate>) -> Self {
        Self {
            tx,
            pending: Pending::default(),
        }
    }
}

impl RenderSurface for ChannelSurface {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn append_card(&mut self, card: DisplayCard) {
        self.pending.append_card(card);
    }

    fn show_placeholder(&mut self, placeholder: Placeholder) {
        self.pending.content = Content::Placeholder(placeholder);
    }

    fn notify_layout_changed(&mut self) {
        // A closed receiver means the UI is gone; dropping the frame is fine.
        let _ = self.tx.send(self.pending.take());
    }

    fn attach_idle_motion(&mut self, index: usize, motion: FloatMotion) {
        self.pending.motions.push((index, motion));
    }
}

/// Records everything written to it.  Used by the ingestion tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySurface {
    pending: Pending,
    pub layout_notifications: usize,
    pub clears: usize,
    pub placeholders: Vec<Placeholder>,
}

#[cfg(test)]
impl MemorySurface {
    pub fn cards(&self) -> &[DisplayCard] {
        match &self.pending.content {
            Content::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn content(&self) -> &Content {
        &self.pending.content
    }

    pub fn motions(&self) -> &[(usize, FloatMotion)] {
        &self.pending.motions
    }
}

#[cfg(test)]
impl RenderSurface for MemorySurface {
    fn clear(&mut self) {
        self.clears += 1;
        self.pending.clear();
    }

    fn append_card(&mut self, card: DisplayCard) {
        self.pending.append_card(card);
    }

    fn show_placeholder(&mut self, placeholder: Placeholder) {
        self.placeholders.push(placeholder);
        self.pending.content = Content::Placeholder(placeholder);
    }

    fn notify_layout_changed(&mut self) {
        self.layout_notifications += 1;
    }

    fn attach_idle_motion(&mut self, index: usize, motion: FloatMotion) {
        self.pending.motions.push((index, motion));
    }
}
