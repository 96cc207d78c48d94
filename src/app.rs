//! Application context.
//!
//! `App` is the single owner of everything the UI shows: the current surface
//! content, per-card idle motions, selection and status.  It is built once in
//! `main` and passed by reference to [`crate::ui`] and [`crate::input`].

use std::time::Instant;

use ratatui::widgets::ListState;

use crate::card::DisplayCard;
use crate::motion::FloatMotion;
use crate::surface::{Content, SurfaceUpdate};

pub struct App {
    /// What the last completed cycle rendered.
    pub content: Content,
    /// Idle float per card index, if one was attached.
    motions: Vec<Option<FloatMotion>>,
    /// When the current motions were attached.
    motion_epoch: Instant,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// The user asked for another ingestion cycle.
    pub refresh_requested: bool,
    /// Link waiting to be opened in the browser.
    pub pending_open: Option<String>,
    /// The feed author's page listing every article.
    pub profile_url: Option<String>,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            content: Content::Loading,
            motions: Vec::new(),
            motion_epoch: Instant::now(),
            list_state: ListState::default(),
            quit: false,
            refresh_requested: false,
            pending_open: None,
            profile_url: None,
            status: "Loading…".into(),
        }
    }

    pub fn cards(&self) -> &[DisplayCard] {
        match &self.content {
            Content::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// Replace everything with the result of one ingestion cycle.
    pub fn apply(&mut self, update: SurfaceUpdate) {
        self.content = update.content;

        self.motions = vec![None; self.cards().len()];
        for (index, motion) in update.motions {
            if let Some(slot) = self.motions.get_mut(index) {
                *slot = Some(motion);
            }
        }
        self.motion_epoch = Instant::now();

        self.status = match &self.content {
            Content::Cards(cards) => format!(
                "Fetched {} articles at {}",
                cards.len(),
                chrono::Local::now().format("%H:%M:%S")
            ),
            Content::Placeholder(p) => p.to_string(),
            Content::Loading => "Loading…".into(),
        };
        self.recompute_bounds();
    }

    /// Bring the selection back inside the current card list.
    pub fn recompute_bounds(&mut self) {
        let count = self.cards().len();
        let selected = match (count, self.list_state.selected()) {
            (0, _) => None,
            (n, Some(i)) => Some(i.min(n - 1)),
            (_, None) => Some(0),
        };
        self.list_state.select(selected);
        if selected.is_none() {
            *self.list_state.offset_mut() = 0;
        }
    }

    /// Row offset of card `index`'s idle float at `now`.
    pub fn float_offset(&self, index: usize, now: Instant) -> u16 {
        self.motions
            .get(index)
            .copied()
            .flatten()
            .map(|m| m.offset_at(now.saturating_duration_since(self.motion_epoch)))
            .unwrap_or(0)
    }

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// Queue the selected card's link for opening.
    pub fn open_selected(&mut self) {
        let link = self
            .list_state
            .selected()
            .and_then(|i| self.cards().get(i))
            .map(|card| card.link.clone());
        if link.is_some() {
            self.pending_open = link;
        }
    }

    /// Queue the "all articles" page for opening, whatever is on screen.
    pub fn open_profile(&mut self) {
        if let Some(url) = &self.profile_url {
            self.pending_open = Some(url.clone());
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let count = self.cards().len();
        if count == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.cards().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.cards().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let count = self.cards().len();
        if count > 0 {
            self.list_state.select(Some(count - 1));
        }
    }

    /// Whether any card has an idle float attached.
    pub fn animating(&self) -> bool {
        self.motions.iter().any(Option::is_some)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::surface::Placeholder;
    use std::time::Duration;

    pub fn card(title: &str) -> DisplayCard {
        DisplayCard {
            title: title.to_string(),
            link: format!("https://note.com/x/n/{title}"),
            date: "2024.06.03".to_string(),
            image_url: "images/concept.png".to_string(),
            excerpt: "Body...".to_string(),
        }
    }

    pub fn cards_update(titles: &[&str]) -> SurfaceUpdate {
        SurfaceUpdate {
            content: Content::Cards(titles.iter().map(|t| card(t)).collect()),
            motions: Vec::new(),
        }
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_loading() {
        let app = App::new();
        assert_eq!(app.content, Content::Loading);
        assert!(app.cards().is_empty());
        assert!(!app.quit);
        assert!(app.list_state.selected().is_none());
    }

    // -- apply ---------------------------------------------------------------

    #[test]
    fn apply_replaces_cards_wholesale() {
        let mut app = App::new();
        app.apply(cards_update(&["a", "b", "c"]));
        app.apply(cards_update(&["d"]));

        let titles: Vec<_> = app.cards().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["d"]);
    }

    #[test]
    fn apply_selects_first_card() {
        let mut app = App::new();
        app.apply(cards_update(&["a", "b"]));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn shrinking_list_clamps_selection() {
        let mut app = App::new();
        app.apply(cards_update(&["a", "b", "c"]));
        app.select_last();
        app.apply(cards_update(&["d"]));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn placeholder_clears_selection_and_sets_status() {
        let mut app = App::new();
        app.apply(cards_update(&["a"]));
        app.apply(SurfaceUpdate {
            content: Content::Placeholder(Placeholder::LoadFailed),
            motions: Vec::new(),
        });

        assert!(app.cards().is_empty());
        assert!(app.list_state.selected().is_none());
        assert_eq!(app.status, "Failed to load articles.");
    }

    #[test]
    fn motions_attach_by_index_and_ignore_out_of_range() {
        let motion = FloatMotion::new(1, Duration::from_secs(2), Duration::ZERO);
        let mut app = App::new();
        let mut update = cards_update(&["a", "b"]);
        update.motions = vec![(1, motion), (7, motion)];
        app.apply(update);

        assert!(app.animating());
        let later = app.motion_epoch + Duration::from_millis(1990);
        assert_eq!(app.float_offset(0, later), 0);
        assert_eq!(app.float_offset(1, later), 1);
        assert_eq!(app.float_offset(7, later), 0);
    }

    // -- open / refresh ------------------------------------------------------

    #[test]
    fn open_selected_queues_link() {
        let mut app = App::new();
        app.apply(cards_update(&["a", "b"]));
        app.select_next();
        app.open_selected();
        assert_eq!(app.pending_open.as_deref(), Some("https://note.com/x/n/b"));
    }

    #[test]
    fn open_selected_without_cards_is_noop() {
        let mut app = App::new();
        app.open_selected();
        assert!(app.pending_open.is_none());
    }

    #[test]
    fn open_profile_queues_page_even_on_placeholder() {
        let mut app = App::new();
        app.profile_url = Some("https://note.com/meraki_noen".into());
        app.apply(SurfaceUpdate {
            content: Content::Placeholder(Placeholder::LoadFailed),
            motions: Vec::new(),
        });
        app.open_profile();
        assert_eq!(app.pending_open.as_deref(), Some("https://note.com/meraki_noen"));
    }

    #[test]
    fn open_profile_without_url_is_noop() {
        let mut app = App::new();
        app.open_profile();
        assert!(app.pending_open.is_none());
    }

    #[test]
    fn request_refresh_sets_flag() {
        let mut app = App::new();
        app.request_refresh();
        assert!(app.refresh_requested);
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut app = App::new();
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_advances_and_clamps() {
        let mut app = App::new();
        app.apply(cards_update(&["a", "b", "c"]));

        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_next();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let mut app = App::new();
        app.apply(cards_update(&["a", "b", "c"]));

        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn select_first_and_last_jump() {
        let mut app = App::new();
        app.apply(cards_update(&["a", "b", "c"]));

        app.select_last();
        assert_eq!(app.list_state.selected(), Some(2));
        app.select_first();
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
