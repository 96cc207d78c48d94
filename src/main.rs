//! note-feed: the latest articles of a feed, as cards in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//!                 ingest.rs (tokio task)
//! ┌──────────┐   fetch → parse → card   ┌────────────┐ SurfaceUpdate ┌──────────┐  draw()  ┌────────┐
//! │ poll.rs  │ ───────────────────────► │ surface.rs │ ────────────► │  app.rs  │ ───────► │ ui.rs  │
//! │ trigger  │                          │ (channel)  │   (mpsc)      │ (state)  │          │        │
//! └──────────┘                          └────────────┘               └──────────┘          └────────┘
//!      ▲                                                                  ▲
//!      └──────────────── refresh_requested ───────────── handle_key_event()│ input.rs
//! ```
//!
//! * **`source/`**: `FeedSource`, the `FeedFetcher` seam, HTTP fetching
//!   through the proxy and RSS parsing into `RawFeedItem`s.
//! * **`card/`**: derives `DisplayCard`s: image fallback chain, date, excerpt.
//! * **`ingest`**: one all-or-nothing fetch-and-render cycle, with an
//!   overlap guard.
//! * **`surface`**: the `RenderSurface` capability the cycle writes to.
//! * **`poll`**: runs cycles on the tokio runtime on demand.
//! * **`app`** / **`ui`** / **`input`**: state, drawing and keys.
//! * **`main`**: wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod card;
mod config;
mod error;
mod ingest;
mod input;
mod logger;
mod motion;
mod poll;
mod source;
mod surface;
mod ui;

use std::io;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::{Cli, Settings};
use ingest::FeedIngestor;
use poll::Poller;
use source::HttpFetcher;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Open `link` with the configured browser command, detached from the TUI.
fn open_link(browser: &str, link: &str) -> io::Result<()> {
    Command::new(browser)
        .arg(link)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli).context("invalid configuration")?;

    logger::init_file_logger(&settings.log_file, settings.verbose)
        .with_context(|| format!("cannot open log file {}", settings.log_file.display()))?;
    tracing::info!("starting note-feed for feed {:?}", settings.source.feed_id);
    tracing::debug!("settings: {settings:?}");

    // -- async runtime for ingestion cycles ---------------------------------
    let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;
    let ingestor = FeedIngestor::new(HttpFetcher::new()?);
    let (poller, rx) = Poller::new(ingestor, settings.source.clone(), runtime.handle().clone());

    // The page-load cycle.
    poller.trigger();

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();
    app.profile_url = Some(settings.source.profile_url());

    // -- main event loop -----------------------------------------------------
    // Each iteration:
    //   1. Apply any finished cycle.
    //   2. Start a refresh or open a link if one was asked for.
    //   3. Render.
    //   4. Poll for keyboard input (non-blocking, up to the tick).
    loop {
        while let Ok(update) = rx.try_recv() {
            app.apply(update);
        }

        if std::mem::take(&mut app.refresh_requested) {
            if poller.trigger() {
                app.status = "Refreshing…".into();
            } else {
                app.status = "Refresh already in progress".into();
            }
        }

        if let Some(link) = app.pending_open.take() {
            match open_link(&settings.browser, &link) {
                Ok(()) => app.status = format!("Opened {link}"),
                Err(e) => {
                    tracing::error!("cannot open {link} with {:?}: {e}", settings.browser);
                    app.status = format!("Could not open link: {e}");
                }
            }
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // floats need a faster tick to look smooth
        let tick_rate = if app.animating() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(100)
        };
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("shutting down");
    // `guard` is dropped here, restoring the terminal.
    drop(guard);
    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}
